//! SOAP envelope encoding and decoding.
//!
//! Requests are serialised with quick-xml under the operation element,
//! which carries the VirtualBox namespace as its default namespace so the
//! unprefixed field elements are qualified the way the WSDL expects.
//! Responses are decoded by looking at the first element inside `Body`:
//! a `Fault` becomes [`SoapError::Fault`], anything else is deserialised
//! into the caller's response type.

use crate::error::{SoapError, SoapResult};
use crate::fault;
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::de::DeserializeOwned;
use serde::Serialize;

// ─── Constants ───────────────────────────────────────────────────────

pub const NS_SOAP_ENV: &str = "http://schemas.xmlsoap.org/soap/envelope/";
pub const NS_VBOX: &str = "http://www.virtualbox.org/";

// ─── Request side ────────────────────────────────────────────────────

/// A request value for one remote operation.
///
/// Fields serialise as child elements of the [`OPERATION`](Self::OPERATION)
/// element; the response arrives as `Self::Response`.
pub trait SoapRequest: Serialize {
    /// Body element name, e.g. `IVirtualBox_getVersion`.
    const OPERATION: &'static str;
    type Response: DeserializeOwned;
}

/// Build the complete envelope for `req`.
pub fn encode_request<R: SoapRequest>(req: &R) -> SoapResult<String> {
    let payload = quick_xml::se::to_string_with_root(R::OPERATION, req)
        .map_err(|e| SoapError::Encode(format!("{}: {e}", R::OPERATION)))?;
    let payload = qualify(R::OPERATION, &payload)?;

    Ok(format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<soapenv:Envelope xmlns:soapenv="{NS_SOAP_ENV}">
  <soapenv:Body>
    {payload}
  </soapenv:Body>
</soapenv:Envelope>"#
    ))
}

/// Put `xmlns="…virtualbox…"` on the operation element.
fn qualify(operation: &str, payload: &str) -> SoapResult<String> {
    let open = format!("<{operation}");
    let rest = payload
        .strip_prefix(open.as_str())
        .filter(|rest| rest.starts_with(['>', '/', ' ']))
        .ok_or_else(|| {
            SoapError::Encode(format!("serialised payload does not start with <{operation}>"))
        })?;
    Ok(format!(r#"{open} xmlns="{NS_VBOX}"{rest}"#))
}

// ─── Response side ───────────────────────────────────────────────────

/// First element child of the envelope `Body`.
#[derive(Debug, PartialEq)]
enum BodyContent<'a> {
    Fault(&'a str),
    Payload(&'a str),
}

/// Decode a response envelope into `T`, or the fault it carries. The
/// payload deserializer trims leading and trailing whitespace of text
/// values.
pub fn decode_response<T: DeserializeOwned>(xml: &str) -> SoapResult<T> {
    match extract_body(xml)? {
        BodyContent::Fault(fragment) => Err(SoapError::Fault(fault::parse_fault(fragment)?)),
        BodyContent::Payload(fragment) => quick_xml::de::from_str(fragment)
            .map_err(|e| SoapError::Decode(format!("response payload: {e}"))),
    }
}

fn extract_body(xml: &str) -> SoapResult<BodyContent<'_>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut depth = 0usize;
    let mut in_body = false;

    loop {
        let start = reader.buffer_position() as usize;
        match reader.read_event()? {
            Event::Start(e) => {
                depth += 1;
                let is = |name: &[u8]| e.local_name().as_ref() == name;
                if depth == 1 && !is(b"Envelope") {
                    return Err(not_an_envelope(e.local_name().as_ref()));
                }
                if in_body && depth == 3 {
                    let is_fault = is(b"Fault");
                    reader.read_to_end(e.to_end().name())?;
                    let end = reader.buffer_position() as usize;
                    return Ok(classify(is_fault, xml[start..end].trim()));
                }
                if depth == 2 && is(b"Body") {
                    in_body = true;
                }
            }
            Event::Empty(e) => {
                let is = |name: &[u8]| e.local_name().as_ref() == name;
                if depth == 0 && !is(b"Envelope") {
                    return Err(not_an_envelope(e.local_name().as_ref()));
                }
                if in_body && depth == 2 {
                    let end = reader.buffer_position() as usize;
                    return Ok(classify(is(b"Fault"), xml[start..end].trim()));
                }
                if depth == 1 && is(b"Body") {
                    return Err(SoapError::Decode("SOAP Body is empty".into()));
                }
            }
            Event::End(_) => {
                if in_body && depth == 2 {
                    return Err(SoapError::Decode("SOAP Body is empty".into()));
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => {
                return Err(SoapError::Decode("no SOAP Body in response".into()));
            }
            _ => {}
        }
    }
}

fn classify(is_fault: bool, fragment: &str) -> BodyContent<'_> {
    if is_fault {
        BodyContent::Fault(fragment)
    } else {
        BodyContent::Payload(fragment)
    }
}

fn not_an_envelope(root: &[u8]) -> SoapError {
    SoapError::Decode(format!(
        "expected SOAP Envelope, found <{}>",
        String::from_utf8_lossy(root)
    ))
}
