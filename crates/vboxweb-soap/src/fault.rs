//! SOAP fault decoding.
//!
//! `vboxwebsrv` reports API failures as SOAP 1.1 faults with a typed detail
//! element, for example:
//!
//! ```xml
//! <SOAP-ENV:Fault>
//!   <faultcode>SOAP-ENV:Client</faultcode>
//!   <faultstring>VirtualBox error: Could not find a registered machine</faultstring>
//!   <detail>
//!     <vbox:RuntimeFault>
//!       <resultCode>-2135228415</resultCode>
//!       <returnval>b1e5c4a0f0d1c7e2-0000000000000042</returnval>
//!     </vbox:RuntimeFault>
//!   </detail>
//! </SOAP-ENV:Fault>
//! ```
//!
//! SOAP 1.2 style `Code/Value` and `Reason/Text` children are accepted too.

use crate::error::{SoapError, SoapResult};
use crate::result_code::ResultCode;
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A decoded SOAP `Fault` element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoapFault {
    /// `faultcode`, e.g. `SOAP-ENV:Client`
    pub code: String,
    /// `faultstring`
    pub message: String,
    #[serde(default)]
    pub actor: Option<String>,
    #[serde(default)]
    pub detail: Option<FaultDetail>,
}

/// The first element inside `detail`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaultDetail {
    /// Local name of the detail element (`RuntimeFault`, `InvalidObjectFault`, ...)
    pub kind: String,
    #[serde(default)]
    pub result_code: Option<ResultCode>,
    /// `IVirtualBoxErrorInfo` reference carried by a `RuntimeFault`
    #[serde(default)]
    pub error_info: Option<String>,
    /// Object reference rejected by the server (`InvalidObjectFault`)
    #[serde(default)]
    pub bad_object_id: Option<String>,
    /// Free text found directly inside `detail`
    #[serde(default)]
    pub text: Option<String>,
}

impl SoapFault {
    pub fn result_code(&self) -> Option<ResultCode> {
        self.detail.as_ref().and_then(|d| d.result_code)
    }
}

impl fmt::Display for SoapFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = if self.message.is_empty() {
            "unspecified fault"
        } else {
            self.message.as_str()
        };
        match (self.result_code(), self.detail.as_ref()) {
            (Some(rc), _) => write!(f, "{message} ({rc})"),
            (None, Some(d)) if d.kind == "InvalidObjectFault" => match &d.bad_object_id {
                Some(id) => write!(f, "{message} (invalid object {id})"),
                None => write!(f, "{message} (invalid object)"),
            },
            _ if !self.code.is_empty() => write!(f, "{message} ({})", self.code),
            _ => write!(f, "{message}"),
        }
    }
}

/// Decode a `Fault` element (any namespace prefix). Text keeps its
/// surrounding whitespace; whitespace-only text between elements is skipped.
pub fn parse_fault(xml: &str) -> SoapResult<SoapFault> {
    let mut reader = Reader::from_str(xml);

    let mut fault = SoapFault::default();
    let mut path: Vec<String> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = local_name(e.local_name().as_ref());
                if path.is_empty() && name != "Fault" {
                    return Err(SoapError::Decode(format!(
                        "expected Fault element, found {name}"
                    )));
                }
                open_detail(&mut fault, &path, &name);
                path.push(name);
            }
            Event::Empty(e) => {
                let name = local_name(e.local_name().as_ref());
                if path.is_empty() {
                    if name != "Fault" {
                        return Err(SoapError::Decode(format!(
                            "expected Fault element, found {name}"
                        )));
                    }
                    break;
                }
                open_detail(&mut fault, &path, &name);
            }
            Event::Text(t) => {
                let text = t.unescape()?.into_owned();
                if !text.trim().is_empty() {
                    apply_text(&mut fault, &path, text);
                }
            }
            Event::CData(c) => {
                let text = String::from_utf8_lossy(&c.into_inner()).into_owned();
                apply_text(&mut fault, &path, text);
            }
            Event::End(_) => {
                path.pop();
                if path.is_empty() {
                    break;
                }
            }
            Event::Eof => {
                if !path.is_empty() {
                    return Err(SoapError::Decode("truncated Fault element".into()));
                }
                break;
            }
            _ => {}
        }
    }

    Ok(fault)
}

fn local_name(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).into_owned()
}

fn is_detail(name: &str) -> bool {
    name.eq_ignore_ascii_case("detail")
}

/// The first child element of `detail` names the fault kind.
fn open_detail(fault: &mut SoapFault, path: &[String], name: &str) {
    if path.len() != 2 || !is_detail(&path[1]) {
        return;
    }
    let detail = fault.detail.get_or_insert_with(FaultDetail::default);
    if detail.kind.is_empty() {
        detail.kind = name.to_string();
    }
}

fn apply_text(fault: &mut SoapFault, path: &[String], text: String) {
    let names: Vec<&str> = path.iter().map(String::as_str).collect();
    match names.as_slice() {
        ["Fault", "faultcode"] => fault.code = text,
        ["Fault", "faultstring"] => fault.message = text,
        ["Fault", "faultactor"] => fault.actor = Some(text),
        ["Fault", "Code", "Value"] => fault.code = text,
        ["Fault", "Reason", "Text"] => fault.message = text,
        ["Fault", d] if is_detail(d) => {
            fault.detail.get_or_insert_with(FaultDetail::default).text = Some(text);
        }
        ["Fault", d, _, field] if is_detail(d) => {
            let detail = fault.detail.get_or_insert_with(FaultDetail::default);
            match *field {
                "resultCode" => detail.result_code = parse_result_code(&text),
                "returnval" => detail.error_info = Some(text),
                "badObjectID" => detail.bad_object_id = Some(text),
                _ => {}
            }
        }
        _ => {}
    }
}

/// gSOAP sends result codes as signed decimals; accept unsigned and hex forms too.
fn parse_result_code(text: &str) -> Option<ResultCode> {
    let t = text.trim();
    if let Some(hex) = t.strip_prefix("0x").or_else(|| t.strip_prefix("0X")) {
        return u32::from_str_radix(hex, 16).ok().map(|v| ResultCode(v as i32));
    }
    if let Ok(v) = t.parse::<i32>() {
        return Some(ResultCode(v));
    }
    t.parse::<u32>().ok().map(|v| ResultCode(v as i32))
}
