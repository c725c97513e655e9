//! COM-style result codes reported by VirtualBox in fault details and
//! `IProgress::resultCode`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A signed 32-bit HRESULT as sent on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultCode(pub i32);

const fn hr(v: u32) -> ResultCode {
    ResultCode(v as i32)
}

impl ResultCode {
    pub const OK: ResultCode = ResultCode(0);

    // ── Generic COM ─────────────────────────────────────────────────
    pub const NOT_IMPL: ResultCode = hr(0x8000_4001);
    pub const NO_INTERFACE: ResultCode = hr(0x8000_4002);
    pub const POINTER: ResultCode = hr(0x8000_4003);
    pub const ABORT: ResultCode = hr(0x8000_4004);
    pub const FAIL: ResultCode = hr(0x8000_4005);
    pub const UNEXPECTED: ResultCode = hr(0x8000_FFFF);
    pub const ACCESS_DENIED: ResultCode = hr(0x8007_0005);
    pub const OUT_OF_MEMORY: ResultCode = hr(0x8007_000E);
    pub const INVALID_ARG: ResultCode = hr(0x8007_0057);

    // ── VirtualBox ──────────────────────────────────────────────────
    pub const OBJECT_NOT_FOUND: ResultCode = hr(0x80BB_0001);
    pub const INVALID_VM_STATE: ResultCode = hr(0x80BB_0002);
    pub const VM_ERROR: ResultCode = hr(0x80BB_0003);
    pub const FILE_ERROR: ResultCode = hr(0x80BB_0004);
    pub const IPRT_ERROR: ResultCode = hr(0x80BB_0005);
    pub const PDM_ERROR: ResultCode = hr(0x80BB_0006);
    pub const INVALID_OBJECT_STATE: ResultCode = hr(0x80BB_0007);
    pub const HOST_ERROR: ResultCode = hr(0x80BB_0008);
    pub const NOT_SUPPORTED: ResultCode = hr(0x80BB_0009);
    pub const XML_ERROR: ResultCode = hr(0x80BB_000A);
    pub const INVALID_SESSION_STATE: ResultCode = hr(0x80BB_000B);
    pub const OBJECT_IN_USE: ResultCode = hr(0x80BB_000C);
    pub const PASSWORD_INCORRECT: ResultCode = hr(0x80BB_000D);
    pub const MAXIMUM_REACHED: ResultCode = hr(0x80BB_000E);
    pub const GSTCTL_GUEST_ERROR: ResultCode = hr(0x80BB_000F);
    pub const TIMEOUT: ResultCode = hr(0x80BB_0010);

    /// Symbolic name, when the code is one VirtualBox documents.
    pub fn name(self) -> Option<&'static str> {
        let name = match self {
            Self::OK => "S_OK",
            Self::NOT_IMPL => "E_NOTIMPL",
            Self::NO_INTERFACE => "E_NOINTERFACE",
            Self::POINTER => "E_POINTER",
            Self::ABORT => "E_ABORT",
            Self::FAIL => "E_FAIL",
            Self::UNEXPECTED => "E_UNEXPECTED",
            Self::ACCESS_DENIED => "E_ACCESSDENIED",
            Self::OUT_OF_MEMORY => "E_OUTOFMEMORY",
            Self::INVALID_ARG => "E_INVALIDARG",
            Self::OBJECT_NOT_FOUND => "VBOX_E_OBJECT_NOT_FOUND",
            Self::INVALID_VM_STATE => "VBOX_E_INVALID_VM_STATE",
            Self::VM_ERROR => "VBOX_E_VM_ERROR",
            Self::FILE_ERROR => "VBOX_E_FILE_ERROR",
            Self::IPRT_ERROR => "VBOX_E_IPRT_ERROR",
            Self::PDM_ERROR => "VBOX_E_PDM_ERROR",
            Self::INVALID_OBJECT_STATE => "VBOX_E_INVALID_OBJECT_STATE",
            Self::HOST_ERROR => "VBOX_E_HOST_ERROR",
            Self::NOT_SUPPORTED => "VBOX_E_NOT_SUPPORTED",
            Self::XML_ERROR => "VBOX_E_XML_ERROR",
            Self::INVALID_SESSION_STATE => "VBOX_E_INVALID_SESSION_STATE",
            Self::OBJECT_IN_USE => "VBOX_E_OBJECT_IN_USE",
            Self::PASSWORD_INCORRECT => "VBOX_E_PASSWORD_INCORRECT",
            Self::MAXIMUM_REACHED => "VBOX_E_MAXIMUM_REACHED",
            Self::GSTCTL_GUEST_ERROR => "VBOX_E_GSTCTL_GUEST_ERROR",
            Self::TIMEOUT => "VBOX_E_TIMEOUT",
            _ => return None,
        };
        Some(name)
    }

    /// HRESULT severity bit clear.
    pub fn is_success(self) -> bool {
        self.0 >= 0
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{name}"),
            None => write!(f, "{:#010x}", self.0 as u32),
        }
    }
}

impl From<i32> for ResultCode {
    fn from(v: i32) -> Self {
        Self(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_values_match_signed_hresults() {
        assert_eq!(ResultCode::OBJECT_NOT_FOUND.0, -2135228415);
        assert_eq!(ResultCode::INVALID_SESSION_STATE.0, -2135228405);
        assert_eq!(ResultCode::INVALID_ARG.0, -2147024809);
    }

    #[test]
    fn test_names() {
        assert_eq!(
            ResultCode(-2135228414).name(),
            Some("VBOX_E_INVALID_VM_STATE")
        );
        assert_eq!(ResultCode::OK.name(), Some("S_OK"));
        assert_eq!(ResultCode(0x1234).name(), None);
    }

    #[test]
    fn test_display_unknown_is_hex() {
        assert_eq!(ResultCode(-2147467000).to_string(), "0x80004108");
        assert_eq!(ResultCode::FAIL.to_string(), "E_FAIL");
    }

    #[test]
    fn test_success() {
        assert!(ResultCode::OK.is_success());
        assert!(ResultCode(1).is_success());
        assert!(!ResultCode::VM_ERROR.is_success());
    }
}
