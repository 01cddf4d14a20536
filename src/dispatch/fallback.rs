//! Per-action fault fallbacks.

use crate::error::ServiceFault;

/// A fault an action may absorb, returning its result type's default
/// instead of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fallback {
    /// Any `*.NotFound` code or HTTP 404: deleting something that is
    /// already gone.
    VoidOnNotFoundOr404,
    /// `IncorrectState` mentioning `available`: detaching a volume that is
    /// already detached.
    VoidOnVolumeAvailable,
    /// HTTP 404: describing or terminating resources that do not exist.
    EmptySetOnNotFoundOr404,
}

impl Fallback {
    /// Whether this fallback absorbs the fault.
    pub fn absorbs(self, fault: &ServiceFault) -> bool {
        match self {
            Fallback::VoidOnNotFoundOr404 => fault.code.ends_with(".NotFound") || fault.status == 404,
            Fallback::VoidOnVolumeAvailable => {
                fault.code == "IncorrectState" && fault.message.contains("available")
            }
            Fallback::EmptySetOnNotFoundOr404 => fault.status == 404,
        }
    }

    /// Short name used in logs.
    pub fn name(self) -> &'static str {
        match self {
            Fallback::VoidOnNotFoundOr404 => "VoidOnNotFoundOr404",
            Fallback::VoidOnVolumeAvailable => "VoidOnVolumeAvailable",
            Fallback::EmptySetOnNotFoundOr404 => "EmptySetOnNotFoundOr404",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn fault(status: u16, code: &str, message: &str) -> ServiceFault {
        ServiceFault {
            status,
            code: code.to_string(),
            message: message.to_string(),
            request_id: None,
        }
    }

    #[test_case(Fallback::VoidOnNotFoundOr404, 400, "InvalidGroup.NotFound", "gone", true)]
    #[test_case(Fallback::VoidOnNotFoundOr404, 404, "Http404", "", true)]
    #[test_case(Fallback::VoidOnNotFoundOr404, 400, "InvalidGroup.InUse", "busy", false)]
    #[test_case(Fallback::VoidOnVolumeAvailable, 400, "IncorrectState", "Volume 'vol-1' is in the 'available' state.", true)]
    #[test_case(Fallback::VoidOnVolumeAvailable, 400, "IncorrectState", "Volume is in the 'in-use' state.", false)]
    #[test_case(Fallback::VoidOnVolumeAvailable, 400, "InvalidVolume.NotFound", "available", false)]
    #[test_case(Fallback::EmptySetOnNotFoundOr404, 404, "Http404", "", true)]
    #[test_case(Fallback::EmptySetOnNotFoundOr404, 400, "InvalidSnapshot.NotFound", "deleted", false)]
    fn test_absorbs(fallback: Fallback, status: u16, code: &str, message: &str, expected: bool) {
        assert_eq!(fallback.absorbs(&fault(status, code, message)), expected);
    }
}
