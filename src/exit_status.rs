//! Process exit codes

use std::process::ExitCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitStatus {
    Success = 0,
    Error = 1,
    Error3xx = 3,
    Error4xx = 4,
    Error5xx = 5,
    ErrorCtrlC = 130,
}

impl ExitStatus {
    /// Exit status for an HTTP status code when `--check-status` is on
    pub fn from_http_status(code: u16) -> Self {
        match code {
            300..=399 => ExitStatus::Error3xx,
            400..=499 => ExitStatus::Error4xx,
            500..=599 => ExitStatus::Error5xx,
            _ => ExitStatus::Success,
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(status.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_status_should_map_http_status_classes() {
        assert_eq!(ExitStatus::from_http_status(200), ExitStatus::Success);
        assert_eq!(ExitStatus::from_http_status(301), ExitStatus::Error3xx);
        assert_eq!(ExitStatus::from_http_status(404), ExitStatus::Error4xx);
        assert_eq!(ExitStatus::from_http_status(503), ExitStatus::Error5xx);
    }

    #[test]
    fn exit_status_should_expose_process_codes() {
        assert_eq!(ExitStatus::Success.code(), 0);
        assert_eq!(ExitStatus::Error.code(), 1);
        assert_eq!(ExitStatus::ErrorCtrlC.code(), 130);
    }
}
