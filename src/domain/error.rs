//! Domain error types.

/// Top-level error type for bandscan.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("request to {url} failed: {reason}")]
    Http { url: String, reason: String },

    #[error("{url} answered with status {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("malformed response for {symbol}: {reason}")]
    Parse { symbol: String, reason: String },

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error("insufficient data for {symbol}: have {bars} bars, need {minimum}")]
    InsufficientData {
        symbol: String,
        bars: usize,
        minimum: usize,
    },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("report file {path} is locked, close it before running")]
    ReportLocked { path: String },

    #[error("failed to write report {path}: {reason}")]
    Report { path: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ScanError {
    /// True for failures that only affect one instrument in a scan.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ScanError::Http { .. }
                | ScanError::HttpStatus { .. }
                | ScanError::Parse { .. }
                | ScanError::NoData { .. }
                | ScanError::InsufficientData { .. }
        )
    }
}

impl From<&ScanError> for std::process::ExitCode {
    fn from(err: &ScanError) -> Self {
        let code: u8 = match err {
            ScanError::Io(_) | ScanError::ReportLocked { .. } | ScanError::Report { .. } => 1,
            ScanError::ConfigParse { .. } | ScanError::ConfigInvalid { .. } => 2,
            ScanError::Http { .. } | ScanError::HttpStatus { .. } | ScanError::Parse { .. } => 3,
            ScanError::NoData { .. } | ScanError::InsufficientData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
