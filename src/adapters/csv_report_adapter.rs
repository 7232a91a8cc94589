//! CSV report adapter for watch-list matches.

use crate::domain::error::ScanError;
use crate::domain::whale_scan::WhaleMatch;
use crate::ports::report_port::ReportPort;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

pub struct CsvReportAdapter;

fn report_error(path: &Path, err: std::io::Error) -> ScanError {
    if err.kind() == ErrorKind::PermissionDenied {
        ScanError::ReportLocked {
            path: path.display().to_string(),
        }
    } else {
        ScanError::Report {
            path: path.display().to_string(),
            reason: err.to_string(),
        }
    }
}

impl ReportPort for CsvReportAdapter {
    /// Overwrites `output_path`, creating missing parent directories.
    fn write(&self, matches: &[WhaleMatch], output_path: &Path) -> Result<(), ScanError> {
        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| report_error(output_path, e))?;
        }

        let mut writer =
            csv::Writer::from_path(output_path).map_err(|e| match e.into_kind() {
                csv::ErrorKind::Io(io) => report_error(output_path, io),
                other => ScanError::Report {
                    path: output_path.display().to_string(),
                    reason: format!("{other:?}"),
                },
            })?;

        for row in matches {
            writer.serialize(row).map_err(|e| ScanError::Report {
                path: output_path.display().to_string(),
                reason: e.to_string(),
            })?;
        }
        writer.flush().map_err(|e| report_error(output_path, e))
    }
}
