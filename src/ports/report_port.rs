//! Report generation port trait.

use crate::domain::error::ScanError;
use crate::domain::whale_scan::WhaleMatch;
use std::path::Path;

/// Port for persisting watch-list scan matches.
pub trait ReportPort {
    fn write(&self, matches: &[WhaleMatch], output_path: &Path) -> Result<(), ScanError>;
}
