use chrono::{DateTime, Utc};

use crate::export::encode::OutputFormat;

/// File name for an interactive export: `stitched-<YYYY-MM-DDTHH-MM-SS>.<ext>` (UTC).
pub fn export_file_name(format: OutputFormat, at: DateTime<Utc>) -> String {
    format!(
        "stitched-{}.{}",
        at.format("%Y-%m-%dT%H-%M-%S"),
        format.extension()
    )
}

/// File name for a batch item: `<match name>-merged.<ext>`.
pub fn batch_file_name(match_name: &str, format: OutputFormat) -> String {
    format!("{match_name}-merged.{}", format.extension())
}

#[cfg(test)]
#[path = "../../tests/unit/export/naming.rs"]
mod tests;
