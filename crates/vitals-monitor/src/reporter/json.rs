//! JSON output for snapshot reports and export bundles

use anyhow::Result;
use serde::Serialize;

/// Renders reports and export bundles for log shippers and files
pub struct JsonReporter;

impl JsonReporter {
    /// One compact line per value, or indented output when `pretty` is set
    pub fn format<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String> {
        let rendered = match pretty {
            true => serde_json::to_string_pretty(value),
            false => serde_json::to_string(value),
        };
        Ok(rendered?)
    }
}
