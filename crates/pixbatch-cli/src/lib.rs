//! Rendering helpers shared by the `pixbatch` binary.

use pixbatch_core::BatchSummary;
use pixbatch_processing::OutputFormat;
use pixbatch_storage::ObjectSummary;
use std::fmt::Write;
use std::path::Path;

const RULE_WIDTH: usize = 50;
const MAX_REASON_LEN: usize = 200;

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

/// Truncate a string to max_len characters, appending "..." if truncated.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Logical name for an uploaded file: the file stem plus the output extension.
///
/// Tokens the transformer would not recognise get `.webp`, matching the
/// default fallback policy.
pub fn logical_name(path: &Path, format: &str) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    let extension = OutputFormat::parse(format)
        .map(OutputFormat::extension)
        .unwrap_or(OutputFormat::WebP.extension());
    Some(format!("{}.{}", stem, extension))
}

/// `"{bytes} bytes ({kb} KB)"` with two decimals
pub fn format_size(bytes: u64) -> String {
    format!("{} bytes ({:.2} KB)", bytes, bytes as f64 / 1024.0)
}

pub fn render_summary(summary: &BatchSummary) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();
    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(
        out,
        "Upload Summary: {} succeeded, {} failed",
        summary.succeeded, summary.failed
    );
    let _ = writeln!(out, "{}", rule);

    if summary.failed > 0 {
        let _ = writeln!(out, "\nFailed files:");
        for result in summary.failures() {
            let reason = result.outcome.reason().unwrap_or_default();
            let _ = writeln!(
                out,
                "   - {}: {}",
                result.key,
                truncate_string(reason, MAX_REASON_LEN)
            );
        }
    }

    out
}

pub fn render_listing(objects: &[ObjectSummary]) -> String {
    if objects.is_empty() {
        return "No objects found in bucket\n".to_string();
    }

    let mut out = format!("Found {} object(s):\n\n", objects.len());
    for (i, object) in objects.iter().enumerate() {
        let _ = writeln!(out, "{}. {}", i + 1, object.key);
        let _ = writeln!(out, "   Size: {}\n", format_size(object.size));
    }
    out
}
