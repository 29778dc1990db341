//! Utility functions for the CLI.

use indicatif::{ProgressBar, ProgressStyle};
use oxigz_gzip::GzipHeader;
use std::time::Duration;

/// Create a byte-counting spinner, or a hidden bar when disabled.
pub fn create_progress_bar(enable: bool) -> ProgressBar {
    if !enable {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} [{elapsed_precise}] {bytes} written ({binary_bytes_per_sec})")
            .expect("progress bar template is valid"),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Diagnostic lines describing a parsed header.
pub fn header_lines(header: &GzipHeader) -> Vec<String> {
    let mut lines = Vec::new();

    match header.modification_time() {
        Some(mtime) => lines.push(format!("Last modified: {} (Unix timestamp)", mtime)),
        None => lines.push("Last modified: N/A".to_string()),
    }
    lines.push(format!("Extra flags: {}", header.extra_flags()));
    lines.push(format!("Operating system: {}", header.operating_system()));

    if header.is_text() {
        lines.push("Flag: Text".to_string());
    }
    if header.has_extra() {
        lines.push("Flag: Extra".to_string());
    }
    if let Some(name) = &header.filename {
        lines.push(format!("File name: {}", name));
    }
    if let Some(crc) = header.header_crc {
        lines.push(format!("Header CRC-16: {:04X}", crc));
    }
    if let Some(comment) = &header.comment {
        lines.push(format!("Comment: {}", comment));
    }

    lines
}

/// Throughput in MiB/s.
pub fn mib_per_sec(bytes: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64().max(1e-9);
    bytes as f64 / 1_048_576.0 / secs
}
