//! Human-readable byte sizes for the preview panel.

const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
const BASE: u64 = 1024;

/// Format a byte count with binary units and at most two decimals.
///
/// ```ignore
/// assert_eq!(format_file_size(0), "0 Bytes");
/// assert_eq!(format_file_size(1536), "1.5 KB");
/// ```
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0;
    let mut scale = 1u64;
    while unit < UNITS.len() - 1 && bytes / scale >= BASE {
        scale *= BASE;
        unit += 1;
    }

    let value = format!("{:.2}", round_half_up(bytes as f64 / scale as f64));
    format!("{} {}", trim_decimals(&value), UNITS[unit])
}

/// Round a non-negative value to two decimals, ties away from zero.
///
/// `{:.2}` alone rounds exact ties to even (1.125 -> "1.12").
fn round_half_up(value: f64) -> f64 {
    (value * 100.0 + 0.5).floor() / 100.0
}

/// Like [`format_file_size`], with a leading `-` for negative counts.
pub fn format_signed_file_size(bytes: i64) -> String {
    let formatted = format_file_size(bytes.unsigned_abs());
    if bytes < 0 {
        format!("-{formatted}")
    } else {
        formatted
    }
}

/// Strip trailing zeros (and a dangling point) from a fixed-point string.
fn trim_decimals(value: &str) -> &str {
    if value.contains('.') {
        value.trim_end_matches('0').trim_end_matches('.')
    } else {
        value
    }
}
