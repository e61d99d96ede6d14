/// Size formatting utilities: human-readable byte counts.
///
/// All internal sizes are `u64` bytes. Floating point is only used
/// at the display-formatting boundary. `formatSize` in
/// `assets/explorer.js` must produce the same strings.

const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Format a byte count with one decimal place, e.g. `1.5 KB`.
pub fn format_size(bytes: u64) -> String {
    format_size_with(bytes, 1)
}

/// Format a byte count into a human-readable string with `decimals` places.
///
/// Uses binary units (KiB = 1024) but labels them with common short forms
/// (KB, MB, GB, TB). Plain byte counts are printed without decimals.
/// Ties round away from zero (`1.25 KB` -> `1.3 KB`), matching
/// `Math.round` in the viewer rather than the formatter's half-to-even.
pub fn format_size_with(bytes: u64, decimals: usize) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{bytes} B")
    } else {
        let scale = 10f64.powi(decimals as i32);
        let rounded = (value * scale).round() / scale;
        format!("{rounded:.decimals$} {}", UNITS[unit])
    }
}

/// Format a count with comma thousands separators, e.g. `12,345`.
pub fn format_count(count: u64) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size_bytes() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(1023), "1023 B");
    }

    #[test]
    fn test_format_size_kb() {
        assert_eq!(format_size(1024), "1.0 KB");
        assert_eq!(format_size(1536), "1.5 KB");
    }

    #[test]
    fn test_format_size_rounds_ties_up() {
        // 1280 B = 1.25 KB, 3328 B = 3.25 KB.
        assert_eq!(format_size(1280), "1.3 KB");
        assert_eq!(format_size(3328), "3.3 KB");
        // 1152 B = 1.125 KB.
        assert_eq!(format_size_with(1152, 2), "1.13 KB");
    }

    #[test]
    fn test_format_size_mb() {
        assert_eq!(format_size(1_048_576), "1.0 MB");
    }

    #[test]
    fn test_format_size_gb() {
        assert_eq!(format_size(1_073_741_824), "1.0 GB");
    }

    #[test]
    fn test_format_size_caps_at_tb() {
        assert_eq!(format_size(1_099_511_627_776), "1.0 TB");
        assert_eq!(format_size(1_099_511_627_776 * 2048), "2048.0 TB");
    }

    #[test]
    fn test_format_size_with_two_decimals() {
        assert_eq!(format_size_with(1_073_741_824, 2), "1.00 GB");
        assert_eq!(format_size_with(0, 2), "0 B");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_000), "1,000");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }
}
