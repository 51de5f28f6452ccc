//! Units conversion and parsing utilities
//!
//! Converts configured megabyte sizes to byte counts, validates block size
//! strings handed to `fio`, and extracts throughput from its text report.

use thiserror::Error;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Convert a configured size in MB (binary, 1 MB = 1 MiB) to whole bytes
///
/// Rounds to the nearest byte and never returns 0 for a positive size.
///
/// # Examples
/// ```
/// use sbcbench::util::units::mb_to_bytes;
///
/// assert_eq!(mb_to_bytes(1.0), 1_048_576);
/// assert_eq!(mb_to_bytes(0.5), 524_288);
/// ```
pub fn mb_to_bytes(size_mb: f64) -> u64 {
    ((size_mb * BYTES_PER_MB).round() as u64).max(1)
}

/// Parse a block size in `fio` notation into bytes
///
/// Accepts a plain integer or an integer followed by `K`, `M` or `G`
/// (binary multiples, case-insensitive).
///
/// # Examples
/// ```
/// use sbcbench::util::units::parse_block_size;
///
/// assert_eq!(parse_block_size("4K").unwrap(), 4096);
/// assert_eq!(parse_block_size("1M").unwrap(), 1_048_576);
/// ```
pub fn parse_block_size(input: &str) -> Result<u64, String> {
    let input = input.trim();
    let split_pos = input
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(input.len());
    let (number_part, unit_part) = input.split_at(split_pos);

    let number: u64 = number_part
        .parse()
        .map_err(|_| format!("Invalid block size: {}", input))?;
    if number == 0 {
        return Err("Block size must be greater than 0".to_string());
    }

    let multiplier = match unit_part.to_ascii_uppercase().as_str() {
        "" => 1u64,
        "K" => 1024,
        "M" => 1024 * 1024,
        "G" => 1024 * 1024 * 1024,
        _ => return Err(format!("Unknown block size unit: {}", unit_part)),
    };

    number
        .checked_mul(multiplier)
        .ok_or_else(|| format!("Block size too large: {}", input))
}

/// Reasons a tool report does not yield a throughput figure
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ThroughputParseError {
    #[error("no bandwidth (BW=) line in tool output")]
    MissingBandwidth,
    #[error("invalid bandwidth value '{0}'")]
    InvalidNumber(String),
    #[error("bandwidth '{0}' is not a per-second rate")]
    NotARate(String),
    #[error("unknown bandwidth unit '{0}'")]
    UnknownUnit(String),
}

/// Extract throughput in decimal MB/s from a `fio` text report
///
/// Uses the first line containing `BW=` (any case, so group summaries
/// with `bw=` also match). The figure after it must look like
/// `<number>[ ]<unit>/s`; binary units are converted to decimal MB.
///
/// # Examples
/// ```
/// use sbcbench::util::units::parse_throughput;
///
/// let out = "  write: IOPS=117, BW=123.45MB/s (123MB/s)(7407MiB/60001msec)";
/// assert_eq!(parse_throughput(out).unwrap(), 123.45);
///
/// let mbps = parse_throughput("  read: IOPS=29, BW=100MiB/s").unwrap();
/// assert!((mbps - 104.8576).abs() < 1e-9);
/// ```
pub fn parse_throughput(output: &str) -> Result<f64, ThroughputParseError> {
    let (line, start) = output
        .lines()
        .find_map(|line| {
            line.to_ascii_uppercase()
                .find("BW=")
                .map(|pos| (line, pos + "BW=".len()))
        })
        .ok_or(ThroughputParseError::MissingBandwidth)?;

    let rest = line[start..].trim_start();
    let number_end = rest
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(rest.len());
    let (number_part, rest) = rest.split_at(number_end);

    let value: f64 = number_part
        .parse()
        .map_err(|_| ThroughputParseError::InvalidNumber(number_part.to_string()))?;

    let rest = rest.trim_start();
    let rate = rest
        .split(|c: char| c.is_whitespace() || c == '(' || c == ',')
        .next()
        .unwrap_or("");
    let unit = rate
        .strip_suffix("/s")
        .ok_or_else(|| ThroughputParseError::NotARate(rate.to_string()))?;

    let to_mb = match unit {
        "B" => 1e-6,
        "kB" | "KB" => 1e-3,
        "KiB" => 1024.0 / 1e6,
        "MB" => 1.0,
        "MiB" => BYTES_PER_MB / 1e6,
        "GB" => 1e3,
        "GiB" => 1024.0 * BYTES_PER_MB / 1e6,
        _ => return Err(ThroughputParseError::UnknownUnit(unit.to_string())),
    };

    Ok(value * to_mb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mb_to_bytes() {
        assert_eq!(mb_to_bytes(1.0), 1_048_576);
        assert_eq!(mb_to_bytes(10.0), 10_485_760);
        assert_eq!(mb_to_bytes(0.25), 262_144);
        // Sub-byte sizes still produce a non-empty target
        assert_eq!(mb_to_bytes(1e-9), 1);
    }

    #[test]
    fn test_parse_block_size() {
        assert_eq!(parse_block_size("512").unwrap(), 512);
        assert_eq!(parse_block_size("4K").unwrap(), 4096);
        assert_eq!(parse_block_size("4k").unwrap(), 4096);
        assert_eq!(parse_block_size("1M").unwrap(), 1_048_576);
        assert_eq!(parse_block_size("2G").unwrap(), 2_147_483_648);

        assert!(parse_block_size("0K").is_err());
        assert!(parse_block_size("K").is_err());
        assert!(parse_block_size("4X").is_err());
        assert!(parse_block_size("1.5M").is_err());
    }

    #[test]
    fn test_parse_throughput_decimal_mb() {
        let out = "seq: (groupid=0, jobs=4): err= 0\n  write: IOPS=117, BW=123.45 MB/s\n";
        assert_eq!(parse_throughput(out).unwrap(), 123.45);

        let out = "  write: IOPS=117, BW=123.45MB/s (123MB/s)(7407MiB/60001msec)";
        assert_eq!(parse_throughput(out).unwrap(), 123.45);
    }

    #[test]
    fn test_parse_throughput_binary_units() {
        let mbps = parse_throughput("  read: IOPS=29.4k, BW=115MiB/s (120MB/s)").unwrap();
        assert!((mbps - 115.0 * 1.048576).abs() < 1e-9);

        let mbps = parse_throughput("  randread: IOPS=250, BW=1000KiB/s (1024kB/s)").unwrap();
        assert!((mbps - 1.024).abs() < 1e-9);

        let mbps = parse_throughput("  read: BW=1GiB/s").unwrap();
        assert!((mbps - 1073.741824).abs() < 1e-6);
    }

    #[test]
    fn test_parse_throughput_group_summary_lowercase() {
        let out = "Run status group 0 (all jobs):\n  WRITE: bw=50.0MB/s (47.7MiB/s), 50.0MB/s-50.0MB/s";
        assert_eq!(parse_throughput(out).unwrap(), 50.0);
    }

    #[test]
    fn test_parse_throughput_uses_first_bandwidth_line() {
        let out = "  write: IOPS=1, BW=10.0MB/s\n  WRITE: bw=20.0MB/s";
        assert_eq!(parse_throughput(out).unwrap(), 10.0);
    }

    #[test]
    fn test_parse_throughput_failures() {
        assert_eq!(
            parse_throughput("fio-3.33\nno results here"),
            Err(ThroughputParseError::MissingBandwidth)
        );
        assert_eq!(
            parse_throughput("BW=fastMB/s"),
            Err(ThroughputParseError::InvalidNumber(String::new()))
        );
        assert_eq!(
            parse_throughput("BW=12MB"),
            Err(ThroughputParseError::NotARate("MB".to_string()))
        );
        assert_eq!(
            parse_throughput("BW=12XB/s"),
            Err(ThroughputParseError::UnknownUnit("XB".to_string()))
        );
        assert_eq!(parse_throughput(""), Err(ThroughputParseError::MissingBandwidth));
    }
}
