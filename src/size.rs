//! Size expressions: `"100MiB"` to bytes and bytes back to `"100.0 MiB"`.

use crate::error::SizeParseError;

const DECIMAL_PREFIXES: [&str; 6] = ["k", "M", "G", "T", "P", "E"];
const BINARY_PREFIXES: [&str; 6] = ["Ki", "Mi", "Gi", "Ti", "Pi", "Ei"];

/// Upper-cased suffixes and their multipliers. Decimal and binary suffixes
/// never end the same way, so the order of the table does not matter.
const SUFFIXES: [(&str, u64); 6] = [
    ("KB", 1000),
    ("MB", 1000 * 1000),
    ("GB", 1000 * 1000 * 1000),
    ("KIB", 1024),
    ("MIB", 1024 * 1024),
    ("GIB", 1024 * 1024 * 1024),
];

/// How [`format_size_with`] renders a byte count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeFormat {
    /// Base-1000 units (`kB`, `MB`) instead of base-1024 (`KiB`, `MiB`).
    pub si: bool,
    /// Separator between the integer part and the single decimal digit.
    pub decimal_separator: char,
}

impl Default for SizeFormat {
    fn default() -> Self {
        Self {
            si: false,
            decimal_separator: '.',
        }
    }
}

impl SizeFormat {
    pub fn si(si: bool) -> Self {
        Self {
            si,
            ..Self::default()
        }
    }

    fn unit(&self) -> u64 {
        if self.si { 1000 } else { 1024 }
    }

    fn prefixes(&self) -> &'static [&'static str; 6] {
        if self.si {
            &DECIMAL_PREFIXES
        } else {
            &BINARY_PREFIXES
        }
    }
}

/// Parse a size expression like `"1024"`, `"10KB"` or `"1GiB"` into bytes.
///
/// Suffixes are case-insensitive. The number must be an unsigned integer.
pub fn parse_size(input: &str) -> Result<u64, SizeParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(SizeParseError::Empty);
    }

    let upper = trimmed.to_ascii_uppercase();
    let (number, multiplier) = SUFFIXES
        .iter()
        .find_map(|(suffix, multiplier)| {
            upper
                .strip_suffix(suffix)
                .map(|rest| (rest.trim_end(), *multiplier))
        })
        .unwrap_or((upper.as_str(), 1));

    if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SizeParseError::InvalidNumber {
            input: input.to_string(),
        });
    }

    number
        .parse::<u64>()
        .ok()
        .and_then(|n| n.checked_mul(multiplier))
        .ok_or_else(|| SizeParseError::Overflow {
            input: input.to_string(),
        })
}

/// Render `bytes` with one decimal digit and `.` as separator.
pub fn format_size(bytes: u64, si: bool) -> String {
    format_size_with(bytes, SizeFormat::si(si))
}

/// Render `bytes` as `"<n> B"` below one unit, otherwise as
/// `"<whole><sep><tenth> <prefix>B"` using the largest fitting prefix.
///
/// The tenth is rounded half-up.
pub fn format_size_with(bytes: u64, format: SizeFormat) -> String {
    let unit = format.unit();
    if bytes < unit {
        return format!("{bytes} B");
    }

    let prefixes = format.prefixes();
    let mut exp = 0;
    let mut divisor: u64 = 1;
    while exp < prefixes.len() && bytes / divisor >= unit {
        divisor *= unit;
        exp += 1;
    }

    let divisor = u128::from(divisor);
    let tenths = (u128::from(bytes) * 10 + divisor / 2) / divisor;
    format!(
        "{}{}{} {}B",
        tenths / 10,
        format.decimal_separator,
        tenths % 10,
        prefixes[exp - 1]
    )
}
