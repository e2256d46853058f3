//! Byte-count formatting.
//!
//! Two renderings are supported: a raw kilobyte count (`"12K"`) and a
//! human-readable scaled form (`"1.5M"`). Both use binary (1024) units.

/// Number of bytes in one kilobyte tier.
const UNIT: u64 = 1024;

/// Unit letters used above the byte tier, in ascending order.
const UNITS: [char; 6] = ['K', 'M', 'G', 'T', 'P', 'E'];

/// Selects how byte counts are rendered for display.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SizeFormatter {
    /// Whole kilobytes, truncated toward zero (`1023` -> `"0K"`).
    #[default]
    Raw,

    /// Scaled units with one decimal digit (`1536` -> `"1.5K"`).
    Human,
}

impl SizeFormatter {
    /// Pick the formatter matching the `--human` flag.
    #[must_use]
    pub const fn from_human(human: bool) -> Self {
        if human { Self::Human } else { Self::Raw }
    }

    /// Render `size` bytes as a display string.
    #[must_use]
    pub fn format(self, size: u64) -> String {
        match self {
            Self::Raw => format_raw(size),
            Self::Human => format_human(size),
        }
    }
}

/// Format a byte count as whole kilobytes followed by `K`.
///
/// The division truncates, so anything below 1024 bytes renders as `"0K"`.
///
/// # Examples
///
/// ```
/// # use dirsize::utils::format_raw;
/// assert_eq!(format_raw(1023), "0K");
/// assert_eq!(format_raw(10240), "10K");
/// ```
#[must_use]
pub fn format_raw(size: u64) -> String {
    format!("{}K", size / UNIT)
}

/// Format a byte count using the largest binary unit that keeps the value
/// below 1024.
///
/// Values under 1024 are printed as plain bytes with a `B` suffix. Above that
/// the value is shown with one decimal place and a unit letter (`K`, `M`,
/// `G`, `T`, `P`, `E`). Exact powers of 1024 render as `1.0` of their own
/// tier.
///
/// # Examples
///
/// ```
/// # use dirsize::utils::format_human;
/// assert_eq!(format_human(1023), "1023B");
/// assert_eq!(format_human(1_048_576), "1.0M");
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_human(size: u64) -> String {
    if size < UNIT {
        return format!("{size}B");
    }

    let mut div = UNIT;
    let mut exp = 0;
    let mut n = size / UNIT;
    while n >= UNIT {
        div *= UNIT;
        exp += 1;
        n /= UNIT;
    }

    format!("{:.1}{}", size as f64 / div as f64, UNITS[exp])
}
