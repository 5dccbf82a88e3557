// Registered Count Policy
//
// Student counts arrive as free text. Anything that is not an integer is
// stored as 0, negative values are clamped to 0 and values above MAX_COUNT
// are clamped to MAX_COUNT. The outcome records which rule applied so a
// coerced value is distinguishable from a typed one.

use serde::{Deserialize, Serialize};

/// Largest registered count stored for one item (200 envelopes)
pub const MAX_COUNT: u32 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CountInput {
    /// Non-negative integer as typed
    Parsed(u32),
    /// No leading integer; stored as 0
    Invalid,
    /// Negative integer; clamped to 0
    Negative(i64),
    /// Integer above `MAX_COUNT` (saturated at `u64::MAX`); stored as `MAX_COUNT`
    TooLarge(u64),
}

impl CountInput {
    /// Parse a raw count
    ///
    /// Leading/trailing whitespace is ignored and only the leading integer
    /// part is read, so `"12.7"` and `"12 students"` both give 12.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let (negative, rest) = match trimmed.as_bytes().first() {
            Some(b'-') => (true, &trimmed[1..]),
            Some(b'+') => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };

        let digits_end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        let digits = &rest[..digits_end];
        if digits.is_empty() {
            return CountInput::Invalid;
        }

        // Only overflow can fail here; the digit run is non-empty ASCII.
        let magnitude = digits.parse::<u64>().unwrap_or(u64::MAX);

        if negative {
            if magnitude == 0 {
                return CountInput::Parsed(0);
            }
            let value = i64::try_from(magnitude).map(|m| -m).unwrap_or(i64::MIN);
            CountInput::Negative(value)
        } else {
            match u32::try_from(magnitude) {
                Ok(n) if n <= MAX_COUNT => CountInput::Parsed(n),
                _ => CountInput::TooLarge(magnitude),
            }
        }
    }

    /// Count to store
    pub fn value(self) -> u32 {
        match self {
            CountInput::Parsed(n) => n,
            CountInput::Invalid | CountInput::Negative(_) => 0,
            CountInput::TooLarge(_) => MAX_COUNT,
        }
    }

    /// True when the stored value differs from what was typed
    pub fn was_coerced(self) -> bool {
        !matches!(self, CountInput::Parsed(_))
    }
}
