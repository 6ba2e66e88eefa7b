//! Codec configuration.

use chrono::{FixedOffset, Offset, Utc};

/// Settings read by every Format and Scan call.
///
/// Owned by a `SchemaResolver` and passed down explicitly, so two resolvers
/// in one process (or two tests) can disagree about the time zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecConfig {
    /// Offset applied to UTC wire temporals before they reach a destination,
    /// and to `DateTime<Utc>` natives before they are rendered.
    pub timezone: FixedOffset,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self { timezone: Utc.fix() }
    }
}

impl CodecConfig {
    pub fn with_timezone(mut self, timezone: FixedOffset) -> Self {
        self.timezone = timezone;
        self
    }

    /// Shorthand for an east-of-UTC offset in whole hours. Out-of-range
    /// values leave the zone untouched.
    pub fn with_utc_offset_hours(self, hours: i32) -> Self {
        match hours.checked_mul(3600).and_then(FixedOffset::east_opt) {
            Some(tz) => self.with_timezone(tz),
            None => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utc_offset_hours() {
        let shanghai = CodecConfig::default().with_utc_offset_hours(8);
        assert_eq!(shanghai.timezone.local_minus_utc(), 8 * 3600);

        let west = CodecConfig::default().with_utc_offset_hours(-5);
        assert_eq!(west.timezone.local_minus_utc(), -5 * 3600);
    }

    #[test]
    fn test_out_of_range_offset_keeps_zone() {
        for hours in [24, 1_000_000, i32::MAX, i32::MIN] {
            assert_eq!(CodecConfig::default().with_utc_offset_hours(hours), CodecConfig::default());
        }
        let shanghai = CodecConfig::default().with_utc_offset_hours(8);
        assert_eq!(shanghai.with_utc_offset_hours(1_000_000), shanghai);
    }
}
