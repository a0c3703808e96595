use serde::{Deserialize, Serialize};

/// Default width, in characters, of each record field.
pub const DEFAULT_FIELD_WIDTH: usize = 4;

/// Configuration for the friendship log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Width of each of the three record fields.
    ///
    /// A record is three right-aligned fields separated by tabs and terminated
    /// by a newline, so its size is `3 * field_width + 3` bytes. The width is
    /// part of the file format: a log must always be reopened with the width
    /// it was written with.
    ///
    /// Default: 4 (15-byte records)
    pub field_width: usize,

    /// Whether every append and tombstone is followed by `sync_data`.
    ///
    /// Default: true
    pub sync_on_write: bool,
}

impl LogConfig {
    /// Returns the size of one record in bytes.
    pub fn record_size(&self) -> usize {
        3 * self.field_width + 3
    }

    /// Returns the largest value that fits in one field.
    pub fn max_value(&self) -> u32 {
        u32::try_from(self.field_width)
            .ok()
            .and_then(|width| 10u32.checked_pow(width))
            .map_or(u32::MAX, |limit| limit - 1)
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            field_width: DEFAULT_FIELD_WIDTH,
            sync_on_write: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_record_size() {
        let config = LogConfig::default();
        assert_eq!(config.field_width, 4);
        assert!(config.sync_on_write);
        assert_eq!(config.record_size(), 15);
    }

    #[test]
    fn test_custom_width() {
        let config = LogConfig {
            field_width: 10,
            sync_on_write: false,
        };
        assert_eq!(config.record_size(), 33);
        assert_eq!(config.max_value(), u32::MAX);
    }

    #[test]
    fn test_max_value_by_width() {
        assert_eq!(LogConfig::default().max_value(), 9999);
        let config = LogConfig {
            field_width: 1,
            sync_on_write: true,
        };
        assert_eq!(config.max_value(), 9);
        let config = LogConfig {
            field_width: 9,
            sync_on_write: true,
        };
        assert_eq!(config.max_value(), 999_999_999);
    }
}
