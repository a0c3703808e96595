use crate::error::LogError;
use serde::{Deserialize, Serialize};

/// A single friendship log record.
///
/// A live record has a nonzero slot equal to its 1-based position in the log.
/// A tombstone has all three fields set to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LogRecord {
    /// 1-based position of the record, or 0 for a tombstone.
    pub slot: u32,
    /// User who sent the friendship request.
    pub from: u32,
    /// User who received the friendship request.
    pub to: u32,
}

impl LogRecord {
    /// The record written over a removed edge.
    pub const TOMBSTONE: LogRecord = LogRecord {
        slot: 0,
        from: 0,
        to: 0,
    };

    /// Creates a live record.
    pub fn new(slot: u32, from: u32, to: u32) -> Self {
        Self { slot, from, to }
    }

    /// Returns true if this record marks a removed edge.
    pub fn is_tombstone(&self) -> bool {
        self.slot == 0
    }

    /// Serializes the record for a log with the given field width.
    ///
    /// Format: `{slot}\t{from}\t{to}\n`, each field right-aligned and padded
    /// with spaces to `width` characters.
    pub fn encode(&self, width: usize) -> Result<Vec<u8>, LogError> {
        for value in [self.slot, self.from, self.to] {
            if decimal_len(value) > width {
                return Err(LogError::FieldOverflow { value, width });
            }
        }
        let line = format!(
            "{:>width$}\t{:>width$}\t{:>width$}\n",
            self.slot, self.from, self.to
        );
        Ok(line.into_bytes())
    }

    /// Parses one record of exactly `3 * width + 3` bytes.
    ///
    /// Surrounding spaces in a field are ignored, so zero-padded and
    /// left-aligned fields are accepted as well.
    pub fn decode(data: &[u8], width: usize) -> Result<Self, LogError> {
        let expected = 3 * width + 3;
        if data.len() != expected {
            return Err(LogError::Corrupted(format!(
                "record is {} bytes, expected {expected}",
                data.len()
            )));
        }
        for (position, separator) in [(width, b'\t'), (2 * width + 1, b'\t'), (3 * width + 2, b'\n')] {
            if data[position] != separator {
                return Err(LogError::Corrupted(format!(
                    "expected separator {:?} at byte {position}",
                    char::from(separator)
                )));
            }
        }

        let slot = parse_field(&data[..width], "slot")?;
        let from = parse_field(&data[width + 1..2 * width + 1], "from")?;
        let to = parse_field(&data[2 * width + 2..3 * width + 2], "to")?;
        Ok(Self { slot, from, to })
    }
}

fn parse_field(raw: &[u8], name: &str) -> Result<u32, LogError> {
    let text = std::str::from_utf8(raw)
        .map_err(|e| LogError::Corrupted(format!("{name} field is not UTF-8: {e}")))?;
    text.trim()
        .parse::<u32>()
        .map_err(|e| LogError::Corrupted(format!("invalid {name} field {text:?}: {e}")))
}

fn decimal_len(mut value: u32) -> usize {
    let mut len = 1;
    while value >= 10 {
        value /= 10;
        len += 1;
    }
    len
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_default_width() {
        let bytes = LogRecord::new(1, 12, 345).encode(4).unwrap();
        assert_eq!(bytes, b"   1\t  12\t 345\n");
        assert_eq!(bytes.len(), 15);
    }

    #[test]
    fn test_encode_tombstone() {
        let bytes = LogRecord::TOMBSTONE.encode(4).unwrap();
        assert_eq!(bytes, b"   0\t   0\t   0\n");
        assert!(LogRecord::TOMBSTONE.is_tombstone());
    }

    #[test]
    fn test_encode_rejects_wide_values() {
        let err = LogRecord::new(1, 10_000, 2).encode(4).unwrap_err();
        match err {
            LogError::FieldOverflow { value, width } => {
                assert_eq!(value, 10_000);
                assert_eq!(width, 4);
            }
            other => panic!("Expected FieldOverflow, got {other:?}"),
        }
        assert!(LogRecord::new(9999, 9999, 9999).encode(4).is_ok());
    }

    #[test]
    fn test_decode_accepts_padding_variants() {
        assert_eq!(
            LogRecord::decode(b"   7\t   1\t   2\n", 4).unwrap(),
            LogRecord::new(7, 1, 2)
        );
        assert_eq!(
            LogRecord::decode(b"0007\t0001\t0002\n", 4).unwrap(),
            LogRecord::new(7, 1, 2)
        );
        assert_eq!(
            LogRecord::decode(b"7   \t1   \t2   \n", 4).unwrap(),
            LogRecord::new(7, 1, 2)
        );
    }

    #[test]
    fn test_decode_rejects_malformed_records() {
        assert!(matches!(
            LogRecord::decode(b"   1\t   2\t   3", 4),
            Err(LogError::Corrupted(_))
        ));
        assert!(matches!(
            LogRecord::decode(b"   1 \t  2\t   3\n", 4),
            Err(LogError::Corrupted(_))
        ));
        assert!(matches!(
            LogRecord::decode(b"  -1\t   2\t   3\n", 4),
            Err(LogError::Corrupted(_))
        ));
        assert!(matches!(
            LogRecord::decode(b"   x\t   2\t   3\n", 4),
            Err(LogError::Corrupted(_))
        ));
    }

    #[test]
    fn test_decimal_len() {
        assert_eq!(decimal_len(0), 1);
        assert_eq!(decimal_len(9), 1);
        assert_eq!(decimal_len(10), 2);
        assert_eq!(decimal_len(u32::MAX), 10);
    }
}
