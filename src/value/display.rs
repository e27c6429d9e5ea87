//! Display implementations for values.

use chrono::FixedOffset;

use super::{Time, Value};

impl core::fmt::Display for Time {
    /// Format as `YYYY-MM-DD HH:MM:SS[.fraction]` followed by `UTC` for plain
    /// instants or the `+HHMM` offset of the attached zone.
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let Some(utc) = self.to_datetime() else {
            // Beyond chrono's calendar range.
            return write!(f, "{}.{:09}", self.unix_seconds(), self.subsec_nanos());
        };
        match self.zone_offset().and_then(FixedOffset::east_opt) {
            Some(offset) => write!(
                f,
                "{}",
                utc.with_timezone(&offset).format("%Y-%m-%d %H:%M:%S%.f %z")
            ),
            None => write!(f, "{}", utc.format("%Y-%m-%d %H:%M:%S%.f UTC")),
        }
    }
}

impl core::fmt::Display for Value {
    /// Format the value the way the textual fallback renders it; raw bytes are
    /// shown in PostgreSQL's `\x` hex notation.
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Boolean(v) => write!(f, "{v}"),
            Value::Integer(v) => write!(f, "{v}"),
            Value::Real(v) => f.write_str(ryu::Buffer::new().format(*v)),
            Value::Text(s) => f.write_str(s),
            Value::Bytes(b) => {
                f.write_str("\\x")?;
                for byte in b {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
            Value::Time(t) => write!(f, "{t}"),
            Value::Object(object) => {
                f.write_str(&alloc::string::String::from_utf8_lossy(&object.to_text()))
            }
        }
    }
}
