//! Encoder for the PostgreSQL `timestamp` and `timestamptz` types.
//!
//! PostgreSQL counts microseconds from 2000-01-01T00:00:00, while host times
//! count from the Unix epoch. The 10957 days between the two are subtracted
//! before scaling to microseconds.
//!
//! The following flags select the zone the timestamp is sent in:
//!
//! - [`TIMESTAMP_DB_UTC`](crate::encoding::flags::TIMESTAMP_DB_UTC): send as UTC (default).
//! - [`TIMESTAMP_DB_LOCAL`](crate::encoding::flags::TIMESTAMP_DB_LOCAL): send as local
//!   time, shifting by the offset the encoder's [`LocalZone`] has at that instant.
//!   An offset already attached to the value is ignored.
//!
//! String-like values are taken to be pre-encoded timestamps and pass through
//! unchanged.

use crate::encoder::CoderFlags;
use crate::encoders::Passthrough;
use crate::encoding::byte_order::write_i64;
use crate::encoding::epoch::{POSTGRES_EPOCH_UNIX_SECS, USECS_PER_SEC};
use crate::errors::EncodeError;
use crate::protocol::{Encode, Intermediate, Probe};
use crate::value::{LocalZone, Time, Value};

/// Encoded width in bytes.
const WIDTH: usize = 8;

/// Encoder for timestamps: signed 64-bit big-endian microseconds since
/// 2000-01-01T00:00:00.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Timestamp {
    flags: CoderFlags,
    local_zone: LocalZone,
}

impl Timestamp {
    /// Create a timestamp encoder with the given flags, sending local time in
    /// [`LocalZone::default`].
    #[must_use]
    pub fn new(flags: CoderFlags) -> Self {
        Self {
            flags,
            local_zone: LocalZone::default(),
        }
    }

    /// Use `zone` as the local zone.
    #[must_use]
    pub fn with_local_zone(self, zone: LocalZone) -> Self {
        Self {
            local_zone: zone,
            ..self
        }
    }

    /// The zone timestamps are sent in when sending local time.
    #[must_use]
    pub fn local_zone(&self) -> LocalZone {
        self.local_zone
    }

    /// The encoder's flags.
    #[must_use]
    pub fn flags(&self) -> CoderFlags {
        self.flags
    }

    /// Whether timestamps are sent as local time.
    #[must_use]
    pub fn sends_local(&self) -> bool {
        self.flags.contains(CoderFlags::TIMESTAMP_DB_LOCAL)
    }

    /// Convert the value to the time actually sent.
    fn prepare(&self, value: &Value) -> Result<Time, EncodeError> {
        let time = value.to_time()?;
        Ok(if self.sends_local() {
            time.to_local(self.local_zone)
        } else {
            time
        })
    }

    /// Microseconds since the PostgreSQL epoch, or `RangeOverflow` if they do
    /// not fit in 64 bits.
    fn microseconds(&self, time: Time) -> Result<i64, EncodeError> {
        let overflow = || EncodeError::RangeOverflow {
            value: alloc::format!("{time:?}"),
            width: WIDTH,
        };
        let mut micros = time
            .unix_seconds()
            .checked_sub(POSTGRES_EPOCH_UNIX_SECS)
            .and_then(|secs| secs.checked_mul(USECS_PER_SEC))
            .and_then(|usecs| usecs.checked_add(i64::from(time.subsec_micros())))
            .ok_or_else(overflow)?;
        if self.sends_local() {
            micros = i64::from(time.utc_offset())
                .checked_mul(USECS_PER_SEC)
                .and_then(|shift| micros.checked_add(shift))
                .ok_or_else(overflow)?;
        }
        Ok(micros)
    }
}

impl Encode for Timestamp {
    fn name(&self) -> &'static str {
        "Timestamp"
    }

    fn probe(&self, value: &Value) -> Result<Probe, EncodeError> {
        if value.as_raw_bytes().is_some() {
            return Passthrough.probe(value);
        }
        let time = self.prepare(value)?;
        // Overflow must surface before anything is allocated.
        self.microseconds(time)?;
        Ok(Probe::sized(WIDTH, Intermediate::Time(time)))
    }

    fn write(
        &self,
        value: &Value,
        intermediate: Intermediate,
        out: &mut [u8],
    ) -> Result<usize, EncodeError> {
        if value.as_raw_bytes().is_some() {
            return Passthrough.write(value, intermediate, out);
        }
        let time = match intermediate {
            Intermediate::Time(time) => time,
            _ => self.prepare(value)?,
        };
        write_i64(self.microseconds(time)?, out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    fn utc() -> Timestamp {
        Timestamp::new(CoderFlags::TIMESTAMP_DB_UTC)
    }

    fn local() -> Timestamp {
        Timestamp::new(CoderFlags::TIMESTAMP_DB_LOCAL)
    }

    fn decode(bytes: &[u8]) -> i64 {
        i64::from_be_bytes(bytes.try_into().unwrap())
    }

    #[test]
    fn test_postgres_epoch_is_zero() {
        let epoch = Value::from(Time::from_unix(946_684_800, 0).unwrap());
        assert_eq!(utc().encode(&epoch).unwrap(), vec![0u8; 8]);
    }

    #[test]
    fn test_unix_epoch_is_negative() {
        let value = Value::from(Time::from_unix(0, 0).unwrap());
        assert_eq!(
            decode(&utc().encode(&value).unwrap()),
            -946_684_800_000_000
        );
    }

    #[test]
    fn test_sub_second_precision_is_microseconds() {
        let value = Value::from(Time::from_unix(946_684_801, 123_456_789).unwrap());
        assert_eq!(decode(&utc().encode(&value).unwrap()), 1_123_456);
    }

    #[test]
    fn test_local_mode_adds_zone_offset() {
        let eastern = LocalZone::fixed(-18_000).unwrap();
        let value = Value::from(Time::from_unix(946_684_800, 0).unwrap());
        assert_eq!(decode(&utc().encode(&value).unwrap()), 0);
        assert_eq!(
            decode(&local().with_local_zone(eastern).encode(&value).unwrap()),
            -18_000 * 1_000_000
        );
    }

    #[test]
    fn test_local_mode_ignores_value_offset() {
        let time = Time::from_unix(946_684_800, 0)
            .unwrap()
            .with_utc_offset(2 * 3600)
            .unwrap();
        let value = Value::from(time);
        let in_utc = local().with_local_zone(LocalZone::UTC);
        assert_eq!(in_utc.encode(&value), utc().encode(&value));
        assert_eq!(decode(&in_utc.encode(&value).unwrap()), 0);
    }

    #[test]
    fn test_sizing_stores_zoned_time() {
        let zone = LocalZone::fixed(60).unwrap();
        let time = Time::from_unix(5, 0).unwrap();
        assert_eq!(
            local().with_local_zone(zone).probe(&Value::from(time)),
            Ok(Probe::sized(8, Intermediate::Time(time.to_local(zone))))
        );
    }

    #[test]
    fn test_default_local_zone() {
        assert_eq!(local().local_zone(), LocalZone::default());
    }

    #[test]
    fn test_raw_strings_pass_through() {
        let raw: Vec<u8> = vec![1, 2, 3, 4, 5, 6, 7, 8];
        let value = Value::from(raw.clone());
        assert_eq!(utc().probe(&value), Ok(Probe::sized(8, Intermediate::Empty)));
        assert_eq!(utc().encode(&value).unwrap(), raw);
        assert_eq!(local().encode(&value).unwrap(), raw);
    }

    #[test]
    fn test_numeric_seconds() {
        assert_eq!(
            decode(&utc().encode(&Value::from(946_684_860i64)).unwrap()),
            60_000_000
        );
    }

    #[test]
    fn test_unconvertible_value() {
        assert!(matches!(
            utc().probe(&Value::from(true)),
            Err(EncodeError::ConversionFailure { target: "time", .. })
        ));
    }

    #[test]
    fn test_overflow_is_reported() {
        let value = Value::from(Time::from_unix(i64::MAX, 0).unwrap());
        assert!(matches!(
            utc().probe(&value),
            Err(EncodeError::RangeOverflow { width: 8, .. })
        ));
    }
}
