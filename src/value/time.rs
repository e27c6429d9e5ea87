//! Points in time as seen by the `Timestamp` encoder.

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};

/// Nanoseconds in one second.
const NANOS_PER_SEC: u32 = 1_000_000_000;

/// Largest accepted UTC offset magnitude, exclusive (one day).
const MAX_OFFSET_SECS: i32 = 86_400;

/// A point in time: seconds and nanoseconds since 1970-01-01T00:00:00Z,
/// optionally carrying the fixed UTC offset of the zone it is expressed in.
///
/// A `Time` without an offset is a plain UTC instant. Converting to local
/// time ([`Time::to_local`]) attaches the offset of a [`LocalZone`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Time {
    secs: i64,
    nanos: u32,
    utc_offset: Option<i32>,
}

impl Time {
    /// Create a UTC instant. Returns `None` if `nanos` is not below one second.
    #[must_use]
    pub fn from_unix(secs: i64, nanos: u32) -> Option<Self> {
        (nanos < NANOS_PER_SEC).then_some(Self {
            secs,
            nanos,
            utc_offset: None,
        })
    }

    /// Create a UTC instant from fractional seconds since the Unix epoch.
    ///
    /// Returns `None` for non-finite values or values outside the `i64` range.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss, clippy::cast_sign_loss)]
    pub fn from_unix_f64(secs: f64) -> Option<Self> {
        // 2^63, exactly representable.
        const BOUND: f64 = 9_223_372_036_854_775_808.0;
        if !secs.is_finite() || secs < -BOUND || secs >= BOUND {
            return None;
        }
        let mut whole = secs as i64;
        if whole as f64 > secs {
            whole -= 1;
        }
        let frac = secs - whole as f64;
        let nanos = ((frac * f64::from(NANOS_PER_SEC)) as u32).min(NANOS_PER_SEC - 1);
        Self::from_unix(whole, nanos)
    }

    /// Attach a fixed UTC offset in seconds east of UTC.
    ///
    /// Returns `None` if the offset is a day or more in either direction.
    #[must_use]
    pub fn with_utc_offset(self, offset: i32) -> Option<Self> {
        (offset.abs() < MAX_OFFSET_SECS).then_some(Self {
            utc_offset: Some(offset),
            ..self
        })
    }

    /// Whole seconds since the Unix epoch.
    #[must_use]
    pub fn unix_seconds(self) -> i64 {
        self.secs
    }

    /// Nanoseconds past the whole second.
    #[must_use]
    pub fn subsec_nanos(self) -> u32 {
        self.nanos
    }

    /// Microseconds past the whole second, truncated.
    #[must_use]
    pub fn subsec_micros(self) -> u32 {
        self.nanos / 1_000
    }

    /// Offset of the attached zone in seconds east of UTC; zero for plain UTC instants.
    #[must_use]
    pub fn utc_offset(self) -> i32 {
        self.utc_offset.unwrap_or(0)
    }

    /// The attached zone offset, if any.
    #[must_use]
    pub fn zone_offset(self) -> Option<i32> {
        self.utc_offset
    }

    /// The same instant expressed in `zone`.
    ///
    /// Any offset already attached is replaced by the offset `zone` has at
    /// this instant.
    #[must_use]
    pub fn to_local(self, zone: LocalZone) -> Self {
        Self {
            utc_offset: Some(zone.offset_at(self)),
            ..self
        }
    }

    /// The instant as a chrono UTC date-time, if it is within chrono's range.
    #[must_use]
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.secs, self.nanos)
    }
}

/// The zone timestamps are converted to when they are sent as local time.
///
/// ```
/// use pg_binary_encoder::{LocalZone, Time};
///
/// let zone = LocalZone::fixed(-5 * 3600).unwrap();
/// let time = Time::from_unix(0, 0).unwrap().with_utc_offset(3600).unwrap();
/// assert_eq!(time.to_local(zone).utc_offset(), -18_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocalZone(Zone);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Zone {
    Fixed(i32),
    #[cfg(feature = "local-time")]
    System,
}

impl LocalZone {
    /// Coordinated Universal Time.
    pub const UTC: Self = Self(Zone::Fixed(0));

    /// The zone of the running process, looked up for every instant so that
    /// daylight saving time is honored.
    #[cfg(feature = "local-time")]
    pub const SYSTEM: Self = Self(Zone::System);

    /// A zone with a fixed offset in seconds east of UTC.
    ///
    /// Returns `None` if the offset is a day or more in either direction.
    #[must_use]
    pub fn fixed(offset: i32) -> Option<Self> {
        (offset.abs() < MAX_OFFSET_SECS).then_some(Self(Zone::Fixed(offset)))
    }

    /// Offset of the zone at `time`, in seconds east of UTC.
    #[must_use]
    #[cfg_attr(not(feature = "local-time"), allow(unused_variables))]
    pub fn offset_at(self, time: Time) -> i32 {
        match self.0 {
            Zone::Fixed(offset) => offset,
            #[cfg(feature = "local-time")]
            Zone::System => system_offset(time.secs, time.nanos),
        }
    }
}

impl Default for LocalZone {
    /// `LocalZone::SYSTEM` with the `local-time` feature, [`LocalZone::UTC`]
    /// without it.
    fn default() -> Self {
        Self(DEFAULT_ZONE)
    }
}

#[cfg(feature = "local-time")]
const DEFAULT_ZONE: Zone = Zone::System;
#[cfg(not(feature = "local-time"))]
const DEFAULT_ZONE: Zone = Zone::Fixed(0);

#[cfg(feature = "local-time")]
fn system_offset(secs: i64, nanos: u32) -> i32 {
    use chrono::{Local, TimeZone};

    DateTime::from_timestamp(secs, nanos).map_or(0, |utc| {
        Local
            .offset_from_utc_datetime(&utc.naive_utc())
            .local_minus_utc()
    })
}

impl From<DateTime<Utc>> for Time {
    fn from(dt: DateTime<Utc>) -> Self {
        Self {
            secs: dt.timestamp(),
            // Leap seconds are reported as nanos >= 1e9.
            nanos: dt.timestamp_subsec_nanos().min(NANOS_PER_SEC - 1),
            utc_offset: None,
        }
    }
}

impl From<DateTime<FixedOffset>> for Time {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        Self {
            utc_offset: Some(dt.offset().local_minus_utc()),
            ..Self::from(dt.to_utc())
        }
    }
}

#[cfg(feature = "local-time")]
impl From<DateTime<chrono::Local>> for Time {
    fn from(dt: DateTime<chrono::Local>) -> Self {
        Self::from(dt.fixed_offset())
    }
}

impl From<NaiveDateTime> for Time {
    fn from(dt: NaiveDateTime) -> Self {
        Self::from(dt.and_utc())
    }
}
