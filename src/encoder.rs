//! The closed set of binary encoders and their configuration.

use core::fmt;
use core::ops::{BitOr, BitOrAssign};
use core::str::FromStr;

use crate::encoders::{Boolean, FromBase64, Int2, Int4, Int8, Passthrough, Timestamp};
use crate::encoding::{BINARY_FORMAT, flags};
use crate::errors::{ConfigError, EncodeError};
use crate::protocol::{Encode, Intermediate, Probe};
use crate::value::{LocalZone, Value};

/// Behavioral flags of an encoder.
///
/// Only the timestamp encoder interprets flags today; the other encoders
/// carry them unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CoderFlags(u32);

impl CoderFlags {
    /// Send timestamps as UTC.
    pub const TIMESTAMP_DB_UTC: Self = Self(flags::TIMESTAMP_DB_UTC);
    /// Send timestamps as local time.
    pub const TIMESTAMP_DB_LOCAL: Self = Self(flags::TIMESTAMP_DB_LOCAL);
    /// Interpret received timestamps as UTC.
    pub const TIMESTAMP_APP_UTC: Self = Self(flags::TIMESTAMP_APP_UTC);
    /// Interpret received timestamps as local time.
    pub const TIMESTAMP_APP_LOCAL: Self = Self(flags::TIMESTAMP_APP_LOCAL);

    /// Flags from raw bits, unknown bits included.
    #[must_use]
    pub const fn from_bits_retain(bits: u32) -> Self {
        Self(bits)
    }

    /// The raw bits.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Whether every bit of `other` is set. The empty flag set is always contained.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for CoderFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for CoderFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Discriminator of the encoder variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EncoderKind {
    /// [`Boolean`].
    Boolean,
    /// [`Int2`].
    Int2,
    /// [`Int4`].
    Int4,
    /// [`Int8`].
    Int8,
    /// [`Timestamp`].
    Timestamp,
    /// [`Passthrough`] for text.
    String,
    /// [`Passthrough`] for binary data.
    Bytea,
    /// [`FromBase64`].
    FromBase64,
}

impl EncoderKind {
    /// Every kind, in declaration order.
    pub const ALL: [EncoderKind; 8] = [
        EncoderKind::Boolean,
        EncoderKind::Int2,
        EncoderKind::Int4,
        EncoderKind::Int8,
        EncoderKind::Timestamp,
        EncoderKind::String,
        EncoderKind::Bytea,
        EncoderKind::FromBase64,
    ];

    /// The encoder's name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            EncoderKind::Boolean => "Boolean",
            EncoderKind::Int2 => "Int2",
            EncoderKind::Int4 => "Int4",
            EncoderKind::Int8 => "Int8",
            EncoderKind::Timestamp => "Timestamp",
            EncoderKind::String => "String",
            EncoderKind::Bytea => "Bytea",
            EncoderKind::FromBase64 => "FromBase64",
        }
    }

    /// Whether the kind wraps an element encoder.
    #[must_use]
    pub const fn is_composite(self) -> bool {
        matches!(self, EncoderKind::FromBase64)
    }

    /// Encoded width for fixed-size kinds.
    #[must_use]
    pub const fn fixed_width(self) -> Option<usize> {
        match self {
            EncoderKind::Boolean => Some(1),
            EncoderKind::Int2 => Some(Int2::WIDTH),
            EncoderKind::Int4 => Some(Int4::WIDTH),
            EncoderKind::Int8 => Some(Int8::WIDTH),
            // Raw strings pass through the timestamp encoder with their own length.
            EncoderKind::Timestamp
            | EncoderKind::String
            | EncoderKind::Bytea
            | EncoderKind::FromBase64 => None,
        }
    }
}

impl fmt::Display for EncoderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EncoderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EncoderKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| ConfigError::UnknownEncoder(s.into()))
    }
}

/// A configured binary encoder.
///
/// Encoders are immutable once built and cheap to share: wrap one in an
/// `Arc` to use it from several threads at once.
///
/// ```
/// use pg_binary_encoder::{CoderFlags, Encode, Encoder, EncoderKind, Value};
///
/// let bytea = Encoder::new(
///     EncoderKind::FromBase64,
///     CoderFlags::default(),
///     Some(Encoder::string()),
/// )?;
/// assert_eq!(bytea.encode(&Value::from("AAEC"))?, vec![0, 1, 2]);
/// # Ok::<(), pg_binary_encoder::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Encoder {
    flags: CoderFlags,
    variant: Variant,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Variant {
    Boolean(Boolean),
    Int2(Int2),
    Int4(Int4),
    Int8(Int8),
    Timestamp(Timestamp),
    String(Passthrough),
    Bytea(Passthrough),
    FromBase64(FromBase64<Encoder>),
}

impl Encoder {
    /// Build an encoder of the given kind.
    ///
    /// # Errors
    ///
    /// * [`ConfigError::MissingElements`] if a composite kind has no `elements`.
    /// * [`ConfigError::UnexpectedElements`] if a scalar kind is given `elements`.
    pub fn new(
        kind: EncoderKind,
        flags: CoderFlags,
        elements: Option<Encoder>,
    ) -> Result<Self, ConfigError> {
        let variant = match (kind, elements) {
            (EncoderKind::FromBase64, Some(elements)) => {
                Variant::FromBase64(FromBase64::new(elements))
            }
            (EncoderKind::FromBase64, None) => {
                return Err(ConfigError::MissingElements(kind.name()));
            }
            (_, Some(_)) => return Err(ConfigError::UnexpectedElements(kind.name())),
            (EncoderKind::Boolean, None) => Variant::Boolean(Boolean),
            (EncoderKind::Int2, None) => Variant::Int2(Int2),
            (EncoderKind::Int4, None) => Variant::Int4(Int4),
            (EncoderKind::Int8, None) => Variant::Int8(Int8),
            (EncoderKind::Timestamp, None) => Variant::Timestamp(Timestamp::new(flags)),
            (EncoderKind::String, None) => Variant::String(Passthrough),
            (EncoderKind::Bytea, None) => Variant::Bytea(Passthrough),
        };
        Ok(Self { flags, variant })
    }

    fn scalar(variant: Variant) -> Self {
        Self {
            flags: CoderFlags::default(),
            variant,
        }
    }

    /// A `Boolean` encoder.
    #[must_use]
    pub fn boolean() -> Self {
        Self::scalar(Variant::Boolean(Boolean))
    }

    /// An `Int2` encoder.
    #[must_use]
    pub fn int2() -> Self {
        Self::scalar(Variant::Int2(Int2))
    }

    /// An `Int4` encoder.
    #[must_use]
    pub fn int4() -> Self {
        Self::scalar(Variant::Int4(Int4))
    }

    /// An `Int8` encoder.
    #[must_use]
    pub fn int8() -> Self {
        Self::scalar(Variant::Int8(Int8))
    }

    /// A `String` encoder.
    #[must_use]
    pub fn string() -> Self {
        Self::scalar(Variant::String(Passthrough))
    }

    /// A `Bytea` encoder.
    #[must_use]
    pub fn bytea() -> Self {
        Self::scalar(Variant::Bytea(Passthrough))
    }

    /// A `Timestamp` encoder with the given flags.
    #[must_use]
    pub fn timestamp(flags: CoderFlags) -> Self {
        Self {
            flags,
            variant: Variant::Timestamp(Timestamp::new(flags)),
        }
    }

    /// A `Timestamp` encoder that sends local time in `zone`.
    #[must_use]
    pub fn timestamp_in(flags: CoderFlags, zone: LocalZone) -> Self {
        Self {
            flags,
            variant: Variant::Timestamp(Timestamp::new(flags).with_local_zone(zone)),
        }
    }

    /// A `FromBase64` encoder wrapping `elements`.
    #[must_use]
    pub fn from_base64(elements: Encoder) -> Self {
        Self::scalar(Variant::FromBase64(FromBase64::new(elements)))
    }

    /// The encoder's kind.
    #[must_use]
    pub fn kind(&self) -> EncoderKind {
        match &self.variant {
            Variant::Boolean(_) => EncoderKind::Boolean,
            Variant::Int2(_) => EncoderKind::Int2,
            Variant::Int4(_) => EncoderKind::Int4,
            Variant::Int8(_) => EncoderKind::Int8,
            Variant::Timestamp(_) => EncoderKind::Timestamp,
            Variant::String(_) => EncoderKind::String,
            Variant::Bytea(_) => EncoderKind::Bytea,
            Variant::FromBase64(_) => EncoderKind::FromBase64,
        }
    }

    /// The encoder's flags.
    #[must_use]
    pub fn flags(&self) -> CoderFlags {
        self.flags
    }

    /// The element encoder of a composite encoder.
    #[must_use]
    pub fn elements(&self) -> Option<&Encoder> {
        match &self.variant {
            Variant::FromBase64(composite) => Some(composite.elements()),
            _ => None,
        }
    }

    /// Format code of the encoded parameters: always binary.
    #[must_use]
    #[allow(clippy::unused_self)]
    pub fn format(&self) -> i16 {
        BINARY_FORMAT
    }

    fn as_encode(&self) -> &dyn Encode {
        match &self.variant {
            Variant::Boolean(e) => e,
            Variant::Int2(e) => e,
            Variant::Int4(e) => e,
            Variant::Int8(e) => e,
            Variant::Timestamp(e) => e,
            Variant::String(e) | Variant::Bytea(e) => e,
            Variant::FromBase64(e) => e,
        }
    }
}

impl Encode for Encoder {
    fn name(&self) -> &'static str {
        self.kind().name()
    }

    fn probe(&self, value: &Value) -> Result<Probe, EncodeError> {
        self.as_encode().probe(value)
    }

    fn write(
        &self,
        value: &Value,
        intermediate: Intermediate,
        out: &mut [u8],
    ) -> Result<usize, EncodeError> {
        self.as_encode().write(value, intermediate, out)
    }
}

// ============================================================================
// Arbitrary implementations for testing
// ============================================================================

#[cfg(feature = "testing")]
mod arbitrary_impl {
    use super::{CoderFlags, Encoder, EncoderKind, LocalZone};
    use arbitrary::{Arbitrary, Unstructured};

    /// Composite nesting bound, keeping generated encoders small.
    const MAX_DEPTH: usize = 3;

    fn arbitrary_encoder(u: &mut Unstructured<'_>, depth: usize) -> arbitrary::Result<Encoder> {
        let kind = *u.choose(&EncoderKind::ALL)?;
        let flags = CoderFlags::from_bits_retain(u.int_in_range(0..=3)?);
        if kind == EncoderKind::Timestamp {
            // A fixed zone keeps replayed inputs independent of the host.
            let zone = LocalZone::fixed(u.int_in_range(-86_399..=86_399)?)
                .ok_or(arbitrary::Error::IncorrectFormat)?;
            return Ok(Encoder::timestamp_in(flags, zone));
        }
        let elements = if kind.is_composite() {
            if depth >= MAX_DEPTH {
                return Ok(Encoder::string());
            }
            Some(arbitrary_encoder(u, depth + 1)?)
        } else {
            None
        };
        Encoder::new(kind, flags, elements).map_err(|_| arbitrary::Error::IncorrectFormat)
    }

    impl<'a> Arbitrary<'a> for Encoder {
        fn arbitrary(u: &mut Unstructured<'a>) -> arbitrary::Result<Self> {
            arbitrary_encoder(u, 0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_new_matches_shorthand_constructors() {
        let flags = CoderFlags::default();
        assert_eq!(
            Encoder::new(EncoderKind::Int8, flags, None).unwrap(),
            Encoder::int8()
        );
        assert_eq!(
            Encoder::new(EncoderKind::Bytea, flags, None).unwrap(),
            Encoder::bytea()
        );
        assert_eq!(
            Encoder::new(EncoderKind::FromBase64, flags, Some(Encoder::string())).unwrap(),
            Encoder::from_base64(Encoder::string())
        );
        assert_ne!(Encoder::string(), Encoder::bytea());
    }

    #[test]
    fn test_composite_needs_elements() {
        assert_eq!(
            Encoder::new(EncoderKind::FromBase64, CoderFlags::default(), None),
            Err(ConfigError::MissingElements("FromBase64"))
        );
        assert_eq!(
            Encoder::new(
                EncoderKind::Int2,
                CoderFlags::default(),
                Some(Encoder::int2())
            ),
            Err(ConfigError::UnexpectedElements("Int2"))
        );
    }

    #[test]
    fn test_accessors() {
        let ts = Encoder::timestamp(CoderFlags::TIMESTAMP_DB_LOCAL);
        assert_eq!(ts.kind(), EncoderKind::Timestamp);
        assert!(ts.flags().contains(CoderFlags::TIMESTAMP_DB_LOCAL));
        assert_eq!(ts.elements(), None);
        assert_eq!(ts.format(), 1);

        let zoned = Encoder::timestamp_in(CoderFlags::TIMESTAMP_DB_LOCAL, LocalZone::UTC);
        assert_eq!(zoned.flags(), ts.flags());
        assert_eq!(zoned.kind(), EncoderKind::Timestamp);

        let composite = Encoder::from_base64(ts.clone());
        assert_eq!(composite.elements(), Some(&ts));
        assert_eq!(composite.name(), "FromBase64");
    }

    #[test]
    fn test_kind_names_round_trip() {
        for kind in EncoderKind::ALL {
            assert_eq!(kind.name().parse::<EncoderKind>(), Ok(kind));
        }
        assert!("Float8".parse::<EncoderKind>().is_err());
    }

    #[test]
    fn test_fixed_widths_match_encoded_output() {
        assert_eq!(EncoderKind::Boolean.fixed_width(), Some(1));
        assert_eq!(
            Encoder::int2().encode(&Value::from(5i32)).unwrap().len(),
            EncoderKind::Int2.fixed_width().unwrap()
        );
        assert_eq!(EncoderKind::String.fixed_width(), None);
    }

    #[test]
    fn test_flags() {
        let combined = CoderFlags::TIMESTAMP_DB_LOCAL | CoderFlags::TIMESTAMP_APP_LOCAL;
        assert_eq!(combined.bits(), 3);
        assert!(combined.contains(CoderFlags::TIMESTAMP_APP_LOCAL));
        assert!(CoderFlags::default().contains(CoderFlags::TIMESTAMP_DB_UTC));
        assert!(!CoderFlags::default().contains(CoderFlags::TIMESTAMP_DB_LOCAL));
        let mut flags = CoderFlags::from_bits_retain(0x10);
        flags |= CoderFlags::TIMESTAMP_DB_LOCAL;
        assert_eq!(flags.bits(), 0x11);
    }

    #[test]
    fn test_dispatch() {
        assert_eq!(Encoder::boolean().encode(&Value::from(true)).unwrap(), vec![1]);
        assert_eq!(
            Encoder::from_base64(Encoder::bytea())
                .encode(&Value::from("AQID"))
                .unwrap(),
            vec![1, 2, 3]
        );
    }
}
