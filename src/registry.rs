//! Named encoder constructors.
//!
//! The connection layer picks encoders by name (for example from a type map
//! loaded from configuration). [`BUILTIN_ENCODERS`] lists the constructors this
//! crate ships with; a [`Registry`] starts from that table and can be extended
//! with application-defined names.
//!
//! # Example
//!
//! ```
//! use pg_binary_encoder::registry::{EncoderSpec, Registry};
//! use pg_binary_encoder::{Encode, Value};
//!
//! let registry = Registry::default();
//! let spec = EncoderSpec::new("FromBase64").with_elements(EncoderSpec::new("String"));
//! let encoder = registry.build(&spec)?;
//! assert_eq!(encoder.encode(&Value::from("aGk="))?, b"hi");
//! # Ok::<(), pg_binary_encoder::Error>(())
//! ```

use alloc::boxed::Box;
use alloc::string::String;
use hashbrown::DefaultHashBuilder;
use indexmap::IndexMap;

use crate::encoder::{CoderFlags, Encoder, EncoderKind};
use crate::errors::ConfigError;

/// Builds an encoder from its flags and, for composites, its element encoder.
pub type Constructor = fn(CoderFlags, Option<Encoder>) -> Result<Encoder, ConfigError>;

/// Constructors of the built-in encoders, by name.
pub const BUILTIN_ENCODERS: [(&str, Constructor); 8] = [
    ("Boolean", |flags, elements| {
        Encoder::new(EncoderKind::Boolean, flags, elements)
    }),
    ("Int2", |flags, elements| {
        Encoder::new(EncoderKind::Int2, flags, elements)
    }),
    ("Int4", |flags, elements| {
        Encoder::new(EncoderKind::Int4, flags, elements)
    }),
    ("Int8", |flags, elements| {
        Encoder::new(EncoderKind::Int8, flags, elements)
    }),
    ("String", |flags, elements| {
        Encoder::new(EncoderKind::String, flags, elements)
    }),
    ("Bytea", |flags, elements| {
        Encoder::new(EncoderKind::Bytea, flags, elements)
    }),
    ("Timestamp", |flags, elements| {
        Encoder::new(EncoderKind::Timestamp, flags, elements)
    }),
    ("FromBase64", |flags, elements| {
        Encoder::new(EncoderKind::FromBase64, flags, elements)
    }),
];

/// Declarative description of an encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncoderSpec {
    /// Registered name of the encoder.
    pub name: String,
    /// Behavioral flags.
    #[cfg_attr(feature = "serde", serde(default))]
    pub flags: CoderFlags,
    /// Element encoder, for composite encoders.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub elements: Option<Box<EncoderSpec>>,
}

impl EncoderSpec {
    /// Describe the encoder registered under `name`, with default flags.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            flags: CoderFlags::default(),
            elements: None,
        }
    }

    /// Set the flags.
    #[must_use]
    pub fn with_flags(mut self, flags: CoderFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Set the element encoder.
    #[must_use]
    pub fn with_elements(mut self, elements: EncoderSpec) -> Self {
        self.elements = Some(Box::new(elements));
        self
    }
}

/// A timestamp encoder's local zone is not part of its spec; rebuilding uses the
/// default zone.
impl From<&Encoder> for EncoderSpec {
    fn from(encoder: &Encoder) -> Self {
        Self {
            name: encoder.kind().name().into(),
            flags: encoder.flags(),
            elements: encoder.elements().map(|e| Box::new(EncoderSpec::from(e))),
        }
    }
}

/// Encoder constructors by name, in registration order.
#[derive(Debug, Clone)]
pub struct Registry {
    constructors: IndexMap<String, Constructor, DefaultHashBuilder>,
}

impl Registry {
    /// A registry without any names.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            constructors: IndexMap::with_hasher(DefaultHashBuilder::default()),
        }
    }

    /// A registry holding [`BUILTIN_ENCODERS`].
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        for (name, constructor) in BUILTIN_ENCODERS {
            registry.register(name, constructor);
        }
        registry
    }

    /// Register `constructor` under `name`, returning the constructor it replaces.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        constructor: Constructor,
    ) -> Option<Constructor> {
        let name = name.into();
        crate::trace_event!(trace, encoder = %name, "registering encoder");
        let previous = self.constructors.insert(name, constructor);
        if previous.is_some() {
            crate::trace_event!(debug, "replaced a previously registered encoder");
        }
        previous
    }

    /// The constructor registered under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Constructor> {
        self.constructors.get(name).copied()
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.constructors.keys().map(String::as_str)
    }

    /// Number of registered names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    /// Whether no name is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }

    /// Build the encoder described by `spec`, element encoders first.
    ///
    /// # Errors
    ///
    /// * [`ConfigError::UnknownEncoder`] if a name in `spec` is not registered.
    /// * Any error of the constructor, such as a composite without elements.
    pub fn build(&self, spec: &EncoderSpec) -> Result<Encoder, ConfigError> {
        let constructor = self
            .get(&spec.name)
            .ok_or_else(|| ConfigError::UnknownEncoder(spec.name.clone()))?;
        let elements = spec
            .elements
            .as_deref()
            .map(|elements| self.build(elements))
            .transpose()?;
        let encoder = constructor(spec.flags, elements)?;
        crate::trace_event!(
            debug,
            encoder = %spec.name,
            flags = spec.flags.bits(),
            "built encoder"
        );
        Ok(encoder)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}
