//! Version-indexed wire schemas
//!
//! A namespace owns one [`SchemaSet`]: an ordered list of
//! `(minimum version, codec)` pairs. Selection walks the list from the
//! newest threshold down and returns the first whose minimum is at or below
//! the device version. The set is built around a fallback codec at
//! version `0.0.0`, so selection is total.

use crate::error::PanosError;
use crate::version::Version;
use crate::xml::Element;

/// A version-specific structural encoding of a normalized entity
pub trait WireSchema: Sized {
    /// The normalized, version independent entity
    type Entry;

    /// Read the wire structure out of an `entry` element
    fn decode(elem: &Element) -> Result<Self, PanosError>;

    /// Write the wire structure as an `entry` element
    fn encode(&self) -> Element;

    /// Wire structure to normalized entity
    fn normalize(self) -> Self::Entry;

    /// Normalized entity to wire structure
    fn specify(entry: &Self::Entry) -> Self;
}

/// Element-level mapping functions for one wire schema
pub struct Codec<E> {
    name: &'static str,
    normalize: fn(&Element) -> Result<E, PanosError>,
    specify: fn(&E) -> Element,
}

impl<E> Clone for Codec<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for Codec<E> {}

impl<E> std::fmt::Debug for Codec<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Codec").field("name", &self.name).finish()
    }
}

fn normalize_with<W: WireSchema>(elem: &Element) -> Result<W::Entry, PanosError> {
    W::decode(elem).map(W::normalize)
}

fn specify_with<W: WireSchema>(entry: &W::Entry) -> Element {
    W::specify(entry).encode()
}

impl<E> Codec<E> {
    /// Codec for the wire schema `W`
    pub fn of<W: WireSchema<Entry = E>>(name: &'static str) -> Self {
        Self {
            name,
            normalize: normalize_with::<W>,
            specify: specify_with::<W>,
        }
    }

    /// Schema name, for logging
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Decode an `entry` element and normalize it
    pub fn normalize(&self, elem: &Element) -> Result<E, PanosError> {
        (self.normalize)(elem)
    }

    /// Specify an entity as an `entry` element
    pub fn specify(&self, entry: &E) -> Element {
        (self.specify)(entry)
    }
}

/// Ordered `(minimum version, codec)` pairs with a guaranteed fallback
#[derive(Debug, Clone)]
pub struct SchemaSet<E> {
    schemas: Vec<(Version, Codec<E>)>,
}

impl<E> SchemaSet<E> {
    /// Start a set from the fallback codec, which applies to every version
    pub fn new(fallback: Codec<E>) -> Self {
        Self {
            schemas: vec![(Version::default(), fallback)],
        }
    }

    /// Add a codec for devices at or above `min`.
    ///
    /// Thresholds are kept sorted; adding at an existing threshold replaces it.
    pub fn with(mut self, min: Version, codec: Codec<E>) -> Self {
        match self.schemas.binary_search_by(|(v, _)| v.cmp(&min)) {
            Ok(idx) => self.schemas[idx].1 = codec,
            Err(idx) => self.schemas.insert(idx, (min, codec)),
        }
        self
    }

    /// Codec for a device running `version`
    pub fn select(&self, version: &Version) -> Codec<E> {
        self.schemas
            .iter()
            .rev()
            .find(|(min, _)| version.gte(min))
            .map(|(_, codec)| *codec)
            .unwrap_or(self.schemas[0].1)
    }

    /// Minimum versions, ascending
    pub fn thresholds(&self) -> impl Iterator<Item = &Version> {
        self.schemas.iter().map(|(v, _)| v)
    }
}
