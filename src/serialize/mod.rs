//! JSON export of a catalog.
//!
//! The export walks the entity graph from the catalog root:
//! - the first visit of an entity writes an object with an `@id` token
//!   followed by its properties in alphabetical order
//! - later visits write `{"@ref": token}` only, which bounds output on
//!   cyclic graphs
//! - properties named by the [`FieldFilter`] are dropped for every kind
//! - enumerated values are written as their label
//!
//! The output stream is written through an internal buffer which is flushed
//! on success. The caller's writer is never closed.

mod error;
mod filter;
mod identity;

pub use error::SerializationError;
pub use filter::{FieldFilter, REFERENCE_PROPERTIES, SKIP_REFERENCES};
pub use identity::{IdentityAssigner, IdentityStrategy, Token};

use crate::catalog::{Catalog, CatalogObject, PropertyValue};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::cell::RefCell;
use std::io::{BufWriter, Write};
use std::ops::Deref;

/// Key holding an entity's token on its first (full) occurrence
pub const ID_KEY: &str = "@id";
/// Key holding the token on every later occurrence
pub const REF_KEY: &str = "@ref";

/// Settings fixed for one export call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    pub identity: IdentityStrategy,
    /// Indented output; compact when false
    pub pretty: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            identity: IdentityStrategy::Sequential,
            pretty: true,
        }
    }
}

/// Serialize `catalog` as JSON to `destination` with default options.
///
/// A missing destination or a catalog with unresolved references fails
/// before anything is written.
pub fn serialize<W: Write>(
    catalog: &Catalog,
    destination: Option<W>,
) -> Result<(), SerializationError> {
    serialize_with(catalog, destination, &ExportOptions::default())
}

/// Serialize `catalog` as JSON to `destination`
pub fn serialize_with<W: Write>(
    catalog: &Catalog,
    destination: Option<W>,
    options: &ExportOptions,
) -> Result<(), SerializationError> {
    let destination = destination.ok_or(SerializationError::MissingDestination)?;
    catalog.validate()?;

    let filter = FieldFilter::skip_references();
    ExportEngine::new(catalog, &filter, *options).write(catalog, destination)
}

/// Graph walker bound to one catalog and one filter
pub struct ExportEngine<'a> {
    catalog: &'a Catalog,
    filter: &'a FieldFilter,
    options: ExportOptions,
}

impl<'a> ExportEngine<'a> {
    pub fn new(catalog: &'a Catalog, filter: &'a FieldFilter, options: ExportOptions) -> Self {
        Self {
            catalog,
            filter,
            options,
        }
    }

    /// Write `root` and everything reachable from it.
    ///
    /// Each call uses a fresh identity map, so tokens never leak between
    /// exports.
    pub fn write<W: Write>(
        &self,
        root: &'a dyn CatalogObject,
        destination: W,
    ) -> Result<(), SerializationError> {
        let state = ExportState {
            catalog: self.catalog,
            filter: self.filter,
            identities: RefCell::new(IdentityAssigner::new(self.options.identity)),
        };
        let node = ObjectNode {
            object: root,
            state: &state,
        };

        log::debug!(
            "Exporting {} '{}' with filter '{}'",
            root.kind(),
            self.catalog.name,
            self.filter.name()
        );

        let mut writer = BufWriter::new(destination);
        if self.options.pretty {
            serde_json::to_writer_pretty(&mut writer, &node)?;
        } else {
            serde_json::to_writer(&mut writer, &node)?;
        }
        writer.flush()?;

        log::debug!(
            "Exported {} distinct objects",
            state.identities.borrow().len()
        );
        Ok(())
    }
}

struct ExportState<'a> {
    catalog: &'a Catalog,
    filter: &'a FieldFilter,
    identities: RefCell<IdentityAssigner>,
}

struct ObjectNode<'s, 'a> {
    object: &'a dyn CatalogObject,
    state: &'s ExportState<'a>,
}

impl Serialize for ObjectNode<'_, '_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let (token, first_sight) = self.state.identities.borrow_mut().token_for(self.object);
        if !first_sight {
            let mut map = serializer.serialize_map(Some(1))?;
            map.serialize_entry(REF_KEY, &token)?;
            return map.end();
        }

        let mut properties = self.object.properties(self.state.catalog);
        properties.retain(|p| !self.state.filter.is_excluded(p.name));
        properties.sort_by(|a, b| a.name.cmp(b.name));

        let mut map = serializer.serialize_map(Some(properties.len() + 1))?;
        map.serialize_entry(ID_KEY, &token)?;
        for property in &properties {
            let value = ValueNode {
                value: &property.value,
                state: self.state,
            };
            map.serialize_entry(property.name, &value)?;
        }
        map.end()
    }
}

struct ValueNode<'v, 's, 'a> {
    value: &'v PropertyValue<'a>,
    state: &'s ExportState<'a>,
}

impl Serialize for ValueNode<'_, '_, '_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.value {
            PropertyValue::Null => serializer.serialize_unit(),
            PropertyValue::Bool(b) => serializer.serialize_bool(*b),
            PropertyValue::Int(i) => serializer.serialize_i64(*i),
            PropertyValue::Text(s) => serializer.serialize_str(s),
            PropertyValue::Label(label) => serializer.serialize_str(label),
            PropertyValue::Object(object) => ObjectNode {
                object: *object,
                state: self.state,
            }
            .serialize(serializer),
            PropertyValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(&ValueNode {
                        value: item,
                        state: self.state,
                    })?;
                }
                seq.end()
            }
            PropertyValue::Attributes(map) => map.serialize(serializer),
        }
    }
}

/// Catalog decorator that saves itself as JSON
#[derive(Debug, Clone)]
pub struct JsonSerializedCatalog {
    catalog: Catalog,
    options: ExportOptions,
}

impl JsonSerializedCatalog {
    pub fn new(catalog: Catalog) -> Self {
        Self::with_options(catalog, ExportOptions::default())
    }

    pub fn with_options(catalog: Catalog, options: ExportOptions) -> Self {
        Self { catalog, options }
    }

    /// Serialize the catalog to `out`.
    ///
    /// Pass `&mut writer` to keep using the writer afterwards.
    pub fn save<W: Write>(&self, out: W) -> Result<(), SerializationError> {
        serialize_with(&self.catalog, Some(out), &self.options)
    }

    /// Serialize the catalog into a string
    pub fn to_json_string(&self) -> Result<String, SerializationError> {
        let mut buffer = Vec::new();
        self.save(&mut buffer)?;
        String::from_utf8(buffer)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e).into())
    }

    pub fn into_inner(self) -> Catalog {
        self.catalog
    }
}

impl Deref for JsonSerializedCatalog {
    type Target = Catalog;

    fn deref(&self) -> &Catalog {
        &self.catalog
    }
}
