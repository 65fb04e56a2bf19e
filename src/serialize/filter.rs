//! Property exclusion applied to every entity kind.

use ahash::AHashSet;

/// Name of the default back-reference filter
pub const SKIP_REFERENCES: &str = "skip_references";

/// Properties that point back up or across the graph and are never exported.
///
/// Older exports listed `inportedForeignKeys` here, which excluded nothing;
/// the correct spelling is used.
pub const REFERENCE_PROPERTIES: [&str; 3] = ["parent", "exportedForeignKeys", "importedForeignKeys"];

/// Type-agnostic property exclusion set
#[derive(Debug, Clone)]
pub struct FieldFilter {
    name: String,
    excluded: AHashSet<String>,
}

impl FieldFilter {
    /// Filter that serializes everything except `names`
    pub fn serialize_all_except<I, S>(name: impl Into<String>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            excluded: names.into_iter().map(Into::into).collect(),
        }
    }

    /// The default back-reference filter
    pub fn skip_references() -> Self {
        Self::serialize_all_except(SKIP_REFERENCES, REFERENCE_PROPERTIES)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_excluded(&self, property: &str) -> bool {
        self.excluded.contains(property)
    }
}

impl Default for FieldFilter {
    fn default() -> Self {
        Self::skip_references()
    }
}
