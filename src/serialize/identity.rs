//! Per-export object identity.
//!
//! Tokens are keyed by instance address plus entity kind, never by value:
//! two columns both named `id` in different tables get different tokens.
//! Kind is part of the key because an entity embedded as the first field of
//! another (a primary key inside its table) can share that entity's address.

use crate::catalog::CatalogObject;
use ahash::AHashMap;
use serde::{Serialize, Serializer};
use std::fmt;
use uuid::Uuid;

/// How reference tokens are minted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdentityStrategy {
    /// "1", "2", ... in order of first visit; reproducible across runs
    #[default]
    Sequential,
    /// Random v4 UUIDs; unique across runs but not reproducible
    Uuid,
}

impl std::str::FromStr for IdentityStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sequential" | "seq" => Ok(IdentityStrategy::Sequential),
            "uuid" => Ok(IdentityStrategy::Uuid),
            _ => Err(format!(
                "Unknown identity strategy: {}. Valid options: sequential, uuid",
                s
            )),
        }
    }
}

impl fmt::Display for IdentityStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentityStrategy::Sequential => write!(f, "sequential"),
            IdentityStrategy::Uuid => write!(f, "uuid"),
        }
    }
}

/// Opaque reference token
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token(String);

impl Token {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Token {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

type ObjectKey = (usize, &'static str);

/// Mints and remembers one token per entity instance.
///
/// Create one per export; the map only grows.
#[derive(Debug, Default)]
pub struct IdentityAssigner {
    strategy: IdentityStrategy,
    minted: u64,
    tokens: AHashMap<ObjectKey, Token>,
}

impl IdentityAssigner {
    pub fn new(strategy: IdentityStrategy) -> Self {
        Self {
            strategy,
            minted: 0,
            tokens: AHashMap::new(),
        }
    }

    /// Token for this instance, and whether this is its first sight
    pub fn token_for(&mut self, object: &dyn CatalogObject) -> (Token, bool) {
        let key = object_key(object);
        if let Some(token) = self.tokens.get(&key) {
            return (token.clone(), false);
        }
        let token = self.mint();
        self.tokens.insert(key, token.clone());
        (token, true)
    }

    /// Number of distinct instances seen
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    fn mint(&mut self) -> Token {
        self.minted += 1;
        match self.strategy {
            IdentityStrategy::Sequential => Token(self.minted.to_string()),
            IdentityStrategy::Uuid => Token(Uuid::new_v4().to_string()),
        }
    }
}

fn object_key(object: &dyn CatalogObject) -> ObjectKey {
    let address = object as *const dyn CatalogObject as *const () as usize;
    (address, object.kind())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, Column, DatabaseInfo};

    #[test]
    fn test_same_instance_reuses_token() {
        let column = Column::new("id", "INTEGER");
        let mut assigner = IdentityAssigner::new(IdentityStrategy::Sequential);

        let (first, first_sight) = assigner.token_for(&column);
        let (second, second_sight) = assigner.token_for(&column);

        assert!(first_sight);
        assert!(!second_sight);
        assert_eq!(first, second);
        assert_eq!(assigner.len(), 1);
    }

    #[test]
    fn test_equal_instances_get_distinct_tokens() {
        let columns = [Column::new("id", "INTEGER"), Column::new("id", "INTEGER")];
        let mut assigner = IdentityAssigner::new(IdentityStrategy::Sequential);

        let (a, _) = assigner.token_for(&columns[0]);
        let (b, _) = assigner.token_for(&columns[1]);

        assert_ne!(a, b);
        assert_eq!(a.as_str(), "1");
        assert_eq!(b.as_str(), "2");
    }

    #[test]
    fn test_embedded_entity_does_not_collide_with_owner() {
        let catalog = Catalog::new("c", DatabaseInfo::new("SQLite", "sqlite"));
        let mut assigner = IdentityAssigner::new(IdentityStrategy::Sequential);

        let (owner, _) = assigner.token_for(&catalog);
        let (embedded, first_sight) = assigner.token_for(&catalog.database_info);

        assert!(first_sight);
        assert_ne!(owner, embedded);
    }

    #[test]
    fn test_uuid_tokens() {
        let columns = [Column::new("a", "TEXT"), Column::new("b", "TEXT")];
        let mut assigner = IdentityAssigner::new(IdentityStrategy::Uuid);

        let (a, _) = assigner.token_for(&columns[0]);
        let (b, _) = assigner.token_for(&columns[1]);

        assert_ne!(a, b);
        assert!(Uuid::parse_str(a.as_str()).is_ok());
    }

    #[test]
    fn test_strategy_from_str() {
        assert_eq!(
            "UUID".parse::<IdentityStrategy>(),
            Ok(IdentityStrategy::Uuid)
        );
        assert!("random".parse::<IdentityStrategy>().is_err());
    }
}
