use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Key of an entity in a document's entity map
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityKey(String);

impl EntityKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How text covered by an entity may be edited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mutability {
    /// Text can change freely; typing inside extends the entity
    #[default]
    Mutable,
    /// Text is atomic
    Immutable,
    /// Text can be removed word by word
    Segmented,
}

/// Annotation shared by a range of characters (link, image, mention ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub mutability: Mutability,

    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub data: Map<String, Value>,
}

impl Entity {
    pub fn new(kind: impl Into<String>, mutability: Mutability) -> Self {
        Self {
            kind: kind.into(),
            mutability,
            data: Map::new(),
        }
    }

    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn link(url: impl Into<String>) -> Self {
        Self::new("LINK", Mutability::Mutable).with_data("url", url.into())
    }

    pub fn image(src: impl Into<String>, alt: Option<String>) -> Self {
        let entity = Self::new("IMAGE", Mutability::Immutable).with_data("src", src.into());
        match alt {
            Some(alt) => entity.with_data("alt", alt),
            None => entity,
        }
    }

    pub fn is_mutable(&self) -> bool {
        self.mutability == Mutability::Mutable
    }
}

pub type EntityMap = BTreeMap<EntityKey, Entity>;
