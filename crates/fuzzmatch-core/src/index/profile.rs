//! Entity profiles

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::name::RawName;

/// A known entity: id, primary name, alternate names and opaque attributes.
///
/// Attributes and relationships are stored as given and never interpreted
/// by the matcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityProfile {
    pub id: String,
    pub primary_name: RawName,
    #[serde(default)]
    pub alternate_names: Vec<RawName>,
    #[serde(default)]
    pub attributes: Map<String, Value>,
    /// Relation type to related entity ids, ordered and de-duplicated
    #[serde(default)]
    pub relationships: BTreeMap<String, Vec<String>>,
}

impl EntityProfile {
    pub fn new(id: impl Into<String>, primary_name: impl Into<RawName>) -> Self {
        Self {
            id: id.into(),
            primary_name: primary_name.into(),
            alternate_names: Vec::new(),
            attributes: Map::new(),
            relationships: BTreeMap::new(),
        }
    }

    pub fn builder(id: impl Into<String>, primary_name: impl Into<RawName>) -> EntityProfileBuilder {
        EntityProfileBuilder {
            profile: Self::new(id, primary_name),
        }
    }

    /// Primary name first, then alternates in insertion order
    pub fn names(&self) -> impl Iterator<Item = &RawName> {
        std::iter::once(&self.primary_name).chain(self.alternate_names.iter())
    }

    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn related(&self, relation: &str) -> &[String] {
        self.relationships
            .get(relation)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Builder for [`EntityProfile`]
#[derive(Debug)]
pub struct EntityProfileBuilder {
    profile: EntityProfile,
}

impl EntityProfileBuilder {
    /// Add an alternate name. Duplicates and the primary name are ignored.
    pub fn alternate_name(mut self, name: impl Into<RawName>) -> Self {
        let name = name.into();
        if name != self.profile.primary_name && !self.profile.alternate_names.contains(&name) {
            self.profile.alternate_names.push(name);
        }
        self
    }

    pub fn alternate_names(self, names: impl IntoIterator<Item = impl Into<RawName>>) -> Self {
        names
            .into_iter()
            .fold(self, |builder, name| builder.alternate_name(name))
    }

    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.profile.attributes.insert(key.into(), value.into());
        self
    }

    pub fn attributes(mut self, attributes: Map<String, Value>) -> Self {
        self.profile.attributes.extend(attributes);
        self
    }

    pub fn relationship(mut self, relation: impl Into<String>, related_id: impl Into<String>) -> Self {
        let related_id = related_id.into();
        let ids = self.profile.relationships.entry(relation.into()).or_default();
        if !ids.contains(&related_id) {
            ids.push(related_id);
        }
        self
    }

    pub fn build(self) -> EntityProfile {
        self.profile
    }
}
