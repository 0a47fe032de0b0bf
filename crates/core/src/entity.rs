use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Person,
    Company,
    Topic,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Person => write!(f, "person"),
            EntityKind::Company => write!(f, "company"),
            EntityKind::Topic => write!(f, "topic"),
        }
    }
}

/// A person, company or topic referenced by a signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRef {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: EntityKind,
    pub name: String,
}

impl EntityRef {
    pub fn new(id: impl Into<String>, kind: EntityKind, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            name: name.into(),
        }
    }

    pub fn key(&self) -> EntityKey {
        EntityKey {
            id: self.id.clone(),
            kind: self.kind,
        }
    }
}

/// Identity of an entity: two refs with the same id and kind are the same entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityKey {
    pub id: String,
    pub kind: EntityKind,
}

/// Insertion-ordered set of entities, unique by `(id, kind)`.
///
/// Serialized as a plain list; duplicates in incoming data keep the first
/// occurrence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<EntityRef>", into = "Vec<EntityRef>")]
pub struct EntitySet {
    entries: IndexMap<EntityKey, EntityRef>,
}

impl EntitySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entity. Returns `false` when it was already present.
    pub fn insert(&mut self, entity: EntityRef) -> bool {
        let key = entity.key();
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, entity);
        true
    }

    /// Remove an entity, keeping the order of the remaining ones.
    pub fn remove(&mut self, id: &str, kind: EntityKind) -> Option<EntityRef> {
        self.entries.shift_remove(&EntityKey {
            id: id.to_string(),
            kind,
        })
    }

    pub fn contains(&self, id: &str, kind: EntityKind) -> bool {
        self.entries.contains_key(&EntityKey {
            id: id.to_string(),
            kind,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntityRef> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<EntityRef>> for EntitySet {
    fn from(list: Vec<EntityRef>) -> Self {
        let mut set = EntitySet::new();
        for entity in list {
            set.insert(entity);
        }
        set
    }
}

impl From<EntitySet> for Vec<EntityRef> {
    fn from(set: EntitySet) -> Self {
        set.entries.into_values().collect()
    }
}

impl FromIterator<EntityRef> for EntitySet {
    fn from_iter<I: IntoIterator<Item = EntityRef>>(iter: I) -> Self {
        let mut set = EntitySet::new();
        for entity in iter {
            set.insert(entity);
        }
        set
    }
}
