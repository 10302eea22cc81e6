//! Typed hierarchy of entities migrated in one run.

use std::collections::{BTreeMap, HashSet};

use tpgh_core::{EntityType, ParentRef, SourceEntity};

/// Entities grouped by level, iterated parents first.
///
/// Each node keeps its `parent_ref` edge; the parent itself may be absent
/// when it is done, owned by another team, or otherwise outside the run.
#[derive(Debug, Default, Clone)]
pub struct MigrationTree {
    levels: BTreeMap<EntityType, Vec<SourceEntity>>,
    keys: HashSet<ParentRef>,
}

impl MigrationTree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity. Tasks and repeated `(type, id)` pairs are ignored.
    pub fn insert(&mut self, entity: SourceEntity) -> bool {
        if entity.entity_type == EntityType::Task {
            return false;
        }
        if !self.keys.insert(key(&entity)) {
            return false;
        }
        self.levels.entry(entity.entity_type).or_default().push(entity);
        true
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Every node, level by level from projects down, each level in insertion
    /// order.
    pub fn iter(&self) -> impl Iterator<Item = &SourceEntity> {
        self.levels.values().flatten()
    }
}

impl FromIterator<SourceEntity> for MigrationTree {
    fn from_iter<I: IntoIterator<Item = SourceEntity>>(iter: I) -> Self {
        let mut tree = Self::new();
        for entity in iter {
            tree.insert(entity);
        }
        tree
    }
}

const fn key(entity: &SourceEntity) -> ParentRef {
    ParentRef {
        entity_type: entity.entity_type,
        id: entity.id,
    }
}
