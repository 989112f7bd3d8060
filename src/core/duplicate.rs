//! Entity duplication
//!
//! Cloning an order (or any other root entity) walks an explicit ownership
//! graph handed in by the caller, rather than discovering relations
//! reflectively. Owned children are cloned with fresh identifiers in
//! dependency order; references to entities outside the cloned set keep
//! pointing at the originals. An ownership cycle is a validation error.

use crate::domain::errors::CatalogueError;
use crate::domain::record::ScalarValue;
use crate::domain::result::Result;
use std::collections::{BTreeMap, BTreeSet, VecDeque};

/// Identity of an entity in the graph
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct EntityKey {
    pub kind: String,
    pub id: u64,
}

impl EntityKey {
    pub fn new(kind: impl Into<String>, id: u64) -> Self {
        Self {
            kind: kind.into(),
            id,
        }
    }
}

/// One entity with its scalar fields and outgoing references
#[derive(Debug, Clone)]
pub struct Entity {
    pub key: EntityKey,
    pub fields: BTreeMap<String, ScalarValue>,
    /// Ownership edge; owned entities are cloned along with their owner
    pub owner: Option<EntityKey>,
    /// Named references to other entities, cloned-set targets are rewritten
    pub references: BTreeMap<String, EntityKey>,
}

impl Entity {
    pub fn new(key: EntityKey) -> Self {
        Self {
            key,
            fields: BTreeMap::new(),
            owner: None,
            references: BTreeMap::new(),
        }
    }

    pub fn with_owner(mut self, owner: EntityKey) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<ScalarValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn with_reference(mut self, name: impl Into<String>, target: EntityKey) -> Self {
        self.references.insert(name.into(), target);
        self
    }
}

/// The ownership graph a duplication request operates on
#[derive(Debug, Default)]
pub struct EntityGraph {
    entities: BTreeMap<EntityKey, Entity>,
}

impl EntityGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entity: Entity) {
        self.entities.insert(entity.key.clone(), entity);
    }

    pub fn get(&self, key: &EntityKey) -> Option<&Entity> {
        self.entities.get(key)
    }

    fn owned_children(&self, key: &EntityKey) -> Vec<&Entity> {
        self.entities
            .values()
            .filter(|entity| entity.owner.as_ref() == Some(key))
            .collect()
    }

    /// Clone the root and everything it transitively owns.
    ///
    /// `allocate` hands out a fresh identifier per entity kind. Clones are
    /// returned owners-first; references within the cloned set point at the
    /// new identifiers, references outside it are left untouched.
    ///
    /// # Errors
    ///
    /// A missing root is a resource error; an ownership cycle among the
    /// collected entities is a validation error.
    pub fn duplicate(
        &self,
        root: &EntityKey,
        allocate: &mut dyn FnMut(&str) -> u64,
    ) -> Result<Vec<Entity>> {
        if self.get(root).is_none() {
            return Err(CatalogueError::Resource(format!(
                "Entity {}:{} does not exist",
                root.kind, root.id
            )));
        }

        // Collect the ownership closure
        let mut members = BTreeSet::new();
        let mut queue = VecDeque::from([root.clone()]);
        while let Some(key) = queue.pop_front() {
            if !members.insert(key.clone()) {
                continue;
            }
            for child in self.owned_children(&key) {
                queue.push_back(child.key.clone());
            }
        }

        let order = self.topological_order(&members)?;

        let mut remapped: BTreeMap<EntityKey, EntityKey> = BTreeMap::new();
        let mut clones = Vec::with_capacity(order.len());
        for key in order {
            let original = &self.entities[&key];
            let new_key = EntityKey::new(key.kind.clone(), allocate(&key.kind));
            remapped.insert(key.clone(), new_key.clone());

            let mut clone = original.clone();
            clone.key = new_key;
            if let Some(owner) = &clone.owner {
                if let Some(new_owner) = remapped.get(owner) {
                    clone.owner = Some(new_owner.clone());
                }
            }
            for target in clone.references.values_mut() {
                if let Some(new_target) = remapped.get(target) {
                    *target = new_target.clone();
                }
            }
            clones.push(clone);
        }

        tracing::info!(
            root = %format!("{}:{}", root.kind, root.id),
            cloned = clones.len(),
            "Entity duplicated"
        );
        Ok(clones)
    }

    /// Kahn's algorithm over the ownership edges within `members`
    fn topological_order(&self, members: &BTreeSet<EntityKey>) -> Result<Vec<EntityKey>> {
        let mut in_degree: BTreeMap<&EntityKey, usize> = members
            .iter()
            .map(|key| {
                let owned_by_member = self.entities[key]
                    .owner
                    .as_ref()
                    .is_some_and(|owner| members.contains(owner));
                (key, usize::from(owned_by_member))
            })
            .collect();

        let mut ready: VecDeque<&EntityKey> = in_degree
            .iter()
            .filter(|(_, degree)| **degree == 0)
            .map(|(key, _)| *key)
            .collect();

        let mut order = Vec::with_capacity(members.len());
        while let Some(key) = ready.pop_front() {
            order.push(key.clone());
            for child in self.owned_children(key) {
                if let Some(degree) = in_degree.get_mut(&child.key) {
                    *degree -= 1;
                    if *degree == 0 {
                        ready.push_back(&child.key);
                    }
                }
            }
        }

        if order.len() != members.len() {
            return Err(CatalogueError::Validation(
                "Ownership cycle detected while duplicating".to_string(),
            ));
        }
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order_graph() -> EntityGraph {
        let mut graph = EntityGraph::new();
        let order = EntityKey::new("order", 1);
        graph.insert(
            Entity::new(order.clone())
                .with_field("notes", "Clone me")
                .with_reference("user", EntityKey::new("user", 42)),
        );
        graph.insert(
            Entity::new(EntityKey::new("delivery_detail", 10))
                .with_owner(order.clone())
                .with_reference("order", order.clone()),
        );
        graph.insert(
            Entity::new(EntityKey::new("status_history", 20))
                .with_owner(order.clone())
                .with_reference("order", order.clone()),
        );
        graph.insert(Entity::new(EntityKey::new("user", 42)));
        graph
    }

    fn sequential_allocator() -> impl FnMut(&str) -> u64 {
        let mut next = 100u64;
        move |_kind| {
            next += 1;
            next
        }
    }

    #[test]
    fn test_duplicate_clones_owned_closure() {
        let graph = order_graph();
        let mut allocate = sequential_allocator();
        let clones = graph
            .duplicate(&EntityKey::new("order", 1), &mut allocate)
            .unwrap();

        assert_eq!(clones.len(), 3);
        // Owner comes first
        assert_eq!(clones[0].key.kind, "order");
        assert_ne!(clones[0].key.id, 1);
    }

    #[test]
    fn test_references_within_set_are_rewritten() {
        let graph = order_graph();
        let mut allocate = sequential_allocator();
        let clones = graph
            .duplicate(&EntityKey::new("order", 1), &mut allocate)
            .unwrap();

        let new_order_key = clones[0].key.clone();
        let delivery = clones
            .iter()
            .find(|c| c.key.kind == "delivery_detail")
            .unwrap();
        assert_eq!(delivery.references["order"], new_order_key);
        assert_eq!(delivery.owner.as_ref().unwrap(), &new_order_key);
    }

    #[test]
    fn test_shared_references_point_at_original() {
        let graph = order_graph();
        let mut allocate = sequential_allocator();
        let clones = graph
            .duplicate(&EntityKey::new("order", 1), &mut allocate)
            .unwrap();

        // The user is referenced, not owned, so it is not cloned
        assert_eq!(clones[0].references["user"], EntityKey::new("user", 42));
        assert!(clones.iter().all(|c| c.key.kind != "user"));
    }

    #[test]
    fn test_missing_root_is_resource_error() {
        let graph = order_graph();
        let mut allocate = sequential_allocator();
        let err = graph
            .duplicate(&EntityKey::new("order", 999), &mut allocate)
            .unwrap_err();
        assert!(matches!(err, CatalogueError::Resource(_)));
    }

    #[test]
    fn test_ownership_cycle_is_validation_error() {
        let mut graph = EntityGraph::new();
        let a = EntityKey::new("a", 1);
        let b = EntityKey::new("b", 1);
        graph.insert(Entity::new(a.clone()).with_owner(b.clone()));
        graph.insert(Entity::new(b.clone()).with_owner(a.clone()));

        let mut allocate = sequential_allocator();
        let err = graph.duplicate(&a, &mut allocate).unwrap_err();
        assert!(matches!(err, CatalogueError::Validation(_)));
    }
}
