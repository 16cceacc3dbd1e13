use canvasloop_common::EntityId;

use crate::entity::{Entity, EntityKind, EntityOptions};

/// Ordered collection of registered entities.
///
/// Entities are stored in registration order, which is also the order the
/// update pass and the pass-through draw pass visit them. There is no
/// removal; an entity lives until the registry is dropped.
///
/// Registration takes `&mut self`, so it can never interleave with an
/// in-progress iteration.
#[derive(Debug, Default)]
pub struct Registry {
    entities: Vec<Entity>,
    next_id: u64,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Instantiate `kind` (running its `create` once), assign the next
    /// sequential identity, and append it.
    pub fn register<D: 'static>(&mut self, kind: &EntityKind<D>, options: EntityOptions) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.entities
            .push(Entity::new(id, options, kind.instantiate()));
        tracing::debug!(%id, kind = kind.name(), auto_render = options.auto_render, "registered entity");
        id
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Look up an entity. Identities are ascending in storage order.
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.position(id).map(|i| &self.entities[i])
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.position(id).map(move |i| &mut self.entities[i])
    }

    /// Entities in registration order.
    pub fn iter(&self) -> std::slice::Iter<'_, Entity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Entity> {
        self.entities.iter_mut()
    }

    /// Run every entity's update hook once, in registration order.
    /// Returns the number of entities updated.
    pub fn update_all(&mut self) -> usize {
        for entity in &mut self.entities {
            entity.update();
        }
        self.entities.len()
    }

    fn position(&self, id: EntityId) -> Option<usize> {
        self.entities.binary_search_by_key(&id, Entity::id).ok()
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a Entity;
    type IntoIter = std::slice::Iter<'a, Entity>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
