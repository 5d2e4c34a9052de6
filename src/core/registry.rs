//! # Registry state: the three handler indexes.
//!
//! All descriptors live in one [`RegistryState`] guarded by a single
//! `RwLock` in the manager:
//! - `by_event` — dispatch key → descriptor list, kept eagerly sorted by the
//!   total-order key on every insertion;
//! - `by_owner` — owning allocation → its record (class, shared instance
//!   reference, contributed descriptors), supporting unregistration by
//!   instance;
//! - `by_class` — class → owning allocations in registration order,
//!   supporting unregistration by class and the most-recently-registered
//!   rule for instance lookup.
//!
//! ## Rules
//! - Descriptors are shared between `by_event` and the owner record via
//!   `Arc`; removal drops both references.
//! - Empty index entries are removed eagerly, so `is_registered` is a plain
//!   key lookup.
//! - Mutation happens only under the manager's write lock; readers snapshot
//!   descriptor `Arc`s and drop the lock before any handler runs.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use crate::handlers::HandlerDescriptor;

/// Record of one registered handler object.
pub(crate) struct OwnerRecord {
    class: TypeId,
    /// Shared reference to the instance; the registry never owns it
    /// exclusively.
    instance: Arc<dyn Any + Send + Sync>,
    descriptors: Vec<Arc<HandlerDescriptor>>,
}

/// The manager's locked state.
#[derive(Default)]
pub(crate) struct RegistryState {
    by_event: HashMap<TypeId, Vec<Arc<HandlerDescriptor>>>,
    by_owner: HashMap<usize, OwnerRecord>,
    by_class: HashMap<TypeId, Vec<usize>>,
}

impl RegistryState {
    /// True if `owner` already has a record.
    pub fn contains_owner(&self, owner: usize) -> bool {
        self.by_owner.contains_key(&owner)
    }

    /// Inserts a freshly discovered registration. Every descriptor lands at
    /// its sorted position in its dispatch list.
    pub fn insert(
        &mut self,
        owner: usize,
        class: TypeId,
        instance: Arc<dyn Any + Send + Sync>,
        descriptors: Vec<HandlerDescriptor>,
    ) {
        let mut shared = Vec::with_capacity(descriptors.len());
        for descriptor in descriptors {
            let descriptor = Arc::new(descriptor);
            let list = self.by_event.entry(descriptor.key).or_default();
            let position = match list.binary_search_by_key(&descriptor.order_key(), |d| d.order_key()) {
                Ok(position) | Err(position) => position,
            };
            list.insert(position, Arc::clone(&descriptor));
            shared.push(descriptor);
        }

        self.by_owner.insert(
            owner,
            OwnerRecord {
                class,
                instance,
                descriptors: shared,
            },
        );
        self.by_class.entry(class).or_default().push(owner);
    }

    /// Removes one owner and everything it contributed. Returns the number
    /// of descriptors removed; zero when the owner was never registered.
    pub fn remove_owner(&mut self, owner: usize) -> usize {
        let Some(record) = self.by_owner.remove(&owner) else {
            return 0;
        };

        for descriptor in &record.descriptors {
            if let Some(list) = self.by_event.get_mut(&descriptor.key) {
                list.retain(|d| d.seq != descriptor.seq);
                if list.is_empty() {
                    self.by_event.remove(&descriptor.key);
                }
            }
        }

        if let Some(owners) = self.by_class.get_mut(&record.class) {
            owners.retain(|&o| o != owner);
            if owners.is_empty() {
                self.by_class.remove(&record.class);
            }
        }

        record.descriptors.len()
    }

    /// Removes every currently registered instance of `class`. Returns the
    /// number of descriptors removed.
    pub fn remove_class(&mut self, class: TypeId) -> usize {
        let owners = match self.by_class.get(&class) {
            Some(owners) => owners.clone(),
            None => return 0,
        };
        owners.into_iter().map(|owner| self.remove_owner(owner)).sum()
    }

    /// True if any instance of `class` is registered.
    pub fn has_class(&self, class: TypeId) -> bool {
        self.by_class.contains_key(&class)
    }

    /// The most recently registered instance of `class`, if any.
    pub fn newest_of(&self, class: TypeId) -> Option<Arc<dyn Any + Send + Sync>> {
        let owner = self.by_class.get(&class)?.last()?;
        let record = self.by_owner.get(owner)?;
        Some(Arc::clone(&record.instance))
    }

    /// Snapshot of every descriptor registered under any of `keys`, in index
    /// order. Each list is already sorted; the caller merges across keys.
    pub fn matched(&self, keys: &[TypeId]) -> Vec<Arc<HandlerDescriptor>> {
        keys.iter()
            .filter_map(|key| self.by_event.get(key))
            .flat_map(|list| list.iter().cloned())
            .collect()
    }

    /// Number of registered handler objects.
    pub fn owner_count(&self) -> usize {
        self.by_owner.len()
    }

    /// Total number of registered handler descriptors.
    pub fn handler_count(&self) -> usize {
        self.by_event.values().map(Vec::len).sum()
    }
}
