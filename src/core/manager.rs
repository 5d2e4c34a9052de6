//! # EventManager: the public registry facade.
//!
//! [`EventManager`] owns the locked registry state and exposes the whole
//! operation surface: registration, unregistration, queries, and `invoke`.
//!
//! ## Concurrency discipline
//! Writers (`register`, `unregister`, `unregister_type`) take the write lock
//! for the whole mutation; `invoke` holds the read lock only long enough to
//! snapshot the matched descriptors. Consequences:
//! - a dispatch never observes a torn or partially sorted list;
//! - a registration completing after the snapshot is not part of that
//!   dispatch (normal happens-before);
//! - handlers may re-enter the manager without deadlock.
//!
//! Discovery runs *before* the write lock is taken: a malformed object is
//! rejected without ever blocking readers.

use std::any::TypeId;
use std::sync::atomic::AtomicU64;
use std::sync::Arc;

use log::debug;
use parking_lot::RwLock;

use crate::core::builder::ManagerBuilder;
use crate::core::dispatch;
use crate::core::registry::RegistryState;
use crate::error::{DispatchError, RegistryError};
use crate::events::{view_chain, Event};
use crate::handlers::{discover, Handlers};

/// In-process event dispatch registry.
///
/// Holds a reference to every registered handler method and routes published
/// events to them in a deterministic, priority-ordered sequence. Safe to
/// share across threads (`Arc<EventManager>` or `&EventManager`).
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use evoke::{impl_event, EventManager, Handlers, HandlerTable};
///
/// struct Greeting { who: &'static str }
/// #[derive(Default)]
/// struct Reply { text: String }
/// impl_event!(Greeting, context = Reply);
///
/// struct Greeter;
///
/// impl Greeter {
///     fn on_greeting(&self, event: &Greeting, reply: &mut Reply) {
///         reply.text = format!("hello, {}", event.who);
///     }
/// }
///
/// impl Handlers for Greeter {
///     fn describe(table: &mut HandlerTable<Self>) {
///         table.method("on_greeting", Self::on_greeting).handler();
///     }
/// }
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let manager = EventManager::create();
/// manager.register(Arc::new(Greeter))?;
///
/// let reply = manager.invoke(&Greeting { who: "evoke" })?;
/// assert_eq!(reply.text, "hello, evoke");
/// # Ok(())
/// # }
/// ```
pub struct EventManager {
    state: RwLock<RegistryState>,
    /// Registration sequence counter; the stable tie-break of the total order.
    seq: AtomicU64,
}

impl EventManager {
    /// Creates a fresh, empty manager.
    pub fn create() -> Self {
        Self {
            state: RwLock::new(RegistryState::default()),
            seq: AtomicU64::new(0),
        }
    }

    /// Returns a builder for a manager.
    ///
    /// The builder currently recognizes no options; it exists to keep the
    /// construction surface extensible.
    pub fn builder() -> ManagerBuilder {
        ManagerBuilder::new()
    }

    /// Registers a handler object.
    ///
    /// Discovery inspects the object's member table, validates every marked
    /// member, and indexes the resulting descriptors. All-or-nothing: on any
    /// error, nothing is registered.
    ///
    /// Registering the same `Arc` allocation twice is a logged no-op — it
    /// would otherwise deliver every event to that instance twice.
    ///
    /// # Errors
    /// [`RegistryError::MissingHandlerMethods`],
    /// [`RegistryError::MissingAnnotation`], or
    /// [`RegistryError::InvalidHandlerSignature`]; see [`crate::error`].
    pub fn register<S: Handlers>(&self, instance: Arc<S>) -> Result<(), RegistryError> {
        let owner = Arc::as_ptr(&instance) as usize;
        if self.state.read().contains_owner(owner) {
            debug!("register: instance of '{}' already registered, no-op", std::any::type_name::<S>());
            return Ok(());
        }

        let descriptors = discover(&instance, &self.seq)?;
        let count = descriptors.len();

        let mut state = self.state.write();
        if state.contains_owner(owner) {
            // Lost a race against an identical registration.
            return Ok(());
        }
        state.insert(owner, TypeId::of::<S>(), instance, descriptors);
        drop(state);

        debug!(
            "register: '{}' contributed {count} handler(s)",
            std::any::type_name::<S>()
        );
        Ok(())
    }

    /// Unregisters exactly this instance's handlers.
    ///
    /// Identity is the `Arc` allocation: other registered instances of the
    /// same type stay active. No-op, not an error, when the instance was
    /// never registered.
    pub fn unregister<S: Handlers>(&self, instance: &Arc<S>) {
        let owner = Arc::as_ptr(instance) as usize;
        let removed = self.state.write().remove_owner(owner);
        if removed > 0 {
            debug!(
                "unregister: removed {removed} handler(s) of one '{}' instance",
                std::any::type_name::<S>()
            );
        }
    }

    /// Unregisters every currently registered instance of `S`.
    ///
    /// No-op, not an error, when none is registered.
    pub fn unregister_type<S: Handlers>(&self) {
        let removed = self.state.write().remove_class(TypeId::of::<S>());
        if removed > 0 {
            debug!(
                "unregister: removed {removed} handler(s) of type '{}'",
                std::any::type_name::<S>()
            );
        }
    }

    /// True if any instance of `S` is currently registered.
    pub fn is_registered<S: Handlers>(&self) -> bool {
        self.state.read().has_class(TypeId::of::<S>())
    }

    /// Returns a currently registered instance of `S`, if any.
    ///
    /// When several instances of `S` are registered, the **most recently
    /// registered** one wins; the rule is stable across unregister and
    /// re-register cycles.
    pub fn handler<S: Handlers>(&self) -> Option<Arc<S>> {
        let instance = self.state.read().newest_of(TypeId::of::<S>())?;
        instance.downcast::<S>().ok()
    }

    /// Publishes `event` to every matching handler, in total order.
    ///
    /// Matching covers the event's own type and every ancestor in its
    /// lineage. The context is created once, shared by `&mut` across all
    /// handlers of this call, and returned when every handler has run.
    ///
    /// # Errors
    /// The first handler failure aborts the remaining handlers and is
    /// returned as [`DispatchError::Handler`]; see [`crate::error`] for the
    /// fail-fast policy.
    pub fn invoke<E: Event>(&self, event: &E) -> Result<E::Context, DispatchError> {
        let views = view_chain(event);
        let keys: Vec<TypeId> = views.iter().map(|(id, _)| *id).collect();
        let matched = self.state.read().matched(&keys);

        let mut context = E::Context::default();
        dispatch::run(matched, &views, &mut context)?;
        Ok(context)
    }

    /// True if no handler object is registered.
    pub fn is_empty(&self) -> bool {
        self.state.read().owner_count() == 0
    }

    /// Total number of registered handler descriptors.
    pub fn handler_count(&self) -> usize {
        self.state.read().handler_count()
    }
}

impl Default for EventManager {
    fn default() -> Self {
        Self::create()
    }
}
