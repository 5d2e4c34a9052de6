//! # The [`Event`] trait: dispatchable values and their lineage.
//!
//! An event is any `'static` type implementing [`Event`]. The trait carries
//! two pieces of metadata the dispatch engine needs:
//!
//! - `Context` — the mutable companion payload shared by every handler within
//!   one `invoke` call. Dispatch creates it once (`Context::default()`),
//!   threads it through the handlers in order, and hands it back to the
//!   publisher. Events without a meaningful context use `()`.
//! - `Parent` — the supertype in the event hierarchy, realized through
//!   composition: a child event embeds its parent value and exposes it via
//!   [`Event::parent`]. An event published as a subtype still reaches every
//!   handler declared for an ancestor type; each such handler receives the
//!   embedded ancestor value itself.
//!
//! Roots use [`NoParent`], an uninhabited terminator.
//!
//! ## Example
//! ```
//! use evoke::{Event, NoParent};
//!
//! struct Connected { peer: String }
//!
//! impl Event for Connected {
//!     type Context = ();
//!     type Parent = NoParent;
//! }
//!
//! struct TlsConnected {
//!     base: Connected,
//!     cipher: String,
//! }
//!
//! impl Event for TlsConnected {
//!     type Context = ();
//!     type Parent = Connected;
//!
//!     fn parent(&self) -> Option<&Connected> {
//!         Some(&self.base)
//!     }
//! }
//! ```

use std::any::{Any, TypeId};

/// Marker trait for dispatchable event values.
///
/// Types declaring a `Parent` other than [`NoParent`] must override
/// [`Event::parent`] to expose the embedded parent value; the value-level
/// chain is what dispatch walks, and a level it cannot reach will not receive
/// the event.
pub trait Event: 'static {
    /// Mutable payload shared by all handlers within one `invoke` call.
    type Context: Default + 'static;

    /// Supertype in the event hierarchy; [`NoParent`] for roots.
    type Parent: Event;

    /// Upcast view of this event as its parent, if it has one.
    fn parent(&self) -> Option<&Self::Parent> {
        None
    }
}

/// Uninhabited terminator for event lineages.
///
/// Root events declare `type Parent = NoParent`. The type cannot be
/// constructed, so it can never be published or registered for.
pub enum NoParent {}

impl Event for NoParent {
    type Context = ();
    type Parent = NoParent;
}

/// Implements [`Event`] for one or more root event types.
///
/// The one-argument form uses `()` as the context; the `context = …` form
/// names a context type. Events with a parent implement the trait by hand
/// (they need a body for [`Event::parent`]).
///
/// # Example
/// ```
/// use evoke::impl_event;
///
/// struct Started;
/// struct Stopped;
/// #[derive(Default)]
/// struct ShutdownVote { vetoed: bool }
/// struct Stopping;
///
/// impl_event!(Started, Stopped);
/// impl_event!(Stopping, context = ShutdownVote);
/// ```
#[macro_export]
macro_rules! impl_event {
    ($ty:ty, context = $ctx:ty) => {
        impl $crate::Event for $ty {
            type Context = $ctx;
            type Parent = $crate::NoParent;
        }
    };
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Event for $ty {
                type Context = ();
                type Parent = $crate::NoParent;
            }
        )+
    };
}

/// Object-safe view over an event used by the dispatch walk.
pub(crate) trait ErasedEvent {
    fn as_any(&self) -> &dyn Any;
    fn parent_erased(&self) -> Option<&dyn ErasedEvent>;
}

impl<E: Event> ErasedEvent for E {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn parent_erased(&self) -> Option<&dyn ErasedEvent> {
        self.parent().map(|parent| parent as &dyn ErasedEvent)
    }
}

/// Collects the view chain of a published event: the event itself first,
/// then each ancestor view in lineage order.
///
/// Guarded against self-referential chains: a view whose type was already
/// seen ends the walk.
pub(crate) fn view_chain<'a>(event: &'a dyn ErasedEvent) -> Vec<(TypeId, &'a dyn Any)> {
    let mut views: Vec<(TypeId, &'a dyn Any)> = Vec::new();
    let mut cursor = Some(event);
    while let Some(level) = cursor {
        let view = level.as_any();
        let id = view.type_id();
        if views.iter().any(|(seen, _)| *seen == id) {
            break;
        }
        views.push((id, view));
        cursor = level.parent_erased();
    }
    views
}

/// Static lineage of an event type: its own `TypeId` first, then each
/// ancestor's, excluding [`NoParent`].
pub(crate) fn lineage<E: Event>() -> Vec<TypeId> {
    let mut ids = Vec::new();
    push_lineage::<E>(&mut ids);
    ids
}

fn push_lineage<E: Event>(ids: &mut Vec<TypeId>) {
    let id = TypeId::of::<E>();
    if id == TypeId::of::<NoParent>() || ids.contains(&id) {
        return;
    }
    ids.push(id);
    push_lineage::<E::Parent>(ids);
}
