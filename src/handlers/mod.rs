//! # Handler description and discovery.
//!
//! This module is the boundary between user objects and the registry. A
//! handler type implements [`Handlers`], listing its handler-shaped methods
//! in a [`HandlerTable`]; discovery turns that table into validated
//! descriptors at registration time.
//!
//! ## Architecture
//! ```text
//! manager.register(Arc<S>)
//!     │
//!     ├─► S::IGNORED ?  ── yes ──► zero descriptors, no error
//!     │
//!     ├─► S::describe(&mut HandlerTable<S>)     (the member metadata table)
//!     │        table.method("on_msg", S::on_msg).handler().group(…)
//!     │        table.method("debug", S::debug).ignore()
//!     │
//!     └─► discover: eligibility + ignore rules + mark validation
//!              │
//!              ├─ Ok(Vec<HandlerDescriptor>) ──► registry indexes
//!              └─ Err(RegistryError)         ──► nothing registered
//! ```
//!
//! ## Implementing a handler type
//! ```
//! use evoke::{Handlers, HandlerTable, Group, impl_event};
//!
//! struct Tick;
//! impl_event!(Tick);
//!
//! struct Clock;
//!
//! impl Clock {
//!     fn on_tick(&self, _event: &Tick) {
//!         // advance
//!     }
//! }
//!
//! impl Handlers for Clock {
//!     fn describe(table: &mut HandlerTable<Self>) {
//!         table.method("on_tick", Self::on_tick).handler().group(Group::High);
//!     }
//! }
//! ```

mod descriptor;
mod discover;
mod method;
mod table;

pub use method::{shape, BoundMethod, HandlerMethod};
pub use table::{HandlerEntry, HandlerTable, MethodEntry};

pub(crate) use descriptor::HandlerDescriptor;
pub(crate) use discover::discover;
pub(crate) use method::MethodFault;

/// Contract for types whose methods act as event handlers.
///
/// The implementation lists handler-shaped methods in the given table; the
/// registry never sees methods that are not listed. Called once per
/// `register`, from the registering thread.
pub trait Handlers: Send + Sync + Sized + 'static {
    /// Type-level ignore switch.
    ///
    /// When `true`, registration succeeds with zero handlers and the table is
    /// never read. The analog of an ignore annotation on the whole class.
    const IGNORED: bool = false;

    /// Describes this type's handler members.
    fn describe(table: &mut HandlerTable<Self>);
}
