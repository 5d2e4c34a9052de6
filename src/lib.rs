//! # evoke
//!
//! **Evoke** is an in-process, priority-ordered event dispatch registry.
//!
//! Callers register arbitrary objects whose methods act as event handlers;
//! the registry routes published events to the matching handlers in a
//! deterministic, priority-ordered sequence. Delivery is synchronous,
//! same-process, at-most-once per registered handler per publish call — this
//! is a dispatch core, not a message broker.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │ handler obj  │   │ handler obj  │   │ handler obj  │
//!     │ (impl        │   │ (impl        │   │ (impl        │
//!     │  Handlers)   │   │  Handlers)   │   │  Handlers)   │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼ register         ▼ register         ▼ register
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  EventManager                                                     │
//! │  - Discovery (member table → validated descriptors)               │
//! │  - Indexes (by event key / by owner / by class), eagerly sorted   │
//! │  - Dispatch (snapshot → merge → ordered synchronous invocation)   │
//! └──────────────────────────────┬────────────────────────────────────┘
//!                                │ invoke(&event)
//!                                ▼
//!              handlers run on the caller's thread, in
//!              (group, ordinal, registration) total order,
//!              sharing one &mut Context per publish call
//! ```
//!
//! ### Lifecycle
//! ```text
//! register(Arc<S>) ──► S::describe(table) ──► discover ──► indexes
//!
//! invoke(&event):
//!   ├─► collect views: event + each ancestor via Event::parent()
//!   ├─► snapshot matching descriptor lists (read lock, then released)
//!   ├─► merge + sort by (group desc, ordinal desc, seq asc)
//!   └─► call each handler in order with (&view, &mut context)
//!         └─ first Err aborts the rest (fail-fast) ──► DispatchError
//! ```
//!
//! ## Features
//! | Area           | Description                                              | Key types / traits                  |
//! |----------------|----------------------------------------------------------|-------------------------------------|
//! | **Events**     | Dispatchable values with context and explicit lineage.   | [`Event`], [`NoParent`]             |
//! | **Handlers**   | Member tables describing handler methods and markers.    | [`Handlers`], [`HandlerTable`]      |
//! | **Priority**   | Coarse groups plus fine ordinals; deterministic ties.    | [`Group`], [`Priority`]             |
//! | **Registry**   | Thread-safe registration, queries, unregistration.       | [`EventManager`]                    |
//! | **Errors**     | Typed registration and dispatch failures.                | [`RegistryError`], [`DispatchError`]|
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use evoke::{impl_event, EventManager, Group, Handlers, HandlerTable};
//!
//! struct Message { body: &'static str }
//! #[derive(Default)]
//! struct Outcome { seen: Vec<String> }
//! impl_event!(Message, context = Outcome);
//!
//! struct Auditor;
//! impl Auditor {
//!     fn on_message(&self, event: &Message, outcome: &mut Outcome) {
//!         outcome.seen.push(format!("audit:{}", event.body));
//!     }
//! }
//! impl Handlers for Auditor {
//!     fn describe(table: &mut HandlerTable<Self>) {
//!         // Audit first, before any other group.
//!         table.method("on_message", Self::on_message).handler().group(Group::Highest);
//!     }
//! }
//!
//! struct Printer;
//! impl Printer {
//!     fn on_message(&self, event: &Message, outcome: &mut Outcome) {
//!         outcome.seen.push(format!("print:{}", event.body));
//!     }
//! }
//! impl Handlers for Printer {
//!     fn describe(table: &mut HandlerTable<Self>) {
//!         table.method("on_message", Self::on_message).handler();
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let manager = EventManager::create();
//!     manager.register(Arc::new(Auditor))?;
//!     manager.register(Arc::new(Printer))?;
//!
//!     let outcome = manager.invoke(&Message { body: "hi" })?;
//!     assert_eq!(outcome.seen, vec!["audit:hi", "print:hi"]);
//!     Ok(())
//! }
//! ```

mod core;
mod error;
mod events;
mod handlers;
mod priority;

// ---- Public re-exports ----

pub use core::{EventManager, ManagerBuilder};
pub use error::{DispatchError, HandlerError, RegistryError};
pub use events::{Event, NoParent};
pub use handlers::{shape, BoundMethod, HandlerEntry, HandlerMethod, HandlerTable, Handlers, MethodEntry};
pub use priority::{Group, Priority};
