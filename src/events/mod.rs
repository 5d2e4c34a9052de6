//! Event type model.
//!
//! This module groups the event **data model**: the [`Event`] trait that
//! marks dispatchable values, the per-dispatch context payload it declares,
//! the composition-based lineage ([`Event::parent`] / [`NoParent`]), and the
//! crate-internal lineage walking used by discovery validation and the
//! dispatch engine.
//!
//! See `core/mod.rs` for how events flow through the registry.

mod event;

pub use event::{Event, NoParent};

pub(crate) use event::{lineage, view_chain};
