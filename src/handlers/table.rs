//! # The member metadata table.
//!
//! [`HandlerTable`] is the crate's rendition of "enumerate an object's
//! callable members along with their declared metadata": since Rust has no
//! runtime reflection, a handler type lists its members itself from
//! [`Handlers::describe`](crate::Handlers::describe). Each entry records the
//! method reference (erased through
//! [`HandlerMethod`](crate::handlers::HandlerMethod)), its name, and its
//! markers.
//!
//! ## Markers
//! - `.handler()` marks the member as a handler — the analog of a handler
//!   annotation. It returns a [`HandlerEntry`] for the optional refinements:
//!   `.group(…)`, `.ordinal(…)`, `.priority(…)` and `.event::<K>()` (dispatch
//!   under `K` instead of the parameter type; `K` must be a subtype of it).
//! - `.ignore()` excludes the member entirely, and wins over a handler mark
//!   on the same member.
//!
//! Members that are never listed are invisible to discovery, exactly as
//! non-public methods are invisible to a reflection pass.

use std::any::{type_name, TypeId};

use crate::events::{lineage, Event};
use crate::handlers::method::{BoundMethod, HandlerMethod};
use crate::priority::{Group, Priority};

/// Marker state of one table member.
pub(crate) enum Marker {
    /// Listed but unmarked; handler-shaped without an annotation.
    None,
    /// Marked as a handler.
    Handler(Mark),
    /// Explicitly excluded from discovery.
    Ignored,
}

/// Resolved handler mark: priority plus the dispatch key.
pub(crate) struct Mark {
    pub priority: Priority,
    /// Event type this handler is dispatched under.
    pub key: TypeId,
    pub key_name: &'static str,
    /// Static lineage of the key type; empty while the key is the parameter
    /// type itself (no override to validate).
    pub key_lineage: Vec<TypeId>,
    /// Context type of the key event.
    pub key_context: TypeId,
    pub key_context_name: &'static str,
}

/// One described member of a handler type.
pub(crate) struct Member<S> {
    pub name: &'static str,
    pub param: TypeId,
    pub param_name: &'static str,
    pub param_context: TypeId,
    pub param_context_name: &'static str,
    pub bound: BoundMethod<S>,
    pub marker: Marker,
}

/// Member metadata table populated by [`Handlers::describe`](crate::Handlers::describe).
pub struct HandlerTable<S> {
    pub(crate) members: Vec<Member<S>>,
}

impl<S: 'static> HandlerTable<S> {
    pub(crate) fn new() -> Self {
        Self { members: Vec::new() }
    }

    /// Lists one handler-shaped method under `name`.
    ///
    /// `method` is usually a method reference (`Self::on_message`) in one of
    /// the four shapes accepted by
    /// [`HandlerMethod`](crate::handlers::HandlerMethod). The returned entry
    /// is unmarked; chain `.handler()` or `.ignore()` on it.
    pub fn method<E, Shape, F>(&mut self, name: &'static str, method: F) -> MethodEntry<'_, S>
    where
        E: Event,
        F: HandlerMethod<S, E, Shape>,
    {
        self.members.push(Member {
            name,
            param: TypeId::of::<E>(),
            param_name: type_name::<E>(),
            param_context: TypeId::of::<E::Context>(),
            param_context_name: type_name::<E::Context>(),
            bound: method.bind(),
            marker: Marker::None,
        });
        let last = self.members.len() - 1;
        MethodEntry {
            member: &mut self.members[last],
        }
    }
}

/// A listed, still unmarked member.
pub struct MethodEntry<'a, S> {
    member: &'a mut Member<S>,
}

impl<'a, S> MethodEntry<'a, S> {
    /// Marks the member as a handler with default priority `(Normal, 0)`,
    /// dispatched under its parameter type.
    pub fn handler(self) -> HandlerEntry<'a, S> {
        self.member.marker = Marker::Handler(Mark {
            priority: Priority::default(),
            key: self.member.param,
            key_name: self.member.param_name,
            key_lineage: Vec::new(),
            key_context: self.member.param_context,
            key_context_name: self.member.param_context_name,
        });
        HandlerEntry {
            member: self.member,
        }
    }

    /// Excludes the member from discovery entirely.
    pub fn ignore(self) {
        self.member.marker = Marker::Ignored;
    }
}

/// A member carrying a handler mark.
pub struct HandlerEntry<'a, S> {
    member: &'a mut Member<S>,
}

impl<'a, S> HandlerEntry<'a, S> {
    /// Dispatches this handler under `K` instead of its parameter type.
    ///
    /// `K` must be the parameter type itself or one of its subtypes, and
    /// share its context type; discovery rejects the registration with
    /// `InvalidHandlerSignature` otherwise.
    pub fn event<K: Event>(self) -> Self {
        if let Marker::Handler(mark) = &mut self.member.marker {
            mark.key = TypeId::of::<K>();
            mark.key_name = type_name::<K>();
            mark.key_lineage = lineage::<K>();
            mark.key_context = TypeId::of::<K::Context>();
            mark.key_context_name = type_name::<K::Context>();
        }
        self
    }

    /// Sets the priority group, keeping the ordinal.
    pub fn group(self, group: Group) -> Self {
        if let Marker::Handler(mark) = &mut self.member.marker {
            mark.priority.group = group;
        }
        self
    }

    /// Sets the ordinal within the group, keeping the group.
    pub fn ordinal(self, ordinal: i32) -> Self {
        if let Marker::Handler(mark) = &mut self.member.marker {
            mark.priority.ordinal = ordinal;
        }
        self
    }

    /// Sets the full priority at once.
    pub fn priority(self, priority: Priority) -> Self {
        if let Marker::Handler(mark) = &mut self.member.marker {
            mark.priority = priority;
        }
        self
    }

    /// Excludes the member after all; the ignore mark wins.
    pub fn ignore(self) {
        self.member.marker = Marker::Ignored;
    }
}
