//! # Handler discovery: from a registered object to validated descriptors.
//!
//! Discovery consumes the member table of a handler type and produces zero or
//! more [`HandlerDescriptor`]s, or a structural [`RegistryError`]. It runs
//! before the registry is touched, so a failed registration registers
//! nothing.
//!
//! ## Rules
//! - A type with `IGNORED = true` yields zero descriptors without its table
//!   being read, and without error.
//! - An empty table → [`RegistryError::MissingHandlerMethods`]: the type has
//!   no handler-shaped members at all.
//! - A table whose every member is ignored → zero descriptors, no error
//!   (an intentionally silenced handler type).
//! - Otherwise, if no member carries a handler mark →
//!   [`RegistryError::MissingAnnotation`].
//! - A mark that overrides the dispatch key is validated: the parameter type
//!   must appear in the key's lineage, and their context types must match →
//!   [`RegistryError::InvalidHandlerSignature`] otherwise.

use std::any::{type_name, Any};
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;

use log::debug;

use crate::error::RegistryError;
use crate::handlers::descriptor::HandlerDescriptor;
use crate::handlers::table::{HandlerTable, Marker, Member};
use crate::handlers::Handlers;

/// Runs discovery for `owner`, assigning registration sequence numbers from
/// `seq`. All-or-nothing: the first validation failure discards everything.
pub(crate) fn discover<S: Handlers>(
    owner: &Arc<S>,
    seq: &AtomicU64,
) -> Result<Vec<HandlerDescriptor>, RegistryError> {
    let class = type_name::<S>();

    if S::IGNORED {
        debug!("discovery: '{class}' is ignored at the type level, zero handlers");
        return Ok(Vec::new());
    }

    let mut table = HandlerTable::new();
    S::describe(&mut table);

    if table.members.is_empty() {
        return Err(RegistryError::MissingHandlerMethods { class });
    }

    let mut descriptors = Vec::new();
    let mut live_members = 0usize;

    for member in table.members {
        let Member {
            name,
            param,
            param_name,
            bound,
            marker,
            ..
        } = member;

        let mark = match marker {
            Marker::Ignored => continue,
            Marker::None => {
                live_members += 1;
                continue;
            }
            Marker::Handler(mark) => {
                live_members += 1;
                mark
            }
        };

        // Validate a dispatch-key override against the method signature.
        if mark.key != param {
            if !mark.key_lineage.contains(&param) {
                return Err(RegistryError::InvalidHandlerSignature {
                    class,
                    method: name,
                    declared: mark.key_name,
                    expected: param_name,
                });
            }
            if let Some(context) = bound.context {
                if mark.key_context != context {
                    return Err(RegistryError::InvalidHandlerSignature {
                        class,
                        method: name,
                        declared: mark.key_context_name,
                        expected: bound.context_name,
                    });
                }
            }
        }

        let instance = Arc::clone(owner);
        let erased = bound.invoke;
        descriptors.push(HandlerDescriptor {
            class,
            method: name,
            key: mark.key,
            param,
            priority: mark.priority,
            seq: seq.fetch_add(1, AtomicOrdering::Relaxed),
            invoke: Box::new(move |event: &dyn Any, context: &mut dyn Any| {
                erased(instance.as_ref(), event, context)
            }),
        });
    }

    if live_members == 0 {
        // Every handler-shaped member is explicitly ignored.
        debug!("discovery: every member of '{class}' is ignored, zero handlers");
        return Ok(Vec::new());
    }
    if descriptors.is_empty() {
        return Err(RegistryError::MissingAnnotation { class });
    }

    Ok(descriptors)
}
