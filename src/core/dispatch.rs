//! # Dispatch: ordered, synchronous delivery of one published event.
//!
//! The engine receives a pre-collected snapshot of the matched descriptors
//! (taken under the registry read lock) and the published event's view chain,
//! merges the per-level lists into one sequence under the total order, and
//! invokes each handler on the caller's thread.
//!
//! Sequencing guarantees:
//! - every matched handler is invoked at most once per publish call;
//! - handler N's side effects, including mutation of the shared context, are
//!   visible to handler N+1 before it runs;
//! - the first failing handler aborts the rest (fail-fast), and the error
//!   reaches the publisher.
//!
//! No lock is held while a handler runs, so handlers may freely call back
//! into the registry.

use std::any::{Any, TypeId};
use std::sync::Arc;

use log::{trace, warn};

use crate::error::DispatchError;
use crate::handlers::{HandlerDescriptor, MethodFault};

/// Runs the matched handlers in total order against the shared context.
pub(crate) fn run(
    mut matched: Vec<Arc<HandlerDescriptor>>,
    views: &[(TypeId, &dyn Any)],
    context: &mut dyn Any,
) -> Result<(), DispatchError> {
    matched.sort_unstable_by_key(|descriptor| descriptor.order_key());

    for descriptor in matched {
        let view = views
            .iter()
            .find(|(id, _)| *id == descriptor.param)
            .map(|(_, view)| *view);

        let Some(view) = view else {
            // The published event's value chain does not reach the level this
            // handler was validated against; its `parent()` impl is out of
            // sync with its declared `Parent`.
            warn!(
                "dispatch: no view for '{}::{}', skipping (parent() chain does not reach its parameter type)",
                descriptor.class, descriptor.method
            );
            continue;
        };

        trace!("dispatch: invoking '{}::{}'", descriptor.class, descriptor.method);
        (descriptor.invoke)(view, &mut *context).map_err(|fault| match fault {
            MethodFault::Failed(source) => DispatchError::Handler {
                class: descriptor.class,
                method: descriptor.method,
                source,
            },
            MethodFault::Mismatch { expected } => DispatchError::PayloadMismatch {
                class: descriptor.class,
                method: descriptor.method,
                expected,
            },
        })?;
    }

    Ok(())
}
