//! The resolved, validated representation of one registered handler.

use std::any::{Any, TypeId};
use std::fmt;

use crate::handlers::method::MethodFault;
use crate::priority::{OrderKey, Priority};

/// One discovered handler method, bound to its owning instance.
///
/// Created by a successful `register` call and owned exclusively by the
/// registry; removal from all indexes is its end of life. The `invoke`
/// closure holds a shared `Arc` reference to the owner, so the registry never
/// takes over the instance's lifecycle.
pub(crate) struct HandlerDescriptor {
    /// Name of the owning type.
    pub class: &'static str,
    /// Name of the handler method.
    pub method: &'static str,
    /// Event type this descriptor is indexed under.
    pub key: TypeId,
    /// Event type the method receives (equal to `key`, or an ancestor of it
    /// when the mark overrides the dispatch key).
    pub param: TypeId,
    pub priority: Priority,
    /// Registration sequence; unique, ascending.
    pub seq: u64,
    /// Fully erased invoker closing over the owner.
    pub invoke: Box<dyn Fn(&dyn Any, &mut dyn Any) -> Result<(), MethodFault> + Send + Sync>,
}

impl HandlerDescriptor {
    /// Total-order key used by every dispatch list.
    #[inline]
    pub fn order_key(&self) -> OrderKey {
        OrderKey::new(self.priority, self.seq)
    }
}

impl fmt::Debug for HandlerDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerDescriptor")
            .field("class", &self.class)
            .field("method", &self.method)
            .field("priority", &self.priority)
            .field("seq", &self.seq)
            .finish_non_exhaustive()
    }
}
