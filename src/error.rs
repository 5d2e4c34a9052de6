//! Error types used by the evoke registry and dispatch engine.
//!
//! This module defines two main error enums:
//!
//! - [`RegistryError`] — structural errors raised while registering a handler
//!   object (discovery and validation failures).
//! - [`DispatchError`] — errors raised while delivering an event to the
//!   matched handlers.
//!
//! Both types provide an `as_label` helper returning a short stable label for
//! logging and metrics. Registration errors always leave the registry
//! untouched; dispatch errors never touch the registry at all.

use thiserror::Error;

/// Boxed error returned by fallible handler methods.
///
/// Handler methods may return `Result<(), E>` for any `E` that converts into
/// this type (any `std::error::Error + Send + Sync`, plus `String`/`&str`).
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// # Errors produced while registering a handler object.
///
/// Each failure mode is a distinct variant so callers can branch on
/// "did I forget a marker" vs "did I register the wrong kind of object".
/// A failed `register` call registers nothing.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RegistryError {
    /// The type declares no handler-shaped methods at all; it does not look
    /// like a handler source.
    #[error("'{class}' declares no handler-shaped methods; not a plausible handler type")]
    MissingHandlerMethods {
        /// Name of the registered type.
        class: &'static str,
    },

    /// The type has handler-shaped methods, but none of them carry a handler
    /// mark. Likely a forgotten `.handler()` call in the member table.
    #[error("'{class}' has handler-shaped methods but none are marked as handlers")]
    MissingAnnotation {
        /// Name of the registered type.
        class: &'static str,
    },

    /// A marked handler declares an event type that conflicts with its
    /// parameter types: the marked event is not a subtype of the parameter's
    /// event, or their context types differ.
    #[error(
        "handler '{class}::{method}' marks event '{declared}' which is not compatible with its parameter type '{expected}'"
    )]
    InvalidHandlerSignature {
        /// Name of the registered type.
        class: &'static str,
        /// Name of the offending method.
        method: &'static str,
        /// Type name declared by the marker.
        declared: &'static str,
        /// Type name expected by the method signature.
        expected: &'static str,
    },
}

impl RegistryError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use evoke::RegistryError;
    ///
    /// let err = RegistryError::MissingAnnotation { class: "Listener" };
    /// assert_eq!(err.as_label(), "missing_annotation");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RegistryError::MissingHandlerMethods { .. } => "missing_handler_methods",
            RegistryError::MissingAnnotation { .. } => "missing_annotation",
            RegistryError::InvalidHandlerSignature { .. } => "invalid_handler_signature",
        }
    }
}

/// # Errors produced while dispatching an event.
///
/// Dispatch is fail-fast: the first failing handler aborts the remaining
/// handlers of that `invoke` call and is returned to the publisher. Handlers
/// that sorted earlier have already run to completion by then.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum DispatchError {
    /// A handler method returned an error.
    #[error("handler '{class}::{method}' failed: {source}")]
    Handler {
        /// Name of the owning type.
        class: &'static str,
        /// Name of the failing method.
        method: &'static str,
        /// The error returned by the handler body.
        #[source]
        source: HandlerError,
    },

    /// A handler's declared payload type did not match the published event's
    /// payload at dispatch time. Only reachable when an event hierarchy
    /// changes its context type between levels; registration validation rules
    /// this out for same-context hierarchies.
    #[error("handler '{class}::{method}' expected payload of type '{expected}'")]
    PayloadMismatch {
        /// Name of the owning type.
        class: &'static str,
        /// Name of the skipped method.
        method: &'static str,
        /// Payload type name the handler declared.
        expected: &'static str,
    },
}

impl DispatchError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use evoke::DispatchError;
    ///
    /// let err = DispatchError::PayloadMismatch {
    ///     class: "Listener",
    ///     method: "on_message",
    ///     expected: "MessageContext",
    /// };
    /// assert_eq!(err.as_label(), "payload_mismatch");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            DispatchError::Handler { .. } => "handler_failed",
            DispatchError::PayloadMismatch { .. } => "payload_mismatch",
        }
    }
}
