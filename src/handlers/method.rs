//! # Handler method shapes and type erasure.
//!
//! A handler method is an ordinary `&self` method on the handler type, in one
//! of four accepted shapes (`E` is the event parameter type):
//!
//! ```text
//! fn(&self, &E)
//! fn(&self, &E) -> Result<(), impl Into<HandlerError>>
//! fn(&self, &E, &mut E::Context)
//! fn(&self, &E, &mut E::Context) -> Result<(), impl Into<HandlerError>>
//! ```
//!
//! The [`HandlerMethod`] adapter trait accepts all four through blanket impls
//! disambiguated by the [`shape`] marker types (the markers only steer trait
//! resolution; user code never names them). Binding a method erases its
//! signature down to one uniform invoker over `&dyn Any` payloads, resolved
//! once at registration time rather than re-resolved on every publish.

use std::any::{type_name, Any, TypeId};

use crate::error::HandlerError;
use crate::events::Event;

/// Fault raised by an erased method invoker.
pub(crate) enum MethodFault {
    /// The handler body returned an error.
    Failed(HandlerError),
    /// A payload did not match the declared parameter type.
    Mismatch { expected: &'static str },
}

/// Uniform invoker: `(owner, event view, context) -> result`.
pub(crate) type ErasedMethod<S> =
    Box<dyn Fn(&S, &dyn Any, &mut dyn Any) -> Result<(), MethodFault> + Send + Sync>;

/// A handler method bound to its erased invoker, plus the signature metadata
/// discovery validates against. Opaque outside the crate.
pub struct BoundMethod<S> {
    /// Context parameter type, when the method declares one.
    pub(crate) context: Option<TypeId>,
    pub(crate) context_name: &'static str,
    pub(crate) invoke: ErasedMethod<S>,
}

/// Marker types distinguishing the accepted handler method shapes.
///
/// These exist only to keep the [`HandlerMethod`] blanket impls coherent;
/// they are inferred, never written.
pub mod shape {
    use std::marker::PhantomData;

    /// `fn(&self, &E)`
    pub struct Plain;
    /// `fn(&self, &E, &mut E::Context)`
    pub struct WithContext;
    /// `fn(&self, &E) -> Result<(), _>`
    pub struct Fallible<Err>(PhantomData<Err>);
    /// `fn(&self, &E, &mut E::Context) -> Result<(), _>`
    pub struct FallibleWithContext<Err>(PhantomData<Err>);
}

/// Adapter over the accepted handler method shapes.
///
/// Implemented for any `Fn` matching one of the four signatures documented on
/// the [module](self). `Shape` is an inference-only marker.
pub trait HandlerMethod<S, E: Event, Shape>: Send + Sync + 'static {
    /// Erases the method into a uniform invoker.
    #[doc(hidden)]
    fn bind(self) -> BoundMethod<S>;
}

fn expect_event<E: Event>(event: &dyn Any) -> Result<&E, MethodFault> {
    event.downcast_ref::<E>().ok_or(MethodFault::Mismatch {
        expected: type_name::<E>(),
    })
}

fn expect_context<C: Any>(context: &mut dyn Any) -> Result<&mut C, MethodFault> {
    context.downcast_mut::<C>().ok_or(MethodFault::Mismatch {
        expected: type_name::<C>(),
    })
}

impl<S, E, F> HandlerMethod<S, E, shape::Plain> for F
where
    S: 'static,
    E: Event,
    F: Fn(&S, &E) + Send + Sync + 'static,
{
    fn bind(self) -> BoundMethod<S> {
        BoundMethod {
            context: None,
            context_name: "",
            invoke: Box::new(
                move |owner: &S, event: &dyn Any, _context: &mut dyn Any| -> Result<(), MethodFault> {
                    self(owner, expect_event::<E>(event)?);
                    Ok(())
                },
            ),
        }
    }
}

impl<S, E, F, Err> HandlerMethod<S, E, shape::Fallible<Err>> for F
where
    S: 'static,
    E: Event,
    Err: Into<HandlerError> + 'static,
    F: Fn(&S, &E) -> Result<(), Err> + Send + Sync + 'static,
{
    fn bind(self) -> BoundMethod<S> {
        BoundMethod {
            context: None,
            context_name: "",
            invoke: Box::new(
                move |owner: &S, event: &dyn Any, _context: &mut dyn Any| -> Result<(), MethodFault> {
                    self(owner, expect_event::<E>(event)?)
                        .map_err(|err| MethodFault::Failed(err.into()))
                },
            ),
        }
    }
}

impl<S, E, F> HandlerMethod<S, E, shape::WithContext> for F
where
    S: 'static,
    E: Event,
    F: Fn(&S, &E, &mut E::Context) + Send + Sync + 'static,
{
    fn bind(self) -> BoundMethod<S> {
        BoundMethod {
            context: Some(TypeId::of::<E::Context>()),
            context_name: type_name::<E::Context>(),
            invoke: Box::new(
                move |owner: &S, event: &dyn Any, context: &mut dyn Any| -> Result<(), MethodFault> {
                    self(
                        owner,
                        expect_event::<E>(event)?,
                        expect_context::<E::Context>(context)?,
                    );
                    Ok(())
                },
            ),
        }
    }
}

impl<S, E, F, Err> HandlerMethod<S, E, shape::FallibleWithContext<Err>> for F
where
    S: 'static,
    E: Event,
    Err: Into<HandlerError> + 'static,
    F: Fn(&S, &E, &mut E::Context) -> Result<(), Err> + Send + Sync + 'static,
{
    fn bind(self) -> BoundMethod<S> {
        BoundMethod {
            context: Some(TypeId::of::<E::Context>()),
            context_name: type_name::<E::Context>(),
            invoke: Box::new(
                move |owner: &S, event: &dyn Any, context: &mut dyn Any| -> Result<(), MethodFault> {
                    self(
                        owner,
                        expect_event::<E>(event)?,
                        expect_context::<E::Context>(context)?,
                    )
                    .map_err(|err| MethodFault::Failed(err.into()))
                },
            ),
        }
    }
}
