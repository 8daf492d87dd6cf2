//! Route handlers and their type erasure.
//!
//! Two handler shapes are accepted:
//!
//! ```text
//! async fn(Request) -> impl IntoResponse                 probes, fixed answers
//! async fn(Request, S) -> impl IntoResponse              handlers that need the router state
//! ```
//!
//! The router's state `S` (the [`QueryEngine`](crate::QueryEngine) in this
//! service) is bound into the handler when the route is registered, so the
//! erased form only ever sees a [`Request`].

use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::Arc;

use crate::request::Request;
use crate::response::{IntoResponse, Response};

#[doc(hidden)]
pub type BoxFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

#[doc(hidden)]
pub trait ErasedHandler: Send + Sync + 'static {
    fn call(&self, req: Request) -> BoxFuture;
}

#[doc(hidden)]
pub type BoxedHandler = Arc<dyn ErasedHandler>;

/// A route handler for a router with state `S`.
///
/// `T` only tells the two shapes apart; callers never name it.
pub trait Handler<T, S>: private::Sealed<T, S> + Send + Sync + 'static {
    #[doc(hidden)]
    fn bind(self, state: S) -> BoxedHandler;
}

mod private {
    pub trait Sealed<T, S> {}
}

// ── Request only ──────────────────────────────────────────────────────────────

impl<F, Fut, S> private::Sealed<(Request,), S> for F
where
    F: Fn(Request) -> Fut,
{
}

impl<F, Fut, R, S> Handler<(Request,), S> for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn bind(self, _state: S) -> BoxedHandler {
        Arc::new(Stateless(self, PhantomData))
    }
}

struct Stateless<F, R>(F, PhantomData<fn() -> R>);

impl<F, Fut, R> ErasedHandler for Stateless<F, R>
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call(&self, req: Request) -> BoxFuture {
        let fut = (self.0)(req);
        Box::pin(async move { fut.await.into_response() })
    }
}

// ── Request + state ───────────────────────────────────────────────────────────

impl<F, Fut, S> private::Sealed<(Request, S), S> for F
where
    F: Fn(Request, S) -> Fut,
{
}

impl<F, Fut, R, S> Handler<(Request, S), S> for F
where
    F: Fn(Request, S) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
    S: Clone + Send + Sync + 'static,
{
    fn bind(self, state: S) -> BoxedHandler {
        Arc::new(Stateful { handler: self, state, _out: PhantomData })
    }
}

struct Stateful<F, S, R> {
    handler: F,
    state: S,
    _out: PhantomData<fn() -> R>,
}

impl<F, Fut, R, S> ErasedHandler for Stateful<F, S, R>
where
    F: Fn(Request, S) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
    S: Clone + Send + Sync + 'static,
{
    fn call(&self, req: Request) -> BoxFuture {
        let fut = (self.handler)(req, self.state.clone());
        Box::pin(async move { fut.await.into_response() })
    }
}
