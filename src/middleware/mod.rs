//! Middleware layer.
//!
//! Cross-cutting request handling that wraps [`Router::dispatch`]. The only
//! layer today is [`trace`].

mod trace;

pub(crate) use trace::trace;
