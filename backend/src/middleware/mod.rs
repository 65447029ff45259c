//! Actix middleware shared by every tradepost route.
//!
//! [`Trace`] scopes a [`crate::TraceId`] around each request.

pub mod trace;

pub use trace::Trace;
