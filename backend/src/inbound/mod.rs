//! Inbound adapters that translate external requests into domain service
//! calls while keeping framework details at the edge.
//!
//! HTTP handlers and the identity webhook live under [`http`].

pub mod http;
