//! Card-trading backend library.
//!
//! Layout follows a hexagonal split: [`domain`] holds the types, ports and
//! services; [`inbound`] adapts HTTP onto the driving ports; [`outbound`]
//! implements the repositories in memory and on Postgres.

pub mod catalogue_import;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
