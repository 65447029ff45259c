//! OpenAPI schemas and response bodies shared by several handlers.
//!
//! Domain types stay framework-agnostic by not deriving `ToSchema`. The
//! wrappers here mirror their JSON shape and live in the inbound adapter
//! layer where framework concerns belong.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::CatalogueCard;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "Card not found")]
    message: String,
    /// Correlation identifier for tracing this error across systems.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary error details for clients.
    details: Option<serde_json::Value>,
}

/// Catalogue card as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CardBody {
    /// Canonical card id, `{pack}-{number}`.
    #[schema(example = "genetic-apex-a1-1")]
    pub id: String,
    /// Pack slug.
    #[schema(example = "genetic-apex-a1")]
    pub pack: String,
    /// Number within the pack.
    #[schema(example = "1")]
    pub number: String,
    /// Display name.
    #[schema(example = "Bulbasaur")]
    pub name: String,
    /// Artwork location.
    pub image_url: String,
    /// Pack display name.
    #[schema(example = "Genetic Apex A1")]
    pub pack_name: String,
    /// Rarity marker.
    #[schema(example = "◊")]
    pub rarity: String,
}

impl From<CatalogueCard> for CardBody {
    fn from(card: CatalogueCard) -> Self {
        Self {
            id: card.id().to_string(),
            pack: card.pack.to_string(),
            number: card.number.to_string(),
            name: card.name,
            image_url: card.image_url,
            pack_name: card.pack_name,
            rarity: card.rarity,
        }
    }
}

/// Acknowledgement body for commands without a richer result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SuccessBody {
    /// Always `true`.
    pub success: bool,
}

impl SuccessBody {
    pub(crate) const OK: Self = Self { success: true };
}
