//! Readiness and liveness probes.
//!
//! Both probes answer with a small JSON body naming the probe state and the
//! storage backend in use, so an operator can tell a volatile in-memory
//! deployment apart from a Postgres-backed one.

use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{HttpResponse, get, http::header, web};
use serde::Serialize;
use utoipa::ToSchema;

/// Storage backend label reported by the probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// Process-local storage; lost on restart.
    Memory,
    /// PostgreSQL.
    Postgres,
}

/// Probe state shared between the server bootstrap and the handlers.
#[derive(Debug)]
pub struct HealthState {
    storage: StorageKind,
    ready: AtomicBool,
    draining: AtomicBool,
}

impl HealthState {
    /// Fresh state: alive, not yet ready.
    #[must_use]
    pub fn new(storage: StorageKind) -> Self {
        Self {
            storage,
            ready: AtomicBool::new(false),
            draining: AtomicBool::new(false),
        }
    }

    /// Flip readiness once the listener is bound.
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Report the process as draining. Both probes fail from here on.
    pub fn mark_draining(&self) {
        self.draining.store(true, Ordering::Release);
        self.ready.store(false, Ordering::Release);
    }

    fn is_draining(&self) -> bool {
        self.draining.load(Ordering::Acquire)
    }

    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire) && !self.is_draining()
    }

    fn respond(&self, ok: bool, status: ProbeStatus) -> HttpResponse {
        let mut builder = if ok {
            HttpResponse::Ok()
        } else {
            HttpResponse::ServiceUnavailable()
        };
        builder
            .insert_header((header::CACHE_CONTROL, "no-store"))
            .json(ProbeBody {
                status,
                storage: self.storage,
            })
    }
}

#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
enum ProbeStatus {
    Ready,
    Starting,
    Alive,
    Draining,
}

/// Probe response body.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProbeBody {
    status: ProbeStatus,
    storage: StorageKind,
}

/// Readiness probe. 200 once the listener is bound, 503 before that and
/// while draining.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Ready to serve traffic", body = ProbeBody),
        (status = 503, description = "Starting or draining", body = ProbeBody)
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    let status = match (state.is_ready(), state.is_draining()) {
        (true, _) => ProbeStatus::Ready,
        (false, true) => ProbeStatus::Draining,
        (false, false) => ProbeStatus::Starting,
    };
    state.respond(state.is_ready(), status)
}

/// Liveness probe. 503 once shutdown has begun.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Process is alive", body = ProbeBody),
        (status = 503, description = "Process is draining", body = ProbeBody)
    )
)]
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    if state.is_draining() {
        state.respond(false, ProbeStatus::Draining)
    } else {
        state.respond(true, ProbeStatus::Alive)
    }
}
