//! Skip policy for suites that need an embedded PostgreSQL cluster.
//!
//! A cluster that cannot start (no binaries, sandboxed filesystem, offline
//! download) skips the suite with a `SKIP-TEST-CLUSTER` marker. CI sets
//! `REQUIRE_TEST_CLUSTER=1` so a broken cluster fails loudly instead.

/// True when `REQUIRE_TEST_CLUSTER` is "1", "true" or "yes" (any case).
pub fn cluster_required() -> bool {
    std::env::var("REQUIRE_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Report a cluster setup failure: skip by returning `None`, or panic when
/// the cluster is required.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if cluster_required() {
        panic!("Test cluster setup failed: {reason}. Unset REQUIRE_TEST_CLUSTER to skip.");
    }
    eprintln!("SKIP-TEST-CLUSTER: {reason}");
    None
}
