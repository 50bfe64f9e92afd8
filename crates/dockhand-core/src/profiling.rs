//! Profiling utilities based on the `puffin` crate.
//!
//! Scopes are recorded only after [`set_enabled`]`(true)`, so the macros are
//! cheap to leave in hot paths.

pub use puffin::{profile_function, profile_scope};

/// Turn scope recording on or off.
pub fn set_enabled(enabled: bool) {
    puffin::set_scopes_on(enabled);
}

/// Mark the start of a new frame for profiling.
#[inline]
pub fn new_frame() {
    puffin::GlobalProfiler::lock().new_frame();
}

#[cfg(feature = "profiling-server")]
mod server {
    use std::sync::OnceLock;

    /// Global profiling server instance.
    static PROFILING_SERVER: OnceLock<puffin_http::Server> = OnceLock::new();

    /// Default address for the puffin HTTP server.
    pub const DEFAULT_ADDRESS: &str = "0.0.0.0:8585";

    /// Enable scope recording and start a puffin_http server on `address`.
    pub fn init_profiling(address: &str) {
        puffin::set_scopes_on(true);

        match puffin_http::Server::new(address) {
            Ok(server) => {
                tracing::info!("Puffin profiler server started on http://{}", address);
                let _ = PROFILING_SERVER.set(server);
            }
            Err(e) => {
                tracing::error!("Failed to start puffin server: {}", e);
            }
        }
    }
}

#[cfg(feature = "profiling-server")]
pub use server::{DEFAULT_ADDRESS, init_profiling};
