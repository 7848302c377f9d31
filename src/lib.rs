//! Solid motor design calculations: nozzle contour design and apogee-targeted
//! motor sizing.
//!
//! The engines live in dedicated workspace crates; this facade re-exports them
//! so front-ends (CLI, services) depend on a single library.

pub use motor_config as config;
pub use motor_core as core;
pub use motor_drag as drag;
pub use motor_export as export;
pub use motor_nozzle as nozzle;
pub use motor_performance as performance;

/// Returns the version of the library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
