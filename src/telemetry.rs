//! Telemetry helpers for applications embedding `chart-axis`.
//!
//! Scale passes log through `tracing`: `debug` per resolved axis, `trace` for
//! tick lifecycle churn and `warn` for every [`Diagnostic`]. Hosts can wire
//! their own subscriber or call [`init_default_tracing`].

use tracing::warn;

use crate::error::Diagnostic;

/// Initializes a compact `tracing` subscriber when the `telemetry` feature is enabled.
///
/// The filter defaults to `chart_axis=info` unless `RUST_LOG` says otherwise.
/// Returns `false` when the feature is disabled or the host already installed
/// a global subscriber.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("chart_axis=info"));
        return tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .compact()
            .try_init()
            .is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}

/// Emits one diagnostic as a structured `warn` event.
pub(crate) fn report_diagnostic(diagnostic: &Diagnostic) {
    warn!(
        axis = %diagnostic.axis(),
        code = diagnostic.code(),
        message = %diagnostic,
        "axis diagnostic"
    );
}
