//! Tracing setup driven by [`Settings`].
//!
//! `debug = true` logs human-readable lines with file and line numbers.
//! Otherwise each event is one JSON object. `RUST_LOG`, when set and valid,
//! overrides `settings.log_level`.

use tracing::Subscriber;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::settings::Settings;

/// Installs the global subscriber. Later calls leave the first one in place.
pub fn setup_logging(settings: &Settings) {
    let subscriber = Registry::default().with(
        stdout_layer::<Registry>(settings.debug).with_filter(log_filter(&settings.log_level)),
    );
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

fn stdout_layer<S>(debug: bool) -> Box<dyn Layer<S> + Send + Sync + 'static>
where
    S: Subscriber,
    for<'a> S: LookupSpan<'a>,
{
    let layer = tracing_subscriber::fmt::layer().with_target(true);
    if debug {
        layer.pretty().with_file(true).with_line_number(true).boxed()
    } else {
        layer.json().boxed()
    }
}

/// `RUST_LOG` first, then `directive`, then `info`.
fn log_filter(directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directive))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// The span wrapped around one request.
///
/// Events emitted while it is entered carry the request id.
///
/// # Examples
///
/// ```
/// use viewkit_core::logging::request_span;
///
/// let span = request_span("abc-123", "GET", "/articles/");
/// let _guard = span.enter();
/// tracing::info!("handling request");
/// ```
pub fn request_span(request_id: &str, method: &str, path: &str) -> tracing::Span {
    tracing::info_span!("request", id = request_id, method, path)
}
