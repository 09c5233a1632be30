//! Tracing setup: console layer plus an optional JSON file sink.

use std::path::Path;

use colorimeter_config::Logging;
use tracing_subscriber::{EnvFilter, Layer};
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::cli::FILE_GUARD;

/// Install the global subscriber.
///
/// Console level comes from `RUST_LOG` when set, else `console_level`. The
/// file sink, when configured, always writes JSON lines at the configured
/// file level (default `info`).
pub fn init_tracing(console_level: &str, json: bool, logging: Option<&Logging>) {
    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(console_level));

    let console = if json {
        fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_filter(console_filter)
            .boxed()
    } else {
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .with_filter(console_filter)
            .boxed()
    };

    let file = logging.and_then(|l| {
        let path = Path::new(l.file.as_deref()?);
        let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
        let dir = dir.unwrap_or_else(|| Path::new("."));
        let name = path.file_name()?;
        let appender = match l.rotation.as_deref() {
            Some("daily") => tracing_appender::rolling::daily(dir, name),
            Some("hourly") => tracing_appender::rolling::hourly(dir, name),
            _ => tracing_appender::rolling::never(dir, name),
        };
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let _ = FILE_GUARD.set(guard);
        let level = l.level.as_deref().unwrap_or("info");
        Some(
            fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(EnvFilter::new(level))
                .boxed(),
        )
    });

    // A second init (tests) is harmless.
    let _ = tracing_subscriber::registry()
        .with(console)
        .with(file)
        .try_init();
}
