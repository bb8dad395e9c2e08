use std::path::Path;

use error_stack::ResultExt;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

use kernel::KernelError;

const DEFAULT_FILTER: &str = "application=debug,driver=debug";

/// Installs the global subscriber: a console layer filtered by `RUST_LOG` and a daily
/// rolling `debug.log` under `directory`.
///
/// The returned guard flushes the file writer when dropped and must be kept alive.
pub fn init(directory: impl AsRef<Path>) -> error_stack::Result<WorkerGuard, KernelError> {
    let appender = tracing_appender::rolling::daily(directory.as_ref(), "debug.log");
    let (non_blocking_appender, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer().with_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| DEFAULT_FILTER.into()),
            ),
        )
        .with(
            tracing_subscriber::fmt::Layer::default()
                .with_writer(non_blocking_appender)
                .with_ansi(false)
                .with_filter(tracing_subscriber::filter::LevelFilter::DEBUG),
        )
        .try_init()
        .change_context_lazy(|| KernelError::Internal)
        .attach_printable_lazy(|| "Failed to install tracing subscriber")?;
    Ok(guard)
}
