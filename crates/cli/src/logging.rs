// Logging setup
//
// Everything goes to stderr; stdout is reserved for rendered labels and tables.

use anyhow::Result;
use std::path::Path;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{fmt, layer::SubscriberExt, registry::LookupSpan, Layer, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "exam_labels=info";
const LOG_FILE_PREFIX: &str = "exam-labels.log";

/// Install the global subscriber
///
/// The returned guard flushes the file writer on drop and must live until exit.
pub fn init(format: &str, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))?;

    let (file_writer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(writer), Some(guard))
        }
        None => (None, None),
    };
    fn file_layer<S>(writer: NonBlocking) -> impl Layer<S>
    where
        S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    {
        fmt::layer()
            .json()
            .with_ansi(false)
            .with_writer(writer)
    }

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .with(file_writer.map(file_layer))
                .try_init()?;
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty().with_writer(std::io::stderr))
                .with(file_writer.map(file_layer))
                .try_init()?;
        }
    }

    Ok(guard)
}
