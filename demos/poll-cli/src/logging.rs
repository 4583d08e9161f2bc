use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::EnvFilter;

/// Send logs to `{dir}/{app_name}.YYYY-MM-DD`, one file per day.
///
/// The terminal is left to the rendered poll. `RUST_LOG` overrides `level`.
/// Buffered lines are lost unless the returned guard lives until exit.
pub fn init_logging(
    app_name: &str,
    dir: &str,
    level: &str,
) -> anyhow::Result<WorkerGuard> {
    let (writer, guard) =
        tracing_appender::non_blocking(rolling::daily(dir, app_name));

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing: {}", e))?;

    // A panic would otherwise only reach the terminal.
    let prev_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        tracing::error!("panicked: {}", info.to_string().replace('\n', " "));
        prev_hook(info);
    }));

    tracing::info!("logging to {}/{} at {}", dir, app_name, level);
    Ok(guard)
}
