use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize structured logging based on verbosity level.
///
/// Logs go to stderr so status lines and `--json` output on stdout stay clean.
pub fn init_logging(verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("pihole_preflight=debug,info"))
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("pihole_preflight=warn,error"))
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(true)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    if verbose {
        tracing::info!("Verbose logging enabled");
    }

    Ok(())
}

/// Log an external command run by a probe
pub fn log_probe(command: &str, args: &[&str], success: bool) {
    let args = args.join(" ");
    if success {
        tracing::debug!(command = command, args = %args, "Probe succeeded");
    } else {
        tracing::debug!(command = command, args = %args, "Probe failed");
    }
}

/// Log the outcome of a preflight stage
pub fn log_stage_outcome(stage: &str, ok: bool) {
    if ok {
        tracing::info!(stage = stage, "Stage passed");
    } else {
        tracing::warn!(stage = stage, "Stage did not pass");
    }
}

/// Log package manager actions
pub fn log_package_action(action: &str, target: &str, success: bool) {
    if success {
        tracing::info!(action = action, target = target, "Package action completed");
    } else {
        tracing::error!(action = action, target = target, "Package action failed");
    }
}

/// Log system information for debugging
pub fn log_system_info() {
    tracing::debug!(
        os = std::env::consts::OS,
        arch = std::env::consts::ARCH,
        version = env!("CARGO_PKG_VERSION"),
        "System information"
    );
}

/// Log performance metrics
pub fn log_performance(operation: &str, duration_ms: u64) {
    tracing::debug!(
        operation = operation,
        duration_ms = duration_ms,
        "Operation performance"
    );
}
