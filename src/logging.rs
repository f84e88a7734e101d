/// Diagnostic output
///
/// Everything goes to stderr so stdout stays clean for piping paths into a
/// picker. `BERRI_LAUNCH_LOG` takes the usual `EnvFilter` directives.

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "BERRI_LAUNCH_LOG";

fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "warn"
    }
}

/// Install the global subscriber; later calls are ignored
pub fn init(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new(default_directive(true))
    } else {
        EnvFilter::try_from_env(LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new(default_directive(false)))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
