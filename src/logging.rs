use env_logger::{Builder, Env, Target};

use crate::stderr_buffer::BufferedStderr;

/// Install the global logger.
///
/// Default filter is `warn` for the crate (`debug` with `--verbose`);
/// `RUST_LOG` overrides either. Output goes through the stderr buffer so the
/// TUI can hold lines back until the terminal is restored.
pub fn init(verbose: bool) {
    let default = if verbose { "folio=debug" } else { "folio=warn" };
    let result = Builder::from_env(Env::default().default_filter_or(default))
        .format_timestamp(None)
        .format_target(false)
        .target(Target::Pipe(Box::new(BufferedStderr::default())))
        .try_init();

    if let Err(e) = result {
        eprintln!("Logger already initialised: {}", e);
    }
}
