use eyre::EyreHandler;
use itertools::Itertools;
use ronin_bridge::BridgeError;
use ronin_debugger::{DebuggerConfig, ExtractConfigError, dedup_chain};
use std::{error::Error, fmt};

/// Environment variable that switches to the verbose `color-eyre` report.
pub const VERBOSE_ERRORS_ENV: &str = "RONIN_DEBUG_VERBOSE";

/// Suggestion for failures the user can usually fix on their side, found anywhere in the chain.
pub fn hint(error: &(dyn Error + 'static)) -> Option<String> {
    let mut source = Some(error);
    while let Some(err) = source {
        if err.downcast_ref::<ExtractConfigError>().is_some() {
            return Some(format!(
                "check `{}` and the `{}*` environment variables",
                DebuggerConfig::FILE_NAME,
                DebuggerConfig::ENV_PREFIX
            ));
        }
        match err.downcast_ref::<BridgeError>() {
            Some(BridgeError::Bind(_)) => {
                return Some(
                    "another process may be using the port, pass `--port 0` to pick a free one"
                        .to_string(),
                );
            }
            Some(BridgeError::Timeout { .. }) => {
                return Some(
                    "keep the bridge page open, or raise `--request-timeout`".to_string(),
                );
            }
            _ => {}
        }
        source = err.source();
    }
    None
}

/// Error report handler: one line by default, the full chain as context in `Debug` output,
/// followed by a [`hint`] when there is one.
#[derive(Default)]
pub struct Handler {
    debug_handler: Option<Box<dyn EyreHandler>>,
}

impl Handler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the debug handler with a custom one.
    pub fn debug_handler(mut self, debug_handler: Option<Box<dyn EyreHandler>>) -> Self {
        self.debug_handler = debug_handler;
        self
    }
}

impl EyreHandler for Handler {
    fn display(&self, error: &(dyn Error + 'static), f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use fmt::Display;
        dedup_chain(error).into_iter().format("; ").fmt(f)
    }

    fn debug(&self, error: &(dyn Error + 'static), f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(debug_handler) = &self.debug_handler {
            return debug_handler.debug(error, f);
        }

        if f.alternate() {
            return fmt::Debug::fmt(error, f);
        }

        let errors = dedup_chain(error);
        let Some((first, sources)) = errors.split_first() else { return Ok(()) };
        write!(f, "{first}")?;

        if !sources.is_empty() {
            write!(f, "\n\nContext:")?;
            let multiple = sources.len() > 1;
            for (n, error) in sources.iter().enumerate() {
                writeln!(f)?;
                if multiple {
                    write!(f, "- Error #{n}: {error}")?;
                } else {
                    write!(f, "- {error}")?;
                }
            }
        }

        if let Some(hint) = hint(error) {
            write!(f, "\n\nHint: {hint}")?;
        }

        Ok(())
    }

    fn track_caller(&mut self, location: &'static std::panic::Location<'static>) {
        if let Some(debug_handler) = &mut self.debug_handler {
            debug_handler.track_caller(location);
        }
    }
}

/// Installs the [`eyre`] and [`panic`](mod@std::panic) hooks.
///
/// Reports use the short [`Handler`] unless [`VERBOSE_ERRORS_ENV`] is set. Panics always get the
/// `color-eyre` report.
pub fn install() {
    let panic_section = "This is a bug in ronin-debug. Consider reporting it.";
    let (panic_hook, debug_hook) =
        color_eyre::config::HookBuilder::default().panic_section(panic_section).into_hooks();
    panic_hook.install();
    let debug_hook = debug_hook.into_eyre_hook();
    let verbose = std::env::var_os(VERBOSE_ERRORS_ENV).is_some();
    if let Err(e) = eyre::set_hook(Box::new(move |e| {
        Box::new(Handler::new().debug_handler(verbose.then(|| debug_hook(e))))
    })) {
        debug!("failed to install eyre error hook: {e}");
    }
}
