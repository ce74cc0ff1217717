use eyre::EyreHandler;
use itertools::Itertools;
use std::{error::Error, fmt};

/// Error reporting for `forge-mutate` via `eyre`.
///
/// Prints the error chain on one line, dropping sources whose message is already part of their
/// parent's.
pub struct Handler {
    debug_handler: Option<Box<dyn EyreHandler>>,
}

impl Default for Handler {
    fn default() -> Self {
        Self::new()
    }
}

impl Handler {
    pub fn new() -> Self {
        Self { debug_handler: None }
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
        let Some((error, sources)) = errors.split_first() else { return Ok(()) };
        write!(f, "{error}")?;

        if !sources.is_empty() {
            write!(f, "\n\nContext:")?;
            for source in sources {
                write!(f, "\n- {source}")?;
            }
        }

        Ok(())
    }

    fn track_caller(&mut self, location: &'static std::panic::Location<'static>) {
        if let Some(debug_handler) = &mut self.debug_handler {
            debug_handler.track_caller(location);
        }
    }
}

/// Messages of `error` and its sources, skipping any already contained in the one before.
fn dedup_chain(error: &(dyn Error + 'static)) -> Vec<String> {
    let mut messages: Vec<String> = Vec::new();
    let mut next = Some(error);
    while let Some(error) = next {
        let message = error.to_string();
        if !messages.last().is_some_and(|prev| prev.contains(&message)) {
            messages.push(message);
        }
        next = error.source();
    }
    messages
}

/// Installs the [`eyre`] and panic hooks as the global ones.
///
/// A verbose debug handler replaces the default one when `FORGE_MUTATE_DEBUG` is set.
pub fn install() {
    let (panic_hook, debug_hook) = color_eyre::config::HookBuilder::default().into_hooks();
    panic_hook.install();
    let debug_hook = debug_hook.into_eyre_hook();
    let debug = std::env::var_os("FORGE_MUTATE_DEBUG").is_some();
    if let Err(e) = eyre::set_hook(Box::new(move |e| {
        Box::new(Handler::new().debug_handler(debug.then(|| debug_hook(e))))
    })) {
        debug!("failed to install eyre error hook: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_mutate::MutateError;
    use std::io;

    #[test]
    fn drops_sources_repeated_by_their_parent() {
        let err = MutateError::Io {
            path: "src/Bank.sol".into(),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        };
        let message = "failed to read src/Bank.sol: no such file";
        assert_eq!(dedup_chain(&err), [message]);

        let report = eyre::Report::new(err).wrap_err("loading sources");
        let error: &(dyn Error + 'static) = report.as_ref();
        assert_eq!(dedup_chain(error), ["loading sources", message]);
    }
}
