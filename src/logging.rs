//! Tracing setup.
//!
//! The subscriber is installed before anything else runs, so config loading
//! can already log. The configured level is applied afterwards through a
//! reload handle, unless `RUST_LOG` is set.

use tracing_subscriber::{EnvFilter, Registry, fmt, prelude::*, reload};

/// Filter used until the config file has been read.
pub const DEFAULT_DIRECTIVE: &str = "songbook=info";

/// Handle for swapping the active filter after startup.
pub type FilterHandle = reload::Handle<EnvFilter, Registry>;

/// Install the global subscriber: `fmt` to stderr behind a reloadable `EnvFilter`.
pub fn init() -> FilterHandle {
    let (filter, handle) = reload::Layer::new(initial_filter(std::env::var("RUST_LOG").ok()));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();

    handle
}

/// Switch to the configured level. `RUST_LOG` always wins.
pub fn apply_level(handle: &FilterHandle, level: &str) {
    let Some(filter) = configured_filter(std::env::var("RUST_LOG").is_ok(), level) else {
        return;
    };
    if let Err(e) = handle.reload(filter) {
        tracing::warn!("Failed to apply log level {:?}: {}", level, e);
    }
}

fn initial_filter(rust_log: Option<String>) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVE))
}

fn configured_filter(rust_log_set: bool, level: &str) -> Option<EnvFilter> {
    if rust_log_set {
        return None;
    }
    match EnvFilter::try_new(format!("songbook={level}")) {
        Ok(filter) => Some(filter),
        Err(e) => {
            tracing::warn!("Invalid log level {:?} in config: {}", level, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    use super::*;

    /// In-memory log sink
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).to_string()
        }
    }

    fn capturing_subscriber(
        filter: EnvFilter,
    ) -> (impl tracing::Subscriber + Send + Sync, FilterHandle, Captured) {
        let captured = Captured::default();
        let writer = captured.clone();
        let (filter, handle) = reload::Layer::new(filter);
        let subscriber = tracing_subscriber::registry().with(filter).with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(move || writer.clone()),
        );
        (subscriber, handle, captured)
    }

    #[test]
    fn test_initial_filter_honours_rust_log() {
        let (subscriber, _handle, captured) =
            capturing_subscriber(initial_filter(Some("songbook=trace".into())));
        tracing::subscriber::with_default(subscriber, || {
            tracing::trace!(target: "songbook", "trace enabled");
        });
        assert!(captured.text().contains("trace enabled"));

        let (subscriber, _handle, captured) = capturing_subscriber(initial_filter(None));
        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!(target: "songbook", "debug hidden");
            tracing::info!(target: "songbook", "info shown");
        });
        let text = captured.text();
        assert!(!text.contains("debug hidden"));
        assert!(text.contains("info shown"));
    }

    #[test]
    fn test_rust_log_overrides_config_level() {
        assert!(configured_filter(true, "debug").is_none());
        assert!(configured_filter(false, "debug").is_some());
    }

    #[test]
    fn test_config_warnings_reach_the_subscriber() {
        let (subscriber, _handle, captured) =
            capturing_subscriber(EnvFilter::new(DEFAULT_DIRECTIVE));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[provider]\nfailure_policy = \"sometimes\"\n").unwrap();

        let config = tracing::subscriber::with_default(subscriber, || {
            crate::config::load_from(&path)
        });

        assert_eq!(config.database.max_connections, 5);
        assert!(captured.text().contains("Failed to parse config file"));
    }

    #[test]
    fn test_reload_applies_configured_level() {
        let (subscriber, handle, captured) =
            capturing_subscriber(EnvFilter::new(DEFAULT_DIRECTIVE));

        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!(target: "songbook", "before reload");
            let filter = configured_filter(false, "debug").unwrap();
            handle.reload(filter).unwrap();
            tracing::debug!(target: "songbook", "after reload");
        });

        let text = captured.text();
        assert!(!text.contains("before reload"));
        assert!(text.contains("after reload"));
    }
}
