use std::sync::Mutex;

use tracing_subscriber::{prelude::*, EnvFilter, Registry};

/// Filter used when `RUST_LOG` isn't giving us one.
pub const DEFAULT_FILTER: &str = "wildcard_hierarchy=info";

lazy_static! {
    static ref LOG_INITIALIZED: Mutex<bool> = Mutex::new(false);
}

fn env_filter(default_filter: &str) -> EnvFilter {
    // If RUST_LOG is present and *non-empty* then interpret it and use it.
    // Scripts frequently set RUST_LOG unconditionally but with an empty value,
    // and we don't want that to be interpreted as a desire to silence
    // everything.
    if let Ok(rustlog) = std::env::var("RUST_LOG") {
        if !rustlog.is_empty() {
            if let Ok(filter) = EnvFilter::try_from_default_env() {
                return filter;
            }
        }
    }
    EnvFilter::new(default_filter)
}

/// Initialize logging with `DEFAULT_FILTER` unless `RUST_LOG` says otherwise.
pub fn init_logging() {
    init_logging_with_default(DEFAULT_FILTER);
}

/// Install the global subscriber.  Only the first call in a process does
/// anything, so library tests and the CLI can both call this freely.
pub fn init_logging_with_default(default_filter: &str) {
    let mut initialized = match LOG_INITIALIZED.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    if *initialized {
        return;
    }

    let layer = tracing_subscriber::fmt::layer()
        .compact()
        // Output mostly ends up in logs that get excerpted, where ANSI isn't
        // helpful.
        .with_ansi(false)
        // Wall time takes up a lot of columns and we rarely care about it.
        .without_time()
        .with_writer(std::io::stderr)
        .with_filter(env_filter(default_filter));

    // Something else (a test harness, an embedding application) may already
    // own the global subscriber, which is fine.
    if Registry::default().with(layer).try_init().is_err() {
        debug!("a global tracing subscriber was already installed");
    }
    *initialized = true;
}

#[test]
fn test_init_logging_is_idempotent() {
    init_logging();
    init_logging_with_default("wildcard_hierarchy=debug");
    assert!(*LOG_INITIALIZED.lock().unwrap());
}
