//! Tracing subscriber setup for the binary.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Default filter for a verbosity count (`-v` repeated).
pub fn default_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "claimcheck=info,tower_http=warn",
        1 => "claimcheck=debug,tower_http=debug",
        _ => "trace",
    }
}

/// Install the global subscriber. Logs go to stderr so stdout stays clean
/// for verdicts and `--json` output. `RUST_LOG` overrides the default filter.
pub fn init(verbose: u8, json: bool) {
    let filter = || {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)))
    };

    let layer = if json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_filter(filter())
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .with_filter(filter())
            .boxed()
    };

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry().with(layer).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_by_verbosity() {
        assert_eq!(default_filter(0), "claimcheck=info,tower_http=warn");
        assert!(default_filter(1).contains("debug"));
        assert_eq!(default_filter(3), "trace");
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        init(0, false);
        init(1, true);
    }
}
