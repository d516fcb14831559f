//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

const CRATE_TARGETS: [&str; 3] = ["groupcensus", "groupcensus_core", "groupcensus_entra"];

/// Filter directive for a `-v` count; dependencies stay at `warn`.
pub fn default_directive(verbosity: u8) -> String {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    std::iter::once("warn".to_string())
        .chain(CRATE_TARGETS.iter().map(|target| format!("{target}={level}")))
        .collect::<Vec<_>>()
        .join(",")
}

/// Installs the stderr subscriber. `RUST_LOG` overrides the verbosity flag.
pub fn init_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive(verbosity)))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_levels() {
        assert_eq!(
            default_directive(0),
            "warn,groupcensus=warn,groupcensus_core=warn,groupcensus_entra=warn"
        );
        assert!(default_directive(1).contains("groupcensus_core=info"));
        assert!(default_directive(2).contains("groupcensus_entra=debug"));
        assert!(default_directive(7).contains("groupcensus=trace"));
    }

    #[test]
    fn test_directives_parse() {
        for verbosity in 0..4 {
            assert!(EnvFilter::try_new(default_directive(verbosity)).is_ok());
        }
    }
}
