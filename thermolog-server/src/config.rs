use std::net::SocketAddr;

use clap::Parser;

/// Runtime settings, read from flags with environment fallbacks.
#[derive(Debug, Clone, Parser)]
#[command(name = "thermolog-server", version, about)]
pub(crate) struct Config {
    /// Address the HTTP listener binds to.
    #[arg(long, env = "THERMOLOG_BIND", default_value = "127.0.0.1:8080")]
    pub bind: SocketAddr,

    /// `tracing` filter directive, e.g. `info` or `thermolog_core=debug`.
    #[arg(long, env = "THERMOLOG_LOG", default_value = "info")]
    pub log_filter: String,

    /// Seed the demo locations and thermometers before serving.
    #[arg(long, env = "THERMOLOG_DEMO_DATA")]
    pub demo_data: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_flags() {
        let config = Config::try_parse_from(["thermolog-server"]).expect("parse");

        assert_eq!(config.bind, SocketAddr::from(([127, 0, 0, 1], 8080)));
        assert_eq!(config.log_filter, "info");
        assert!(!config.demo_data);
    }

    #[test]
    fn flags_override_defaults() {
        let config = Config::try_parse_from([
            "thermolog-server",
            "--bind",
            "0.0.0.0:9000",
            "--log-filter",
            "debug",
            "--demo-data",
        ])
        .expect("parse");

        assert_eq!(config.bind.port(), 9000);
        assert_eq!(config.log_filter, "debug");
        assert!(config.demo_data);
    }
}
