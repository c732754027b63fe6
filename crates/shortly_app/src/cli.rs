use std::path::PathBuf;

use clap::Parser;

use crate::logging::LogDestination;

/// Shorten links and keep a local list of them.
#[derive(Debug, Parser)]
#[command(name = "shortly", version)]
pub struct Cli {
    /// Directory holding the stored links, config and log file.
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// RON config file. Defaults to `<data-dir>/shortly.ron` when present.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Shortening service endpoint, overriding the config file.
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Where log output goes.
    #[arg(long, value_enum, default_value_t = LogDestination::File)]
    pub log: LogDestination,

    /// Log at debug level.
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_file_logging() {
        let cli = Cli::try_parse_from(["shortly"]).unwrap();
        assert_eq!(cli.log, LogDestination::File);
        assert!(cli.endpoint.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn parses_overrides() {
        let cli = Cli::try_parse_from([
            "shortly",
            "--data-dir",
            "/tmp/links",
            "--endpoint",
            "http://localhost:9000/shorten",
            "--log",
            "both",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/links")));
        assert_eq!(cli.endpoint.as_deref(), Some("http://localhost:9000/shorten"));
        assert_eq!(cli.log, LogDestination::Both);
        assert!(cli.verbose);
    }
}
