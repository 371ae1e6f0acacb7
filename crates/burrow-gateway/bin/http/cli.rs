use burrow_gateway::telemetry::LogFormat;
use clap::{Parser, ValueEnum};
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::path::PathBuf;

pub const LISTEN_ADDR_ENV: &str = "BURROW_LISTEN_ADDR";
pub const PUBLIC_BASE_URL_ENV: &str = "BURROW_PUBLIC_BASE_URL";
pub const SNAPSHOT_PATH_ENV: &str = "BURROW_SNAPSHOT_PATH";
pub const PERSISTENCE_ENV: &str = "BURROW_PERSISTENCE";
pub const GENERATOR_ENV: &str = "BURROW_GENERATOR";
pub const FLUSH_INTERVAL_ENV: &str = "BURROW_FLUSH_INTERVAL_SECS";
pub const MAX_ATTEMPTS_ENV: &str = "BURROW_MAX_ATTEMPTS";
pub const LOG_FORMAT_ENV: &str = "BURROW_LOG_FORMAT";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:30805";
pub const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:30805";
pub const DEFAULT_SNAPSHOT_PATH: &str = "urlstore.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PersistenceArg {
    #[value(name = "json-file")]
    JsonFile,
    #[value(name = "in-memory")]
    InMemory,
}

impl Display for PersistenceArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PersistenceArg::JsonFile => write!(f, "json-file"),
            PersistenceArg::InMemory => write!(f, "in-memory"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GeneratorArg {
    #[value(name = "random")]
    Random,
    #[value(name = "seq")]
    Seq,
}

impl Display for GeneratorArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GeneratorArg::Random => write!(f, "random"),
            GeneratorArg::Seq => write!(f, "seq"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    #[value(name = "text")]
    Text,
    #[value(name = "json")]
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Text => LogFormat::Text,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "burrow-gateway")]
pub struct CLI {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    /// Scheme and authority used to build the returned short URLs.
    #[arg(long, env = PUBLIC_BASE_URL_ENV, default_value = DEFAULT_PUBLIC_BASE_URL)]
    pub public_base_url: String,

    #[arg(long, env = SNAPSHOT_PATH_ENV, default_value = DEFAULT_SNAPSHOT_PATH)]
    pub snapshot_path: PathBuf,

    #[arg(
        long,
        env = PERSISTENCE_ENV,
        value_enum,
        default_value_t = PersistenceArg::JsonFile
    )]
    pub persistence: PersistenceArg,

    #[arg(
        long,
        env = GENERATOR_ENV,
        value_enum,
        default_value_t = GeneratorArg::Random
    )]
    pub generator: GeneratorArg,

    #[arg(
        long,
        env = FLUSH_INTERVAL_ENV,
        default_value_t = 300,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub flush_interval_secs: u64,

    #[arg(
        long,
        env = MAX_ATTEMPTS_ENV,
        default_value_t = 100,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub max_attempts: u64,

    #[arg(
        long,
        env = LOG_FORMAT_ENV,
        value_enum,
        default_value_t = LogFormatArg::Text
    )]
    pub log_format: LogFormatArg,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = CLI::try_parse_from(["burrow-gateway"]).unwrap();

        assert_eq!(cli.listen_addr, DEFAULT_LISTEN_ADDR.parse::<SocketAddr>().unwrap());
        assert_eq!(cli.public_base_url, DEFAULT_PUBLIC_BASE_URL);
        assert_eq!(cli.snapshot_path, PathBuf::from(DEFAULT_SNAPSHOT_PATH));
        assert_eq!(cli.persistence, PersistenceArg::JsonFile);
        assert_eq!(cli.generator, GeneratorArg::Random);
        assert_eq!(cli.flush_interval_secs, 300);
        assert_eq!(cli.max_attempts, 100);
        assert_eq!(cli.log_format, LogFormatArg::Text);
    }

    #[test]
    fn zero_flush_interval_is_rejected() {
        assert!(CLI::try_parse_from(["burrow-gateway", "--flush-interval-secs", "0"]).is_err());
    }

    #[test]
    fn in_memory_seq_backend() {
        let cli = CLI::try_parse_from([
            "burrow-gateway",
            "--persistence",
            "in-memory",
            "--generator",
            "seq",
            "--log-format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.persistence, PersistenceArg::InMemory);
        assert_eq!(cli.generator, GeneratorArg::Seq);
        assert_eq!(cli.log_format, LogFormatArg::Json);
    }
}
