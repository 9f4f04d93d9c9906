use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "trivia.toml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// Path to the SQLite database file, created on first start.
    #[serde(default = "default_db_path")]
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// Filter directive, overridden by `LOG_LEVEL` when set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    8080
}

fn default_db_path() -> String {
    "trivia.db".to_owned()
}

fn default_log_level() -> String {
    "info".to_owned()
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl ServerSettings {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Layers the optional config file under `TRIVIA_*` environment variables,
/// e.g. `TRIVIA_SERVER__PORT=9000` or `TRIVIA_DATABASE__PATH=/var/lib/trivia.db`.
/// A missing file is not an error.
pub fn load_settings(path: Option<&str>) -> Result<Settings, ::config::ConfigError> {
    dotenv::dotenv().ok();
    ::config::Config::builder()
        .add_source(
            ::config::File::with_name(path.unwrap_or(DEFAULT_CONFIG_FILE))
                .format(::config::FileFormat::Toml)
                .required(false),
        )
        .add_source(
            ::config::Environment::with_prefix("TRIVIA")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_file_is_missing() {
        let settings = load_settings(Some("does-not-exist.toml")).unwrap();
        assert_eq!(settings.database.path, "trivia.db");
        assert_eq!(settings.logging.level, "info");
    }

    #[test]
    fn reads_values_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trivia.toml");
        std::fs::write(
            &path,
            "[server]\nhost = \"127.0.0.1\"\nport = 5000\n\n[database]\npath = \"quiz.db\"\n",
        )
        .unwrap();

        let settings = load_settings(path.to_str()).unwrap();
        assert_eq!(
            settings.server.addr(),
            "127.0.0.1:5000".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(settings.database.path, "quiz.db");
    }
}
