//! # Application settings
//!
//! Settings are layered the usual way: built-in defaults, then an optional
//! `config.toml` next to the binary, then environment variables (a `.env` file
//! is loaded first via `dotenvy`).
//!
//! | Key (env var) | Default | Effect |
//! |---------------|---------|--------|
//! | `DB_PATH` | `data.db` | SQLite database file |
//! | `SIGNUPS_ALLOWED` | `false` | whether `POST /api/v1/signup` creates accounts |
//! | `PORT` | `18080` | TCP port to bind, must be within `0..=65535` |
//! | `READ_TIMEOUT_SECS` | `30` | max time to read a request body |
//! | `WRITE_TIMEOUT_SECS` | `120` | max time to produce a response |
//! | `IDLE_TIMEOUT_SECS` | `120` | max keep-alive idle time between requests |
//! | `LOG_FILE` | `app.log` | log file, opened in append mode |

use std::path::PathBuf;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File, FileFormat};

pub const DEFAULT_PORT: u16 = 18080;

/// Server timeouts, all applied per connection or per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeouts {
    pub read: Duration,
    pub write: Duration,
    pub idle: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            read: Duration::from_secs(30),
            // Longer for large downloads.
            write: Duration::from_secs(120),
            idle: Duration::from_secs(120),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub db_path: PathBuf,
    pub signups_allowed: bool,
    pub port: u16,
    pub timeouts: Timeouts,
    pub log_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("data.db"),
            signups_allowed: false,
            port: DEFAULT_PORT,
            timeouts: Timeouts::default(),
            log_file: PathBuf::from("app.log"),
        }
    }
}

impl Settings {
    /// Load settings from `config.toml` (optional) and the environment.
    pub fn new() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = Self::builder()?
            .add_source(
                File::with_name("config.toml")
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(Environment::default().try_parsing(true))
            .build()?;

        Self::from_config(&config)
    }

    /// A builder pre-populated with every default.
    pub fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        let defaults = Settings::default();
        Config::builder()
            .set_default("db_path", defaults.db_path.to_string_lossy().into_owned())?
            .set_default("signups_allowed", defaults.signups_allowed)?
            .set_default("port", i64::from(defaults.port))?
            .set_default("read_timeout_secs", defaults.timeouts.read.as_secs())?
            .set_default("write_timeout_secs", defaults.timeouts.write.as_secs())?
            .set_default("idle_timeout_secs", defaults.timeouts.idle.as_secs())?
            .set_default("log_file", defaults.log_file.to_string_lossy().into_owned())
    }

    /// Freeze a built [`Config`] into validated settings.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let port = config.get_int("port")?;
        let port = u16::try_from(port).map_err(|_| {
            ConfigError::Message(format!("port out of range(0-65535): {port}"))
        })?;

        Ok(Self {
            db_path: PathBuf::from(config.get_string("db_path")?),
            signups_allowed: config.get_bool("signups_allowed")?,
            port,
            timeouts: Timeouts {
                read: seconds(config, "read_timeout_secs")?,
                write: seconds(config, "write_timeout_secs")?,
                idle: seconds(config, "idle_timeout_secs")?,
            },
            log_file: PathBuf::from(config.get_string("log_file")?),
        })
    }
}

fn seconds(config: &Config, key: &str) -> Result<Duration, ConfigError> {
    let secs = config.get_int(key)?;
    let secs = u64::try_from(secs)
        .map_err(|_| ConfigError::Message(format!("{key} must not be negative: {secs}")))?;
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(overrides: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let mut builder = Settings::builder()?;
        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }
        Settings::from_config(&builder.build()?)
    }

    #[test]
    fn test_defaults() {
        let settings = load(&[]).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.db_path, PathBuf::from("data.db"));
        assert!(!settings.signups_allowed);
        assert_eq!(settings.timeouts.read, Duration::from_secs(30));
        assert_eq!(settings.timeouts.write, Duration::from_secs(120));
    }

    #[test]
    fn test_overrides() {
        let settings = load(&[
            ("db_path", "/tmp/notes.db"),
            ("signups_allowed", "true"),
            ("port", "8080"),
            ("idle_timeout_secs", "5"),
        ])
        .unwrap();
        assert_eq!(settings.db_path, PathBuf::from("/tmp/notes.db"));
        assert!(settings.signups_allowed);
        assert_eq!(settings.port, 8080);
        assert_eq!(settings.timeouts.idle, Duration::from_secs(5));
    }

    #[test]
    fn test_port_range() {
        assert_eq!(load(&[("port", "0")]).unwrap().port, 0);
        assert_eq!(load(&[("port", "65535")]).unwrap().port, 65535);

        let err = load(&[("port", "65536")]).unwrap_err();
        assert!(err.to_string().contains("port out of range"));
        assert!(load(&[("port", "-1")]).is_err());
    }

    #[test]
    fn test_negative_timeout() {
        assert!(load(&[("write_timeout_secs", "-3")]).is_err());
    }
}
