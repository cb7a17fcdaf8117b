// crates/import-harness/src/db/config.rs
// ============================================================================
// Module: Database Settings
// Description: Engine selection and connection settings from env vars.
// Dependencies: std
// ============================================================================

//! ## Overview
//! `DB_ENGINE` selects the engine (`mysql` by default). The `mysql` and
//! `postgres` engines need `DB_HOST`, `DB_USER`, `DB_PASSWORD`, `DB_NAME` and
//! an optional `DB_PORT` that defaults to the engine's standard port. The
//! `sqlite` engine treats `DB_NAME` as a database file path.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::config::ConfigError;
use crate::config::HarnessEnv;
use crate::config::read_env_nonempty;
use crate::config::require_env;

/// MySQL port used when `DB_PORT` is unset.
pub const DEFAULT_MYSQL_PORT: u16 = 3306;

/// Postgres port used when `DB_PORT` is unset.
pub const DEFAULT_POSTGRES_PORT: u16 = 5432;

/// Supported database engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbEngine {
    /// Networked MySQL or `MariaDB` server.
    Mysql,
    /// Networked Postgres server.
    Postgres,
    /// Local `SQLite` file.
    Sqlite,
}

impl DbEngine {
    /// Returns the canonical engine name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mysql => "mysql",
            Self::Postgres => "postgres",
            Self::Sqlite => "sqlite",
        }
    }

    /// Returns the port used when `DB_PORT` is unset, if the engine is
    /// networked.
    #[must_use]
    pub const fn default_port(self) -> Option<u16> {
        match self {
            Self::Mysql => Some(DEFAULT_MYSQL_PORT),
            Self::Postgres => Some(DEFAULT_POSTGRES_PORT),
            Self::Sqlite => None,
        }
    }
}

impl FromStr for DbEngine {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "mysql" | "mariadb" => Ok(Self::Mysql),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "sqlite" => Ok(Self::Sqlite),
            _ => Err(ConfigError::Invalid {
                name: HarnessEnv::DbEngine.as_str().to_string(),
                reason: format!("must be mysql, postgres or sqlite, got {raw}"),
            }),
        }
    }
}

/// Connection settings for a networked database server.
#[derive(Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Server host.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Login user.
    pub user: String,
    /// Login password.
    pub password: String,
    /// Database name.
    pub dbname: String,
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("dbname", &self.dbname)
            .finish()
    }
}

/// Connection settings for one database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseConfig {
    /// MySQL server.
    Mysql(ServerConfig),
    /// Postgres server.
    Postgres(ServerConfig),
    /// `SQLite` database file; the file must already exist.
    Sqlite {
        /// Database file path.
        path: PathBuf,
    },
}

impl DatabaseConfig {
    /// Returns the configured engine.
    #[must_use]
    pub const fn engine(&self) -> DbEngine {
        match self {
            Self::Mysql(_) => DbEngine::Mysql,
            Self::Postgres(_) => DbEngine::Postgres,
            Self::Sqlite {
                ..
            } => DbEngine::Sqlite,
        }
    }

    /// Reads database settings from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error when a required variable is missing or a value fails
    /// validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        let engine = read_env_nonempty(HarnessEnv::DbEngine.as_str())?
            .map_or(Ok(DbEngine::Mysql), |raw| raw.parse())?;
        match engine {
            DbEngine::Sqlite => Ok(Self::Sqlite {
                path: PathBuf::from(require_env(HarnessEnv::DbName)?),
            }),
            DbEngine::Mysql => Ok(Self::Mysql(ServerConfig::from_env(DEFAULT_MYSQL_PORT)?)),
            DbEngine::Postgres => {
                Ok(Self::Postgres(ServerConfig::from_env(DEFAULT_POSTGRES_PORT)?))
            }
        }
    }
}

impl ServerConfig {
    /// Reads server settings, using `default_port` when `DB_PORT` is unset.
    fn from_env(default_port: u16) -> Result<Self, ConfigError> {
        Ok(Self {
            host: require_env(HarnessEnv::DbHost)?,
            port: read_port(default_port)?,
            user: require_env(HarnessEnv::DbUser)?,
            password: require_env(HarnessEnv::DbPassword)?,
            dbname: require_env(HarnessEnv::DbName)?,
        })
    }
}

/// Reads `DB_PORT`, falling back to `default_port`.
fn read_port(default_port: u16) -> Result<u16, ConfigError> {
    let name = HarnessEnv::DbPort.as_str();
    let Some(raw) = read_env_nonempty(name)? else {
        return Ok(default_port);
    };
    match raw.trim().parse::<u16>() {
        Ok(port) if port > 0 => Ok(port),
        _ => Err(ConfigError::Invalid {
            name: name.to_string(),
            reason: "must be a port number between 1 and 65535".to_string(),
        }),
    }
}
