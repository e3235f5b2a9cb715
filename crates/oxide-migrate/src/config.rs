//! Connection configuration.

use std::fmt;
use std::str::FromStr;

use clap::Args;
use sqlx::mysql::MySqlConnectOptions;

use crate::error::MigrateError;

/// Backend selected by the driver name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Driver {
    /// A real MySQL or MariaDB server.
    MySql,
    /// The logging-only backend.
    DryRun,
}

impl FromStr for Driver {
    type Err = MigrateError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "mysql" | "mariadb" => Ok(Self::MySql),
            "" => Ok(Self::DryRun),
            other => Err(MigrateError::UnsupportedDriver(other.to_string())),
        }
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MySql => f.write_str("mysql"),
            Self::DryRun => f.write_str("dry-run"),
        }
    }
}

/// Database connection parameters.
///
/// Every field can be given as a flag or through an environment variable.
#[derive(Debug, Clone, Args)]
pub struct ConnectParams {
    /// Database username.
    #[arg(short = 'u', long = "user", env = "username", default_value = "")]
    pub user: String,

    /// Database user password.
    #[arg(
        short = 'w',
        long,
        env = "password",
        default_value = "",
        hide_env_values = true
    )]
    pub password: String,

    /// Server name.
    #[arg(short = 's', long = "server", env = "server", default_value = "127.0.0.1")]
    pub host: String,

    /// Server port.
    #[arg(short = 'p', long, env = "port", default_value_t = 3306)]
    pub port: u16,

    /// Database name.
    #[arg(short = 'd', long, env = "database", default_value = "")]
    pub database: String,

    /// Database driver (`mysql`, `mariadb`, or empty for a dry run).
    #[arg(short = 'i', long, env = "driver", default_value = "")]
    pub driver: String,
}

impl Default for ConnectParams {
    fn default() -> Self {
        Self {
            user: String::new(),
            password: String::new(),
            host: "127.0.0.1".to_string(),
            port: 3306,
            database: String::new(),
            driver: String::new(),
        }
    }
}

impl ConnectParams {
    /// Resolves the configured driver.
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError::UnsupportedDriver`] for unknown names.
    pub fn driver(&self) -> Result<Driver, MigrateError> {
        self.driver.parse()
    }

    /// Renders the connection string with the password masked.
    #[must_use]
    pub fn dsn(&self) -> String {
        format!(
            "{}:***@tcp({}:{})/{}",
            self.user, self.host, self.port, self.database
        )
    }

    /// Builds sqlx connect options.
    #[must_use]
    pub fn connect_options(&self) -> MySqlConnectOptions {
        let mut options = MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user);
        if !self.password.is_empty() {
            options = options.password(&self.password);
        }
        if !self.database.is_empty() {
            options = options.database(&self.database);
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_names() {
        assert_eq!("mysql".parse::<Driver>().unwrap(), Driver::MySql);
        assert_eq!("mariadb".parse::<Driver>().unwrap(), Driver::MySql);
        assert_eq!("".parse::<Driver>().unwrap(), Driver::DryRun);
        assert!(matches!(
            "postgres".parse::<Driver>(),
            Err(MigrateError::UnsupportedDriver(name)) if name == "postgres"
        ));
    }

    #[test]
    fn test_dsn_masks_password() {
        let params = ConnectParams {
            user: "app".into(),
            password: "secret".into(),
            database: "shop".into(),
            ..ConnectParams::default()
        };
        let dsn = params.dsn();
        assert_eq!(dsn, "app:***@tcp(127.0.0.1:3306)/shop");
        assert!(!dsn.contains("secret"));
    }

    #[test]
    fn test_unsupported_driver_message() {
        let params = ConnectParams {
            driver: "oracle".into(),
            ..ConnectParams::default()
        };
        assert_eq!(
            params.driver().unwrap_err().to_string(),
            "oracle: unsupported driver"
        );
    }
}
