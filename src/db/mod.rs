mod connection;
mod executor;

pub use connection::*;
pub use executor::*;

use crate::config::ConnectionDefaults;

/// The five user-editable connection fields plus the URL scheme.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectionParams {
    pub scheme: String,
    pub host: String,
    pub port: String,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl ConnectionParams {
    pub fn from_defaults(defaults: &ConnectionDefaults) -> Self {
        Self {
            scheme: defaults.scheme.clone(),
            host: defaults.host.clone(),
            port: defaults.port.clone(),
            user: defaults.user.clone(),
            password: defaults.password.clone(),
            database: defaults.database.clone(),
        }
    }

    /// Values are substituted literally; nothing is escaped or validated.
    pub fn connection_string(&self) -> String {
        format!(
            "{}://{}:{}@{}:{}/{}",
            self.scheme, self.user, self.password, self.host, self.port, self.database
        )
    }
}

impl Default for ConnectionParams {
    fn default() -> Self {
        Self::from_defaults(&ConnectionDefaults::default())
    }
}

/// Connection string with the password masked, for logs and status lines.
pub fn redact(connection_string: &str) -> String {
    let Some((scheme, rest)) = connection_string.split_once("://") else {
        return connection_string.to_string();
    };
    let Some(at) = rest.rfind('@') else {
        return connection_string.to_string();
    };
    let (auth, host) = rest.split_at(at);
    match auth.split_once(':') {
        Some((user, _)) => format!("{scheme}://{user}:***{host}"),
        None => connection_string.to_string(),
    }
}
