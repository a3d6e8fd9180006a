//! Server configuration, read from the environment.

use std::{borrow::Cow, env, net::SocketAddr};

/// Environment variable holding the address to listen on.
pub const ADDR_VAR: &str = "LATES_ADDR";
/// Environment variable holding the page heading.
pub const TITLE_VAR: &str = "LATES_TITLE";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub addr: SocketAddr,
    pub title: Cow<'static, str>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid socket address in `{var}`: {value:?}")]
    InvalidAddr {
        var: &'static str,
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("`{var}` is not valid unicode")]
    NotUnicode { var: &'static str },
}

impl Config {
    /// Reads the configuration from `LATES_ADDR` and `LATES_TITLE`, falling
    /// back to defaults for unset variables.
    pub fn from_env() -> Result<Config, ConfigError> {
        Config::from_lookup(|var| match env::var(var) {
            Ok(value) => Ok(Some(value)),
            Err(env::VarError::NotPresent) => Ok(None),
            Err(env::VarError::NotUnicode(_)) => Err(ConfigError::NotUnicode { var }),
        })
    }

    fn from_lookup<F>(mut lookup: F) -> Result<Config, ConfigError>
    where
        F: FnMut(&'static str) -> Result<Option<String>, ConfigError>,
    {
        let addr = match lookup(ADDR_VAR)? {
            Some(value) => value
                .trim()
                .parse::<SocketAddr>()
                .map_err(|source| ConfigError::InvalidAddr {
                    var: ADDR_VAR,
                    value,
                    source,
                })?,
            None => default_addr(),
        };

        let title = match lookup(TITLE_VAR)? {
            Some(value) if !value.trim().is_empty() => Cow::Owned(value),
            _ => Cow::Borrowed(lates::web::DEFAULT_TITLE),
        };

        Ok(Config { addr, title })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            addr: default_addr(),
            title: Cow::Borrowed(lates::web::DEFAULT_TITLE),
        }
    }
}

fn default_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;

    use super::*;

    fn lookup(
        vars: &[(&'static str, &str)],
    ) -> impl FnMut(&'static str) -> Result<Option<String>, ConfigError> {
        let vars: HashMap<_, _> = vars
            .iter()
            .map(|(k, v)| (*k, (*v).to_owned()))
            .collect();
        move |var| Ok(vars.get(var).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn reads_addr_and_title() {
        let config = Config::from_lookup(lookup(&[
            (ADDR_VAR, "127.0.0.1:3000"),
            (TITLE_VAR, "Third floor lates"),
        ]))
        .unwrap();
        assert_eq!(config.addr, "127.0.0.1:3000".parse().unwrap());
        assert_eq!(config.title, "Third floor lates");
    }

    #[test]
    fn blank_title_falls_back() {
        let config = Config::from_lookup(lookup(&[(TITLE_VAR, "  ")])).unwrap();
        assert_eq!(config.title, lates::web::DEFAULT_TITLE);
    }

    #[test]
    fn invalid_addr_is_an_error() {
        let err = Config::from_lookup(lookup(&[(ADDR_VAR, "localhost")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidAddr { .. }));
        assert_eq!(
            err.to_string(),
            "invalid socket address in `LATES_ADDR`: \"localhost\""
        );
    }
}
