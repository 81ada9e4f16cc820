use std::env;
use std::fmt;
use std::str::FromStr;

use npm_registry::Configuration;

use crate::error::ServerError;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Which transports the process exposes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Transport {
    #[default]
    Stdio,
    Http,
    Both,
}

impl FromStr for Transport {
    type Err = ServerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stdio" => Ok(Transport::Stdio),
            "http" => Ok(Transport::Http),
            "both" => Ok(Transport::Both),
            other => Err(ServerError::Config(format!(
                "MCP_TRANSPORT must be stdio, http or both, got `{other}`"
            ))),
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Transport::Stdio => "stdio",
            Transport::Http => "http",
            Transport::Both => "both",
        })
    }
}

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub transport: Transport,
    pub host: String,
    pub port: u16,
    pub npm: Configuration,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ServerError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ServerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let transport = match lookup("MCP_TRANSPORT") {
            Some(value) => value.parse()?,
            None => Transport::default(),
        };

        let port = match lookup("PORT") {
            Some(value) => value.trim().parse::<u16>().map_err(|err| {
                ServerError::Config(format!("PORT must be a port number, got `{value}`: {err}"))
            })?,
            None => DEFAULT_PORT,
        };

        let host = lookup("MCP_HOST").unwrap_or_else(|| DEFAULT_HOST.to_owned());

        let mut npm = Configuration::new();
        if let Some(url) = lookup("NPM_REGISTRY_URL") {
            npm = npm.with_registry_base(url);
        }
        if let Some(ua) = lookup("NPM_MCP_USER_AGENT") {
            npm = npm.with_user_agent(ua);
        }
        if let Some(value) = lookup("NPM_MCP_TIMEOUT_SECS") {
            let secs = value.trim().parse::<u64>().map_err(|err| {
                ServerError::Config(format!(
                    "NPM_MCP_TIMEOUT_SECS must be a number of seconds, got `{value}`: {err}"
                ))
            })?;
            npm = npm.with_timeout(secs);
        }

        Ok(Self {
            transport,
            host,
            port,
            npm,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
