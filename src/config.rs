use std::{env, fmt::Display, str::FromStr};

use tracing::{info, warn};

/// Selects how persons are addressed, collapsing the two upstream service
/// variants into one configurable deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdStrategy {
    /// Persons carry a client-supplied opaque `id` string, and the
    /// candle route takes both ids in one path segment.
    Client,
    /// Persons are addressed by their database-generated `_id`, and the
    /// candle route takes the user id from the `userId` cookie.
    Generated,
}

impl FromStr for IdStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "client" => Ok(Self::Client),
            "generated" => Ok(Self::Generated),
            other => Err(format!("unknown id strategy: {other}")),
        }
    }
}

pub struct Config {
    pub port: u16,
    pub mongodb_uri: String,
    pub database: String,
    pub client_origin: String,
    pub id_strategy: IdStrategy,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("PORT", "3080"),
            mongodb_uri: require("MONGODB_URI"),
            database: try_load("MONGODB_DATABASE", "candles"),
            client_origin: try_load("CLIENT_ORIGIN", "http://localhost:3000"),
            id_strategy: try_load("ID_STRATEGY", "generated"),
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found, using default");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}

fn require(key: &str) -> String {
    env::var(key)
        .map_err(|_| {
            warn!("Required environment variable {key} not set");
        })
        .expect("Environment misconfigured!")
}
