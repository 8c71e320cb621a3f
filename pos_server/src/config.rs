use std::{env, fmt::Display, str::FromStr};

use log::*;
use pos_common::helpers::parse_boolean_flag;

const DEFAULT_POS_HOST: &str = "127.0.0.1";
const DEFAULT_POS_PORT: u16 = 8360;
const DEFAULT_DATABASE_URL: &str = "sqlite://data/pos_store.db";
const DEFAULT_MAX_CONNECTIONS: u32 = 25;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// The size of the database connection pool
    pub max_connections: u32,
    /// If true, the database is created if it does not exist, and the embedded migrations are run at startup.
    pub auto_migrate: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_POS_HOST.to_string(),
            port: DEFAULT_POS_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            auto_migrate: true,
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("POS_HOST").ok().unwrap_or_else(|| DEFAULT_POS_HOST.into());
        let port = parse_env_or("POS_PORT", DEFAULT_POS_PORT);
        let database_url = env::var("POS_DATABASE_URL").ok().unwrap_or_else(|| {
            warn!("🪛️ POS_DATABASE_URL is not set. Using the default, {DEFAULT_DATABASE_URL}.");
            DEFAULT_DATABASE_URL.to_string()
        });
        let max_connections = match parse_env_or("POS_DB_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS) {
            0 => {
                warn!("🪛️ POS_DB_MAX_CONNECTIONS must be at least 1. Using the default, {DEFAULT_MAX_CONNECTIONS}.");
                DEFAULT_MAX_CONNECTIONS
            },
            n => n,
        };
        let auto_migrate = parse_boolean_flag(env::var("POS_AUTO_MIGRATE").ok(), true);
        Self { host, port, database_url, max_connections, auto_migrate }
    }
}

fn parse_env_or<T>(name: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env::var(name) {
        Ok(s) => s.trim().parse::<T>().unwrap_or_else(|e| {
            warn!("🪛️ {s} is not a valid value for {name}. {e} Using the default, {default}, instead.");
            default
        }),
        Err(_) => default,
    }
}
