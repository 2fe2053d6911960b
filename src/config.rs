use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use anyhow::{Context, Result};

const DEFAULT_PORT: u16 = 9090;

/// Runtime settings, read from the environment (and `.env`, if present).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub address: SocketAddr,
    /// Replace the database contents with the bundled fixture on start-up.
    pub seed_on_start: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;
        let host = match lookup("HOST") {
            Some(host) => host
                .parse::<IpAddr>()
                .with_context(|| format!("HOST '{host}' is not an IP address"))?,
            None => IpAddr::V4(Ipv4Addr::LOCALHOST),
        };
        let port = match lookup("PORT") {
            Some(port) => port
                .parse::<u16>()
                .with_context(|| format!("PORT '{port}' is not a valid port"))?,
            None => DEFAULT_PORT,
        };
        let seed_on_start = lookup("SEED_ON_START")
            .map(|value| matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            database_url,
            address: SocketAddr::new(host, port),
            seed_on_start,
        })
    }
}
