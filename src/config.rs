use std::{env, net::IpAddr, path::PathBuf, time::Duration};
use tracing::warn;

const DEFAULT_DATA_PATH: &str = "data/state.json";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_SWEEP_SECS: u64 = 3600;

#[derive(Debug, Clone)]
pub struct Config {
    pub data_path: PathBuf,
    pub bind: IpAddr,
    pub port: u16,
    pub sweep_interval: Duration,
}

impl Config {
    /// Reads `APP_DATA_PATH`, `APP_BIND`, `PORT` and `OVERDUE_SWEEP_SECS`.
    pub fn from_env() -> Self {
        Self {
            data_path: resolve_data_path(),
            bind: parse_var("APP_BIND").unwrap_or(IpAddr::from([127, 0, 0, 1])),
            port: parse_var("PORT").unwrap_or(DEFAULT_PORT),
            sweep_interval: Duration::from_secs(
                parse_var("OVERDUE_SWEEP_SECS")
                    .filter(|secs| *secs > 0)
                    .unwrap_or(DEFAULT_SWEEP_SECS),
            ),
        }
    }
}

pub fn resolve_data_path() -> PathBuf {
    env::var("APP_DATA_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_PATH))
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    let value = env::var(name).ok()?;
    match value.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!("ignoring invalid {name}={value:?}");
            None
        }
    }
}
