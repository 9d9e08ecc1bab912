use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::LogResult;

const DEFAULT_CONFIG_PATH: &str = "./deployment/config.json";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    #[serde(default="default_port")]
    pub port: u16,

    #[serde(default="default_route")]
    pub route: String,

    #[serde(default="default_source_url")]
    pub source_url: String,

    #[serde(default="default_user_agent")]
    pub user_agent: String,

    #[serde(default="default_timeout_s")]
    pub timeout_s: u64,

    #[serde(default="default_refresh_interval_s")]
    pub refresh_interval_s: u64,
}

fn default_port() -> u16 {
    5000
}

fn default_route() -> String {
    "/api/abwjdan".to_string()
}

fn default_source_url() -> String {
    "https://jdwel.com/today/".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36".to_string()
}

fn default_timeout_s() -> u64 {
    20
}

fn default_refresh_interval_s() -> u64 {
    60 * 5
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: default_port(),
            route: default_route(),
            source_url: default_source_url(),
            user_agent: default_user_agent(),
            timeout_s: default_timeout_s(),
            refresh_interval_s: default_refresh_interval_s(),
        }
    }
}

impl Config {
    /// Scheme, host and port of `source_url`, e.g. `https://jdwel.com`.
    pub fn get_base_url(&self) -> Result<String, anyhow::Error> {
        let url = reqwest::Url::parse(&self.source_url)
            .with_context(|| format!("Invalid source_url {}", self.source_url))?;
        if !url.has_host() {
            anyhow::bail!("source_url {} has no host", self.source_url);
        }
        Ok(url.origin().ascii_serialization())
    }

    pub fn get_refresh_interval(&self) -> Result<chrono::Duration, anyhow::Error> {
        i64::try_from(self.refresh_interval_s)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .with_context(|| format!("refresh_interval_s {} out of range", self.refresh_interval_s))
    }
}

pub fn get_config() -> Result<Config, anyhow::Error> {
    let explicit_path = std::env::var("CONFIG_PATH").ok();
    let path = explicit_path.clone().unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    let mut result: Config = if explicit_path.is_none() && !Path::new(&path).exists() {
        println!("[CONFIG] No config at {path}, using defaults");
        Config::default()
    } else {
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Unable to read config at {path}"))?;
        serde_json::from_str(&data)
            .with_context(|| format!("Could not parse JSON at {path}!"))?
    };

    if let Some(port) = std::env::var("PORT").ok().and_then(|e| e.parse::<u16>().ok_log("[CONFIG] Invalid PORT")) {
        result.port = port;
        println!("[CONFIG] PORT {}", result.port);
    }
    if let Ok(source_url) = std::env::var("SOURCE_URL") {
        result.source_url = source_url;
        println!("[CONFIG] SOURCE_URL {}", result.source_url);
    }
    if !result.route.starts_with('/') {
        anyhow::bail!("route {} must start with /", result.route);
    }
    println!("[CONFIG] {:?}", result);
    Ok(result)
}
