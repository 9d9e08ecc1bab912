use std::process::{Command, Child};

use assert_cmd::prelude::CommandCargoExt;
use predicates::{function::FnPredicate, Predicate};
use today_matches_server::{config_handler::Config, models::MatchRecord};

pub struct MatchesServer {
    port: u16,
    child_process: Option<Child>,
}

impl Drop for MatchesServer {
    fn drop(&mut self) {
        if let Some(child) = self.child_process.as_mut() {
            child.kill().expect("Should kill");
        }
    }
}

impl MatchesServer {
    pub fn new(port: u16) -> MatchesServer {
        MatchesServer { port, child_process: None }
    }

    pub fn start(&mut self, path: &str, source_url: &str, timeout_s: u64, refresh_interval_s: u64) {
        let config = Config {
            port: self.port,
            source_url: source_url.to_string(),
            timeout_s,
            refresh_interval_s,
            ..Default::default()
        };

        let config_str = serde_json::to_string(&config).unwrap();
        let config_path = format!("{path}/config.json");
        std::fs::write(config_path.clone(), config_str).unwrap();
        let child_process = Command::cargo_bin("today-matches-server")
            .unwrap()
            .env("CONFIG_PATH", config_path)
            .env_remove("PORT")
            .env_remove("SOURCE_URL")
            .spawn()
            .expect("should start");

        self.child_process = Some(child_process);
    }

    pub async fn get_matches(&self) -> Result<Vec<MatchRecord>, Box<dyn std::error::Error>> {
        Ok(reqwest::get(format!("http://localhost:{}/api/abwjdan", self.port))
            .await?.json().await?)
    }

    pub async fn get_raw_matches(&self) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
        Ok(reqwest::get(format!("http://localhost:{}/api/abwjdan", self.port))
            .await?.json().await?)
    }

    pub async fn get_status(&self, path: &str) -> Result<reqwest::StatusCode, Box<dyn std::error::Error>> {
        Ok(reqwest::get(format!("http://localhost:{}{path}", self.port))
            .await?.status())
    }

    pub async fn retry_until<F>(&self, predicate: FnPredicate<F, Vec<MatchRecord>>, retry_ms: u64) -> Vec<MatchRecord>
    where
        F: Fn(&Vec<MatchRecord>) -> bool,
    {
        let mut nr_loops = 0;
        loop {
            if let Ok(matches) = self.get_matches().await {
                if predicate.eval(&matches) {
                    return matches;
                }
            }
            tokio::time::sleep(std::time::Duration::from_millis(retry_ms)).await;
            nr_loops += 1;
            if nr_loops > 100 {
                panic!("retry failed");
            }
        }
    }

    pub async fn retry_until_up(&self) -> Vec<MatchRecord> {
        self.retry_until(predicates::function::function(|_: &Vec<MatchRecord>| true), 200).await
    }
}
