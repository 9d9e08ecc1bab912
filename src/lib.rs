use std::fmt::Display;

use tracing::log;

pub mod config_handler;
pub mod rest_client;
pub mod models;
pub mod text_normalizer;
pub mod match_extractor;
pub mod clock;
pub mod match_cache;
pub mod api;

pub trait LogResult<T, E: Display> {
    fn ok_log(self, msg: &str) -> Option<T>;
}

impl<T, E: Display> LogResult<T, E> for Result<T, E> {
    fn ok_log(self, msg: &str) -> Option<T> {
        match self {
            Ok(o) => Some(o),
            Err(e) => {
                log::error!("{}: {}", msg, e);
                None
            }
        }
    } 
}
