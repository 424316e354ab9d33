//! Runtime configuration loaded from environment variables

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::scoring::{DEFAULT_MAX_ANSWER_LEN, DEFAULT_MIN_ANSWER_LEN};

const DEFAULT_BIND: &str = "0.0.0.0:3000";
const DEFAULT_DATA_FILE: &str = "data/game-state.json";
const DEFAULT_STATIC_DIR: &str = "static";

/// Length guard applied to submitted chatbot replies
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnswerLengthPolicy {
    pub enforce: bool,
    pub min: usize,
    pub max: usize,
}

impl Default for AnswerLengthPolicy {
    fn default() -> Self {
        Self {
            enforce: false,
            min: DEFAULT_MIN_ANSWER_LEN,
            max: DEFAULT_MAX_ANSWER_LEN,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind: SocketAddr,
    pub data_file: PathBuf,
    /// Directory served for any non-API path (presentation clients)
    pub static_dir: PathBuf,
    pub answer_length: AnswerLengthPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.parse().expect("default bind address is valid"),
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            answer_length: AnswerLengthPolicy::default(),
        }
    }
}

/// Read and parse an env var, warning and returning `None` on garbage
fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!("Ignoring invalid value for {}: {:?}", key, raw);
            None
        }
    }
}

fn flag_var(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .map(|v| v != "0" && v.to_lowercase() != "false")
}

impl AppConfig {
    /// Load config from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let bind = parse_var("PROMPTMATCH_BIND").unwrap_or(defaults.bind);
        let data_file = parse_var("PROMPTMATCH_DATA_FILE").unwrap_or(defaults.data_file);
        let static_dir = parse_var("PROMPTMATCH_STATIC_DIR").unwrap_or(defaults.static_dir);

        let mut answer_length = AnswerLengthPolicy {
            enforce: flag_var("PROMPTMATCH_ENFORCE_ANSWER_LENGTH")
                .unwrap_or(defaults.answer_length.enforce),
            min: parse_var("PROMPTMATCH_ANSWER_MIN_LEN").unwrap_or(defaults.answer_length.min),
            max: parse_var("PROMPTMATCH_ANSWER_MAX_LEN").unwrap_or(defaults.answer_length.max),
        };
        if answer_length.min > answer_length.max {
            tracing::warn!(
                min = answer_length.min,
                max = answer_length.max,
                "Answer length bounds are inverted, using defaults"
            );
            answer_length.min = DEFAULT_MIN_ANSWER_LEN;
            answer_length.max = DEFAULT_MAX_ANSWER_LEN;
        }

        tracing::info!(
            bind = %bind,
            data_file = %data_file.display(),
            enforce_answer_length = answer_length.enforce,
            "Config loaded"
        );

        Self {
            bind,
            data_file,
            static_dir,
            answer_length,
        }
    }
}
