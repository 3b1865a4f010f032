//! Environment configuration
//!
//! Binaries call [`Config::from_env`], which also loads a `.env` file when one is
//! present. The Gemini client resolves its credential through [`resolve_api_key`]
//! so both paths agree on the variable name.

use crate::{Error, Result};
use std::path::PathBuf;

pub const API_KEY_VAR: &str = "GOOGLE_API_KEY";
pub const MODEL_VAR: &str = "GEMINI_MODEL";
pub const VIDEO_PATH_VAR: &str = "PEOPLE_VIDEO_PATH";

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_VIDEO_PATH: &str = "videos/pessoas3.mp4";

#[derive(Debug, Clone)]
pub struct Config {
    pub google_api_key: Option<String>,
    pub gemini_model: String,
    pub video_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            google_api_key: lookup(API_KEY_VAR).filter(|key| !key.trim().is_empty()),
            gemini_model: lookup(MODEL_VAR)
                .filter(|model| !model.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            video_path: lookup(VIDEO_PATH_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_VIDEO_PATH)),
        }
    }
}

/// Returns the explicit key when given, otherwise `GOOGLE_API_KEY` from the process
/// environment.
pub fn resolve_api_key(explicit: Option<String>) -> Result<String> {
    resolve_api_key_with(explicit, |name| std::env::var(name).ok())
}

pub fn resolve_api_key_with(
    explicit: Option<String>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<String> {
    explicit
        .or_else(|| lookup(API_KEY_VAR))
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| {
            Error::Config(format!(
                "Gemini API key was not provided and {} is not set. \
                 Pass the key explicitly or set the environment variable.",
                API_KEY_VAR
            ))
        })
}
