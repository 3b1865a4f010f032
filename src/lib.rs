//! Thin utilities around external services
//!
//! - [`ai`]: a wrapper over the Gemini generative-language API with persona
//!   overrides, streaming and multi-turn chat.
//! - [`people`]: per-frame pedestrian counting over a video, with an OpenCV HOG
//!   backend behind the `detector` feature.
//! - [`cli`]: the command-line flag parser used by the `ia-m-uv` binary.

pub mod ai;
pub mod cli;
pub mod config;
pub mod error;
pub mod people;

pub use error::{Error, Result};
