//! Credentials and run settings.
//!
//! All secrets come from the environment (a `.env` file is honored when
//! present — `main` loads it before anything else). Missing or empty
//! credential variables are a fatal [`ConfigError`] before any network call.
//!
//! Non-secret settings live in [`RunConfig`]: where the base image and font
//! are, where cards get written, whether only mutual followers are greeted,
//! and the candidate message set. Everything has a default matching the
//! original deployment; the CLI overrides a few of them.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),
    #[error("environment variable {0} must not be empty")]
    EmptyVar(&'static str),
    #[error("no candidate messages configured")]
    NoMessages,
}

/// OAuth 1.0a credentials for the platform API.
///
/// The four values map one-to-one onto the variables the original deployment
/// used: `CONSUMER_TOKEN`, `CONSUMER_TOKEN_SECRET`, `ACCESS_TOKEN`,
/// `ACCESS_TOKEN_SECRET`.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_secret: String,
}

const CONSUMER_TOKEN: &str = "CONSUMER_TOKEN";
const CONSUMER_TOKEN_SECRET: &str = "CONSUMER_TOKEN_SECRET";
const ACCESS_TOKEN: &str = "ACCESS_TOKEN";
const ACCESS_TOKEN_SECRET: &str = "ACCESS_TOKEN_SECRET";

impl Credentials {
    /// Read all four credential variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read credentials through an arbitrary lookup function.
    ///
    /// The seam exists so tests can supply a map instead of mutating the
    /// process environment.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let require = |name: &'static str| -> Result<String, ConfigError> {
            let value = get(name).ok_or(ConfigError::MissingVar(name))?;
            if value.trim().is_empty() {
                return Err(ConfigError::EmptyVar(name));
            }
            Ok(value)
        };
        Ok(Self {
            consumer_key: require(CONSUMER_TOKEN)?,
            consumer_secret: require(CONSUMER_TOKEN_SECRET)?,
            access_token: require(ACCESS_TOKEN)?,
            access_secret: require(ACCESS_TOKEN_SECRET)?,
        })
    }
}

/// The follower listing never paginates: one request, at most this many
/// accounts. Larger follower sets are silently truncated.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Stock greeting messages, used when `VALENTINE_MESSAGES` is not set.
pub const DEFAULT_MESSAGES: &[&str] = &[
    "Happy Valentine's Day, nerd",
    "roses are red, violets are blue, this beaver was rendered just for you",
    "you have been chosen by the valentine beaver",
];

/// Where the handle is drawn on the card, in pixels from the top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub anchor: (i32, i32),
    pub scale: f32,
    pub color: [u8; 3],
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            anchor: (105, 240),
            scale: 32.0,
            color: [0, 0, 0],
        }
    }
}

/// Non-secret settings for one pipeline run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Base image every card is cloned from.
    pub image_path: PathBuf,
    /// TrueType font used for the handle overlay.
    pub font_path: PathBuf,
    /// Directory the rendered cards are written into. Wiped on every run.
    pub output_dir: PathBuf,
    /// Greet only accounts that follow back.
    pub mutual_only: bool,
    /// Follower page size, capped at [`MAX_PAGE_SIZE`].
    pub page_size: u32,
    /// Candidate greeting messages; one is picked uniformly per follower.
    pub messages: Vec<String>,
    pub text: TextStyle,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            image_path: PathBuf::from("beaver.jpg"),
            font_path: PathBuf::from("font.ttf"),
            output_dir: PathBuf::from(".tmp/valentines"),
            mutual_only: true,
            page_size: MAX_PAGE_SIZE,
            messages: DEFAULT_MESSAGES.iter().map(|m| m.to_string()).collect(),
            text: TextStyle::default(),
        }
    }
}

impl RunConfig {
    /// Clamp the page size into `1..=MAX_PAGE_SIZE` and reject an empty
    /// message set. Called once after CLI/env overrides are applied.
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        self.page_size = self.page_size.clamp(1, MAX_PAGE_SIZE);
        if self.messages.is_empty() {
            return Err(ConfigError::NoMessages);
        }
        Ok(self)
    }
}

/// Parse a `VALENTINE_MESSAGES` override: `|`-separated, blanks dropped.
///
/// Returns `None` when the value contains no usable message, so callers fall
/// back to [`DEFAULT_MESSAGES`].
pub fn parse_messages(raw: &str) -> Option<Vec<String>> {
    let messages: Vec<String> = raw
        .split('|')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .collect();
    if messages.is_empty() { None } else { Some(messages) }
}
