//! Typed platform API client.
//!
//! The four calls the pipeline needs — verify credentials, list followers,
//! upload media, post status — sit behind the [`PlatformClient`] trait so
//! the pipeline can run against a mock. The production implementation is
//! [`RestClient`]: `reqwest::blocking` with a per-call timeout and OAuth
//! 1.0a request signing.
//!
//! API responses are deserialized into explicit records at the boundary
//! ([`Follower`], [`AuthIdentity`], [`MediaUpload`], [`PostReceipt`]) —
//! nothing downstream touches raw JSON.

pub mod client;
pub mod oauth;
pub mod rest;
pub mod types;

pub use client::{ApiError, PlatformClient};
pub use rest::RestClient;
pub use types::{AuthIdentity, Follower, MediaUpload, PostReceipt};
