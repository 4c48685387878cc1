//! # Valentine
//!
//! Sends a personalized valentine image to every follower of a social
//! account: one base image, one text overlay per follower, one status post
//! per follower with the rendered card attached.
//!
//! # Architecture: One Linear Pipeline
//!
//! The whole program is a single run of a strictly ordered pipeline:
//!
//! ```text
//! 1. Prepare    wipe + recreate the output directory
//! 2. Load       decode the base image and overlay font once
//! 3. Login      verify API credentials, keep the identity
//! 4. Fetch      one page of followers (optionally mutuals only)
//! 5. Generate   per follower: clone template, draw handle, write JPEG
//! 6. Send       per follower: upload media, post "@handle <message>"
//! ```
//!
//! Stage N+1 starts only after stage N has settled for every item. Within
//! the generate and send stages, followers fan out over a rayon parallel map
//! and each item succeeds or fails on its own — one follower's failure never
//! aborts the batch, it only marks that follower `Failed` and excludes them
//! from later stages.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | Env-sourced credentials and run settings (paths, filter, messages) |
//! | [`workspace`] | Output directory wipe/recreate |
//! | [`imaging`] | Card rendering: template clone + text overlay + JPEG write, behind a backend trait |
//! | [`platform`] | Typed platform API client: OAuth 1.0a signing, REST calls, response records |
//! | [`pipeline`] | Stage composition, workflow state, per-follower delivery tracking |
//! | [`output`] | Progress and report formatting for the terminal |
//!
//! # Design Decisions
//!
//! ## No Globals
//!
//! The template image, the authenticated identity and the follower list are
//! threaded through the stages as explicit values ([`pipeline::RunReport`]
//! carries the final per-follower state out). The API client and the image
//! backend sit behind traits at the seams ([`platform::PlatformClient`],
//! [`imaging::CardBackend`]) so the pipeline is testable without touching
//! the network or a font file.
//!
//! ## Single-Page Follower Fetch
//!
//! The follower listing requests at most one page (100 accounts) and never
//! loops. Accounts beyond the first page are silently not greeted. This is a
//! documented capability limit, not a bug.
//!
//! ## Per-Follower Isolation
//!
//! Generation, upload and posting errors are captured per follower and
//! reported at the end as a list of failed handles with the stage that
//! failed. Only configuration, workspace, asset-loading, authentication and
//! fetch errors abort the run.

pub mod config;
pub mod imaging;
pub mod output;
pub mod pipeline;
pub mod platform;
pub mod workspace;
