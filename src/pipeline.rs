//! Stage composition and per-follower delivery tracking.
//!
//! [`run`] drives the whole workflow: prepare the workspace, verify
//! credentials, fetch followers, generate cards, send them. Stage order is
//! strict; within the generate and send stages followers fan out over rayon
//! parallel maps and settle independently.
//!
//! ## Delivery State Machine
//!
//! ```text
//! Pending → Generated → Uploaded → Sent
//!     └────────┴───────────┴──→ Failed(stage, reason)
//! ```
//!
//! A follower that fails at any stage keeps the failure and is skipped by
//! every later stage. There are no retries. Fatal errors (workspace, auth,
//! fetch) abort the run before any per-follower work starts.

use crate::config::RunConfig;
use crate::imaging::{CardBackend, ComposeParams, Quality};
use crate::output;
use crate::platform::{ApiError, AuthIdentity, Follower, PlatformClient};
use crate::workspace::{self, FilesystemError};
use rayon::prelude::*;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort the entire run.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("workspace setup failed: {0}")]
    Filesystem(#[from] FilesystemError),
    #[error("login failed: {0}")]
    Auth(ApiError),
    #[error("follower fetch failed: {0}")]
    Fetch(ApiError),
}

/// The stage at which a follower's delivery failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStage {
    Generate,
    Upload,
    Post,
}

impl std::fmt::Display for DeliveryStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DeliveryStage::Generate => "generate",
            DeliveryStage::Upload => "upload",
            DeliveryStage::Post => "post",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryStatus {
    Pending,
    Generated,
    Uploaded,
    Sent,
    Failed { stage: DeliveryStage, reason: String },
}

/// One follower's journey through the pipeline.
#[derive(Debug, Clone)]
pub struct Delivery {
    pub follower: Follower,
    /// Card location: `<output_dir>/<lowercased handle>.jpg`.
    pub file: PathBuf,
    pub status: DeliveryStatus,
}

impl Delivery {
    fn new(follower: Follower, config: &RunConfig) -> Self {
        let file = card_path(config, &follower.handle);
        Self {
            follower,
            file,
            status: DeliveryStatus::Pending,
        }
    }

    fn fail(&mut self, stage: DeliveryStage, reason: impl ToString) {
        self.status = DeliveryStatus::Failed {
            stage,
            reason: reason.to_string(),
        };
    }
}

/// Final state of one run: who we were, what happened per follower.
#[derive(Debug)]
pub struct RunReport {
    pub identity: AuthIdentity,
    pub deliveries: Vec<Delivery>,
}

impl RunReport {
    pub fn sent(&self) -> usize {
        self.deliveries
            .iter()
            .filter(|d| d.status == DeliveryStatus::Sent)
            .count()
    }

    /// Failed handles with the stage and reason, in follower order.
    pub fn failures(&self) -> Vec<(&str, DeliveryStage, &str)> {
        self.deliveries
            .iter()
            .filter_map(|d| match &d.status {
                DeliveryStatus::Failed { stage, reason } => {
                    Some((d.follower.handle.as_str(), *stage, reason.as_str()))
                }
                _ => None,
            })
            .collect()
    }
}

/// Where a follower's card lives on disk.
pub fn card_path(config: &RunConfig, handle: &str) -> PathBuf {
    config
        .output_dir
        .join(format!("{}.jpg", handle.to_lowercase()))
}

/// Apply the mutual-follow filter; order is preserved as the API returned it.
pub fn keep_followers(followers: Vec<Follower>, mutual_only: bool) -> Vec<Follower> {
    if !mutual_only {
        return followers;
    }
    followers.into_iter().filter(|f| f.following).collect()
}

/// Pick a greeting uniformly at random from the candidate set.
///
/// `messages` must be non-empty; [`RunConfig::validated`] enforces this
/// before a run starts, and [`run`] asserts it.
pub fn pick_message<'a>(rng: &mut fastrand::Rng, messages: &'a [String]) -> &'a str {
    &messages[rng.usize(..messages.len())]
}

/// Prefix the greeting with the follower mention.
pub fn mention(handle: &str, message: &str) -> String {
    format!("@{} {}", handle, message)
}

/// Run the whole pipeline against the given backend and client.
///
/// Returns `Err` only for run-fatal failures; per-follower problems are
/// captured inside the report.
pub fn run(
    config: &RunConfig,
    backend: &impl CardBackend,
    client: &impl PlatformClient,
) -> Result<RunReport, PipelineError> {
    debug_assert!(
        !config.messages.is_empty(),
        "run requires at least one candidate message"
    );

    output::print_stage("Preparing workspace");
    workspace::prepare(&config.output_dir)?;

    output::print_stage("Logging in");
    let identity = client.verify_credentials().map_err(PipelineError::Auth)?;
    println!("Logged in as @{}", identity.handle);

    output::print_stage("Fetching followers");
    let fetched = client
        .list_followers(config.page_size)
        .map_err(PipelineError::Fetch)?;
    let followers = keep_followers(fetched, config.mutual_only);
    println!("{} followers to greet", followers.len());

    let mut deliveries: Vec<Delivery> = followers
        .into_iter()
        .map(|f| Delivery::new(f, config))
        .collect();

    output::print_stage("Generating valentines");
    generate(config, backend, &mut deliveries);

    output::print_stage("Sending valentines");
    send(config, client, &mut deliveries);

    Ok(RunReport {
        identity,
        deliveries,
    })
}

/// Compose one card per pending follower, in parallel.
///
/// Each item settles on its own: a compose failure marks that delivery
/// `Failed` and the rest of the batch carries on.
fn generate(config: &RunConfig, backend: &impl CardBackend, deliveries: &mut [Delivery]) {
    deliveries.par_iter_mut().for_each(|delivery| {
        let params = ComposeParams {
            text: delivery.follower.handle.to_lowercase(),
            anchor: config.text.anchor,
            scale: config.text.scale,
            color: config.text.color,
            quality: Quality::default(),
            output: delivery.file.clone(),
        };
        match backend.compose(&params) {
            Ok(()) => {
                delivery.status = DeliveryStatus::Generated;
                output::print_follower_ok("generated", &delivery.follower.handle);
            }
            Err(e) => {
                delivery.fail(DeliveryStage::Generate, &e);
                output::print_follower_failed(&delivery.follower.handle, "generate", &e.to_string());
            }
        }
    });
}

/// Upload and post every generated card, in parallel.
///
/// Followers that failed generation are skipped — no orphan uploads.
fn send(config: &RunConfig, client: &impl PlatformClient, deliveries: &mut [Delivery]) {
    deliveries.par_iter_mut().for_each(|delivery| {
        if delivery.status != DeliveryStatus::Generated {
            return;
        }

        let upload = match client.upload_media(&delivery.file) {
            Ok(upload) => upload,
            Err(e) => {
                delivery.fail(DeliveryStage::Upload, &e);
                output::print_follower_failed(&delivery.follower.handle, "upload", &e.to_string());
                return;
            }
        };
        delivery.status = DeliveryStatus::Uploaded;

        let mut rng = fastrand::Rng::new();
        let message = mention(
            &delivery.follower.handle,
            pick_message(&mut rng, &config.messages),
        );
        match client.post_status(&message, &upload.media_id) {
            Ok(_) => {
                delivery.status = DeliveryStatus::Sent;
                output::print_follower_ok("sent", &delivery.follower.handle);
            }
            Err(e) => {
                delivery.fail(DeliveryStage::Post, &e);
                output::print_follower_failed(&delivery.follower.handle, "post", &e.to_string());
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::MockBackend;
    use crate::platform::client::tests::{MockClient, follower};
    use tempfile::TempDir;

    fn test_config(output_dir: PathBuf) -> RunConfig {
        RunConfig {
            output_dir,
            mutual_only: false,
            ..RunConfig::default()
        }
    }

    #[test]
    fn keep_followers_mutual_only_drops_non_mutuals() {
        let followers = vec![
            follower("1", "alice", true),
            follower("2", "bob", false),
            follower("3", "carol", true),
        ];

        let kept = keep_followers(followers, true);

        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|f| f.following));
        // API order preserved.
        assert_eq!(kept[0].handle, "alice");
        assert_eq!(kept[1].handle, "carol");
    }

    #[test]
    fn keep_followers_everyone_keeps_order_and_all() {
        let followers = vec![follower("1", "alice", true), follower("2", "bob", false)];
        let kept = keep_followers(followers.clone(), false);
        assert_eq!(kept, followers);
    }

    #[test]
    fn card_path_lowercases_handle() {
        let config = test_config(PathBuf::from("/cards"));
        assert_eq!(
            card_path(&config, "BeaverFan99"),
            PathBuf::from("/cards/beaverfan99.jpg")
        );
    }

    #[test]
    fn mention_prefixes_handle() {
        assert_eq!(mention("alice", "be mine"), "@alice be mine");
    }

    #[test]
    fn pick_message_is_uniform() {
        let messages: Vec<String> = (0..4).map(|i| format!("m{}", i)).collect();
        let mut rng = fastrand::Rng::with_seed(42);
        let mut counts = [0usize; 4];

        for _ in 0..10_000 {
            let picked = pick_message(&mut rng, &messages);
            let index: usize = picked[1..].parse().unwrap();
            counts[index] += 1;
        }

        // Expected 2500 each; allow a generous statistical margin.
        for &count in &counts {
            assert!((2000..=3000).contains(&count), "skewed counts: {:?}", counts);
        }
    }

    #[test]
    fn end_to_end_two_followers() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(tmp.path().join("valentines"));
        let backend = MockBackend::new();
        let client = MockClient::with_followers(vec![
            follower("1", "alice", false),
            follower("2", "bob", true),
        ]);

        let report = run(&config, &backend, &client).unwrap();

        assert_eq!(report.identity.handle, "beaverbot");
        assert_eq!(report.sent(), 2);
        assert!(report.failures().is_empty());

        // One compose per follower, lowercased text, correct destination.
        let ops = backend.get_operations();
        assert_eq!(ops.len(), 2);
        let mut texts: Vec<&str> = ops.iter().map(|o| o.text.as_str()).collect();
        texts.sort();
        assert_eq!(texts, vec!["alice", "bob"]);
        let mut outputs: Vec<PathBuf> = ops.iter().map(|o| o.output.clone()).collect();
        outputs.sort();
        assert_eq!(
            outputs,
            vec![
                tmp.path().join("valentines/alice.jpg"),
                tmp.path().join("valentines/bob.jpg"),
            ]
        );

        // Two posts, each mentioning its follower with a configured message
        // and a valid media id.
        let posts = client.recorded_posts();
        assert_eq!(posts.len(), 2);
        for (text, media_id) in &posts {
            let handle = if text.starts_with("@alice") {
                "alice"
            } else {
                assert!(text.starts_with("@bob"), "unexpected post: {}", text);
                "bob"
            };
            let message = text.strip_prefix(&format!("@{} ", handle)).unwrap();
            assert!(config.messages.iter().any(|m| m == message));
            assert_eq!(media_id, &format!("media-{}", handle));
        }
    }

    #[test]
    fn mutual_only_run_skips_non_mutuals() {
        let tmp = TempDir::new().unwrap();
        let config = RunConfig {
            mutual_only: true,
            output_dir: tmp.path().join("valentines"),
            ..RunConfig::default()
        };
        let backend = MockBackend::new();
        let client = MockClient::with_followers(vec![
            follower("1", "alice", true),
            follower("2", "lurker", false),
        ]);

        let report = run(&config, &backend, &client).unwrap();

        assert_eq!(report.deliveries.len(), 1);
        assert_eq!(report.deliveries[0].follower.handle, "alice");
    }

    #[test]
    fn generation_failure_is_isolated_and_never_sent() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(tmp.path().join("valentines"));
        let backend = MockBackend::failing_on(&["bob"]);
        let client = MockClient::with_followers(vec![
            follower("1", "alice", true),
            follower("2", "bob", true),
        ]);

        let report = run(&config, &backend, &client).unwrap();

        assert_eq!(report.sent(), 1);
        let failures = report.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, "bob");
        assert_eq!(failures[0].1, DeliveryStage::Generate);

        // No orphan upload or post for the failed follower.
        assert_eq!(client.recorded_uploads().len(), 1);
        assert_eq!(client.recorded_posts().len(), 1);
        assert!(client.recorded_posts()[0].0.starts_with("@alice"));
    }

    #[test]
    fn upload_failure_marks_follower_and_skips_post() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(tmp.path().join("valentines"));
        let backend = MockBackend::new();
        let mut client = MockClient::with_followers(vec![
            follower("1", "alice", true),
            follower("2", "bob", true),
        ]);
        client.fail_uploads = vec!["bob".into()];

        let report = run(&config, &backend, &client).unwrap();

        assert_eq!(report.sent(), 1);
        let failures = report.failures();
        assert_eq!(failures, vec![("bob", DeliveryStage::Upload, failures[0].2)]);
        assert_eq!(client.recorded_posts().len(), 1);
    }

    #[test]
    fn post_failure_marks_follower() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(tmp.path().join("valentines"));
        let backend = MockBackend::new();
        let mut client = MockClient::with_followers(vec![follower("1", "alice", true)]);
        client.fail_posts = vec!["alice".into()];

        let report = run(&config, &backend, &client).unwrap();

        assert_eq!(report.sent(), 0);
        assert_eq!(report.failures()[0].1, DeliveryStage::Post);
        // Upload happened before the post was rejected.
        assert_eq!(client.recorded_uploads().len(), 1);
    }

    #[test]
    #[should_panic(expected = "at least one candidate message")]
    fn run_requires_a_candidate_message() {
        let tmp = TempDir::new().unwrap();
        let config = RunConfig {
            messages: Vec::new(),
            ..test_config(tmp.path().join("valentines"))
        };
        let backend = MockBackend::new();
        let client = MockClient::with_followers(vec![follower("1", "alice", true)]);

        let _ = run(&config, &backend, &client);
    }

    #[test]
    fn run_prepares_a_clean_workspace() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("valentines");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("stale.jpg"), "x").unwrap();

        let config = test_config(dir.clone());
        let backend = MockBackend::new();
        let client = MockClient::with_followers(Vec::new());

        run(&config, &backend, &client).unwrap();

        assert!(dir.is_dir());
        assert!(!dir.join("stale.jpg").exists());
    }
}
