//! Platform client trait and API error taxonomy.

use super::types::{AuthIdentity, Follower, MediaUpload, PostReceipt};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("credentials rejected ({status}): {body}")]
    Unauthorized { status: u16, body: String },
    #[error("API rejected request ({status}): {body}")]
    Rejected { status: u16, body: String },
    #[error("request to {0} timed out")]
    Timeout(String),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("upload returned no media id")]
    MissingMediaId,
}

/// The four platform calls the pipeline consumes.
///
/// `Sync` because the send stage fans uploads and posts out over a rayon
/// parallel map with a shared client reference.
pub trait PlatformClient: Sync {
    /// Verify the configured credentials, returning the account identity.
    fn verify_credentials(&self) -> Result<AuthIdentity, ApiError>;

    /// Fetch one page of followers (no pagination — at most `count`).
    fn list_followers(&self, count: u32) -> Result<Vec<Follower>, ApiError>;

    /// Upload one image file, returning the media id to attach to a post.
    fn upload_media(&self, path: &Path) -> Result<MediaUpload, ApiError>;

    /// Post a status with one attached media id.
    fn post_status(&self, text: &str, media_id: &str) -> Result<PostReceipt, ApiError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Mutex;

    /// Scripted client that records uploads and posts without any network.
    /// Uses Mutex (not RefCell) so it is Sync and works with rayon's par_iter.
    pub struct MockClient {
        pub identity: AuthIdentity,
        pub followers: Vec<Follower>,
        /// File stems whose upload should fail.
        pub fail_uploads: Vec<String>,
        /// Handles whose status post should fail.
        pub fail_posts: Vec<String>,
        pub uploads: Mutex<Vec<PathBuf>>,
        /// (status text, media id) pairs, in completion order.
        pub posts: Mutex<Vec<(String, String)>>,
    }

    impl MockClient {
        pub fn with_followers(followers: Vec<Follower>) -> Self {
            Self {
                identity: AuthIdentity {
                    id: "1".into(),
                    handle: "beaverbot".into(),
                },
                followers,
                fail_uploads: Vec::new(),
                fail_posts: Vec::new(),
                uploads: Mutex::new(Vec::new()),
                posts: Mutex::new(Vec::new()),
            }
        }

        pub fn recorded_posts(&self) -> Vec<(String, String)> {
            self.posts.lock().unwrap().clone()
        }

        pub fn recorded_uploads(&self) -> Vec<PathBuf> {
            self.uploads.lock().unwrap().clone()
        }
    }

    /// Build a follower record for tests.
    pub fn follower(id: &str, handle: &str, following: bool) -> Follower {
        Follower {
            id: id.into(),
            handle: handle.into(),
            following,
        }
    }

    impl PlatformClient for MockClient {
        fn verify_credentials(&self) -> Result<AuthIdentity, ApiError> {
            Ok(self.identity.clone())
        }

        fn list_followers(&self, count: u32) -> Result<Vec<Follower>, ApiError> {
            Ok(self
                .followers
                .iter()
                .take(count as usize)
                .cloned()
                .collect())
        }

        fn upload_media(&self, path: &Path) -> Result<MediaUpload, ApiError> {
            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or_default()
                .to_string();
            if self.fail_uploads.contains(&stem) {
                return Err(ApiError::MissingMediaId);
            }
            let mut uploads = self.uploads.lock().unwrap();
            uploads.push(path.to_path_buf());
            Ok(MediaUpload {
                media_id: format!("media-{}", stem),
            })
        }

        fn post_status(&self, text: &str, media_id: &str) -> Result<PostReceipt, ApiError> {
            if self.fail_posts.iter().any(|h| text.contains(h.as_str())) {
                return Err(ApiError::Rejected {
                    status: 403,
                    body: "mock rejection".into(),
                });
            }
            let mut posts = self.posts.lock().unwrap();
            posts.push((text.to_string(), media_id.to_string()));
            Ok(PostReceipt {
                id: format!("post-{}", posts.len()),
            })
        }
    }

    #[test]
    fn mock_respects_page_size() {
        let client = MockClient::with_followers(vec![
            follower("1", "a", true),
            follower("2", "b", true),
            follower("3", "c", true),
        ]);

        assert_eq!(client.list_followers(2).unwrap().len(), 2);
        assert_eq!(client.list_followers(100).unwrap().len(), 3);
    }

    #[test]
    fn mock_upload_yields_stem_based_media_id() {
        let client = MockClient::with_followers(Vec::new());
        let upload = client.upload_media(Path::new("/cards/alice.jpg")).unwrap();
        assert_eq!(upload.media_id, "media-alice");
        assert_eq!(client.recorded_uploads().len(), 1);
    }
}
