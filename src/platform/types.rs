//! API response records.
//!
//! Field names follow the platform's v1.1 wire format (`screen_name`,
//! `media_id_string`, …); the structs rename them to what the rest of the
//! crate calls things. Unknown fields are ignored on deserialization.

use serde::Deserialize;

/// One account from the follower listing.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Follower {
    #[serde(rename = "id_str")]
    pub id: String,
    /// Public username, used for the mention, the overlay text and the
    /// output filename. Assumed filesystem-safe.
    #[serde(rename = "screen_name")]
    pub handle: String,
    /// Mutual-follow flag: true when the authenticated account follows this
    /// follower back.
    #[serde(default)]
    pub following: bool,
}

/// Envelope around the follower listing response.
#[derive(Debug, Deserialize)]
pub struct FollowerPage {
    pub users: Vec<Follower>,
}

/// The authenticated account, from credential verification.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthIdentity {
    #[serde(rename = "id_str")]
    pub id: String,
    #[serde(rename = "screen_name")]
    pub handle: String,
}

/// Result of a media upload. The string id is what status posts reference.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaUpload {
    /// Empty when the API returned no id — callers must treat that as a
    /// failed upload.
    #[serde(rename = "media_id_string", default)]
    pub media_id: String,
}

/// Confirmation of a posted status.
#[derive(Debug, Clone, Deserialize)]
pub struct PostReceipt {
    #[serde(rename = "id_str")]
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follower_page_from_wire_format() {
        let json = r#"{
            "users": [
                {"id_str": "101", "screen_name": "alice", "following": true, "name": "Alice"},
                {"id_str": "102", "screen_name": "bob"}
            ],
            "next_cursor": 0
        }"#;

        let page: FollowerPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.users.len(), 2);
        assert_eq!(page.users[0].handle, "alice");
        assert!(page.users[0].following);
        // Missing flag defaults to not-mutual.
        assert!(!page.users[1].following);
    }

    #[test]
    fn identity_from_wire_format() {
        let json = r#"{"id_str": "7", "screen_name": "beaverbot", "verified": false}"#;
        let identity: AuthIdentity = serde_json::from_str(json).unwrap();
        assert_eq!(identity.handle, "beaverbot");
        assert_eq!(identity.id, "7");
    }

    #[test]
    fn media_upload_without_id_is_empty() {
        let upload: MediaUpload = serde_json::from_str(r#"{"size": 12345}"#).unwrap();
        assert!(upload.media_id.is_empty());

        let upload: MediaUpload =
            serde_json::from_str(r#"{"media_id_string": "9001"}"#).unwrap();
        assert_eq!(upload.media_id, "9001");
    }
}
