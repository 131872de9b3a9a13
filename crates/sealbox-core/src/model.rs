//! Wire model for the sealbox HTTP API.
//!
//! JSON field names are the wire contract; keep them in sync with the
//! server's handlers.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/secrets`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateSecretRequest {
    /// Secret payload as the user supplied it.
    pub data: String,
    /// Expiration, epoch seconds.
    pub expires_at: i64,
    /// Views allowed before the secret burns.
    pub max_views: u32,
}

/// Response of `POST /api/secrets`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SecretReceipt {
    pub id: String,
    /// Share link for the new secret.
    pub url: String,
}

/// Response of `GET /api/secrets/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SecretMetadata {
    pub id: String,
    /// Times the secret has been viewed so far.
    pub access_count: u32,
    pub max_views: u32,
    /// Expiration, epoch seconds.
    pub expires_at: i64,
    /// Creation time, epoch seconds.
    pub created_at: i64,
}

impl SecretMetadata {
    /// Views left before the secret burns, saturating at zero.
    pub fn views_left(&self) -> u32 {
        self.max_views.saturating_sub(self.access_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_create_request_field_names() {
        let request = CreateSecretRequest {
            data: "hunter2".to_string(),
            expires_at: 1_760_000_000,
            max_views: 3,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "data": "hunter2",
                "expires_at": 1_760_000_000,
                "max_views": 3,
            })
        );
    }

    #[test]
    fn test_metadata_round_trips_from_wire_json() {
        let raw = r#"{
            "id": "s-1234",
            "access_count": 1,
            "max_views": 3,
            "expires_at": 1760000000,
            "created_at": 1759990000
        }"#;
        let meta: SecretMetadata = serde_json::from_str(raw).unwrap();
        assert_eq!(meta.id, "s-1234");
        assert_eq!(meta.views_left(), 2);
    }

    #[test]
    fn test_views_left_saturates() {
        let meta = SecretMetadata {
            id: "s-1".to_string(),
            access_count: 5,
            max_views: 3,
            expires_at: 0,
            created_at: 0,
        };
        assert_eq!(meta.views_left(), 0);
    }
}
