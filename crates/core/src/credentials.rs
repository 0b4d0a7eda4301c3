//! Ad-platform credential types: the closed platform enum, per-platform
//! secret bundles, and the persisted credential record.
//!
//! Payloads are validated at construction via [`CredentialPayload::parse`];
//! a value that deserialized successfully is guaranteed to carry exactly the
//! platform's required fields, all non-empty.

use crate::error::VaultError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Supported advertising platforms. Adding a platform is a schema change:
/// every match over this enum is exhaustive on purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdPlatform {
    Meta,
    Kakao,
    Google,
}

impl AdPlatform {
    pub const ALL: [AdPlatform; 3] = [AdPlatform::Meta, AdPlatform::Kakao, AdPlatform::Google];

    pub fn as_str(&self) -> &'static str {
        match self {
            AdPlatform::Meta => "meta",
            AdPlatform::Kakao => "kakao",
            AdPlatform::Google => "google",
        }
    }
}

impl fmt::Display for AdPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Meta Ads (Facebook/Instagram) app credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetaCredentials {
    pub app_id: String,
    pub app_secret: String,
}

/// Kakao Moment application keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KakaoCredentials {
    pub rest_api_key: String,
    pub javascript_key: String,
}

/// Google Ads OAuth client plus developer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GoogleCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub developer_token: String,
}

/// Platform-tagged secret bundle. Serializes untagged (the record carries
/// the platform in its own column, matching the persisted shape).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CredentialPayload {
    Meta(MetaCredentials),
    Kakao(KakaoCredentials),
    Google(GoogleCredentials),
}

impl CredentialPayload {
    /// Parse and validate a raw JSON payload for the given platform.
    ///
    /// Rejects missing fields, unknown fields, and empty values with
    /// `VaultError::Schema`.
    pub fn parse(platform: AdPlatform, value: serde_json::Value) -> Result<Self, VaultError> {
        let payload = match platform {
            AdPlatform::Meta => {
                serde_json::from_value::<MetaCredentials>(value).map(CredentialPayload::Meta)
            }
            AdPlatform::Kakao => {
                serde_json::from_value::<KakaoCredentials>(value).map(CredentialPayload::Kakao)
            }
            AdPlatform::Google => {
                serde_json::from_value::<GoogleCredentials>(value).map(CredentialPayload::Google)
            }
        }
        .map_err(|e| VaultError::Schema(format!("invalid {platform} payload: {e}")))?;

        payload.check_non_empty()?;
        Ok(payload)
    }

    /// The platform this payload belongs to.
    pub fn platform(&self) -> AdPlatform {
        match self {
            CredentialPayload::Meta(_) => AdPlatform::Meta,
            CredentialPayload::Kakao(_) => AdPlatform::Kakao,
            CredentialPayload::Google(_) => AdPlatform::Google,
        }
    }

    fn fields(&self) -> Vec<(&'static str, &str)> {
        match self {
            CredentialPayload::Meta(c) => {
                vec![("app_id", c.app_id.as_str()), ("app_secret", c.app_secret.as_str())]
            }
            CredentialPayload::Kakao(c) => vec![
                ("rest_api_key", c.rest_api_key.as_str()),
                ("javascript_key", c.javascript_key.as_str()),
            ],
            CredentialPayload::Google(c) => vec![
                ("client_id", c.client_id.as_str()),
                ("client_secret", c.client_secret.as_str()),
                ("developer_token", c.developer_token.as_str()),
            ],
        }
    }

    fn check_non_empty(&self) -> Result<(), VaultError> {
        for (name, value) in self.fields() {
            if value.trim().is_empty() {
                return Err(VaultError::Schema(format!(
                    "{} payload field '{}' must not be empty",
                    self.platform(),
                    name
                )));
            }
        }
        Ok(())
    }
}

/// One persisted credential row. At most one exists per
/// (tenant_id, platform); that pair is the upsert key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub tenant_id: Uuid,
    pub platform: AdPlatform,
    pub payload: CredentialPayload,
    pub is_active: bool,
    /// When the validation worker last confirmed these credentials, if ever.
    pub last_validated_at: Option<DateTime<Utc>>,
    pub validation_error: Option<String>,
}

/// Result of a validation-worker run against one credential record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub validated_at: DateTime<Utc>,
    /// Populated when validation failed; `None` means the credentials work.
    #[serde(default)]
    pub error: Option<String>,
}
