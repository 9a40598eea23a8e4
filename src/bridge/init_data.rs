//! Telegram Mini App init data: parsing and signature validation.
//!
//! Telegram hands the Mini App a query string (`query_id=...&user=...&auth_date=...&hash=...`).
//! The `user` and `chat` values are URL-encoded JSON objects.

use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Maximum accepted age of signed init data (24 hours)
pub const MAX_INIT_DATA_AGE_SECS: i64 = 86_400;

#[derive(Debug, Error)]
pub enum InitDataError {
    #[error("Missing hash parameter")]
    MissingHash,

    #[error("Invalid hash - data may be tampered")]
    InvalidHash,

    #[error("Init data is too old ({0} seconds)")]
    Expired(i64),

    #[error("Failed to parse {field} JSON: {source}")]
    MalformedJson {
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("HMAC key rejected: {0}")]
    Key(String),
}

/// The `user` object of the init data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct WebAppUser {
    pub id: i64,
    #[serde(default)]
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub language_code: Option<String>,
}

/// The `chat` object, present when the app was opened from a chat attachment menu.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct WebAppChat {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub title: Option<String>,
    pub username: Option<String>,
}

/// Parsed init data. Keeps the decoded pairs so the signature can be checked later.
#[derive(Debug, Clone, Default)]
pub struct InitData {
    pub user: Option<WebAppUser>,
    pub chat: Option<WebAppChat>,
    pub auth_date: Option<i64>,
    pub hash: Option<String>,
    pairs: Vec<(String, String)>,
}

impl InitData {
    /// Parses the raw query string. An empty string yields empty init data.
    pub fn parse(raw: &str) -> Result<Self, InitDataError> {
        let pairs: Vec<(String, String)> = raw
            .split('&')
            .filter_map(|pair| {
                let mut parts = pair.splitn(2, '=');
                match (parts.next(), parts.next()) {
                    (Some(key), Some(value)) if !key.is_empty() => {
                        let decoded_value = urlencoding::decode(value).ok()?;
                        Some((key.to_string(), decoded_value.to_string()))
                    }
                    _ => None,
                }
            })
            .collect();

        let lookup = |name: &str| pairs.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str());

        let user = lookup("user")
            .map(|v| serde_json::from_str::<WebAppUser>(v))
            .transpose()
            .map_err(|source| InitDataError::MalformedJson { field: "user", source })?;
        let chat = lookup("chat")
            .map(|v| serde_json::from_str::<WebAppChat>(v))
            .transpose()
            .map_err(|source| InitDataError::MalformedJson { field: "chat", source })?;
        let auth_date = lookup("auth_date").and_then(|v| v.parse::<i64>().ok());
        let hash = lookup("hash").map(str::to_string);

        Ok(Self {
            user,
            chat,
            auth_date,
            hash,
            pairs,
        })
    }

    /// Verifies the signature against `bot_token` and checks freshness against the system clock.
    pub fn validate(&self, bot_token: &str) -> Result<(), InitDataError> {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0);
        self.validate_at(bot_token, now)
    }

    /// Verifies the signature with an explicit "now" (unix seconds).
    ///
    /// `secret = HMAC_SHA256("WebAppData", bot_token)`,
    /// `hash = HMAC_SHA256(secret, data_check_string)` where the check string is every
    /// pair except `hash`, sorted by key, formatted `key=value`, joined by `\n`.
    pub fn validate_at(&self, bot_token: &str, now: i64) -> Result<(), InitDataError> {
        let received_hash = self.hash.as_deref().ok_or(InitDataError::MissingHash)?;

        let calculated_hash = sign_pairs(&self.pairs, bot_token)?;
        if !calculated_hash.eq_ignore_ascii_case(received_hash) {
            return Err(InitDataError::InvalidHash);
        }

        if let Some(auth_date) = self.auth_date {
            let age_seconds = now - auth_date;
            if age_seconds > MAX_INIT_DATA_AGE_SECS {
                return Err(InitDataError::Expired(age_seconds));
            }
        }

        Ok(())
    }

    pub fn user_id(&self) -> Option<i64> {
        self.user.as_ref().map(|u| u.id)
    }

    pub fn user_username(&self) -> Option<&str> {
        self.user.as_ref().and_then(|u| u.username.as_deref()).filter(|u| !u.is_empty())
    }

    pub fn chat_username(&self) -> Option<&str> {
        self.chat.as_ref().and_then(|c| c.username.as_deref()).filter(|u| !u.is_empty())
    }
}

/// Computes the hex signature of `pairs` (the `hash` pair itself is skipped).
pub(crate) fn sign_pairs(pairs: &[(String, String)], bot_token: &str) -> Result<String, InitDataError> {
    let mut check_pairs: Vec<String> = pairs
        .iter()
        .filter(|(key, _)| key.as_str() != "hash")
        .map(|(key, value)| format!("{}={}", key, value))
        .collect();
    check_pairs.sort();
    let data_check_string = check_pairs.join("\n");

    let mut secret_key_mac =
        HmacSha256::new_from_slice(b"WebAppData").map_err(|e| InitDataError::Key(e.to_string()))?;
    secret_key_mac.update(bot_token.as_bytes());
    let secret_key = secret_key_mac.finalize().into_bytes();

    let mut mac = HmacSha256::new_from_slice(&secret_key).map_err(|e| InitDataError::Key(e.to_string()))?;
    mac.update(data_check_string.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const USER_ONLY: &str =
        "user=%7B%22id%22%3A123456789%2C%22first_name%22%3A%22Ada%22%2C%22username%22%3A%22ada_l%22%7D&auth_date=1700000000&hash=abc";

    fn signed(token: &str, auth_date: i64) -> String {
        let user = urlencoding::encode(r#"{"id":42,"first_name":"Ada","username":"ada_l"}"#).into_owned();
        let pairs = vec![
            ("auth_date".to_string(), auth_date.to_string()),
            ("query_id".to_string(), "AAH".to_string()),
            ("user".to_string(), r#"{"id":42,"first_name":"Ada","username":"ada_l"}"#.to_string()),
        ];
        let hash = sign_pairs(&pairs, token).unwrap();
        format!("query_id=AAH&user={}&auth_date={}&hash={}", user, auth_date, hash)
    }

    #[test]
    fn test_parse_user() {
        let data = InitData::parse(USER_ONLY).unwrap();
        assert_eq!(data.user_id(), Some(123456789));
        assert_eq!(data.user_username(), Some("ada_l"));
        assert_eq!(data.chat_username(), None);
        assert_eq!(data.auth_date, Some(1_700_000_000));
    }

    #[test]
    fn test_parse_empty() {
        let data = InitData::parse("").unwrap();
        assert!(data.user.is_none());
        assert!(data.hash.is_none());
    }

    #[test]
    fn test_parse_rejects_malformed_user() {
        let err = InitData::parse("user=%7Bnot-json").unwrap_err();
        assert!(matches!(err, InitDataError::MalformedJson { field: "user", .. }));
    }

    #[test]
    fn test_missing_hash() {
        let data = InitData::parse("user={\"id\":123}&auth_date=1234567890").unwrap();
        assert!(matches!(data.validate("test_token"), Err(InitDataError::MissingHash)));
    }

    #[test]
    fn test_valid_signature() {
        let raw = signed("123:token", 1_700_000_000);
        let data = InitData::parse(&raw).unwrap();
        assert!(data.validate_at("123:token", 1_700_000_100).is_ok());
    }

    #[test]
    fn test_wrong_token_rejected() {
        let raw = signed("123:token", 1_700_000_000);
        let data = InitData::parse(&raw).unwrap();
        assert!(matches!(
            data.validate_at("999:other", 1_700_000_100),
            Err(InitDataError::InvalidHash)
        ));
    }

    #[test]
    fn test_tampered_user_rejected() {
        let raw = signed("123:token", 1_700_000_000).replace("ada_l", "mallory");
        let data = InitData::parse(&raw).unwrap();
        assert!(matches!(
            data.validate_at("123:token", 1_700_000_100),
            Err(InitDataError::InvalidHash)
        ));
    }

    #[test]
    fn test_stale_init_data_rejected() {
        let raw = signed("123:token", 1_700_000_000);
        let data = InitData::parse(&raw).unwrap();
        let err = data
            .validate_at("123:token", 1_700_000_000 + MAX_INIT_DATA_AGE_SECS + 1)
            .unwrap_err();
        assert!(matches!(err, InitDataError::Expired(_)));
    }
}
