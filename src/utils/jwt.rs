//! ES256 provider tokens for APNs token-based authentication

use std::sync::{Mutex, PoisonError};

use jiff::Timestamp;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};

use crate::error::{NotifyError, NotifyResult};

/// Claims APNs expects in a provider token
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ProviderClaims {
    /// Team ID
    pub iss: String,
    /// Issued at (unix seconds)
    pub iat: i64,
}

/// Parse a PKCS#8 PEM signing key
///
/// Escaped `\n` sequences are accepted, since PEMs passed through
/// environment variables often arrive on a single line.
pub fn parse_signing_key(pem: &str) -> NotifyResult<EncodingKey> {
    let pem = pem.trim().replace("\\n", "\n");
    EncodingKey::from_ec_pem(pem.as_bytes())
        .map_err(|e| NotifyError::validation("channel.apns.private_key", e.to_string()))
}

/// Sign a provider token issued at `issued_at`
pub fn sign_provider_token(
    key_id: &str,
    team_id: &str,
    key: &EncodingKey,
    issued_at: i64,
) -> NotifyResult<String> {
    let mut header = Header::new(Algorithm::ES256);
    header.kid = Some(key_id.to_string());

    let claims = ProviderClaims {
        iss: team_id.to_string(),
        iat: issued_at,
    };

    encode(&header, &claims, key).map_err(|e| NotifyError::Unexpected {
        source: anyhow::anyhow!("Failed to sign APNs provider token: {}", e),
    })
}

struct CachedToken {
    token: String,
    issued_at: i64,
}

/// Reuses a signed token until it is `ttl_secs` old
pub struct ProviderTokenCache {
    key_id: String,
    team_id: String,
    key: EncodingKey,
    ttl_secs: i64,
    cached: Mutex<Option<CachedToken>>,
}

impl ProviderTokenCache {
    pub fn new(key_id: impl Into<String>, team_id: impl Into<String>, key: EncodingKey, ttl_secs: u64) -> Self {
        Self {
            key_id: key_id.into(),
            team_id: team_id.into(),
            key,
            ttl_secs: i64::try_from(ttl_secs).unwrap_or(i64::MAX),
            cached: Mutex::new(None),
        }
    }

    /// Current token, re-signed when the cached one has expired
    pub fn token(&self) -> NotifyResult<String> {
        self.token_at(Timestamp::now().as_second())
    }

    pub(crate) fn token_at(&self, now: i64) -> NotifyResult<String> {
        let mut cached = self.cached.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(entry) = cached.as_ref()
            && now - entry.issued_at < self.ttl_secs
        {
            return Ok(entry.token.clone());
        }

        let token = sign_provider_token(&self.key_id, &self.team_id, &self.key, now)?;
        tracing::debug!(key_id = %self.key_id, "Signed new APNs provider token");
        *cached = Some(CachedToken {
            token: token.clone(),
            issued_at: now,
        });
        Ok(token)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use jsonwebtoken::{DecodingKey, Validation, decode, decode_header};

    pub(crate) const TEST_KEY: &str = include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/fixtures/apns_test_key.p8"
    ));
    const TEST_PUBLIC_KEY: &str = include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/fixtures/apns_test_key.pub.pem"
    ));

    fn decode_claims(token: &str) -> ProviderClaims {
        let mut validation = Validation::new(Algorithm::ES256);
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        let key = DecodingKey::from_ec_pem(TEST_PUBLIC_KEY.as_bytes()).unwrap();
        decode::<ProviderClaims>(token, &key, &validation).unwrap().claims
    }

    #[test]
    fn test_sign_provider_token() {
        let key = parse_signing_key(TEST_KEY).unwrap();
        let token = sign_provider_token("ABC123DEFG", "TEAM123456", &key, 1_700_000_000).unwrap();

        let header = decode_header(&token).unwrap();
        assert_eq!(header.alg, Algorithm::ES256);
        assert_eq!(header.kid.as_deref(), Some("ABC123DEFG"));

        let claims = decode_claims(&token);
        assert_eq!(claims.iss, "TEAM123456");
        assert_eq!(claims.iat, 1_700_000_000);
    }

    #[test]
    fn test_parse_signing_key_accepts_escaped_newlines() {
        let single_line = TEST_KEY.trim().replace('\n', "\\n");
        assert!(parse_signing_key(&single_line).is_ok());
    }

    #[test]
    fn test_parse_signing_key_rejects_garbage() {
        let err = parse_signing_key("not a key").err().unwrap();
        assert!(matches!(err, NotifyError::Validation { ref field, .. } if field == "channel.apns.private_key"));
    }

    #[test]
    fn test_cache_reuses_token_within_ttl() {
        let key = parse_signing_key(TEST_KEY).unwrap();
        let cache = ProviderTokenCache::new("ABC123DEFG", "TEAM123456", key, 3000);

        let first = cache.token_at(1_000).unwrap();
        let second = cache.token_at(3_999).unwrap();
        assert_eq!(first, second);
        assert_eq!(decode_claims(&second).iat, 1_000);
    }

    #[test]
    fn test_cache_resigns_after_ttl() {
        let key = parse_signing_key(TEST_KEY).unwrap();
        let cache = ProviderTokenCache::new("ABC123DEFG", "TEAM123456", key, 3000);

        cache.token_at(1_000).unwrap();
        let renewed = cache.token_at(4_000).unwrap();
        assert_eq!(decode_claims(&renewed).iat, 4_000);
    }
}
