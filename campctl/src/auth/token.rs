//! JWT token issuance and verification.
//!
//! Every authenticated request carries a bearer token minted here. Tokens are
//! self-contained HS256 JWTs: subject (group id), login, a type tag, issue
//! and expiry timestamps. Access tokens are short-lived; refresh tokens live
//! for weeks and are only accepted by [`TokenCodec::refresh`], which mints a
//! brand-new pair (rotation). There is no server-side revocation: a rotated
//! refresh token stays valid until its own expiry.

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::{config::Config, errors::Error, types::GroupId};

/// Discriminator embedded in every token as the `typ` claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// Claims carried by both token classes.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: GroupId,      // Subject (group ID)
    pub userlogin: String, // Group login
    pub typ: TokenType,    // access | refresh
    pub exp: i64,          // Expiration time
    pub iat: i64,          // Issued at
}

/// A freshly minted access/refresh pair.
#[derive(Debug)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Stateless issuer/verifier for the token pair.
///
/// Constructed once at startup from [`Config`]; the signing secret is never
/// read from anywhere else afterwards.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_expiry: std::time::Duration,
    refresh_expiry: std::time::Duration,
}

impl TokenCodec {
    /// Build the codec from configuration. Fails if no signing secret is
    /// configured; `Config::validate` rejects that earlier, so hitting this
    /// at runtime is a programming error surfaced as 500.
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let secret_key = config.secret_key.as_ref().ok_or_else(|| Error::Internal {
            operation: "token codec: secret_key is required".to_string(),
        })?;

        Ok(Self {
            encoding: EncodingKey::from_secret(secret_key.as_bytes()),
            decoding: DecodingKey::from_secret(secret_key.as_bytes()),
            access_expiry: config.auth.access_token_expiry,
            refresh_expiry: config.auth.refresh_token_expiry,
        })
    }

    fn issue(&self, group_id: GroupId, userlogin: &str, typ: TokenType) -> Result<String, Error> {
        let now = Utc::now();
        let expiry = match typ {
            TokenType::Access => self.access_expiry,
            TokenType::Refresh => self.refresh_expiry,
        };
        let claims = Claims {
            sub: group_id,
            userlogin: userlogin.to_string(),
            typ,
            exp: (now + expiry).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding).map_err(|e| Error::Internal {
            operation: format!("create JWT: {e}"),
        })
    }

    /// Mint a short-lived access token for a group.
    pub fn issue_access(&self, group_id: GroupId, userlogin: &str) -> Result<String, Error> {
        self.issue(group_id, userlogin, TokenType::Access)
    }

    /// Mint a long-lived refresh token for a group.
    pub fn issue_refresh(&self, group_id: GroupId, userlogin: &str) -> Result<String, Error> {
        self.issue(group_id, userlogin, TokenType::Refresh)
    }

    /// Mint a full pair, as returned by login and refresh.
    pub fn issue_pair(&self, group_id: GroupId, userlogin: &str) -> Result<TokenPair, Error> {
        Ok(TokenPair {
            access_token: self.issue_access(group_id, userlogin)?,
            refresh_token: self.issue_refresh(group_id, userlogin)?,
        })
    }

    /// Verify signature and expiry, returning the embedded claims.
    ///
    /// Every client-side failure (bad signature, malformed structure,
    /// expired) maps to the same `Unauthenticated` error: a forged token and
    /// a stale one must be indistinguishable to the caller.
    pub fn decode(&self, token: &str) -> Result<Claims, Error> {
        let token_data = decode::<Claims>(token, &self.decoding, &Validation::default()).map_err(|e| match e.kind() {
            // Client errors (401) - malformed tokens, invalid claims, expired tokens
            jsonwebtoken::errors::ErrorKind::InvalidToken
            | jsonwebtoken::errors::ErrorKind::InvalidSignature
            | jsonwebtoken::errors::ErrorKind::ExpiredSignature
            | jsonwebtoken::errors::ErrorKind::MissingRequiredClaim(_)
            | jsonwebtoken::errors::ErrorKind::InvalidIssuer
            | jsonwebtoken::errors::ErrorKind::InvalidAudience
            | jsonwebtoken::errors::ErrorKind::InvalidSubject
            | jsonwebtoken::errors::ErrorKind::ImmatureSignature
            | jsonwebtoken::errors::ErrorKind::Base64(_)
            | jsonwebtoken::errors::ErrorKind::Json(_)
            | jsonwebtoken::errors::ErrorKind::Utf8(_)
            | jsonwebtoken::errors::ErrorKind::InvalidAlgorithm => Error::Unauthenticated { message: None },

            // Server errors (500) - key issues, internal failures
            _ => Error::Internal {
                operation: format!("JWT verification: {e}"),
            },
        })?;

        Ok(token_data.claims)
    }

    /// Exchange a refresh token for a brand-new pair.
    ///
    /// The presented token must decode AND carry the `refresh` type tag;
    /// access tokens are rejected with `WrongTokenType` so a leaked
    /// short-lived token cannot be upgraded into a long-lived one.
    pub fn refresh(&self, refresh_token: &str) -> Result<TokenPair, Error> {
        let claims = self.decode(refresh_token)?;

        if claims.typ != TokenType::Refresh {
            return Err(Error::WrongTokenType);
        }

        self.issue_pair(claims.sub, &claims.userlogin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthConfig;
    use std::time::Duration;

    fn create_test_config() -> Config {
        Config {
            secret_key: Some("test-secret-key-for-jwt".to_string()),
            auth: AuthConfig {
                access_token_expiry: Duration::from_secs(900),
                refresh_token_expiry: Duration::from_secs(3600 * 24 * 30),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_access_token_round_trip() {
        let codec = TokenCodec::from_config(&create_test_config()).unwrap();

        let token = codec.issue_access(42, "scout-a").unwrap();
        let claims = codec.decode(&token).unwrap();

        assert_eq!(claims.sub, 42);
        assert_eq!(claims.userlogin, "scout-a");
        assert_eq!(claims.typ, TokenType::Access);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_refresh_token_round_trip() {
        let codec = TokenCodec::from_config(&create_test_config()).unwrap();

        let token = codec.issue_refresh(42, "scout-a").unwrap();
        let claims = codec.decode(&token).unwrap();

        assert_eq!(claims.typ, TokenType::Refresh);
        assert_eq!(claims.sub, 42);
    }

    #[test]
    fn test_decode_invalid_token() {
        let codec = TokenCodec::from_config(&create_test_config()).unwrap();

        for token in ["invalid.token.here", "not-a-token", "", "too.many.parts.in.this.token"] {
            let result = codec.decode(token);
            assert!(
                matches!(result, Err(Error::Unauthenticated { .. })),
                "Expected Unauthenticated for token: {token}"
            );
        }
    }

    #[test]
    fn test_decode_wrong_secret() {
        let codec = TokenCodec::from_config(&create_test_config()).unwrap();
        let token = codec.issue_access(1, "scout-a").unwrap();

        let mut other_config = create_test_config();
        other_config.secret_key = Some("a-different-secret".to_string());
        let other_codec = TokenCodec::from_config(&other_config).unwrap();

        let result = other_codec.decode(&token);
        assert!(matches!(result, Err(Error::Unauthenticated { .. })));
    }

    #[test]
    fn test_decode_expired_token() {
        let config = create_test_config();
        let codec = TokenCodec::from_config(&config).unwrap();

        // Manually build a token whose expiry is well past the default leeway
        let now = Utc::now();
        let claims = Claims {
            sub: 1,
            userlogin: "scout-a".to_string(),
            typ: TokenType::Access,
            exp: (now - chrono::Duration::hours(1)).timestamp(),
            iat: (now - chrono::Duration::hours(2)).timestamp(),
        };
        let key = EncodingKey::from_secret(config.secret_key.as_ref().unwrap().as_bytes());
        let token = encode(&Header::default(), &claims, &key).unwrap();

        let result = codec.decode(&token);
        assert!(matches!(result, Err(Error::Unauthenticated { .. })));
    }

    #[test]
    fn test_refresh_rotates_pair() {
        let codec = TokenCodec::from_config(&create_test_config()).unwrap();
        let refresh = codec.issue_refresh(7, "scout-b").unwrap();

        let pair = codec.refresh(&refresh).unwrap();

        let access_claims = codec.decode(&pair.access_token).unwrap();
        assert_eq!(access_claims.sub, 7);
        assert_eq!(access_claims.typ, TokenType::Access);

        let refresh_claims = codec.decode(&pair.refresh_token).unwrap();
        assert_eq!(refresh_claims.sub, 7);
        assert_eq!(refresh_claims.typ, TokenType::Refresh);
    }

    #[test]
    fn test_refresh_rejects_access_token() {
        let codec = TokenCodec::from_config(&create_test_config()).unwrap();
        let access = codec.issue_access(7, "scout-b").unwrap();

        let result = codec.refresh(&access);
        assert!(matches!(result, Err(Error::WrongTokenType)));
    }

    #[test]
    fn test_refresh_rejects_garbage() {
        let codec = TokenCodec::from_config(&create_test_config()).unwrap();
        let result = codec.refresh("garbage");
        assert!(matches!(result, Err(Error::Unauthenticated { .. })));
    }
}
