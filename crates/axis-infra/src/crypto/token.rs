//! HS256-signed access tokens.
//!
//! Implements the `TokenIssuer` trait from `axis-core` using `jsonwebtoken`.

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use axis_core::auth::credentials::TokenIssuer;
use axis_types::error::TokenError;
use axis_types::user::{AccessToken, TokenClaims};

/// Signs and verifies access tokens with a shared secret.
///
/// Does NOT derive Debug: the keys are derived from the signing secret.
pub struct JwtTokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl_secs: i64,
}

impl JwtTokenIssuer {
    pub fn new(secret: &[u8], ttl_secs: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl_secs,
        }
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn issue(&self, user_id: Uuid) -> Result<AccessToken, TokenError> {
        let now = Utc::now().timestamp();
        let claims = TokenClaims {
            sub: user_id.to_string(),
            iat: now,
            exp: now.saturating_add(self.ttl_secs),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map(AccessToken)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        decode::<TokenClaims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_verify() {
        let issuer = JwtTokenIssuer::new(b"test-secret", 3600);
        let user_id = Uuid::now_v7();
        let token = issuer.issue(user_id).unwrap();
        let claims = issuer.verify(&token.0).unwrap();
        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let token = JwtTokenIssuer::new(b"secret-a", 3600)
            .issue(Uuid::now_v7())
            .unwrap();
        let err = JwtTokenIssuer::new(b"secret-b", 3600)
            .verify(&token.0)
            .unwrap_err();
        assert!(matches!(err, TokenError::Invalid(_)));
    }

    #[test]
    fn test_expired_token() {
        let issuer = JwtTokenIssuer::new(b"test-secret", -120);
        let token = issuer.issue(Uuid::now_v7()).unwrap();
        assert!(matches!(issuer.verify(&token.0), Err(TokenError::Expired)));
    }

    #[test]
    fn test_garbage_is_invalid() {
        let issuer = JwtTokenIssuer::new(b"test-secret", 3600);
        assert!(matches!(issuer.verify("abc.def.ghi"), Err(TokenError::Invalid(_))));
    }
}
