use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use time::{Duration, OffsetDateTime};
use tracing::debug;

use super::repo_types::User;
use crate::config::JwtConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub kind: TokenKind,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
    pub aud: String,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("invalid or expired token")]
    Invalid(#[from] jsonwebtoken::errors::Error),
    #[error("{found} token used where an {expected} token is required")]
    WrongKind { expected: TokenKind, found: TokenKind },
}

/// Access/refresh pair handed out on register, login and refresh.
#[derive(Debug, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Signs and checks the service's HS256 tokens. Built once from config and
/// shared through `AppState`.
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    issuer: String,
    audience: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenSigner {
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::default();
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_audience(&[config.audience.as_str()]);
        validation.set_required_spec_claims(&["exp", "sub", "iss", "aud"]);

        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            access_ttl: Duration::minutes(config.ttl_minutes),
            refresh_ttl: Duration::minutes(config.refresh_ttl_minutes),
        }
    }

    pub fn issue(&self, user: &User) -> Result<TokenPair, TokenError> {
        Ok(TokenPair {
            access_token: self.sign(user.id, TokenKind::Access)?,
            refresh_token: self.sign(user.id, TokenKind::Refresh)?,
        })
    }

    fn sign(&self, user_id: i64, kind: TokenKind) -> Result<String, TokenError> {
        let now = OffsetDateTime::now_utc();
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };
        let claims = Claims {
            sub: user_id,
            kind,
            iat: now.unix_timestamp(),
            exp: (now + ttl).unix_timestamp(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    /// Decode `token` and require it to be of kind `expected`.
    pub fn verify(&self, token: &str, expected: TokenKind) -> Result<Claims, TokenError> {
        let claims = decode::<Claims>(token, &self.decoding, &self.validation)?.claims;
        if claims.kind != expected {
            return Err(TokenError::WrongKind {
                expected,
                found: claims.kind,
            });
        }
        debug!(user_id = claims.sub, kind = %claims.kind, "token accepted");
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str) -> JwtConfig {
        JwtConfig {
            secret: secret.into(),
            issuer: "skill-radar".into(),
            audience: "skill-radar-users".into(),
            ttl_minutes: 5,
            refresh_ttl_minutes: 60,
        }
    }

    fn user(id: i64) -> User {
        User {
            id,
            email: format!("u{}@example.com", id),
            password_hash: String::new(),
            username: format!("u{}", id),
            created_at: OffsetDateTime::UNIX_EPOCH,
            last_login: None,
        }
    }

    #[test]
    fn pair_halves_only_verify_as_their_own_kind() {
        let signer = TokenSigner::new(&config("s"));
        let pair = signer.issue(&user(9)).unwrap();

        let access = signer.verify(&pair.access_token, TokenKind::Access).unwrap();
        assert_eq!(access.sub, 9);
        assert!(access.exp > access.iat);
        let refresh = signer.verify(&pair.refresh_token, TokenKind::Refresh).unwrap();
        assert!(refresh.exp > access.exp);

        assert!(matches!(
            signer.verify(&pair.refresh_token, TokenKind::Access),
            Err(TokenError::WrongKind {
                expected: TokenKind::Access,
                found: TokenKind::Refresh
            })
        ));
    }

    #[test]
    fn tokens_from_another_deployment_are_invalid() {
        let ours = TokenSigner::new(&config("ours"));
        let theirs = TokenSigner::new(&config("theirs"));
        let pair = theirs.issue(&user(1)).unwrap();
        assert!(matches!(
            ours.verify(&pair.access_token, TokenKind::Access),
            Err(TokenError::Invalid(_))
        ));
        assert!(ours.verify("not-a-jwt", TokenKind::Access).is_err());
    }
}
