use crate::config::CoreConfig;
use crate::{HmsError, HmsResult, RecordId};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Claims carried by both token kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Patient id.
    pub sub: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub kind: TokenKind,
    /// Unique per token, so two tokens issued within one second still differ.
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
}

/// Identity a token pair is issued for.
#[derive(Debug, Clone, Copy)]
pub struct TokenSubject<'a> {
    pub id: &'a str,
    pub email: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
}

/// Access token plus refresh token, as returned by `POST /patients/refresh`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct TokenPair {
    pub token: String,
    pub refresh_token: String,
}

/// Issues and validates HS256 tokens with one shared secret.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl: chrono::Duration,
    refresh_ttl: chrono::Duration,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(secret: &[u8], access_ttl: chrono::Duration, refresh_ttl: chrono::Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            access_ttl,
            refresh_ttl,
        }
    }

    pub fn from_config(cfg: &CoreConfig) -> Self {
        Self::new(
            cfg.token_secret(),
            cfg.access_token_ttl(),
            cfg.refresh_token_ttl(),
        )
    }

    fn sign(&self, subject: TokenSubject<'_>, kind: TokenKind) -> HmsResult<String> {
        let now = Utc::now();
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };
        let claims = Claims {
            sub: subject.id.to_string(),
            email: subject.email.to_string(),
            first_name: subject.first_name.to_string(),
            last_name: subject.last_name.to_string(),
            kind,
            jti: RecordId::new().to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding).map_err(HmsError::TokenSigning)
    }

    /// Issues a fresh access token and refresh token for `subject`.
    pub fn generate_all(&self, subject: TokenSubject<'_>) -> HmsResult<TokenPair> {
        Ok(TokenPair {
            token: self.sign(subject, TokenKind::Access)?,
            refresh_token: self.sign(subject, TokenKind::Refresh)?,
        })
    }

    /// Checks signature, expiry and kind, returning the claims.
    ///
    /// # Errors
    ///
    /// Returns `HmsError::InvalidToken` for any failure.
    pub fn validate(&self, token: &str, expected: TokenKind) -> HmsResult<Claims> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())
            .map_err(|e| HmsError::InvalidToken(e.to_string()))?;
        if data.claims.kind != expected {
            return Err(HmsError::InvalidToken(format!(
                "expected {:?} token",
                expected
            )));
        }
        Ok(data.claims)
    }
}
