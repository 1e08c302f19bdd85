//! Signed bearer tokens and the authorization gate.
//!
//! Tokens are HS256 JWTs carrying the admin's identity and role. Protected
//! handlers call [`authorize`] (through the `RequireAdmin` extractor) before
//! touching any store, and get back an [`AuthDecision`] rather than a bare
//! boolean so the rejection reason reaches the response.

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use suggestion_box_core::{AdminRole, AdminUserId, Email, role_satisfies};

use crate::models::{AdminUser, CurrentAdmin};

/// Claims carried by an admin token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Admin ID, carried as a decimal string.
    #[serde(with = "subject")]
    pub sub: AdminUserId,
    pub email: Email,
    pub role: AdminRole,
    pub first_name: String,
    pub last_name: String,
    /// Issued-at, seconds since the epoch.
    pub iat: i64,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
}

mod subject {
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    use suggestion_box_core::AdminUserId;

    pub fn serialize<S: Serializer>(id: &AdminUserId, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(id)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<AdminUserId, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(|_| D::Error::custom(format!("invalid subject: {raw:?}")))
    }
}

impl Claims {
    /// The caller identity handed to handlers.
    #[must_use]
    pub fn current_admin(&self) -> CurrentAdmin {
        CurrentAdmin {
            id: self.sub,
            email: self.email.clone(),
            role: self.role,
        }
    }
}

/// Errors from minting or verifying a token.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The token's `exp` is in the past.
    #[error("token expired")]
    Expired,

    /// Bad signature, wrong algorithm, or unreadable claims.
    #[error("invalid token: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),

    /// Signing failed.
    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// HS256 signing material plus token lifetime.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl std::fmt::Debug for TokenKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenKeys")
            .field("secret", &"[REDACTED]")
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl TokenKeys {
    /// Derive keys from the shared secret.
    #[must_use]
    pub fn new(secret: &SecretString, ttl: Duration) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
            ttl,
        }
    }

    /// Token lifetime.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for `user`, valid for the configured lifetime.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Signing` if encoding fails.
    pub fn mint(&self, user: &AdminUser) -> Result<String, TokenError> {
        let iat = Utc::now().timestamp();
        let ttl = i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX);
        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            role: user.role,
            first_name: user.first_name.to_string(),
            last_name: user.last_name.to_string(),
            iat,
            exp: iat.saturating_add(ttl),
        };
        self.encode(&claims)
    }

    fn encode(&self, claims: &Claims) -> Result<String, TokenError> {
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(TokenError::Signing)
    }

    /// Check signature and expiry and return the claims.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Expired` or `TokenError::Invalid`.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e),
            })
    }
}

/// Why a request was turned away by the gate.
#[derive(Debug, Error)]
pub enum RejectReason {
    /// No `Authorization` header.
    #[error("authentication required")]
    MissingToken,

    /// Header present but not `Bearer <token>`.
    #[error("malformed authorization header")]
    MalformedHeader,

    /// Token failed verification.
    #[error("{0}")]
    InvalidToken(#[from] TokenError),

    /// Token verified but names an admin that no longer exists.
    #[error("token subject no longer exists")]
    UnknownSubject,

    /// Token is valid but its role does not satisfy the route.
    #[error("role {held} may not access a route requiring {required}")]
    InsufficientRole {
        held: AdminRole,
        required: AdminRole,
    },
}

/// Outcome of [`authorize`].
#[derive(Debug)]
pub enum AuthDecision {
    /// The caller may proceed.
    Authorized(Claims),
    /// The caller is turned away.
    Rejected(RejectReason),
}

/// Verify an `Authorization` header value against a required role.
///
/// Fails closed: anything other than a well-formed bearer token that
/// verifies and carries a permitted role is rejected.
#[must_use]
pub fn authorize(header: Option<&str>, keys: &TokenKeys, required: AdminRole) -> AuthDecision {
    let Some(header) = header else {
        return AuthDecision::Rejected(RejectReason::MissingToken);
    };

    let token = match header.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() => {
            token.trim()
        }
        _ => return AuthDecision::Rejected(RejectReason::MalformedHeader),
    };

    let claims = match keys.verify(token) {
        Ok(claims) => claims,
        Err(e) => return AuthDecision::Rejected(e.into()),
    };

    if !role_satisfies(required, claims.role) {
        return AuthDecision::Rejected(RejectReason::InsufficientRole {
            held: claims.role,
            required,
        });
    }

    AuthDecision::Authorized(claims)
}
