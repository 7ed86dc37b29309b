//! Bearer token verification.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use agora_core::error::CoreError;
use agora_core::types::DbId;

/// Default clock skew tolerated on `exp`, in seconds.
const DEFAULT_LEEWAY_SECS: u64 = 5;

/// The claims this server reads. Anything else in the token is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct Claims {
    /// The caller's user id.
    pub sub: DbId,
    pub exp: u64,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC secret shared with the token issuer.
    pub secret: String,
    pub leeway_secs: u64,
}

impl JwtConfig {
    /// | Env Var           | Required | Default |
    /// |-------------------|----------|---------|
    /// | `JWT_SECRET`      | **yes**  | --      |
    /// | `JWT_LEEWAY_SECS` | no       | `5`     |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is missing or empty, or the leeway is not a
    /// number.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let leeway_secs = std::env::var("JWT_LEEWAY_SECS")
            .map(|v| v.parse().expect("JWT_LEEWAY_SECS must be a valid u64"))
            .unwrap_or(DEFAULT_LEEWAY_SECS);

        Self {
            secret,
            leeway_secs,
        }
    }
}

/// Checks HS256 signatures and expiry on incoming bearer tokens.
#[derive(Clone)]
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = config.leeway_secs;

        Self {
            key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
        }
    }

    pub fn verify(&self, token: &str) -> Result<Claims, CoreError> {
        decode::<Claims>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                let reason = match e.kind() {
                    ErrorKind::ExpiredSignature => "Token has expired".to_string(),
                    ErrorKind::InvalidSignature => "Invalid token signature".to_string(),
                    ErrorKind::InvalidToken => "Invalid token format".to_string(),
                    _ => format!("Token validation failed: {e}"),
                };
                CoreError::Unauthorized(reason)
            })
    }
}
