/// HTTP middleware utilities for feed-service
///
/// The authentication collaborator issues HS256 Bearer tokens; this module
/// only verifies them and surfaces the caller identity to handlers. Routes
/// that take a `UserId` argument are identity-scoped and fail with 401 when
/// no valid token is presented; everything else stays anonymous-callable.
use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::future::{ready, Ready};
use uuid::Uuid;

use crate::error::AppError;

/// Claims carried by tokens from the authentication collaborator.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

/// Verification-only key material, registered as app data.
#[derive(Clone)]
pub struct AuthKeys {
    decoding: DecodingKey,
}

impl AuthKeys {
    pub fn from_secret(secret: &str) -> Self {
        Self {
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn verify(&self, token: &str) -> Result<Uuid, AppError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map_err(|_| AppError::Unauthorized("invalid or expired token".to_string()))?;

        Uuid::parse_str(&data.claims.sub)
            .map_err(|_| AppError::Unauthorized("invalid user id in token".to_string()))
    }
}

/// Authenticated caller identity.
#[derive(Debug, Clone)]
pub struct UserId(pub Uuid);

fn extract_user_id(req: &HttpRequest) -> Result<UserId, AppError> {
    let keys = req
        .app_data::<web::Data<AuthKeys>>()
        .ok_or_else(|| AppError::Internal("auth keys not configured".to_string()))?;

    let header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("missing Authorization header".to_string()))?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("invalid Authorization scheme".to_string()))?;

    keys.verify(token).map(UserId)
}

impl FromRequest for UserId {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(extract_user_id(req).map_err(Into::into))
    }
}
