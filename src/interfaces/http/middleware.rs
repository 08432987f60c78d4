//! Authentication middleware for Axum
//!
//! Every API route accepts anonymous callers. A bearer token, when present,
//! must verify; the resulting [`Principal`] is stored in the request
//! extensions and read back with the [`Caller`] extractor.

use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{header, request::Parts, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use super::common::ApiResponse;
use crate::domain::principal::{self, Principal};
use crate::domain::DomainError;
use crate::infrastructure::crypto::jwt::{verify_token, JwtConfig};

/// Authentication error types
#[derive(Debug)]
pub enum AuthError {
    MalformedHeader,
    InvalidToken,
}

/// Token verification settings shared by the middleware and handlers
#[derive(Clone)]
pub struct AuthState {
    pub jwt_config: JwtConfig,
    pub privileged_roles: Arc<HashSet<String>>,
}

impl AuthState {
    pub fn new(jwt_config: JwtConfig, privileged_roles: HashSet<String>) -> Self {
        Self {
            jwt_config,
            privileged_roles: Arc::new(privileged_roles),
        }
    }

    pub fn is_privileged(&self, caller: &Caller) -> bool {
        principal::is_privileged(caller.0.as_ref(), &self.privileged_roles)
    }

    /// `Forbidden` unless the caller holds a privileged role.
    pub fn require_privileged(&self, caller: &Caller) -> Result<(), DomainError> {
        if self.is_privileged(caller) {
            Ok(())
        } else {
            Err(DomainError::Forbidden(
                "a privileged role is required".to_string(),
            ))
        }
    }
}

fn extract_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Attach the caller's principal if a bearer token is supplied.
///
/// No `Authorization` header means an anonymous caller. A header that does
/// not carry a valid bearer token is rejected with 401.
pub async fn optional_auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let bearer = request.headers().get(header::AUTHORIZATION).map(|h| {
        h.to_str()
            .ok()
            .and_then(extract_token)
            .map(String::from)
    });
    let Some(bearer) = bearer else {
        return next.run(request).await;
    };
    let Some(token) = bearer else {
        return auth_error_response(AuthError::MalformedHeader);
    };

    match verify_token(&token, &auth_state.jwt_config) {
        Ok(claims) => {
            request.extensions_mut().insert(claims.into_principal());
            next.run(request).await
        }
        Err(e) => {
            tracing::debug!("Rejected bearer token: {}", e);
            auth_error_response(AuthError::InvalidToken)
        }
    }
}

pub fn auth_error_response(error: AuthError) -> Response {
    let message = match error {
        AuthError::MalformedHeader => "Authorization header must be 'Bearer <token>'",
        AuthError::InvalidToken => "Invalid or expired token",
    };
    (
        StatusCode::UNAUTHORIZED,
        Json(ApiResponse::<()>::error(message)),
    )
        .into_response()
}

/// The verified principal of the current request, if any.
#[derive(Debug, Clone, Default)]
pub struct Caller(pub Option<Principal>);

impl Caller {
    pub fn subject(&self) -> Option<&str> {
        self.0.as_ref().map(|p| p.subject.as_str())
    }
}

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Caller(parts.extensions.get::<Principal>().cloned()))
    }
}
