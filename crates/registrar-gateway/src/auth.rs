// SPDX-FileCopyrightText: 2026 Registrar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bearer-token authentication and role extractors.
//!
//! Tokens are configured statically; each resolves to a [`Principal`]
//! carrying an external user id and a role. An empty token table rejects
//! every authenticated request.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};
use registrar_config::model::PrincipalConfig;
use registrar_core::Role;
use tracing::debug;

use crate::error::ApiError;

/// The caller behind a bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: String,
    pub role: Role,
}

/// Token table consulted by [`auth_middleware`].
#[derive(Clone, Default)]
pub struct AuthConfig {
    principals: Arc<HashMap<String, Principal>>,
}

impl AuthConfig {
    pub fn from_principals(principals: &[PrincipalConfig]) -> Self {
        let principals = principals
            .iter()
            .map(|p| {
                (
                    p.token.clone(),
                    Principal {
                        user_id: p.user_id.clone(),
                        role: p.role,
                    },
                )
            })
            .collect();
        Self {
            principals: Arc::new(principals),
        }
    }

    pub fn resolve(&self, token: &str) -> Option<&Principal> {
        self.principals.get(token)
    }

    pub fn is_empty(&self) -> bool {
        self.principals.is_empty()
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("principals", &self.principals.len())
            .finish()
    }
}

/// Resolve the bearer token and attach the [`Principal`] to the request.
pub async fn auth_middleware(
    State(auth): State<AuthConfig>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    let Some(principal) = token.and_then(|t| auth.resolve(t)).cloned() else {
        debug!(path = %request.uri().path(), "rejecting unauthenticated request");
        return ApiError::Unauthorized.into_response();
    };

    request.extensions_mut().insert(principal);
    next.run(request).await
}

impl<S: Send + Sync> FromRequestParts<S> for Principal {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .ok_or(ApiError::Unauthorized)
    }
}

/// A SUPER_ADMIN or ADMIN principal.
#[derive(Debug, Clone)]
pub struct AdminUser(pub Principal);

impl<S: Send + Sync> FromRequestParts<S> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let principal = Principal::from_request_parts(parts, state).await?;
        if principal.role.is_admin() {
            Ok(Self(principal))
        } else {
            Err(ApiError::Forbidden)
        }
    }
}

/// A STUDENT principal; `user_id` is the student's institutional id.
#[derive(Debug, Clone)]
pub struct StudentUser(pub Principal);

impl<S: Send + Sync> FromRequestParts<S> for StudentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let principal = Principal::from_request_parts(parts, state).await?;
        if principal.role == Role::Student {
            Ok(Self(principal))
        } else {
            Err(ApiError::Forbidden)
        }
    }
}
