//! Authentication types.

use cadre_common_core::UserId;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// JWT claims structure.
///
/// Roles and effective permission codes are resolved when the token is
/// issued; at request time they are read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: String,
    /// User email.
    pub email: String,
    /// User roles.
    pub roles: Vec<String>,
    /// Effective permission codes.
    #[serde(default)]
    pub permissions: Vec<String>,
    /// Super-administrator flag.
    #[serde(default)]
    pub super_admin: bool,
    /// Token type (access/refresh).
    pub token_type: TokenType,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
    /// JWT ID (for revocation).
    pub jti: String,
}

/// Token type enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    Access,
    Refresh,
}

impl Claims {
    /// Create new access token claims.
    pub fn new_access(
        user_id: UserId,
        email: &str,
        roles: Vec<String>,
        permissions: Vec<String>,
        super_admin: bool,
        expires_in: i64,
    ) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: user_id.to_string(),
            email: email.to_string(),
            roles,
            permissions,
            super_admin,
            token_type: TokenType::Access,
            iat: now,
            exp: now + expires_in,
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Get user ID.
    pub fn user_id(&self) -> Option<UserId> {
        UserId::parse(&self.sub).ok()
    }

    /// Check if token is expired.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

/// Authenticated user context attached to the request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: UserId,
    pub email: String,
    pub roles: Vec<String>,
    /// Effective permission codes; a set for O(1) checks.
    pub permissions: HashSet<String>,
    pub is_super_admin: bool,
}

impl AuthUser {
    /// Create from claims.
    pub fn from_claims(claims: &Claims) -> Option<Self> {
        let id = claims.user_id()?;
        Some(Self {
            id,
            email: claims.email.clone(),
            roles: claims.roles.clone(),
            permissions: claims.permissions.iter().cloned().collect(),
            is_super_admin: claims.super_admin,
        })
    }
}
