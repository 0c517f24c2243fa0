//! Audit log actors.

use cadre_common_core::UserId;
use serde::{Deserialize, Serialize};

/// The entity that performed the recorded interaction.
///
/// The user reference is weak: the referenced user may be deleted later
/// without invalidating the entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuditActor {
    /// An authenticated user.
    User {
        user_id: UserId,
        email: Option<String>,
    },
    /// An internal component acting on its own behalf.
    System { component: String },
    /// No authenticated identity was attached to the request.
    Anonymous,
}

impl AuditActor {
    /// Create a user actor.
    pub fn user(user_id: UserId, email: impl Into<String>) -> Self {
        Self::User {
            user_id,
            email: Some(email.into()),
        }
    }

    /// Create a system actor.
    pub fn system(component: impl Into<String>) -> Self {
        Self::System {
            component: component.into(),
        }
    }

    /// The acting user's ID, if any.
    pub fn user_id(&self) -> Option<UserId> {
        match self {
            Self::User { user_id, .. } => Some(*user_id),
            _ => None,
        }
    }

    /// Get a display identifier for this actor.
    pub fn identifier(&self) -> String {
        match self {
            Self::User { user_id, email } => {
                email.clone().unwrap_or_else(|| user_id.to_string())
            }
            Self::System { component } => format!("system:{}", component),
            Self::Anonymous => "anonymous".to_string(),
        }
    }
}
