use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Registration input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterInput {
    pub email: String,
    pub name: String,
    pub password: String,
    #[serde(default)]
    pub business_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// Login input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Account fields persisted at registration
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub is_admin: bool,
    pub business_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Domain user (business view)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub is_admin: bool,
    pub business_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Domain credentials (hashed)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub user_id: Uuid,
    pub password_hash: String,
    pub password_algorithm: String,
}

/// Login result (session)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub user: AuthUser,
    pub token: String,
}

/// Acting identity resolved from a session token.
///
/// The two variants are the whole capability set; authorization decisions
/// match on this exhaustively instead of carrying a boolean around.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identity {
    Member { id: Uuid },
    Admin { id: Uuid },
}

impl Identity {
    pub fn id(&self) -> Uuid {
        match self {
            Identity::Member { id } | Identity::Admin { id } => *id,
        }
    }
}
