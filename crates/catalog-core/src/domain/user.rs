//! User domain entity
//!
//! Users authenticate with email and password and carry a role that gates
//! access to the admin surface (product mutation, sync control). Password
//! hashing happens at the API layer; the entity only stores the PHC string.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::DomainError;
use super::newtypes::{Email, UserId};

/// Access role for a user account
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Regular account: read-only catalog access
    #[default]
    User,
    /// Administrative account: full catalog and sync control
    Admin,
}

impl Role {
    /// Returns the role name as stored and serialized
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(DomainError::InvalidRole(other.to_string())),
        }
    }
}

/// A registered account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Local identifier
    id: UserId,
    /// Login email, unique across accounts
    email: Email,
    /// Argon2id PHC hash of the password
    password_hash: String,
    /// Access role
    role: Role,
    /// When the account was registered
    created_at: DateTime<Utc>,
}

impl User {
    /// Creates a new account with a freshly allocated id
    pub fn new(email: Email, password_hash: impl Into<String>, role: Role) -> Self {
        Self {
            id: UserId::new(),
            email,
            password_hash: password_hash.into(),
            role,
            created_at: Utc::now(),
        }
    }

    /// Reconstructs an account from stored parts (repository row mapping)
    pub fn from_parts(
        id: UserId,
        email: Email,
        password_hash: String,
        role: Role,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            email,
            password_hash,
            role,
            created_at,
        }
    }

    /// Returns the account identifier
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Returns the login email
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Returns the stored password hash
    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    /// Returns the access role
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns true for administrative accounts
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Returns when the account was registered
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Changes the account role
    pub fn set_role(&mut self, role: Role) {
        self.role = role;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user(role: Role) -> User {
        User::new(
            Email::new("user@example.com").unwrap(),
            "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA",
            role,
        )
    }

    #[test]
    fn test_role_parse_roundtrip() {
        assert_eq!(Role::from_str("user").unwrap(), Role::User);
        assert_eq!(Role::from_str("admin").unwrap(), Role::Admin);
        assert!(Role::from_str("root").is_err());
        assert_eq!(Role::Admin.as_str(), "admin");
    }

    #[test]
    fn test_role_serde_snake_case() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        let role: Role = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(role, Role::User);
    }

    #[test]
    fn test_is_admin() {
        assert!(sample_user(Role::Admin).is_admin());
        assert!(!sample_user(Role::User).is_admin());
    }

    #[test]
    fn test_set_role() {
        let mut user = sample_user(Role::User);
        user.set_role(Role::Admin);
        assert_eq!(user.role(), Role::Admin);
    }

    #[test]
    fn test_default_role_is_user() {
        assert_eq!(Role::default(), Role::User);
    }
}
