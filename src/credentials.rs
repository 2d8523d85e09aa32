//! Built-in credential list.
//!
//! One user per role, fixed at startup and never mutated. This is a lookup
//! table, not an authentication system.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::Role;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub username: String,
    password: String,
    pub role: Role,
}

impl Credential {
    pub fn new(username: impl Into<String>, password: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            role,
        }
    }
}

/// Public view of a credential, without the password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserInfo {
    pub username: String,
    pub role: Role,
}

#[derive(Debug, Clone)]
pub struct CredentialStore {
    entries: Vec<Credential>,
}

impl CredentialStore {
    /// The three demo accounts.
    pub fn builtin() -> Self {
        Self {
            entries: vec![
                Credential::new("employee", "emp123", Role::Employee),
                Credential::new("supervisor", "sup123", Role::Supervisor),
                Credential::new("manager", "man123", Role::Manager),
            ],
        }
    }

    /// Exact, case-sensitive match on both fields.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<Role> {
        self.entries
            .iter()
            .find(|entry| entry.username == username && entry.password == password)
            .map(|entry| entry.role)
            .ok_or(Error::InvalidCredentials)
    }

    pub fn users(&self) -> Vec<UserInfo> {
        self.entries
            .iter()
            .map(|entry| UserInfo {
                username: entry.username.clone(),
                role: entry.role,
            })
            .collect()
    }
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::builtin()
    }
}
