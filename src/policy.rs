//! Permission policy.
//!
//! Pure decision functions over the acting role and the owner role of a
//! check. Nothing here reads state; the task store and the app facade call
//! into these before every mutation, and the presentation layer may call
//! them to decide which controls to enable.
//!
//! Visibility and approval follow `manager ⊇ supervisor ⊇ employee`, while
//! completion is self-scoped with a manager override.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::Role;

/// A gated mutation on the check collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Complete,
    Approve,
    Create,
    Delete,
}

impl Action {
    pub const ALL: [Action; 4] = [
        Action::Complete,
        Action::Approve,
        Action::Create,
        Action::Delete,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Complete => "complete",
            Self::Approve => "approve",
            Self::Create => "create",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether `actor` may see a check owned by `owner` at all.
pub fn can_view(actor: Role, owner: Role) -> bool {
    match actor {
        Role::Employee => owner == Role::Employee,
        Role::Supervisor => owner != Role::Manager,
        Role::Manager => true,
    }
}

pub fn can_toggle_complete(actor: Role, owner: Role) -> bool {
    actor == Role::Manager || actor == owner
}

/// Approval always comes from a strictly higher tier; manager-owned checks
/// cannot be approved by anyone.
pub fn can_toggle_approve(actor: Role, owner: Role) -> bool {
    match actor {
        Role::Employee => false,
        Role::Supervisor => owner == Role::Employee,
        Role::Manager => matches!(owner, Role::Employee | Role::Supervisor),
    }
}

pub fn can_create(actor: Role) -> bool {
    actor == Role::Manager
}

pub fn can_delete(actor: Role) -> bool {
    actor == Role::Manager
}

/// Single entry point over every gated action. `owner` is ignored for
/// `Create` and `Delete`, which depend on the actor alone.
pub fn allows(actor: Role, owner: Role, action: Action) -> bool {
    match action {
        Action::Complete => can_toggle_complete(actor, owner),
        Action::Approve => can_toggle_approve(actor, owner),
        Action::Create => can_create(actor),
        Action::Delete => can_delete(actor),
    }
}
