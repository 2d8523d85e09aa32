//! ticktango - Tick Tango checklist core
//!
//! This library provides the core of the Tick Tango role-based checklist:
//! who may see and change which check, and how a session pages through them.
//!
//! # Core Concepts
//!
//! - **Checks**: work items owned by a role, completed and separately approved
//! - **Roles**: employee, supervisor, manager, ordered by authority
//! - **Policy**: a pure decision table over (actor, owner, action)
//! - **Session**: logged-in role plus filter, sort, search, page and tab
//!
//! # Module Organization
//!
//! - `app`: Owned facade combining credentials, checks and session
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `.tt.toml`
//! - `credentials`: Built-in accounts and authentication
//! - `error`: Error types and result aliases
//! - `model`: Role, frequency, priority and category enums
//! - `output`: Human and JSON rendering
//! - `policy`: Permission rules
//! - `query`: Visibility, filter, search, sort and pagination
//! - `session`: Per-login view state and tabs
//! - `stats`: Aggregate counts
//! - `task`: Check records and the in-memory store

pub mod app;
pub mod cli;
pub mod config;
pub mod credentials;
pub mod error;
pub mod model;
pub mod output;
pub mod policy;
pub mod query;
pub mod session;
pub mod stats;
pub mod task;

pub use app::App;
pub use error::{Error, Result};
