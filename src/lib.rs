//! taskdeck - Task and Project Tracking Library
//!
//! This library provides the core functionality for the taskdeck CLI:
//! a task/project domain layer over a file-backed record store.
//!
//! # Core Concepts
//!
//! - **Projects**: grouping entities with an archive-once lifecycle; archiving
//!   cascades to the project's tasks
//! - **Tasks**: four-status state machine (todo, pending, completed, archived)
//!   with priorities, tags, due dates, and optional parent/subtask links
//! - **Listing pipeline**: scope resolution, archived-visibility filtering,
//!   attribute filtering, stable sort
//! - **Search**: a `key:value` mini-language over free text
//!
//! # Module Organization
//!
//! - `cli`: command-line interface using clap
//! - `config`: configuration loading from `.taskdeck.toml`
//! - `error`: error types and result aliases
//! - `lock`: file locking and atomic writes
//! - `normalize`: input validation and normalization
//! - `output`: human/JSON output envelopes
//! - `project`: project records, store, and lifecycle service
//! - `search`: search query parsing and evaluation
//! - `storage`: the file-backed record store
//! - `task`: task records, store, listing pipeline, and lifecycle service

pub mod cli;
pub mod config;
pub mod error;
pub mod lock;
pub mod normalize;
pub mod output;
pub mod project;
pub mod search;
pub mod storage;
pub mod task;

pub use error::{Error, Result};
