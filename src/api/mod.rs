//! Translation-management HTTP API module.
//!
//! # Purpose
//! Exposes route handler modules per resource plus shared error mapping and
//! payload types.
pub mod error;
pub mod files;
pub mod members;
pub mod messages;
pub mod openapi;
pub mod organizations;
pub mod projects;
pub mod system;
pub mod types;
