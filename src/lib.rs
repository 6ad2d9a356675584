//! intake-bridge: event-triggered conversion of uploaded submission files
//! into tracked issues.
//!
//! A trigger event names an uploaded file; the handler validates it, routes
//! it by tag, converges the tracker on one issue (with milestone and project
//! board link) and relocates the file to reflect the outcome. All durable
//! state lives in the object store and the tracker, which is what makes
//! redelivered or replayed events safe.

pub mod cli;
pub mod config;
pub mod contract;
pub mod error;
pub mod event;
pub mod github;
pub mod handler;
pub mod load_config;
pub mod notify;
pub mod reconcile;
pub mod storage;
pub mod submission;
