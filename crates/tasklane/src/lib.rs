//! Tasklane - a todo list with task dependencies, due dates and a critical path.
//!
//! This crate provides both the `tasklane` CLI and a library used by the
//! HTTP server. The interesting part is [`graph`]: cycle checking,
//! critical-path leveling and earliest-start inference over a snapshot of
//! the task list. [`storage`] guards every dependency write with those
//! checks.

#![forbid(unsafe_code)]

pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod error;
pub mod graph;
pub mod output;
pub mod storage;

pub use error::{Error, Result};
