//! Report pipeline for environmental & social monitoring.
//!
//! The heart of the crate is [`workflows::monitoring`]: uploaded action-plan
//! tables flow through extraction, risk filtering, completion summaries,
//! due-date timelines and narrative generation, then back out through the
//! document and page exporters. Everything is synchronous and per-session;
//! a session's tables live in memory and are discarded with it.

pub mod auth;
pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
