//! API endpoint integration tests
//!
//! Drives the composed router end to end: chat, history, uploads, and the
//! Postgres conversation store when a test database is configured.

#![allow(dead_code)]

mod chat;
mod common;
mod history;
mod postgres_store;
mod uploads;
