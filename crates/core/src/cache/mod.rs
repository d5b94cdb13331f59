//! SQLite-backed feed cache.
//!
//! This module provides the durable [`CacheStore`] using SQLite with async
//! access via tokio-rusqlite. It supports:
//!
//! - A single snapshot slot enforced by the schema
//! - Atomic replace of the cached feed in one transaction
//! - Strict FIFO execution through one worker task
//! - Automatic schema migrations

pub mod connection;
pub mod migrations;
mod snapshot;
mod worker;

pub use connection::CacheStore;
