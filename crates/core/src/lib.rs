//! Core types and storage for feed-store.
//!
//! This crate provides:
//! - The `FeedStore` seam and its completion handle
//! - A SQLite-backed `CacheStore` holding one cached feed snapshot
//! - An in-memory store for callers' tests
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod model;
pub mod store;

pub use cache::CacheStore;
pub use config::{ConfigError, StoreConfig};
pub use error::{Error, StorageError};
pub use model::{CacheResult, FeedImage};
pub use store::{Completion, FeedStore, InMemoryFeedStore};
