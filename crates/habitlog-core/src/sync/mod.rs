//! Client-side synchronization with the habitlog backend.
//!
//! The local store is authoritative for writes; the backend is consulted on
//! load and notified after each mutation when it was reachable at startup.

pub mod client;
pub mod gateway;
pub mod types;

#[cfg(test)]
mod gateway_tests;

pub use client::{ApiClient, RemoteHabitApi, DEFAULT_API_BASE_URL};
pub use gateway::{HabitView, PersistenceGateway};
pub use types::SyncStatus;
