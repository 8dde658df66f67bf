//! # Storage Layer
//!
//! This module defines the storage abstraction for vibes. The [`VibeStore`] trait
//! is the narrow capability the rest of the crate needs from a document collection:
//! create, list everything, delete by id.
//!
//! ## Implementations
//!
//! - [`cosmos::CosmosStore`]: Production storage on Azure Cosmos DB (or the local
//!   emulator), spoken to over its REST API.
//!   - One document per vibe, partitioned by `/id`
//!   - Database and container are created on connect when missing
//!
//! - [`memory::InMemoryStore`]: In-memory storage for testing and scratch sessions
//!   - No persistence
//!   - Can simulate an outage to exercise error handling
//!
//! ## Contract
//!
//! - `list` returns records in no particular order. Callers that show a list to a
//!   human go through [`crate::index::index_vibes`], which fixes the order.
//! - `list` on an empty collection is `Ok(vec![])`, never an error.
//! - `delete` of an absent id is [`VibesError::NotFound`](crate::error::VibesError::NotFound).
//! - Connectivity and auth failures surface as
//!   [`VibesError::StoreUnavailable`](crate::error::VibesError::StoreUnavailable).
//!
//! There is no caching: every call is a fresh round trip.

use crate::error::Result;
use crate::model::Vibe;
use uuid::Uuid;

pub mod auth;
pub mod cosmos;
pub mod memory;

pub trait VibeStore {
    /// Persist a new vibe.
    fn create(&mut self, vibe: &Vibe) -> Result<()>;

    /// Every vibe in the collection, unordered.
    fn list(&self) -> Result<Vec<Vibe>>;

    /// Delete a vibe permanently.
    fn delete(&mut self, id: &Uuid) -> Result<()>;
}
