//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It is the single
//! entry point for all vibe operations, whichever UI drives them.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Dispatches** to the appropriate command function
//! - **Owns the store** for the lifetime of a session
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: That belongs in `commands/*.rs`
//! - **I/O operations**: No stdout, stderr, or prompting
//! - **Presentation concerns**: Returns data structures, not strings
//!
//! ## Interactive Removal
//!
//! Removal spans several user inputs, so the API hands out a
//! [`RemoveFlow`](commands::remove::RemoveFlow) instead of doing it in one call:
//!
//! ```text
//! let mut flow = api.begin_removal()?;     // Listing
//! flow.select("2")?;                       // Selecting
//! let vibe = flow.preview()?;              // Previewing
//! api.confirm_removal(&mut flow, true)?;   // Confirming + Deleting
//! let report = flow.report();
//! ```
//!
//! ## Generic Over VibeStore
//!
//! `VibesApi<S: VibeStore>` is generic over the storage backend:
//! - Production: `VibesApi<CosmosStore>`
//! - Testing and scratch sessions: `VibesApi<InMemoryStore>`

use crate::commands;
use crate::commands::remove::RemoveFlow;
use crate::error::Result;
use crate::store::VibeStore;
use uuid::Uuid;

/// The main API facade for vibe operations.
pub struct VibesApi<S: VibeStore> {
    store: S,
}

impl<S: VibeStore> VibesApi<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn add_vibe(
        &mut self,
        title: String,
        description: String,
        category: Option<String>,
    ) -> Result<commands::CmdResult> {
        commands::create::run(&mut self.store, title, description, category)
    }

    pub fn list_vibes(&self) -> Result<commands::CmdResult> {
        commands::list::run(&self.store)
    }

    pub fn delete_vibe(&mut self, id: &Uuid) -> Result<commands::CmdResult> {
        commands::delete::run(&mut self.store, id)
    }

    /// Takes the snapshot a numbered removal works against.
    pub fn begin_removal(&self) -> Result<RemoveFlow> {
        RemoveFlow::start(&self.store)
    }

    pub fn confirm_removal(&mut self, flow: &mut RemoveFlow, confirmed: bool) -> Result<()> {
        flow.confirm(&mut self.store, confirmed)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}
