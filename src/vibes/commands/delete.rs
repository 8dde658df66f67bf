use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::VibeStore;
use uuid::Uuid;

/// Deletes by id. An absent id is `VibesError::NotFound`, left for the caller to report.
pub fn run<S: VibeStore>(store: &mut S, id: &Uuid) -> Result<CmdResult> {
    store.delete(id)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Removed vibe with ID: {}",
        id
    )));
    Ok(result)
}
