use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::index::index_vibes;
use crate::store::VibeStore;

pub fn run<S: VibeStore>(store: &S) -> Result<CmdResult> {
    let indexed = index_vibes(store.list()?);

    let mut result = CmdResult::default();
    if indexed.is_empty() {
        result.add_message(CmdMessage::info("No vibes found in the database"));
    }
    Ok(result.with_listed_vibes(indexed))
}
