use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, VibesError};
use crate::model::Vibe;
use crate::store::VibeStore;

/// Rejects titles that are empty or whitespace only.
pub fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(VibesError::Validation("Title cannot be empty".into()));
    }
    Ok(())
}

pub fn run<S: VibeStore>(
    store: &mut S,
    title: String,
    description: String,
    category: Option<String>,
) -> Result<CmdResult> {
    validate_title(&title)?;

    let vibe = Vibe::new(title, description, category);
    store.create(&vibe)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Added vibe: '{}'",
        vibe.title
    )));
    result.add_message(CmdMessage::info(format!("ID: {}", vibe.id)));
    Ok(result.with_affected_vibes(vec![vibe]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryStore;
    use chrono::{SubsecRound, Utc};
    use std::collections::HashSet;

    #[test]
    fn creates_vibe_with_matching_timestamps() {
        let mut store = InMemoryStore::new();
        let before = Utc::now().trunc_subsecs(6);
        let result = run(
            &mut store,
            "Coffee Time".into(),
            "Morning brew".into(),
            Some("general".into()),
        )
        .unwrap();

        let vibe = &result.affected_vibes[0];
        assert_eq!(vibe.created_at, vibe.updated_at);
        assert!(vibe.created_at >= before);
        assert_eq!(store.len(), 1);
        assert_eq!(result.messages[0].content, "Added vibe: 'Coffee Time'");
    }

    #[test]
    fn empty_title_is_rejected_without_persisting() {
        let mut store = InMemoryStore::new();
        for title in ["", "   ", "\t\n"] {
            let err = run(&mut store, title.into(), "desc".into(), None).unwrap_err();
            assert!(matches!(err, VibesError::Validation(_)));
        }
        assert!(store.is_empty());
    }

    #[test]
    fn blank_category_persists_fallback() {
        let mut store = InMemoryStore::new();
        run(&mut store, "A".into(), "".into(), Some("".into())).unwrap();
        run(&mut store, "B".into(), "".into(), None).unwrap();

        let categories: Vec<_> = store.list().unwrap().into_iter().map(|v| v.category).collect();
        assert_eq!(categories, vec!["general", "general"]);
    }

    #[test]
    fn ids_are_unique_within_session() {
        let mut store = InMemoryStore::new();
        let mut ids = HashSet::new();
        for i in 0..50 {
            let result = run(&mut store, format!("Vibe {}", i), "".into(), None).unwrap();
            assert!(ids.insert(result.affected_vibes[0].id));
        }
        assert_eq!(store.len(), 50);
    }

    #[test]
    fn unavailable_store_propagates() {
        let mut store = InMemoryStore::new();
        store.set_simulate_outage(true);
        let err = run(&mut store, "A".into(), "".into(), None).unwrap_err();
        assert!(err.is_unavailable());
    }
}
