use super::VibeStore;
use crate::error::{Result, VibesError};
use crate::model::Vibe;
use std::collections::HashMap;
use uuid::Uuid;

/// In-memory storage for testing and scratch sessions.
/// Does NOT persist data.
#[derive(Default)]
pub struct InMemoryStore {
    vibes: HashMap<Uuid, Vibe>,
    simulate_outage: bool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every operation fail with `StoreUnavailable` until switched off.
    pub fn set_simulate_outage(&mut self, simulate: bool) {
        self.simulate_outage = simulate;
    }

    pub fn len(&self) -> usize {
        self.vibes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vibes.is_empty()
    }

    fn check_available(&self) -> Result<()> {
        if self.simulate_outage {
            return Err(VibesError::StoreUnavailable(
                "Simulated outage".to_string(),
            ));
        }
        Ok(())
    }
}

impl VibeStore for InMemoryStore {
    fn create(&mut self, vibe: &Vibe) -> Result<()> {
        self.check_available()?;
        if self.vibes.contains_key(&vibe.id) {
            return Err(VibesError::AlreadyExists(vibe.id));
        }
        self.vibes.insert(vibe.id, vibe.clone());
        Ok(())
    }

    fn list(&self) -> Result<Vec<Vibe>> {
        self.check_available()?;
        Ok(self.vibes.values().cloned().collect())
    }

    fn delete(&mut self, id: &Uuid) -> Result<()> {
        self.check_available()?;
        if self.vibes.remove(id).is_none() {
            return Err(VibesError::NotFound(*id));
        }
        Ok(())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    /// Base creation time for fixture vibes; each added vibe is one minute newer.
    pub fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()
    }

    pub struct StoreFixture {
        pub store: InMemoryStore,
        added: i64,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
                added: 0,
            }
        }

        /// Adds `count` vibes titled "Test Vibe 1".."Test Vibe N", oldest first.
        pub fn with_vibes(mut self, count: usize) -> Self {
            for i in 0..count {
                self = self.with_vibe(&format!("Test Vibe {}", i + 1), "general");
            }
            self
        }

        /// Adds one vibe, newer than every vibe added before it.
        pub fn with_vibe(mut self, title: &str, category: &str) -> Self {
            let mut vibe = Vibe::new(
                title.to_string(),
                format!("About {}", title),
                Some(category.to_string()),
            );
            vibe.created_at = base_time() + Duration::minutes(self.added);
            vibe.updated_at = vibe.created_at;
            self.added += 1;
            self.store.create(&vibe).unwrap();
            self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::StoreFixture;
    use super::*;

    #[test]
    fn list_empty_store_is_ok() {
        let store = InMemoryStore::new();
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn create_then_list() {
        let store = StoreFixture::new().with_vibes(3).store;
        assert_eq!(store.list().unwrap().len(), 3);
    }

    #[test]
    fn create_duplicate_id_conflicts() {
        let mut store = InMemoryStore::new();
        let vibe = Vibe::new("Once".into(), "".into(), None);
        store.create(&vibe).unwrap();
        assert!(matches!(
            store.create(&vibe),
            Err(VibesError::AlreadyExists(id)) if id == vibe.id
        ));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn delete_missing_is_not_found() {
        let mut store = StoreFixture::new().with_vibes(2).store;
        let missing = Uuid::new_v4();
        assert!(matches!(
            store.delete(&missing),
            Err(VibesError::NotFound(id)) if id == missing
        ));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn outage_fails_every_operation() {
        let mut store = StoreFixture::new().with_vibes(1).store;
        store.set_simulate_outage(true);

        let vibe = Vibe::new("Later".into(), "".into(), None);
        assert!(store.create(&vibe).unwrap_err().is_unavailable());
        assert!(store.list().unwrap_err().is_unavailable());
        assert!(store.delete(&vibe.id).unwrap_err().is_unavailable());

        store.set_simulate_outage(false);
        assert_eq!(store.list().unwrap().len(), 1);
    }
}
