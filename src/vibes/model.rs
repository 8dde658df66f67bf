//! # Domain Model
//!
//! A [`Vibe`] is the only persisted entity. It is stored as one JSON document per
//! record, keyed (and partitioned) by its `id`:
//!
//! ```json
//! {
//!   "id": "0b6f0c4e-1f0e-4c8c-9d52-8f5d2a7e3c11",
//!   "title": "Coffee Time",
//!   "description": "Morning brew",
//!   "category": "general",
//!   "created_at": "2024-05-01T10:00:00.000000Z",
//!   "updated_at": "2024-05-01T10:00:00.000000Z",
//!   "type": "vibe"
//! }
//! ```
//!
//! ## Invariants
//!
//! - `id` is a v4 UUID assigned at creation and never changes.
//! - `created_at` never changes; `updated_at` equals it at creation.
//! - `category` is never empty: a blank category becomes [`FALLBACK_CATEGORY`].
//! - `type` is always the literal `"vibe"`. Documents with another `type` are
//!   not vibes and fail to deserialize.
//!
//! ## Timestamps
//!
//! Timestamps are written as RFC 3339 UTC with microsecond precision. Older
//! documents carry naive ISO-8601 strings without an offset; those are read as UTC.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category used when the caller supplies none.
pub const FALLBACK_CATEGORY: &str = "general";

/// Literal discriminator stored in the `type` field.
pub const VIBE_KIND: &str = "vibe";

/// Discriminator for documents sharing the collection. Only vibes exist today.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Kind {
    #[default]
    #[serde(rename = "vibe")]
    Vibe,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vibe {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: Kind,
}

impl Vibe {
    pub fn new(title: String, description: String, category: Option<String>) -> Self {
        // Stored timestamps carry microseconds; keep the in-memory value identical.
        let now = Utc::now().trunc_subsecs(6);
        Self {
            id: Uuid::new_v4(),
            title,
            description,
            category: resolve_category(category),
            created_at: now,
            updated_at: now,
            kind: Kind::Vibe,
        }
    }
}

/// Substitutes [`FALLBACK_CATEGORY`] for a missing or blank category.
pub fn resolve_category(category: Option<String>) -> String {
    match category {
        Some(c) if !c.trim().is_empty() => c,
        _ => FALLBACK_CATEGORY.to_string(),
    }
}

pub(crate) mod timestamp {
    use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Micros, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    pub fn parse(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
        match DateTime::parse_from_rfc3339(raw) {
            Ok(ts) => Ok(ts.with_timezone(&Utc)),
            // naive ISO-8601, no offset
            Err(_) => NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|n| n.and_utc()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn new_vibe_stamps_matching_timestamps() {
        let vibe = Vibe::new("Title".into(), "".into(), None);
        assert_eq!(vibe.created_at, vibe.updated_at);
        assert_eq!(vibe.kind, Kind::Vibe);
    }

    #[test]
    fn fresh_vibe_survives_storage_round_trip() {
        for _ in 0..50 {
            let vibe = Vibe::new("Round Trip".into(), "".into(), Some("mood".into()));
            let json = serde_json::to_string(&vibe).unwrap();
            let back: Vibe = serde_json::from_str(&json).unwrap();
            assert_eq!(back, vibe);
        }
    }

    #[test]
    fn blank_category_falls_back() {
        assert_eq!(resolve_category(None), "general");
        assert_eq!(resolve_category(Some("".into())), "general");
        assert_eq!(resolve_category(Some("   ".into())), "general");
        assert_eq!(resolve_category(Some("nature".into())), "nature");
    }

    #[test]
    fn serializes_to_wire_shape() {
        let mut vibe = Vibe::new("Coffee Time".into(), "Morning brew".into(), None);
        vibe.created_at = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        vibe.updated_at = vibe.created_at;

        let value = serde_json::to_value(&vibe).unwrap();
        assert_eq!(value["id"], vibe.id.to_string());
        assert_eq!(value["type"], "vibe");
        assert_eq!(value["category"], "general");
        assert_eq!(value["created_at"], "2024-05-01T10:00:00.000000Z");
        assert_eq!(value["updated_at"], "2024-05-01T10:00:00.000000Z");
    }

    #[test]
    fn reads_documents_with_server_properties() {
        let json = r#"{
            "id": "0b6f0c4e-1f0e-4c8c-9d52-8f5d2a7e3c11",
            "title": "Beach Sunset",
            "description": "",
            "category": "nature",
            "created_at": "2024-05-01T10:00:00.5Z",
            "updated_at": "2024-05-01T10:00:00.5Z",
            "type": "vibe",
            "_rid": "abc==",
            "_etag": "\"0000\"",
            "_ts": 1714557600
        }"#;
        let vibe: Vibe = serde_json::from_str(json).unwrap();
        assert_eq!(vibe.title, "Beach Sunset");
        assert_eq!(vibe.category, "nature");
    }

    #[test]
    fn reads_naive_timestamps_as_utc() {
        let json = r#"{
            "id": "0b6f0c4e-1f0e-4c8c-9d52-8f5d2a7e3c11",
            "title": "Old",
            "description": "from an older client",
            "category": "general",
            "created_at": "2024-05-01T10:00:00.123456",
            "updated_at": "2024-05-01T10:00:00",
            "type": "vibe"
        }"#;
        let vibe: Vibe = serde_json::from_str(json).unwrap();
        let expected = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        assert_eq!(vibe.updated_at, expected);
        assert_eq!(
            vibe.created_at,
            expected + chrono::Duration::microseconds(123_456)
        );
    }

    #[test]
    fn rejects_foreign_document_kinds() {
        let json = r#"{
            "id": "0b6f0c4e-1f0e-4c8c-9d52-8f5d2a7e3c11",
            "title": "Not a vibe",
            "category": "general",
            "created_at": "2024-05-01T10:00:00Z",
            "updated_at": "2024-05-01T10:00:00Z",
            "type": "playlist"
        }"#;
        assert!(serde_json::from_str::<Vibe>(json).is_err());
    }

    #[test]
    fn missing_description_defaults_to_empty() {
        let json = r#"{
            "id": "0b6f0c4e-1f0e-4c8c-9d52-8f5d2a7e3c11",
            "title": "Terse",
            "category": "general",
            "created_at": "2024-05-01T10:00:00Z",
            "updated_at": "2024-05-01T10:00:00Z",
            "type": "vibe"
        }"#;
        let vibe: Vibe = serde_json::from_str(json).unwrap();
        assert_eq!(vibe.description, "");
    }
}
