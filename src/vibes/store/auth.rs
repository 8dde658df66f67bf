//! Master-key request signing for the Cosmos DB REST API.
//!
//! Every request carries an `authorization` header of the form
//! `type=master&ver=1.0&sig=<signature>`, URL-encoded as a whole. The signature is
//! the base64 HMAC-SHA256, keyed with the base64-decoded account key, of:
//!
//! ```text
//! {verb}\n{resource type}\n{resource link}\n{date}\n\n
//! ```
//!
//! where verb, resource type and date are lowercased and the date is the same
//! RFC 1123 string sent in `x-ms-date`.

use crate::error::{Result, VibesError};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// A decoded account key, ready to sign requests.
#[derive(Clone)]
pub struct MasterKey {
    mac: HmacSha256,
}

impl std::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("MasterKey(..)")
    }
}

impl MasterKey {
    pub fn new(encoded: &str) -> Result<Self> {
        let bytes = STANDARD.decode(encoded.trim()).map_err(|e| {
            VibesError::InvalidConfig(format!("COSMOS_KEY is not valid base64: {}", e))
        })?;
        let mac = HmacSha256::new_from_slice(&bytes)
            .map_err(|e| VibesError::InvalidConfig(format!("unusable COSMOS_KEY: {}", e)))?;
        Ok(Self { mac })
    }

    pub fn signature(&self, verb: &str, resource_type: &str, resource_link: &str, date: &str) -> String {
        let payload = format!(
            "{}\n{}\n{}\n{}\n\n",
            verb.to_lowercase(),
            resource_type.to_lowercase(),
            resource_link,
            date.to_lowercase()
        );
        let mut mac = self.mac.clone();
        mac.update(payload.as_bytes());
        STANDARD.encode(mac.finalize().into_bytes())
    }

    /// Value for the `authorization` header.
    pub fn authorization(&self, verb: &str, resource_type: &str, resource_link: &str, date: &str) -> String {
        let token = format!(
            "type=master&ver=1.0&sig={}",
            self.signature(verb, resource_type, resource_link, date)
        );
        url::form_urlencoded::byte_serialize(token.as_bytes()).collect()
    }
}

/// RFC 1123 date for `x-ms-date`.
pub fn http_date(at: DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    // The well-known public key of the local emulator.
    const EMULATOR_KEY: &str =
        "C2y6yDjf5/R+ob0N8A7Cgv30VRDJIWEHLM+4QDU5DE2nQ9nDuVTqobD4b8mGGyPMbIZnqyMsEcaGQy67XIw/Jw==";
    const DATE: &str = "Tue, 01 Oct 2024 12:00:00 GMT";

    #[test]
    fn formats_http_date() {
        let at = Utc.with_ymd_and_hms(2024, 10, 1, 12, 0, 0).unwrap();
        assert_eq!(http_date(at), DATE);
    }

    #[test]
    fn signs_database_feed() {
        let key = MasterKey::new(EMULATOR_KEY).unwrap();
        assert_eq!(
            key.signature("GET", "dbs", "", DATE),
            "JnbDuadJpQ+uNmoXG13ZiUqJmDFSbNhpdt5vxWJgZzg="
        );
    }

    #[test]
    fn signs_document_feed_and_item() {
        let key = MasterKey::new(EMULATOR_KEY).unwrap();
        assert_eq!(
            key.signature("POST", "docs", "dbs/vibes/colls/items", DATE),
            "gmHu6AMedEyMJp15hp/vTTYd89+lBtFJVmwiNlnKAuw="
        );
        assert_eq!(
            key.signature(
                "DELETE",
                "docs",
                "dbs/vibes/colls/items/docs/0b6f0c4e-1f0e-4c8c-9d52-8f5d2a7e3c11",
                DATE
            ),
            "n4goo8NbgB4kIJMz364v3zNqW+7STgDJrHZoX4l1U3k="
        );
    }

    #[test]
    fn authorization_is_url_encoded() {
        let key = MasterKey::new(EMULATOR_KEY).unwrap();
        assert_eq!(
            key.authorization("GET", "dbs", "", DATE),
            "type%3Dmaster%26ver%3D1.0%26sig%3DJnbDuadJpQ%2BuNmoXG13ZiUqJmDFSbNhpdt5vxWJgZzg%3D"
        );
    }

    #[test]
    fn rejects_non_base64_key() {
        assert!(matches!(
            MasterKey::new("not base64!"),
            Err(VibesError::InvalidConfig(_))
        ));
    }

    #[test]
    fn debug_does_not_leak_key() {
        let key = MasterKey::new(EMULATOR_KEY).unwrap();
        assert_eq!(format!("{:?}", key), "MasterKey(..)");
    }
}
