//! Persisted vault format.
//!
//! A vault is stored as one JSON document named `<vault_id>.json`:
//!
//! ```text
//! {
//!   "vault_id": "...", "customer_id": "...",
//!   "key": "<hex>", "nonce": "<hex>",
//!   "encrypted_files": [
//!     { "name", "type", "size", "key", "nonce", "encrypted_data", "merkle_leaf", "note"? }
//!   ],
//!   "merkle_root": "<hex>"
//! }
//! ```
//!
//! Binary fields are lowercase hex so existing vault files stay readable.

use serde::Deserialize;

use super::metadata::VaultMetadata;
use crate::errors::{ChainError, Result};

/// Extension appended to a vault id to form its object key.
const VAULT_EXT: &str = ".json";

/// Object key under which a vault is stored.
pub fn object_key(vault_id: &str) -> String {
    format!("{vault_id}{VAULT_EXT}")
}

/// Vault id encoded in an object key, if the key names a vault.
pub fn vault_id_from_key(key: &str) -> Option<&str> {
    key.strip_suffix(VAULT_EXT).filter(|id| !id.is_empty())
}

/// Serialize a vault, preserving every field including `merkle_root`.
pub fn encode(vault: &VaultMetadata) -> Result<Vec<u8>> {
    serde_json::to_vec_pretty(vault)
        .map_err(|e| ChainError::SerializationError(format!("vault {}: {e}", vault.vault_id)))
}

/// Deserialize a vault.  The Merkle root is taken as stored.
pub fn decode(bytes: &[u8]) -> Result<VaultMetadata> {
    serde_json::from_slice(bytes)
        .map_err(|e| ChainError::SerializationError(format!("vault JSON: {e}")))
}

// ---------------------------------------------------------------------------
// Serde helpers for hex-encoded Vec<u8> fields
// ---------------------------------------------------------------------------

pub(crate) fn hex_encode<S>(data: &[u8], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&hex::encode(data))
}

pub(crate) fn hex_decode<'de, D>(deserializer: D) -> std::result::Result<Vec<u8>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    hex::decode(&s).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_decode_preserves_everything() {
        let mut vault = VaultMetadata::new("cust-1").unwrap();
        vault
            .add_file_with_note(b"contents", "a.csv", "CSV", Some("q3"))
            .unwrap();
        vault.add_file(b"more", "b.pdf", "PDF").unwrap();

        let bytes = encode(&vault).unwrap();
        let back = decode(&bytes).unwrap();
        assert_eq!(back, vault);
    }

    #[test]
    fn json_uses_persisted_field_names() {
        let mut vault = VaultMetadata::new("cust-1").unwrap();
        vault.add_file(b"x", "x.txt", "").unwrap();

        let value: serde_json::Value = serde_json::from_slice(&encode(&vault).unwrap()).unwrap();
        let file = &value["encrypted_files"][0];
        assert!(file["encrypted_data"].is_string());
        assert_eq!(file["type"], "");
        assert!(file.get("note").is_none());
        assert_eq!(value["key"], hex::encode(&vault.key));
        assert_eq!(value["merkle_root"], vault.merkle_root);
    }

    #[test]
    fn decode_keeps_unverified_root() {
        let mut vault = VaultMetadata::new("cust-1").unwrap();
        vault.add_file(b"x", "x", "").unwrap();
        vault.merkle_root = "00".repeat(32);

        let back = decode(&encode(&vault).unwrap()).unwrap();
        assert_eq!(back.merkle_root, "00".repeat(32));
        assert!(back.verify_merkle_root().is_err());
    }

    #[test]
    fn decode_rejects_bad_hex() {
        let json = br#"{"vault_id":"v","customer_id":"c","key":"zz","nonce":"","encrypted_files":[],"merkle_root":""}"#;
        assert!(matches!(
            decode(json),
            Err(ChainError::SerializationError(_))
        ));
    }

    #[test]
    fn object_key_roundtrip() {
        assert_eq!(object_key("abc"), "abc.json");
        assert_eq!(vault_id_from_key("abc.json"), Some("abc"));
        assert_eq!(vault_id_from_key(".json"), None);
        assert_eq!(vault_id_from_key("chain.toml"), None);
    }
}
