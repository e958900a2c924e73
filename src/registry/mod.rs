//! Collaborators that hold published profiles.
//!
//! A profile is published in two steps: the rendered document is put into
//! a content-addressed store, and the returned identifier is recorded
//! against the owner's account in a registry.  Reading reverses this.
//! Only the narrow interfaces live here; the in-memory implementations
//! back the tests and local experiments.

use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;

use sha2::{Digest, Sha256};

use crate::crypto::{codec, KeyPair};
use crate::errors::{ProfileCryptError, Result};
use crate::profile::{self, Document};

/// Identifier of a blob in a content store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentId(pub String);

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A content-addressed blob store.
pub trait ContentStore {
    fn put(&self, bytes: &[u8]) -> Result<ContentId>;
    fn get(&self, id: &ContentId) -> Result<Vec<u8>>;
}

/// Maps an account to the content id of its current profile.
pub trait Registry {
    fn resolve(&self, account: &str) -> Result<ContentId>;
    fn update(&self, account: &str, id: ContentId) -> Result<()>;
}

/// In-memory content store keyed by the hex SHA-256 of the content.
#[derive(Debug, Default)]
pub struct MemoryContentStore {
    blobs: RwLock<HashMap<ContentId, Vec<u8>>>,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ContentStore for MemoryContentStore {
    fn put(&self, bytes: &[u8]) -> Result<ContentId> {
        let id = ContentId(codec::bytes_to_hex(&Sha256::digest(bytes)));
        self.blobs
            .write()
            .map_err(|_| ProfileCryptError::CommandFailed("content store lock poisoned".into()))?
            .insert(id.clone(), bytes.to_vec());
        Ok(id)
    }

    fn get(&self, id: &ContentId) -> Result<Vec<u8>> {
        self.blobs
            .read()
            .map_err(|_| ProfileCryptError::CommandFailed("content store lock poisoned".into()))?
            .get(id)
            .cloned()
            .ok_or_else(|| ProfileCryptError::ContentNotFound(id.to_string()))
    }
}

/// In-memory account registry.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    entries: RwLock<HashMap<String, ContentId>>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Registry for MemoryRegistry {
    fn resolve(&self, account: &str) -> Result<ContentId> {
        self.entries
            .read()
            .map_err(|_| ProfileCryptError::CommandFailed("registry lock poisoned".into()))?
            .get(account)
            .cloned()
            .ok_or_else(|| ProfileCryptError::AccountNotFound(account.to_string()))
    }

    fn update(&self, account: &str, id: ContentId) -> Result<()> {
        self.entries
            .write()
            .map_err(|_| ProfileCryptError::CommandFailed("registry lock poisoned".into()))?
            .insert(account.to_string(), id);
        Ok(())
    }
}

/// Publish a profile for `account`.
///
/// The private key is stripped before anything leaves the process.
pub fn publish(
    store: &dyn ContentStore,
    registry: &dyn Registry,
    account: &str,
    document: &Document,
) -> Result<ContentId> {
    let public = profile::strip_private_key(document);
    let text = profile::render_document(&public)?;
    let id = store.put(text.as_bytes())?;
    registry.update(account, id.clone())?;
    tracing::debug!(%account, content_id = %id, "published profile");
    Ok(id)
}

/// Fetch the current profile for `account`.
///
/// With `own_keys`, every field addressed to that key pair is decrypted;
/// without, the document is returned as stored.
pub fn query(
    store: &dyn ContentStore,
    registry: &dyn Registry,
    account: &str,
    own_keys: Option<&KeyPair>,
) -> Result<Document> {
    let id = registry.resolve(account)?;
    let bytes = store.get(&id)?;
    let text = String::from_utf8(bytes).map_err(|_| {
        ProfileCryptError::InvalidDocument(format!("content {id} is not UTF-8 text"))
    })?;
    let document = profile::parse_document(&text)?;

    match own_keys {
        Some(keys) => {
            profile::selectively_decrypt(&document, &keys.public_base64(), &keys.private_base64())
        }
        None => Ok(document),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_id_is_sha256_of_bytes() {
        let store = MemoryContentStore::new();
        let id = store.put(b"abc").unwrap();
        assert_eq!(
            id.0,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(store.get(&id).unwrap(), b"abc");
    }

    #[test]
    fn missing_content_and_account() {
        let store = MemoryContentStore::new();
        let registry = MemoryRegistry::new();
        assert!(matches!(
            store.get(&ContentId("nope".into())),
            Err(ProfileCryptError::ContentNotFound(_))
        ));
        assert!(matches!(
            registry.resolve("0xabc"),
            Err(ProfileCryptError::AccountNotFound(_))
        ));
    }

    #[test]
    fn registry_update_replaces_previous_id() {
        let registry = MemoryRegistry::new();
        registry.update("0xabc", ContentId("one".into())).unwrap();
        registry.update("0xabc", ContentId("two".into())).unwrap();
        assert_eq!(registry.resolve("0xabc").unwrap(), ContentId("two".into()));
    }
}
