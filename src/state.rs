use crate::error::{Error, Result};
use crate::path::KeyPath;
use crate::search::search;
use crate::tree::{resolve_mut, value_type};
use crate::types::{OwnedMatch, Query};
use parking_lot::RwLock;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

/// A swappable document shared between threads.
///
/// Readers take an [`Arc`] snapshot and search it without holding the lock.
/// Writers go through `Arc::make_mut`, so a snapshot never changes under a
/// running query.
#[derive(Default)]
pub struct DocumentStore {
    doc: RwLock<Option<Arc<Value>>>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(doc: Value) -> Self {
        Self {
            doc: RwLock::new(Some(Arc::new(doc))),
        }
    }

    pub fn load(&self, doc: Value) {
        info!(kind = value_type(&doc), "document loaded");
        *self.doc.write() = Some(Arc::new(doc));
    }

    pub fn clear(&self) {
        *self.doc.write() = None;
    }

    pub fn is_loaded(&self) -> bool {
        self.doc.read().is_some()
    }

    pub fn snapshot(&self) -> Result<Arc<Value>> {
        let guard = self.doc.read();
        let Some(root) = &*guard else {
            return Err(Error::NoDocument);
        };
        Ok(root.clone())
    }

    /// Search a snapshot of the current document.
    pub fn search(&self, query: &Query, strict: bool) -> Result<Vec<OwnedMatch>> {
        let root = self.snapshot()?;
        Ok(search(&root, query, strict)
            .iter()
            .map(|m| m.to_owned_match())
            .collect())
    }

    /// Replace the node at `path`.
    ///
    /// Containers may only be replaced by a container of the same kind and
    /// scalars only by scalars. The root may be replaced like any other node.
    pub fn replace_at(&self, path: &KeyPath, new_value: Value) -> Result<()> {
        let mut guard = self.doc.write();
        let Some(root_arc) = &mut *guard else {
            return Err(Error::NoDocument);
        };
        let root_mut: &mut Value = Arc::make_mut(root_arc);

        let current = resolve_mut(root_mut, path)
            .ok_or_else(|| Error::PathNotFound(path.to_string()))?;

        let same_kind = match (&*current, &new_value) {
            (Value::Object(_), Value::Object(_)) | (Value::Array(_), Value::Array(_)) => true,
            (Value::Object(_) | Value::Array(_), _) | (_, Value::Object(_) | Value::Array(_)) => false,
            _ => true,
        };
        if !same_kind {
            return Err(Error::KindMismatch {
                expected: value_type(current),
                found: value_type(&new_value),
            });
        }

        *current = new_value;
        Ok(())
    }
}
