//! Native routine registry
//!
//! Maps (routine name, signature descriptor) to a native implementation.
//! Descriptors are opaque: two keys match only if both strings are equal.
//! Re-registering a key replaces the previous implementation.

use std::collections::HashMap;

use brisk_plugin::Signature;
use log::{debug, trace};
use thiserror::Error;

use crate::value::BoxedValue;

/// Calling convention shared by every registered routine.
pub type NativeFn = fn(&[BoxedValue]) -> BoxedValue;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoutineKey {
    pub name: String,
    pub signature: Signature,
}

#[derive(Clone)]
pub struct RegistryEntry {
    pub name: String,
    pub signature: Signature,
    pub implementation: NativeFn,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("no routine `{name}` with signature `{signature}`")]
    UnknownRoutine { name: String, signature: String },
}

#[derive(Default)]
pub struct NativeRegistry {
    entries: HashMap<RoutineKey, NativeFn>,
}

impl NativeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the routine for (`name`, `signature`).
    pub fn register(
        &mut self,
        name: impl Into<String>,
        signature: impl Into<Signature>,
        implementation: NativeFn,
    ) {
        let key = RoutineKey {
            name: name.into(),
            signature: signature.into(),
        };

        trace!("register {} {}", key.name, key.signature);
        if self.entries.insert(key.clone(), implementation).is_some() {
            debug!(
                "routine {} {} re-registered; last registration wins",
                key.name, key.signature
            );
        }
    }

    pub fn lookup(&self, name: &str, signature: &str) -> Option<NativeFn> {
        let key = RoutineKey {
            name: name.to_string(),
            signature: Signature::owned(signature),
        };
        self.entries.get(&key).copied()
    }

    pub fn contains(&self, name: &str, signature: &str) -> bool {
        self.lookup(name, signature).is_some()
    }

    /// Resolve and invoke a routine.
    pub fn call(
        &self,
        name: &str,
        signature: &str,
        args: &[BoxedValue],
    ) -> Result<BoxedValue, RegistryError> {
        let implementation =
            self.lookup(name, signature)
                .ok_or_else(|| RegistryError::UnknownRoutine {
                    name: name.to_string(),
                    signature: signature.to_string(),
                })?;
        Ok(implementation(args))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries, sorted by name then signature.
    pub fn entries(&self) -> Vec<RegistryEntry> {
        let mut entries: Vec<RegistryEntry> = self
            .entries
            .iter()
            .map(|(key, implementation)| RegistryEntry {
                name: key.name.clone(),
                signature: key.signature.clone(),
                implementation: *implementation,
            })
            .collect();
        entries.sort_by(|a, b| (&a.name, &a.signature).cmp(&(&b.name, &b.signature)));
        entries
    }
}
