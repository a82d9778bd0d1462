//! PIN verifier storage
//!
//! One record under [`PIN_KEY`] holds the verifier. The PIN itself is never
//! written. There is no salt in the default scheme, no attempt counting and
//! no lockout; callers that need those must add them around this type.

use tracing::{debug, warn};

use crate::error::{Result, StoreError};
use crate::hasher::{HashScheme, LegacyMd5Hasher, PinHasher};
use crate::kv::KeyValueStore;

/// Key of the verifier record
pub const PIN_KEY: &str = "PinKey";

/// Sets, confirms and clears the stored PIN verifier
pub struct PinStorage<S> {
    store: S,
    hasher: Box<dyn PinHasher>,
}

impl<S: std::fmt::Debug> std::fmt::Debug for PinStorage<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PinStorage")
            .field("store", &self.store)
            .field("scheme", &self.hasher.scheme())
            .finish()
    }
}

fn non_empty<'a>(candidate: Option<&'a str>) -> Result<&'a str> {
    match candidate {
        Some(pin) if !pin.is_empty() => Ok(pin),
        _ => Err(StoreError::InvalidInput),
    }
}

impl<S: KeyValueStore> PinStorage<S> {
    /// Storage using the legacy MD5 scheme
    pub fn new(store: S) -> Self {
        Self::with_hasher(store, LegacyMd5Hasher)
    }

    pub fn with_scheme(store: S, scheme: HashScheme) -> Self {
        Self {
            store,
            hasher: scheme.hasher(),
        }
    }

    pub fn with_hasher<H>(store: S, hasher: H) -> Self
    where
        H: PinHasher + 'static,
    {
        Self {
            store,
            hasher: Box::new(hasher),
        }
    }

    pub fn scheme(&self) -> HashScheme {
        self.hasher.scheme()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// Hash and persist `candidate`
    pub fn try_set_pin<'a>(&mut self, candidate: impl Into<Option<&'a str>>) -> Result<()> {
        let pin = non_empty(candidate.into())?;
        let verifier = self.hasher.hash(pin)?;

        if verifier.is_empty() {
            return Err(StoreError::DigestUnavailable("empty verifier".to_string()));
        }

        self.store.put(PIN_KEY, &verifier)?;
        debug!("PIN verifier stored ({:?})", self.hasher.scheme());
        Ok(())
    }

    /// Whether `candidate` matches the stored verifier
    ///
    /// A wrong PIN is `Ok(false)`; missing input or a missing verifier is
    /// an error.
    pub fn try_confirm_pin<'a>(&self, candidate: impl Into<Option<&'a str>>) -> Result<bool> {
        let pin = non_empty(candidate.into())?;
        let stored = self.stored_verifier()?.ok_or(StoreError::NoStoredVerifier)?;

        self.hasher.verify(pin, &stored)
    }

    /// Hash and persist `candidate`; false on any failure
    pub fn set_pin<'a>(&mut self, candidate: impl Into<Option<&'a str>>) -> bool {
        match self.try_set_pin(candidate) {
            Ok(()) => true,
            Err(StoreError::InvalidInput) => false,
            Err(e) => {
                warn!("Failed to set PIN: {}", e);
                false
            }
        }
    }

    /// True only when `candidate` matches the stored verifier
    pub fn confirm_pin<'a>(&self, candidate: impl Into<Option<&'a str>>) -> bool {
        match self.try_confirm_pin(candidate) {
            Ok(matched) => matched,
            Err(StoreError::InvalidInput | StoreError::NoStoredVerifier) => false,
            Err(e) => {
                warn!("Failed to confirm PIN: {}", e);
                false
            }
        }
    }

    /// A non-empty verifier is stored
    pub fn has_pin(&self) -> bool {
        match self.stored_verifier() {
            Ok(stored) => stored.is_some(),
            Err(e) => {
                warn!("Failed to read PIN verifier: {}", e);
                false
            }
        }
    }

    /// Remove the stored verifier
    pub fn clear_pin(&mut self) -> bool {
        match self.store.remove(PIN_KEY) {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to clear PIN: {}", e);
                false
            }
        }
    }

    fn stored_verifier(&self) -> Result<Option<String>> {
        Ok(self.store.get(PIN_KEY)?.filter(|v| !v.is_empty()))
    }
}
