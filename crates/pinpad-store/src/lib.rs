//! Pinpad Store - PIN verifier persistence
//!
//! Hashes a submitted PIN, keeps the verifier in a key-value store, and
//! compares later submissions against it. Every public set/confirm returns a
//! plain `bool`; the `try_` variants expose the underlying [`StoreError`].
//!
//! # Security Notice
//! The default scheme is unsalted MD5, kept for compatibility with existing
//! stored verifiers. It offers little protection for a short numeric PIN.
//! New deployments should select [`HashScheme::Argon2id`].

pub mod config;
pub mod error;
pub mod hasher;
pub mod kv;
pub mod pin;

pub use config::StoreConfig;
pub use error::{Result, StoreError};
pub use hasher::{md5_hex, Argon2Hasher, HashScheme, LegacyMd5Hasher, PinHasher};
pub use kv::{JsonFileStore, KeyValueStore, MemoryStore};
pub use pin::{PinStorage, PIN_KEY};
