//! Hierarchical-deterministic key derivation over Ed25519.
//!
//! A mnemonic stretches into a 64-byte seed, the seed into a root node,
//! and the root into a tree of child nodes addressed by slash-separated
//! paths. Nodes carry an extended private key (two 32-byte halves), a
//! chain code, the compressed Edwards public key used for signing, and its
//! Montgomery twin used for encryption. Nodes built from a serialized
//! master public key are public-only and support soft derivation.

mod derive;
mod master_key;
mod node;
mod path;
mod seed;
mod signing;

pub use derive::derive_child_public;
pub use master_key::{
    compute_serialized_master_public_key, is_valid_serialized_master_public_key,
    SERIALIZED_MASTER_PUBLIC_KEY_LEN,
};
pub use node::{derive_from_mnemonic, ExtendedPrivateKey, HdNode, MasterPublicKey};
pub use path::DerivationPath;
pub use seed::{mnemonic_to_seed, Seed};
pub use signing::{verify, XSignature};

use thiserror::Error;

use crate::mnemonic::MnemonicError;

/// Key-derivation errors
#[derive(Debug, Error)]
pub enum DerivationError {
    /// The node carries no private key material
    #[error("node not specified or public-only")]
    NodeNotSpecified,
    /// A path segment is not a usable 32-bit index
    #[error("path component out of range: {0}")]
    PathComponentOutOfRange(String),
    /// A derived scalar collapsed to the identity point
    #[error("derived key maps to the identity point")]
    IdentityPointDerived,
    /// Public derivation only covers non-hardened indices
    #[error("public derivation index out of range: {0}")]
    PublicDerivationIndexOutOfRange(u32),
    /// A 68-byte master-public-key blob failed validation
    #[error("invalid serialized master public key")]
    InvalidSerializedMasterPublicKey,
    /// A compressed public key does not decode to a curve point
    #[error("invalid public key point")]
    InvalidPublicPoint,
    /// Root-node rejection sampling exhausted its retry budget
    #[error("root key sampling exceeded {0} retries")]
    RetryLimitExceeded(usize),
    /// Signature verification failed
    #[error("invalid signature")]
    InvalidSignature,
    /// Mnemonic decoding failed
    #[error(transparent)]
    Mnemonic(#[from] MnemonicError),
}

/// Result type for key-derivation operations
pub type DerivationResult<T> = Result<T, DerivationError>;
