//! # SeedVault
//!
//! The secret-management core of a hierarchical-deterministic Ed25519
//! wallet.
//!
//! ## Architecture
//!
//! Three subsystems, leaves first:
//! - **Mnemonics**: entropy ↔ phrase codec with a SHA-256 checksum over an
//!   injected wordlist.
//! - **Key derivation**: mnemonic → seed → root node → child nodes, with
//!   both private and watch-only (public) derivation paths, a 68-byte
//!   checksummed master-public-key serialization, and extended-key
//!   signing.
//! - **Secret sharing**: threshold splitting of passphrases, mnemonics,
//!   legacy word phrases, and raw private keys into printable pieces.
//!
//! ## Security Model
//!
//! - Private halves and seeds are zeroized on drop and excluded from
//!   `Debug` output.
//! - Field arithmetic on scalar-adjacent material runs fixed loops with
//!   masked selects instead of secret-dependent branches.
//! - Every entropy-consuming operation accepts a caller-supplied CSPRNG;
//!   the convenience wrappers use the operating-system RNG.

#![forbid(unsafe_code)]
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rust_2018_idioms
)]
#![warn(missing_docs)]
#![allow(
    clippy::module_name_repetitions,
    clippy::cast_possible_truncation,
    clippy::cast_lossless
)]

pub mod curve;
pub mod field;
pub mod hd;
pub mod mnemonic;
pub mod shamir;

pub use curve::ed25519_to_curve25519;
pub use field::FieldElement;
pub use hd::{
    derive_from_mnemonic, mnemonic_to_seed, DerivationError, DerivationPath, HdNode,
    MasterPublicKey, Seed, XSignature,
};
pub use mnemonic::{
    entropy_to_mnemonic, generate_mnemonic, is_valid_mnemonic, mnemonic_to_entropy,
    MnemonicError, Wordlist,
};
pub use shamir::{
    combine_secret, split_phrase, split_private_key, SecretCodecConfig, SecretPiece,
    SecretVersion, ShamirError,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
