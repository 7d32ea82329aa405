//! Threshold secret sharing for paper backups.
//!
//! A secret — a passphrase, a legacy 12-word phrase, a mnemonic, or a raw
//! private key — is mapped to a big integer, split into `n` shares of
//! which any `k` reconstruct it, and serialized as printable piece
//! strings. Combining is a pure function of any large-enough subset whose
//! metadata matches.
//!
//! Known weakness, kept deliberately: random polynomial coefficients are
//! reduced modulo the secret rather than the field prime, which lowers
//! their entropy below the field size. Correcting it would change every
//! emitted share and orphan existing paper backups.

mod piece;
mod poly;
mod prime;
mod secret;

pub use piece::{
    combine_secret, is_private_key_secret, split_phrase, split_phrase_with, split_private_key,
    split_private_key_with, SecretPiece,
};
pub use poly::{combine, split, Share};
pub use prime::{mod_prime_for_secret, PRIME_192, PRIME_384, PRIME_LARGE};
pub use secret::{SecretCodecConfig, SecretVersion};

use thiserror::Error;

use crate::mnemonic::MnemonicError;

/// Secret-sharing errors
#[derive(Debug, Error)]
pub enum ShamirError {
    /// A zero secret cannot be shared
    #[error("secret must not be zero")]
    SecretZero,
    /// The secret exceeds the largest supported field
    #[error("secret too long for the largest supported prime")]
    SecretTooLong,
    /// A declared prime does not exceed the secret
    #[error("secret is not smaller than the declared prime")]
    SecretLargerThanPrime,
    /// Piece counts outside 2 <= min <= total
    #[error("illegal piece count: need {min} of {total}")]
    IllegalPieceCount {
        /// Requested reconstruction threshold
        min: u32,
        /// Requested total number of pieces
        total: u32,
    },
    /// A piece string does not match the wire format
    #[error("malformed secret piece: {0}")]
    WrongPieceFormat(String),
    /// Fewer pieces than the recorded threshold
    #[error("{got} pieces supplied but {needed} required")]
    NotEnoughPieces {
        /// Threshold recorded in the pieces
        needed: u32,
        /// Number of pieces supplied
        got: usize,
    },
    /// An unknown version tag
    #[error("unsupported piece version: {0}")]
    UnsupportedPieceVersion(u32),
    /// Pieces disagree on the version tag
    #[error("version differs between pieces")]
    VersionDiffersBetweenPieces,
    /// Pieces disagree on the split id
    #[error("split id differs between pieces")]
    IdDiffersBetweenPieces,
    /// Pieces disagree on the total count
    #[error("total piece count differs between pieces")]
    TotalDiffersBetweenPieces,
    /// Pieces disagree on the threshold
    #[error("minimum piece count differs between pieces")]
    MinDiffersBetweenPieces,
    /// Pieces disagree on the field prime
    #[error("prime differs between pieces")]
    PrimeDiffersBetweenPieces,
    /// A reconstructed integer does not decode as its version's secret
    #[error("invalid secret: {0}")]
    InvalidSecret(String),
    /// Mnemonic encoding or decoding failed
    #[error(transparent)]
    Mnemonic(#[from] MnemonicError),
}

/// Result type for secret-sharing operations
pub type ShamirResult<T> = Result<T, ShamirError>;
