//! Piece wire format and the split/combine entry points.
//!
//! Wire form: `version:splitId:totalPieces:minPieces:modPrime:x:shareHex`.
//! The prime field records what the caller declared — `0` when the prime
//! was auto-selected — so combining re-resolves an auto prime from the
//! largest share value it sees.

use std::fmt;
use std::str::FromStr;

use num_bigint::BigUint;
use num_traits::Zero;
use rand::{CryptoRng, RngCore};
use tracing::debug;

use super::poly::{combine, split, Share};
use super::prime::mod_prime_for_secret;
use super::secret::{SecretCodecConfig, SecretVersion};
use super::{ShamirError, ShamirResult};

/// One serialized share plus the metadata shared by its whole split.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SecretPiece {
    version: SecretVersion,
    split_id: u32,
    total_pieces: u32,
    min_pieces: u32,
    mod_prime: BigUint,
    x: u32,
    share: BigUint,
}

impl SecretPiece {
    /// The secret encoding this piece belongs to.
    #[must_use]
    pub const fn version(&self) -> SecretVersion {
        self.version
    }

    /// Random identifier shared by all pieces of one split.
    #[must_use]
    pub const fn split_id(&self) -> u32 {
        self.split_id
    }

    /// Total pieces produced by the split.
    #[must_use]
    pub const fn total_pieces(&self) -> u32 {
        self.total_pieces
    }

    /// Pieces required to reconstruct.
    #[must_use]
    pub const fn min_pieces(&self) -> u32 {
        self.min_pieces
    }

    /// The declared field prime; zero means it was auto-selected.
    #[must_use]
    pub const fn mod_prime(&self) -> &BigUint {
        &self.mod_prime
    }

    /// The evaluation point.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// The share value.
    #[must_use]
    pub const fn share(&self) -> &BigUint {
        &self.share
    }
}

impl fmt::Display for SecretPiece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}:{}:{}:{}",
            self.version.tag(),
            self.split_id,
            self.total_pieces,
            self.min_pieces,
            self.mod_prime.to_str_radix(10),
            self.x,
            self.share.to_str_radix(16),
        )
    }
}

impl FromStr for SecretPiece {
    type Err = ShamirError;

    fn from_str(s: &str) -> ShamirResult<Self> {
        let fields: Vec<&str> = s.split(':').collect();
        if fields.len() != 7 {
            return Err(ShamirError::WrongPieceFormat(format!(
                "expected 7 colon-separated fields, got {}",
                fields.len()
            )));
        }

        let uint = |field: &str, name: &str| -> ShamirResult<u32> {
            field
                .parse()
                .map_err(|_| ShamirError::WrongPieceFormat(format!("{name} is not an integer")))
        };

        let version = SecretVersion::from_tag(uint(fields[0], "version")?)?;
        let split_id = uint(fields[1], "split id")?;
        let total_pieces = uint(fields[2], "total piece count")?;
        let min_pieces = uint(fields[3], "minimum piece count")?;
        let mod_prime = BigUint::parse_bytes(fields[4].as_bytes(), 10).ok_or_else(|| {
            ShamirError::WrongPieceFormat("prime is not a decimal integer".into())
        })?;
        let x = uint(fields[5], "share index")?;
        let share = BigUint::parse_bytes(fields[6].as_bytes(), 16).ok_or_else(|| {
            ShamirError::WrongPieceFormat("share is not a hex integer".into())
        })?;

        Ok(Self {
            version,
            split_id,
            total_pieces,
            min_pieces,
            mod_prime,
            x,
            share,
        })
    }
}

fn encode_secret_integer_into_pieces<R: RngCore + CryptoRng>(
    rng: &mut R,
    secret: &BigUint,
    version: SecretVersion,
    total: u32,
    min: u32,
    declared_prime: &BigUint,
) -> ShamirResult<Vec<String>> {
    if min < 2 || total < min {
        return Err(ShamirError::IllegalPieceCount { min, total });
    }

    let prime: &BigUint = if declared_prime.is_zero() {
        mod_prime_for_secret(secret)?
    } else {
        if secret >= declared_prime {
            return Err(ShamirError::SecretLargerThanPrime);
        }
        declared_prime
    };

    let shares = split(secret, min, total, prime, rng)?;
    let split_id = rng.next_u32();

    Ok(shares
        .into_iter()
        .map(|share| {
            SecretPiece {
                version,
                split_id,
                total_pieces: total,
                min_pieces: min,
                mod_prime: declared_prime.clone(),
                x: share.x,
                share: share.value,
            }
            .to_string()
        })
        .collect())
}

/// Split a phrase into `total` pieces, `min` of which reconstruct it.
///
/// The version is auto-detected: a valid mnemonic, then a legacy 12-word
/// phrase, then free text. A zero `declared_prime` selects the smallest
/// fitting field automatically.
///
/// # Errors
/// Count, zero-secret, and prime-fit errors as described in
/// [`ShamirError`].
pub fn split_phrase_with<R: RngCore + CryptoRng>(
    rng: &mut R,
    phrase: &str,
    total: u32,
    min: u32,
    declared_prime: &BigUint,
    config: &SecretCodecConfig,
) -> ShamirResult<Vec<String>> {
    let version = SecretVersion::detect(phrase, config);
    let secret = version.secret_to_number(phrase, config)?;
    encode_secret_integer_into_pieces(rng, &secret, version, total, min, declared_prime)
}

/// [`split_phrase_with`] seeded from the operating-system CSPRNG.
///
/// # Errors
/// Same as [`split_phrase_with`].
pub fn split_phrase(
    phrase: &str,
    total: u32,
    min: u32,
    declared_prime: &BigUint,
    config: &SecretCodecConfig,
) -> ShamirResult<Vec<String>> {
    split_phrase_with(&mut rand::rngs::OsRng, phrase, total, min, declared_prime, config)
}

/// Split a raw 32-byte private key; the version is forced, never detected.
///
/// # Errors
/// Same as [`split_phrase_with`].
pub fn split_private_key_with<R: RngCore + CryptoRng>(
    rng: &mut R,
    private_key: &[u8; 32],
    total: u32,
    min: u32,
    declared_prime: &BigUint,
) -> ShamirResult<Vec<String>> {
    let secret = BigUint::from_bytes_be(private_key);
    encode_secret_integer_into_pieces(
        rng,
        &secret,
        SecretVersion::PrivateKey,
        total,
        min,
        declared_prime,
    )
}

/// [`split_private_key_with`] seeded from the operating-system CSPRNG.
///
/// # Errors
/// Same as [`split_phrase_with`].
pub fn split_private_key(
    private_key: &[u8; 32],
    total: u32,
    min: u32,
    declared_prime: &BigUint,
) -> ShamirResult<Vec<String>> {
    split_private_key_with(&mut rand::rngs::OsRng, private_key, total, min, declared_prime)
}

/// Reconstruct a secret from serialized pieces.
///
/// All pieces must agree on version, split id, counts, and prime; at least
/// `min` pieces are required. Beyond those checks the reconstruction is
/// pure interpolation — a consistent-looking but wrong subset (for
/// example, a duplicated piece) yields a wrong secret, not an error.
///
/// # Errors
/// Parse errors, the five field-mismatch errors, and
/// [`ShamirError::NotEnoughPieces`].
pub fn combine_secret(pieces: &[String], config: &SecretCodecConfig) -> ShamirResult<String> {
    let Some(first) = pieces.first() else {
        return Err(ShamirError::NotEnoughPieces { needed: 2, got: 0 });
    };
    let first: SecretPiece = first.parse()?;

    let mut parsed = Vec::with_capacity(pieces.len());
    parsed.push(first);
    for piece in &pieces[1..] {
        let piece: SecretPiece = piece.parse()?;
        let reference = &parsed[0];
        if piece.version != reference.version {
            return Err(ShamirError::VersionDiffersBetweenPieces);
        }
        if piece.split_id != reference.split_id {
            return Err(ShamirError::IdDiffersBetweenPieces);
        }
        if piece.total_pieces != reference.total_pieces {
            return Err(ShamirError::TotalDiffersBetweenPieces);
        }
        if piece.min_pieces != reference.min_pieces {
            return Err(ShamirError::MinDiffersBetweenPieces);
        }
        if piece.mod_prime != reference.mod_prime {
            return Err(ShamirError::PrimeDiffersBetweenPieces);
        }
        parsed.push(piece);
    }

    if parsed.len() < parsed[0].min_pieces as usize {
        return Err(ShamirError::NotEnoughPieces {
            needed: parsed[0].min_pieces,
            got: parsed.len(),
        });
    }

    let declared = parsed[0].mod_prime.clone();
    let prime: &BigUint = if declared.is_zero() {
        let largest_share = parsed
            .iter()
            .map(|p| &p.share)
            .max()
            .expect("at least one piece is present");
        let resolved = mod_prime_for_secret(largest_share)?;
        debug!(bits = resolved.bits(), "auto-resolved share field prime");
        resolved
    } else {
        &declared
    };

    let shares: Vec<Share> = parsed
        .iter()
        .map(|p| Share {
            x: p.x,
            value: p.share.clone(),
        })
        .collect();
    let secret = combine(&shares, prime);

    parsed[0].version.number_to_secret(&secret, config)
}

/// Parse and cross-check all pieces, then report whether they carry a
/// private key.
///
/// # Errors
/// Parse errors, and [`ShamirError::VersionDiffersBetweenPieces`] if the
/// pieces disagree.
pub fn is_private_key_secret(pieces: &[String]) -> ShamirResult<bool> {
    let mut version = None;
    for piece in pieces {
        let piece: SecretPiece = piece.parse()?;
        match version {
            None => version = Some(piece.version),
            Some(v) if v != piece.version => {
                return Err(ShamirError::VersionDiffersBetweenPieces)
            }
            Some(_) => {}
        }
    }
    Ok(version == Some(SecretVersion::PrivateKey))
}
