//! HD nodes: the root derivation and the node type itself.

use std::fmt;

use curve25519_dalek::edwards::{CompressedEdwardsY, EdwardsPoint};
use curve25519_dalek::scalar::Scalar;
use curve25519_dalek::traits::IsIdentity;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Sha256, Sha512};
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use super::master_key::is_valid_serialized_master_public_key;
use super::path::DerivationPath;
use super::seed::{mnemonic_to_seed, Seed};
use super::{DerivationError, DerivationResult};
use crate::curve::montgomery_from_edwards;

/// HMAC key for root-node derivation.
pub(crate) const ROOT_HMAC_KEY: &[u8] = b"ed25519 seed";

/// Retry budget for root-key rejection sampling. Each retry fires with
/// probability 1/2, so reaching even a few dozen is astronomically
/// unlikely; the bound exists so the loop provably terminates.
const MAX_ROOT_RETRIES: usize = 1024;

/// HMAC-SHA512 over concatenated message parts. The output is wiped when
/// the guard drops since it usually carries key material.
pub(crate) fn hmac_sha512(key: &[u8], parts: &[&[u8]]) -> Zeroizing<[u8; 64]> {
    let mut mac =
        Hmac::<Sha512>::new_from_slice(key).expect("hmac-sha512 accepts any key length");
    for part in parts {
        mac.update(part);
    }
    let mut out = Zeroizing::new([0u8; 64]);
    out.copy_from_slice(&mac.finalize().into_bytes());
    out
}

fn hmac_sha256(key: &[u8], parts: &[&[u8]]) -> [u8; 32] {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(key).expect("hmac-sha256 accepts any key length");
    for part in parts {
        mac.update(part);
    }
    let mut out = [0u8; 32];
    out.copy_from_slice(&mac.finalize().into_bytes());
    out
}

/// Clamp a scalar half: clear the low three bits, set bit 254, clear bit 255.
pub(crate) fn clamp(scalar: &mut [u8; 32]) {
    scalar[0] &= 0xf8;
    scalar[31] &= 0x7f;
    scalar[31] |= 0x40;
}

/// The two 32-byte halves of an extended Ed25519 private key: the signing
/// scalar and the nonce prefix. Wiped on drop.
///
/// SECURITY: no `Debug`, no serde — this type never leaves the process.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct ExtendedPrivateKey {
    left: [u8; 32],
    right: [u8; 32],
}

impl ExtendedPrivateKey {
    pub(crate) const fn new(left: [u8; 32], right: [u8; 32]) -> Self {
        Self { left, right }
    }

    /// The clamped signing scalar.
    #[must_use]
    pub const fn left(&self) -> &[u8; 32] {
        &self.left
    }

    /// The nonce-prefix half.
    #[must_use]
    pub const fn right(&self) -> &[u8; 32] {
        &self.right
    }
}

/// A 32-byte compressed Edwards public key.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct MasterPublicKey([u8; 32]);

impl MasterPublicKey {
    /// Create from raw bytes, validating the point decodes.
    ///
    /// # Errors
    /// [`DerivationError::InvalidPublicPoint`] if the encoding is not a
    /// curve point.
    pub fn from_bytes(bytes: [u8; 32]) -> DerivationResult<Self> {
        CompressedEdwardsY(bytes)
            .decompress()
            .ok_or(DerivationError::InvalidPublicPoint)?;
        Ok(Self(bytes))
    }

    pub(crate) const fn from_point_encoding(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// The compressed encoding.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Hex form of the compressed encoding.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from a 64-character hex string.
    ///
    /// # Errors
    /// [`DerivationError::InvalidPublicPoint`] for bad hex, length, or a
    /// non-point encoding.
    pub fn from_hex(s: &str) -> DerivationResult<Self> {
        let bytes = hex::decode(s).map_err(|_| DerivationError::InvalidPublicPoint)?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| DerivationError::InvalidPublicPoint)?;
        Self::from_bytes(arr)
    }

    pub(crate) fn decompress(&self) -> DerivationResult<EdwardsPoint> {
        CompressedEdwardsY(self.0)
            .decompress()
            .ok_or(DerivationError::InvalidPublicPoint)
    }
}

impl fmt::Debug for MasterPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MasterPublicKey({}..)", &self.to_hex()[..16])
    }
}

impl fmt::Display for MasterPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for MasterPublicKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for MasterPublicKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// A node in the HD key tree.
///
/// Nodes derived locally carry private material; nodes built from a
/// serialized master public key are public-only and can still derive
/// non-hardened children and their encryption keys.
pub struct HdNode {
    pub(crate) private: Option<ExtendedPrivateKey>,
    pub(crate) chain_code: [u8; 32],
    pub(crate) master_public_key: MasterPublicKey,
    pub(crate) public_key: [u8; 32],
}

impl HdNode {
    /// Derive the root node from a seed.
    ///
    /// The chain code is HMAC-SHA256 over `0x01 ‖ seed`; the scalar halves
    /// come from HMAC-SHA512 over the seed, re-hashed while bit 0x20 of
    /// the last scalar byte is set (rejection sampling), then clamped.
    ///
    /// # Errors
    /// [`DerivationError::RetryLimitExceeded`] if sampling never clears
    /// the rejected bit within the retry budget (not expected to occur);
    /// [`DerivationError::IdentityPointDerived`] if the scalar is zero.
    pub fn from_seed(seed: &Seed) -> DerivationResult<Self> {
        let chain_code = hmac_sha256(ROOT_HMAC_KEY, &[&[0x01], seed.as_bytes()]);

        let mut commitment = hmac_sha512(ROOT_HMAC_KEY, &[seed.as_bytes()]);
        let mut retries = 0usize;
        while commitment[31] & 0x20 != 0 {
            if retries >= MAX_ROOT_RETRIES {
                return Err(DerivationError::RetryLimitExceeded(MAX_ROOT_RETRIES));
            }
            retries += 1;
            debug!(retries, "root key candidate rejected, resampling");
            commitment = hmac_sha512(ROOT_HMAC_KEY, &[commitment.as_slice()]);
        }

        let mut left = [0u8; 32];
        let mut right = [0u8; 32];
        left.copy_from_slice(&commitment[..32]);
        right.copy_from_slice(&commitment[32..]);
        clamp(&mut left);

        Self::from_private_parts(ExtendedPrivateKey::new(left, right), chain_code)
    }

    pub(crate) fn from_private_parts(
        private: ExtendedPrivateKey,
        chain_code: [u8; 32],
    ) -> DerivationResult<Self> {
        let scalar = Scalar::from_bytes_mod_order(*private.left());
        let point = EdwardsPoint::mul_base(&scalar);
        if point.is_identity() {
            return Err(DerivationError::IdentityPointDerived);
        }
        let master_public_key = MasterPublicKey::from_point_encoding(point.compress().to_bytes());
        let public_key = montgomery_from_edwards(&point);
        Ok(Self {
            private: Some(private),
            chain_code,
            master_public_key,
            public_key,
        })
    }

    pub(crate) fn from_public_point(
        point: &EdwardsPoint,
        chain_code: [u8; 32],
    ) -> Self {
        Self {
            private: None,
            chain_code,
            master_public_key: MasterPublicKey::from_point_encoding(point.compress().to_bytes()),
            public_key: montgomery_from_edwards(point),
        }
    }

    /// Build a public-only node from a 68-byte serialized master public key.
    ///
    /// # Errors
    /// [`DerivationError::InvalidSerializedMasterPublicKey`] on length or
    /// checksum failure, [`DerivationError::InvalidPublicPoint`] if the
    /// embedded key is not a curve point.
    pub fn from_serialized_master_public_key(blob: &[u8]) -> DerivationResult<Self> {
        if !is_valid_serialized_master_public_key(blob) {
            return Err(DerivationError::InvalidSerializedMasterPublicKey);
        }
        let mut key = [0u8; 32];
        let mut chain_code = [0u8; 32];
        key.copy_from_slice(&blob[..32]);
        chain_code.copy_from_slice(&blob[32..64]);

        let master = MasterPublicKey::from_bytes(key)?;
        let point = master.decompress()?;
        Ok(Self::from_public_point(&point, chain_code))
    }

    /// The private halves, absent on public-only nodes.
    #[must_use]
    pub const fn extended_private_key(&self) -> Option<&ExtendedPrivateKey> {
        self.private.as_ref()
    }

    /// True if this node can derive hardened children and sign.
    #[must_use]
    pub const fn has_private_key(&self) -> bool {
        self.private.is_some()
    }

    /// The chain code.
    #[must_use]
    pub const fn chain_code(&self) -> &[u8; 32] {
        &self.chain_code
    }

    /// The compressed Edwards public key (signing identity).
    #[must_use]
    pub const fn master_public_key(&self) -> &MasterPublicKey {
        &self.master_public_key
    }

    /// The Montgomery-form public key (X25519 encryption identity).
    #[must_use]
    pub const fn public_key(&self) -> &[u8; 32] {
        &self.public_key
    }

    /// Derive each path component in turn, starting from this node.
    ///
    /// # Errors
    /// Propagates the per-step derivation errors.
    pub fn derive_path(&self, path: &DerivationPath) -> DerivationResult<Self> {
        let mut node = self.shallow_clone();
        for &index in path.indices() {
            node = node.derive_child(index)?;
        }
        Ok(node)
    }

    fn shallow_clone(&self) -> Self {
        Self {
            private: self.private.clone(),
            chain_code: self.chain_code,
            master_public_key: self.master_public_key,
            public_key: self.public_key,
        }
    }
}

impl fmt::Debug for HdNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Private halves are deliberately not shown.
        f.debug_struct("HdNode")
            .field("master_public_key", &self.master_public_key)
            .field("public_only", &self.private.is_none())
            .finish_non_exhaustive()
    }
}

/// Parse a path, stretch the mnemonic, and walk the tree from the root.
///
/// # Errors
/// Path-parse and derivation errors as described on [`HdNode`].
pub fn derive_from_mnemonic(
    path: &str,
    mnemonic: &str,
    passphrase: &str,
) -> DerivationResult<HdNode> {
    let path: DerivationPath = path.parse()?;
    let seed = mnemonic_to_seed(mnemonic, passphrase);
    let root = HdNode::from_seed(&seed)?;
    root.derive_path(&path)
}
