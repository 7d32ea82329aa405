//! Child-key derivation, private and public paths.
//!
//! The scheme is BIP32 adapted to extended Ed25519 keys: two HMAC-SHA512
//! commitments per step, tagged 0x00/0x01 for hardened children (keyed by
//! the private halves) and 0x02/0x03 for soft children (keyed by the
//! public key). The child scalar is `8·trunc28(z) + parent` so soft public
//! derivation can mirror it with a point addition.

use curve25519_dalek::edwards::EdwardsPoint;
use curve25519_dalek::scalar::Scalar;
use tracing::trace;
use zeroize::Zeroize;

use super::node::{hmac_sha512, ExtendedPrivateKey, HdNode};
use super::{DerivationError, DerivationResult};

/// First hardened index.
pub(crate) const HARDENED_OFFSET: u32 = 1 << 31;

/// `x + 8·trunc28(y)` over 32 little-endian bytes, carries propagated into
/// the top four bytes.
fn add_28_mul8(x: &[u8; 32], y: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    let mut carry: u16 = 0;
    for i in 0..28 {
        let v = u16::from(x[i]) + (u16::from(y[i]) << 3) + carry;
        out[i] = v as u8;
        carry = v >> 8;
    }
    for i in 28..32 {
        let v = u16::from(x[i]) + carry;
        out[i] = v as u8;
        carry = v >> 8;
    }
    out
}

/// `(x + y) mod 2^256` over 32 little-endian bytes.
fn add_256(x: &[u8; 32], y: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    let mut carry: u16 = 0;
    for i in 0..32 {
        let v = u16::from(x[i]) + u16::from(y[i]) + carry;
        out[i] = v as u8;
        carry = v >> 8;
    }
    out
}

impl HdNode {
    /// Derive the child node at `index`; indices at or above 2^31 are
    /// hardened.
    ///
    /// # Errors
    /// [`DerivationError::NodeNotSpecified`] on a public-only node,
    /// [`DerivationError::IdentityPointDerived`] if the child scalar is a
    /// multiple of the group order.
    pub fn derive_child(&self, index: u32) -> DerivationResult<Self> {
        let private = self
            .extended_private_key()
            .ok_or(DerivationError::NodeNotSpecified)?;
        let hardened = index >= HARDENED_OFFSET;
        trace!(index, hardened, "deriving child key");

        let index_bytes = index.to_le_bytes();
        let (key_commitment, chain_commitment) = if hardened {
            let key = hmac_sha512(
                &self.chain_code,
                &[&[0x00], private.left(), private.right(), &index_bytes],
            );
            let chain = hmac_sha512(
                &self.chain_code,
                &[&[0x01], private.left(), private.right(), &index_bytes],
            );
            (key, chain)
        } else {
            let public = self.master_public_key.as_bytes();
            let key = hmac_sha512(&self.chain_code, &[&[0x02], public, &index_bytes]);
            let chain = hmac_sha512(&self.chain_code, &[&[0x03], public, &index_bytes]);
            (key, chain)
        };

        let mut left = add_28_mul8(private.left(), &key_commitment[..28]);
        let mut right = add_256(private.right(), &key_commitment[32..]);
        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&chain_commitment[32..]);

        if Scalar::from_bytes_mod_order(left) == Scalar::ZERO {
            left.zeroize();
            right.zeroize();
            return Err(DerivationError::IdentityPointDerived);
        }

        Self::from_private_parts(ExtendedPrivateKey::new(left, right), chain_code)
    }
}

/// Soft-derive a child public key and chain code without private material.
///
/// Computes `parent + (8·trunc28(z))·B` where `z` is the 0x02-tagged
/// commitment; the child chain code comes from the 0x03-tagged one. Only
/// non-hardened indices are reachable this way.
///
/// # Errors
/// [`DerivationError::PublicDerivationIndexOutOfRange`] for a hardened
/// index, [`DerivationError::InvalidPublicPoint`] if `parent_public_key`
/// does not decode.
pub fn derive_child_public(
    parent_public_key: &[u8; 32],
    chain_code: &[u8; 32],
    index: u32,
) -> DerivationResult<HdNode> {
    if index > HARDENED_OFFSET {
        return Err(DerivationError::PublicDerivationIndexOutOfRange(index));
    }

    let index_bytes = index.to_le_bytes();
    let key_commitment = hmac_sha512(chain_code, &[&[0x02], parent_public_key, &index_bytes]);
    let chain_commitment = hmac_sha512(chain_code, &[&[0x03], parent_public_key, &index_bytes]);

    let parent = curve25519_dalek::edwards::CompressedEdwardsY(*parent_public_key)
        .decompress()
        .ok_or(DerivationError::InvalidPublicPoint)?;

    let tweak = add_28_mul8(&[0u8; 32], &key_commitment[..28]);
    let tweak_point = EdwardsPoint::mul_base(&Scalar::from_bytes_mod_order(tweak));
    let child = parent + tweak_point;

    let mut child_chain = [0u8; 32];
    child_chain.copy_from_slice(&chain_commitment[32..]);

    Ok(HdNode::from_public_point(&child, child_chain))
}
