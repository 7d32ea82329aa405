//! Signing with extended node keys.
//!
//! Derived nodes hold the two scalar halves directly rather than a 32-byte
//! seed, so signing goes through the expanded-key form: the left half is
//! the signing scalar, the right half the nonce prefix. Signatures are
//! plain Ed25519 and verify under the node's master public key.

use std::fmt;

use curve25519_dalek::scalar::Scalar;
use ed25519_dalek::hazmat::{raw_sign, ExpandedSecretKey};
use ed25519_dalek::{Verifier, VerifyingKey};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::Sha512;

use super::node::{HdNode, MasterPublicKey};
use super::{DerivationError, DerivationResult};

/// A 64-byte Ed25519 signature produced by an extended node key.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct XSignature([u8; 64]);

impl XSignature {
    /// Create from raw bytes
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    /// Get underlying bytes
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }

    /// Convert to hex string
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for XSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "XSig({}..)", &self.to_hex()[..16])
    }
}

impl AsRef<[u8]> for XSignature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for XSignature {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for XSignature {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(&s).map_err(serde::de::Error::custom)?;
        let arr: [u8; 64] = bytes
            .try_into()
            .map_err(|_| serde::de::Error::custom("signature must be 64 bytes"))?;
        Ok(Self(arr))
    }
}

impl HdNode {
    /// Sign a message with this node's extended key.
    ///
    /// # Errors
    /// [`DerivationError::NodeNotSpecified`] on a public-only node.
    pub fn sign(&self, message: &[u8]) -> DerivationResult<XSignature> {
        let private = self
            .extended_private_key()
            .ok_or(DerivationError::NodeNotSpecified)?;

        let expanded = ExpandedSecretKey {
            scalar: Scalar::from_bytes_mod_order(*private.left()),
            hash_prefix: *private.right(),
        };
        let verifying_key = VerifyingKey::from_bytes(self.master_public_key.as_bytes())
            .map_err(|_| DerivationError::InvalidPublicPoint)?;

        let signature = raw_sign::<Sha512>(&expanded, message, &verifying_key);
        Ok(XSignature(signature.to_bytes()))
    }
}

/// Verify a signature against a node's master public key.
///
/// # Errors
/// [`DerivationError::InvalidPublicPoint`] if the key does not decode,
/// [`DerivationError::InvalidSignature`] on verification failure.
pub fn verify(
    master_public_key: &MasterPublicKey,
    message: &[u8],
    signature: &XSignature,
) -> DerivationResult<()> {
    let verifying_key = VerifyingKey::from_bytes(master_public_key.as_bytes())
        .map_err(|_| DerivationError::InvalidPublicPoint)?;
    let signature = ed25519_dalek::Signature::from_bytes(signature.as_bytes());
    verifying_key
        .verify(message, &signature)
        .map_err(|_| DerivationError::InvalidSignature)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hd::derive_child_public;
    use crate::hd::node::derive_from_mnemonic;

    const PHRASE: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    fn node() -> HdNode {
        derive_from_mnemonic("m/44'/43'/0'", PHRASE, "").unwrap()
    }

    #[test]
    fn test_sign_verify_roundtrip() {
        let node = node();
        let sig = node.sign(b"transfer 10 to alice").unwrap();
        assert!(verify(node.master_public_key(), b"transfer 10 to alice", &sig).is_ok());
    }

    #[test]
    fn test_wrong_message_fails() {
        let node = node();
        let sig = node.sign(b"original").unwrap();
        assert!(matches!(
            verify(node.master_public_key(), b"tampered", &sig),
            Err(DerivationError::InvalidSignature)
        ));
    }

    #[test]
    fn test_wrong_key_fails() {
        let signer = node();
        let other = derive_from_mnemonic("m/44'/43'/1'", PHRASE, "").unwrap();
        let sig = signer.sign(b"msg").unwrap();
        assert!(verify(other.master_public_key(), b"msg", &sig).is_err());
    }

    #[test]
    fn test_deterministic_signatures() {
        let node = node();
        let a = node.sign(b"same input").unwrap();
        let b = node.sign(b"same input").unwrap();
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn test_public_only_node_cannot_sign() {
        let node = node();
        let watch_only = derive_child_public(
            node.master_public_key().as_bytes(),
            node.chain_code(),
            0,
        )
        .unwrap();
        assert!(matches!(
            watch_only.sign(b"msg"),
            Err(DerivationError::NodeNotSpecified)
        ));
    }

    #[test]
    fn test_soft_derived_watcher_verifies_child_signature() {
        // Sign with the privately derived child, verify with the key a
        // watch-only client derives from the parent's public parts.
        let parent = node();
        let child = parent.derive_child(5).unwrap();
        let watcher = derive_child_public(
            parent.master_public_key().as_bytes(),
            parent.chain_code(),
            5,
        )
        .unwrap();
        let sig = child.sign(b"seen by the watcher").unwrap();
        assert!(verify(watcher.master_public_key(), b"seen by the watcher", &sig).is_ok());
    }

    #[test]
    fn test_signature_serde_hex_roundtrip() {
        let node = node();
        let sig = node.sign(b"serialize me").unwrap();
        let json = serde_json::to_string(&sig).unwrap();
        let back: XSignature = serde_json::from_str(&json).unwrap();
        assert_eq!(sig, back);
    }
}
