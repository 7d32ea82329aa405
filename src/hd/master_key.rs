//! Serialized master public key: public key ‖ chain code ‖ CRC32.
//!
//! The 68-byte blob lets a watch-only client bootstrap soft derivation
//! without private material. The checksum only guards against accidental
//! corruption in transit or transcription; it carries no security weight.

use crc32fast::Hasher;

use super::{DerivationError, DerivationResult};

/// Total length: 32-byte public key, 32-byte chain code, 4-byte checksum.
pub const SERIALIZED_MASTER_PUBLIC_KEY_LEN: usize = 68;

/// One CRC32 run continued over both fields, public key first.
fn checksum(public_key: &[u8], chain_code: &[u8]) -> [u8; 4] {
    let mut hasher = Hasher::new();
    hasher.update(public_key);
    hasher.update(chain_code);
    hasher.finalize().to_le_bytes()
}

/// Serialize a master public key and chain code with a trailing checksum.
///
/// # Errors
/// [`DerivationError::InvalidSerializedMasterPublicKey`] unless both
/// inputs are exactly 32 bytes.
pub fn compute_serialized_master_public_key(
    public_key: &[u8],
    chain_code: &[u8],
) -> DerivationResult<Vec<u8>> {
    if public_key.len() != 32 || chain_code.len() != 32 {
        return Err(DerivationError::InvalidSerializedMasterPublicKey);
    }
    let mut out = Vec::with_capacity(SERIALIZED_MASTER_PUBLIC_KEY_LEN);
    out.extend_from_slice(public_key);
    out.extend_from_slice(chain_code);
    out.extend_from_slice(&checksum(public_key, chain_code));
    Ok(out)
}

/// True iff the blob is 68 bytes and its checksum matches.
#[must_use]
pub fn is_valid_serialized_master_public_key(blob: &[u8]) -> bool {
    blob.len() == SERIALIZED_MASTER_PUBLIC_KEY_LEN
        && blob[64..] == checksum(&blob[..32], &blob[32..64])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hd::node::HdNode;
    use crate::hd::seed::mnemonic_to_seed;

    const PHRASE: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    fn serialized_root() -> Vec<u8> {
        let node = HdNode::from_seed(&mnemonic_to_seed(PHRASE, "")).unwrap();
        compute_serialized_master_public_key(
            node.master_public_key().as_bytes(),
            node.chain_code(),
        )
        .unwrap()
    }

    #[test]
    fn test_layout_and_validity() {
        let blob = serialized_root();
        assert_eq!(blob.len(), SERIALIZED_MASTER_PUBLIC_KEY_LEN);
        assert!(is_valid_serialized_master_public_key(&blob));
    }

    #[test]
    fn test_rejects_wrong_input_lengths() {
        assert!(matches!(
            compute_serialized_master_public_key(&[0u8; 31], &[0u8; 32]),
            Err(DerivationError::InvalidSerializedMasterPublicKey)
        ));
        assert!(matches!(
            compute_serialized_master_public_key(&[0u8; 32], &[0u8; 33]),
            Err(DerivationError::InvalidSerializedMasterPublicKey)
        ));
    }

    #[test]
    fn test_rejects_wrong_blob_lengths() {
        let blob = serialized_root();
        assert!(!is_valid_serialized_master_public_key(&blob[..67]));
        let mut long = blob.clone();
        long.push(0);
        assert!(!is_valid_serialized_master_public_key(&long));
        assert!(!is_valid_serialized_master_public_key(&[]));
    }

    #[test]
    fn test_every_bit_flip_is_detected() {
        let blob = serialized_root();
        for byte in 0..blob.len() {
            for bit in 0..8 {
                let mut tampered = blob.clone();
                tampered[byte] ^= 1 << bit;
                assert!(
                    !is_valid_serialized_master_public_key(&tampered),
                    "flip at byte {byte} bit {bit} went undetected"
                );
            }
        }
    }

    #[test]
    fn test_public_only_node_roundtrip() {
        let node = HdNode::from_seed(&mnemonic_to_seed(PHRASE, "")).unwrap();
        let blob = serialized_root();
        let restored = HdNode::from_serialized_master_public_key(&blob).unwrap();
        assert!(!restored.has_private_key());
        assert_eq!(restored.master_public_key(), node.master_public_key());
        assert_eq!(restored.chain_code(), node.chain_code());
        assert_eq!(restored.public_key(), node.public_key());
    }

    #[test]
    fn test_corrupt_blob_cannot_build_node() {
        let mut blob = serialized_root();
        blob[10] ^= 0x40;
        assert!(matches!(
            HdNode::from_serialized_master_public_key(&blob),
            Err(DerivationError::InvalidSerializedMasterPublicKey)
        ));
    }
}
