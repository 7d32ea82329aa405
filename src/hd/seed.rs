//! Mnemonic → seed stretching.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha512;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// PBKDF2 rounds for seed stretching.
const SEED_ROUNDS: u32 = 2048;

/// A 64-byte wallet seed. Wiped on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Seed([u8; 64]);

impl Seed {
    /// Wrap raw seed bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    /// Borrow the seed bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }
}

/// Stretch a mnemonic and passphrase into a 64-byte seed.
///
/// PBKDF2-HMAC-SHA512 with the phrase as password, `"mnemonic"` plus the
/// passphrase as salt, and 2048 rounds.
#[must_use]
pub fn mnemonic_to_seed(mnemonic: &str, passphrase: &str) -> Seed {
    let mut salt = String::with_capacity(8 + passphrase.len());
    salt.push_str("mnemonic");
    salt.push_str(passphrase);

    let mut out = [0u8; 64];
    pbkdf2_hmac::<Sha512>(mnemonic.as_bytes(), salt.as_bytes(), SEED_ROUNDS, &mut out);
    salt.zeroize();
    Seed(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PHRASE: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn test_reference_seed_vector() {
        let seed = mnemonic_to_seed(PHRASE, "");
        assert_eq!(
            hex::encode(seed.as_bytes()),
            "5eb00bbddcf069084889a8ab9155568165f5c453ccb85e70811aaed6f6da5fc1\
             9a5ac40b389cd370d086206dec8aa6c43daea6690f20ad3d8d48b2d2ce9e38e4"
        );
    }

    #[test]
    fn test_passphrase_changes_seed() {
        let plain = mnemonic_to_seed(PHRASE, "");
        let salted = mnemonic_to_seed(PHRASE, "TREZOR");
        assert_ne!(plain.as_bytes(), salted.as_bytes());
    }

    #[test]
    fn test_deterministic() {
        let a = mnemonic_to_seed(PHRASE, "x");
        let b = mnemonic_to_seed(PHRASE, "x");
        assert_eq!(a.as_bytes(), b.as_bytes());
    }
}
