//! The four secret encodings and their integer mappings.
//!
//! Each version is a pair of pure functions between a secret's printable
//! form and a big integer, dispatched by explicit match. Wordlists arrive
//! through [`SecretCodecConfig`]; nothing here reads global state.

use num_bigint::BigUint;
use num_traits::ToPrimitive;

use super::{ShamirError, ShamirResult};
use crate::mnemonic::{entropy_to_mnemonic, is_valid_mnemonic, mnemonic_to_entropy, Wordlist};

/// Word count of a legacy phrase.
const LEGACY_WORD_COUNT: usize = 12;

/// Wordlists used by the word-based secret versions.
#[derive(Clone, Debug)]
pub struct SecretCodecConfig {
    bip39: Wordlist,
    legacy: Wordlist,
}

impl SecretCodecConfig {
    /// Bundle the two wordlists.
    #[must_use]
    pub const fn new(bip39: Wordlist, legacy: Wordlist) -> Self {
        Self { bip39, legacy }
    }

    /// The 2048-word mnemonic list.
    #[must_use]
    pub const fn bip39(&self) -> &Wordlist {
        &self.bip39
    }

    /// The legacy 12-word-phrase list.
    #[must_use]
    pub const fn legacy(&self) -> &Wordlist {
        &self.legacy
    }
}

/// How a secret maps to and from the shared integer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SecretVersion {
    /// Free-text passphrase, UTF-8 bytes as a big-endian integer
    CustomPassphrase = 0,
    /// Twelve words from the legacy list encoding 128 bits
    LegacyWords = 1,
    /// A mnemonic, `(entropy << 8) | word_count`
    Bip39EnWords = 2,
    /// A raw 32-byte private key in hex
    PrivateKey = 3,
}

impl SecretVersion {
    /// The numeric tag used in the piece wire format.
    #[must_use]
    pub const fn tag(self) -> u32 {
        self as u32
    }

    /// Parse a wire-format tag.
    ///
    /// # Errors
    /// [`ShamirError::UnsupportedPieceVersion`] for unknown tags.
    pub fn from_tag(tag: u32) -> ShamirResult<Self> {
        match tag {
            0 => Ok(Self::CustomPassphrase),
            1 => Ok(Self::LegacyWords),
            2 => Ok(Self::Bip39EnWords),
            3 => Ok(Self::PrivateKey),
            other => Err(ShamirError::UnsupportedPieceVersion(other)),
        }
    }

    /// Pick the version for a phrase: a valid mnemonic wins, then a
    /// 12-word legacy phrase, then free text.
    #[must_use]
    pub fn detect(phrase: &str, config: &SecretCodecConfig) -> Self {
        if is_valid_mnemonic(phrase, config.bip39()) {
            return Self::Bip39EnWords;
        }
        let words: Vec<&str> = phrase.split_whitespace().collect();
        if words.len() == LEGACY_WORD_COUNT && words.iter().all(|w| config.legacy().contains(w)) {
            return Self::LegacyWords;
        }
        Self::CustomPassphrase
    }

    /// Map a secret's printable form to the integer that gets shared.
    ///
    /// # Errors
    /// [`ShamirError::InvalidSecret`] when the input does not fit the
    /// version; mnemonic errors pass through for [`Self::Bip39EnWords`].
    pub fn secret_to_number(
        self,
        secret: &str,
        config: &SecretCodecConfig,
    ) -> ShamirResult<BigUint> {
        match self {
            Self::CustomPassphrase => Ok(BigUint::from_bytes_be(secret.as_bytes())),
            Self::LegacyWords => legacy_words_to_number(secret, config.legacy()),
            Self::Bip39EnWords => {
                let entropy = mnemonic_to_entropy(secret, config.bip39())?;
                let word_count = secret.split_whitespace().count();
                Ok((BigUint::from_bytes_be(&entropy) << 8u32) + BigUint::from(word_count))
            }
            Self::PrivateKey => {
                if secret.len() != 64 {
                    return Err(ShamirError::InvalidSecret(format!(
                        "private key must be 64 hex characters, got {}",
                        secret.len()
                    )));
                }
                let bytes = hex::decode(secret)
                    .map_err(|e| ShamirError::InvalidSecret(format!("bad hex: {e}")))?;
                Ok(BigUint::from_bytes_be(&bytes))
            }
        }
    }

    /// Map a reconstructed integer back to the secret's printable form.
    ///
    /// # Errors
    /// [`ShamirError::InvalidSecret`] when the integer cannot have come
    /// from this version's encoding.
    pub fn number_to_secret(
        self,
        number: &BigUint,
        config: &SecretCodecConfig,
    ) -> ShamirResult<String> {
        match self {
            Self::CustomPassphrase => String::from_utf8(number.to_bytes_be()).map_err(|_| {
                ShamirError::InvalidSecret("reconstructed bytes are not UTF-8".into())
            }),
            Self::LegacyWords => number_to_legacy_words(number, config.legacy()),
            Self::Bip39EnWords => {
                let word_count = (number % BigUint::from(256u32))
                    .to_usize()
                    .expect("a value below 256 fits usize");
                if word_count % 3 != 0 || !(12..=24).contains(&word_count) {
                    return Err(ShamirError::InvalidSecret(format!(
                        "impossible mnemonic word count {word_count}"
                    )));
                }
                let entropy_len = word_count / 3 * 4;
                let entropy = left_padded(&(number >> 8u32), entropy_len)?;
                Ok(entropy_to_mnemonic(&entropy, config.bip39())?)
            }
            Self::PrivateKey => {
                let bytes = left_padded(number, 32)?;
                Ok(hex::encode(bytes))
            }
        }
    }
}

/// Big-endian bytes of `number`, left-padded with zeros to `len`.
fn left_padded(number: &BigUint, len: usize) -> ShamirResult<Vec<u8>> {
    let raw = number.to_bytes_be();
    // A zero BigUint serializes as one zero byte; treat it as empty.
    let raw = if raw == [0] { Vec::new() } else { raw };
    if raw.len() > len {
        return Err(ShamirError::InvalidSecret(format!(
            "value needs {} bytes but only {len} fit",
            raw.len()
        )));
    }
    let mut out = vec![0u8; len - raw.len()];
    out.extend_from_slice(&raw);
    Ok(out)
}

/// Encode one 32-bit chunk as three word indices.
fn chunk_to_indices(chunk: u32, n: u64) -> [u64; 3] {
    let x = u64::from(chunk);
    let w1 = x % n;
    let w2 = (x / n + w1) % n;
    let w3 = (x / n / n + w2) % n;
    [w1, w2, w3]
}

/// Invert three word indices back into a 32-bit chunk.
fn indices_to_chunk(w1: u64, w2: u64, w3: u64, n: u64) -> ShamirResult<u32> {
    let offset = w1 + ((w2 + n - w1) % n) * n + ((w3 + n - w2) % n) * n * n;
    u32::try_from(offset).map_err(|_| {
        ShamirError::InvalidSecret("legacy word triplet exceeds 32 bits".into())
    })
}

fn legacy_words_to_number(secret: &str, legacy: &Wordlist) -> ShamirResult<BigUint> {
    let words: Vec<&str> = secret.split_whitespace().collect();
    if words.len() != LEGACY_WORD_COUNT {
        return Err(ShamirError::InvalidSecret(format!(
            "legacy phrase must be {LEGACY_WORD_COUNT} words, got {}",
            words.len()
        )));
    }
    let n = legacy.len() as u64;

    // Four 32-bit chunks, most significant first.
    let mut value: u128 = 0;
    for triplet in words.chunks(3) {
        let mut indices = [0u64; 3];
        for (slot, word) in indices.iter_mut().zip(triplet) {
            *slot = legacy.index_of(word).ok_or_else(|| {
                ShamirError::InvalidSecret(format!("word not in the legacy list: {word}"))
            })? as u64;
        }
        let chunk = indices_to_chunk(indices[0], indices[1], indices[2], n)?;
        value = (value << 32) | u128::from(chunk);
    }
    Ok(BigUint::from(value))
}

fn number_to_legacy_words(number: &BigUint, legacy: &Wordlist) -> ShamirResult<String> {
    let value = number.to_u128().ok_or_else(|| {
        ShamirError::InvalidSecret("legacy secret exceeds 128 bits".into())
    })?;
    let n = legacy.len() as u64;

    let mut words = Vec::with_capacity(LEGACY_WORD_COUNT);
    for chunk_index in 0..4 {
        let shift = 32 * (3 - chunk_index);
        let chunk = ((value >> shift) & 0xffff_ffff) as u32;
        for index in chunk_to_indices(chunk, n) {
            let word = legacy.word_at(index as usize).ok_or_else(|| {
                ShamirError::InvalidSecret(format!("legacy list has no word at index {index}"))
            })?;
            words.push(word.to_string());
        }
    }
    Ok(words.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A synthetic legacy list. 1626 is the smallest size whose cube
    /// covers the full 32-bit chunk range.
    fn test_legacy_list() -> Wordlist {
        Wordlist::new((0..1626).map(|i| format!("w{i:04}"))).unwrap()
    }

    fn config() -> SecretCodecConfig {
        SecretCodecConfig::new(Wordlist::bip39_english(), test_legacy_list())
    }

    #[test]
    fn test_tag_roundtrip() {
        for version in [
            SecretVersion::CustomPassphrase,
            SecretVersion::LegacyWords,
            SecretVersion::Bip39EnWords,
            SecretVersion::PrivateKey,
        ] {
            assert_eq!(SecretVersion::from_tag(version.tag()).unwrap(), version);
        }
        assert!(matches!(
            SecretVersion::from_tag(4),
            Err(ShamirError::UnsupportedPieceVersion(4))
        ));
    }

    #[test]
    fn test_custom_passphrase_roundtrip() {
        let config = config();
        for phrase in ["aaa", "correct horse battery staple", "päßwörd ✓"] {
            let n = SecretVersion::CustomPassphrase
                .secret_to_number(phrase, &config)
                .unwrap();
            let back = SecretVersion::CustomPassphrase
                .number_to_secret(&n, &config)
                .unwrap();
            assert_eq!(back, phrase);
        }
    }

    #[test]
    fn test_custom_passphrase_rejects_non_utf8_reconstruction() {
        let config = config();
        let bogus = BigUint::from(0xff80u32);
        assert!(matches!(
            SecretVersion::CustomPassphrase.number_to_secret(&bogus, &config),
            Err(ShamirError::InvalidSecret(_))
        ));
    }

    #[test]
    fn test_legacy_chunk_codec_inverts() {
        let n = 1626u64;
        for chunk in [0u32, 1, 1625, 1626, 0xdead_beef, u32::MAX] {
            let [w1, w2, w3] = chunk_to_indices(chunk, n);
            assert!(w1 < n && w2 < n && w3 < n);
            assert_eq!(indices_to_chunk(w1, w2, w3, n).unwrap(), chunk);
        }
    }

    #[test]
    fn test_legacy_words_roundtrip_through_number() {
        let config = config();
        let value = BigUint::from(0x0123_4567_89ab_cdef_fedc_ba98_7654_3210u128);
        let phrase = SecretVersion::LegacyWords
            .number_to_secret(&value, &config)
            .unwrap();
        assert_eq!(phrase.split_whitespace().count(), 12);
        let back = SecretVersion::LegacyWords
            .secret_to_number(&phrase, &config)
            .unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn test_legacy_rejects_wrong_word_count_and_unknown_words() {
        let config = config();
        assert!(matches!(
            SecretVersion::LegacyWords.secret_to_number("w0001 w0002", &config),
            Err(ShamirError::InvalidSecret(_))
        ));
        let phrase = ["nope"; 12].join(" ");
        assert!(matches!(
            SecretVersion::LegacyWords.secret_to_number(&phrase, &config),
            Err(ShamirError::InvalidSecret(_))
        ));
    }

    #[test]
    fn test_bip39_version_roundtrip() {
        let config = config();
        for len in [16usize, 24, 32] {
            let entropy: Vec<u8> = (0..len).map(|i| (i * 89 + 3) as u8).collect();
            let phrase = entropy_to_mnemonic(&entropy, config.bip39()).unwrap();
            let n = SecretVersion::Bip39EnWords
                .secret_to_number(&phrase, &config)
                .unwrap();
            let back = SecretVersion::Bip39EnWords
                .number_to_secret(&n, &config)
                .unwrap();
            assert_eq!(back, phrase);
        }
    }

    #[test]
    fn test_bip39_number_embeds_word_count_in_low_byte() {
        let config = config();
        let phrase = entropy_to_mnemonic(&[0u8; 16], config.bip39()).unwrap();
        let n = SecretVersion::Bip39EnWords
            .secret_to_number(&phrase, &config)
            .unwrap();
        assert_eq!(n % BigUint::from(256u32), BigUint::from(12u32));
    }

    #[test]
    fn test_bip39_rejects_impossible_word_count() {
        let config = config();
        // Low byte 13 is not a multiple of 3.
        let bogus = (BigUint::from(1u32) << 136u32) + BigUint::from(13u32);
        assert!(matches!(
            SecretVersion::Bip39EnWords.number_to_secret(&bogus, &config),
            Err(ShamirError::InvalidSecret(_))
        ));
    }

    #[test]
    fn test_private_key_roundtrip_preserves_leading_zeros() {
        let config = config();
        let key = format!("{:0>64}", "abc123");
        let n = SecretVersion::PrivateKey
            .secret_to_number(&key, &config)
            .unwrap();
        let back = SecretVersion::PrivateKey
            .number_to_secret(&n, &config)
            .unwrap();
        assert_eq!(back, key);
    }

    #[test]
    fn test_private_key_rejects_bad_input() {
        let config = config();
        assert!(SecretVersion::PrivateKey
            .secret_to_number("abc", &config)
            .is_err());
        let not_hex = "g".repeat(64);
        assert!(SecretVersion::PrivateKey
            .secret_to_number(&not_hex, &config)
            .is_err());
        let too_big = BigUint::from(1u32) << 256u32;
        assert!(SecretVersion::PrivateKey
            .number_to_secret(&too_big, &config)
            .is_err());
    }

    #[test]
    fn test_detection_priority() {
        let config = config();
        let mnemonic = entropy_to_mnemonic(&[5u8; 16], config.bip39()).unwrap();
        assert_eq!(
            SecretVersion::detect(&mnemonic, &config),
            SecretVersion::Bip39EnWords
        );

        let legacy = (0..12).map(|i| format!("w{i:04}")).collect::<Vec<_>>().join(" ");
        assert_eq!(
            SecretVersion::detect(&legacy, &config),
            SecretVersion::LegacyWords
        );

        assert_eq!(
            SecretVersion::detect("aaa", &config),
            SecretVersion::CustomPassphrase
        );
        // Eleven legacy words fall through to free text.
        let eleven = (0..11).map(|i| format!("w{i:04}")).collect::<Vec<_>>().join(" ");
        assert_eq!(
            SecretVersion::detect(&eleven, &config),
            SecretVersion::CustomPassphrase
        );
    }
}
