//! Mnemonic ↔ entropy codec with checksum, over an injected wordlist.
//!
//! Implements the BIP39 encoding (11-bit word indices over entropy plus a
//! SHA-256 checksum) against any caller-supplied [`Wordlist`], so the same
//! codec serves the standard English list and test lists. The English list
//! itself is sourced from the `bip39` crate rather than vendored.

use std::collections::HashMap;

use rand::{CryptoRng, RngCore};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Mnemonic codec errors
#[derive(Debug, Error)]
pub enum MnemonicError {
    /// A word is unknown or the word count is unusable
    #[error("invalid mnemonic: {0}")]
    InvalidMnemonic(String),
    /// Entropy length outside 16..=32 bytes or not a multiple of 4
    #[error("invalid entropy length: {0} bytes")]
    InvalidEntropy(usize),
    /// Decoded checksum does not match the entropy
    #[error("mnemonic checksum mismatch")]
    InvalidChecksum,
    /// Wordlist construction rejected a repeated word
    #[error("duplicate word in wordlist: {0}")]
    DuplicateWord(String),
}

/// Result type for mnemonic operations
pub type MnemonicResult<T> = Result<T, MnemonicError>;

/// An ordered list of distinct words, index-addressable both ways.
#[derive(Clone, Debug)]
pub struct Wordlist {
    words: Vec<String>,
    indices: HashMap<String, usize>,
}

impl Wordlist {
    /// Build a wordlist from an ordered word sequence.
    ///
    /// # Errors
    /// Returns [`MnemonicError::DuplicateWord`] if a word repeats, or
    /// [`MnemonicError::InvalidMnemonic`] for an empty list.
    pub fn new<I, S>(words: I) -> MnemonicResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let words: Vec<String> = words.into_iter().map(Into::into).collect();
        if words.is_empty() {
            return Err(MnemonicError::InvalidMnemonic("empty wordlist".into()));
        }
        let mut indices = HashMap::with_capacity(words.len());
        for (i, word) in words.iter().enumerate() {
            if indices.insert(word.clone(), i).is_some() {
                return Err(MnemonicError::DuplicateWord(word.clone()));
            }
        }
        Ok(Self { words, indices })
    }

    /// The standard English list (2048 words) from the `bip39` crate.
    #[must_use]
    pub fn bip39_english() -> Self {
        Self::new(bip39::Language::English.words_by_prefix("").iter().copied())
            .expect("the bundled English wordlist has no duplicates")
    }

    /// Number of words in the list.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// True if the list holds no words.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// The word at `index`, if in range.
    #[must_use]
    pub fn word_at(&self, index: usize) -> Option<&str> {
        self.words.get(index).map(String::as_str)
    }

    /// The index of `word`, if present.
    #[must_use]
    pub fn index_of(&self, word: &str) -> Option<usize> {
        self.indices.get(word).copied()
    }

    /// True if `word` is in the list.
    #[must_use]
    pub fn contains(&self, word: &str) -> bool {
        self.indices.contains_key(word)
    }
}

fn check_entropy_len(len: usize) -> MnemonicResult<()> {
    if (16..=32).contains(&len) && len % 4 == 0 {
        Ok(())
    } else {
        Err(MnemonicError::InvalidEntropy(len))
    }
}

/// Encode entropy as a space-joined mnemonic phrase.
///
/// Entropy must be 16–32 bytes and a multiple of 4. The checksum is the top
/// `len·8/32` bits of SHA-256 over the entropy, appended before the bits
/// are grouped into 11-bit word indices.
///
/// # Errors
/// [`MnemonicError::InvalidEntropy`] for a bad length,
/// [`MnemonicError::InvalidMnemonic`] if the wordlist cannot address all
/// 11-bit indices.
pub fn entropy_to_mnemonic(entropy: &[u8], wordlist: &Wordlist) -> MnemonicResult<String> {
    check_entropy_len(entropy.len())?;

    let entropy_bits = entropy.len() * 8;
    let checksum_bits = entropy_bits / 32;
    let word_count = (entropy_bits + checksum_bits) / 11;

    // Checksum is at most 8 bits, so one hash byte covers it.
    let mut data = entropy.to_vec();
    data.push(Sha256::digest(entropy)[0]);

    let mut words = Vec::with_capacity(word_count);
    for w in 0..word_count {
        let mut index = 0usize;
        for b in 0..11 {
            let pos = w * 11 + b;
            let bit = (data[pos / 8] >> (7 - pos % 8)) & 1;
            index = (index << 1) | usize::from(bit);
        }
        let word = wordlist.word_at(index).ok_or_else(|| {
            MnemonicError::InvalidMnemonic(format!(
                "wordlist of {} words cannot address index {index}",
                wordlist.len()
            ))
        })?;
        words.push(word);
    }

    Ok(words.join(" "))
}

/// Decode a mnemonic phrase back to its entropy, verifying the checksum.
///
/// # Errors
/// [`MnemonicError::InvalidMnemonic`] for unknown words or an unusable word
/// count, [`MnemonicError::InvalidEntropy`] for a decoded length outside
/// the valid range, [`MnemonicError::InvalidChecksum`] on mismatch.
pub fn mnemonic_to_entropy(mnemonic: &str, wordlist: &Wordlist) -> MnemonicResult<Vec<u8>> {
    let words: Vec<&str> = mnemonic.split_whitespace().collect();
    if words.is_empty() || words.len() % 3 != 0 {
        return Err(MnemonicError::InvalidMnemonic(format!(
            "word count {} is not a positive multiple of 3",
            words.len()
        )));
    }

    let total_bits = words.len() * 11;
    let entropy_bits = total_bits / 33 * 32;
    let checksum_bits = total_bits - entropy_bits;
    let entropy_len = entropy_bits / 8;
    check_entropy_len(entropy_len)?;

    let mut data = vec![0u8; (total_bits + 7) / 8];
    for (w, word) in words.iter().enumerate() {
        let index = wordlist
            .index_of(word)
            .ok_or_else(|| MnemonicError::InvalidMnemonic(format!("unknown word: {word}")))?;
        if index >= 1 << 11 {
            return Err(MnemonicError::InvalidMnemonic(format!(
                "word index {index} exceeds 11 bits"
            )));
        }
        for b in 0..11 {
            if index >> (10 - b) & 1 == 1 {
                let pos = w * 11 + b;
                data[pos / 8] |= 1 << (7 - pos % 8);
            }
        }
    }

    let entropy = data[..entropy_len].to_vec();
    let mask = (0xffu16 << (8 - checksum_bits)) as u8;
    let expected = Sha256::digest(&entropy)[0] & mask;
    if data[entropy_len] & mask != expected {
        return Err(MnemonicError::InvalidChecksum);
    }

    Ok(entropy)
}

/// True iff the phrase decodes cleanly against the wordlist.
#[must_use]
pub fn is_valid_mnemonic(mnemonic: &str, wordlist: &Wordlist) -> bool {
    mnemonic_to_entropy(mnemonic, wordlist).is_ok()
}

/// Generate a fresh mnemonic from the given entropy source.
///
/// `strength_bits` must be 128–256 and a multiple of 32.
///
/// # Errors
/// [`MnemonicError::InvalidEntropy`] for an unsupported strength.
pub fn generate_mnemonic_with<R: RngCore + CryptoRng>(
    rng: &mut R,
    strength_bits: usize,
    wordlist: &Wordlist,
) -> MnemonicResult<String> {
    if strength_bits % 8 != 0 {
        return Err(MnemonicError::InvalidEntropy(strength_bits / 8));
    }
    let mut entropy = vec![0u8; strength_bits / 8];
    rng.fill_bytes(&mut entropy);
    entropy_to_mnemonic(&entropy, wordlist)
}

/// Generate a fresh mnemonic from the operating-system CSPRNG.
///
/// # Errors
/// [`MnemonicError::InvalidEntropy`] for an unsupported strength.
pub fn generate_mnemonic(strength_bits: usize, wordlist: &Wordlist) -> MnemonicResult<String> {
    generate_mnemonic_with(&mut rand::rngs::OsRng, strength_bits, wordlist)
}
