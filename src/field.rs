//! Arithmetic over GF(2^255 − 19), the Curve25519 base field.
//!
//! Elements are 32-byte little-endian residues. Every operation returns a
//! fully reduced (canonical) representative, and all loops run a fixed
//! number of iterations with masked selects instead of data-dependent
//! branches, since these values back private scalar material.

/// p = 2^255 − 19 in little-endian bytes.
const PRIME: [u8; 32] = [
    0xed, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0x7f,
];

/// 2p = 2^256 − 38, added before subtraction to keep intermediates positive.
const TWO_PRIME: [u8; 32] = [
    0xda, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff,
];

/// An element of GF(2^255 − 19) as 32 little-endian bytes.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct FieldElement([u8; 32]);

impl FieldElement {
    /// The multiplicative identity.
    pub const ONE: Self = {
        let mut one = [0u8; 32];
        one[0] = 1;
        Self(one)
    };

    /// Interpret 32 little-endian bytes as a field element.
    ///
    /// The value is not reduced here; callers that need a canonical
    /// representative apply [`FieldElement::normalize`].
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// The canonical little-endian encoding.
    #[must_use]
    pub const fn to_bytes(self) -> [u8; 32] {
        self.0
    }

    /// Borrow the underlying bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Full reduction to the canonical representative in [0, p).
    ///
    /// Folds bit 255 back in (2^255 ≡ 19), propagates the carry across all
    /// 32 bytes, then conditionally subtracts p once with a masked select.
    #[must_use]
    pub fn normalize(&self) -> Self {
        let mut r = self.0;
        reduce(&mut r, 0);
        Self(r)
    }

    /// Field addition.
    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        let mut r = [0u8; 32];
        let mut carry: u32 = 0;
        for i in 0..32 {
            carry += u32::from(self.0[i]) + u32::from(other.0[i]);
            r[i] = carry as u8;
            carry >>= 8;
        }
        reduce(&mut r, carry);
        Self(r)
    }

    /// Field subtraction, computed as `self + 2p − other` so that the
    /// byte-wise chain never underflows.
    #[must_use]
    pub fn sub(&self, other: &Self) -> Self {
        let mut r = [0u8; 32];
        let mut carry: i32 = 0;
        for i in 0..32 {
            let v = i32::from(self.0[i]) + i32::from(TWO_PRIME[i]) - i32::from(other.0[i]) + carry;
            r[i] = v as u8;
            carry = v >> 8;
        }
        // self + 2p − other is positive and below 3p, so the carry out is 0 or 1.
        reduce(&mut r, carry as u32);
        Self(r)
    }

    /// Field multiplication: schoolbook 32×32 product, high limbs folded
    /// by ×38 (2^256 ≡ 38 mod p), then the same reduction tail as `add`.
    #[must_use]
    pub fn mul(&self, other: &Self) -> Self {
        let mut t = [0u32; 63];
        for i in 0..32 {
            for j in 0..32 {
                t[i + j] += u32::from(self.0[i]) * u32::from(other.0[j]);
            }
        }

        let mut r = [0u8; 32];
        let mut carry: u64 = 0;
        for i in 0..32 {
            let hi = if i + 32 < 63 { u64::from(t[i + 32]) } else { 0 };
            let v = carry + u64::from(t[i]) + 38 * hi;
            r[i] = v as u8;
            carry = v >> 8;
        }
        reduce(&mut r, carry as u32);
        Self(r)
    }

    /// Squaring, as a multiplication by self.
    #[must_use]
    pub fn square(&self) -> Self {
        self.mul(self)
    }

    /// Modular inverse: `self^(p−2)`.
    ///
    /// p − 2 = 2^255 − 21 has every exponent bit set except bits 2 and 4;
    /// the ladder walks that fixed pattern from the top bit down, so the
    /// operation count never depends on the operand.
    #[must_use]
    pub fn invert(&self) -> Self {
        let mut acc = *self;
        for i in (0..=253).rev() {
            acc = acc.square();
            if i != 2 && i != 4 {
                acc = acc.mul(self);
            }
        }
        acc
    }
}

/// Reduce `carry · 2^256 + r` into the canonical range [0, p).
fn reduce(r: &mut [u8; 32], mut carry: u32) {
    // Fold the overflow word twice: 2^256 ≡ 38. The second pass absorbs
    // at most a single carry produced by the first.
    for _ in 0..2 {
        let mut c = carry * 38;
        for b in r.iter_mut() {
            c += u32::from(*b);
            *b = c as u8;
            c >>= 8;
        }
        carry = c;
    }

    // Fold bit 255: 2^255 ≡ 19.
    let mut c = 19 * u32::from(r[31] >> 7);
    r[31] &= 0x7f;
    for b in r.iter_mut() {
        c += u32::from(*b);
        *b = c as u8;
        c >>= 8;
    }

    // The value is now below p + 38; a single conditional subtraction of p
    // lands in [0, p). The select runs on a mask, not a branch.
    let mut diff = [0u8; 32];
    let mut borrow: i32 = 0;
    for i in 0..32 {
        let v = i32::from(r[i]) - i32::from(PRIME[i]) + borrow;
        diff[i] = v as u8;
        borrow = v >> 8;
    }
    // borrow is 0 when r >= p (keep the difference) and -1 otherwise.
    let keep_diff = (borrow + 1) as u8; // 1 or 0
    let mask = keep_diff.wrapping_neg(); // 0xff or 0x00
    for i in 0..32 {
        r[i] = (diff[i] & mask) | (r[i] & !mask);
    }
}
