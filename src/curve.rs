//! Edwards → Montgomery public-key conversion.
//!
//! Encryption uses X25519, so every derived Ed25519 public key also gets a
//! Montgomery-form twin: the birational map u = (1 + y)/(1 − y) over the
//! shared base field. The conversion consumes the affine Y coordinate, not
//! the compressed encoding — the X-sign flag in bit 255 must already be
//! cleared, otherwise it would be misread as part of the field element.

use curve25519_dalek::edwards::EdwardsPoint;

use crate::field::FieldElement;

/// Convert an Ed25519 Y coordinate to the matching Curve25519 X coordinate.
///
/// `edwards_y` is the little-endian affine Y with bit 255 clear. The result
/// is the canonical Montgomery X, usable directly as an X25519 public key.
#[must_use]
pub fn ed25519_to_curve25519(edwards_y: &[u8; 32]) -> [u8; 32] {
    let y = FieldElement::from_bytes(*edwards_y).normalize();
    let denom = FieldElement::ONE.sub(&y).invert();
    let num = FieldElement::ONE.add(&y);
    num.mul(&denom).normalize().to_bytes()
}

/// Montgomery X for a curve point, via the sign-free Y encoding.
#[must_use]
pub fn montgomery_from_edwards(point: &EdwardsPoint) -> [u8; 32] {
    let mut y = point.compress().to_bytes();
    y[31] &= 0x7f;
    ed25519_to_curve25519(&y)
}

#[cfg(test)]
mod tests {
    use curve25519_dalek::constants::ED25519_BASEPOINT_POINT;
    use curve25519_dalek::scalar::Scalar;

    use super::*;

    #[test]
    fn test_basepoint_maps_to_nine() {
        // The Curve25519 base point has u = 9.
        let converted = montgomery_from_edwards(&ED25519_BASEPOINT_POINT);
        let mut nine = [0u8; 32];
        nine[0] = 9;
        assert_eq!(converted, nine);
    }

    #[test]
    fn test_matches_dalek_to_montgomery() {
        for k in 1u64..40 {
            let point = EdwardsPoint::mul_base(&Scalar::from(k));
            assert_eq!(
                montgomery_from_edwards(&point),
                point.to_montgomery().to_bytes(),
                "mismatch at scalar {k}"
            );
        }
    }

    #[test]
    fn test_conversion_ignores_x_sign_of_source_point() {
        // P and −P share a Y coordinate, so they map to the same X25519 key.
        let p = EdwardsPoint::mul_base(&Scalar::from(7u64));
        assert_eq!(montgomery_from_edwards(&p), montgomery_from_edwards(&-p));
    }
}
