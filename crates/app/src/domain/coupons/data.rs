//! Coupons Data

use rand::{Rng, rngs::OsRng};

use crate::domain::coupons::records::CouponUuid;

/// Characters used for generated coupon codes; ambiguous glyphs are left out.
const GENERATED_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Length of generated coupon codes.
pub const GENERATED_CODE_LEN: usize = 10;

/// New Coupon Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCoupon {
    pub uuid: CouponUuid,
    pub code: String,
    pub discount_percent: u8,
    pub is_usable: bool,
}

/// Generate a random upper-case coupon code.
#[must_use]
pub fn generate_coupon_code() -> String {
    let mut rng = OsRng;

    (0..GENERATED_CODE_LEN)
        .map(|_| {
            let index = rng.gen_range(0..GENERATED_CODE_ALPHABET.len());

            GENERATED_CODE_ALPHABET
                .get(index)
                .map_or('X', |byte| char::from(*byte))
        })
        .collect()
}
