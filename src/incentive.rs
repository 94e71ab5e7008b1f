use alloy::primitives::{U256, U512};

/// Computes `floor(balance * rate / denominator)` without overflow.
///
/// The product of two 256-bit values always fits in 512 bits, so the result is
/// returned widened. Returns `None` when `denominator` is zero.
pub fn compute_incentive(balance: U256, rate: U256, denominator: U256) -> Option<U512> {
    let product = U512::from(balance) * U512::from(rate);
    product.checked_div(U512::from(denominator))
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn any_u256() -> impl Strategy<Value = U256> {
        any::<[u8; 32]>().prop_map(|bytes| U256::from_be_bytes(bytes))
    }

    fn nonzero_u256() -> impl Strategy<Value = U256> {
        any_u256().prop_filter("denominator must be nonzero", |d| !d.is_zero())
    }

    #[test]
    fn floors_the_quotient() {
        let incentive =
            compute_incentive(U256::from(337), U256::from(50), U256::from(1000)).unwrap();
        assert_eq!(incentive, U512::from(16));
    }

    #[test]
    fn zero_balance_yields_zero() {
        let incentive = compute_incentive(U256::ZERO, U256::from(100), U256::from(10_000)).unwrap();
        assert_eq!(incentive, U512::ZERO);
    }

    #[test]
    fn zero_denominator_is_rejected() {
        assert!(compute_incentive(U256::from(337), U256::from(50), U256::ZERO).is_none());
    }

    #[test]
    fn exact_above_256_bits() {
        // MAX * MAX / MAX == MAX, the intermediate product needs 512 bits
        let incentive = compute_incentive(U256::MAX, U256::MAX, U256::MAX).unwrap();
        assert_eq!(incentive, U512::from(U256::MAX));

        // MAX * 3 / 2 is larger than U256::MAX
        let incentive = compute_incentive(U256::MAX, U256::from(3), U256::from(2)).unwrap();
        let expected = (U512::from(U256::MAX) * U512::from(3)) / U512::from(2);
        assert_eq!(incentive, expected);
        assert!(incentive > U512::from(U256::MAX));
    }

    #[test]
    fn mainnet_like_parameters() {
        // 12_345.678 CRV at 1% (100 / 10_000)
        let balance = U256::from(12_345_678_000_000_000_000_000u128);
        let incentive = compute_incentive(balance, U256::from(100), U256::from(10_000)).unwrap();
        assert_eq!(incentive, U512::from(123_456_780_000_000_000_000u128));
    }

    proptest! {
        #[test]
        fn matches_u128_arithmetic(b in any::<u64>(), n in any::<u64>(), d in 1u128..) {
            let expected = (b as u128 * n as u128) / d;
            let incentive = compute_incentive(U256::from(b), U256::from(n), U256::from(d)).unwrap();
            prop_assert_eq!(incentive, U512::from(expected));
        }

        #[test]
        fn is_the_floor_of_the_quotient(b in any_u256(), n in any_u256(), d in nonzero_u256()) {
            let q = compute_incentive(b, n, d).unwrap();
            let product = U512::from(b) * U512::from(n);
            let d = U512::from(d);

            // q * d <= b * n < (q + 1) * d
            let rem = product
                .checked_sub(q * d)
                .expect("quotient overshoots the product");
            prop_assert!(rem < d, "remainder {} not below denominator {}", rem, d);
        }

        #[test]
        fn zero_balance_is_always_zero(n in any_u256(), d in nonzero_u256()) {
            prop_assert_eq!(compute_incentive(U256::ZERO, n, d), Some(U512::ZERO));
        }
    }
}
