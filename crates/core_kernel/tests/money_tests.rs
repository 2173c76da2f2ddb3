//! Tests for FCFA amounts and rates

use core_kernel::{Amount, MoneyError, Rate};
use rust_decimal_macros::dec;

mod amount_creation {
    use super::*;

    #[test]
    fn test_from_units() {
        let a = Amount::from_units(100_000);
        assert_eq!(a.value(), dec!(100000));
        assert!(a.is_positive());
    }

    #[test]
    fn test_try_from_decimal_rejects_fractions() {
        assert_eq!(Amount::try_from_decimal(dec!(2500)).unwrap(), Amount::from_units(2500));
        assert!(matches!(
            Amount::try_from_decimal(dec!(2500.5)),
            Err(MoneyError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_zero_predicates() {
        assert!(Amount::ZERO.is_zero());
        assert!(!Amount::ZERO.is_positive());
        assert!(!Amount::ZERO.is_negative());
    }
}

mod arithmetic {
    use super::*;

    #[test]
    fn test_add_and_sub() {
        let mut total = Amount::from_units(100_000);
        total += Amount::from_units(50_000);
        total -= Amount::from_units(30_000);
        assert_eq!(total, Amount::from_units(120_000));
        assert_eq!(-total, Amount::from_units(-120_000));
    }

    #[test]
    fn test_sum_of_iterator() {
        let lines = vec![
            Amount::from_units(10),
            Amount::from_units(20),
            Amount::from_units(30),
        ];
        let total: Amount = lines.iter().sum();
        assert_eq!(total, Amount::from_units(60));
        let owned: Amount = lines.into_iter().sum();
        assert_eq!(owned, Amount::from_units(60));
    }

    #[test]
    fn test_min_via_ord() {
        let a = Amount::from_units(5);
        let b = Amount::from_units(7);
        assert_eq!(a.min(b), a);
    }

    #[test]
    fn test_clamp_non_negative() {
        assert_eq!(Amount::from_units(-3).clamp_non_negative(), Amount::ZERO);
        assert_eq!(Amount::from_units(3).clamp_non_negative(), Amount::from_units(3));
    }
}

mod rates {
    use super::*;

    #[test]
    fn test_percentage_round_trip() {
        let rate = Rate::from_percentage(dec!(8));
        assert_eq!(rate.as_decimal(), dec!(0.08));
        assert_eq!(rate.as_percentage(), dec!(8));
    }

    #[test]
    fn test_apply_rounds_half_to_even() {
        // 0.035 * 100 = 3.5 -> 4; 0.035 * 300 = 10.5 -> 10
        let rate = Rate::new(dec!(0.035));
        assert_eq!(rate.apply_rounded(Amount::from_units(100)), Amount::from_units(4));
        assert_eq!(rate.apply_rounded(Amount::from_units(300)), Amount::from_units(10));
    }

    #[test]
    fn test_scaled_surcharge() {
        let legal = Rate::from_percentage(dec!(4));
        assert_eq!(legal.scaled(dec!(1.5)).as_percentage(), dec!(6));
    }
}

mod serde_support {
    use super::*;

    #[test]
    fn test_amount_is_transparent() {
        let json = serde_json::to_string(&Amount::from_units(1_500)).unwrap();
        assert_eq!(json, "\"1500\"");
    }
}
