use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// 殖利率保留的小數位數
const YIELD_SCALE: u32 = 2;

/// Computes the forward annual yield in percent.
///
/// `round(dividend * 100 / price, 2)` with banker's rounding (half to even).
/// The percentage shown on the source page is not precise enough to be reused.
/// Returns `None` when the price is zero or the arithmetic overflows.
pub fn forward_annual_yield(dividend: Decimal, price: Decimal) -> Option<Decimal> {
    dividend
        .checked_mul(dec!(100))?
        .checked_div(price)
        .map(|ratio| {
            let mut rounded =
                ratio.round_dp_with_strategy(YIELD_SCALE, RoundingStrategy::MidpointNearestEven);
            // 固定兩位小數，0.5 輸出為 0.50
            rounded.rescale(YIELD_SCALE);
            rounded
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_annual_yield() {
        assert_eq!(forward_annual_yield(dec!(0.75), dec!(150.00)), Some(dec!(0.50)));
        assert_eq!(forward_annual_yield(dec!(2.00), dec!(80.00)), Some(dec!(2.50)));
        assert_eq!(forward_annual_yield(dec!(2.92), dec!(191.33)), Some(dec!(1.53)));
        assert_eq!(forward_annual_yield(Decimal::ZERO, dec!(10)), Some(dec!(0.00)));
        assert_eq!(
            forward_annual_yield(dec!(0.75), dec!(150.00)).map(|v| v.to_string()),
            Some("0.50".to_string())
        );
    }

    #[test]
    fn test_half_to_even() {
        // 0.125 => 0.12, 0.135 => 0.14
        assert_eq!(forward_annual_yield(dec!(0.125), dec!(100)), Some(dec!(0.12)));
        assert_eq!(forward_annual_yield(dec!(0.135), dec!(100)), Some(dec!(0.14)));
    }

    #[test]
    fn test_zero_price() {
        assert_eq!(forward_annual_yield(dec!(0.75), Decimal::ZERO), None);
    }
}
