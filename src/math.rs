//! Fixed-point and AMM math shared by the pair and the BAMM
//! All helpers are checked and return `Result` so callers decide how to revert.
use odra::casper_types::U256;
use crate::errors::{DexError, MathError};

/// Minimum liquidity that is locked forever to prevent division by zero
pub const MINIMUM_LIQUIDITY: u128 = 1000;

/// Basis points denominator
pub const BPS: u32 = 10_000;

/// Default pair swap fee in basis points (0.3%)
pub const DEFAULT_FEE_BPS: u32 = 30;

/// 1e18, scale of prices, rates and multipliers
pub fn precision() -> U256 {
    U256::from(1_000_000_000_000_000_000u128)
}

/// Safe math operations for U256
pub struct SafeMath;

impl SafeMath {
    pub fn add(a: U256, b: U256) -> Result<U256, MathError> {
        a.checked_add(b).ok_or(MathError::Overflow)
    }

    pub fn sub(a: U256, b: U256) -> Result<U256, MathError> {
        a.checked_sub(b).ok_or(MathError::Underflow)
    }

    pub fn mul(a: U256, b: U256) -> Result<U256, MathError> {
        a.checked_mul(b).ok_or(MathError::Overflow)
    }

    pub fn div(a: U256, b: U256) -> Result<U256, MathError> {
        if b.is_zero() {
            return Err(MathError::DivisionByZero);
        }
        Ok(a / b)
    }

    /// Division rounding towards positive infinity
    pub fn div_up(a: U256, b: U256) -> Result<U256, MathError> {
        let q = Self::div(a, b)?;
        if (a % b).is_zero() {
            Ok(q)
        } else {
            Self::add(q, U256::one())
        }
    }

    /// `a * b / c` rounded down
    pub fn mul_div(a: U256, b: U256, c: U256) -> Result<U256, MathError> {
        Self::div(Self::mul(a, b)?, c)
    }

    /// `a * b / c` rounded up
    pub fn mul_div_up(a: U256, b: U256, c: U256) -> Result<U256, MathError> {
        Self::div_up(Self::mul(a, b)?, c)
    }

    /// Integer square root (Babylonian method), rounded down
    pub fn sqrt(y: U256) -> U256 {
        if y > U256::from(3) {
            let mut z = y;
            let mut x = y / 2 + 1;
            while x < z {
                z = x;
                x = (y / x + x) / 2;
            }
            z
        } else if !y.is_zero() {
            U256::one()
        } else {
            U256::zero()
        }
    }

    pub fn min(a: U256, b: U256) -> U256 {
        if a < b { a } else { b }
    }

    pub fn max(a: U256, b: U256) -> U256 {
        if a > b { a } else { b }
    }

    pub fn abs_diff(a: U256, b: U256) -> U256 {
        if a > b { a - b } else { b - a }
    }
}

/// Constant product formulas with a configurable fee
pub struct AmmMath;

impl AmmMath {
    /// Output for an exact input:
    /// `amount_out = amount_in * (BPS - fee) * reserve_out / (reserve_in * BPS + amount_in * (BPS - fee))`
    pub fn get_amount_out(
        amount_in: U256,
        reserve_in: U256,
        reserve_out: U256,
        fee_bps: u32,
    ) -> Result<U256, DexError> {
        if amount_in.is_zero() {
            return Err(DexError::InsufficientInputAmount);
        }
        if reserve_in.is_zero() || reserve_out.is_zero() {
            return Err(DexError::InsufficientLiquidity);
        }

        let amount_in_with_fee = SafeMath::mul(amount_in, U256::from(BPS - fee_bps))?;
        let numerator = SafeMath::mul(amount_in_with_fee, reserve_out)?;
        let denominator = SafeMath::add(
            SafeMath::mul(reserve_in, U256::from(BPS))?,
            amount_in_with_fee,
        )?;

        Ok(SafeMath::div(numerator, denominator)?)
    }

    /// Input required for an exact output, rounded up by one unit
    pub fn get_amount_in(
        amount_out: U256,
        reserve_in: U256,
        reserve_out: U256,
        fee_bps: u32,
    ) -> Result<U256, DexError> {
        if amount_out.is_zero() {
            return Err(DexError::InsufficientOutputAmount);
        }
        if reserve_in.is_zero() || reserve_out.is_zero() || amount_out >= reserve_out {
            return Err(DexError::InsufficientLiquidity);
        }

        let numerator = SafeMath::mul(
            SafeMath::mul(reserve_in, amount_out)?,
            U256::from(BPS),
        )?;
        let denominator = SafeMath::mul(
            SafeMath::sub(reserve_out, amount_out)?,
            U256::from(BPS - fee_bps),
        )?;

        Ok(SafeMath::add(SafeMath::div(numerator, denominator)?, U256::one())?)
    }

    /// Liquidity minted for a deposit.
    /// First deposit: `sqrt(amount0 * amount1) - MINIMUM_LIQUIDITY`,
    /// afterwards the smaller of the two pro-rata shares.
    pub fn calculate_liquidity(
        amount0: U256,
        amount1: U256,
        reserve0: U256,
        reserve1: U256,
        total_supply: U256,
    ) -> Result<U256, DexError> {
        if total_supply.is_zero() {
            let liquidity = SafeMath::sqrt(SafeMath::mul(amount0, amount1)?);
            let min_liquidity = U256::from(MINIMUM_LIQUIDITY);
            if liquidity <= min_liquidity {
                return Err(DexError::InsufficientLiquidityMinted);
            }
            Ok(liquidity - min_liquidity)
        } else {
            let liquidity0 = SafeMath::mul_div(amount0, total_supply, reserve0)?;
            let liquidity1 = SafeMath::mul_div(amount1, total_supply, reserve1)?;
            Ok(SafeMath::min(liquidity0, liquidity1))
        }
    }

    /// Balanced k check with fees charged on the inputs, everything scaled by BPS
    pub fn verify_k_invariant(
        reserves: (U256, U256),
        balances: (U256, U256),
        amounts_in: (U256, U256),
        fee_bps: u32,
    ) -> Result<bool, DexError> {
        let bps = U256::from(BPS);
        let fee = U256::from(fee_bps);
        let adjusted0 = SafeMath::sub(
            SafeMath::mul(balances.0, bps)?,
            SafeMath::mul(amounts_in.0, fee)?,
        )?;
        let adjusted1 = SafeMath::sub(
            SafeMath::mul(balances.1, bps)?,
            SafeMath::mul(amounts_in.1, fee)?,
        )?;
        let k_new = SafeMath::mul(adjusted0, adjusted1)?;
        let k_old = SafeMath::mul(
            SafeMath::mul(reserves.0, reserves.1)?,
            SafeMath::mul(bps, bps)?,
        )?;
        Ok(k_new >= k_old)
    }
}

/// Helpers for turning an unbalanced pair of token amounts into pool liquidity
pub struct UnbalancedLiquidity;

impl UnbalancedLiquidity {
    /// Amount of token A to swap into the pool so that the remaining
    /// `(amount_a - x, amount_b + out(x))` has the same ratio as the post-swap
    /// reserves. Returns zero when the amounts are already balanced or A is
    /// the scarce side.
    pub fn balancing_swap_amount(
        amount_a: U256,
        amount_b: U256,
        reserve_a: U256,
        reserve_b: U256,
        fee_bps: u32,
    ) -> Result<U256, DexError> {
        if reserve_a.is_zero() || reserve_b.is_zero() {
            return Err(DexError::InsufficientLiquidity);
        }
        // A is in surplus iff amount_a / amount_b > reserve_a / reserve_b
        if SafeMath::mul(amount_a, reserve_b)? <= SafeMath::mul(amount_b, reserve_a)? {
            return Ok(U256::zero());
        }

        let mut low = U256::zero();
        let mut high = amount_a;
        while high - low > U256::one() {
            let mid = low + (high - low) / 2;
            if Self::still_surplus(mid, amount_a, amount_b, reserve_a, reserve_b, fee_bps)? {
                low = mid;
            } else {
                high = mid;
            }
        }
        Ok(low)
    }

    /// LP that `amount0`/`amount1` would mint after the balancing swap.
    /// Returns `(liquidity, swap_amount, swap_token0_in)`.
    pub fn estimate_liquidity(
        amount0: U256,
        amount1: U256,
        reserve0: U256,
        reserve1: U256,
        total_supply: U256,
        fee_bps: u32,
    ) -> Result<(U256, U256, bool), DexError> {
        let swap0 =
            Self::balancing_swap_amount(amount0, amount1, reserve0, reserve1, fee_bps)?;
        if !swap0.is_zero() {
            let out = AmmMath::get_amount_out(swap0, reserve0, reserve1, fee_bps)?;
            let liquidity = AmmMath::calculate_liquidity(
                amount0 - swap0,
                SafeMath::add(amount1, out)?,
                SafeMath::add(reserve0, swap0)?,
                SafeMath::sub(reserve1, out)?,
                total_supply,
            )?;
            return Ok((liquidity, swap0, true));
        }

        let swap1 =
            Self::balancing_swap_amount(amount1, amount0, reserve1, reserve0, fee_bps)?;
        if swap1.is_zero() {
            let liquidity =
                AmmMath::calculate_liquidity(amount0, amount1, reserve0, reserve1, total_supply)?;
            return Ok((liquidity, U256::zero(), false));
        }
        let out = AmmMath::get_amount_out(swap1, reserve1, reserve0, fee_bps)?;
        let liquidity = AmmMath::calculate_liquidity(
            SafeMath::add(amount0, out)?,
            amount1 - swap1,
            SafeMath::sub(reserve0, out)?,
            SafeMath::add(reserve1, swap1)?,
            total_supply,
        )?;
        Ok((liquidity, swap1, false))
    }

    fn still_surplus(
        swap: U256,
        amount_a: U256,
        amount_b: U256,
        reserve_a: U256,
        reserve_b: U256,
        fee_bps: u32,
    ) -> Result<bool, DexError> {
        if swap.is_zero() {
            return Ok(true);
        }
        let out = AmmMath::get_amount_out(swap, reserve_a, reserve_b, fee_bps)?;
        let left_a = amount_a - swap;
        let left_b = SafeMath::add(amount_b, out)?;
        let pool_a = SafeMath::add(reserve_a, swap)?;
        let pool_b = SafeMath::sub(reserve_b, out)?;
        Ok(SafeMath::mul(left_a, pool_b)? > SafeMath::mul(left_b, pool_a)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqrt() {
        assert_eq!(SafeMath::sqrt(U256::from(0)), U256::from(0));
        assert_eq!(SafeMath::sqrt(U256::from(1)), U256::from(1));
        assert_eq!(SafeMath::sqrt(U256::from(15)), U256::from(3));
        assert_eq!(SafeMath::sqrt(U256::from(16)), U256::from(4));
        assert_eq!(SafeMath::sqrt(U256::from(100)), U256::from(10));
    }

    #[test]
    fn test_rounding_helpers() {
        assert_eq!(SafeMath::div_up(U256::from(10), U256::from(3)).unwrap(), U256::from(4));
        assert_eq!(SafeMath::div_up(U256::from(9), U256::from(3)).unwrap(), U256::from(3));
        assert_eq!(
            SafeMath::mul_div(U256::from(7), U256::from(3), U256::from(2)).unwrap(),
            U256::from(10)
        );
        assert_eq!(
            SafeMath::mul_div_up(U256::from(7), U256::from(3), U256::from(2)).unwrap(),
            U256::from(11)
        );
        assert!(matches!(
            SafeMath::div(U256::one(), U256::zero()),
            Err(MathError::DivisionByZero)
        ));
        assert!(matches!(
            SafeMath::sub(U256::zero(), U256::one()),
            Err(MathError::Underflow)
        ));
        assert!(matches!(
            SafeMath::mul(U256::MAX, U256::from(2)),
            Err(MathError::Overflow)
        ));
    }

    #[test]
    fn test_get_amount_out() {
        let amount_out = AmmMath::get_amount_out(
            U256::from(1000),
            U256::from(10000),
            U256::from(10000),
            DEFAULT_FEE_BPS,
        )
        .unwrap();
        // 1000 * 9970 * 10000 / (10000 * 10000 + 1000 * 9970)
        assert_eq!(amount_out, U256::from(906));
    }

    #[test]
    fn test_get_amount_in_covers_output() {
        let reserve_in = U256::from(10000);
        let reserve_out = U256::from(10000);
        let amount_in =
            AmmMath::get_amount_in(U256::from(900), reserve_in, reserve_out, DEFAULT_FEE_BPS)
                .unwrap();
        let back =
            AmmMath::get_amount_out(amount_in, reserve_in, reserve_out, DEFAULT_FEE_BPS).unwrap();
        assert!(back >= U256::from(900));
    }

    #[test]
    fn test_first_liquidity_locks_minimum() {
        let liquidity = AmmMath::calculate_liquidity(
            U256::from(10000),
            U256::from(10000),
            U256::zero(),
            U256::zero(),
            U256::zero(),
        )
        .unwrap();
        assert_eq!(liquidity, U256::from(9000));
    }

    #[test]
    fn test_balancing_swap_leaves_pool_ratio() {
        let e18 = precision();
        let reserve_a = U256::from(1000) * e18;
        let reserve_b = U256::from(1000) * e18;
        let amount_a = U256::from(100) * e18;
        let amount_b = U256::zero();

        let swap = UnbalancedLiquidity::balancing_swap_amount(
            amount_a, amount_b, reserve_a, reserve_b, DEFAULT_FEE_BPS,
        )
        .unwrap();
        // Roughly half, slightly more because of price impact and fee
        assert!(swap > U256::from(48) * e18 && swap < U256::from(52) * e18);

        let out = AmmMath::get_amount_out(swap, reserve_a, reserve_b, DEFAULT_FEE_BPS).unwrap();
        let left_a = amount_a - swap;
        let pool_a = reserve_a + swap;
        let pool_b = reserve_b - out;
        // left_a / out ~= pool_a / pool_b within 0.01%
        let lhs = left_a * pool_b;
        let rhs = out * pool_a;
        assert!(SafeMath::abs_diff(lhs, rhs) * U256::from(BPS) <= rhs);
    }

    #[test]
    fn test_balancing_swap_is_zero_for_scarce_side() {
        let swap = UnbalancedLiquidity::balancing_swap_amount(
            U256::from(10),
            U256::from(1000),
            U256::from(1000),
            U256::from(1000),
            DEFAULT_FEE_BPS,
        )
        .unwrap();
        assert_eq!(swap, U256::zero());
    }

    #[test]
    fn test_estimate_liquidity_swaps_surplus_side() {
        let e18 = precision();
        let (liquidity, swap, token0_in) = UnbalancedLiquidity::estimate_liquidity(
            U256::zero(),
            U256::from(10) * e18,
            U256::from(100) * e18,
            U256::from(100) * e18,
            U256::from(100) * e18,
            DEFAULT_FEE_BPS,
        )
        .unwrap();
        assert!(!token0_in);
        assert!(!swap.is_zero());
        // A one-sided deposit of 10 is worth a bit less than 5 LP
        assert!(liquidity > U256::from(4) * e18 && liquidity < U256::from(5) * e18);
    }
}
