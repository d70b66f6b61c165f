//! Liquidation planning: how a seized vault's collateral is turned back into
//! pool liquidity, and the price guard protecting it.
//!
//! The plan swaps the vault's surplus token for the missing one through the
//! pair, then repays as many units of debt as the collateral covers. When the
//! collateral is not enough, the swap instead balances the collateral to the
//! pool ratio so that the repayment is as large as possible; the rest of the
//! debt is written off against the LP holders and the owner gets nothing back.
use odra::casper_types::U256;
use super::errors::BammError;
use super::rent::PoolSnapshot;
use crate::math::{AmmMath, SafeMath, UnbalancedLiquidity, BPS};

/// A swap through the pair executed during liquidation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlannedSwap {
    pub token0_in: bool,
    pub amount_in: U256,
    pub amount_out: U256,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LiquidationPlan {
    pub swap: Option<PlannedSwap>,
    /// Live debt units repaid to the pool
    pub repay_units: U256,
    pub repay0: U256,
    pub repay1: U256,
    /// Collateral left after the swap and the repayment
    pub leftover0: U256,
    pub leftover1: U256,
}

impl LiquidationPlan {
    /// Debt units that cannot be repaid from the collateral
    pub fn shortfall(&self, debt_units: U256) -> U256 {
        debt_units.saturating_sub(self.repay_units)
    }
}

/// Plans the repayment of `debt_units` from `collateral0`/`collateral1`
pub fn plan_liquidation(
    collateral0: U256,
    collateral1: U256,
    debt_units: U256,
    pool: &PoolSnapshot,
    fee_bps: u32,
) -> Result<LiquidationPlan, BammError> {
    let (need0, need1) = pool.token_amounts_up(debt_units)?;

    let swap = if collateral0 >= need0 && collateral1 >= need1 {
        None
    } else if collateral1 > need1 {
        plan_swap(collateral0, collateral1, debt_units, pool, fee_bps, false)?
    } else if collateral0 > need0 {
        plan_swap(collateral0, collateral1, debt_units, pool, fee_bps, true)?
    } else {
        // Short on both sides: no swap can cover the debt
        balancing_swap(collateral0, collateral1, pool, fee_bps)?
    };

    let (balance0, balance1, post_pool) = match swap {
        Some(s) => apply_swap(collateral0, collateral1, pool, &s)?,
        None => (collateral0, collateral1, *pool),
    };

    let covered = SafeMath::min(
        SafeMath::mul_div(balance0, post_pool.sqrt_k(), post_pool.reserve0)?,
        SafeMath::mul_div(balance1, post_pool.sqrt_k(), post_pool.reserve1)?,
    );
    let mut repay_units = SafeMath::min(debt_units, covered);
    let (mut repay0, mut repay1) = post_pool.token_amounts_up(repay_units)?;
    if repay0.is_zero() || repay1.is_zero() || repay0 > balance0 || repay1 > balance1 {
        repay_units = U256::zero();
        repay0 = U256::zero();
        repay1 = U256::zero();
    }

    Ok(LiquidationPlan {
        swap,
        repay_units,
        repay0,
        repay1,
        leftover0: balance0 - repay0,
        leftover1: balance1 - repay1,
    })
}

/// Splits leftover collateral into the liquidator's bonus and the owner's remainder
pub fn split_bonus(leftover: U256, bonus_bps: u32) -> Result<(U256, U256), BammError> {
    let bonus = SafeMath::mul_div(leftover, U256::from(bonus_bps), U256::from(BPS))?;
    Ok((bonus, leftover - bonus))
}

/// Where the leftover collateral goes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Payouts {
    pub bonus0: U256,
    pub bonus1: U256,
    pub returned0: U256,
    pub returned1: U256,
}

/// Pays the leftover of `plan` out. The owner only gets a remainder when the
/// debt was repaid in full; after a shortfall the whole leftover is the
/// liquidator's.
pub fn payouts(
    plan: &LiquidationPlan,
    debt_units: U256,
    bonus_bps: u32,
) -> Result<Payouts, BammError> {
    if !plan.shortfall(debt_units).is_zero() {
        return Ok(Payouts {
            bonus0: plan.leftover0,
            bonus1: plan.leftover1,
            ..Payouts::default()
        });
    }
    let (bonus0, returned0) = split_bonus(plan.leftover0, bonus_bps)?;
    let (bonus1, returned1) = split_bonus(plan.leftover1, bonus_bps)?;
    Ok(Payouts { bonus0, bonus1, returned0, returned1 })
}

/// `|spot - oracle| * BPS <= oracle * max_divergence_bps`
pub fn price_within_bounds(
    spot: U256,
    oracle: U256,
    max_divergence_bps: u32,
) -> Result<bool, BammError> {
    if oracle.is_zero() {
        return Ok(false);
    }
    let divergence = SafeMath::mul(SafeMath::abs_diff(spot, oracle), U256::from(BPS))?;
    let allowed = SafeMath::mul(oracle, U256::from(max_divergence_bps))?;
    Ok(divergence <= allowed)
}

/// Smallest swap of the surplus token that covers the debt, or the balancing
/// swap when no swap can cover it
fn plan_swap(
    collateral0: U256,
    collateral1: U256,
    debt_units: U256,
    pool: &PoolSnapshot,
    fee_bps: u32,
    token0_in: bool,
) -> Result<Option<PlannedSwap>, BammError> {
    let surplus = if token0_in { collateral0 } else { collateral1 };

    let gets_short_side = |amount_in: U256| -> Result<bool, BammError> {
        let s = quote(pool, token0_in, amount_in, fee_bps)?;
        let (b0, b1, post) = apply_swap(collateral0, collateral1, pool, &s)?;
        let (n0, n1) = post.token_amounts_up(debt_units)?;
        Ok(if token0_in { b1 >= n1 } else { b0 >= n0 })
    };
    let keeps_long_side = |amount_in: U256| -> Result<bool, BammError> {
        let s = quote(pool, token0_in, amount_in, fee_bps)?;
        let (b0, b1, post) = apply_swap(collateral0, collateral1, pool, &s)?;
        let (n0, n1) = post.token_amounts_up(debt_units)?;
        Ok(if token0_in { b0 >= n0 } else { b1 >= n1 })
    };

    if gets_short_side(surplus)? {
        let mut low = U256::zero();
        let mut high = surplus;
        while high - low > U256::one() {
            let mid = low + (high - low) / 2;
            if gets_short_side(mid)? {
                high = mid;
            } else {
                low = mid;
            }
        }
        if keeps_long_side(high)? {
            return Ok(Some(quote(pool, token0_in, high, fee_bps)?));
        }
    }

    balancing_swap(collateral0, collateral1, pool, fee_bps)
}

/// Swap of whichever token is in surplus relative to the pool ratio, so that
/// the collateral can be added as liquidity with nothing left over
fn balancing_swap(
    collateral0: U256,
    collateral1: U256,
    pool: &PoolSnapshot,
    fee_bps: u32,
) -> Result<Option<PlannedSwap>, BammError> {
    let swap0 = UnbalancedLiquidity::balancing_swap_amount(
        collateral0, collateral1, pool.reserve0, pool.reserve1, fee_bps,
    )
    .map_err(|_| BammError::InsufficientLiquidity)?;
    if !swap0.is_zero() {
        return Ok(Some(quote(pool, true, swap0, fee_bps)?));
    }
    let swap1 = UnbalancedLiquidity::balancing_swap_amount(
        collateral1, collateral0, pool.reserve1, pool.reserve0, fee_bps,
    )
    .map_err(|_| BammError::InsufficientLiquidity)?;
    if !swap1.is_zero() {
        return Ok(Some(quote(pool, false, swap1, fee_bps)?));
    }
    Ok(None)
}

fn quote(
    pool: &PoolSnapshot,
    token0_in: bool,
    amount_in: U256,
    fee_bps: u32,
) -> Result<PlannedSwap, BammError> {
    let (reserve_in, reserve_out) = if token0_in {
        (pool.reserve0, pool.reserve1)
    } else {
        (pool.reserve1, pool.reserve0)
    };
    let amount_out = AmmMath::get_amount_out(amount_in, reserve_in, reserve_out, fee_bps)
        .map_err(|_| BammError::InsufficientLiquidity)?;
    Ok(PlannedSwap { token0_in, amount_in, amount_out })
}

/// Collateral and pool after `swap`
fn apply_swap(
    collateral0: U256,
    collateral1: U256,
    pool: &PoolSnapshot,
    swap: &PlannedSwap,
) -> Result<(U256, U256, PoolSnapshot), BammError> {
    if swap.token0_in {
        Ok((
            SafeMath::sub(collateral0, swap.amount_in)?,
            SafeMath::add(collateral1, swap.amount_out)?,
            PoolSnapshot::new(
                SafeMath::add(pool.reserve0, swap.amount_in)?,
                SafeMath::sub(pool.reserve1, swap.amount_out)?,
                pool.lp_supply,
            ),
        ))
    } else {
        Ok((
            SafeMath::add(collateral0, swap.amount_out)?,
            SafeMath::sub(collateral1, swap.amount_in)?,
            PoolSnapshot::new(
                SafeMath::sub(pool.reserve0, swap.amount_out)?,
                SafeMath::add(pool.reserve1, swap.amount_in)?,
                pool.lp_supply,
            ),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{precision, DEFAULT_FEE_BPS};

    fn e18(value: u64) -> U256 {
        precision() * value
    }

    fn pool() -> PoolSnapshot {
        PoolSnapshot::new(e18(100), e18(100), e18(100))
    }

    #[test]
    fn test_balanced_collateral_needs_no_swap() {
        let plan = plan_liquidation(e18(2), e18(2), e18(1), &pool(), DEFAULT_FEE_BPS).unwrap();
        assert_eq!(plan.swap, None);
        assert_eq!(plan.repay_units, e18(1));
        assert_eq!((plan.repay0, plan.repay1), (e18(1), e18(1)));
        assert_eq!((plan.leftover0, plan.leftover1), (e18(1), e18(1)));
        assert_eq!(plan.shortfall(e18(1)), U256::zero());
    }

    #[test]
    fn test_surplus_is_swapped_for_the_missing_token() {
        // Only token1 as collateral, 1 unit of debt
        let plan = plan_liquidation(U256::zero(), e18(3), e18(1), &pool(), DEFAULT_FEE_BPS).unwrap();
        let swap = plan.swap.unwrap();
        assert!(!swap.token0_in);
        assert!(swap.amount_out >= plan.repay0);
        assert_eq!(plan.repay_units, e18(1));
        // The swap takes a bit more than one token1 because of fee and price impact
        assert!(swap.amount_in > e18(1) && swap.amount_in < e18(1) + e18(1) / 10);
        assert!(!plan.leftover1.is_zero());
    }

    #[test]
    fn test_insufficient_collateral_is_repaid_partially() {
        // 1 token1 cannot cover 1 unit of debt in a 1:1 pool
        let plan = plan_liquidation(U256::zero(), e18(1), e18(1), &pool(), DEFAULT_FEE_BPS).unwrap();
        let swap = plan.swap.unwrap();
        assert!(!swap.token0_in);
        assert!(plan.repay_units < e18(1));
        assert!(plan.repay_units > e18(4) / 10);
        assert!(!plan.shortfall(e18(1)).is_zero());
        // Balanced before repaying, so almost nothing is left over
        assert!(plan.leftover0 + plan.leftover1 < e18(1) / 100);
    }

    #[test]
    fn test_collateral_short_on_both_sides_is_balanced() {
        // 4 token0 and 9 token1 against 10 units of debt: neither side covers it
        let debt = e18(10);
        let plan = plan_liquidation(e18(4), e18(9), debt, &pool(), DEFAULT_FEE_BPS).unwrap();
        let swap = plan.swap.unwrap();
        assert!(!swap.token0_in);
        // Repaying without the swap would stop at 4 units
        assert!(plan.repay_units > e18(6));
        assert!(plan.repay_units < e18(66) / 10);
        assert!(!plan.shortfall(debt).is_zero());
        assert!(plan.leftover0 + plan.leftover1 < e18(1) / 100);
    }

    #[test]
    fn test_shortfall_leftover_goes_to_liquidator() {
        let debt = e18(10);
        let plan = plan_liquidation(e18(4), e18(9), debt, &pool(), DEFAULT_FEE_BPS).unwrap();
        let paid = payouts(&plan, debt, 500).unwrap();
        assert_eq!((paid.returned0, paid.returned1), (U256::zero(), U256::zero()));
        assert_eq!((paid.bonus0, paid.bonus1), (plan.leftover0, plan.leftover1));
    }

    #[test]
    fn test_covered_debt_splits_leftover() {
        let plan = plan_liquidation(e18(2), e18(2), e18(1), &pool(), DEFAULT_FEE_BPS).unwrap();
        let paid = payouts(&plan, e18(1), 500).unwrap();
        assert_eq!(paid.bonus0, e18(1) / 20);
        assert_eq!(paid.returned0, e18(1) - e18(1) / 20);
        assert_eq!(paid.bonus1, e18(1) / 20);
        assert_eq!(paid.returned1, e18(1) - e18(1) / 20);
    }

    #[test]
    fn test_split_bonus() {
        let (bonus, rest) = split_bonus(e18(10), 500).unwrap();
        assert_eq!(bonus, e18(1) / 2);
        assert_eq!(rest, e18(10) - e18(1) / 2);
    }

    #[test]
    fn test_price_guard() {
        let oracle = e18(1);
        assert!(price_within_bounds(e18(1), oracle, 200).unwrap());
        assert!(price_within_bounds(precision() * 102 / 100, oracle, 200).unwrap());
        assert!(!price_within_bounds(precision() * 103 / 100, oracle, 200).unwrap());
        assert!(!price_within_bounds(precision() * 97 / 100, oracle, 200).unwrap());
        assert!(!price_within_bounds(e18(1), U256::zero(), 200).unwrap());
    }
}
