//! Rent accounting in `sqrt(reserve0 * reserve1)` liquidity units
//!
//! Debt is stored normalized (divided by the multiplier at the time of rent)
//! so accrual only touches `rented_multiplier`.
use odra::prelude::*;
use odra::casper_types::U256;
use super::errors::BammError;
use crate::math::{precision, SafeMath, BPS};

/// Reserves and LP supply of the pair at one point in time
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PoolSnapshot {
    pub reserve0: U256,
    pub reserve1: U256,
    pub lp_supply: U256,
}

impl PoolSnapshot {
    pub fn new(reserve0: U256, reserve1: U256, lp_supply: U256) -> Self {
        Self { reserve0, reserve1, lp_supply }
    }

    pub fn sqrt_k(&self) -> U256 {
        SafeMath::sqrt(self.reserve0 * self.reserve1)
    }

    /// Liquidity units represented by `lp` pool tokens
    pub fn lp_to_units(&self, lp: U256) -> Result<U256, BammError> {
        Ok(SafeMath::mul_div(lp, self.sqrt_k(), self.lp_supply)?)
    }

    /// Pool tokens representing `units`, rounded down
    pub fn units_to_lp(&self, units: U256) -> Result<U256, BammError> {
        Ok(SafeMath::mul_div(units, self.lp_supply, self.sqrt_k())?)
    }

    /// Tokens making up `units` of liquidity, rounded down
    pub fn token_amounts(&self, units: U256) -> Result<(U256, U256), BammError> {
        let k = self.sqrt_k();
        Ok((
            SafeMath::mul_div(units, self.reserve0, k)?,
            SafeMath::mul_div(units, self.reserve1, k)?,
        ))
    }

    /// Tokens needed to put `units` of liquidity back, rounded up
    pub fn token_amounts_up(&self, units: U256) -> Result<(U256, U256), BammError> {
        let k = self.sqrt_k();
        Ok((
            SafeMath::mul_div_up(units, self.reserve0, k)?,
            SafeMath::mul_div_up(units, self.reserve1, k)?,
        ))
    }

    /// Value of a token pair in liquidity units at the spot price:
    /// `(amount0 * reserve1 + amount1 * reserve0) / (2 * sqrt_k)`
    pub fn value_in_units(&self, amount0: U256, amount1: U256) -> Result<U256, BammError> {
        let numerator = SafeMath::add(
            SafeMath::mul(amount0, self.reserve1)?,
            SafeMath::mul(amount1, self.reserve0)?,
        )?;
        Ok(SafeMath::div(numerator, SafeMath::mul(self.sqrt_k(), U256::from(2))?)?)
    }

    /// Price of token0 in token1, scaled by 1e18
    pub fn spot_price0(&self) -> Result<U256, BammError> {
        Ok(SafeMath::mul_div(self.reserve1, precision(), self.reserve0)?)
    }
}

/// Global rent bookkeeping
#[odra::odra_type]
pub struct RentState {
    /// Sum of all vaults' normalized rent
    pub total_rented: U256,
    /// Growth factor of rent since launch, scaled by 1e18
    pub rented_multiplier: U256,
    /// Block time (ms) of the last accrual
    pub last_accrual: u64,
}

impl RentState {
    pub fn new(now: u64) -> Self {
        Self {
            total_rented: U256::zero(),
            rented_multiplier: precision(),
            last_accrual: now,
        }
    }

    /// Live liquidity units owed for `normalized` rent, rounded down
    pub fn to_real(&self, normalized: U256) -> Result<U256, BammError> {
        Ok(SafeMath::mul_div(normalized, self.rented_multiplier, precision())?)
    }

    /// Live liquidity units owed for `normalized` rent, rounded up
    pub fn to_real_up(&self, normalized: U256) -> Result<U256, BammError> {
        Ok(SafeMath::mul_div_up(normalized, self.rented_multiplier, precision())?)
    }

    /// Live units owed by all vaults
    pub fn total_real(&self) -> Result<U256, BammError> {
        self.to_real(self.total_rented)
    }
}

/// Rejects rent that would push real rented units above `max_utility_bps`
/// of the instance's LP-equivalent liquidity
pub fn check_utilization(
    real_rented_after: U256,
    real_rented_before: U256,
    held_units: U256,
    max_utility_bps: u32,
) -> Result<(), BammError> {
    let total_units = SafeMath::add(held_units, real_rented_before)?;
    let used = SafeMath::mul(real_rented_after, U256::from(BPS))?;
    let cap = SafeMath::mul(total_units, U256::from(max_utility_bps))?;
    if used > cap {
        return Err(BammError::MaxUtilityRate);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn e18(value: u64) -> U256 {
        precision() * value
    }

    #[test]
    fn test_units_follow_sqrt_k() {
        // 100 token0 / 400 token1: sqrt_k = 200, supply 200
        let pool = PoolSnapshot::new(e18(100), e18(400), e18(200));
        assert_eq!(pool.sqrt_k(), e18(200));
        assert_eq!(pool.lp_to_units(e18(10)).unwrap(), e18(10));
        assert_eq!(pool.token_amounts(e18(10)).unwrap(), (e18(5), e18(20)));
        // 5 token0 + 20 token1 are worth exactly 10 units at spot
        assert_eq!(pool.value_in_units(e18(5), e18(20)).unwrap(), e18(10));
        // The same value held in one token is worth the same
        assert_eq!(pool.value_in_units(e18(10), U256::zero()).unwrap(), e18(10));
    }

    #[test]
    fn test_rounding_direction() {
        let pool = PoolSnapshot::new(U256::from(3), U256::from(3), U256::from(3));
        assert_eq!(pool.token_amounts(U256::from(1)).unwrap(), (U256::one(), U256::one()));
        let pool = PoolSnapshot::new(U256::from(10), U256::from(1000), U256::from(100));
        // sqrt_k = 100, 7 units = 0.7 token0 / 70 token1
        assert_eq!(pool.token_amounts(U256::from(7)).unwrap(), (U256::zero(), U256::from(70)));
        assert_eq!(pool.token_amounts_up(U256::from(7)).unwrap(), (U256::one(), U256::from(70)));
    }

    #[test]
    fn test_normalized_rent() {
        let mut state = RentState::new(0);
        assert_eq!(state.to_real(e18(3)).unwrap(), e18(3));
        state.rented_multiplier = precision() * 3 / 2;
        state.total_rented = e18(2);
        assert_eq!(state.total_real().unwrap(), e18(3));
        assert_eq!(state.to_real_up(U256::one()).unwrap(), U256::from(2));
    }

    #[test]
    fn test_utilization_cap() {
        // 10 units held, nothing rented yet, cap 90%
        assert!(check_utilization(e18(9), U256::zero(), e18(10), 9_000).is_ok());
        assert!(matches!(
            check_utilization(precision() * 91 / 10, U256::zero(), e18(10), 9_000),
            Err(BammError::MaxUtilityRate)
        ));
        // 1 unit held, 8 rented: total 9, after renting 0.1 more: 8.1 <= 8.1
        assert!(check_utilization(precision() * 81 / 10, e18(8), e18(1), 9_000).is_ok());
    }
}
