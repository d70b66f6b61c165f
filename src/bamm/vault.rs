//! Per-user collateral and debt
use odra::prelude::*;
use odra::casper_types::U256;
use super::errors::BammError;
use super::rent::{PoolSnapshot, RentState};
use crate::math::{SafeMath, BPS};

/// A user's position. `rented` is normalized rent; live debt is
/// `rented * rented_multiplier`.
#[odra::odra_type]
#[derive(Default)]
pub struct Vault {
    pub token0: U256,
    pub token1: U256,
    pub rented: U256,
}

impl Vault {
    pub fn is_empty(&self) -> bool {
        self.token0.is_zero() && self.token1.is_zero() && self.rented.is_zero()
    }

    pub fn credit(&mut self, amount0: U256, amount1: U256) -> Result<(), BammError> {
        self.token0 = SafeMath::add(self.token0, amount0)?;
        self.token1 = SafeMath::add(self.token1, amount1)?;
        Ok(())
    }

    /// Removes tokens; a vault can never hold a negative balance
    pub fn debit(&mut self, amount0: U256, amount1: U256) -> Result<(), BammError> {
        if amount0 > self.token0 || amount1 > self.token1 {
            return Err(BammError::NegativePosition);
        }
        self.token0 -= amount0;
        self.token1 -= amount1;
        Ok(())
    }

    /// Live debt in liquidity units, rounded against the renter
    pub fn debt_units(&self, state: &RentState) -> Result<U256, BammError> {
        state.to_real_up(self.rented)
    }

    /// Collateral value in liquidity units at the pool's spot price
    pub fn collateral_units(&self, pool: &PoolSnapshot) -> Result<U256, BammError> {
        pool.value_in_units(self.token0, self.token1)
    }

    /// `debt * BPS <= collateral * threshold`; a vault without rent is always solvent
    pub fn is_solvent(
        &self,
        pool: &PoolSnapshot,
        state: &RentState,
        solvency_threshold_bps: u32,
    ) -> Result<bool, BammError> {
        if self.rented.is_zero() {
            return Ok(true);
        }
        let debt = SafeMath::mul(self.debt_units(state)?, U256::from(BPS))?;
        let backing = SafeMath::mul(
            self.collateral_units(pool)?,
            U256::from(solvency_threshold_bps),
        )?;
        Ok(debt <= backing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::precision;

    fn e14(value: u64) -> U256 {
        U256::from(value) * U256::from(100_000_000_000_000u64)
    }

    fn e18(value: u64) -> U256 {
        precision() * value
    }

    #[test]
    fn test_debit_never_goes_negative() {
        let mut vault = Vault { token0: e18(1), token1: e18(1), rented: U256::zero() };
        assert!(matches!(vault.debit(e18(2), U256::zero()), Err(BammError::NegativePosition)));
        assert_eq!(vault.token0, e18(1));
        vault.debit(e18(1), e18(1)).unwrap();
        assert!(vault.is_empty());
    }

    #[test]
    fn test_solvency_boundary_at_98_percent() {
        // 9 units rented out of a 1:1 pool, 10 of each token in the vault
        let pool = PoolSnapshot::new(e18(91), e18(91), e18(91));
        let state = RentState::new(0);
        let mut vault = Vault { token0: e18(10), token1: e18(10), rented: e18(9) };

        let mut too_much = vault.clone();
        too_much.debit(e14(8164), e14(8164)).unwrap();
        assert!(!too_much.is_solvent(&pool, &state, 9_800).unwrap());

        vault.debit(e14(8163), e14(8163)).unwrap();
        assert!(vault.is_solvent(&pool, &state, 9_800).unwrap());
    }

    #[test]
    fn test_interest_can_make_a_vault_insolvent() {
        let pool = PoolSnapshot::new(e18(100), e18(100), e18(100));
        let mut state = RentState::new(0);
        // 1.05 units of collateral against 1 unit of rent
        let vault = Vault { token0: e14(10_500), token1: e14(10_500), rented: e18(1) };
        assert!(vault.is_solvent(&pool, &state, 9_800).unwrap());

        state.rented_multiplier = precision() * 103 / 100;
        assert!(!vault.is_solvent(&pool, &state, 9_800).unwrap());
    }

    #[test]
    fn test_vault_without_rent_is_solvent() {
        let pool = PoolSnapshot::new(e18(100), e18(100), e18(100));
        let vault = Vault::default();
        assert!(vault.is_solvent(&pool, &RentState::new(0), 9_800).unwrap());
    }
}
