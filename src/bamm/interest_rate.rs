//! Utilization-based rent rate
//!
//! Two-slope model:
//! - below the optimal utilization the rate climbs gently from the base rate
//! - above it the rate climbs steeply to push utilization back down
//!
//! The multiplier grows linearly within one accrual and compounds across accruals.

use odra::prelude::*;
use odra::casper_types::U256;
use super::errors::BammError;
use crate::math::{precision, SafeMath};

/// Milliseconds in a 365 day year
pub const YEAR_MS: u64 = 365 * 24 * 60 * 60 * 1000;

/// Interest rate curve parameters, annual and scaled by 1e18
#[odra::odra_type]
pub struct InterestRateParams {
    /// Rate at zero utilization
    pub base_rate: U256,
    /// Kink of the curve
    pub optimal_utilization: U256,
    /// Rate added between zero and optimal utilization
    pub slope1: U256,
    /// Rate added between optimal and full utilization
    pub slope2: U256,
}

impl Default for InterestRateParams {
    fn default() -> Self {
        Self {
            base_rate: U256::from(10_000_000_000_000_000u128),           // 1%
            optimal_utilization: U256::from(800_000_000_000_000_000u128), // 80%
            slope1: U256::from(40_000_000_000_000_000u128),              // 4%
            slope2: U256::from(3_000_000_000_000_000_000u128),           // 300%
        }
    }
}

impl InterestRateParams {
    pub fn validate(&self) -> Result<(), BammError> {
        if self.optimal_utilization.is_zero() || self.optimal_utilization >= precision() {
            return Err(BammError::InvalidConfiguration);
        }
        Ok(())
    }

    /// Annual rate for a utilization in [0, 1e18]
    ///
    /// - `u <= optimal`: `base + u / optimal * slope1`
    /// - `u > optimal`: `base + slope1 + (u - optimal) / (1 - optimal) * slope2`
    pub fn borrow_rate(&self, utilization: U256) -> Result<U256, BammError> {
        let scale = precision();
        let utilization = SafeMath::min(utilization, scale);
        if utilization <= self.optimal_utilization {
            let increase = SafeMath::mul_div(utilization, self.slope1, self.optimal_utilization)?;
            Ok(SafeMath::add(self.base_rate, increase)?)
        } else {
            let excess = utilization - self.optimal_utilization;
            let excess_ratio = SafeMath::mul_div(excess, scale, scale - self.optimal_utilization)?;
            let excess_rate = SafeMath::mul_div(excess_ratio, self.slope2, scale)?;
            Ok(SafeMath::add(SafeMath::add(self.base_rate, self.slope1)?, excess_rate)?)
        }
    }
}

/// `rented / (rented + available)`, scaled by 1e18
pub fn utilization(rented: U256, available: U256) -> Result<U256, BammError> {
    if rented.is_zero() {
        return Ok(U256::zero());
    }
    Ok(SafeMath::mul_div(rented, precision(), SafeMath::add(rented, available)?)?)
}

/// `multiplier * (1 + rate * elapsed / year)`
pub fn grow_multiplier(multiplier: U256, rate: U256, elapsed_ms: u64) -> Result<U256, BammError> {
    let year_scaled = SafeMath::mul(U256::from(YEAR_MS), precision())?;
    let growth = SafeMath::mul_div(
        SafeMath::mul(multiplier, rate)?,
        U256::from(elapsed_ms),
        year_scaled,
    )?;
    Ok(SafeMath::add(multiplier, growth)?)
}
