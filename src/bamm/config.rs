//! Owner-tunable risk and fee parameters
use odra::prelude::*;
use super::errors::BammError;
use crate::math::BPS;

/// BAMM configuration, all values in basis points
#[odra::odra_type]
pub struct Config {
    /// Share of accrued interest minted to the owner as BAMM shares
    pub fee_share_bps: u32,
    /// Cap on rented liquidity relative to the LP-equivalent holdings
    pub max_utility_bps: u32,
    /// Allowed spot/oracle divergence for liquidations
    pub price_divergence_bps: u32,
    /// Liquidator's cut of the collateral left after repayment
    pub liquidation_bonus_bps: u32,
    /// Share of the collateral value that may be covered by debt
    pub solvency_threshold_bps: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fee_share_bps: 1_000,
            max_utility_bps: 9_000,
            price_divergence_bps: 200,
            liquidation_bonus_bps: 500,
            solvency_threshold_bps: 9_800,
        }
    }
}

impl Config {
    /// Rejects values that would break the solvency and utilization invariants
    pub fn validate(&self) -> Result<(), BammError> {
        let in_range = self.fee_share_bps <= BPS
            && self.max_utility_bps > 0
            && self.max_utility_bps < BPS
            && self.price_divergence_bps > 0
            && self.price_divergence_bps <= BPS
            && self.liquidation_bonus_bps <= BPS
            && self.solvency_threshold_bps > 0
            && self.solvency_threshold_bps <= BPS;
        if in_range {
            Ok(())
        } else {
            Err(BammError::InvalidConfiguration)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_out_of_range_values_are_rejected() {
        let full_utilization = Config { max_utility_bps: BPS, ..Config::default() };
        assert!(matches!(full_utilization.validate(), Err(BammError::InvalidConfiguration)));

        let lax_solvency = Config { solvency_threshold_bps: BPS + 1, ..Config::default() };
        assert!(lax_solvency.validate().is_err());

        let no_guard = Config { price_divergence_bps: 0, ..Config::default() };
        assert!(no_guard.validate().is_err());
    }
}
