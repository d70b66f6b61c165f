//! Events for the BAMM

use odra::prelude::*;
use odra::casper_types::U256;

// ============================================================================
// Share Events
// ============================================================================

/// LP deposited in exchange for BAMM shares
#[odra::event]
pub struct SharesMinted {
    pub sender: Address,
    pub to: Address,
    pub lp_amount: U256,
    pub shares: U256,
    pub timestamp: u64,
}

/// BAMM shares burned for LP
#[odra::event]
pub struct SharesRedeemed {
    pub sender: Address,
    pub to: Address,
    pub shares: U256,
    pub lp_amount: U256,
    pub timestamp: u64,
}

// ============================================================================
// Rent Events
// ============================================================================

/// Interest accrued into the rent multiplier
#[odra::event]
pub struct InterestAccrued {
    /// Annual rate applied, scaled by 1e18
    pub rate: U256,
    pub rented_multiplier: U256,
    /// Interest in liquidity units
    pub interest: U256,
    /// Shares minted to the owner as protocol fee
    pub fee_shares: U256,
    pub timestamp: u64,
}

/// Liquidity rented into a vault
#[odra::event]
pub struct Rented {
    pub owner: Address,
    /// Normalized rent added
    pub rent: U256,
    /// LP burned to free the tokens
    pub lp_amount: U256,
    pub amount0: U256,
    pub amount1: U256,
}

/// Rent repaid from a vault
#[odra::event]
pub struct Repaid {
    pub owner: Address,
    /// Normalized rent removed
    pub rent: U256,
    pub amount0: U256,
    pub amount1: U256,
}

/// Vault state after a successful batch
#[odra::event]
pub struct VaultUpdated {
    pub owner: Address,
    pub token0: U256,
    pub token1: U256,
    pub rented: U256,
    pub timestamp: u64,
}

/// Swap executed inside a vault
#[odra::event]
pub struct VaultSwap {
    pub owner: Address,
    pub token_in: Address,
    pub amount_in: U256,
    pub amount_out: U256,
}

// ============================================================================
// Liquidation Events
// ============================================================================

/// Insolvent vault closed by a liquidator
#[odra::event]
pub struct Liquidated {
    pub owner: Address,
    pub liquidator: Address,
    /// Live debt units at liquidation
    pub debt: U256,
    /// Units repaid to the pool
    pub repaid: U256,
    pub bonus0: U256,
    pub bonus1: U256,
    pub returned0: U256,
    pub returned1: U256,
    pub timestamp: u64,
}

// ============================================================================
// Admin Events
// ============================================================================

#[odra::event]
pub struct OwnerNominated {
    pub current_owner: Address,
    pub nominee: Address,
}

#[odra::event]
pub struct OwnerChanged {
    pub previous_owner: Address,
    pub new_owner: Address,
}

#[odra::event]
pub struct ConfigUpdated {
    pub fee_share_bps: u32,
    pub max_utility_bps: u32,
    pub price_divergence_bps: u32,
    pub liquidation_bonus_bps: u32,
    pub solvency_threshold_bps: u32,
}

#[odra::event]
pub struct InterestRateParamsUpdated {
    pub base_rate: U256,
    pub optimal_utilization: U256,
    pub slope1: U256,
    pub slope2: U256,
}
