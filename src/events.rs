//! Events emitted by the pool collaborators and the token layer
use odra::prelude::*;
use odra::casper_types::U256;

/// Event emitted when liquidity is added to a pool
#[odra::event]
pub struct LiquidityAdded {
    /// Address receiving the LP tokens
    pub provider: Address,
    /// Address of the pair
    pub pair: Address,
    /// Amount of token0 added
    pub amount0: U256,
    /// Amount of token1 added
    pub amount1: U256,
    /// LP tokens minted
    pub liquidity: U256,
}

/// Event emitted when liquidity is removed from a pool
#[odra::event]
pub struct LiquidityRemoved {
    /// Address receiving the underlying tokens
    pub provider: Address,
    /// Address of the pair
    pub pair: Address,
    /// Amount of token0 removed
    pub amount0: U256,
    /// Amount of token1 removed
    pub amount1: U256,
    /// LP tokens burned
    pub liquidity: U256,
}

/// Event emitted when a swap occurs
#[odra::event]
pub struct Swap {
    /// Address of the sender
    pub sender: Address,
    /// Address of the pair
    pub pair: Address,
    /// Amount of token0 in
    pub amount0_in: U256,
    /// Amount of token1 in
    pub amount1_in: U256,
    /// Amount of token0 out
    pub amount0_out: U256,
    /// Amount of token1 out
    pub amount1_out: U256,
    /// Address receiving the output
    pub to: Address,
}

/// Event emitted when reserves are synced
#[odra::event]
pub struct Sync {
    /// Address of the pair
    pub pair: Address,
    /// Reserve of token0
    pub reserve0: U256,
    /// Reserve of token1
    pub reserve1: U256,
}

/// Event emitted when the oracle closes a new averaging window
#[odra::event]
pub struct OracleUpdated {
    /// Average price of token0 in token1 over the window, scaled by 1e18
    pub price0_average: U256,
    /// Window length in milliseconds
    pub window: u64,
    pub timestamp: u64,
}

/// CEP-18 transfer
#[odra::event]
pub struct Transfer {
    pub from: Address,
    pub to: Address,
    pub value: U256,
}

/// CEP-18 approval
#[odra::event]
pub struct Approval {
    pub owner: Address,
    pub spender: Address,
    pub value: U256,
}
