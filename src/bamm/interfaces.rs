//! Collaborator interfaces the BAMM calls into

use odra::prelude::*;
use odra::casper_types::U256;

/// Constant-product pair whose liquidity is rented out
#[odra::external_contract]
pub trait Pool {
    fn token0(&self) -> Address;
    fn token1(&self) -> Address;
    fn fee_bps(&self) -> u32;
    fn get_reserves(&self) -> (U256, U256, u64);
    fn total_supply(&self) -> U256;
    fn balance_of(&self, owner: Address) -> U256;
    fn transfer(&mut self, to: Address, amount: U256) -> bool;
    fn transfer_from(&mut self, from: Address, to: Address, amount: U256) -> bool;
    fn swap(&mut self, amount0_out: U256, amount1_out: U256, to: Address);
    fn mint(&mut self, to: Address) -> U256;
    fn burn(&mut self, to: Address) -> (U256, U256);
    fn sync(&mut self);
}

/// Time-weighted price of token0 in token1, scaled by 1e18
#[odra::external_contract]
pub trait PriceOracle {
    fn consult(&self) -> U256;
    fn update(&mut self);
}

/// Exact-input swap router for in-vault swaps
#[odra::external_contract]
pub trait SwapRouter {
    fn swap_exact_input(
        &mut self,
        token_in: Address,
        amount_in: U256,
        token_out: Address,
        amount_out_minimum: U256,
        recipient: Address,
        deadline: u64,
    ) -> U256;
}
