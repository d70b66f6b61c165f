//! Pool collaborators of the BAMM: the constant-product pair, a single-pair
//! router and a TWAP oracle reading the pair's cumulative prices.

pub mod pair;
pub mod router;
pub mod twap_oracle;

use odra::prelude::*;
use odra::casper_types::U256;

pub use pair::Pair;
pub use router::Router;
pub use twap_oracle::TwapOracle;

/// Pair entry points used by the router and the oracle
#[odra::external_contract]
pub trait PairContract {
    fn token0(&self) -> Address;
    fn token1(&self) -> Address;
    fn fee_bps(&self) -> u32;
    fn get_reserves(&self) -> (U256, U256, u64);
    fn current_cumulative_prices(&self) -> (U256, U256, u64);
    fn swap(&mut self, amount0_out: U256, amount1_out: U256, to: Address);
}
