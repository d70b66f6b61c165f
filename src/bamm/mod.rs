//! BAMM: leveraged liquidity rental on top of a constant-product pair
//!
//! LP holders deposit pair liquidity for BAMM shares and earn interest from
//! renters. Renters borrow that liquidity into isolated vaults, as the two
//! underlying tokens, and must keep the vault solvent or be liquidated.

pub mod action;
pub mod config;
pub mod contract;
pub mod errors;
pub mod events;
pub mod interest_rate;
pub mod interfaces;
pub mod liquidation;
pub mod ownership;
pub mod rent;
pub mod shares;
pub mod vault;


pub use action::{Action, SignedAmount, SwapParams};
pub use config::Config;
pub use contract::Bamm;
pub use errors::BammError;
pub use events::*;
pub use interest_rate::InterestRateParams;
pub use vault::Vault;
