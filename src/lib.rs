#![cfg_attr(not(test), no_std)]
#![cfg_attr(not(test), no_main)]
extern crate alloc;

// BAMM: leveraged liquidity rental
pub mod bamm;

// Pool collaborators: pair, router, TWAP oracle
pub mod dex;
pub mod token;
pub mod tokens;
pub mod errors;
pub mod events;
pub mod math;
