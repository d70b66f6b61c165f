//! Freely mintable CEP-18 token used as pool asset on test networks and in tests
use odra::prelude::*;
use odra::casper_types::U256;
use crate::token::Cep18Ledger;

/// Test-network token whose `mint` is open to anyone
#[odra::module]
pub struct FaucetToken {
    ledger: SubModule<Cep18Ledger>,
}

#[odra::module]
impl FaucetToken {
    pub fn init(&mut self, name: String, symbol: String, decimals: u8) {
        self.ledger.init(name, symbol, decimals);
    }

    pub fn name(&self) -> String { self.ledger.name() }
    pub fn symbol(&self) -> String { self.ledger.symbol() }
    pub fn decimals(&self) -> u8 { self.ledger.decimals() }
    pub fn total_supply(&self) -> U256 { self.ledger.total_supply() }
    pub fn balance_of(&self, owner: Address) -> U256 { self.ledger.balance_of(owner) }
    pub fn allowance(&self, owner: Address, spender: Address) -> U256 { self.ledger.allowance(owner, spender) }

    pub fn transfer(&mut self, to: Address, amount: U256) -> bool {
        self.ledger.transfer(to, amount)
    }

    pub fn approve(&mut self, spender: Address, amount: U256) -> bool {
        self.ledger.approve(spender, amount)
    }

    pub fn transfer_from(&mut self, from: Address, to: Address, amount: U256) -> bool {
        self.ledger.transfer_from(from, to, amount)
    }

    pub fn mint(&mut self, to: Address, amount: U256) {
        self.ledger.mint(to, amount);
    }
}
