//! CEP-18 ledger used as a submodule by every fungible token in the crate:
//! pair LP tokens, BAMM shares and the faucet tokens.
use odra::prelude::*;
use odra::casper_types::U256;
use crate::events::{Approval, Transfer};
use crate::errors::TokenError;

/// Balances, allowances and metadata of a CEP-18 token
#[odra::module]
pub struct Cep18Ledger {
    name: Var<String>,
    symbol: Var<String>,
    decimals: Var<u8>,
    total_supply: Var<U256>,
    balances: Mapping<Address, U256>,
    allowances: Mapping<(Address, Address), U256>,
}

#[odra::module]
impl Cep18Ledger {
    pub fn init(&mut self, name: String, symbol: String, decimals: u8) {
        self.name.set(name);
        self.symbol.set(symbol);
        self.decimals.set(decimals);
        self.total_supply.set(U256::zero());
    }

    pub fn name(&self) -> String {
        self.name.get_or_default()
    }

    pub fn symbol(&self) -> String {
        self.symbol.get_or_default()
    }

    pub fn decimals(&self) -> u8 {
        self.decimals.get_or_default()
    }

    pub fn total_supply(&self) -> U256 {
        self.total_supply.get_or_default()
    }

    pub fn balance_of(&self, owner: Address) -> U256 {
        self.balances.get(&owner).unwrap_or_default()
    }

    pub fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.allowances.get(&(owner, spender)).unwrap_or_default()
    }

    pub fn transfer(&mut self, to: Address, amount: U256) -> bool {
        let caller = self.env().caller();
        self.move_balance(caller, to, amount);
        true
    }

    pub fn approve(&mut self, spender: Address, amount: U256) -> bool {
        let caller = self.env().caller();
        self.set_allowance(caller, spender, amount);
        true
    }

    /// Spends the caller's allowance on `from`
    pub fn transfer_from(&mut self, from: Address, to: Address, amount: U256) -> bool {
        let caller = self.env().caller();
        let current_allowance = self.allowance(from, caller);
        if current_allowance < amount {
            self.env().revert(TokenError::InsufficientAllowance);
        }

        self.set_allowance(from, caller, current_allowance - amount);
        self.move_balance(from, to, amount);
        true
    }

    /// Creates `amount` new tokens; access control is left to the owning module
    pub fn mint(&mut self, to: Address, amount: U256) {
        self.total_supply.add(amount);
        self.balances.add(&to, amount);

        self.env().emit_event(Transfer {
            from: self.env().self_address(),
            to,
            value: amount,
        });
    }

    /// Destroys `amount` tokens held by `from`
    pub fn burn(&mut self, from: Address, amount: U256) {
        let current_balance = self.balance_of(from);
        if current_balance < amount {
            self.env().revert(TokenError::InsufficientBalance);
        }

        self.balances.set(&from, current_balance - amount);
        self.total_supply.subtract(amount);

        self.env().emit_event(Transfer {
            from,
            to: self.env().self_address(),
            value: amount,
        });
    }

    fn move_balance(&mut self, from: Address, to: Address, amount: U256) {
        let from_balance = self.balance_of(from);
        if from_balance < amount {
            self.env().revert(TokenError::InsufficientBalance);
        }

        self.balances.set(&from, from_balance - amount);
        self.balances.add(&to, amount);

        self.env().emit_event(Transfer {
            from,
            to,
            value: amount,
        });
    }

    fn set_allowance(&mut self, owner: Address, spender: Address, amount: U256) {
        self.allowances.set(&(owner, spender), amount);

        self.env().emit_event(Approval {
            owner,
            spender,
            value: amount,
        });
    }
}

/// External token interface for interacting with CEP-18 tokens
#[odra::external_contract]
pub trait Cep18Token {
    fn balance_of(&self, owner: Address) -> U256;

    fn transfer(&mut self, to: Address, amount: U256) -> bool;

    fn transfer_from(&mut self, from: Address, to: Address, amount: U256) -> bool;

    fn approve(&mut self, spender: Address, amount: U256) -> bool;

    fn allowance(&self, owner: Address, spender: Address) -> U256;

    fn total_supply(&self) -> U256;

    fn name(&self) -> String;

    fn symbol(&self) -> String;

    fn decimals(&self) -> u8;
}

#[cfg(test)]
mod tests {
    use super::*;
    use odra::host::{Deployer, HostEnv};

    fn setup() -> (HostEnv, Cep18LedgerHostRef) {
        let env = odra_test::env();
        let init_args = Cep18LedgerInitArgs {
            name: String::from("BAMM Share"),
            symbol: String::from("BAMM"),
            decimals: 18,
        };
        let token = Cep18Ledger::deploy(&env, init_args);
        (env, token)
    }

    #[test]
    fn test_init() {
        let (_, token) = setup();
        assert_eq!(token.name(), "BAMM Share");
        assert_eq!(token.symbol(), "BAMM");
        assert_eq!(token.decimals(), 18);
        assert_eq!(token.total_supply(), U256::zero());
    }

    #[test]
    fn test_mint_and_burn() {
        let (env, mut token) = setup();
        let user = env.get_account(1);
        let amount = U256::from(1000);

        token.mint(user, amount);
        assert_eq!(token.balance_of(user), amount);
        assert_eq!(token.total_supply(), amount);

        token.burn(user, U256::from(400));
        assert_eq!(token.balance_of(user), U256::from(600));
        assert_eq!(token.total_supply(), U256::from(600));

        assert_eq!(
            token.try_burn(user, U256::from(601)),
            Err(TokenError::InsufficientBalance.into())
        );
    }

    #[test]
    fn test_transfer_from_spends_allowance() {
        let (env, mut token) = setup();
        let owner = env.get_account(0);
        let spender = env.get_account(1);
        let receiver = env.get_account(2);
        token.mint(owner, U256::from(1000));

        env.set_caller(owner);
        token.approve(spender, U256::from(300));

        env.set_caller(spender);
        assert_eq!(
            token.try_transfer_from(owner, receiver, U256::from(301)),
            Err(TokenError::InsufficientAllowance.into())
        );
        token.transfer_from(owner, receiver, U256::from(300));

        assert_eq!(token.balance_of(receiver), U256::from(300));
        assert_eq!(token.balance_of(owner), U256::from(700));
        assert_eq!(token.allowance(owner, spender), U256::zero());
    }
}
