//! Router for exact-input swaps through the configured pair
//!
//! The BAMM uses it for in-vault swaps: input is pulled from the caller,
//! output goes to `recipient`, and the call reverts below the minimum output
//! or past the deadline.
use odra::prelude::*;
use odra::casper_types::U256;
use odra::ContractRef;
use crate::dex::PairContractContractRef;
use crate::errors::DexError;
use crate::math::AmmMath;
use crate::token::Cep18TokenContractRef;

#[odra::module]
pub struct Router {
    /// Pair every swap is routed through
    pair: Var<Address>,
}

#[odra::module]
impl Router {
    pub fn init(&mut self, pair: Address) {
        self.pair.set(pair);
    }

    pub fn pair(&self) -> Address {
        self.pair.get_or_revert_with(DexError::InvalidPair)
    }

    /// Quote for swapping `amount_in` of `token_in`
    pub fn get_amount_out(&self, token_in: Address, amount_in: U256, token_out: Address) -> U256 {
        let pair = PairContractContractRef::new(self.env(), self.pair());
        let (reserve_in, reserve_out) = self.oriented_reserves(&pair, token_in, token_out);
        AmmMath::get_amount_out(amount_in, reserve_in, reserve_out, pair.fee_bps())
            .unwrap_or_revert(&self.env())
    }

    /// Swaps exactly `amount_in` of `token_in` held by the caller for `token_out`.
    /// `deadline` is a block time in ms, zero disables the check.
    pub fn swap_exact_input(
        &mut self,
        token_in: Address,
        amount_in: U256,
        token_out: Address,
        amount_out_minimum: U256,
        recipient: Address,
        deadline: u64,
    ) -> U256 {
        self.ensure_deadline(deadline);

        let pair_address = self.pair();
        let mut pair = PairContractContractRef::new(self.env(), pair_address);
        let (reserve_in, reserve_out) = self.oriented_reserves(&pair, token_in, token_out);
        let amount_out = AmmMath::get_amount_out(amount_in, reserve_in, reserve_out, pair.fee_bps())
            .unwrap_or_revert(&self.env());
        if amount_out < amount_out_minimum {
            self.env().revert(DexError::InsufficientOutputAmount);
        }

        self.safe_transfer_from(token_in, self.env().caller(), pair_address, amount_in);
        if token_in == pair.token0() {
            pair.swap(U256::zero(), amount_out, recipient);
        } else {
            pair.swap(amount_out, U256::zero(), recipient);
        }

        amount_out
    }
}

impl Router {
    fn ensure_deadline(&self, deadline: u64) {
        if deadline != 0 && self.env().get_block_time() > deadline {
            self.env().revert(DexError::DeadlineExpired);
        }
    }

    fn oriented_reserves(
        &self,
        pair: &PairContractContractRef,
        token_in: Address,
        token_out: Address,
    ) -> (U256, U256) {
        let token0 = pair.token0();
        let token1 = pair.token1();
        let (reserve0, reserve1, _) = pair.get_reserves();
        if token_in == token0 && token_out == token1 {
            (reserve0, reserve1)
        } else if token_in == token1 && token_out == token0 {
            (reserve1, reserve0)
        } else {
            self.env().revert(DexError::InvalidPair)
        }
    }

    fn safe_transfer_from(&self, token: Address, from: Address, to: Address, amount: U256) {
        let mut token_ref = Cep18TokenContractRef::new(self.env(), token);
        if !token_ref.transfer_from(from, to, amount) {
            self.env().revert(DexError::TransferFailed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dex::pair::{Pair, PairHostRef, PairInitArgs};
    use crate::tokens::{FaucetToken, FaucetTokenHostRef, FaucetTokenInitArgs};
    use odra::host::{Deployer, HostEnv, HostRef};

    struct Fixture {
        env: HostEnv,
        pair: PairHostRef,
        router: RouterHostRef,
        token0: FaucetTokenHostRef,
        token1: FaucetTokenHostRef,
    }

    fn setup() -> Fixture {
        let env = odra_test::env();
        let deploy_token = |symbol: &str| {
            FaucetToken::deploy(
                &env,
                FaucetTokenInitArgs {
                    name: String::from(symbol),
                    symbol: String::from(symbol),
                    decimals: 18,
                },
            )
        };
        let a = deploy_token("TKA");
        let b = deploy_token("TKB");
        let mut pair = Pair::deploy(
            &env,
            PairInitArgs { token_a: a.address().clone(), token_b: b.address().clone(), fee_bps: 30 },
        );
        let (mut token0, mut token1) =
            if pair.token0() == a.address().clone() { (a, b) } else { (b, a) };
        token0.mint(pair.address().clone(), U256::from(1_000_000));
        token1.mint(pair.address().clone(), U256::from(1_000_000));
        pair.mint(env.get_account(0));

        let router = Router::deploy(&env, RouterInitArgs { pair: pair.address().clone() });
        Fixture { env, pair, router, token0, token1 }
    }

    #[test]
    fn test_swap_exact_input() {
        let mut f = setup();
        let trader = f.env.get_account(1);
        let recipient = f.env.get_account(2);
        f.token0.mint(trader, U256::from(10_000));

        f.env.set_caller(trader);
        f.token0.approve(f.router.address().clone(), U256::from(10_000));
        let quote = f.router.get_amount_out(
            f.token0.address().clone(),
            U256::from(10_000),
            f.token1.address().clone(),
        );
        let out = f.router.swap_exact_input(
            f.token0.address().clone(),
            U256::from(10_000),
            f.token1.address().clone(),
            quote,
            recipient,
            0,
        );

        assert_eq!(out, quote);
        assert_eq!(f.token1.balance_of(recipient), quote);
        assert_eq!(f.token0.balance_of(trader), U256::zero());
        let (reserve0, _, _) = f.pair.get_reserves();
        assert_eq!(reserve0, U256::from(1_010_000));
    }

    #[test]
    fn test_swap_reverts_below_minimum_or_after_deadline() {
        let mut f = setup();
        let trader = f.env.get_account(1);
        f.token0.mint(trader, U256::from(10_000));
        f.env.set_caller(trader);
        f.token0.approve(f.router.address().clone(), U256::from(10_000));

        let token0 = f.token0.address().clone();
        let token1 = f.token1.address().clone();
        assert_eq!(
            f.router.try_swap_exact_input(token0, U256::from(10_000), token1, U256::from(10_000), trader, 0),
            Err(DexError::InsufficientOutputAmount.into())
        );

        f.env.advance_block_time(10_000);
        assert_eq!(
            f.router.try_swap_exact_input(token0, U256::from(10_000), token1, U256::zero(), trader, 1),
            Err(DexError::DeadlineExpired.into())
        );
    }

    #[test]
    fn test_unknown_token_is_rejected() {
        let mut f = setup();
        let stranger = f.env.get_account(5);
        let token0 = f.token0.address().clone();
        assert_eq!(
            f.router.try_swap_exact_input(token0, U256::from(1), stranger, U256::zero(), stranger, 0),
            Err(DexError::InvalidPair.into())
        );
    }
}
