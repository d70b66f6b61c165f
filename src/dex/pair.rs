//! Constant-product pair backing a BAMM instance
//!
//! The pair holds reserves of two tokens and allows:
//! - Adding liquidity (minting LP tokens)
//! - Removing liquidity (burning LP tokens)
//! - Swapping tokens against a configurable fee
//! - Accumulating time-weighted prices for the TWAP oracle
use odra::prelude::*;
use odra::casper_types::U256;
use odra::ContractRef;
use crate::errors::DexError;
use crate::events::{LiquidityAdded, LiquidityRemoved, Swap, Sync};
use crate::math::{precision, AmmMath, SafeMath, UnbalancedLiquidity, BPS, MINIMUM_LIQUIDITY};
use crate::token::{Cep18Ledger, Cep18TokenContractRef};

/// Highest fee a pair accepts (10%)
const MAX_FEE_BPS: u32 = 1_000;

/// Liquidity pair contract
#[odra::module(events = [LiquidityAdded, LiquidityRemoved, Swap, Sync])]
pub struct Pair {
    /// LP token for this pair
    lp_token: SubModule<Cep18Ledger>,
    token0: Var<Address>,
    token1: Var<Address>,
    reserve0: Var<U256>,
    reserve1: Var<U256>,
    /// Block time (ms) of last reserve update
    block_timestamp_last: Var<u64>,
    /// Sum of `price0 * elapsed_ms`, price scaled by 1e18
    price0_cumulative_last: Var<U256>,
    /// Sum of `price1 * elapsed_ms`, price scaled by 1e18
    price1_cumulative_last: Var<U256>,
    /// Swap fee in basis points
    fee_bps: Var<u32>,
    /// LP held by the pair itself that can never be burned
    locked_liquidity: Var<U256>,
    /// Reentrancy lock
    locked: Var<bool>,
}

#[odra::module]
impl Pair {
    /// Initialize the pair with two token addresses and the swap fee
    pub fn init(&mut self, token_a: Address, token_b: Address, fee_bps: u32) {
        if token_a == token_b {
            self.env().revert(DexError::IdenticalAddresses);
        }
        if fee_bps > MAX_FEE_BPS {
            self.env().revert(DexError::InvalidFee);
        }
        let (t0, t1) = if token_a < token_b {
            (token_a, token_b)
        } else {
            (token_b, token_a)
        };

        self.token0.set(t0);
        self.token1.set(t1);
        self.fee_bps.set(fee_bps);
        self.reserve0.set(U256::zero());
        self.reserve1.set(U256::zero());
        self.locked.set(false);

        self.lp_token
            .init(String::from("BAMM Pool LP"), String::from("BPLP"), 18);
    }

    pub fn token0(&self) -> Address {
        self.token0.get_or_revert_with(DexError::InvalidPair)
    }

    pub fn token1(&self) -> Address {
        self.token1.get_or_revert_with(DexError::InvalidPair)
    }

    pub fn fee_bps(&self) -> u32 {
        self.fee_bps.get_or_default()
    }

    /// Current reserves and the block time of the last update
    pub fn get_reserves(&self) -> (U256, U256, u64) {
        (
            self.reserve0.get_or_default(),
            self.reserve1.get_or_default(),
            self.block_timestamp_last.get_or_default(),
        )
    }

    pub fn price0_cumulative_last(&self) -> U256 {
        self.price0_cumulative_last.get_or_default()
    }

    pub fn price1_cumulative_last(&self) -> U256 {
        self.price1_cumulative_last.get_or_default()
    }

    /// Cumulative prices extrapolated to the current block time, as the oracle sees them
    pub fn current_cumulative_prices(&self) -> (U256, U256, u64) {
        let now = self.env().get_block_time();
        let (reserve0, reserve1, last) = self.get_reserves();
        let mut price0 = self.price0_cumulative_last();
        let mut price1 = self.price1_cumulative_last();
        if now > last && !reserve0.is_zero() && !reserve1.is_zero() {
            let (p0, p1) = self.accumulated(reserve0, reserve1, now - last);
            price0 = SafeMath::add(price0, p0).unwrap_or_revert(&self.env());
            price1 = SafeMath::add(price1, p1).unwrap_or_revert(&self.env());
        }
        (price0, price1, now)
    }

    /// Output of an exact-input swap at current reserves
    pub fn get_amount_out(&self, amount_in: U256, token_in: Address) -> U256 {
        let (reserve_in, reserve_out) = self.oriented_reserves(token_in);
        AmmMath::get_amount_out(amount_in, reserve_in, reserve_out, self.fee_bps())
            .unwrap_or_revert(&self.env())
    }

    /// Input of `token_in` needed to receive exactly `amount_out` of the other token
    pub fn get_amount_in(&self, amount_out: U256, token_in: Address) -> U256 {
        let (reserve_in, reserve_out) = self.oriented_reserves(token_in);
        AmmMath::get_amount_in(amount_out, reserve_in, reserve_out, self.fee_bps())
            .unwrap_or_revert(&self.env())
    }

    /// LP that `amount0`/`amount1` would mint once the surplus side is swapped
    /// to the pool ratio. Returns `(liquidity, swap_amount, swap_token0_in)`.
    pub fn estimate_liquidity(&self, amount0: U256, amount1: U256) -> (U256, U256, bool) {
        let (reserve0, reserve1, _) = self.get_reserves();
        UnbalancedLiquidity::estimate_liquidity(
            amount0,
            amount1,
            reserve0,
            reserve1,
            self.total_supply(),
            self.fee_bps(),
        )
        .unwrap_or_revert(&self.env())
    }

    pub fn name(&self) -> String {
        self.lp_token.name()
    }

    pub fn symbol(&self) -> String {
        self.lp_token.symbol()
    }

    pub fn decimals(&self) -> u8 {
        self.lp_token.decimals()
    }

    pub fn total_supply(&self) -> U256 {
        self.lp_token.total_supply()
    }

    pub fn balance_of(&self, owner: Address) -> U256 {
        self.lp_token.balance_of(owner)
    }

    pub fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.lp_token.allowance(owner, spender)
    }

    pub fn transfer(&mut self, to: Address, amount: U256) -> bool {
        self.lp_token.transfer(to, amount)
    }

    pub fn approve(&mut self, spender: Address, amount: U256) -> bool {
        self.lp_token.approve(spender, amount)
    }

    pub fn transfer_from(&mut self, from: Address, to: Address, amount: U256) -> bool {
        self.lp_token.transfer_from(from, to, amount)
    }

    /// Mints LP for the tokens sent to the pair since the last update
    pub fn mint(&mut self, to: Address) -> U256 {
        self.lock();

        let (reserve0, reserve1, _) = self.get_reserves();
        let balance0 = self.get_token_balance(self.token0());
        let balance1 = self.get_token_balance(self.token1());
        let amount0 = SafeMath::sub(balance0, reserve0).unwrap_or_revert(&self.env());
        let amount1 = SafeMath::sub(balance1, reserve1).unwrap_or_revert(&self.env());

        let total_supply = self.total_supply();
        let liquidity = AmmMath::calculate_liquidity(
            amount0,
            amount1,
            reserve0,
            reserve1,
            total_supply,
        )
        .unwrap_or_revert(&self.env());

        if total_supply.is_zero() {
            let self_addr = self.env().self_address();
            let minimum = U256::from(MINIMUM_LIQUIDITY);
            self.lp_token.mint(self_addr, minimum);
            self.locked_liquidity.set(minimum);
        }
        if liquidity.is_zero() {
            self.env().revert(DexError::InsufficientLiquidityMinted);
        }

        self.lp_token.mint(to, liquidity);
        self.update_reserves(balance0, balance1, reserve0, reserve1);

        self.env().emit_event(LiquidityAdded {
            provider: to,
            pair: self.env().self_address(),
            amount0,
            amount1,
            liquidity,
        });

        self.unlock();
        liquidity
    }

    /// Burns the LP sent to the pair and pays out the underlying tokens
    pub fn burn(&mut self, to: Address) -> (U256, U256) {
        self.lock();

        let (reserve0, reserve1, _) = self.get_reserves();
        let token0 = self.token0();
        let token1 = self.token1();
        let balance0 = self.get_token_balance(token0);
        let balance1 = self.get_token_balance(token1);

        let self_addr = self.env().self_address();
        let liquidity = SafeMath::sub(
            self.lp_token.balance_of(self_addr),
            self.locked_liquidity.get_or_default(),
        )
        .unwrap_or_revert(&self.env());
        let total_supply = self.total_supply();
        if total_supply.is_zero() {
            self.env().revert(DexError::InsufficientLiquidity);
        }

        let amount0 = SafeMath::mul_div(liquidity, balance0, total_supply)
            .unwrap_or_revert(&self.env());
        let amount1 = SafeMath::mul_div(liquidity, balance1, total_supply)
            .unwrap_or_revert(&self.env());
        if amount0.is_zero() && amount1.is_zero() {
            self.env().revert(DexError::InsufficientLiquidityBurned);
        }

        self.lp_token.burn(self_addr, liquidity);
        self.safe_transfer(token0, to, amount0);
        self.safe_transfer(token1, to, amount1);

        self.update_reserves(balance0 - amount0, balance1 - amount1, reserve0, reserve1);

        self.env().emit_event(LiquidityRemoved {
            provider: to,
            pair: self_addr,
            amount0,
            amount1,
            liquidity,
        });

        self.unlock();
        (amount0, amount1)
    }

    /// Optimistic swap: sends the outputs, then checks that enough input arrived
    pub fn swap(&mut self, amount0_out: U256, amount1_out: U256, to: Address) {
        self.lock();

        if amount0_out.is_zero() && amount1_out.is_zero() {
            self.env().revert(DexError::InsufficientOutputAmount);
        }
        let (reserve0, reserve1, _) = self.get_reserves();
        if amount0_out >= reserve0 || amount1_out >= reserve1 {
            self.env().revert(DexError::InsufficientLiquidity);
        }

        let token0 = self.token0();
        let token1 = self.token1();
        if to == token0 || to == token1 {
            self.env().revert(DexError::InvalidPair);
        }

        if !amount0_out.is_zero() {
            self.safe_transfer(token0, to, amount0_out);
        }
        if !amount1_out.is_zero() {
            self.safe_transfer(token1, to, amount1_out);
        }

        let balance0 = self.get_token_balance(token0);
        let balance1 = self.get_token_balance(token1);
        let remaining0 = reserve0 - amount0_out;
        let remaining1 = reserve1 - amount1_out;
        let amount0_in = if balance0 > remaining0 { balance0 - remaining0 } else { U256::zero() };
        let amount1_in = if balance1 > remaining1 { balance1 - remaining1 } else { U256::zero() };
        if amount0_in.is_zero() && amount1_in.is_zero() {
            self.env().revert(DexError::InsufficientInputAmount);
        }

        let k_holds = AmmMath::verify_k_invariant(
            (reserve0, reserve1),
            (balance0, balance1),
            (amount0_in, amount1_in),
            self.fee_bps(),
        )
        .unwrap_or_revert(&self.env());
        if !k_holds {
            self.env().revert(DexError::KInvariantViolated);
        }

        self.update_reserves(balance0, balance1, reserve0, reserve1);

        self.env().emit_event(Swap {
            sender: self.env().caller(),
            pair: self.env().self_address(),
            amount0_in,
            amount1_in,
            amount0_out,
            amount1_out,
            to,
        });

        self.unlock();
    }

    /// Sends balances above the reserves to `to`
    pub fn skim(&mut self, to: Address) {
        self.lock();
        let token0 = self.token0();
        let token1 = self.token1();
        let (reserve0, reserve1, _) = self.get_reserves();

        let balance0 = self.get_token_balance(token0);
        let balance1 = self.get_token_balance(token1);
        if balance0 > reserve0 {
            self.safe_transfer(token0, to, balance0 - reserve0);
        }
        if balance1 > reserve1 {
            self.safe_transfer(token1, to, balance1 - reserve1);
        }
        self.unlock();
    }

    /// Forces reserves to match balances
    pub fn sync(&mut self) {
        self.lock();
        let (reserve0, reserve1, _) = self.get_reserves();
        let balance0 = self.get_token_balance(self.token0());
        let balance1 = self.get_token_balance(self.token1());
        self.update_reserves(balance0, balance1, reserve0, reserve1);
        self.unlock();
    }

    /// Spot price of token0 in token1, scaled by 1e18
    pub fn get_price0(&self) -> U256 {
        let (reserve0, reserve1, _) = self.get_reserves();
        SafeMath::mul_div(reserve1, precision(), reserve0)
            .unwrap_or_revert_with(&self.env(), DexError::InsufficientLiquidity)
    }

    /// Spot price of token1 in token0, scaled by 1e18
    pub fn get_price1(&self) -> U256 {
        let (reserve0, reserve1, _) = self.get_reserves();
        SafeMath::mul_div(reserve0, precision(), reserve1)
            .unwrap_or_revert_with(&self.env(), DexError::InsufficientLiquidity)
    }
}

impl Pair {
    /// Stores new reserves, accumulating prices of the previous ones first
    fn update_reserves(&mut self, balance0: U256, balance1: U256, reserve0: U256, reserve1: U256) {
        let now = self.env().get_block_time();
        let last = self.block_timestamp_last.get_or_default();
        if now > last && !reserve0.is_zero() && !reserve1.is_zero() {
            let (p0, p1) = self.accumulated(reserve0, reserve1, now - last);
            let price0 = SafeMath::add(self.price0_cumulative_last(), p0)
                .unwrap_or_revert(&self.env());
            let price1 = SafeMath::add(self.price1_cumulative_last(), p1)
                .unwrap_or_revert(&self.env());
            self.price0_cumulative_last.set(price0);
            self.price1_cumulative_last.set(price1);
        }

        self.reserve0.set(balance0);
        self.reserve1.set(balance1);
        self.block_timestamp_last.set(now);

        self.env().emit_event(Sync {
            pair: self.env().self_address(),
            reserve0: balance0,
            reserve1: balance1,
        });
    }

    fn accumulated(&self, reserve0: U256, reserve1: U256, elapsed: u64) -> (U256, U256) {
        let elapsed = U256::from(elapsed);
        let price0 = SafeMath::mul_div(reserve1, precision(), reserve0)
            .and_then(|p| SafeMath::mul(p, elapsed))
            .unwrap_or_revert(&self.env());
        let price1 = SafeMath::mul_div(reserve0, precision(), reserve1)
            .and_then(|p| SafeMath::mul(p, elapsed))
            .unwrap_or_revert(&self.env());
        (price0, price1)
    }

    fn oriented_reserves(&self, token_in: Address) -> (U256, U256) {
        let (reserve0, reserve1, _) = self.get_reserves();
        if token_in == self.token0() {
            (reserve0, reserve1)
        } else if token_in == self.token1() {
            (reserve1, reserve0)
        } else {
            self.env().revert(DexError::InvalidPair)
        }
    }

    fn get_token_balance(&self, token: Address) -> U256 {
        Cep18TokenContractRef::new(self.env(), token).balance_of(self.env().self_address())
    }

    fn safe_transfer(&self, token: Address, to: Address, amount: U256) {
        let mut token_ref = Cep18TokenContractRef::new(self.env(), token);
        if !token_ref.transfer(to, amount) {
            self.env().revert(DexError::TransferFailed);
        }
    }

    fn lock(&mut self) {
        if self.locked.get_or_default() {
            self.env().revert(DexError::Locked);
        }
        self.locked.set(true);
    }

    fn unlock(&mut self) {
        self.locked.set(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::{FaucetToken, FaucetTokenHostRef, FaucetTokenInitArgs};
    use odra::host::{Deployer, HostEnv, HostRef};

    fn token(env: &HostEnv, symbol: &str) -> FaucetTokenHostRef {
        FaucetToken::deploy(
            env,
            FaucetTokenInitArgs {
                name: String::from(symbol),
                symbol: String::from(symbol),
                decimals: 18,
            },
        )
    }

    fn setup() -> (HostEnv, PairHostRef, FaucetTokenHostRef, FaucetTokenHostRef) {
        let env = odra_test::env();
        let a = token(&env, "TKA");
        let b = token(&env, "TKB");
        let pair = Pair::deploy(
            &env,
            PairInitArgs {
                token_a: a.address().clone(),
                token_b: b.address().clone(),
                fee_bps: 30,
            },
        );
        let (t0, t1) = if pair.token0() == a.address().clone() { (a, b) } else { (b, a) };
        (env, pair, t0, t1)
    }

    fn add_liquidity(
        env: &HostEnv,
        pair: &mut PairHostRef,
        t0: &mut FaucetTokenHostRef,
        t1: &mut FaucetTokenHostRef,
        amount0: u64,
        amount1: u64,
    ) -> U256 {
        let provider = env.get_account(0);
        t0.mint(pair.address().clone(), U256::from(amount0));
        t1.mint(pair.address().clone(), U256::from(amount1));
        pair.mint(provider)
    }

    #[test]
    fn test_pair_init_sorts_tokens() {
        let (_, pair, t0, t1) = setup();
        assert!(t0.address().clone() < t1.address().clone());
        assert_eq!(pair.token1(), t1.address().clone());
        assert_eq!(pair.fee_bps(), 30);
        let (reserve0, reserve1, _) = pair.get_reserves();
        assert_eq!(reserve0, U256::zero());
        assert_eq!(reserve1, U256::zero());
    }

    #[test]
    fn test_rejects_excessive_fee() {
        let env = odra_test::env();
        let a = env.get_account(1);
        let b = env.get_account(2);
        let result = Pair::try_deploy(&env, PairInitArgs { token_a: a, token_b: b, fee_bps: 1_001 });
        assert!(result.is_err());
    }

    #[test]
    fn test_burn_keeps_minimum_liquidity_locked() {
        let (env, mut pair, mut t0, mut t1) = setup();
        let provider = env.get_account(0);
        let liquidity = add_liquidity(&env, &mut pair, &mut t0, &mut t1, 1_000_000, 1_000_000);
        assert_eq!(liquidity, U256::from(999_000));

        env.set_caller(provider);
        pair.transfer(pair.address().clone(), liquidity);
        let (amount0, amount1) = pair.burn(provider);

        assert_eq!(amount0, U256::from(999_000));
        assert_eq!(amount1, U256::from(999_000));
        assert_eq!(pair.total_supply(), U256::from(MINIMUM_LIQUIDITY));
        let (reserve0, reserve1, _) = pair.get_reserves();
        assert_eq!(reserve0, U256::from(1_000));
        assert_eq!(reserve1, U256::from(1_000));
    }

    #[test]
    fn test_swap_respects_k() {
        let (env, mut pair, mut t0, mut t1) = setup();
        let trader = env.get_account(1);
        add_liquidity(&env, &mut pair, &mut t0, &mut t1, 1_000_000, 1_000_000);

        let amount_out = pair.get_amount_out(U256::from(10_000), t0.address().clone());
        t0.mint(pair.address().clone(), U256::from(10_000));
        assert_eq!(
            pair.try_swap(U256::zero(), amount_out + 1, trader),
            Err(DexError::KInvariantViolated.into())
        );
        pair.swap(U256::zero(), amount_out, trader);

        assert_eq!(t1.balance_of(trader), amount_out);
        let (reserve0, reserve1, _) = pair.get_reserves();
        assert_eq!(reserve0, U256::from(1_010_000));
        assert_eq!(reserve1, U256::from(1_000_000) - amount_out);
    }

    #[test]
    fn test_estimate_liquidity_balances_one_sided_amounts() {
        let (env, mut pair, mut t0, mut t1) = setup();
        add_liquidity(&env, &mut pair, &mut t0, &mut t1, 1_000_000, 1_000_000);

        let (liquidity, swap_amount, _) = pair.estimate_liquidity(U256::from(1_000), U256::from(1_000));
        assert_eq!(liquidity, U256::from(1_000));
        assert_eq!(swap_amount, U256::zero());

        // Half of a token0-only deposit is swapped first
        let (liquidity, swap_amount, token0_in) =
            pair.estimate_liquidity(U256::from(2_000), U256::zero());
        assert!(token0_in);
        assert!(swap_amount > U256::from(990) && swap_amount < U256::from(1_010));
        assert!(liquidity > U256::from(990) && liquidity < U256::from(1_000));

        let (_, swap_amount, token0_in) = pair.estimate_liquidity(U256::zero(), U256::from(2_000));
        assert!(!token0_in);
        assert!(!swap_amount.is_zero());
    }

    #[test]
    fn test_cumulative_price_grows_with_time() {
        let (env, mut pair, mut t0, mut t1) = setup();
        add_liquidity(&env, &mut pair, &mut t0, &mut t1, 1_000_000, 2_000_000);

        env.advance_block_time(1_000);
        let (price0, price1, _) = pair.current_cumulative_prices();
        assert_eq!(price0, precision() * 2 * 1_000);
        assert_eq!(price1, precision() / 2 * 1_000);

        pair.sync();
        assert_eq!(pair.price0_cumulative_last(), price0);
    }
}
