//! Fixed-window TWAP oracle over the pair's cumulative prices
//!
//! `update` closes a window once at least `period` ms have passed since the
//! last observation; inside the window it is a no-op, so anyone may call it.
//! `consult` returns the last closed window's average and refuses to answer
//! before the first window or once the average is too old.
use odra::prelude::*;
use odra::casper_types::U256;
use odra::ContractRef;
use crate::dex::PairContractContractRef;
use crate::errors::DexError;
use crate::events::OracleUpdated;
use crate::math::SafeMath;

/// Averages older than this many windows are rejected
const STALENESS_WINDOWS: u64 = 4;

#[odra::module(events = [OracleUpdated])]
pub struct TwapOracle {
    pair: Var<Address>,
    /// Window length in ms
    period: Var<u64>,
    /// Maximum age of the average in ms
    max_staleness: Var<u64>,
    price0_cumulative_last: Var<U256>,
    price1_cumulative_last: Var<U256>,
    /// Time of the last observation
    timestamp_last: Var<u64>,
    price0_average: Var<U256>,
    price1_average: Var<U256>,
    /// Time at which the current average was computed, zero before the first window
    average_timestamp: Var<u64>,
}

#[odra::module]
impl TwapOracle {
    pub fn init(&mut self, pair: Address, period: u64) {
        if period == 0 {
            self.env().revert(DexError::InvalidConfiguration);
        }
        self.pair.set(pair);
        self.period.set(period);
        self.max_staleness.set(period * STALENESS_WINDOWS);

        let (price0, price1, now) =
            PairContractContractRef::new(self.env(), pair).current_cumulative_prices();
        self.price0_cumulative_last.set(price0);
        self.price1_cumulative_last.set(price1);
        self.timestamp_last.set(now);
    }

    pub fn pair(&self) -> Address {
        self.pair.get_or_revert_with(DexError::InvalidPair)
    }

    pub fn period(&self) -> u64 {
        self.period.get_or_default()
    }

    pub fn max_staleness(&self) -> u64 {
        self.max_staleness.get_or_default()
    }

    /// Closes the current window if it is at least `period` long
    pub fn update(&mut self) {
        let pair = PairContractContractRef::new(self.env(), self.pair());
        let (price0, price1, now) = pair.current_cumulative_prices();
        let last = self.timestamp_last.get_or_default();
        let elapsed = now.saturating_sub(last);
        if elapsed < self.period() {
            return;
        }

        let elapsed_u256 = U256::from(elapsed);
        let average0 = SafeMath::sub(price0, self.price0_cumulative_last.get_or_default())
            .and_then(|delta| SafeMath::div(delta, elapsed_u256))
            .unwrap_or_revert(&self.env());
        let average1 = SafeMath::sub(price1, self.price1_cumulative_last.get_or_default())
            .and_then(|delta| SafeMath::div(delta, elapsed_u256))
            .unwrap_or_revert(&self.env());

        self.price0_average.set(average0);
        self.price1_average.set(average1);
        self.average_timestamp.set(now);
        self.price0_cumulative_last.set(price0);
        self.price1_cumulative_last.set(price1);
        self.timestamp_last.set(now);

        self.env().emit_event(OracleUpdated {
            price0_average: average0,
            window: elapsed,
            timestamp: now,
        });
    }

    /// Average price of token0 in token1, scaled by 1e18
    pub fn consult(&self) -> U256 {
        self.ensure_fresh();
        self.price0_average.get_or_default()
    }

    /// Average price of token1 in token0, scaled by 1e18
    pub fn consult_inverse(&self) -> U256 {
        self.ensure_fresh();
        self.price1_average.get_or_default()
    }

    /// Block time of the current average, zero if no window has closed
    pub fn last_update(&self) -> u64 {
        self.average_timestamp.get_or_default()
    }
}

impl TwapOracle {
    fn ensure_fresh(&self) {
        let computed_at = self.average_timestamp.get_or_default();
        if computed_at == 0 {
            self.env().revert(DexError::OracleNotReady);
        }
        let now = self.env().get_block_time();
        if now.saturating_sub(computed_at) > self.max_staleness() {
            self.env().revert(DexError::StalePrice);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dex::pair::{Pair, PairHostRef, PairInitArgs};
    use crate::math::precision;
    use crate::tokens::{FaucetToken, FaucetTokenHostRef, FaucetTokenInitArgs};
    use odra::host::{Deployer, HostEnv, HostRef};

    const PERIOD: u64 = 60_000;

    fn setup() -> (HostEnv, PairHostRef, FaucetTokenHostRef, FaucetTokenHostRef, TwapOracleHostRef) {
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
        token1.mint(pair.address().clone(), U256::from(3_000_000));
        pair.mint(env.get_account(0));

        let oracle = TwapOracle::deploy(
            &env,
            TwapOracleInitArgs { pair: pair.address().clone(), period: PERIOD },
        );
        (env, pair, token0, token1, oracle)
    }

    #[test]
    fn test_consult_before_first_window_fails() {
        let (env, _, _, _, mut oracle) = setup();
        assert_eq!(oracle.try_consult(), Err(DexError::OracleNotReady.into()));

        env.advance_block_time(PERIOD / 2);
        oracle.update();
        assert_eq!(oracle.last_update(), 0);
        assert_eq!(oracle.try_consult(), Err(DexError::OracleNotReady.into()));
    }

    #[test]
    fn test_average_tracks_constant_price() {
        let (env, _, _, _, mut oracle) = setup();
        env.advance_block_time(PERIOD);
        oracle.update();

        assert_eq!(oracle.consult(), precision() * 3);
        assert_eq!(oracle.consult_inverse(), precision() / 3);
    }

    #[test]
    fn test_average_lags_spot_after_price_move() {
        let (env, mut pair, mut token0, _, mut oracle) = setup();
        env.advance_block_time(PERIOD);
        oracle.update();

        // Push price0 down by dumping token0 into the pool
        let trader = env.get_account(1);
        token0.mint(pair.address().clone(), U256::from(1_000_000));
        let (_, reserve1, _) = pair.get_reserves();
        pair.swap(U256::zero(), reserve1 / 3, trader);
        let spot = pair.get_price0();

        env.advance_block_time(PERIOD);
        oracle.update();
        // The whole second window saw the new price
        assert_eq!(oracle.consult(), spot);
    }

    #[test]
    fn test_stale_average_is_rejected() {
        let (env, _, _, _, mut oracle) = setup();
        env.advance_block_time(PERIOD);
        oracle.update();
        env.advance_block_time(PERIOD * STALENESS_WINDOWS + 1);
        assert_eq!(oracle.try_consult(), Err(DexError::StalePrice.into()));
    }

    #[test]
    fn test_zero_period_is_rejected() {
        let (env, pair, _, _, _) = setup();
        let result = TwapOracle::try_deploy(
            &env,
            TwapOracleInitArgs { pair: pair.address().clone(), period: 0 },
        );
        assert_eq!(result.err(), Some(DexError::InvalidConfiguration.into()));
    }
}
