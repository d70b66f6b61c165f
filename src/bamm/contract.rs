//! BAMM - rents out a pair's liquidity against vault collateral
//!
//! Liquidity providers deposit pair LP and receive BAMM shares. Renters
//! post collateral in a vault and rent liquidity measured in
//! `sqrt(reserve0 * reserve1)` units: the LP is burned through the pair and
//! the freed tokens are credited to the vault. Every mutating entry point
//! accrues interest first, so the rent multiplier is always current when
//! vaults are valued.

use odra::prelude::*;
use odra::casper_types::U256;
use odra::ContractRef;
use super::action::{Action, SwapParams};
use super::config::Config;
use super::errors::BammError;
use super::events::*;
use super::interest_rate::{self, InterestRateParams};
use super::interfaces::{PoolContractRef, PriceOracleContractRef, SwapRouterContractRef};
use super::liquidation;
use super::ownership::Ownership;
use super::rent::{self, PoolSnapshot, RentState};
use super::shares;
use super::vault::Vault;
use crate::math::{SafeMath, BPS};
use crate::token::{Cep18Ledger, Cep18TokenContractRef};

#[odra::module(events = [
    SharesMinted, SharesRedeemed, InterestAccrued, Rented, Repaid, VaultUpdated, VaultSwap,
    Liquidated, OwnerNominated, OwnerChanged, ConfigUpdated, InterestRateParamsUpdated
])]
pub struct Bamm {
    /// BAMM share token
    share_token: SubModule<Cep18Ledger>,
    ownership: SubModule<Ownership>,
    /// Pair whose LP is rented out
    pair: Var<Address>,
    /// Router used for in-vault swaps
    router: Var<Address>,
    /// TWAP oracle consulted by liquidations
    oracle: Var<Address>,
    token0: Var<Address>,
    token1: Var<Address>,
    vaults: Mapping<Address, Vault>,
    rent_state: Var<RentState>,
    config: Var<Config>,
    rate_params: Var<InterestRateParams>,
    /// Reentrancy lock
    locked: Var<bool>,
}

#[odra::module]
impl Bamm {
    /// Binds the instance to a pair, router and oracle; the deployer becomes owner
    pub fn init(&mut self, pair: Address, router: Address, oracle: Address) {
        let pool = PoolContractRef::new(self.env(), pair);
        self.token0.set(pool.token0());
        self.token1.set(pool.token1());
        self.pair.set(pair);
        self.router.set(router);
        self.oracle.set(oracle);

        self.rent_state.set(RentState::new(self.env().get_block_time()));
        self.config.set(Config::default());
        self.rate_params.set(InterestRateParams::default());
        self.locked.set(false);

        self.share_token
            .init(String::from("BAMM Share"), String::from("BAMM"), 18);
        let owner = self.env().caller();
        self.ownership.init(owner);
    }

    // ========================================
    // Shares
    // ========================================

    /// Deposits `lp_amount` pair LP from the caller and mints shares to `to`
    pub fn mint(&mut self, to: Address, lp_amount: U256) -> U256 {
        self.lock();
        let state = self.accrue();
        if lp_amount.is_zero() {
            self.env().revert(BammError::ZeroAmount);
        }

        let pool = self.snapshot();
        let holdings = self.holdings(&pool, &state);
        let minted = shares::shares_for_deposit(lp_amount, self.share_token.total_supply(), holdings)
            .unwrap_or_revert(&self.env());
        if minted.is_zero() {
            self.env().revert(BammError::ZeroAmount);
        }

        let caller = self.env().caller();
        let this = self.env().self_address();
        if !self.pool().transfer_from(caller, this, lp_amount) {
            self.env().revert(BammError::TransferFailed);
        }
        self.share_token.mint(to, minted);

        self.env().emit_event(SharesMinted {
            sender: caller,
            to,
            lp_amount,
            shares: minted,
            timestamp: self.env().get_block_time(),
        });
        self.unlock();
        minted
    }

    /// Burns the caller's shares and sends the pro-rata LP to `to`
    pub fn redeem(&mut self, to: Address, share_amount: U256) -> U256 {
        self.lock();
        let state = self.accrue();
        if share_amount.is_zero() {
            self.env().revert(BammError::ZeroAmount);
        }
        let caller = self.env().caller();
        if self.share_token.balance_of(caller) < share_amount {
            self.env().revert(BammError::InsufficientBalance);
        }

        let pool = self.snapshot();
        let holdings = self.holdings(&pool, &state);
        let lp_amount =
            shares::lp_for_redeem(share_amount, self.share_token.total_supply(), holdings)
                .unwrap_or_revert(&self.env());
        if lp_amount.is_zero() {
            self.env().revert(BammError::ZeroAmount);
        }
        // Rented liquidity has to come back before it can be redeemed
        if lp_amount > self.held_lp() {
            self.env().revert(BammError::InsufficientLiquidity);
        }

        self.share_token.burn(caller, share_amount);
        if !self.pool().transfer(to, lp_amount) {
            self.env().revert(BammError::TransferFailed);
        }

        self.env().emit_event(SharesRedeemed {
            sender: caller,
            to,
            shares: share_amount,
            lp_amount,
            timestamp: self.env().get_block_time(),
        });
        self.unlock();
        lp_amount
    }

    // ========================================
    // Vault actions
    // ========================================

    /// Applies `action` to the caller's vault as one atomic batch
    pub fn execute_actions(&mut self, action: Action) {
        self.process(action, None);
    }

    /// Like `execute_actions`, with an in-vault swap between renting and repaying
    pub fn execute_actions_and_swap(&mut self, action: Action, swap_params: SwapParams) {
        self.process(action, Some(swap_params));
    }

    // ========================================
    // Liquidation
    // ========================================

    /// Closes an insolvent vault: repays its debt from the collateral, pays
    /// the caller a bonus out of the remainder and returns the rest to the owner
    pub fn liquidate(&mut self, vault_owner: Address) {
        self.lock();
        let env = self.env();
        let mut state = self.accrue();
        let config = self.config();

        let vault = self.vaults.get(&vault_owner).unwrap_or_default();
        if vault.rented.is_zero() {
            env.revert(BammError::UserSolvent);
        }
        let pool = self.snapshot();
        let solvent = vault
            .is_solvent(&pool, &state, config.solvency_threshold_bps)
            .unwrap_or_revert(&env);
        if solvent {
            env.revert(BammError::UserSolvent);
        }

        let mut oracle = PriceOracleContractRef::new(env.clone(), self.oracle());
        oracle.update();
        let oracle_price = oracle.consult();
        let spot = pool.spot_price0().unwrap_or_revert(&env);
        let within = liquidation::price_within_bounds(spot, oracle_price, config.price_divergence_bps)
            .unwrap_or_revert(&env);
        if !within {
            env.revert(BammError::AmmPriceCheck);
        }

        let debt = vault.debt_units(&state).unwrap_or_revert(&env);
        let mut pool_ref = self.pool();
        let plan = liquidation::plan_liquidation(
            vault.token0,
            vault.token1,
            debt,
            &pool,
            pool_ref.fee_bps(),
        )
        .unwrap_or_revert(&env);

        let pair = self.pair();
        let this = env.self_address();
        let token0 = self.token0();
        let token1 = self.token1();
        if let Some(swap) = plan.swap {
            let token_in = if swap.token0_in { token0 } else { token1 };
            self.push_token(token_in, pair, swap.amount_in);
            if swap.token0_in {
                pool_ref.swap(U256::zero(), swap.amount_out, this);
            } else {
                pool_ref.swap(swap.amount_out, U256::zero(), this);
            }
        }
        if !plan.repay_units.is_zero() {
            self.push_token(token0, pair, plan.repay0);
            self.push_token(token1, pair, plan.repay1);
            pool_ref.mint(this);
        }

        let liquidator = env.caller();
        let paid = liquidation::payouts(&plan, debt, config.liquidation_bonus_bps)
            .unwrap_or_revert(&env);
        self.push_token(token0, liquidator, paid.bonus0);
        self.push_token(token1, liquidator, paid.bonus1);
        self.push_token(token0, vault_owner, paid.returned0);
        self.push_token(token1, vault_owner, paid.returned1);

        state.total_rented = SafeMath::sub(state.total_rented, vault.rented).unwrap_or_revert(&env);
        self.vaults.set(&vault_owner, Vault::default());
        self.rent_state.set(state);

        env.emit_event(Liquidated {
            owner: vault_owner,
            liquidator,
            debt,
            repaid: plan.repay_units,
            bonus0: paid.bonus0,
            bonus1: paid.bonus1,
            returned0: paid.returned0,
            returned1: paid.returned1,
            timestamp: env.get_block_time(),
        });
        self.unlock();
    }

    /// Accrues interest without any other action
    pub fn add_interest(&mut self) {
        self.lock();
        self.accrue();
        self.unlock();
    }

    // ========================================
    // Admin
    // ========================================

    pub fn nominate_new_owner(&mut self, candidate: Address) {
        self.ownership.nominate_new_owner(candidate);
    }

    pub fn accept_ownership(&mut self) {
        self.ownership.accept_ownership();
    }

    /// Replaces the configuration (owner only). Interest up to now accrues under the old one.
    pub fn set_config(&mut self, config: Config) {
        self.ownership.assert_owner(self.env().caller());
        config.validate().unwrap_or_revert(&self.env());
        self.lock();
        self.accrue();
        self.env().emit_event(ConfigUpdated {
            fee_share_bps: config.fee_share_bps,
            max_utility_bps: config.max_utility_bps,
            price_divergence_bps: config.price_divergence_bps,
            liquidation_bonus_bps: config.liquidation_bonus_bps,
            solvency_threshold_bps: config.solvency_threshold_bps,
        });
        self.config.set(config);
        self.unlock();
    }

    /// Replaces the interest curve (owner only)
    pub fn set_interest_rate_params(&mut self, params: InterestRateParams) {
        self.ownership.assert_owner(self.env().caller());
        params.validate().unwrap_or_revert(&self.env());
        self.lock();
        self.accrue();
        self.env().emit_event(InterestRateParamsUpdated {
            base_rate: params.base_rate,
            optimal_utilization: params.optimal_utilization,
            slope1: params.slope1,
            slope2: params.slope2,
        });
        self.rate_params.set(params);
        self.unlock();
    }

    // ========================================
    // Views
    // ========================================

    pub fn pair(&self) -> Address {
        self.pair.get_or_revert_with(BammError::NotInitialized)
    }

    pub fn router(&self) -> Address {
        self.router.get_or_revert_with(BammError::NotInitialized)
    }

    pub fn oracle(&self) -> Address {
        self.oracle.get_or_revert_with(BammError::NotInitialized)
    }

    pub fn token0(&self) -> Address {
        self.token0.get_or_revert_with(BammError::NotInitialized)
    }

    pub fn token1(&self) -> Address {
        self.token1.get_or_revert_with(BammError::NotInitialized)
    }

    pub fn owner(&self) -> Address {
        self.ownership.owner()
    }

    pub fn nominated_owner(&self) -> Option<Address> {
        self.ownership.nominated_owner()
    }

    pub fn config(&self) -> Config {
        self.config.get_or_revert_with(BammError::NotInitialized)
    }

    pub fn interest_rate_params(&self) -> InterestRateParams {
        self.rate_params.get_or_revert_with(BammError::NotInitialized)
    }

    /// Rent totals and multiplier as of the last accrual
    pub fn rent_state(&self) -> RentState {
        self.rent_state.get_or_revert_with(BammError::NotInitialized)
    }

    pub fn get_vault(&self, owner: Address) -> Vault {
        self.vaults.get(&owner).unwrap_or_default()
    }

    /// Whether `owner` ever held anything in a vault
    pub fn has_vault(&self, owner: Address) -> bool {
        self.vaults.get(&owner).is_some()
    }

    /// Live debt of a vault in liquidity units, as of the last accrual
    pub fn vault_debt(&self, owner: Address) -> U256 {
        self.get_vault(owner)
            .debt_units(&self.rent_state())
            .unwrap_or_revert(&self.env())
    }

    pub fn is_solvent(&self, owner: Address) -> bool {
        let vault = self.get_vault(owner);
        if vault.rented.is_zero() {
            return true;
        }
        vault
            .is_solvent(&self.snapshot(), &self.rent_state(), self.config().solvency_threshold_bps)
            .unwrap_or_revert(&self.env())
    }

    /// Rented share of the instance's liquidity, scaled by 1e18
    pub fn utilization(&self) -> U256 {
        let state = self.rent_state();
        if state.total_rented.is_zero() {
            return U256::zero();
        }
        let pool = self.snapshot();
        let env = self.env();
        let real = state.total_real().unwrap_or_revert(&env);
        let held_units = pool.lp_to_units(self.held_lp()).unwrap_or_revert(&env);
        interest_rate::utilization(real, held_units).unwrap_or_revert(&env)
    }

    /// LP held plus the LP value of all outstanding rent
    pub fn lp_equivalent_holdings(&self) -> U256 {
        self.holdings(&self.snapshot(), &self.rent_state())
    }

    // ========================================
    // Share token
    // ========================================

    pub fn name(&self) -> String {
        self.share_token.name()
    }

    pub fn symbol(&self) -> String {
        self.share_token.symbol()
    }

    pub fn decimals(&self) -> u8 {
        self.share_token.decimals()
    }

    pub fn total_supply(&self) -> U256 {
        self.share_token.total_supply()
    }

    pub fn balance_of(&self, owner: Address) -> U256 {
        self.share_token.balance_of(owner)
    }

    pub fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.share_token.allowance(owner, spender)
    }

    pub fn transfer(&mut self, to: Address, amount: U256) -> bool {
        self.share_token.transfer(to, amount)
    }

    pub fn approve(&mut self, spender: Address, amount: U256) -> bool {
        self.share_token.approve(spender, amount)
    }

    pub fn transfer_from(&mut self, from: Address, to: Address, amount: U256) -> bool {
        self.share_token.transfer_from(from, to, amount)
    }
}

impl Bamm {
    /// Action order: deposit, rent, swap, repay, close, withdraw
    fn process(&mut self, action: Action, swap: Option<SwapParams>) {
        self.lock();
        let env = self.env();
        let mut state = self.accrue();
        if action.deadline != 0 && env.get_block_time() > action.deadline {
            env.revert(BammError::DeadlineExpired);
        }

        let caller = env.caller();
        let config = self.config();
        let token0 = self.token0();
        let token1 = self.token1();
        let stored = self.vaults.get(&caller);
        let existed = stored.is_some();
        let mut vault = stored.unwrap_or_default();

        if action.token0_amount.is_positive() {
            self.pull_token(token0, caller, action.token0_amount.amount);
            vault.credit(action.token0_amount.amount, U256::zero()).unwrap_or_revert(&env);
        }
        if action.token1_amount.is_positive() {
            self.pull_token(token1, caller, action.token1_amount.amount);
            vault.credit(U256::zero(), action.token1_amount.amount).unwrap_or_revert(&env);
        }

        if action.rent.is_positive() {
            self.rent_liquidity(
                caller,
                &mut vault,
                &mut state,
                &config,
                action.rent.amount,
                (action.min_token0_amount, action.min_token1_amount),
            );
            self.ensure_solvent(&vault, &state, &config);
        }

        if let Some(params) = swap {
            self.swap_in_vault(caller, &mut vault, params);
            self.ensure_solvent(&vault, &state, &config);
        }

        if action.rent.is_negative() {
            self.repay_rent(caller, &mut vault, &mut state, action.rent.amount);
        }
        if action.close_position {
            self.close_position(caller, &mut vault, &mut state);
        }

        let recipient = action.to.unwrap_or(caller);
        if action.token0_amount.is_negative() {
            vault.debit(action.token0_amount.amount, U256::zero()).unwrap_or_revert(&env);
            self.push_token(token0, recipient, action.token0_amount.amount);
        }
        if action.token1_amount.is_negative() {
            vault.debit(U256::zero(), action.token1_amount.amount).unwrap_or_revert(&env);
            self.push_token(token1, recipient, action.token1_amount.amount);
        }
        self.ensure_solvent(&vault, &state, &config);

        env.emit_event(VaultUpdated {
            owner: caller,
            token0: vault.token0,
            token1: vault.token1,
            rented: vault.rented,
            timestamp: env.get_block_time(),
        });
        // Vaults are created on the first deposit
        if existed || !vault.is_empty() {
            self.vaults.set(&caller, vault);
        }
        self.rent_state.set(state);
        self.unlock();
    }

    /// Burns LP through the pair and credits the freed tokens to the vault
    fn rent_liquidity(
        &mut self,
        owner: Address,
        vault: &mut Vault,
        state: &mut RentState,
        config: &Config,
        amount: U256,
        min_amounts: (U256, U256),
    ) {
        let env = self.env();
        let pool = self.snapshot();
        let held_lp = self.held_lp();

        let real_before = state.total_real().unwrap_or_revert(&env);
        let real = state.to_real(amount).unwrap_or_revert(&env);
        let held_units = pool.lp_to_units(held_lp).unwrap_or_revert(&env);
        rent::check_utilization(real_before + real, real_before, held_units, config.max_utility_bps)
            .unwrap_or_revert(&env);

        let lp_amount = pool.units_to_lp(real).unwrap_or_revert(&env);
        if lp_amount.is_zero() {
            env.revert(BammError::ZeroAmount);
        }
        if lp_amount > held_lp {
            env.revert(BammError::InsufficientLiquidity);
        }

        let mut pool_ref = self.pool();
        if !pool_ref.transfer(self.pair(), lp_amount) {
            env.revert(BammError::TransferFailed);
        }
        let (amount0, amount1) = pool_ref.burn(env.self_address());
        if amount0 < min_amounts.0 || amount1 < min_amounts.1 {
            env.revert(BammError::SlippageExceeded);
        }

        vault.credit(amount0, amount1).unwrap_or_revert(&env);
        vault.rented += amount;
        state.total_rented += amount;

        env.emit_event(Rented {
            owner,
            rent: amount,
            lp_amount,
            amount0,
            amount1,
        });
    }

    /// Returns tokens for up to `amount` normalized rent to the pair and mints the LP back
    fn repay_rent(&mut self, owner: Address, vault: &mut Vault, state: &mut RentState, amount: U256) {
        let env = self.env();
        let amount = SafeMath::min(amount, vault.rented);
        if amount.is_zero() {
            return;
        }

        let pool = self.snapshot();
        let real = state.to_real_up(amount).unwrap_or_revert(&env);
        let (amount0, amount1) = pool.token_amounts_up(real).unwrap_or_revert(&env);
        if amount0 > vault.token0 || amount1 > vault.token1 {
            env.revert(BammError::InsufficientBalance);
        }
        vault.debit(amount0, amount1).unwrap_or_revert(&env);

        let pair = self.pair();
        self.push_token(self.token0(), pair, amount0);
        self.push_token(self.token1(), pair, amount1);
        self.pool().mint(env.self_address());

        vault.rented -= amount;
        state.total_rented = SafeMath::sub(state.total_rented, amount).unwrap_or_revert(&env);

        env.emit_event(Repaid {
            owner,
            rent: amount,
            amount0,
            amount1,
        });
    }

    /// Repays all rent, pulling whatever the vault lacks from `owner`
    fn close_position(&mut self, owner: Address, vault: &mut Vault, state: &mut RentState) {
        if vault.rented.is_zero() {
            return;
        }
        let env = self.env();
        let pool = self.snapshot();
        let real = state.to_real_up(vault.rented).unwrap_or_revert(&env);
        let (need0, need1) = pool.token_amounts_up(real).unwrap_or_revert(&env);

        if need0 > vault.token0 {
            let shortfall = need0 - vault.token0;
            self.pull_token(self.token0(), owner, shortfall);
            vault.credit(shortfall, U256::zero()).unwrap_or_revert(&env);
        }
        if need1 > vault.token1 {
            let shortfall = need1 - vault.token1;
            self.pull_token(self.token1(), owner, shortfall);
            vault.credit(U256::zero(), shortfall).unwrap_or_revert(&env);
        }

        let rented = vault.rented;
        self.repay_rent(owner, vault, state, rented);
    }

    /// Swaps vault tokens through the router, output stays in the vault
    fn swap_in_vault(&mut self, owner: Address, vault: &mut Vault, params: SwapParams) {
        let env = self.env();
        let token0 = self.token0();
        let token1 = self.token1();
        let token0_in = params.token_in == token0 && params.token_out == token1;
        let token1_in = params.token_in == token1 && params.token_out == token0;
        if !token0_in && !token1_in {
            env.revert(BammError::UnknownToken);
        }
        if params.amount_in.is_zero() {
            env.revert(BammError::ZeroAmount);
        }
        if token0_in {
            vault.debit(params.amount_in, U256::zero()).unwrap_or_revert(&env);
        } else {
            vault.debit(U256::zero(), params.amount_in).unwrap_or_revert(&env);
        }

        let router = self.router();
        Cep18TokenContractRef::new(env.clone(), params.token_in).approve(router, params.amount_in);
        let amount_out = SwapRouterContractRef::new(env.clone(), router).swap_exact_input(
            params.token_in,
            params.amount_in,
            params.token_out,
            params.amount_out_minimum,
            env.self_address(),
            params.deadline,
        );
        if token0_in {
            vault.credit(U256::zero(), amount_out).unwrap_or_revert(&env);
        } else {
            vault.credit(amount_out, U256::zero()).unwrap_or_revert(&env);
        }

        env.emit_event(VaultSwap {
            owner,
            token_in: params.token_in,
            amount_in: params.amount_in,
            amount_out,
        });
    }

    fn ensure_solvent(&self, vault: &Vault, state: &RentState, config: &Config) {
        if vault.rented.is_zero() {
            return;
        }
        let solvent = vault
            .is_solvent(&self.snapshot(), state, config.solvency_threshold_bps)
            .unwrap_or_revert(&self.env());
        if !solvent {
            self.env().revert(BammError::NotSolvent);
        }
    }

    /// Grows the rent multiplier for the time since the last accrual and
    /// mints the protocol fee. Returns the stored state.
    fn accrue(&mut self) -> RentState {
        let env = self.env();
        let now = env.get_block_time();
        let mut state = self.rent_state();

        if now > state.last_accrual && !state.total_rented.is_zero() {
            let elapsed = now - state.last_accrual;
            let pool = self.snapshot();
            let held_lp = self.held_lp();
            let real_before = state.total_real().unwrap_or_revert(&env);
            let held_units = pool.lp_to_units(held_lp).unwrap_or_revert(&env);

            let params = self.interest_rate_params();
            let rate = interest_rate::utilization(real_before, held_units)
                .and_then(|u| params.borrow_rate(u))
                .unwrap_or_revert(&env);
            state.rented_multiplier =
                interest_rate::grow_multiplier(state.rented_multiplier, rate, elapsed)
                    .unwrap_or_revert(&env);

            let real_after = state.total_real().unwrap_or_revert(&env);
            let interest = real_after - real_before;
            let fee_shares = self.mint_fee_shares(&pool, held_lp, real_after, interest);

            env.emit_event(InterestAccrued {
                rate,
                rented_multiplier: state.rented_multiplier,
                interest,
                fee_shares,
                timestamp: now,
            });
        }

        state.last_accrual = now;
        self.rent_state.set(state.clone());
        state
    }

    fn mint_fee_shares(
        &mut self,
        pool: &PoolSnapshot,
        held_lp: U256,
        real_rented: U256,
        interest: U256,
    ) -> U256 {
        let env = self.env();
        let fee_share_bps = self.config().fee_share_bps;
        let fee_units = SafeMath::mul_div(interest, U256::from(fee_share_bps), U256::from(BPS))
            .unwrap_or_revert(&env);
        if fee_units.is_zero() {
            return U256::zero();
        }
        let fee_lp = pool.units_to_lp(fee_units).unwrap_or_revert(&env);
        let holdings_after = held_lp + pool.units_to_lp(real_rented).unwrap_or_revert(&env);
        let minted = shares::fee_shares(fee_lp, self.share_token.total_supply(), holdings_after)
            .unwrap_or_revert(&env);
        if !minted.is_zero() {
            let owner = self.ownership.owner();
            self.share_token.mint(owner, minted);
        }
        minted
    }

    fn holdings(&self, pool: &PoolSnapshot, state: &RentState) -> U256 {
        let env = self.env();
        let held = self.held_lp();
        if state.total_rented.is_zero() {
            return held;
        }
        let real = state.total_real().unwrap_or_revert(&env);
        held + pool.units_to_lp(real).unwrap_or_revert(&env)
    }

    fn pool(&self) -> PoolContractRef {
        PoolContractRef::new(self.env(), self.pair())
    }

    fn snapshot(&self) -> PoolSnapshot {
        let pool = self.pool();
        let (reserve0, reserve1, _) = pool.get_reserves();
        PoolSnapshot::new(reserve0, reserve1, pool.total_supply())
    }

    fn held_lp(&self) -> U256 {
        self.pool().balance_of(self.env().self_address())
    }

    fn pull_token(&self, token: Address, from: Address, amount: U256) {
        let mut token_ref = Cep18TokenContractRef::new(self.env(), token);
        if !token_ref.transfer_from(from, self.env().self_address(), amount) {
            self.env().revert(BammError::TransferFailed);
        }
    }

    fn push_token(&self, token: Address, to: Address, amount: U256) {
        if amount.is_zero() {
            return;
        }
        let mut token_ref = Cep18TokenContractRef::new(self.env(), token);
        if !token_ref.transfer(to, amount) {
            self.env().revert(BammError::TransferFailed);
        }
    }

    fn lock(&mut self) {
        if self.locked.get_or_default() {
            self.env().revert(BammError::Locked);
        }
        self.locked.set(true);
    }

    fn unlock(&mut self) {
        self.locked.set(false);
    }
}
