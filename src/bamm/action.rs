//! Batched vault operations
use odra::prelude::*;
use odra::casper_types::U256;

/// Signed token or rent delta. Positive deposits or rents, negative
/// withdraws or repays.
#[odra::odra_type]
#[derive(Default)]
pub struct SignedAmount {
    pub negative: bool,
    pub amount: U256,
}

impl SignedAmount {
    pub fn zero() -> Self {
        Self::default()
    }

    /// Positive delta: deposit tokens or rent liquidity
    pub fn deposit(amount: U256) -> Self {
        Self { negative: false, amount }
    }

    /// Negative delta: withdraw tokens or repay rent
    pub fn withdraw(amount: U256) -> Self {
        Self { negative: true, amount }
    }

    pub fn is_positive(&self) -> bool {
        !self.negative && !self.amount.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.negative && !self.amount.is_zero()
    }
}

/// One atomic batch against the caller's vault
#[odra::odra_type]
#[derive(Default)]
pub struct Action {
    pub token0_amount: SignedAmount,
    pub token1_amount: SignedAmount,
    /// Normalized rent delta
    pub rent: SignedAmount,
    /// Receiver of withdrawals, the caller when unset
    pub to: Option<Address>,
    /// Minimum token0 received from renting
    pub min_token0_amount: U256,
    /// Minimum token1 received from renting
    pub min_token1_amount: U256,
    /// Repay all outstanding rent, pulling any shortfall from the caller
    pub close_position: bool,
    /// Block time (ms) after which the batch is rejected, zero for none
    pub deadline: u64,
}

/// In-vault swap through the configured router
#[odra::odra_type]
pub struct SwapParams {
    pub token_in: Address,
    pub amount_in: U256,
    pub token_out: Address,
    pub amount_out_minimum: U256,
    /// Block time (ms) after which the router rejects the swap, zero for none
    pub deadline: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_amount_direction() {
        assert!(!SignedAmount::zero().is_positive());
        assert!(!SignedAmount::zero().is_negative());
        assert!(SignedAmount::deposit(U256::one()).is_positive());
        assert!(SignedAmount::withdraw(U256::one()).is_negative());
        // A negative zero is a no-op
        assert!(!SignedAmount::withdraw(U256::zero()).is_negative());
    }

    #[test]
    fn test_default_action_does_nothing() {
        let action = Action::default();
        assert!(!action.token0_amount.is_positive() && !action.token0_amount.is_negative());
        assert!(!action.rent.is_positive() && !action.rent.is_negative());
        assert_eq!(action.to, None);
        assert!(!action.close_position);
    }
}
