//! BAMM share pricing against the instance's LP-equivalent holdings
use odra::casper_types::U256;
use super::errors::BammError;
use crate::math::SafeMath;

/// Shares issued for depositing `lp` when the instance holds `holdings`
/// LP-equivalents backing `total_shares`. The first deposit is 1:1.
pub fn shares_for_deposit(lp: U256, total_shares: U256, holdings: U256) -> Result<U256, BammError> {
    if total_shares.is_zero() || holdings.is_zero() {
        return Ok(lp);
    }
    Ok(SafeMath::mul_div(lp, total_shares, holdings)?)
}

/// LP-equivalents owed for burning `shares`, rounded down
pub fn lp_for_redeem(shares: U256, total_shares: U256, holdings: U256) -> Result<U256, BammError> {
    Ok(SafeMath::mul_div(shares, holdings, total_shares)?)
}

/// Shares minted to the owner so that they own exactly `fee_lp` of
/// `holdings_after`, diluting the other holders by the fee only
pub fn fee_shares(fee_lp: U256, total_shares: U256, holdings_after: U256) -> Result<U256, BammError> {
    if fee_lp.is_zero() || total_shares.is_zero() {
        return Ok(U256::zero());
    }
    let others = SafeMath::sub(holdings_after, fee_lp)?;
    Ok(SafeMath::mul_div(fee_lp, total_shares, others)?)
}
