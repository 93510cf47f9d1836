//! Rounding divisions to the transfer granularity.
//!
//! Transfers are made in whole multiples of a granularity unit. Each amount
//! is floored to that unit and the floored-away residue is handed to exactly
//! one recipient, so the total is unchanged.

use num::{Integer, One, Zero};
use stakepay_types::{Address, Amount, Division};

use crate::error::{EconError, EconResult};

/// Who receives the residue left by flooring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResiduePolicy {
    /// The delegate had a nonzero share before flooring and takes the residue.
    HasDelegateShare,
    /// The delegate had nothing; the delegator that lost the most to
    /// flooring takes the residue, lowest address first on ties.
    ZeroDelegateShare,
}

impl ResiduePolicy {
    /// Pick the policy for a division.
    pub fn for_division(division: &Division) -> Self {
        if division.amount_for_delegate.is_zero() {
            Self::ZeroDelegateShare
        } else {
            Self::HasDelegateShare
        }
    }
}

/// `floor(total * part / whole / granularity) * granularity`.
///
/// Zero when `part` is zero, whatever `whole` is.
pub fn split_amount_in_proportion_with_granularity(
    total: &Amount,
    part: &Amount,
    whole: &Amount,
    granularity: &Amount,
) -> EconResult<Amount> {
    if granularity.is_zero() {
        return Err(EconError::ZeroGranularity);
    }
    if part.is_zero() {
        return Ok(Amount::zero());
    }
    if whole.is_zero() {
        return Err(EconError::DivisionByZero);
    }

    let units = total * part / whole / granularity;
    Ok(units * granularity)
}

fn floor_to(amount: &Amount, granularity: &Amount) -> EconResult<Amount> {
    let one = Amount::one();
    split_amount_in_proportion_with_granularity(amount, &one, &one, granularity)
}

/// Floor every amount of `division` to a multiple of `granularity` and give
/// the residue to one recipient chosen by [`ResiduePolicy`].
///
/// The division total must already be a multiple of `granularity`.
pub fn fix_division_granularity(division: &Division, granularity: &Amount) -> EconResult<Division> {
    if granularity.is_zero() {
        return Err(EconError::ZeroGranularity);
    }

    let total = division.total();
    if !total.is_multiple_of(granularity) {
        return Err(EconError::IndivisibleTotal {
            total,
            granularity: granularity.clone(),
        });
    }

    let mut fixed = Division {
        amounts_without_delegate: Default::default(),
        amount_for_delegate: floor_to(&division.amount_for_delegate, granularity)?,
    };
    // Recipient with the largest floored-away remainder.
    let mut largest_loss: Option<(&Address, Amount)> = None;
    for (delegator, amount) in &division.amounts_without_delegate {
        let floored = floor_to(amount, granularity)?;
        let loss = amount - &floored;
        if largest_loss.as_ref().map_or(true, |(_, best)| loss > *best) {
            largest_loss = Some((delegator, loss));
        }
        fixed
            .amounts_without_delegate
            .insert(delegator.clone(), floored);
    }

    let residue = total - fixed.total();
    if residue.is_zero() {
        return Ok(fixed);
    }

    match (ResiduePolicy::for_division(division), largest_loss) {
        (ResiduePolicy::ZeroDelegateShare, Some((delegator, _))) => {
            if let Some(amount) = fixed.amounts_without_delegate.get_mut(delegator) {
                *amount += residue;
            }
        }
        _ => fixed.amount_for_delegate += residue,
    }

    Ok(fixed)
}
