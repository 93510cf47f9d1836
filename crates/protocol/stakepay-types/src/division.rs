//! Per-recipient reward divisions.

use std::collections::BTreeMap;

use num::Zero;
use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::amount::{serde_amount, serde_amount_map, Amount};

/// How a sum of reward assignments is divided.
///
/// `amount_for_delegate` plus every value of `amounts_without_delegate`
/// equals the assigned total exactly. The delegate never appears as a key
/// of `amounts_without_delegate`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Division {
    #[serde(with = "serde_amount_map")]
    pub amounts_without_delegate: BTreeMap<Address, Amount>,
    #[serde(with = "serde_amount")]
    pub amount_for_delegate: Amount,
}

impl Division {
    /// A division that pays everything to the delegate.
    pub fn delegate_only(amount: Amount) -> Self {
        Self {
            amounts_without_delegate: BTreeMap::new(),
            amount_for_delegate: amount,
        }
    }

    /// Sum of all delegator amounts.
    pub fn delegators_total(&self) -> Amount {
        self.amounts_without_delegate.values().sum()
    }

    /// Sum of every amount, delegate included.
    pub fn total(&self) -> Amount {
        self.delegators_total() + &self.amount_for_delegate
    }

    /// Amount assigned to a delegator, zero if absent.
    pub fn amount_for(&self, delegator: &Address) -> Amount {
        self.amounts_without_delegate
            .get(delegator)
            .cloned()
            .unwrap_or_else(Amount::zero)
    }

    /// Add another division into this one, recipient by recipient.
    pub fn accumulate(&mut self, other: &Division) {
        for (delegator, amount) in &other.amounts_without_delegate {
            *self
                .amounts_without_delegate
                .entry(delegator.clone())
                .or_insert_with(Amount::zero) += amount;
        }
        self.amount_for_delegate += &other.amount_for_delegate;
    }

    /// Number of delegators with a nonzero amount.
    pub fn paid_delegator_count(&self) -> usize {
        self.amounts_without_delegate
            .values()
            .filter(|a| !a.is_zero())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u8) -> Address {
        Address::parse(&format!("0x{:040x}", n)).unwrap()
    }

    fn amount(n: u64) -> Amount {
        Amount::from(n)
    }

    #[test]
    fn test_totals() {
        let mut division = Division::delegate_only(amount(40));
        division.amounts_without_delegate.insert(addr(1), amount(35));
        division.amounts_without_delegate.insert(addr(2), amount(25));
        division.amounts_without_delegate.insert(addr(3), amount(0));

        assert_eq!(division.delegators_total(), amount(60));
        assert_eq!(division.total(), amount(100));
        assert_eq!(division.paid_delegator_count(), 2);
        assert_eq!(division.amount_for(&addr(4)), amount(0));
    }

    #[test]
    fn test_accumulate_merges_recipients() {
        let mut a = Division::delegate_only(amount(10));
        a.amounts_without_delegate.insert(addr(1), amount(5));

        let mut b = Division::delegate_only(amount(3));
        b.amounts_without_delegate.insert(addr(1), amount(2));
        b.amounts_without_delegate.insert(addr(2), amount(7));

        a.accumulate(&b);
        assert_eq!(a.amount_for_delegate, amount(13));
        assert_eq!(a.amount_for(&addr(1)), amount(7));
        assert_eq!(a.amount_for(&addr(2)), amount(7));
        assert_eq!(a.total(), amount(27));
    }

    #[test]
    fn test_json_shape() {
        let mut division = Division::delegate_only(amount(4000));
        division.amounts_without_delegate.insert(addr(1), amount(2700));
        let json = serde_json::to_value(&division).unwrap();
        assert_eq!(json["amount_for_delegate"], "4000");
        assert_eq!(json["amounts_without_delegate"][addr(1).as_str()], "2700");
    }
}
