//! The append-only event history of one delegate.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::amount::Amount;
use crate::error::{TypesError, TypesResult};
use crate::events::{
    AssignmentEvent, BlockNumber, CommitteeChangeEvent, DelegationChangeEvent, DistributionEvent,
    Split,
};

/// Everything the reward engine knows about one delegate.
///
/// Owned by the event ingester; the reward engine only reads it. All four
/// streams are sorted by block, ties kept in arrival order, and
/// `last_processed_block` is the highest block for which all four streams
/// are known to be complete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EventHistory {
    delegate_address: Address,
    starting_block: BlockNumber,
    last_processed_block: BlockNumber,
    #[serde(default)]
    delegation_change_events: Vec<DelegationChangeEvent>,
    #[serde(default)]
    committee_change_events: Vec<CommitteeChangeEvent>,
    #[serde(default)]
    assignment_events: Vec<AssignmentEvent>,
    #[serde(default)]
    distribution_events: Vec<DistributionEvent>,
}

fn check_order(
    stream: &'static str,
    block: BlockNumber,
    last: Option<BlockNumber>,
    starting_block: BlockNumber,
) -> TypesResult<()> {
    if block < starting_block {
        return Err(TypesError::BeforeStartingBlock {
            stream,
            block,
            starting_block,
        });
    }
    if let Some(last) = last {
        if block < last {
            return Err(TypesError::UnsortedEvent {
                stream,
                block,
                last,
            });
        }
    }
    Ok(())
}

fn check_weight(weight: f64) -> TypesResult<()> {
    if !(0.0..=1.0).contains(&weight) {
        return Err(TypesError::InvalidWeight { weight });
    }
    Ok(())
}

fn check_distribution(event: &DistributionEvent) -> TypesResult<()> {
    if event.recipient_addresses.is_empty() {
        return Err(TypesError::malformed_distribution(
            event.block,
            "no recipients",
        ));
    }
    if event.recipient_addresses.len() != event.amounts.len() {
        return Err(TypesError::malformed_distribution(
            event.block,
            format!(
                "{} recipients but {} amounts",
                event.recipient_addresses.len(),
                event.amounts.len()
            ),
        ));
    }
    if event.batch_first_block > event.batch_last_block {
        return Err(TypesError::malformed_distribution(
            event.block,
            format!(
                "window {}..={} is empty",
                event.batch_first_block, event.batch_last_block
            ),
        ));
    }
    if !event.batch_split.is_valid() {
        return Err(TypesError::InvalidSplit {
            fraction: event.batch_split.fraction_for_delegators,
        });
    }
    Ok(())
}

impl EventHistory {
    /// Create an empty history valid from `starting_block`.
    ///
    /// Nothing is processed yet, so `last_processed_block` starts one block
    /// before `starting_block`.
    pub fn new(delegate_address: Address, starting_block: BlockNumber) -> Self {
        Self {
            delegate_address,
            starting_block,
            last_processed_block: starting_block.saturating_sub(1),
            delegation_change_events: Vec::new(),
            committee_change_events: Vec::new(),
            assignment_events: Vec::new(),
            distribution_events: Vec::new(),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn delegate_address(&self) -> &Address {
        &self.delegate_address
    }

    pub fn starting_block(&self) -> BlockNumber {
        self.starting_block
    }

    pub fn last_processed_block(&self) -> BlockNumber {
        self.last_processed_block
    }

    pub fn delegation_change_events(&self) -> &[DelegationChangeEvent] {
        &self.delegation_change_events
    }

    pub fn committee_change_events(&self) -> &[CommitteeChangeEvent] {
        &self.committee_change_events
    }

    pub fn assignment_events(&self) -> &[AssignmentEvent] {
        &self.assignment_events
    }

    pub fn distribution_events(&self) -> &[DistributionEvent] {
        &self.distribution_events
    }

    // =========================================================================
    // Ingestion
    // =========================================================================

    /// Record a delegation change.
    pub fn push_delegation_change(
        &mut self,
        block: BlockNumber,
        delegator_address: Address,
        new_delegated_stake: Amount,
    ) -> TypesResult<()> {
        let last = self.delegation_change_events.last().map(|e| e.block);
        check_order("delegation change", block, last, self.starting_block)?;
        self.delegation_change_events.push(DelegationChangeEvent {
            block,
            delegator_address,
            new_delegated_stake,
        });
        Ok(())
    }

    /// Record a change of the delegate's relative committee weight.
    pub fn push_committee_change(
        &mut self,
        block: BlockNumber,
        new_relative_weight_in_committee: f64,
    ) -> TypesResult<()> {
        let last = self.committee_change_events.last().map(|e| e.block);
        check_order("committee change", block, last, self.starting_block)?;
        check_weight(new_relative_weight_in_committee)?;
        self.committee_change_events.push(CommitteeChangeEvent {
            block,
            new_relative_weight_in_committee,
        });
        Ok(())
    }

    /// Record a reward assignment to the delegate.
    pub fn push_assignment(&mut self, block: BlockNumber, amount: Amount) -> TypesResult<()> {
        let last = self.assignment_events.last().map(|e| e.block);
        check_order("assignment", block, last, self.starting_block)?;
        self.assignment_events.push(AssignmentEvent { block, amount });
        Ok(())
    }

    /// Record a confirmed distribution transaction.
    pub fn push_distribution(&mut self, event: DistributionEvent) -> TypesResult<()> {
        let last = self.distribution_events.last().map(|e| e.block);
        check_order("distribution", event.block, last, self.starting_block)?;
        check_distribution(&event)?;
        self.distribution_events.push(event);
        Ok(())
    }

    /// Convenience wrapper around [`push_distribution`](Self::push_distribution).
    #[allow(clippy::too_many_arguments)]
    pub fn push_distribution_parts(
        &mut self,
        block: BlockNumber,
        recipient_addresses: Vec<Address>,
        amounts: Vec<Amount>,
        batch_first_block: BlockNumber,
        batch_last_block: BlockNumber,
        batch_split: Split,
        batch_tx_index: u32,
    ) -> TypesResult<()> {
        self.push_distribution(DistributionEvent {
            block,
            recipient_addresses,
            amounts,
            batch_first_block,
            batch_last_block,
            batch_split,
            batch_tx_index,
            timestamp: 0,
        })
    }

    /// Declare every stream complete up to and including `block`.
    ///
    /// Re-marking the current block is a no-op; moving backwards fails.
    pub fn mark_processed(&mut self, block: BlockNumber) -> TypesResult<()> {
        if block < self.last_processed_block {
            return Err(TypesError::ProcessedBlockRegression {
                current: self.last_processed_block,
                requested: block,
            });
        }
        self.last_processed_block = block;
        Ok(())
    }

    // =========================================================================
    // Validation and persistence
    // =========================================================================

    /// Re-check every invariant.
    ///
    /// Histories built through the push API always pass; this is meant for
    /// histories deserialized from disk.
    pub fn validate(&self) -> TypesResult<()> {
        let start = self.starting_block;

        let mut last = None;
        for e in &self.delegation_change_events {
            check_order("delegation change", e.block, last, start)?;
            last = Some(e.block);
        }

        let mut last = None;
        for e in &self.committee_change_events {
            check_order("committee change", e.block, last, start)?;
            check_weight(e.new_relative_weight_in_committee)?;
            last = Some(e.block);
        }

        let mut last = None;
        for e in &self.assignment_events {
            check_order("assignment", e.block, last, start)?;
            last = Some(e.block);
        }

        let mut last = None;
        for e in &self.distribution_events {
            check_order("distribution", e.block, last, start)?;
            check_distribution(e)?;
            last = Some(e.block);
        }

        Ok(())
    }

    /// Load and validate a history stored as JSON.
    pub fn load_json(path: &Path) -> TypesResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let history: Self = serde_json::from_str(&contents)?;
        history.validate()?;
        Ok(history)
    }

    /// Store the history as pretty-printed JSON.
    pub fn save_json(&self, path: &Path) -> TypesResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u8) -> Address {
        Address::parse(&format!("0x{:040x}", n)).unwrap()
    }

    fn split() -> Split {
        Split {
            fraction_for_delegators: 0.6,
        }
    }

    #[test]
    fn test_new_history_has_nothing_processed() {
        let history = EventHistory::new(addr(0xaa), 100);
        assert_eq!(history.starting_block(), 100);
        assert_eq!(history.last_processed_block(), 99);
        assert!(history.assignment_events().is_empty());
    }

    #[test]
    fn test_push_keeps_block_order() {
        let mut history = EventHistory::new(addr(0xaa), 1);
        history.push_assignment(5, Amount::from(10u32)).unwrap();
        history.push_assignment(5, Amount::from(20u32)).unwrap();

        let err = history.push_assignment(4, Amount::from(1u32)).unwrap_err();
        assert!(matches!(err, TypesError::UnsortedEvent { block: 4, last: 5, .. }));

        // Ties keep arrival order
        assert_eq!(history.assignment_events()[0].amount, Amount::from(10u32));
        assert_eq!(history.assignment_events()[1].amount, Amount::from(20u32));
    }

    #[test]
    fn test_push_rejects_events_before_start() {
        let mut history = EventHistory::new(addr(0xaa), 10);
        let err = history
            .push_delegation_change(9, addr(1), Amount::from(1u32))
            .unwrap_err();
        assert!(matches!(err, TypesError::BeforeStartingBlock { .. }));
    }

    #[test]
    fn test_committee_weight_bounds() {
        let mut history = EventHistory::new(addr(0xaa), 1);
        assert!(history.push_committee_change(1, 0.0).is_ok());
        assert!(history.push_committee_change(2, 1.0).is_ok());
        assert!(history.push_committee_change(3, 1.5).is_err());
        assert!(history.push_committee_change(3, f64::NAN).is_err());
    }

    #[test]
    fn test_distribution_shape_checked() {
        let mut history = EventHistory::new(addr(0xaa), 1);

        let err = history
            .push_distribution_parts(6, vec![addr(0xaa)], vec![], 1, 5, split(), 0)
            .unwrap_err();
        assert!(matches!(err, TypesError::MalformedDistribution { .. }));

        let err = history
            .push_distribution_parts(6, vec![], vec![], 1, 5, split(), 0)
            .unwrap_err();
        assert!(matches!(err, TypesError::MalformedDistribution { .. }));

        let err = history
            .push_distribution_parts(6, vec![addr(0xaa)], vec![Amount::from(1u32)], 5, 1, split(), 0)
            .unwrap_err();
        assert!(matches!(err, TypesError::MalformedDistribution { .. }));

        assert!(history
            .push_distribution_parts(6, vec![addr(0xaa)], vec![Amount::from(1u32)], 1, 5, split(), 0)
            .is_ok());
    }

    #[test]
    fn test_mark_processed_is_monotonic() {
        let mut history = EventHistory::new(addr(0xaa), 1);
        history.mark_processed(10).unwrap();
        history.mark_processed(10).unwrap();
        assert!(history.mark_processed(9).is_err());
        assert_eq!(history.last_processed_block(), 10);
    }

    #[test]
    fn test_json_roundtrip_through_file() {
        let mut history = EventHistory::new(addr(0xaa), 1);
        history.push_committee_change(1, 0.25).unwrap();
        history
            .push_delegation_change(2, addr(1), "1000000000000000000000".parse().unwrap())
            .unwrap();
        history.push_assignment(3, Amount::from(500u32)).unwrap();
        history
            .push_distribution_parts(4, vec![addr(0xaa)], vec![Amount::from(500u32)], 1, 3, split(), 0)
            .unwrap();
        history.mark_processed(4).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        history.save_json(&path).unwrap();

        let loaded = EventHistory::load_json(&path).unwrap();
        assert_eq!(loaded, history);
    }

    #[test]
    fn test_load_rejects_unsorted_file() {
        let json = format!(
            r#"{{"delegate_address":"{}","starting_block":1,"last_processed_block":9,
                "assignment_events":[{{"block":5,"amount":"1"}},{{"block":2,"amount":"1"}}]}}"#,
            addr(0xaa)
        );
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, json).unwrap();

        let err = EventHistory::load_json(&path).unwrap_err();
        assert!(matches!(err, TypesError::UnsortedEvent { .. }));
    }
}
