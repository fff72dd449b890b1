//! The stake ledger — one record per participant, custody on the asset ledger.

use std::collections::HashMap;

use crate::error::StakingError;
use crate::events::{StakeEvent, TokensStaked, TokensUnstaked};
use crate::record::StakeRecord;
use crate::reward;
use tenure_token::AssetLedger;
use tenure_types::{ParticipantAddress, StakingParams, Timestamp};

/// The stake ledger state machine.
///
/// Owns the stake table and the immutable parameters; custody of the staked
/// tokens lives on the external asset ledger under `custodian`. Every
/// operation takes an explicit `now` and the asset ledger it moves funds
/// through, validates all preconditions before the first write, and either
/// completes all of its effects or none.
///
/// Invariant: `total_staked` equals the sum of all record amounts and never
/// exceeds the custodian's balance on the asset ledger. Custody held beyond
/// `total_staked` is the reward pool.
pub struct StakeLedger {
    owner: ParticipantAddress,
    custodian: ParticipantAddress,
    params: StakingParams,
    stakes: HashMap<ParticipantAddress, StakeRecord>,
    total_staked: u128,
    journal: Vec<StakeEvent>,
}

/// What an unstake paid out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnstakeOutcome {
    pub principal: u128,
    pub reward: u128,
}

/// Summary statistics for the stake ledger.
#[derive(Clone, Debug)]
pub struct StakeLedgerSummary {
    pub participants: usize,
    pub total_staked: u128,
    pub events: usize,
}

impl StakeLedger {
    pub fn new(
        owner: ParticipantAddress,
        custodian: ParticipantAddress,
        params: StakingParams,
    ) -> Self {
        Self {
            owner,
            custodian,
            params,
            stakes: HashMap::new(),
            total_staked: 0,
            journal: Vec::new(),
        }
    }

    pub fn owner(&self) -> &ParticipantAddress {
        &self.owner
    }

    pub fn custodian(&self) -> &ParticipantAddress {
        &self.custodian
    }

    pub fn params(&self) -> &StakingParams {
        &self.params
    }

    /// Lock `amount` of the participant's tokens in custody.
    ///
    /// Pulls the tokens through the participant's allowance to the custodian,
    /// then adds `amount` to the record and resets its `since` to `now` — a
    /// top-up restarts the withdrawal gate for the whole position.
    pub fn stake<L: AssetLedger>(
        &mut self,
        assets: &mut L,
        participant: &ParticipantAddress,
        amount: u128,
        now: Timestamp,
    ) -> Result<(), StakingError> {
        if amount == 0 {
            return Err(StakingError::InvalidAmount);
        }
        let available = assets.balance_of(participant);
        if available < amount {
            return Err(StakingError::InsufficientBalance {
                needed: amount,
                available,
            });
        }
        let staked = self.staked_amount(participant);
        let new_staked = staked.checked_add(amount).ok_or(StakingError::Overflow)?;
        let new_total = self
            .total_staked
            .checked_add(amount)
            .ok_or(StakingError::Overflow)?;

        // Last fallible step; everything after this is infallible, so a
        // failure here leaves both ledgers untouched.
        assets.transfer_from(&self.custodian, participant, &self.custodian, amount)?;

        self.stakes
            .insert(participant.clone(), StakeRecord::new(new_staked, now));
        self.total_staked = new_total;
        self.journal.push(StakeEvent::Staked(TokensStaked {
            participant: participant.clone(),
            amount,
            timestamp: now,
        }));
        Ok(())
    }

    /// Withdraw the participant's whole position: principal plus reward.
    ///
    /// Gated on the minimum staking period; the reward comes out of the
    /// custodian's surplus (custody beyond `total_staked`).
    pub fn unstake<L: AssetLedger>(
        &mut self,
        assets: &mut L,
        participant: &ParticipantAddress,
        now: Timestamp,
    ) -> Result<UnstakeOutcome, StakingError> {
        let record = match self.stakes.get(participant) {
            Some(record) if record.is_active() => *record,
            _ => return Err(StakingError::NothingStaked),
        };
        let required = self.params.min_staking_period_secs;
        if !record.matured(required, now) {
            return Err(StakingError::StakingPeriodNotMet {
                elapsed: record.since.elapsed_since(now),
                required,
            });
        }

        let principal = record.amount;
        let reward = self
            .reward_for(&record, now)
            .ok_or(StakingError::Overflow)?;
        let payout = principal.checked_add(reward).ok_or(StakingError::Overflow)?;

        let custody = assets.balance_of(&self.custodian);
        let surplus = custody.saturating_sub(self.total_staked);
        if reward > surplus {
            return Err(StakingError::InsufficientRewardFunds {
                needed: reward,
                available: surplus,
            });
        }

        assets.transfer(&self.custodian, participant, payout)?;

        self.stakes.remove(participant);
        self.total_staked = self
            .total_staked
            .checked_sub(principal)
            .ok_or(StakingError::Overflow)?;
        self.journal.push(StakeEvent::Unstaked(TokensUnstaked {
            participant: participant.clone(),
            principal,
            reward,
            timestamp: now,
        }));
        Ok(UnstakeOutcome { principal, reward })
    }

    /// Current reward for a participant; zero with no active stake.
    ///
    /// Pure read — repeated calls at the same `now` return the same value.
    pub fn calculate_reward(&self, participant: &ParticipantAddress, now: Timestamp) -> u128 {
        match self.stakes.get(participant) {
            Some(record) if record.is_active() => {
                self.reward_for(record, now).unwrap_or(0)
            }
            _ => 0,
        }
    }

    /// Reward with overflow surfaced instead of clamped.
    pub fn calculate_reward_checked(
        &self,
        participant: &ParticipantAddress,
        now: Timestamp,
    ) -> Result<u128, StakingError> {
        match self.stakes.get(participant) {
            Some(record) if record.is_active() => {
                self.reward_for(record, now).ok_or(StakingError::Overflow)
            }
            _ => Ok(0),
        }
    }

    fn reward_for(&self, record: &StakeRecord, now: Timestamp) -> Option<u128> {
        reward::reward_checked(
            record.amount,
            self.params.reward_rate_percent,
            record.since.elapsed_since(now),
            self.params.min_staking_period_secs,
        )
    }

    // ── Owner-gated administrative surface ───────────────────────────────

    /// Hand the ledger to a new owner.
    pub fn transfer_ownership(
        &mut self,
        caller: &ParticipantAddress,
        new_owner: ParticipantAddress,
    ) -> Result<(), StakingError> {
        self.require_owner(caller)?;
        self.owner = new_owner;
        Ok(())
    }

    /// Sweep reward-pool funds out of custody.
    ///
    /// Capped at the surplus so custody never drops below `total_staked`.
    pub fn withdraw_surplus<L: AssetLedger>(
        &self,
        assets: &mut L,
        caller: &ParticipantAddress,
        to: &ParticipantAddress,
        amount: u128,
    ) -> Result<(), StakingError> {
        self.require_owner(caller)?;
        if amount == 0 {
            return Err(StakingError::InvalidAmount);
        }
        let custody = assets.balance_of(&self.custodian);
        let surplus = custody.saturating_sub(self.total_staked);
        if amount > surplus {
            return Err(StakingError::InsufficientRewardFunds {
                needed: amount,
                available: surplus,
            });
        }
        assets.transfer(&self.custodian, to, amount)?;
        Ok(())
    }

    fn require_owner(&self, caller: &ParticipantAddress) -> Result<(), StakingError> {
        if caller != &self.owner {
            return Err(StakingError::Unauthorized);
        }
        Ok(())
    }

    // ── Views ────────────────────────────────────────────────────────────

    /// Staked principal of a participant; zero if not staking.
    pub fn staked_amount(&self, participant: &ParticipantAddress) -> u128 {
        self.stakes
            .get(participant)
            .map(|record| record.amount)
            .unwrap_or(0)
    }

    /// The participant's record, if they have an active stake.
    pub fn stake_record(&self, participant: &ParticipantAddress) -> Option<&StakeRecord> {
        self.stakes.get(participant).filter(|r| r.is_active())
    }

    /// Sum of all staked principal.
    pub fn total_staked(&self) -> u128 {
        self.total_staked
    }

    /// Number of participants with an active stake.
    pub fn participant_count(&self) -> usize {
        self.stakes.values().filter(|r| r.is_active()).count()
    }

    /// Ledger summary statistics.
    pub fn summary(&self) -> StakeLedgerSummary {
        StakeLedgerSummary {
            participants: self.participant_count(),
            total_staked: self.total_staked,
            events: self.journal.len(),
        }
    }

    // ── Event journal ────────────────────────────────────────────────────

    /// Everything emitted so far, oldest first.
    pub fn journal(&self) -> &[StakeEvent] {
        &self.journal
    }

    /// Take the journal, leaving it empty.
    pub fn drain_events(&mut self) -> Vec<StakeEvent> {
        std::mem::take(&mut self.journal)
    }

    pub(crate) fn stake_entries(&self) -> impl Iterator<Item = (&ParticipantAddress, &StakeRecord)> {
        self.stakes.iter()
    }

    pub(crate) fn restore(
        owner: ParticipantAddress,
        custodian: ParticipantAddress,
        params: StakingParams,
        stakes: HashMap<ParticipantAddress, StakeRecord>,
    ) -> Self {
        let total_staked = stakes.values().map(|r| r.amount).sum();
        Self {
            owner,
            custodian,
            params,
            stakes,
            total_staked,
            journal: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tenure_token::{TokenInfo, TokenLedger};

    const WEEK: u64 = 7 * 24 * 3600;

    fn addr(name: &str) -> ParticipantAddress {
        ParticipantAddress::new(format!("tnr_{name}"))
    }

    fn params() -> StakingParams {
        StakingParams {
            min_staking_period_secs: WEEK,
            reward_rate_percent: 10,
        }
    }

    /// A funded asset ledger plus a stake ledger whose custodian is approved
    /// to pull `approve` tokens from alice.
    fn setup(balance: u128, approve: u128) -> (TokenLedger, StakeLedger, ParticipantAddress) {
        let minter = addr("minter");
        let alice = addr("alice");
        let custodian = addr("custody");

        let mut assets = TokenLedger::new(minter.clone(), TokenInfo::tenure());
        if balance > 0 {
            assets.mint(&minter, &alice, balance).unwrap();
        }
        assets.approve(&alice, &custodian, approve);

        let ledger = StakeLedger::new(addr("owner"), custodian, params());
        (assets, ledger, alice)
    }

    fn fund_rewards(assets: &mut TokenLedger, amount: u128) {
        let minter = addr("minter");
        assets.mint(&minter, &addr("custody"), amount).unwrap();
    }

    #[test]
    fn stake_moves_tokens_into_custody() {
        let (mut assets, mut ledger, alice) = setup(1_000, 1_000);

        ledger
            .stake(&mut assets, &alice, 400, Timestamp::new(0))
            .unwrap();

        assert_eq!(ledger.staked_amount(&alice), 400);
        assert_eq!(ledger.total_staked(), 400);
        assert_eq!(assets.balance_of(&alice), 600);
        assert_eq!(assets.balance_of(ledger.custodian()), 400);
    }

    #[test]
    fn stake_zero_is_invalid() {
        let (mut assets, mut ledger, alice) = setup(1_000, 1_000);
        let result = ledger.stake(&mut assets, &alice, 0, Timestamp::new(0));
        assert!(matches!(result, Err(StakingError::InvalidAmount)));

        // Also invalid for a participant who already staked.
        ledger
            .stake(&mut assets, &alice, 100, Timestamp::new(0))
            .unwrap();
        let result = ledger.stake(&mut assets, &alice, 0, Timestamp::new(10));
        assert!(matches!(result, Err(StakingError::InvalidAmount)));
    }

    #[test]
    fn stake_beyond_balance_leaves_no_trace() {
        let (mut assets, mut ledger, alice) = setup(1_000, 5_000);

        let result = ledger.stake(&mut assets, &alice, 2_000, Timestamp::new(0));
        match result.unwrap_err() {
            StakingError::InsufficientBalance { needed, available } => {
                assert_eq!(needed, 2_000);
                assert_eq!(available, 1_000);
            }
            other => panic!("expected InsufficientBalance, got {other:?}"),
        }
        assert_eq!(ledger.staked_amount(&alice), 0);
        assert_eq!(ledger.total_staked(), 0);
        assert_eq!(assets.balance_of(&alice), 1_000);
        assert!(ledger.journal().is_empty());
    }

    #[test]
    fn stake_without_allowance_fails_cleanly() {
        let (mut assets, mut ledger, alice) = setup(1_000, 0);

        let result = ledger.stake(&mut assets, &alice, 500, Timestamp::new(0));
        assert!(matches!(result, Err(StakingError::Asset(_))));
        assert_eq!(ledger.staked_amount(&alice), 0);
        assert_eq!(assets.balance_of(&alice), 1_000);
    }

    #[test]
    fn topping_up_resets_the_gate() {
        let (mut assets, mut ledger, alice) = setup(1_000, 1_000);

        ledger
            .stake(&mut assets, &alice, 100, Timestamp::new(0))
            .unwrap();
        ledger
            .stake(&mut assets, &alice, 200, Timestamp::new(500))
            .unwrap();

        let record = ledger.stake_record(&alice).unwrap();
        assert_eq!(record.amount, 300);
        assert_eq!(record.since, Timestamp::new(500));
    }

    #[test]
    fn unstake_before_gate_fails() {
        let (mut assets, mut ledger, alice) = setup(1_000, 1_000);
        ledger
            .stake(&mut assets, &alice, 500, Timestamp::new(0))
            .unwrap();

        let result = ledger.unstake(&mut assets, &alice, Timestamp::new(WEEK - 1));
        match result.unwrap_err() {
            StakingError::StakingPeriodNotMet { elapsed, required } => {
                assert_eq!(elapsed, WEEK - 1);
                assert_eq!(required, WEEK);
            }
            other => panic!("expected StakingPeriodNotMet, got {other:?}"),
        }
        assert_eq!(ledger.staked_amount(&alice), 500);
    }

    #[test]
    fn unstake_at_exact_gate_returns_principal_with_zero_reward() {
        let (mut assets, mut ledger, alice) = setup(1_000, 1_000);
        ledger
            .stake(&mut assets, &alice, 100, Timestamp::new(0))
            .unwrap();

        let outcome = ledger
            .unstake(&mut assets, &alice, Timestamp::new(WEEK))
            .unwrap();
        assert_eq!(outcome, UnstakeOutcome { principal: 100, reward: 0 });
        assert_eq!(ledger.staked_amount(&alice), 0);
        assert_eq!(ledger.total_staked(), 0);
        assert_eq!(assets.balance_of(&alice), 1_000);

        match ledger.journal().last().unwrap() {
            StakeEvent::Unstaked(ev) => {
                assert_eq!(ev.principal, 100);
                assert_eq!(ev.reward, 0);
                assert_eq!(ev.participant, alice);
            }
            other => panic!("expected Unstaked event, got {other:?}"),
        }
    }

    #[test]
    fn unstake_with_no_stake_fails() {
        let (mut assets, mut ledger, alice) = setup(1_000, 1_000);
        let result = ledger.unstake(&mut assets, &alice, Timestamp::new(WEEK));
        assert!(matches!(result, Err(StakingError::NothingStaked)));
    }

    #[test]
    fn reward_paid_from_surplus() {
        let (mut assets, mut ledger, alice) = setup(1_000, 1_000);
        ledger
            .stake(&mut assets, &alice, 1_000, Timestamp::new(0))
            .unwrap();
        fund_rewards(&mut assets, 500);

        // Two full periods: one beyond the gate -> 10% of principal.
        let outcome = ledger
            .unstake(&mut assets, &alice, Timestamp::new(2 * WEEK))
            .unwrap();
        assert_eq!(outcome.principal, 1_000);
        assert_eq!(outcome.reward, 100);
        assert_eq!(assets.balance_of(&alice), 1_100);
        assert_eq!(assets.balance_of(ledger.custodian()), 400);
    }

    #[test]
    fn unstake_fails_when_reward_pool_is_dry() {
        let (mut assets, mut ledger, alice) = setup(1_000, 1_000);
        ledger
            .stake(&mut assets, &alice, 1_000, Timestamp::new(0))
            .unwrap();

        let result = ledger.unstake(&mut assets, &alice, Timestamp::new(2 * WEEK));
        match result.unwrap_err() {
            StakingError::InsufficientRewardFunds { needed, available } => {
                assert_eq!(needed, 100);
                assert_eq!(available, 0);
            }
            other => panic!("expected InsufficientRewardFunds, got {other:?}"),
        }
        // Position is intact; the participant can wait for funding.
        assert_eq!(ledger.staked_amount(&alice), 1_000);
    }

    #[test]
    fn calculate_reward_without_stake_is_zero() {
        let (_, ledger, alice) = setup(1_000, 1_000);
        assert_eq!(ledger.calculate_reward(&alice, Timestamp::new(10 * WEEK)), 0);
    }

    #[test]
    fn calculate_reward_is_idempotent_at_fixed_now() {
        let (mut assets, mut ledger, alice) = setup(1_000, 1_000);
        ledger
            .stake(&mut assets, &alice, 1_000, Timestamp::new(0))
            .unwrap();

        let now = Timestamp::new(3 * WEEK);
        let first = ledger.calculate_reward(&alice, now);
        assert_eq!(first, 200);
        for _ in 0..5 {
            assert_eq!(ledger.calculate_reward(&alice, now), first);
        }
    }

    #[test]
    fn reward_overflow_is_clamped_or_surfaced() {
        let (mut assets, mut ledger, alice) = setup(u128::MAX, u128::MAX);
        ledger
            .stake(&mut assets, &alice, u128::MAX, Timestamp::new(0))
            .unwrap();

        let later = Timestamp::new(3 * WEEK);
        assert_eq!(ledger.calculate_reward(&alice, later), 0);
        assert!(matches!(
            ledger.calculate_reward_checked(&alice, later),
            Err(StakingError::Overflow)
        ));

        // The position survives a withdrawal attempt that would overflow.
        let result = ledger.unstake(&mut assets, &alice, later);
        assert!(matches!(result, Err(StakingError::Overflow)));
        assert_eq!(ledger.staked_amount(&alice), u128::MAX);
    }

    #[test]
    fn ownership_transfer_is_owner_gated() {
        let (_, mut ledger, alice) = setup(1_000, 1_000);

        let result = ledger.transfer_ownership(&alice, addr("mallory"));
        assert!(matches!(result, Err(StakingError::Unauthorized)));
        assert_eq!(ledger.owner(), &addr("owner"));

        ledger
            .transfer_ownership(&addr("owner"), alice.clone())
            .unwrap();
        assert_eq!(ledger.owner(), &alice);
    }

    #[test]
    fn surplus_withdrawal_never_touches_principal() {
        let (mut assets, mut ledger, alice) = setup(1_000, 1_000);
        ledger
            .stake(&mut assets, &alice, 800, Timestamp::new(0))
            .unwrap();
        fund_rewards(&mut assets, 300);

        let owner = addr("owner");
        // More than the surplus is refused even for the owner.
        let result = ledger.withdraw_surplus(&mut assets, &owner, &owner, 301);
        assert!(matches!(
            result,
            Err(StakingError::InsufficientRewardFunds { .. })
        ));

        ledger
            .withdraw_surplus(&mut assets, &owner, &owner, 300)
            .unwrap();
        assert_eq!(assets.balance_of(ledger.custodian()), 800);
        assert_eq!(ledger.total_staked(), 800);

        let result = ledger.withdraw_surplus(&mut assets, &alice, &alice, 1);
        assert!(matches!(result, Err(StakingError::Unauthorized)));
    }

    #[test]
    fn journal_records_the_full_history() {
        let (mut assets, mut ledger, alice) = setup(1_000, 1_000);
        ledger
            .stake(&mut assets, &alice, 100, Timestamp::new(0))
            .unwrap();
        ledger
            .unstake(&mut assets, &alice, Timestamp::new(WEEK))
            .unwrap();

        let events = ledger.drain_events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], StakeEvent::Staked(_)));
        assert!(matches!(events[1], StakeEvent::Unstaked(_)));
        assert!(ledger.journal().is_empty());
    }

    #[test]
    fn summary_counts_active_participants() {
        let (mut assets, mut ledger, alice) = setup(1_000, 1_000);
        let minter = addr("minter");
        let bob = addr("bob");
        assets.mint(&minter, &bob, 500).unwrap();
        assets.approve(&bob, &addr("custody"), 500);

        ledger
            .stake(&mut assets, &alice, 100, Timestamp::new(0))
            .unwrap();
        ledger
            .stake(&mut assets, &bob, 200, Timestamp::new(0))
            .unwrap();

        let summary = ledger.summary();
        assert_eq!(summary.participants, 2);
        assert_eq!(summary.total_staked, 300);
        assert_eq!(summary.events, 2);
    }
}
