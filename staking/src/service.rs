//! Serialized service facade over the stake ledger.
//!
//! Each public method takes the lock once, reads `now` from the injected
//! clock, and runs exactly one engine operation — preserving the
//! all-or-nothing, fully serialized execution model the engine assumes.

use std::sync::{Arc, Mutex};

use tracing::{debug, info};

use crate::engine::{StakeLedger, StakeLedgerSummary, UnstakeOutcome};
use crate::error::StakingError;
use crate::events::StakeEvent;
use tenure_token::AssetLedger;
use tenure_types::{Clock, ParticipantAddress};

struct ServiceInner<L> {
    ledger: StakeLedger,
    assets: L,
}

/// A stake ledger plus its asset ledger behind one exclusive critical
/// section, with time injected through a [`Clock`].
pub struct StakingService<L: AssetLedger> {
    clock: Arc<dyn Clock>,
    inner: Mutex<ServiceInner<L>>,
}

impl<L: AssetLedger> StakingService<L> {
    pub fn new(ledger: StakeLedger, assets: L, clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            inner: Mutex::new(ServiceInner { ledger, assets }),
        }
    }

    /// Stake `amount` of the participant's tokens.
    pub fn stake(
        &self,
        participant: &ParticipantAddress,
        amount: u128,
    ) -> Result<(), StakingError> {
        let now = self.clock.now();
        let mut guard = self.lock()?;
        let ServiceInner { ledger, assets } = &mut *guard;
        let result = ledger.stake(assets, participant, amount, now);
        match &result {
            Ok(()) => info!(participant = %participant, amount, "stake accepted"),
            Err(e) => debug!(participant = %participant, amount, error = %e, "stake rejected"),
        }
        result
    }

    /// Withdraw the participant's whole position.
    pub fn unstake(&self, participant: &ParticipantAddress) -> Result<UnstakeOutcome, StakingError> {
        let now = self.clock.now();
        let mut guard = self.lock()?;
        let ServiceInner { ledger, assets } = &mut *guard;
        let result = ledger.unstake(assets, participant, now);
        match &result {
            Ok(outcome) => info!(
                participant = %participant,
                principal = outcome.principal,
                reward = outcome.reward,
                "unstake paid out"
            ),
            Err(e) => debug!(participant = %participant, error = %e, "unstake rejected"),
        }
        result
    }

    /// Current reward for a participant at the clock's `now`.
    pub fn calculate_reward(&self, participant: &ParticipantAddress) -> Result<u128, StakingError> {
        let now = self.clock.now();
        let guard = self.lock()?;
        Ok(guard.ledger.calculate_reward(participant, now))
    }

    /// Staked principal of a participant.
    pub fn staked_amount(&self, participant: &ParticipantAddress) -> Result<u128, StakingError> {
        Ok(self.lock()?.ledger.staked_amount(participant))
    }

    /// Sum of all staked principal.
    pub fn total_staked(&self) -> Result<u128, StakingError> {
        Ok(self.lock()?.ledger.total_staked())
    }

    /// Ledger summary statistics.
    pub fn summary(&self) -> Result<StakeLedgerSummary, StakingError> {
        Ok(self.lock()?.ledger.summary())
    }

    /// Take everything journaled so far.
    pub fn drain_events(&self) -> Result<Vec<StakeEvent>, StakingError> {
        Ok(self.lock()?.ledger.drain_events())
    }

    /// Hand the ledger to a new owner.
    pub fn transfer_ownership(
        &self,
        caller: &ParticipantAddress,
        new_owner: ParticipantAddress,
    ) -> Result<(), StakingError> {
        let mut guard = self.lock()?;
        let result = guard.ledger.transfer_ownership(caller, new_owner);
        if result.is_ok() {
            info!(caller = %caller, "ownership transferred");
        }
        result
    }

    /// Sweep reward-pool funds out of custody.
    pub fn withdraw_surplus(
        &self,
        caller: &ParticipantAddress,
        to: &ParticipantAddress,
        amount: u128,
    ) -> Result<(), StakingError> {
        let mut guard = self.lock()?;
        let ServiceInner { ledger, assets } = &mut *guard;
        let result = ledger.withdraw_surplus(assets, caller, to, amount);
        match &result {
            Ok(()) => info!(caller = %caller, to = %to, amount, "surplus withdrawn"),
            Err(e) => debug!(caller = %caller, amount, error = %e, "surplus withdrawal rejected"),
        }
        result
    }

    /// Run `f` against the asset ledger inside the same critical section the
    /// staking operations use. For host bookkeeping such as funding the
    /// reward pool.
    pub fn with_assets<T>(&self, f: impl FnOnce(&mut L) -> T) -> Result<T, StakingError> {
        let mut guard = self.lock()?;
        Ok(f(&mut guard.assets))
    }

    /// Tear the service down, returning the ledger and asset state.
    pub fn into_parts(self) -> Result<(StakeLedger, L), StakingError> {
        let inner = self
            .inner
            .into_inner()
            .map_err(|_| StakingError::LockPoisoned)?;
        Ok((inner.ledger, inner.assets))
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, ServiceInner<L>>, StakingError> {
        self.inner.lock().map_err(|_| StakingError::LockPoisoned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tenure_token::{TokenInfo, TokenLedger};
    use tenure_types::{ManualClock, StakingParams, Timestamp};

    const WEEK: u64 = 7 * 24 * 3600;

    fn addr(name: &str) -> ParticipantAddress {
        ParticipantAddress::new(format!("tnr_{name}"))
    }

    fn service(balance: u128) -> (StakingService<TokenLedger>, Arc<ManualClock>, ParticipantAddress) {
        let minter = addr("minter");
        let alice = addr("alice");
        let custodian = addr("custody");

        let mut assets = TokenLedger::new(minter.clone(), TokenInfo::tenure());
        assets.mint(&minter, &alice, balance).unwrap();
        assets.approve(&alice, &custodian, balance);

        let ledger = StakeLedger::new(
            addr("owner"),
            custodian,
            StakingParams {
                min_staking_period_secs: WEEK,
                reward_rate_percent: 10,
            },
        );
        let clock = Arc::new(ManualClock::new(Timestamp::new(1_000)));
        (
            StakingService::new(ledger, assets, clock.clone()),
            clock,
            alice,
        )
    }

    #[test]
    fn operations_use_the_injected_clock() {
        let (service, clock, alice) = service(1_000);
        service.stake(&alice, 500).unwrap();

        clock.advance(WEEK - 1);
        assert!(matches!(
            service.unstake(&alice),
            Err(StakingError::StakingPeriodNotMet { .. })
        ));

        clock.advance(1);
        let outcome = service.unstake(&alice).unwrap();
        assert_eq!(outcome.principal, 500);
        assert_eq!(outcome.reward, 0);
    }

    #[test]
    fn reward_is_stable_while_the_clock_stands_still() {
        let (service, clock, alice) = service(1_000);
        service.stake(&alice, 1_000).unwrap();
        clock.advance(2 * WEEK);

        let first = service.calculate_reward(&alice).unwrap();
        assert_eq!(first, 100);
        for _ in 0..3 {
            assert_eq!(service.calculate_reward(&alice).unwrap(), first);
        }
    }

    #[test]
    fn with_assets_shares_the_critical_section() {
        let (service, clock, alice) = service(1_000);
        service.stake(&alice, 1_000).unwrap();
        clock.advance(2 * WEEK);

        // Fund the reward pool, then the withdrawal succeeds.
        let minter = addr("minter");
        service
            .with_assets(|assets| assets.mint(&minter, &addr("custody"), 100))
            .unwrap()
            .unwrap();

        let outcome = service.unstake(&alice).unwrap();
        assert_eq!(outcome.reward, 100);
        assert_eq!(service.total_staked().unwrap(), 0);
    }

    #[test]
    fn into_parts_returns_final_state() {
        let (service, _, alice) = service(1_000);
        service.stake(&alice, 250).unwrap();

        let (ledger, assets) = service.into_parts().unwrap();
        assert_eq!(ledger.total_staked(), 250);
        assert_eq!(assets.balance_of(&addr("custody")), 250);
    }
}
