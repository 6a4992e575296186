use crate::application::wait_registry::{WaitHandle, WaitRegistry};
use crate::domain::balance::{Amount, Balance, BalanceCap, LedgerEntry};
use crate::domain::payer::PayerId;
use crate::error::{MonetizerError, Result};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Single source of truth for per-payer balances.
///
/// Entries live in a sharded concurrent map, so every credit and debit is a
/// read-modify-write under the shard lock of its payer. Credits publish the
/// new balance to the [`WaitRegistry`] while that lock is still held, which
/// keeps balance-changed events for one payer in the order the credits were
/// applied.
///
/// Cloning is cheap and shares the underlying state.
#[derive(Clone, Default)]
pub struct BalanceLedger {
    entries: Arc<DashMap<PayerId, LedgerEntry>>,
    cap: BalanceCap,
    registry: WaitRegistry,
}

/// Outcome of [`BalanceLedger::register_wait`].
pub enum BalanceWait {
    /// The threshold was already met; nothing was left registered.
    Ready(Balance),
    Pending(WaitHandle),
}

impl BalanceWait {
    pub fn is_ready(&self) -> bool {
        matches!(self, BalanceWait::Ready(_))
    }

    pub async fn wait(self) -> Balance {
        match self {
            BalanceWait::Ready(balance) => balance,
            BalanceWait::Pending(handle) => handle.wait().await,
        }
    }
}

impl BalanceLedger {
    pub fn new(cap: BalanceCap) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            cap,
            registry: WaitRegistry::new(),
        }
    }

    pub fn cap(&self) -> BalanceCap {
        self.cap
    }

    pub fn registry(&self) -> &WaitRegistry {
        &self.registry
    }

    /// Applies a credit, capped at the ledger's maximum balance, and notifies
    /// waiters on this payer. Returns the new balance.
    pub fn credit(&self, payer_id: &PayerId, amount: Amount) -> Balance {
        let mut entry = self
            .entries
            .entry(payer_id.clone())
            .or_insert_with(|| LedgerEntry::new(payer_id.clone(), self.cap));
        let balance = entry.credit(amount);
        let woken = self.registry.publish(payer_id, balance);
        drop(entry);

        debug!(payer = %payer_id, %amount, %balance, woken, "got money for bucket");
        balance
    }

    /// Parses an amount as delivered by the transport and credits it.
    ///
    /// Negative or non-numeric amounts are rejected with
    /// [`MonetizerError::InvalidAmount`] and leave the ledger untouched.
    pub fn credit_raw(&self, payer_id: &PayerId, raw_amount: &str) -> Result<Balance> {
        let amount = raw_amount.parse::<Amount>().inspect_err(|e| {
            warn!(payer = %payer_id, error = %e, "rejected credit");
        })?;
        Ok(self.credit(payer_id, amount))
    }

    /// Atomically removes `price` from the payer's balance.
    ///
    /// Fails with [`MonetizerError::InsufficientBalance`] without touching the
    /// balance when it does not cover the price. A payer that was never
    /// credited has a zero balance.
    pub fn debit(&self, payer_id: &PayerId, price: Amount) -> Result<Balance> {
        let result = match self.entries.get_mut(payer_id) {
            Some(mut entry) => entry.debit(price),
            None if price.is_zero() => Ok(Balance::ZERO),
            None => Err(MonetizerError::InsufficientBalance {
                payer_id: payer_id.clone(),
                price: price.into(),
                balance: Balance::ZERO,
            }),
        };

        if let Ok(balance) = &result {
            debug!(payer = %payer_id, %price, %balance, "spent money");
        }
        result
    }

    pub fn balance_of(&self, payer_id: &PayerId) -> Balance {
        self.entries
            .get(payer_id)
            .map_or(Balance::ZERO, |entry| entry.balance)
    }

    /// All entries, ordered by payer id.
    pub fn snapshot(&self) -> Vec<(PayerId, Balance)> {
        let mut balances: Vec<(PayerId, Balance)> = self
            .entries
            .iter()
            .map(|entry| (entry.key().clone(), entry.balance))
            .collect();
        balances.sort();
        balances
    }

    /// Checks the balance and, if it is short of `threshold`, registers a
    /// wait for a future credit.
    ///
    /// The wait is registered before the balance is read a second time, so a
    /// credit racing with this call is either seen by the re-check or
    /// delivered to the registered wait.
    pub fn register_wait(&self, payer_id: &PayerId, threshold: Balance) -> Result<BalanceWait> {
        if let Some(cap) = self.cap.limit()
            && threshold > cap
        {
            return Err(MonetizerError::ThresholdAboveCap { threshold, cap });
        }

        let balance = self.balance_of(payer_id);
        if balance >= threshold {
            return Ok(BalanceWait::Ready(balance));
        }

        let handle = self.registry.register(payer_id, threshold);
        let balance = self.balance_of(payer_id);
        if balance >= threshold {
            handle.cancel();
            return Ok(BalanceWait::Ready(balance));
        }
        Ok(BalanceWait::Pending(handle))
    }

    /// Suspends until the payer's balance reaches `threshold`.
    ///
    /// Returns immediately when it already does. Dropping the returned future
    /// deregisters the wait.
    pub async fn await_balance(&self, payer_id: &PayerId, threshold: Balance) -> Result<Balance> {
        Ok(self.register_wait(payer_id, threshold)?.wait().await)
    }

    /// [`await_balance`](Self::await_balance) bounded by `timeout`. On expiry
    /// the wait is deregistered and [`MonetizerError::WaitTimedOut`] returned.
    pub async fn await_balance_timeout(
        &self,
        payer_id: &PayerId,
        threshold: Balance,
        timeout: Duration,
    ) -> Result<Balance> {
        tokio::time::timeout(timeout, self.await_balance(payer_id, threshold))
            .await
            .map_err(|_| MonetizerError::WaitTimedOut {
                payer_id: payer_id.clone(),
                threshold,
            })?
    }

    /// Waits for `price` and debits it, retrying if a concurrent spender took
    /// the funds between the wait completing and the debit.
    pub async fn spend_when_funded(&self, payer_id: &PayerId, price: Amount) -> Result<Balance> {
        loop {
            self.await_balance(payer_id, price.into()).await?;
            match self.debit(payer_id, price) {
                Err(MonetizerError::InsufficientBalance { balance, .. }) => {
                    debug!(payer = %payer_id, %price, %balance, "lost spend race, waiting again");
                }
                result => return result,
            }
        }
    }
}
