use crate::domain::balance::Balance;
use crate::domain::payer::PayerId;
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::oneshot;
use tracing::{debug, trace};

type WaitId = u64;

struct PendingWait {
    threshold: Balance,
    signal: oneshot::Sender<Balance>,
}

/// Pending balance waits, keyed by payer.
///
/// Each wait is an independent record with its own id, so several waits on
/// the same payer (even with equal thresholds) are completed or cancelled
/// without disturbing each other. A record leaves the map exactly once:
/// either [`publish`](WaitRegistry::publish) completes it or its
/// [`WaitHandle`] removes it.
#[derive(Default, Clone)]
pub struct WaitRegistry {
    waits: Arc<DashMap<PayerId, HashMap<WaitId, PendingWait>>>,
    next_id: Arc<AtomicU64>,
}

impl WaitRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a wait that completes once a published balance for
    /// `payer_id` reaches `threshold`.
    pub fn register(&self, payer_id: &PayerId, threshold: Balance) -> WaitHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (signal, receiver) = oneshot::channel();

        self.waits
            .entry(payer_id.clone())
            .or_default()
            .insert(id, PendingWait { threshold, signal });
        debug!(payer = %payer_id, %threshold, wait = id, "awaiting balance");

        WaitHandle {
            registry: self.clone(),
            payer_id: payer_id.clone(),
            id,
            receiver,
            settled: None,
        }
    }

    /// Delivers a balance-changed event. Every wait on `payer_id` whose
    /// threshold is met is removed and completed; the rest stay registered.
    /// Returns how many waits were completed.
    pub fn publish(&self, payer_id: &PayerId, balance: Balance) -> usize {
        let (completed, now_empty) = {
            let Some(mut waits) = self.waits.get_mut(payer_id) else {
                return 0;
            };
            let ready: Vec<WaitId> = waits
                .iter()
                .filter(|(_, wait)| wait.threshold <= balance)
                .map(|(id, _)| *id)
                .collect();
            for id in &ready {
                if let Some(wait) = waits.remove(id) {
                    // The waiting side may already be gone; nothing to do then.
                    let _ = wait.signal.send(balance);
                    trace!(payer = %payer_id, wait = id, %balance, "wait satisfied");
                }
            }
            (ready.len(), waits.is_empty())
        };

        if now_empty {
            self.waits.remove_if(payer_id, |_, waits| waits.is_empty());
        }
        completed
    }

    /// Number of waits currently registered for `payer_id`.
    pub fn pending(&self, payer_id: &PayerId) -> usize {
        self.waits.get(payer_id).map_or(0, |waits| waits.len())
    }

    /// Number of waits currently registered across all payers.
    pub fn pending_total(&self) -> usize {
        self.waits.iter().map(|waits| waits.len()).sum()
    }

    fn deregister(&self, payer_id: &PayerId, id: WaitId) -> bool {
        let removed = match self.waits.get_mut(payer_id) {
            Some(mut waits) => waits.remove(&id).is_some(),
            None => false,
        };
        if removed {
            self.waits.remove_if(payer_id, |_, waits| waits.is_empty());
            debug!(payer = %payer_id, wait = id, "wait cancelled");
        }
        removed
    }
}

/// Caller's side of a registered wait.
///
/// Dropping the handle (including dropping a future that is awaiting
/// [`wait`](WaitHandle::wait)) removes the record from the registry, so an
/// abandoned request never leaves a listener behind.
pub struct WaitHandle {
    registry: WaitRegistry,
    payer_id: PayerId,
    id: WaitId,
    receiver: oneshot::Receiver<Balance>,
    settled: Option<Balance>,
}

impl WaitHandle {
    /// Returns the balance that satisfied this wait, if it has completed.
    pub fn try_balance(&mut self) -> Option<Balance> {
        if self.settled.is_none() {
            self.settled = self.receiver.try_recv().ok();
        }
        self.settled
    }

    /// Suspends until the threshold is reached.
    pub async fn wait(mut self) -> Balance {
        if let Some(balance) = self.settled {
            return balance;
        }
        match (&mut self.receiver).await {
            Ok(balance) => balance,
            // The sender only leaves the registry through `publish`, which
            // sends first, or through this handle's own deregistration.
            Err(_) => std::future::pending().await,
        }
    }

    /// Removes the wait. Returns false if it had already completed.
    pub fn cancel(self) -> bool {
        self.registry.deregister(&self.payer_id, self.id)
    }
}

impl Drop for WaitHandle {
    fn drop(&mut self) {
        self.registry.deregister(&self.payer_id, self.id);
    }
}
