use crate::domain::balance::Balance;
use crate::domain::notification::PaymentChunk;
use crate::domain::ports::{PaymentHandler, PaymentTransport};
use crate::domain::receiver::ReceiverAddress;
use crate::error::{MonetizerError, Result};
use async_trait::async_trait;
use rand::RngCore;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tracing::debug;

const SHARED_SECRET_BYTES: usize = 32;

/// An in-process payment transport.
///
/// Issues addresses under a fixed prefix and delivers chunks straight to a
/// [`PaymentHandler`], counting how many chunks were fulfilled and how many
/// were rejected. Chunks themselves are not retained. Useful for tests and offline replay where no payment network
/// is available.
#[derive(Default, Clone)]
pub struct LoopbackTransport {
    prefix: String,
    fail_connect: bool,
    connected: Arc<AtomicBool>,
    connect_attempts: Arc<AtomicUsize>,
    issued: Arc<AtomicUsize>,
    fulfilled: Arc<AtomicUsize>,
    rejected: Arc<AtomicUsize>,
}

impl LoopbackTransport {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ..Self::default()
        }
    }

    /// A transport whose every connection attempt fails.
    pub fn unreachable(prefix: impl Into<String>) -> Self {
        Self {
            fail_connect: true,
            ..Self::new(prefix)
        }
    }

    pub fn connect_attempts(&self) -> usize {
        self.connect_attempts.load(Ordering::SeqCst)
    }

    /// Hands a chunk to `handler` and fulfills it only if the handler
    /// recorded it.
    pub async fn deliver(
        &self,
        handler: &dyn PaymentHandler,
        chunk: PaymentChunk,
    ) -> Result<Balance> {
        match handler.on_payment(&chunk) {
            Ok(balance) => {
                self.fulfilled.fetch_add(1, Ordering::SeqCst);
                Ok(balance)
            }
            Err(e) => {
                self.rejected.fetch_add(1, Ordering::SeqCst);
                Err(e)
            }
        }
    }

    pub fn fulfilled(&self) -> usize {
        self.fulfilled.load(Ordering::SeqCst)
    }

    pub fn rejected(&self) -> usize {
        self.rejected.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PaymentTransport for LoopbackTransport {
    async fn connect(&self) -> Result<()> {
        self.connect_attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_connect {
            return Err(MonetizerError::TransportError(format!(
                "cannot reach payment network at {}",
                self.prefix
            )));
        }
        self.connected.store(true, Ordering::SeqCst);
        debug!(prefix = %self.prefix, "loopback transport connected");
        Ok(())
    }

    fn generate_address_and_secret(&self) -> Result<ReceiverAddress> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(MonetizerError::TransportError(
                "transport is not connected".to_string(),
            ));
        }

        let connection = self.issued.fetch_add(1, Ordering::SeqCst);
        let mut rng = rand::thread_rng();
        let mut tag = [0u8; 8];
        rng.fill_bytes(&mut tag);
        let mut shared_secret = vec![0u8; SHARED_SECRET_BYTES];
        rng.fill_bytes(&mut shared_secret);

        Ok(ReceiverAddress {
            destination_account: format!("{}.c{}.{}", self.prefix, connection, hex::encode(tag)),
            shared_secret,
        })
    }
}
