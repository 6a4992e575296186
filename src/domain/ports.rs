use super::balance::Balance;
use super::notification::PaymentChunk;
use super::receiver::ReceiverAddress;
use crate::error::Result;
use async_trait::async_trait;

/// Connection to the payment network that hands out receiving addresses.
#[async_trait]
pub trait PaymentTransport: Send + Sync {
    async fn connect(&self) -> Result<()>;
    fn generate_address_and_secret(&self) -> Result<ReceiverAddress>;
}

/// Callback a transport invokes for every incoming chunk.
///
/// The transport fulfills the chunk only after `on_payment` returns `Ok`, so
/// a credit is always applied before the sender sees the chunk accepted.
pub trait PaymentHandler: Send + Sync {
    fn on_payment(&self, chunk: &PaymentChunk) -> Result<Balance>;
}

pub type PaymentTransportBox = Box<dyn PaymentTransport>;
