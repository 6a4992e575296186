use crate::domain::balance::Amount;
use crate::domain::payer::PayerId;
use crate::error::{MonetizerError, Result};
use serde::Deserialize;

/// A payment chunk accepted by the transport, before it is fulfilled.
///
/// `destination` is the full ILP address the sender paid to; the receiver
/// embedded the payer id in it when handing out that address.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct PaymentChunk {
    pub destination: String,
    pub amount: String,
}

impl PaymentChunk {
    pub fn new(destination: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            amount: amount.into(),
        }
    }

    /// The payer id is the third segment from the end of the destination:
    /// `<receiver prefix>.<payer id>.<connection tag>.<chunk tag>`.
    pub fn payer_id(&self) -> Result<PayerId> {
        let segments: Vec<&str> = self.destination.split('.').collect();
        if segments.len() < 3 {
            return Err(MonetizerError::MalformedNotification(format!(
                "destination {:?} has too few segments",
                self.destination
            )));
        }

        let id = segments[segments.len() - 3];
        if id.is_empty() {
            return Err(MonetizerError::MalformedNotification(format!(
                "destination {:?} carries an empty payer id",
                self.destination
            )));
        }
        Ok(PayerId::from(id))
    }

    pub fn amount(&self) -> Result<Amount> {
        self.amount.parse()
    }
}
