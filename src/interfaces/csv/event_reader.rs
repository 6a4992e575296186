use crate::error::{MonetizerError, Result};
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// A payment chunk; `target` is the ILP destination it was paid to.
    Payment,
    /// A resource delivery; `target` is the payer id to charge.
    Spend,
}

/// One row of a replay file: `kind, target, amount`.
///
/// `amount` is kept as text so that malformed amounts reach the ledger and
/// are rejected there, like they would be from a live transport.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct LedgerEvent {
    pub kind: EventKind,
    pub target: String,
    pub amount: String,
}

/// Reads ledger events from a CSV source.
pub struct EventReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> EventReader<R> {
    /// Creates a new `EventReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily deserializes events, one row at a time.
    pub fn events(self) -> impl Iterator<Item = Result<LedgerEvent>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(MonetizerError::from))
    }
}
