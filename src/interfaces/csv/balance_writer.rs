use crate::domain::balance::Balance;
use crate::domain::payer::PayerId;
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct BalanceRow<'a> {
    payer: &'a PayerId,
    balance: Balance,
}

/// Writes `payer,balance` rows.
pub struct BalanceWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> BalanceWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_balances<'a>(
        &mut self,
        balances: impl IntoIterator<Item = &'a (PayerId, Balance)>,
    ) -> Result<()> {
        for (payer, balance) in balances {
            self.writer.serialize(BalanceRow {
                payer,
                balance: *balance,
            })?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
