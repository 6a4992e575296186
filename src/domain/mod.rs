//! Domain types: payer identity, balances, payment notifications and the
//! ports through which the ledger talks to the payment network.

pub mod balance;
pub mod notification;
pub mod payer;
pub mod ports;
pub mod receiver;
