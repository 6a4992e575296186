//! Application layer: the balance ledger, the registry of pending balance
//! waits, and the `Monetizer` facade tying them to a payment transport.
//!
//! Ledger state lives in sharded concurrent maps; completion of a wait is
//! signalled over a `tokio` oneshot channel.

pub mod identity;
pub mod ledger;
pub mod monetizer;
pub mod wait_registry;
