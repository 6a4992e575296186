use crate::domain::payer::PayerId;
use crate::error::{MonetizerError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A payer's accumulated funds, in the smallest unit of the receiving asset.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Balance(pub u64);

/// A non-negative amount carried by a payment or charged for a resource.
///
/// Construction from untrusted input goes through [`FromStr`] or
/// `TryFrom<i64>`, which reject negative and non-numeric values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(u64);

impl Amount {
    pub const ZERO: Self = Self(0);

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl FromStr for Amount {
    type Err = MonetizerError;

    fn from_str(raw: &str) -> Result<Self> {
        raw.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|_| MonetizerError::InvalidAmount(raw.to_string()))
    }
}

impl TryFrom<i64> for Amount {
    type Error = MonetizerError;

    fn try_from(value: i64) -> Result<Self> {
        u64::try_from(value)
            .map(Self)
            .map_err(|_| MonetizerError::InvalidAmount(value.to_string()))
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<Amount> for Balance {
    fn from(amount: Amount) -> Self {
        Self(amount.0)
    }
}

impl Balance {
    pub const ZERO: Self = Self(0);

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn covers(&self, price: Amount) -> bool {
        self.0 >= price.0
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ceiling applied to every credit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BalanceCap {
    #[default]
    Unbounded,
    Capped(Balance),
}

impl BalanceCap {
    pub fn limit(&self) -> Option<Balance> {
        match self {
            BalanceCap::Unbounded => None,
            BalanceCap::Capped(max) => Some(*max),
        }
    }

    fn clamp(&self, balance: Balance) -> Balance {
        match self {
            BalanceCap::Unbounded => balance,
            BalanceCap::Capped(max) => balance.min(*max),
        }
    }
}

impl From<Option<u64>> for BalanceCap {
    fn from(max: Option<u64>) -> Self {
        max.map_or(BalanceCap::Unbounded, |m| BalanceCap::Capped(Balance(m)))
    }
}

/// One payer's slot in the ledger.
///
/// Invariant: `0 <= balance <= cap` after every operation.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEntry {
    pub payer_id: PayerId,
    pub balance: Balance,
    pub cap: BalanceCap,
}

impl LedgerEntry {
    pub fn new(payer_id: PayerId, cap: BalanceCap) -> Self {
        Self {
            payer_id,
            balance: Balance::ZERO,
            cap,
        }
    }

    /// Adds funds, saturating at the cap. Returns the new balance.
    pub fn credit(&mut self, amount: Amount) -> Balance {
        let raised = Balance(self.balance.0.saturating_add(amount.0));
        self.balance = self.cap.clamp(raised);
        self.balance
    }

    /// Removes `price` if the balance covers it. Returns the remaining balance.
    pub fn debit(&mut self, price: Amount) -> Result<Balance> {
        if !self.balance.covers(price) {
            return Err(MonetizerError::InsufficientBalance {
                payer_id: self.payer_id.clone(),
                price: price.into(),
                balance: self.balance,
            });
        }
        self.balance = Balance(self.balance.0 - price.0);
        Ok(self.balance)
    }
}
