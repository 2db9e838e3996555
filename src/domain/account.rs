use super::agreement::AgreementId;
use crate::error::{BankError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::ops::{AddAssign, SubAssign};

pub type AccountId = u64;

/// Discriminator telling the accounts of one agreement apart.
pub type AccountType = i32;

pub const PRIMARY_ACCOUNT_TYPE: AccountType = 0;

/// Represents a monetary value held by an account.
///
/// This is a wrapper around `rust_decimal::Decimal` so balances cannot be
/// mixed up with operation amounts.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Balance(pub Decimal);

/// Represents a strictly positive monetary amount moved by an operation.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(BankError::ValidationError(
                "Amount must be positive".to_string(),
            ))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl From<Amount> for Balance {
    fn from(amount: Amount) -> Self {
        Self(amount.0)
    }
}

impl Balance {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Same value with trailing zeros of the scale dropped (`90.00` -> `90`).
    pub fn normalize(self) -> Self {
        Self(self.0.normalize())
    }
}

impl AddAssign for Balance {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Balance {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

/// A balance-holding account owned by one agreement.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Account {
    /// Assigned by the store on first save.
    pub id: Option<AccountId>,
    /// The agreement owning this account.
    #[serde(rename = "agreement")]
    pub agreement_id: AgreementId,
    /// External account number.
    pub number: String,
    #[serde(rename = "type")]
    pub r#type: AccountType,
    /// Current balance. Never negative once an operation has committed.
    pub amount: Balance,
}

impl Account {
    pub fn new(
        agreement_id: AgreementId,
        number: impl Into<String>,
        r#type: AccountType,
        amount: Balance,
    ) -> Self {
        Self {
            id: None,
            agreement_id,
            number: number.into(),
            r#type,
            amount,
        }
    }

    pub fn with_id(mut self, id: AccountId) -> Self {
        self.id = Some(id);
        self
    }

    /// Adds funds to the balance
    pub fn credit(&mut self, amount: Amount) {
        self.amount += amount.into();
    }

    /// Removes funds from the balance if sufficient
    pub fn debit(&mut self, amount: Amount) -> Result<()> {
        let amount = Balance::from(amount);
        if self.amount >= amount {
            self.amount -= amount;
            Ok(())
        } else {
            Err(BankError::InsufficientFunds)
        }
    }
}
