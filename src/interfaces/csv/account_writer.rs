use crate::domain::account::Account;
use crate::error::Result;
use std::io::Write;

/// Writes the account table as CSV (`id,agreement,number,type,amount`).
pub struct AccountWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> AccountWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    /// Writes every account with its balance normalized, then flushes.
    pub fn write_accounts(&mut self, accounts: impl IntoIterator<Item = Account>) -> Result<()> {
        for mut account in accounts {
            account.amount = account.amount.normalize();
            self.writer.serialize(account)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
