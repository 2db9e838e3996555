use crate::error::{BankError, Result};
use crate::interfaces::batch::Operation;
use std::io::Read;

/// Reads batch operations from a CSV source.
///
/// This reader wraps `csv::Reader` and provides an iterator over `Result<Operation>`.
/// It handles whitespace trimming and flexible record lengths automatically.
pub struct OperationReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> OperationReader<R> {
    /// Creates a new `OperationReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes operations.
    pub fn operations(self) -> impl Iterator<Item = Result<Operation>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(BankError::from))
    }
}
