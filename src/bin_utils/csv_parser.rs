use std::io::Read;

use crate::account::AccountId;
use csv::{DeserializeRecordsIntoIter, Trim};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct TransactionRow {
    pub client: AccountId,
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: i64,
    pub description: String,
}

/// Parses a transaction list in CSV format, yielding each row together with
/// the line it started on.
pub struct CsvTransactionParser<R> {
    iter: DeserializeRecordsIntoIter<R, TransactionRow>,
}

impl<R> CsvTransactionParser<R>
where
    R: Read,
{
    pub fn new(source: R) -> Result<Self, csv::Error> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(Trim::All)
            .from_reader(source);
        // read the header up front so positions point at data rows
        reader.headers()?;

        Ok(Self {
            iter: reader.into_deserialize(),
        })
    }
}

impl<R> Iterator for CsvTransactionParser<R>
where
    R: Read,
{
    type Item = (u64, Result<TransactionRow, csv::Error>);

    fn next(&mut self) -> Option<Self::Item> {
        let curr_line = self.iter.reader().position().line();
        self.iter.next().map(|row| (curr_line, row))
    }
}
