use std::io::Write;

use crate::account::AccountId;
use csv::Writer;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct StatementRow {
    pub client: AccountId,
    pub balance: i64,
    pub limit: i64,
    pub recent: usize,
}

pub fn print_statements<W>(
    output: &mut W,
    statements: impl Iterator<Item = StatementRow>,
) -> anyhow::Result<()>
where
    W: Write,
{
    let mut writer = Writer::from_writer(output);
    for row in statements {
        if let Err(err) = writer.serialize(row) {
            anyhow::bail!("Failed to write to CSV: {err}")
        }
    }
    if let Err(err) = writer.flush() {
        anyhow::bail!("Failed to flush CSV writer: {err}")
    }
    Ok(())
}
