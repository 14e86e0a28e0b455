use std::io::Write;

use serde::Serialize;

use super::table::Table;
use super::ExportError;

/// Write a table as UTF-8 CSV with a header row.
pub fn write_csv<W: Write>(table: &Table, out: W) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(&table.columns)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write any serializable outcome as pretty JSON followed by a newline.
pub fn write_json<W: Write, T: Serialize>(value: &T, mut out: W) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(&mut out, value)?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}
