use serde::Serialize;

use crate::models::ClassifiedRecord;

pub const RISK_LEVEL_COLUMN: &str = "RiskLevel";
pub const RECOMMENDATIONS_COLUMN: &str = "Recommendations";

/// Rows of rendered cells under a header.
///
/// Field columns are the union of field names across the batch, in the order
/// they were first seen, followed by the risk level and recommendations.
/// Missing or explicitly absent values render as empty cells.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn from_classified(records: &[ClassifiedRecord]) -> Self {
        let mut field_columns: Vec<&str> = Vec::new();
        for classified in records {
            for field in classified.record.fields() {
                let name = field.name.as_str();
                if name == RISK_LEVEL_COLUMN || name == RECOMMENDATIONS_COLUMN {
                    tracing::warn!(field = name, "Field shadows a computed column, not exported");
                    continue;
                }
                if !field_columns.contains(&name) {
                    field_columns.push(name);
                }
            }
        }

        let rows = records
            .iter()
            .map(|classified| {
                let mut row: Vec<String> = field_columns
                    .iter()
                    .map(|name| {
                        classified
                            .record
                            .get(name)
                            .map(|v| v.to_string())
                            .unwrap_or_default()
                    })
                    .collect();
                row.push(classified.risk_level.as_str().to_string());
                row.push(classified.recommendations_text());
                row
            })
            .collect();

        let mut columns: Vec<String> = field_columns.into_iter().map(str::to_string).collect();
        columns.push(RISK_LEVEL_COLUMN.to_string());
        columns.push(RECOMMENDATIONS_COLUMN.to_string());

        Self { columns, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
