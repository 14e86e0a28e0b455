//! Rule-based risk classification and recommendations.
//!
//! Pure functions over a PatientRecord: no state, no I/O, no failure mode.
//! Missing fields never fail a threshold.

pub mod recommendations;
pub mod risk;

pub use recommendations::*;
pub use risk::*;

use crate::models::{ClassifiedRecord, PatientRecord};

/// Classify one record and attach its recommendations.
pub fn classify_record(record: PatientRecord) -> ClassifiedRecord {
    let risk_level = classify_risk(&record);
    let recommendations = recommend(risk_level, &record);
    ClassifiedRecord {
        record,
        risk_level,
        recommendations,
    }
}

/// Classify a batch, preserving order.
pub fn classify_all(records: Vec<PatientRecord>) -> Vec<ClassifiedRecord> {
    records.into_iter().map(classify_record).collect()
}
