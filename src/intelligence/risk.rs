use crate::models::{PatientRecord, RiskLevel};

/// Hemoglobin below this (g/dL) is classified High.
pub const ANEMIA_THRESHOLD_G_DL: f64 = 11.0;

/// Gestational age below this (weeks) is classified PretermRisk.
pub const TERM_WEEKS: u32 = 37;

pub fn is_anemic(record: &PatientRecord) -> bool {
    record
        .hemoglobin()
        .is_some_and(|hb| hb < ANEMIA_THRESHOLD_G_DL)
}

pub fn is_preterm(record: &PatientRecord) -> bool {
    record.gestational_age().is_some_and(|weeks| weeks < TERM_WEEKS)
}

/// First matching rule wins: low hemoglobin, then preterm gestation.
pub fn classify_risk(record: &PatientRecord) -> RiskLevel {
    if is_anemic(record) {
        RiskLevel::High
    } else if is_preterm(record) {
        RiskLevel::PretermRisk
    } else {
        RiskLevel::Low
    }
}
