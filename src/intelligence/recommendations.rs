use super::risk::{is_anemic, is_preterm};
use crate::models::{PatientRecord, Recommendation, RiskLevel};

/// Recommendations for a classified record, in fixed order: the risk-level
/// advice first, then iron and hydration advice when their findings apply.
pub fn recommend(risk_level: RiskLevel, record: &PatientRecord) -> Vec<Recommendation> {
    let mut out = vec![match risk_level {
        RiskLevel::High => Recommendation::MonitorFetalHealth,
        RiskLevel::PretermRisk => Recommendation::ScheduleRegularVisits,
        RiskLevel::Low => Recommendation::StandardPrenatalCare,
    }];

    if is_anemic(record) {
        out.push(Recommendation::IronSupplementation);
    }
    if is_preterm(record) {
        out.push(Recommendation::HydrationAndRest);
    }

    out
}
