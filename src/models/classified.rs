use serde::{Deserialize, Serialize};

use super::enums::RiskLevel;
use super::patient::PatientRecord;

/// Separator used when recommendations are rendered as one cell.
pub const RECOMMENDATION_SEPARATOR: &str = " ";

/// Narrative advice attached to a classified record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    MonitorFetalHealth,
    ScheduleRegularVisits,
    StandardPrenatalCare,
    IronSupplementation,
    HydrationAndRest,
}

impl Recommendation {
    pub fn text(self) -> &'static str {
        match self {
            Self::MonitorFetalHealth => "Monitor fetal health closely and consult a specialist.",
            Self::ScheduleRegularVisits => "Schedule regular prenatal visits to monitor progression.",
            Self::StandardPrenatalCare => "Maintain a healthy diet and follow standard prenatal care.",
            Self::IronSupplementation => "Consider iron supplements or iron-rich foods.",
            Self::HydrationAndRest => "Ensure adequate hydration and rest.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedRecord {
    pub record: PatientRecord,
    pub risk_level: RiskLevel,
    pub recommendations: Vec<Recommendation>,
}

impl ClassifiedRecord {
    /// Recommendations joined for display in a single column.
    pub fn recommendations_text(&self) -> String {
        self.recommendations
            .iter()
            .map(|r| r.text())
            .collect::<Vec<_>>()
            .join(RECOMMENDATION_SEPARATOR)
    }
}
