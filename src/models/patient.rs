use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical field names recognized by the risk classifier.
pub const AGE: &str = "Age";
pub const GESTATIONAL_AGE: &str = "Gestational Age";
pub const HEMOGLOBIN: &str = "Hemoglobin";
pub const BLOOD_PRESSURE: &str = "Blood Pressure";
pub const MEDICATIONS: &str = "Medications";

pub const CANONICAL_FIELDS: [&str; 5] = [AGE, GESTATIONAL_AGE, HEMOGLOBIN, BLOOD_PRESSURE, MEDICATIONS];

/// A single extracted value.
///
/// Free-text extraction produces typed values; structured documents carry
/// `Text` verbatim and are coerced only when the classifier reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(u32),
    Decimal(f64),
    Text(String),
}

impl FieldValue {
    /// Numeric view of the value. Text is read as a whole, then by its first token.
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            Self::Integer(v) => f64::from(*v),
            Self::Decimal(v) => *v,
            Self::Text(s) => parse_leading_number(s)?,
        };
        value.is_finite().then_some(value)
    }

    /// Whole-number view, used for ages and weeks.
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Self::Integer(v) => Some(*v),
            Self::Decimal(v) => whole_number(*v),
            Self::Text(s) => {
                let trimmed = s.trim();
                trimmed
                    .parse::<u32>()
                    .ok()
                    .or_else(|| trimmed.split_whitespace().next()?.parse::<u32>().ok())
                    .or_else(|| whole_number(parse_leading_number(trimmed)?))
            }
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{v}"),
            Self::Decimal(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

fn parse_leading_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    trimmed
        .parse::<f64>()
        .ok()
        .or_else(|| trimmed.split_whitespace().next()?.parse::<f64>().ok())
}

fn whole_number(v: f64) -> Option<u32> {
    if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v <= f64::from(u32::MAX) {
        Some(v as u32)
    } else {
        None
    }
}

/// One named field. `value: None` is an explicit absence: the source
/// mentioned the field but no usable value could be read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub value: Option<FieldValue>,
}

/// Fields extracted for one patient, in the order they were first seen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    /// Section label from the source ("Patient 2", "Entry 3"). Not a field.
    pub label: Option<String>,
    fields: Vec<Field>,
}

impl PatientRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            fields: Vec::new(),
        }
    }

    /// Set a field, replacing any earlier value under the same name in place.
    pub fn set(&mut self, name: impl Into<String>, value: Option<FieldValue>) {
        let name = name.into();
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(existing) => existing.value = value,
            None => self.fields.push(Field { name, value }),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .and_then(|f| f.value.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[cfg(test)]
    pub fn age(&self) -> Option<u32> {
        self.get(AGE)?.as_u32()
    }

    pub fn gestational_age(&self) -> Option<u32> {
        self.get(GESTATIONAL_AGE)?.as_u32()
    }

    pub fn hemoglobin(&self) -> Option<f64> {
        self.get(HEMOGLOBIN)?.as_f64()
    }
}

/// Returns the canonical name a key resembles when it differs only by case,
/// spacing or underscores, e.g. `"gestational age"` or `"GestationalAge"`.
/// Exact canonical keys return `None`.
pub fn canonical_lookalike(key: &str) -> Option<&'static str> {
    if CANONICAL_FIELDS.contains(&key) {
        return None;
    }
    let squash = |s: &str| -> String {
        s.chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect()
    };
    let wanted = squash(key);
    CANONICAL_FIELDS.into_iter().find(|c| squash(c) == wanted)
}
