//! Trigger-phrase scanners for free-text fragments.
//!
//! Triggers are matched ASCII case-insensitively against a lowered copy of the
//! fragment. `to_ascii_lowercase` keeps byte offsets identical, so positions
//! found in the lowered copy slice the fragment itself.

use crate::models::{
    FieldValue, PatientRecord, AGE, BLOOD_PRESSURE, GESTATIONAL_AGE, HEMOGLOBIN, MEDICATIONS,
};

const AGE_TRIGGER: &str = "year-old";
const GESTATION_TRIGGER: &str = "weeks gestation";
const HEMOGLOBIN_TRIGGER: &str = "hemoglobin";
const HEMOGLOBIN_OPEN: &str = "hemoglobin at ";
const HEMOGLOBIN_CLOSE: &str = " g/dl";
const BLOOD_PRESSURE_TRIGGER: &str = "blood pressure";
const BLOOD_PRESSURE_OPEN: &str = "blood pressure (";
const MEDICATIONS_TRIGGER: &str = "medications include";

/// Scan one fragment for every trigger and write what it finds into `record`.
///
/// Returns the number of fields touched. A Hemoglobin mention whose value
/// cannot be read is stored as an explicit absence, replacing any value an
/// earlier fragment supplied.
pub fn scan_fragment(fragment: &str, record: &mut PatientRecord) -> usize {
    let lowered = fragment.to_ascii_lowercase();
    let mut touched = 0;

    if let Some(age) = extract_age(fragment, &lowered) {
        record.set(AGE, Some(FieldValue::Integer(age)));
        touched += 1;
    }

    if let Some(weeks) = extract_gestational_age(fragment, &lowered) {
        record.set(GESTATIONAL_AGE, Some(FieldValue::Integer(weeks)));
        touched += 1;
    }

    if lowered.contains(HEMOGLOBIN_TRIGGER) {
        let value = extract_hemoglobin(fragment, &lowered).map(FieldValue::Decimal);
        record.set(HEMOGLOBIN, value);
        touched += 1;
    }

    if let Some(reading) = extract_blood_pressure(fragment, &lowered) {
        record.set(BLOOD_PRESSURE, Some(FieldValue::Text(reading.to_string())));
        touched += 1;
    }

    if let Some(medications) = extract_medications(fragment, &lowered) {
        record.set(MEDICATIONS, Some(FieldValue::Text(medications.to_string())));
        touched += 1;
    }

    touched
}

/// `"a 32-year-old"` -> 32. The last token before the trigger, with trailing
/// hyphens removed, must be all digits.
fn extract_age(fragment: &str, lowered: &str) -> Option<u32> {
    let pos = lowered.find(AGE_TRIGGER)?;
    let token = fragment[..pos].split_whitespace().last()?;
    parse_digits(token.trim_end_matches('-'))
}

/// `"at 30 weeks gestation"` -> 30.
fn extract_gestational_age(fragment: &str, lowered: &str) -> Option<u32> {
    let pos = lowered.find(GESTATION_TRIGGER)?;
    let token = fragment[..pos].split_whitespace().last()?;
    parse_digits(token)
}

/// `"hemoglobin at 10.2 g/dL"` -> 10.2.
fn extract_hemoglobin(fragment: &str, lowered: &str) -> Option<f64> {
    let raw = between(fragment, lowered, HEMOGLOBIN_OPEN, HEMOGLOBIN_CLOSE)?;
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// `"blood pressure (120/80)"` -> `"120/80"`, verbatim.
fn extract_blood_pressure<'a>(fragment: &'a str, lowered: &str) -> Option<&'a str> {
    if !lowered.contains(BLOOD_PRESSURE_TRIGGER) {
        return None;
    }
    let reading = between(fragment, lowered, BLOOD_PRESSURE_OPEN, ")")?.trim();
    (!reading.is_empty()).then_some(reading)
}

/// `"medications include prenatal vitamins."` -> `"prenatal vitamins"`.
fn extract_medications<'a>(fragment: &'a str, lowered: &str) -> Option<&'a str> {
    let pos = lowered.find(MEDICATIONS_TRIGGER)?;
    let rest = &fragment[pos + MEDICATIONS_TRIGGER.len()..];
    let list = rest.split('.').next()?;
    let list = list.trim().trim_start_matches(':').trim();
    (!list.is_empty()).then_some(list)
}

/// Text between the first `open` and the next `close` after it.
fn between<'a>(fragment: &'a str, lowered: &str, open: &str, close: &str) -> Option<&'a str> {
    let start = lowered.find(open)? + open.len();
    let len = lowered[start..].find(close)?;
    Some(&fragment[start..start + len])
}

/// Digit-only check; "thirty" or "3O" leave the field unset.
fn parse_digits(token: &str) -> Option<u32> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(fragment: &str) -> PatientRecord {
        let mut record = PatientRecord::new();
        scan_fragment(fragment, &mut record);
        record
    }

    #[test]
    fn full_sentence_yields_all_fields() {
        let record = scan(
            "She is a 32-year-old patient at 30 weeks gestation with hemoglobin at 10.2 g/dL, \
             blood pressure (120/80), medications include prenatal vitamins.",
        );
        assert_eq!(record.get(AGE), Some(&FieldValue::Integer(32)));
        assert_eq!(record.get(GESTATIONAL_AGE), Some(&FieldValue::Integer(30)));
        assert_eq!(record.get(HEMOGLOBIN), Some(&FieldValue::Decimal(10.2)));
        assert_eq!(record.get(BLOOD_PRESSURE), Some(&FieldValue::Text("120/80".into())));
        assert_eq!(
            record.get(MEDICATIONS),
            Some(&FieldValue::Text("prenatal vitamins".into()))
        );
    }

    #[test]
    fn spaced_age_phrase() {
        let record = scan("Patient is 41 year-old");
        assert_eq!(record.age(), Some(41));
    }

    #[test]
    fn spelled_out_age_is_ignored() {
        let record = scan("A thirty-year-old woman");
        assert!(record.is_empty());
    }

    #[test]
    fn age_trigger_at_start_is_ignored() {
        assert!(scan("year-old records were reviewed").is_empty());
    }

    #[test]
    fn gestation_needs_numeric_token() {
        assert_eq!(scan("at 34 weeks gestation").gestational_age(), Some(34));
        assert!(scan("at several weeks gestation").is_empty());
        assert!(scan("weeks gestation unknown").is_empty());
    }

    #[test]
    fn triggers_are_case_insensitive() {
        let record = scan("Hemoglobin at 12.1 G/DL and Blood Pressure (110/70)");
        assert_eq!(record.hemoglobin(), Some(12.1));
        assert_eq!(record.get(BLOOD_PRESSURE), Some(&FieldValue::Text("110/70".into())));
    }

    #[test]
    fn unparseable_hemoglobin_is_explicitly_absent() {
        let record = scan("hemoglobin at low levels g/dL");
        assert!(record.contains(HEMOGLOBIN));
        assert_eq!(record.get(HEMOGLOBIN), None);
    }

    #[test]
    fn hemoglobin_without_markers_is_explicitly_absent() {
        let record = scan("hemoglobin was not measured");
        assert!(record.contains(HEMOGLOBIN));
        assert_eq!(record.hemoglobin(), None);
    }

    #[test]
    fn later_unreadable_hemoglobin_clears_earlier_value() {
        let mut record = PatientRecord::new();
        scan_fragment("hemoglobin at 9.8 g/dL", &mut record);
        scan_fragment("Repeat hemoglobin pending", &mut record);
        assert!(record.contains(HEMOGLOBIN));
        assert_eq!(record.get(HEMOGLOBIN), None);
        assert_eq!(record.len(), 1);
    }

    #[test]
    fn later_hemoglobin_value_overwrites() {
        let mut record = PatientRecord::new();
        scan_fragment("hemoglobin at 9.8 g/dL", &mut record);
        scan_fragment("repeat hemoglobin at 11.4 g/dL", &mut record);
        assert_eq!(record.hemoglobin(), Some(11.4));
    }

    #[test]
    fn blood_pressure_without_parentheses_is_unset() {
        assert!(scan("blood pressure normal").is_empty());
        assert!(scan("blood pressure (120/80").is_empty());
        assert!(scan("blood pressure ()").is_empty());
    }

    #[test]
    fn medications_stop_at_period() {
        let record = scan("medications include iron, folic acid. Follow up soon");
        assert_eq!(
            record.get(MEDICATIONS),
            Some(&FieldValue::Text("iron, folic acid".into()))
        );
    }

    #[test]
    fn medications_tolerate_colon() {
        let record = scan("Medications include: labetalol");
        assert_eq!(record.get(MEDICATIONS), Some(&FieldValue::Text("labetalol".into())));
    }

    #[test]
    fn empty_medication_list_is_unset() {
        assert!(scan("medications include.").is_empty());
    }

    #[test]
    fn unrelated_text_touches_nothing() {
        let mut record = PatientRecord::new();
        assert_eq!(scan_fragment("Routine visit, no complaints", &mut record), 0);
        assert!(record.is_empty());
    }

    #[test]
    fn non_ascii_text_keeps_offsets_aligned() {
        let record = scan("Mère de 28-year-old, à 33 weeks gestation");
        assert_eq!(record.age(), Some(28));
        assert_eq!(record.gestational_age(), Some(33));
    }

    #[test]
    fn digit_overflow_is_ignored() {
        assert!(scan("a 99999999999-year-old").is_empty());
    }
}
