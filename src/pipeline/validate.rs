// Schema validator: turn sanitized text into KeywordMetric records.
//
// Parsing and the top-level shape are hard requirements. Individual entries
// are only ever accepted or dropped as a whole; a bad entry never fails the
// list on its own, and nothing is clamped or defaulted. Drop reasons go to
// the debug log and nowhere else.

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::ValidationFailure;
use crate::models::{DropReason, KeywordMetric};

/// Parse `candidate` and keep the entries that satisfy the KeywordMetric
/// contract. Fails if the text is not JSON, not a list, or nothing survives.
pub fn validate(candidate: &str) -> Result<Vec<KeywordMetric>, ValidationFailure> {
    let value: Value = serde_json::from_str(candidate)
        .map_err(|e| ValidationFailure::Malformed(e.to_string()))?;

    let Value::Array(entries) = value else {
        return Err(ValidationFailure::NotAList);
    };

    let total = entries.len();
    let mut accepted = Vec::with_capacity(total);
    for (index, entry) in entries.iter().enumerate() {
        match check_entry(entry) {
            Ok(metric) => accepted.push(metric),
            Err(reason) => debug!(index, reason = %reason, "Dropped keyword entry"),
        }
    }

    debug!(total, accepted = accepted.len(), "Validated keyword list");

    if accepted.is_empty() {
        return Err(ValidationFailure::Empty);
    }
    Ok(accepted)
}

/// Accept or reject one candidate entry.
pub fn check_entry(entry: &Value) -> Result<KeywordMetric, DropReason> {
    let fields = entry.as_object().ok_or(DropReason::NotAnObject)?;

    let keyword = fields
        .get("keyword")
        .and_then(Value::as_str)
        .ok_or(DropReason::MissingKeyword)?;

    let search_volume = integer_field(
        fields,
        "searchVolume",
        DropReason::MissingSearchVolume,
        DropReason::SearchVolumeNotInteger,
    )?;
    let difficulty = integer_field(
        fields,
        "difficulty",
        DropReason::MissingDifficulty,
        DropReason::DifficultyNotInteger,
    )?;

    KeywordMetric::new(keyword, search_volume, difficulty)
}

/// Read a whole-number field. `1200.0` counts as 1200; `12.5` and `"12"` do not.
fn integer_field(
    fields: &Map<String, Value>,
    name: &str,
    missing: DropReason,
    not_integer: DropReason,
) -> Result<i64, DropReason> {
    let number = match fields.get(name) {
        None | Some(Value::Null) => return Err(missing),
        Some(Value::Number(n)) => n,
        Some(_) => return Err(not_integer),
    };

    if let Some(i) = number.as_i64() {
        return Ok(i);
    }
    // Integral floats and u64 values beyond i64 land here; the cast saturates
    // and the range check in KeywordMetric::new rejects anything too large.
    match number.as_f64() {
        Some(f) if f.fract() == 0.0 => Ok(f as i64),
        _ => Err(not_integer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_well_formed_list() {
        let out = validate(
            r#"[{"keyword":"best running shoes for beginners","searchVolume":1200,"difficulty":45}]"#,
        )
        .unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].keyword(), "best running shoes for beginners");
        assert_eq!(out[0].search_volume(), 1200);
        assert_eq!(out[0].difficulty(), 45);
    }

    #[test]
    fn malformed_json_fails() {
        assert!(matches!(
            validate("[{\"keyword\":"),
            Err(ValidationFailure::Malformed(_))
        ));
    }

    #[test]
    fn non_list_fails() {
        assert_eq!(
            validate(r#"{"keyword":"a","searchVolume":1,"difficulty":1}"#),
            Err(ValidationFailure::NotAList)
        );
    }

    #[test]
    fn list_with_no_valid_entries_fails() {
        assert_eq!(validate("[]"), Err(ValidationFailure::Empty));
        assert_eq!(
            validate(r#"[{"keyword":"a","searchVolume":-5,"difficulty":1}]"#),
            Err(ValidationFailure::Empty)
        );
    }

    #[test]
    fn check_entry_reasons() {
        assert_eq!(check_entry(&json!("a")), Err(DropReason::NotAnObject));
        assert_eq!(
            check_entry(&json!({"searchVolume": 1, "difficulty": 1})),
            Err(DropReason::MissingKeyword)
        );
        assert_eq!(
            check_entry(&json!({"keyword": 7, "searchVolume": 1, "difficulty": 1})),
            Err(DropReason::MissingKeyword)
        );
        assert_eq!(
            check_entry(&json!({"keyword": "", "searchVolume": 1, "difficulty": 1})),
            Err(DropReason::EmptyKeyword)
        );
        assert_eq!(
            check_entry(&json!({"keyword": "a", "difficulty": 1})),
            Err(DropReason::MissingSearchVolume)
        );
        assert_eq!(
            check_entry(&json!({"keyword": "a", "searchVolume": "100", "difficulty": 1})),
            Err(DropReason::SearchVolumeNotInteger)
        );
        assert_eq!(
            check_entry(&json!({"keyword": "a", "searchVolume": 10.5, "difficulty": 1})),
            Err(DropReason::SearchVolumeNotInteger)
        );
        assert_eq!(
            check_entry(&json!({"keyword": "a", "searchVolume": 10, "difficulty": null})),
            Err(DropReason::MissingDifficulty)
        );
        assert_eq!(
            check_entry(&json!({"keyword": "a", "searchVolume": 10, "difficulty": 101})),
            Err(DropReason::DifficultyOutOfRange)
        );
    }

    #[test]
    fn integral_floats_are_accepted() {
        let m = check_entry(&json!({"keyword": "a", "searchVolume": 1200.0, "difficulty": 45.0}))
            .unwrap();
        assert_eq!(m.search_volume(), 1200);
        assert_eq!(m.difficulty(), 45);
    }

    #[test]
    fn huge_numbers_are_out_of_range_not_wrapped() {
        assert_eq!(
            check_entry(&json!({"keyword": "a", "searchVolume": u64::MAX, "difficulty": 1})),
            Err(DropReason::SearchVolumeOutOfRange)
        );
        assert_eq!(
            check_entry(&json!({"keyword": "a", "searchVolume": 1e300, "difficulty": 1})),
            Err(DropReason::SearchVolumeOutOfRange)
        );
    }
}
