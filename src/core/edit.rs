//! Working copy of one day's returns while the user corrects values.

use crate::core::config::EditValidation;
use crate::core::error::FundsError;
use crate::core::fund::{DayReturns, ReturnEntry};

/// A value as typed by the user.
#[derive(Debug, Clone, PartialEq)]
pub enum EditValue {
    Number(f64),
    /// The service sent no value and the user did not type one.
    Empty,
    /// Input that does not start with a finite number, kept verbatim.
    Invalid(String),
}

/// Length of the longest decimal number at the start of `s`:
/// `[+-]digits[.digits][(e|E)[+-]digits]`, with at least one mantissa digit.
fn numeric_prefix_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let int_end = digits_from(end);
    let mut mantissa_digits = int_end - end;
    end = int_end;
    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        mantissa_digits += frac_end - end - 1;
        end = frac_end;
    }
    if mantissa_digits == 0 {
        return 0;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }
    end
}

impl EditValue {
    /// Reads the leading number of the input, ignoring any trailing text,
    /// so "1.5%" is 1.5 and "2,75" is 2.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim_start();
        let len = numeric_prefix_len(trimmed);
        match trimmed[..len].parse::<f64>() {
            Ok(v) if len > 0 && v.is_finite() => EditValue::Number(v),
            _ => EditValue::Invalid(input.to_string()),
        }
    }

    /// Value sent to the service; anything but a number goes out as null.
    pub fn to_wire(&self) -> Option<f64> {
        match self {
            EditValue::Number(v) => Some(*v),
            EditValue::Empty | EditValue::Invalid(_) => None,
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, EditValue::Invalid(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditEntry {
    pub description: String,
    pub value: EditValue,
}

/// Identified by `(fund_code, date)`.
#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    pub fund_code: String,
    pub date: String,
    pub entries: Vec<EditEntry>,
}

impl EditSession {
    pub fn open(day: &DayReturns) -> Self {
        let entries = day
            .returns
            .iter()
            .map(|entry| EditEntry {
                description: entry.description.clone(),
                value: entry.value.map_or(EditValue::Empty, EditValue::Number),
            })
            .collect();
        Self {
            fund_code: day.fund_code.clone(),
            date: day.date.clone(),
            entries,
        }
    }

    /// Replaces the value of every entry whose description matches.
    /// Returns false when no entry matched.
    pub fn set_value(&mut self, description: &str, input: &str) -> bool {
        let value = EditValue::parse(input);
        let mut matched = false;
        for entry in self
            .entries
            .iter_mut()
            .filter(|e| e.description == description)
        {
            entry.value = value.clone();
            matched = true;
        }
        matched
    }

    pub fn invalid_descriptions(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.value.is_invalid())
            .map(|e| e.description.as_str())
            .collect()
    }

    /// Builds the write payload, refusing invalid values under
    /// [`EditValidation::Strict`].
    pub fn payload(&self, validation: EditValidation) -> Result<Vec<ReturnEntry>, FundsError> {
        if validation == EditValidation::Strict {
            let invalid = self.invalid_descriptions();
            if !invalid.is_empty() {
                return Err(FundsError::Validation(format!(
                    "Geçersiz değer: {}",
                    invalid.join(", ")
                )));
            }
        }
        Ok(self
            .entries
            .iter()
            .map(|e| ReturnEntry {
                description: e.description.clone(),
                value: e.value.to_wire(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> DayReturns {
        DayReturns {
            fund_code: "TTE".to_string(),
            long_name: "Teknoloji".to_string(),
            fund_desc: None,
            date: "2024-01-05".to_string(),
            returns: vec![
                ReturnEntry::new("Günlük Getiri", Some(1.5)),
                ReturnEntry::new("Aylık Getiri", None),
            ],
        }
    }

    #[test]
    fn test_open_copies_day() {
        let session = EditSession::open(&day());
        assert_eq!(session.fund_code, "TTE");
        assert_eq!(session.date, "2024-01-05");
        assert_eq!(session.entries[0].value, EditValue::Number(1.5));
        assert_eq!(session.entries[1].value, EditValue::Empty);
    }

    #[test]
    fn test_parse() {
        assert_eq!(EditValue::parse(" 0.25 "), EditValue::Number(0.25));
        assert_eq!(EditValue::parse("-3"), EditValue::Number(-3.0));
        assert_eq!(EditValue::parse("abc"), EditValue::Invalid("abc".to_string()));
        assert_eq!(EditValue::parse(""), EditValue::Invalid(String::new()));
        assert!(EditValue::parse("NaN").is_invalid());
        assert!(EditValue::parse("inf").is_invalid());
        assert!(EditValue::parse("-").is_invalid());
        assert!(EditValue::parse(".").is_invalid());
    }

    #[test]
    fn test_parse_reads_leading_number() {
        assert_eq!(EditValue::parse("1.5%"), EditValue::Number(1.5));
        assert_eq!(EditValue::parse("2,75"), EditValue::Number(2.0));
        assert_eq!(EditValue::parse("12abc"), EditValue::Number(12.0));
        assert_eq!(EditValue::parse("  -0.5 puan"), EditValue::Number(-0.5));
        assert_eq!(EditValue::parse(".5"), EditValue::Number(0.5));
        assert_eq!(EditValue::parse("3."), EditValue::Number(3.0));
        assert_eq!(EditValue::parse("1e2x"), EditValue::Number(100.0));
        assert_eq!(EditValue::parse("4e"), EditValue::Number(4.0));
        assert_eq!(EditValue::parse("1e999"), EditValue::Invalid("1e999".to_string()));
        assert_eq!(EditValue::parse("%1.5"), EditValue::Invalid("%1.5".to_string()));
    }

    #[test]
    fn test_set_value_by_description() {
        let mut session = EditSession::open(&day());
        assert!(session.set_value("Aylık Getiri", "2.75"));
        assert_eq!(session.entries[1].value, EditValue::Number(2.75));
        assert_eq!(session.entries[0].value, EditValue::Number(1.5));

        assert!(!session.set_value("Yıllık Getiri", "1"));
    }

    #[test]
    fn test_permissive_payload_sends_invalid_as_null() {
        let mut session = EditSession::open(&day());
        session.set_value("Günlük Getiri", "x1,5");

        let payload = session.payload(EditValidation::Permissive).unwrap();
        assert_eq!(
            payload,
            vec![
                ReturnEntry::new("Günlük Getiri", None),
                ReturnEntry::new("Aylık Getiri", None),
            ]
        );
        assert_eq!(
            serde_json::to_string(&payload).unwrap(),
            r#"[{"description":"Günlük Getiri","value":null},{"description":"Aylık Getiri","value":null}]"#
        );
    }

    #[test]
    fn test_strict_payload_rejects_invalid() {
        let mut session = EditSession::open(&day());
        session.set_value("Günlük Getiri", "abc");

        let err = session.payload(EditValidation::Strict).unwrap_err();
        assert_eq!(
            err,
            FundsError::Validation("Geçersiz değer: Günlük Getiri".to_string())
        );
        // The typed value is kept for correction
        assert_eq!(
            session.entries[0].value,
            EditValue::Invalid("abc".to_string())
        );
    }
}
