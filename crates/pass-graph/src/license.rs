//! Driver's licence attributes
//!
//! Licences are scanned from the PDF417 barcode on their back. The scanner
//! hands over AAMVA element codes (`DCS`, `DBB`, ...) with raw text values;
//! [`license_attributes`] turns them into typed document attributes.

use crate::error::GraphError;
use crate::graph::Predicate;
use crate::value::{TypedValue, ValueType};
use crate::vocab::schema;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Raw barcode fields keyed by AAMVA element code
pub type LicenseFields = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    Text,
    /// `MMDDYYYY`
    Date,
    /// Leading digits, e.g. `070 IN`
    Height,
}

const FIELD_MAP: &[(&str, &str, FieldKind)] = &[
    ("DCA", schema::ADDITIONAL_TYPE, FieldKind::Text),
    ("DCB", schema::CONDITIONS_OF_ACCESS, FieldKind::Text),
    ("DBA", schema::EXPIRES, FieldKind::Date),
    ("DCS", schema::FAMILY_NAME, FieldKind::Text),
    ("DAC", schema::GIVEN_NAME, FieldKind::Text),
    ("DAD", schema::ALTERNATE_NAME, FieldKind::Text),
    ("DBD", schema::DATE_ISSUED, FieldKind::Date),
    ("DBB", schema::BIRTH_DATE, FieldKind::Date),
    ("DBC", schema::GENDER, FieldKind::Text),
    ("DAY", schema::EYE_COLOR, FieldKind::Text),
    ("DAU", schema::HEIGHT, FieldKind::Height),
    ("DAG", schema::STREET_ADDRESS, FieldKind::Text),
    ("DAI", schema::ADDRESS_LOCALITY, FieldKind::Text),
    ("DAJ", schema::ADDRESS_REGION, FieldKind::Text),
    ("DAK", schema::POSTAL_CODE, FieldKind::Text),
    ("DAQ", schema::IDENTIFIER, FieldKind::Text),
    ("DCF", schema::IDENTIFIER, FieldKind::Text),
    ("DCG", schema::ADDRESS_COUNTRY, FieldKind::Text),
    ("DDE", schema::ADDITIONAL_NAME, FieldKind::Text),
    ("DDF", schema::ADDITIONAL_NAME, FieldKind::Text),
    ("DDG", schema::ADDITIONAL_NAME, FieldKind::Text),
];

/// Map scanned barcode fields to typed attributes
///
/// Codes with no mapping are ignored, as are blank values. Attributes come
/// out in the fixed order of the mapping table, not the input order.
///
/// # Errors
/// [`GraphError::InvalidValue`] when a date or height field does not parse
pub fn license_attributes(fields: &LicenseFields) -> Result<Vec<(Predicate, TypedValue)>, GraphError> {
    let mut out = Vec::new();
    for &(code, predicate, kind) in FIELD_MAP {
        let Some(raw) = fields.get(code).map(|v| v.trim()) else {
            continue;
        };
        if raw.is_empty() {
            continue;
        }
        let value = match kind {
            FieldKind::Text => TypedValue::string(raw),
            FieldKind::Date => NaiveDate::parse_from_str(raw, "%m%d%Y")
                .map(TypedValue::Date)
                .map_err(|_| GraphError::InvalidValue {
                    expected: ValueType::Date,
                    raw: raw.to_string(),
                })?,
            FieldKind::Height => parse_height(raw)?,
        };
        out.push((Predicate::from_static(predicate), value));
    }
    Ok(out)
}

fn parse_height(raw: &str) -> Result<TypedValue, GraphError> {
    let digits: String = raw.chars().take_while(char::is_ascii_digit).collect();
    digits
        .parse::<i64>()
        .map(TypedValue::Integer)
        .map_err(|_| GraphError::InvalidValue {
            expected: ValueType::Integer,
            raw: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fields(pairs: &[(&str, &str)]) -> LicenseFields {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn maps_names_dates_and_height() {
        let attrs = license_attributes(&fields(&[
            ("DAC", "JANE"),
            ("DCS", "DOE"),
            ("DBB", "07041990"),
            ("DAU", "066 IN"),
            ("ZZZ", "ignored"),
        ]))
        .unwrap();

        assert_eq!(
            attrs,
            vec![
                (Predicate::from_static(schema::FAMILY_NAME), TypedValue::string("DOE")),
                (Predicate::from_static(schema::GIVEN_NAME), TypedValue::string("JANE")),
                (
                    Predicate::from_static(schema::BIRTH_DATE),
                    TypedValue::Date(NaiveDate::from_ymd_opt(1990, 7, 4).unwrap())
                ),
                (Predicate::from_static(schema::HEIGHT), TypedValue::Integer(66)),
            ]
        );
    }

    #[test]
    fn both_identifiers_are_kept() {
        let attrs = license_attributes(&fields(&[("DAQ", "D123"), ("DCF", "DOC9")])).unwrap();
        assert_eq!(attrs.len(), 2);
        assert!(attrs.iter().all(|(p, _)| p.as_str() == schema::IDENTIFIER));
    }

    #[test]
    fn bad_date_is_rejected() {
        let err = license_attributes(&fields(&[("DBA", "2030-01-01")])).unwrap_err();
        assert!(matches!(err, GraphError::InvalidValue { expected: ValueType::Date, .. }));
    }

    #[test]
    fn height_without_digits_is_rejected() {
        assert!(license_attributes(&fields(&[("DAU", "tall")])).is_err());
    }

    #[test]
    fn blank_values_are_skipped() {
        assert!(license_attributes(&fields(&[("DAG", "  ")])).unwrap().is_empty());
    }
}
