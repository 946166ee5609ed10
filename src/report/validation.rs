use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use super::record::{RawVisitForm, VisitRecord};

// Field labels exactly as the form shows them; they double as the violation
// messages, so the user can match errors back to inputs.
const LABEL_VISIT_DATE: &str = "Data da visita";
const LABEL_START_TIME: &str = "Hora de início";
const LABEL_END_TIME: &str = "Hora de término";
const LABEL_PROPERTY_NAME: &str = "Nome da propriedade";
const LABEL_ADDRESS: &str = "Endereço completo";
const LABEL_MUNICIPALITY: &str = "Município";
const LABEL_GATE_COORDINATES: &str = "Coordenadas da porteira";
const LABEL_HOMESTEAD_COORDINATES: &str = "Coordenadas da sede";
const LABEL_AREA: &str = "Área da propriedade (deve ser > 0)";
const LABEL_OWNER_NAME: &str = "Nome do proprietário";
const LABEL_TAX_ID: &str = "CPF/CNPJ";
const LABEL_PHONE: &str = "Telefone";
const LABEL_MAIN_ACTIVITY: &str = "Atividade principal";
const LABEL_PLATE_NUMBER: &str = "Número da placa";

static TIME_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{1,2}:\d{2}$").expect("time pattern is valid"));

/// Validation failures for one submission cycle.
///
/// The two variants are mutually exclusive: whenever any required field is
/// missing, only [`ValidationError::MissingRequiredFields`] is reported, and
/// malformed times are re-checked on the next submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Por favor, preencha todos os campos obrigatórios: {}", .0.join(", "))]
    MissingRequiredFields(Vec<String>),
    #[error("Horário inválido, use o formato HH:MM (00:00 a 23:59): {}", .0.join(", "))]
    InvalidTimeFormat(Vec<String>),
}

/// Checks whether `input` denotes a valid 24-hour clock time in `HH:MM` form.
///
/// Accepts one or two hour digits (`"8:30"` and `"08:30"`), requires exactly
/// two minute digits, and range-checks hour 0–23 / minute 0–59. Anything
/// else, including empty or non-time text, is simply invalid; no failure
/// escapes as an error.
pub fn is_valid_time(input: &str) -> bool {
    let trimmed = input.trim();
    if !TIME_SHAPE.is_match(trimmed) {
        return false;
    }
    let Some((hour, minute)) = trimmed.split_once(':') else {
        return false;
    };
    match (hour.parse::<u32>(), minute.parse::<u32>()) {
        (Ok(hour), Ok(minute)) => hour <= 23 && minute <= 59,
        _ => false,
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Validates the raw form and builds the immutable [`VisitRecord`].
///
/// All violations are collected in one pass (no short-circuiting),
/// deduplicated and sorted so the aggregated message is stable across
/// submissions. Presence violations take precedence over time-format
/// violations; a time field is format-checked only when it is present.
pub fn validate_form(form: &RawVisitForm) -> Result<VisitRecord, ValidationError> {
    let mut missing: BTreeSet<&str> = BTreeSet::new();
    let mut bad_times: BTreeSet<&str> = BTreeSet::new();

    if form.visit_date.is_none() {
        missing.insert(LABEL_VISIT_DATE);
    }

    let required_text = [
        (form.start_time.as_str(), LABEL_START_TIME),
        (form.end_time.as_str(), LABEL_END_TIME),
        (form.property_name.as_str(), LABEL_PROPERTY_NAME),
        (form.address.as_str(), LABEL_ADDRESS),
        (form.municipality.as_str(), LABEL_MUNICIPALITY),
        (form.gate_coordinates.as_str(), LABEL_GATE_COORDINATES),
        (form.homestead_coordinates.as_str(), LABEL_HOMESTEAD_COORDINATES),
        (form.owner_name.as_str(), LABEL_OWNER_NAME),
        (form.tax_id.as_str(), LABEL_TAX_ID),
        (form.phone.as_str(), LABEL_PHONE),
        (form.main_activity.as_str(), LABEL_MAIN_ACTIVITY),
        (form.plate_number.as_str(), LABEL_PLATE_NUMBER),
    ];
    for (value, label) in required_text {
        if is_blank(value) {
            missing.insert(label);
        }
    }

    // Absent and non-positive areas share one distinctly labeled violation.
    let area = form.area.filter(|area| *area > 0.0);
    if area.is_none() {
        missing.insert(LABEL_AREA);
    }

    for (value, label) in [
        (form.start_time.as_str(), LABEL_START_TIME),
        (form.end_time.as_str(), LABEL_END_TIME),
    ] {
        if !is_blank(value) && !is_valid_time(value) {
            bad_times.insert(label);
        }
    }

    let (Some(visit_date), Some(area)) = (form.visit_date, area) else {
        return Err(ValidationError::MissingRequiredFields(owned(missing)));
    };
    if !missing.is_empty() {
        return Err(ValidationError::MissingRequiredFields(owned(missing)));
    }
    if !bad_times.is_empty() {
        return Err(ValidationError::InvalidTimeFormat(owned(bad_times)));
    }

    Ok(VisitRecord {
        visit_date,
        start_time: form.start_time.trim().to_string(),
        end_time: form.end_time.trim().to_string(),
        property_kind: form.property_kind,
        property_name: form.property_name.trim().to_string(),
        address: form.address.trim().to_string(),
        municipality: form.municipality.trim().to_string(),
        state_code: form.state_code,
        gate_coordinates: form.gate_coordinates.trim().to_string(),
        homestead_coordinates: form.homestead_coordinates.trim().to_string(),
        area,
        area_unit: form.area_unit,
        owner_name: form.owner_name.trim().to_string(),
        tax_id: form.tax_id.trim().to_string(),
        phone: form.phone.trim().to_string(),
        main_activity: form.main_activity.trim().to_string(),
        vehicles: form.vehicles.trim().to_string(),
        cattle_brand: form.cattle_brand.trim().to_string(),
        plate_number: form.plate_number.trim().to_string(),
    })
}

fn owned(labels: BTreeSet<&str>) -> Vec<String> {
    labels.into_iter().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::record::{AreaUnit, PropertyKind, StateCode};
    use chrono::NaiveDate;

    fn filled_form() -> RawVisitForm {
        RawVisitForm {
            visit_date: NaiveDate::from_ymd_opt(2024, 5, 1),
            start_time: "08:00".to_string(),
            end_time: "09:30".to_string(),
            property_kind: PropertyKind::Fazenda,
            property_name: "São José".to_string(),
            address: "Linha 5".to_string(),
            municipality: "Ariquemes".to_string(),
            state_code: StateCode::RO,
            gate_coordinates: "-9.89, -63.01".to_string(),
            homestead_coordinates: "-9.90, -63.02".to_string(),
            area: Some(2.5),
            area_unit: AreaUnit::Hectares,
            owner_name: "João Silva".to_string(),
            tax_id: "123.456.789-00".to_string(),
            phone: "(69) 99999-0000".to_string(),
            main_activity: "Criação de bovinos".to_string(),
            vehicles: String::new(),
            cattle_brand: String::new(),
            plate_number: "PSR-001".to_string(),
        }
    }

    #[test]
    fn test_time_validator_accepts_valid_times() {
        assert!(is_valid_time("08:30"));
        assert!(is_valid_time("8:30"));
        assert!(is_valid_time("0:00"));
        assert!(is_valid_time("23:59"));
        assert!(is_valid_time("  10:15  "));
    }

    #[test]
    fn test_time_validator_rejects_invalid_times() {
        assert!(!is_valid_time("25:00"));
        assert!(!is_valid_time("08:60"));
        assert!(!is_valid_time("8:3"));
        assert!(!is_valid_time(""));
        assert!(!is_valid_time("08:30:00"));
        assert!(!is_valid_time("oito e meia"));
        assert!(!is_valid_time("-1:00"));
        assert!(!is_valid_time("24:00"));
    }

    #[test]
    fn test_fully_filled_form_validates() {
        let record = validate_form(&filled_form()).unwrap();
        assert_eq!(record.property_name, "São José");
        assert_eq!(record.area, 2.5);
    }

    #[test]
    fn test_missing_owner_and_zero_area_are_both_reported() {
        let mut form = filled_form();
        form.owner_name = "   ".to_string();
        form.area = Some(0.0);

        let err = validate_form(&form).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingRequiredFields(vec![
                "Nome do proprietário".to_string(),
                "Área da propriedade (deve ser > 0)".to_string(),
            ])
        );
    }

    #[test]
    fn test_violations_are_deduplicated_and_sorted() {
        let mut form = filled_form();
        form.phone = String::new();
        form.tax_id = String::new();
        form.visit_date = None;

        let ValidationError::MissingRequiredFields(labels) =
            validate_form(&form).unwrap_err()
        else {
            panic!("expected missing-field violations");
        };
        let mut sorted = labels.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(labels, sorted);
        assert_eq!(labels.len(), 3);
    }

    #[test]
    fn test_malformed_start_time_is_a_single_format_violation() {
        let mut form = filled_form();
        form.start_time = "25:99".to_string();

        let err = validate_form(&form).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidTimeFormat(vec!["Hora de início".to_string()])
        );
    }

    #[test]
    fn test_missing_fields_take_precedence_over_malformed_times() {
        let mut form = filled_form();
        form.owner_name = String::new();
        form.end_time = "99:99".to_string();

        let err = validate_form(&form).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingRequiredFields(vec!["Nome do proprietário".to_string()])
        );
    }

    #[test]
    fn test_negative_area_is_reported_with_the_distinct_label() {
        let mut form = filled_form();
        form.area = Some(-10.0);

        let err = validate_form(&form).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingRequiredFields(vec![
                "Área da propriedade (deve ser > 0)".to_string()
            ])
        );
    }

    #[test]
    fn test_record_fields_are_trimmed() {
        let mut form = filled_form();
        form.property_name = "  São José  ".to_string();
        form.vehicles = "  uma caminhonete Ford Ranger  ".to_string();

        let record = validate_form(&form).unwrap();
        assert_eq!(record.property_name, "São José");
        assert_eq!(record.vehicles, "uma caminhonete Ford Ranger");
    }

    #[test]
    fn test_error_message_lists_all_labels() {
        let mut form = filled_form();
        form.municipality = String::new();
        form.address = String::new();

        let err = validate_form(&form).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Endereço completo"));
        assert!(message.contains("Município"));
        assert!(message.starts_with("Por favor, preencha todos os campos obrigatórios"));
    }
}
