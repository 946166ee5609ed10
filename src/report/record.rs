use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Property kind, as offered by the form's select box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyKind {
    #[serde(rename = "Sítio")]
    Sitio,
    #[serde(rename = "Fazenda")]
    Fazenda,
    #[serde(rename = "Chácara")]
    Chacara,
    #[serde(rename = "Estância")]
    Estancia,
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PropertyKind::Sitio => "Sítio",
            PropertyKind::Fazenda => "Fazenda",
            PropertyKind::Chacara => "Chácara",
            PropertyKind::Estancia => "Estância",
        };
        f.write_str(name)
    }
}

/// Federative units covered by the program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StateCode {
    RO,
    AC,
    AM,
    RR,
    PA,
    TO,
    MT,
    MS,
    GO,
    DF,
}

impl fmt::Display for StateCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            StateCode::RO => "RO",
            StateCode::AC => "AC",
            StateCode::AM => "AM",
            StateCode::RR => "RR",
            StateCode::PA => "PA",
            StateCode::TO => "TO",
            StateCode::MT => "MT",
            StateCode::MS => "MS",
            StateCode::GO => "GO",
            StateCode::DF => "DF",
        };
        f.write_str(code)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AreaUnit {
    #[serde(rename = "hectares")]
    Hectares,
    #[serde(rename = "alqueires")]
    Alqueires,
}

impl fmt::Display for AreaUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = match self {
            AreaUnit::Hectares => "hectares",
            AreaUnit::Alqueires => "alqueires",
        };
        f.write_str(unit)
    }
}

/// Raw field values as collected by the form, before validation.
///
/// Free-text fields default to empty strings so a partially filled form file
/// still deserializes and every omission is reported by the validator in one
/// pass. The select-box fields (`property_kind`, `state_code`, `area_unit`)
/// cannot hold out-of-range values, so they are rejected at deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawVisitForm {
    #[serde(default)]
    pub visit_date: Option<NaiveDate>,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    pub property_kind: PropertyKind,
    #[serde(default)]
    pub property_name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub municipality: String,
    pub state_code: StateCode,
    #[serde(default)]
    pub gate_coordinates: String,
    #[serde(default)]
    pub homestead_coordinates: String,
    #[serde(default)]
    pub area: Option<f64>,
    pub area_unit: AreaUnit,
    #[serde(default)]
    pub owner_name: String,
    #[serde(default)]
    pub tax_id: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub main_activity: String,
    #[serde(default)]
    pub vehicles: String,
    #[serde(default)]
    pub cattle_brand: String,
    #[serde(default)]
    pub plate_number: String,
}

/// A validated visit record. Built only by [`crate::report::validate_form`],
/// consumed once by the template engine, never persisted.
///
/// All free-text fields are trimmed; `vehicles` and `cattle_brand` may be
/// empty, which suppresses their clauses in the rendered report.
#[derive(Debug, Clone, PartialEq)]
pub struct VisitRecord {
    pub visit_date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub property_kind: PropertyKind,
    pub property_name: String,
    pub address: String,
    pub municipality: String,
    pub state_code: StateCode,
    pub gate_coordinates: String,
    pub homestead_coordinates: String,
    pub area: f64,
    pub area_unit: AreaUnit,
    pub owner_name: String,
    pub tax_id: String,
    pub phone: String,
    pub main_activity: String,
    pub vehicles: String,
    pub cattle_brand: String,
    pub plate_number: String,
}
