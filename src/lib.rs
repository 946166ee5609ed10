//! Core of the rural-patrol report generator: form validation, the fixed
//! Portuguese report template and the refinement-service client.
//!
//! The library is UI-free. A thin adapter (the `historico-rural` binary)
//! collects a filled form file, runs validation → templating → refinement in
//! sequence and owns printing and saving the result.

pub mod artifact;
pub mod config;
pub mod refine;
pub mod report;

pub use config::{ConfigError, ConfigOverrides, RefineConfig};
pub use refine::{Provider, RefineError, RefineOutcome, Refiner};
pub use report::{
    is_valid_time, render_report, validate_form, AreaUnit, PropertyKind, RawVisitForm, StateCode,
    ValidationError, VisitRecord,
};
