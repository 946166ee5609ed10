pub mod record;
pub mod template;
pub mod validation;

pub use record::{AreaUnit, PropertyKind, RawVisitForm, StateCode, VisitRecord};
pub use template::render_report;
pub use validation::{is_valid_time, validate_form, ValidationError};
