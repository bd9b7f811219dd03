//! Domain value objects and types.
//!
//! Type-safe wrappers for record ids and email addresses, validated at
//! construction, plus the number and date parsing shared by form inputs,
//! spreadsheet cells and reports.

pub mod dates;
pub mod email;
pub mod errors;
pub mod number;
pub mod record_id;

pub use dates::{calendar_date, format_date, parse_timestamp};
pub use email::EmailAddress;
pub use errors::ValidationError;
pub use number::{parse_number_lenient, parse_number_strict};
pub use record_id::RecordId;
