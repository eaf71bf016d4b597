//! Record types for the tutoring center and the shared identifier/date helpers.

pub mod common;
pub mod course;
pub mod expense;
pub mod payment;
pub mod session;
pub mod student;
pub mod teacher;

pub use common::{next_id, parse_date, DateRange, Dated, Identifiable, NamedEntity, RecordId};
pub use course::Course;
pub use expense::Expense;
pub use payment::{Payment, PaymentMethod};
pub use session::Session;
pub use student::{Gender, Student};
pub use teacher::Teacher;

// Re-export common dependencies so consumers can rely on this module as a façade.
pub use chrono;
pub use serde;
