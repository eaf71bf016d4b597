pub mod course_service;
pub mod expense_service;
pub mod payment_service;
pub mod report_service;
pub mod session_service;
pub mod student_service;
pub mod teacher_service;

pub use course_service::CourseService;
pub use expense_service::ExpenseService;
pub use payment_service::{PaymentRequest, PaymentService};
pub use report_service::{Dashboard, ReportService};
pub use session_service::{SessionRequest, SessionService};
pub use student_service::StudentService;
pub use teacher_service::TeacherService;

use crate::domain::RecordId;
use crate::errors::StoreError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: RecordId },
    #[error("{0}")]
    Invalid(String),
}

impl ServiceError {
    pub(crate) fn not_found(kind: &'static str, id: RecordId) -> Self {
        ServiceError::NotFound { kind, id }
    }
}

pub(crate) fn require_name(label: &str, value: &str) -> ServiceResult<()> {
    if value.trim().is_empty() {
        Err(ServiceError::Invalid(format!("{} must not be empty", label)))
    } else {
        Ok(())
    }
}

pub(crate) fn require_non_negative(label: &str, value: f64) -> ServiceResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ServiceError::Invalid(format!(
            "{} must be a non-negative number",
            label
        )))
    }
}

pub(crate) fn require_positive(label: &str, value: f64) -> ServiceResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ServiceError::Invalid(format!(
            "{} must be greater than zero",
            label
        )))
    }
}
