use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::common::{Dated, Identifiable, RecordId};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
    #[serde(rename = "Bank Transfer")]
    BankTransfer,
    Check,
    #[serde(rename = "Online Payment")]
    OnlinePayment,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 5] = [
        PaymentMethod::Cash,
        PaymentMethod::Card,
        PaymentMethod::BankTransfer,
        PaymentMethod::Check,
        PaymentMethod::OnlinePayment,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Card => "Card",
            PaymentMethod::BankTransfer => "Bank Transfer",
            PaymentMethod::Check => "Check",
            PaymentMethod::OnlinePayment => "Online Payment",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized: String = value
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        PaymentMethod::ALL
            .into_iter()
            .find(|method| {
                method
                    .label()
                    .chars()
                    .filter(|c| c.is_ascii_alphanumeric())
                    .collect::<String>()
                    .eq_ignore_ascii_case(&normalized)
            })
            .ok_or_else(|| format!("unknown payment method `{}`", value.trim()))
    }
}

/// A tuition payment crediting purchased hours to a student.
///
/// `teacher_id` and `hourly_rate` are copied from the course when the
/// payment is recorded and never follow later course edits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: RecordId,
    pub date: NaiveDate,
    pub student_id: RecordId,
    pub course_id: RecordId,
    #[serde(default)]
    pub teacher_id: Option<RecordId>,
    pub hourly_rate: f64,
    pub purchased_hours: f64,
    #[serde(default)]
    pub discounted_tuition: f64,
    pub amount_paid: f64,
    #[serde(default)]
    pub payment_method: PaymentMethod,
}

impl Identifiable for Payment {
    fn id(&self) -> RecordId {
        self.id
    }
}

impl Dated for Payment {
    fn date(&self) -> NaiveDate {
        self.date
    }
}
