use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::common::{Dated, Identifiable, RecordId};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: RecordId,
    pub date: NaiveDate,
    pub item: String,
    pub amount: f64,
}

impl Expense {
    pub fn new(date: NaiveDate, item: impl Into<String>, amount: f64) -> Self {
        Self {
            id: 0,
            date,
            item: item.into(),
            amount,
        }
    }
}

impl Identifiable for Expense {
    fn id(&self) -> RecordId {
        self.id
    }
}

impl Dated for Expense {
    fn date(&self) -> NaiveDate {
        self.date
    }
}
