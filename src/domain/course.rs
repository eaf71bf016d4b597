use serde::{Deserialize, Serialize};

use super::common::{Identifiable, NamedEntity, RecordId};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: RecordId,
    pub name: String,
    /// Tuition charged per purchased hour.
    pub hourly_rate: f64,
    /// Owning teacher; cleared when that teacher is deleted.
    #[serde(default)]
    pub teacher_id: Option<RecordId>,
}

impl Course {
    pub fn new(name: impl Into<String>, hourly_rate: f64, teacher_id: Option<RecordId>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            hourly_rate,
            teacher_id,
        }
    }
}

impl Identifiable for Course {
    fn id(&self) -> RecordId {
        self.id
    }
}

impl NamedEntity for Course {
    fn name(&self) -> &str {
        &self.name
    }
}
