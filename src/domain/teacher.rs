use serde::{Deserialize, Serialize};

use super::common::{Identifiable, NamedEntity, RecordId};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: RecordId,
    pub name: String,
    /// Pay per taught hour.
    pub hourly_rate: f64,
}

impl Teacher {
    pub fn new(name: impl Into<String>, hourly_rate: f64) -> Self {
        Self {
            id: 0,
            name: name.into(),
            hourly_rate,
        }
    }
}

impl Identifiable for Teacher {
    fn id(&self) -> RecordId {
        self.id
    }
}

impl NamedEntity for Teacher {
    fn name(&self) -> &str {
        &self.name
    }
}
