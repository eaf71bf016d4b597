use std::{collections::BTreeMap, fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::common::{Identifiable, NamedEntity, RecordId};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Gender {
    #[default]
    F,
    M,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::F => write!(f, "F"),
            Gender::M => write!(f, "M"),
        }
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "F" | "FEMALE" => Ok(Gender::F),
            "M" | "MALE" => Ok(Gender::M),
            other => Err(format!("unknown gender `{other}` (expected F or M)")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default)]
    pub birthdate: Option<NaiveDate>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub parent: String,
    #[serde(default)]
    pub contact: String,
    /// Remaining purchased hours keyed by course id.
    #[serde(default)]
    pub balances: BTreeMap<RecordId, f64>,
}

impl Student {
    pub fn new(name: impl Into<String>, gender: Gender) -> Self {
        Self {
            id: 0,
            name: name.into(),
            gender,
            birthdate: None,
            age: None,
            parent: String::new(),
            contact: String::new(),
            balances: BTreeMap::new(),
        }
    }

    pub fn with_birthdate(mut self, birthdate: NaiveDate) -> Self {
        self.birthdate = Some(birthdate);
        self
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = parent.into();
        self
    }

    pub fn with_contact(mut self, contact: impl Into<String>) -> Self {
        self.contact = contact.into();
        self
    }

    /// Recomputes the derived age against `today`.
    pub fn refresh_age(&mut self, today: NaiveDate) {
        self.age = self.birthdate.and_then(|born| age_on(born, today));
    }

    pub fn balance(&self, course_id: RecordId) -> f64 {
        self.balances.get(&course_id).copied().unwrap_or(0.0)
    }
}

impl Identifiable for Student {
    fn id(&self) -> RecordId {
        self.id
    }
}

impl NamedEntity for Student {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Whole calendar years between `born` and `today`; `None` for future birthdates.
pub fn age_on(born: NaiveDate, today: NaiveDate) -> Option<u32> {
    today.years_since(born)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn age_counts_completed_years_only() {
        let born = date(2010, 3, 15);
        assert_eq!(age_on(born, date(2024, 3, 14)), Some(13));
        assert_eq!(age_on(born, date(2024, 3, 15)), Some(14));
    }

    #[test]
    fn refresh_age_clears_when_birthdate_missing() {
        let mut student = Student::new("Charlie", Gender::M);
        student.age = Some(9);
        student.refresh_age(date(2024, 1, 1));
        assert_eq!(student.age, None);
    }

    #[test]
    fn gender_parses_case_insensitively() {
        assert_eq!("f".parse::<Gender>().unwrap(), Gender::F);
        assert_eq!("Male".parse::<Gender>().unwrap(), Gender::M);
        assert!("x".parse::<Gender>().is_err());
    }
}
