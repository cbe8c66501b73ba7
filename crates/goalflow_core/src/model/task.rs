use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use time::Date;
use time::macros::format_description;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rating {
    High,
    Medium,
    Low,
}

impl Rating {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

impl FromStr for Rating {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            other => Err(AppError::invalid_data(format!(
                "rating must be High, Medium or Low, got '{other}'"
            ))),
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub urgency: Rating,
    pub importance: Rating,
    pub due_date: String,
    pub impact: f64,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    pub urgency: Rating,
    pub importance: Rating,
    pub due_date: String,
    pub impact: f64,
}

pub fn validate_due_date(value: &str) -> Result<(), AppError> {
    let format = format_description!("[year]-[month]-[day]");
    Date::parse(value.trim(), &format)
        .map(|_| ())
        .map_err(|_| AppError::invalid_input("due date must be YYYY-MM-DD"))
}
