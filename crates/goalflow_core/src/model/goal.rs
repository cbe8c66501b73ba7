use serde::{Deserialize, Serialize};

use super::Task;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: String,
    pub goal: String,
    pub created_at: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
}
