use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::AppError;
use crate::model::{NewTask, Rating, Task};
use crate::priority::PrioritizationResult;

mod gemini;
mod heuristic;

pub use gemini::GeminiOracle;
pub use heuristic::HeuristicOracle;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecompositionResponse {
    pub tasks: Vec<NewTask>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPayload {
    pub id: String,
    pub title: String,
    pub urgency: Rating,
    pub importance: Rating,
    pub due_date: String,
    pub impact: f64,
}

impl TaskPayload {
    pub fn from_task(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            title: task.title.clone(),
            urgency: task.urgency,
            importance: task.importance,
            due_date: task.due_date.clone(),
            impact: task.impact,
        }
    }
}

pub trait DecompositionOracle {
    fn decompose(&self, goal: &str) -> Result<Vec<NewTask>, AppError>;
}

pub trait PrioritizationOracle {
    fn prioritize(&self, tasks: &[Task]) -> Result<Vec<PrioritizationResult>, AppError>;
}

pub trait GoalOracle: DecompositionOracle + PrioritizationOracle {}

impl<T: DecompositionOracle + PrioritizationOracle> GoalOracle for T {}

const ORACLE_ENV_VAR: &str = "GOALFLOW_ORACLE";
const API_KEY_ENV_VARS: [&str; 2] = ["GOALFLOW_GEMINI_API_KEY", "GEMINI_API_KEY"];
const MODEL_ENV_VAR: &str = "GOALFLOW_GEMINI_MODEL";

pub fn oracle_from_env(config: &Config) -> Result<Box<dyn GoalOracle>, AppError> {
    let selected = env_value(ORACLE_ENV_VAR).or_else(|| config.oracle.clone());

    match selected.as_deref() {
        Some("heuristic") => Ok(Box::new(HeuristicOracle)),
        Some("gemini") => {
            let api_key = api_key_from_env(config).ok_or_else(|| {
                AppError::oracle_unavailable(
                    "gemini oracle selected but no API key is configured",
                )
            })?;
            Ok(Box::new(GeminiOracle::new(api_key, model_from_env(config))))
        }
        Some(other) => Err(AppError::invalid_data(format!(
            "unknown oracle '{other}', expected gemini or heuristic"
        ))),
        None => match api_key_from_env(config) {
            Some(api_key) => Ok(Box::new(GeminiOracle::new(api_key, model_from_env(config)))),
            None => Ok(Box::new(HeuristicOracle)),
        },
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn api_key_from_env(config: &Config) -> Option<String> {
    API_KEY_ENV_VARS
        .iter()
        .find_map(|name| env_value(name))
        .or_else(|| config.gemini_api_key.clone())
}

fn model_from_env(config: &Config) -> Option<String> {
    env_value(MODEL_ENV_VAR).or_else(|| config.gemini_model.clone())
}
