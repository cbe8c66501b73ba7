use crate::error::AppError;
use crate::model::{NewTask, Rating, Task};
use crate::priority::PrioritizationResult;

use super::{DecompositionOracle, PrioritizationOracle};

// Deterministic offline prioritizer. Decomposition stays AI-only.
pub struct HeuristicOracle;

fn rating_weight(rating: Rating) -> f64 {
    match rating {
        Rating::High => 1.0,
        Rating::Medium => 0.6,
        Rating::Low => 0.2,
    }
}

pub fn heuristic_score(task: &Task) -> f64 {
    let weighted = rating_weight(task.urgency) * 40.0
        + rating_weight(task.importance) * 40.0
        + task.impact.clamp(0.0, 10.0) * 2.0;
    weighted.clamp(0.0, 100.0)
}

impl DecompositionOracle for HeuristicOracle {
    fn decompose(&self, _goal: &str) -> Result<Vec<NewTask>, AppError> {
        Err(AppError::oracle_unavailable(
            "goal decomposition requires a configured AI backend",
        ))
    }
}

impl PrioritizationOracle for HeuristicOracle {
    fn prioritize(&self, tasks: &[Task]) -> Result<Vec<PrioritizationResult>, AppError> {
        Ok(tasks
            .iter()
            .map(|task| PrioritizationResult {
                id: task.id.clone(),
                priority_score: heuristic_score(task),
                reason: format!(
                    "{} urgency, {} importance, impact {} (offline heuristic)",
                    task.urgency, task.importance, task.impact
                ),
            })
            .collect())
    }
}
