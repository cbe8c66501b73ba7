use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::model::Task;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrioritizationResult {
    pub id: String,
    pub priority_score: f64,
    pub reason: String,
}

pub fn resolved_score(task_id: &str, scores: &[PrioritizationResult]) -> f64 {
    scores
        .iter()
        .find(|score| score.id == task_id)
        .map(|score| score.priority_score)
        .unwrap_or(0.0)
}

pub fn sort_by_priority(tasks: &[Task], scores: &[PrioritizationResult]) -> Vec<Task> {
    let mut sorted = tasks.to_vec();
    // Vec::sort_by is stable, so equal scores keep their input order.
    sorted.sort_by(|a, b| {
        let score_a = resolved_score(&a.id, scores);
        let score_b = resolved_score(&b.id, scores);
        score_b.partial_cmp(&score_a).unwrap_or(Ordering::Equal)
    });
    sorted
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreBoard {
    generation: u64,
    scores: Vec<PrioritizationResult>,
}

impl ScoreBoard {
    pub fn scores(&self) -> &[PrioritizationResult] {
        &self.scores
    }

    pub fn reason_for(&self, task_id: &str) -> Option<&str> {
        self.scores
            .iter()
            .find(|score| score.id == task_id)
            .map(|score| score.reason.as_str())
    }

    pub fn begin_request(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    pub fn apply(&mut self, generation: u64, results: Vec<PrioritizationResult>) -> bool {
        if generation != self.generation {
            return false;
        }
        self.scores = results;
        true
    }

    pub fn invalidate(&mut self) {
        self.generation += 1;
        self.scores.clear();
    }
}
