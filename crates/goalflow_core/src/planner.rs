use std::str::FromStr;

use uuid::Uuid;

use crate::error::AppError;
use crate::matrix::{self, MatrixBuckets};
use crate::model::{Goal, NewTask, Task, validate_due_date};
use crate::priority::{self, PrioritizationResult, ScoreBoard};
use crate::progress;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskField {
    Title,
    Urgency,
    Importance,
    DueDate,
    Impact,
}

impl FromStr for TaskField {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "title" => Ok(Self::Title),
            "urgency" => Ok(Self::Urgency),
            "importance" => Ok(Self::Importance),
            "due_date" | "duedate" | "due" => Ok(Self::DueDate),
            "impact" => Ok(Self::Impact),
            other => Err(AppError::invalid_input(format!(
                "unknown task field '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditDraft {
    pub task_id: String,
    pub task: Task,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GoalPlanner {
    goal: Goal,
    editing: Option<EditDraft>,
    scores: ScoreBoard,
}

impl GoalPlanner {
    pub fn new(goal: Goal) -> Self {
        Self {
            goal,
            editing: None,
            scores: ScoreBoard::default(),
        }
    }

    pub fn goal(&self) -> &Goal {
        &self.goal
    }

    pub fn into_goal(self) -> Goal {
        self.goal
    }

    pub fn tasks(&self) -> &[Task] {
        &self.goal.tasks
    }

    pub fn editing(&self) -> Option<&EditDraft> {
        self.editing.as_ref()
    }

    pub fn scores(&self) -> &[PrioritizationResult] {
        self.scores.scores()
    }

    pub fn start_edit(&mut self, task_id: &str) -> Result<(), AppError> {
        if self.editing.is_some() {
            return Err(AppError::invalid_input("another edit is in progress"));
        }
        let task = self
            .goal
            .tasks
            .iter()
            .find(|task| task.id == task_id)
            .cloned()
            .ok_or_else(|| AppError::invalid_input("task not found"))?;
        self.editing = Some(EditDraft {
            task_id: task.id.clone(),
            task,
        });
        Ok(())
    }

    pub fn change_field(&mut self, field: TaskField, value: &str) -> Result<(), AppError> {
        let draft = self
            .editing
            .as_mut()
            .ok_or_else(|| AppError::invalid_input("no edit in progress"))?;

        match field {
            TaskField::Title => {
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    return Err(AppError::invalid_input("title is required"));
                }
                draft.task.title = trimmed.to_string();
            }
            TaskField::Urgency => draft.task.urgency = value.parse()?,
            TaskField::Importance => draft.task.importance = value.parse()?,
            TaskField::DueDate => {
                validate_due_date(value)?;
                draft.task.due_date = value.trim().to_string();
            }
            TaskField::Impact => {
                draft.task.impact = value
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| AppError::invalid_input("impact must be a number"))?;
            }
        }

        Ok(())
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    pub fn save_edit(&mut self) -> Result<Task, AppError> {
        let draft = self
            .editing
            .as_ref()
            .ok_or_else(|| AppError::invalid_input("no edit in progress"))?;

        // The target may have vanished through a remote snapshot or delete;
        // the machine stays in editing mode and the list is untouched.
        let Some(target) = self
            .goal
            .tasks
            .iter_mut()
            .find(|task| task.id == draft.task_id)
        else {
            return Err(AppError::missing_edit_target(
                "edit target no longer exists",
            ));
        };

        *target = draft.task.clone();
        let saved = target.clone();
        self.editing = None;
        self.scores.invalidate();
        Ok(saved)
    }

    pub fn delete_task(&mut self, task_id: &str) -> bool {
        let Some(index) = self.goal.tasks.iter().position(|task| task.id == task_id) else {
            return false;
        };
        self.goal.tasks.remove(index);
        self.scores.invalidate();
        true
    }

    pub fn toggle_completion(&mut self, task_id: &str) -> Option<Task> {
        let task = self
            .goal
            .tasks
            .iter_mut()
            .find(|task| task.id == task_id)?;
        task.completed = !task.completed;
        let toggled = task.clone();
        self.scores.invalidate();
        Some(toggled)
    }

    pub fn add_tasks(&mut self, proposed: Vec<NewTask>) -> Result<Vec<Task>, AppError> {
        for entry in &proposed {
            if entry.title.trim().is_empty() {
                return Err(AppError::invalid_input("title is required"));
            }
            validate_due_date(&entry.due_date)?;
        }

        let mut added = Vec::with_capacity(proposed.len());
        for entry in proposed {
            let task = Task {
                id: format!("task-{}", Uuid::new_v4()),
                title: entry.title.trim().to_string(),
                urgency: entry.urgency,
                importance: entry.importance,
                due_date: entry.due_date.trim().to_string(),
                impact: entry.impact,
                completed: false,
            };
            self.goal.tasks.push(task.clone());
            added.push(task);
        }

        if !added.is_empty() {
            self.scores.invalidate();
        }
        Ok(added)
    }

    // Remote snapshots refresh the viewing list but never clobber an active
    // edit draft; a stale draft surfaces later as missing_edit_target.
    pub fn apply_snapshot(&mut self, remote: Goal) {
        self.goal = remote;
        self.scores.invalidate();
    }

    pub fn begin_prioritize(&mut self) -> u64 {
        self.scores.begin_request()
    }

    pub fn apply_scores(&mut self, generation: u64, results: Vec<PrioritizationResult>) -> bool {
        self.scores.apply(generation, results)
    }

    pub fn sorted_tasks(&self) -> Vec<Task> {
        priority::sort_by_priority(&self.goal.tasks, self.scores.scores())
    }

    pub fn matrix(&self) -> MatrixBuckets {
        matrix::partition(&self.goal.tasks)
    }

    pub fn progress(&self) -> f64 {
        progress::completion_progress(&self.goal.tasks)
    }

    pub fn reason_for(&self, task_id: &str) -> Option<&str> {
        self.scores.reason_for(task_id)
    }
}
