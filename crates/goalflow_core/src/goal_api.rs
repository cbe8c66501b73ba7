use log::{info, warn};
use std::path::Path;

use crate::error::AppError;
use crate::model::{Goal, NewTask, Task};
use crate::oracle::{DecompositionOracle, PrioritizationOracle};
use crate::planner::{GoalPlanner, TaskField};
use crate::priority::PrioritizationResult;
use crate::storage::json_store;

pub fn create_goal(goal_text: &str) -> Result<Goal, AppError> {
    let path = json_store::store_path()?;
    create_goal_with_path(&path, goal_text)
}

pub fn list_goals() -> Result<Vec<Goal>, AppError> {
    let path = json_store::store_path()?;
    list_goals_with_path(&path)
}

pub fn get_goal(goal_id: &str) -> Result<Goal, AppError> {
    let path = json_store::store_path()?;
    get_goal_with_path(&path, goal_id)
}

pub fn decompose_goal(
    oracle: &dyn DecompositionOracle,
    goal_id: &str,
) -> Result<Vec<Task>, AppError> {
    let path = json_store::store_path()?;
    decompose_goal_with_path(&path, oracle, goal_id)
}

pub fn add_task(goal_id: &str, new_task: NewTask) -> Result<Task, AppError> {
    let path = json_store::store_path()?;
    add_task_with_path(&path, goal_id, new_task)
}

pub fn edit_task(
    goal_id: &str,
    task_id: &str,
    changes: &[(TaskField, String)],
) -> Result<Task, AppError> {
    let path = json_store::store_path()?;
    edit_task_with_path(&path, goal_id, task_id, changes)
}

pub fn delete_task(goal_id: &str, task_id: &str) -> Result<bool, AppError> {
    let path = json_store::store_path()?;
    delete_task_with_path(&path, goal_id, task_id)
}

pub fn toggle_task(goal_id: &str, task_id: &str) -> Result<Option<Task>, AppError> {
    let path = json_store::store_path()?;
    toggle_task_with_path(&path, goal_id, task_id)
}

pub fn prioritize_goal(
    oracle: &dyn PrioritizationOracle,
    goal_id: &str,
) -> Result<Vec<PrioritizationResult>, AppError> {
    let path = json_store::store_path()?;
    prioritize_goal_with_path(&path, oracle, goal_id)
}

fn create_goal_with_path(path: &Path, goal_text: &str) -> Result<Goal, AppError> {
    let trimmed = goal_text.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input("goal is required"));
    }

    let goal = json_store::create_goal(path, trimmed)?;
    info!("created goal {}", goal.id);
    Ok(goal)
}

// A failed write leaves the in-memory result as the attempted next state;
// the durable copy may diverge until the caller retries.
fn persist(path: &Path, goal: &Goal) -> Result<(), AppError> {
    json_store::replace_goal(path, goal).map_err(|err| {
        warn!("failed to persist goal {}: {err}", goal.id);
        err
    })
}

fn list_goals_with_path(path: &Path) -> Result<Vec<Goal>, AppError> {
    let mut goals = json_store::load_goals(path)?;
    // Newest first, the order the hosted backend served them in.
    goals.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(goals)
}

fn get_goal_with_path(path: &Path, goal_id: &str) -> Result<Goal, AppError> {
    let trimmed_id = goal_id.trim();
    if trimmed_id.is_empty() {
        return Err(AppError::invalid_input("goal id is required"));
    }

    json_store::load_goals(path)?
        .into_iter()
        .find(|goal| goal.id == trimmed_id)
        .ok_or_else(|| AppError::invalid_input("goal not found"))
}

fn decompose_goal_with_path(
    path: &Path,
    oracle: &dyn DecompositionOracle,
    goal_id: &str,
) -> Result<Vec<Task>, AppError> {
    let goal = get_goal_with_path(path, goal_id)?;

    let proposed = oracle.decompose(&goal.goal).map_err(|err| {
        warn!("goal decomposition failed for {goal_id}: {err}");
        err
    })?;

    let mut planner = GoalPlanner::new(goal);
    let added = planner.add_tasks(proposed)?;
    persist(path, planner.goal())?;

    Ok(added)
}

fn add_task_with_path(path: &Path, goal_id: &str, new_task: NewTask) -> Result<Task, AppError> {
    let goal = get_goal_with_path(path, goal_id)?;

    let mut planner = GoalPlanner::new(goal);
    let mut added = planner.add_tasks(vec![new_task])?;
    persist(path, planner.goal())?;

    Ok(added.remove(0))
}

fn edit_task_with_path(
    path: &Path,
    goal_id: &str,
    task_id: &str,
    changes: &[(TaskField, String)],
) -> Result<Task, AppError> {
    if changes.is_empty() {
        return Err(AppError::invalid_input("at least one field change is required"));
    }

    let goal = get_goal_with_path(path, goal_id)?;
    let mut planner = GoalPlanner::new(goal);

    planner.start_edit(task_id)?;
    for (field, value) in changes {
        planner.change_field(*field, value)?;
    }
    let saved = planner.save_edit()?;

    persist(path, planner.goal())?;
    Ok(saved)
}

fn delete_task_with_path(path: &Path, goal_id: &str, task_id: &str) -> Result<bool, AppError> {
    let goal = get_goal_with_path(path, goal_id)?;

    let mut planner = GoalPlanner::new(goal);
    let removed = planner.delete_task(task_id);
    if removed {
        persist(path, planner.goal())?;
    }

    Ok(removed)
}

fn toggle_task_with_path(
    path: &Path,
    goal_id: &str,
    task_id: &str,
) -> Result<Option<Task>, AppError> {
    let goal = get_goal_with_path(path, goal_id)?;

    let mut planner = GoalPlanner::new(goal);
    let toggled = planner.toggle_completion(task_id);
    if toggled.is_some() {
        persist(path, planner.goal())?;
    }

    Ok(toggled)
}

fn prioritize_goal_with_path(
    path: &Path,
    oracle: &dyn PrioritizationOracle,
    goal_id: &str,
) -> Result<Vec<PrioritizationResult>, AppError> {
    let goal = get_goal_with_path(path, goal_id)?;

    oracle.prioritize(&goal.tasks).map_err(|err| {
        warn!("task prioritization failed for {goal_id}: {err}");
        err
    })
}
