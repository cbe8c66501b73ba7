use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use uuid::Uuid;

use crate::error::AppError;
use crate::model::Goal;

pub const SCHEMA_VERSION: u32 = 1;
const STORE_FILE_NAME: &str = "goals.json";

#[derive(Debug, Serialize, Deserialize)]
struct StoredGoals {
    schema_version: u32,
    goals: Vec<Goal>,
}

pub fn store_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var("GOALFLOW_STORE_PATH")
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata)
            .join("goalflow")
            .join(STORE_FILE_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("goalflow")
            .join(STORE_FILE_NAME))
    }
}

pub fn load_goals(path: &Path) -> Result<Vec<Goal>, AppError> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = std::fs::read_to_string(path).map_err(|err| AppError::io(err.to_string()))?;
    let stored: StoredGoals =
        serde_json::from_str(&content).map_err(|err| AppError::invalid_data(err.to_string()))?;

    if !(1..=SCHEMA_VERSION).contains(&stored.schema_version) {
        return Err(AppError::invalid_data("schema_version mismatch"));
    }

    for (index, goal) in stored.goals.iter().enumerate() {
        let duplicate = stored.goals[..index].iter().any(|other| other.id == goal.id);
        if duplicate {
            return Err(AppError::invalid_data(format!(
                "duplicate goal id '{}'",
                goal.id
            )));
        }
    }

    Ok(stored.goals)
}

pub fn save_goals(path: &Path, goals: &[Goal]) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|err| AppError::store_write(err.to_string()))?;
    }

    let stored = StoredGoals {
        schema_version: SCHEMA_VERSION,
        goals: goals.to_vec(),
    };
    let content = serde_json::to_string_pretty(&stored)
        .map_err(|err| AppError::invalid_data(err.to_string()))?;
    std::fs::write(path, content).map_err(|err| AppError::store_write(err.to_string()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(path, permissions)
            .map_err(|err| AppError::store_write(err.to_string()))?;
    }

    Ok(())
}

pub fn create_goal(path: &Path, goal_text: &str) -> Result<Goal, AppError> {
    let created_at = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|err| AppError::invalid_data(err.to_string()))?;

    let goal = Goal {
        id: format!("goal-{}", Uuid::new_v4()),
        goal: goal_text.to_string(),
        created_at,
        tasks: Vec::new(),
    };

    let mut goals = load_goals(path)?;
    goals.push(goal.clone());
    save_goals(path, &goals)?;

    Ok(goal)
}

pub fn replace_goal(path: &Path, updated: &Goal) -> Result<(), AppError> {
    let mut goals = load_goals(path)?;
    let Some(target) = goals.iter_mut().find(|goal| goal.id == updated.id) else {
        return Err(AppError::invalid_input("goal not found"));
    };
    *target = updated.clone();
    save_goals(path, &goals)
}
