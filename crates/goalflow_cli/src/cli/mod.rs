use clap::{Parser, Subcommand};
use goalflow_core::planner::TaskField;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an account
    ///
    /// Example: goalflow signup user@example.com secret1
    Signup {
        email: String,
        password: String,
    },
    /// Sign in to an existing account
    ///
    /// Example: goalflow login user@example.com secret1
    Login {
        email: String,
        password: String,
    },
    /// Sign out and clear the local session
    ///
    /// Example: goalflow logout
    Logout,
    /// Show the signed-in user
    ///
    /// Example: goalflow whoami
    Whoami,
    /// Create a new goal
    ///
    /// Example: goalflow new "Run a marathon"
    New {
        goal: Option<String>,
    },
    /// List goals, newest first
    ///
    /// Example: goalflow list
    List,
    /// Show a goal with its tasks and progress
    ///
    /// Example: goalflow show goal-1
    Show {
        goal_id: String,
    },
    /// Decompose a goal into tasks via the AI oracle
    ///
    /// Example: goalflow decompose goal-1
    Decompose {
        goal_id: String,
    },
    /// Add a task to a goal
    ///
    /// Example: goalflow add goal-1 "Buy shoes" --due 2026-09-01 --urgency High
    Add {
        goal_id: String,
        title: String,
        #[arg(long, default_value = "Medium")]
        urgency: String,
        #[arg(long, default_value = "Medium")]
        importance: String,
        #[arg(long = "due")]
        due_date: String,
        #[arg(long, default_value_t = 5.0)]
        impact: f64,
    },
    /// Edit task fields
    ///
    /// Example: goalflow edit goal-1 task-1 --set title="New title" --set urgency=High
    Edit {
        goal_id: String,
        task_id: String,
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        set: Vec<String>,
    },
    /// Delete a task
    ///
    /// Example: goalflow delete goal-1 task-1
    Delete {
        goal_id: String,
        task_id: String,
    },
    /// Toggle a task's completion
    ///
    /// Example: goalflow done goal-1 task-1
    Done {
        goal_id: String,
        task_id: String,
    },
    /// Score tasks via the AI oracle and show them in priority order
    ///
    /// Example: goalflow prioritize goal-1
    Prioritize {
        goal_id: String,
    },
    /// Show the Eisenhower matrix for a goal
    ///
    /// Example: goalflow matrix goal-1
    Matrix {
        goal_id: String,
    },
    /// Show completion progress for a goal
    ///
    /// Example: goalflow progress goal-1
    Progress {
        goal_id: String,
    },
}

/// Parse a raw `FIELD=VALUE` override string into a task field change.
pub fn parse_field_override(raw: &str) -> Result<(TaskField, String), String> {
    let trimmed = raw.trim();
    let (field_raw, value_raw) = trimmed
        .split_once('=')
        .ok_or_else(|| "override must be in FIELD=VALUE format".to_string())?;

    let field = field_raw
        .trim()
        .parse::<TaskField>()
        .map_err(|err| err.message().to_string())?;

    Ok((field, value_raw.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::parse_field_override;
    use goalflow_core::planner::TaskField;

    #[test]
    fn parse_field_override_accepts_known_fields() {
        let (field, value) = parse_field_override(" Title = Buy organic milk ").unwrap();
        assert_eq!(field, TaskField::Title);
        assert_eq!(value, "Buy organic milk");

        let (field, _) = parse_field_override("due=2026-09-01").unwrap();
        assert_eq!(field, TaskField::DueDate);
    }

    #[test]
    fn parse_field_override_rejects_unknown_fields() {
        let err = parse_field_override("color=red").unwrap_err();
        assert!(err.contains("unknown task field"));
    }

    #[test]
    fn parse_field_override_rejects_missing_equals() {
        let err = parse_field_override("title").unwrap_err();
        assert!(err.contains("FIELD=VALUE"));
    }
}
