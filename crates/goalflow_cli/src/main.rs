use clap::{CommandFactory, Parser};
use std::io::{self, BufRead};
use std::path::Path;
use tabled::{Table, Tabled};

use goalflow_cli::cli::{Cli, Command, parse_field_override};
use goalflow_core::auth;
use goalflow_core::config;
use goalflow_core::error::AppError;
use goalflow_core::goal_api;
use goalflow_core::matrix;
use goalflow_core::model::{Goal, NewTask, Task};
use goalflow_core::oracle::{self, GoalOracle};
use goalflow_core::planner::TaskField;
use goalflow_core::priority::{self, PrioritizationResult};
use goalflow_core::progress;

#[derive(Tabled)]
struct GoalRow {
    id: String,
    goal: String,
    created: String,
    tasks: usize,
    progress: String,
}

#[derive(Tabled)]
struct TaskRow {
    id: String,
    title: String,
    category: &'static str,
    urgency: String,
    importance: String,
    due: String,
    impact: f64,
    done: &'static str,
}

#[derive(Tabled)]
struct PriorityRow {
    id: String,
    title: String,
    score: f64,
    reason: String,
}

fn goal_row(goal: &Goal) -> GoalRow {
    GoalRow {
        id: goal.id.clone(),
        goal: goal.goal.clone(),
        created: goal.created_at.clone(),
        tasks: goal.tasks.len(),
        progress: format!("{:.0}%", progress::completion_progress(&goal.tasks)),
    }
}

fn task_row(task: &Task) -> TaskRow {
    TaskRow {
        id: task.id.clone(),
        title: task.title.clone(),
        category: matrix::categorize(task).label(),
        urgency: task.urgency.to_string(),
        importance: task.importance.to_string(),
        due: task.due_date.clone(),
        impact: task.impact,
        done: if task.completed { "yes" } else { "no" },
    }
}

fn print_tasks_plain(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("(no tasks)");
        return;
    }
    let rows: Vec<TaskRow> = tasks.iter().map(task_row).collect();
    println!("{}", Table::new(rows));
}

fn task_json(task: &Task) -> serde_json::Value {
    serde_json::json!({
        "id": task.id,
        "title": task.title,
        "urgency": task.urgency,
        "importance": task.importance,
        "due_date": task.due_date,
        "impact": task.impact,
        "completed": task.completed,
        "category": matrix::categorize(task).label(),
    })
}

fn print_task_json(task: &Task) {
    println!("{}", task_json(task));
}

fn print_tasks_json(tasks: &[Task]) {
    let payload: Vec<serde_json::Value> = tasks.iter().map(task_json).collect();
    println!("{}", serde_json::Value::Array(payload));
}

fn print_session(session: &auth::UserSession, action: &str, json: bool) {
    if json {
        println!(
            "{}",
            serde_json::json!({
                "uid": session.uid,
                "email": session.email,
            })
        );
    } else {
        println!("{} as {} ({})", action, session.email, session.uid);
    }
}

fn oracle_from_config() -> Result<Box<dyn GoalOracle>, AppError> {
    let loaded = config::load_config_with_fallback();
    if let Some(err) = loaded.error {
        eprintln!("WARNING: {err}");
    }
    oracle::oracle_from_env(&loaded.config)
}

fn run_command(cli: Cli) -> Result<(), AppError> {
    match cli.command {
        Command::Signup { email, password } => {
            let provider = auth::provider_from_env()?;
            let session = provider.create_account(&email, &password)?;
            let path = auth::session_path()?;
            auth::save_session(&path, &session)?;
            print_session(&session, "Signed up", cli.json);
        }
        Command::Login { email, password } => {
            let provider = auth::provider_from_env()?;
            let session = provider.sign_in(&email, &password)?;
            let path = auth::session_path()?;
            auth::save_session(&path, &session)?;
            print_session(&session, "Signed in", cli.json);
        }
        Command::Logout => {
            let path = auth::session_path()?;
            match auth::current_session(&path)? {
                Some(session) => {
                    if let Ok(provider) = auth::provider_from_env() {
                        provider.sign_out(&session)?;
                    }
                    auth::clear_session(&path)?;
                    if cli.json {
                        println!("{}", serde_json::json!({ "signed_out": true }));
                    } else {
                        println!("Signed out {}", session.email);
                    }
                }
                None => {
                    if cli.json {
                        println!("{}", serde_json::json!({ "signed_out": false }));
                    } else {
                        println!("Not signed in");
                    }
                }
            }
        }
        Command::Whoami => {
            let path = auth::session_path()?;
            match auth::current_session(&path)? {
                Some(session) => print_session(&session, "Signed in", cli.json),
                None => {
                    if cli.json {
                        println!("null");
                    } else {
                        println!("Not signed in");
                    }
                }
            }
        }
        Command::New { goal } => {
            let goal_text = match goal {
                Some(value) if !value.trim().is_empty() => value,
                _ => return Err(AppError::invalid_input("goal is required")),
            };

            let created = goal_api::create_goal(&goal_text)?;
            if cli.json {
                println!(
                    "{}",
                    serde_json::json!({
                        "id": created.id,
                        "goal": created.goal,
                        "created_at": created.created_at,
                    })
                );
            } else {
                println!("Created goal: {} ({})", created.goal, created.id);
            }
        }
        Command::List => {
            let goals = goal_api::list_goals()?;
            if cli.json {
                let payload: Vec<serde_json::Value> = goals
                    .iter()
                    .map(|goal| {
                        serde_json::json!({
                            "id": goal.id,
                            "goal": goal.goal,
                            "created_at": goal.created_at,
                            "tasks": goal.tasks.len(),
                            "progress": progress::completion_progress(&goal.tasks),
                        })
                    })
                    .collect();
                println!("{}", serde_json::Value::Array(payload));
            } else if goals.is_empty() {
                println!("(no goals)");
            } else {
                let rows: Vec<GoalRow> = goals.iter().map(goal_row).collect();
                println!("{}", Table::new(rows));
            }
        }
        Command::Show { goal_id } => {
            let goal = goal_api::get_goal(&goal_id)?;
            if cli.json {
                println!(
                    "{}",
                    serde_json::json!({
                        "id": goal.id,
                        "goal": goal.goal,
                        "created_at": goal.created_at,
                        "progress": progress::completion_progress(&goal.tasks),
                        "tasks": goal.tasks.iter().map(task_json).collect::<Vec<_>>(),
                    })
                );
            } else {
                println!("{} ({})", goal.goal, goal.id);
                println!(
                    "Progress: {:.0}%",
                    progress::completion_progress(&goal.tasks)
                );
                print_tasks_plain(&goal.tasks);
            }
        }
        Command::Decompose { goal_id } => {
            let oracle = oracle_from_config()?;
            let added = goal_api::decompose_goal(oracle.as_ref(), &goal_id)?;
            if cli.json {
                print_tasks_json(&added);
            } else {
                println!("Added {} tasks", added.len());
                print_tasks_plain(&added);
            }
        }
        Command::Add {
            goal_id,
            title,
            urgency,
            importance,
            due_date,
            impact,
        } => {
            let new_task = NewTask {
                title,
                urgency: urgency.parse()?,
                importance: importance.parse()?,
                due_date,
                impact,
            };
            let task = goal_api::add_task(&goal_id, new_task)?;
            if cli.json {
                print_task_json(&task);
            } else {
                println!("Added task: {} ({})", task.title, task.id);
            }
        }
        Command::Edit {
            goal_id,
            task_id,
            set,
        } => {
            if set.is_empty() {
                return Err(AppError::invalid_input(
                    "at least one --set FIELD=VALUE is required",
                ));
            }
            let changes = set
                .iter()
                .map(|raw| parse_field_override(raw))
                .collect::<Result<Vec<(TaskField, String)>, String>>()
                .map_err(AppError::invalid_input)?;

            let task = goal_api::edit_task(&goal_id, &task_id, &changes)?;
            if cli.json {
                print_task_json(&task);
            } else {
                println!("Updated task: {} ({})", task.title, task.id);
            }
        }
        Command::Delete { goal_id, task_id } => {
            let removed = goal_api::delete_task(&goal_id, &task_id)?;
            if cli.json {
                println!("{}", serde_json::json!({ "deleted": removed }));
            } else if removed {
                println!("Deleted task: {task_id}");
            } else {
                println!("No matching task: {task_id}");
            }
        }
        Command::Done { goal_id, task_id } => {
            match goal_api::toggle_task(&goal_id, &task_id)? {
                Some(task) => {
                    if cli.json {
                        print_task_json(&task);
                    } else if task.completed {
                        println!("Completed task: {} ({})", task.title, task.id);
                    } else {
                        println!("Reopened task: {} ({})", task.title, task.id);
                    }
                }
                None => {
                    if cli.json {
                        println!("null");
                    } else {
                        println!("No matching task: {task_id}");
                    }
                }
            }
        }
        Command::Prioritize { goal_id } => {
            let oracle = oracle_from_config()?;
            let goal = goal_api::get_goal(&goal_id)?;
            let scores = goal_api::prioritize_goal(oracle.as_ref(), &goal_id)?;
            let sorted = priority::sort_by_priority(&goal.tasks, &scores);

            if cli.json {
                let payload: Vec<serde_json::Value> = sorted
                    .iter()
                    .map(|task| {
                        let mut value = task_json(task);
                        value["priorityScore"] =
                            serde_json::json!(priority::resolved_score(&task.id, &scores));
                        value["reason"] = serde_json::json!(reason_for(&task.id, &scores));
                        value
                    })
                    .collect();
                println!("{}", serde_json::Value::Array(payload));
            } else if sorted.is_empty() {
                println!("(no tasks)");
            } else {
                let rows: Vec<PriorityRow> = sorted
                    .iter()
                    .map(|task| PriorityRow {
                        id: task.id.clone(),
                        title: task.title.clone(),
                        score: priority::resolved_score(&task.id, &scores),
                        reason: reason_for(&task.id, &scores).to_string(),
                    })
                    .collect();
                println!("{}", Table::new(rows));
            }
        }
        Command::Matrix { goal_id } => {
            let goal = goal_api::get_goal(&goal_id)?;
            let buckets = matrix::partition(&goal.tasks);

            if cli.json {
                let mut payload = serde_json::Map::new();
                for (category, bucket) in buckets.iter() {
                    payload.insert(
                        category.label().to_string(),
                        serde_json::Value::Array(bucket.iter().map(task_json).collect()),
                    );
                }
                println!("{}", serde_json::Value::Object(payload));
            } else {
                for (category, bucket) in buckets.iter() {
                    println!("## {}", category.label());
                    print_tasks_plain(bucket);
                }
            }
        }
        Command::Progress { goal_id } => {
            let goal = goal_api::get_goal(&goal_id)?;
            let value = progress::completion_progress(&goal.tasks);
            if cli.json {
                println!("{}", serde_json::json!({ "progress": value }));
            } else {
                println!("Progress: {value:.0}%");
            }
        }
    }

    Ok(())
}

fn reason_for<'a>(task_id: &str, scores: &'a [PrioritizationResult]) -> &'a str {
    scores
        .iter()
        .find(|score| score.id == task_id)
        .map(|score| score.reason.as_str())
        .unwrap_or("No reason provided.")
}

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

fn split_command_line(line: &str) -> Result<Vec<String>, AppError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escape = false;

    for ch in line.chars() {
        if escape {
            if ch != '"' && ch != '\\' {
                current.push('\\');
            }
            current.push(ch);
            escape = false;
            continue;
        }

        if in_quotes && ch == '\\' {
            escape = true;
            continue;
        }

        if ch == '"' {
            in_quotes = !in_quotes;
            continue;
        }

        if ch.is_whitespace() && !in_quotes {
            if !current.is_empty() {
                args.push(current.clone());
                current.clear();
            }
            continue;
        }

        current.push(ch);
    }

    if in_quotes {
        return Err(AppError::invalid_input("unterminated quote in command"));
    }

    if !current.is_empty() {
        args.push(current);
    }

    Ok(args)
}

fn print_help() {
    let mut cmd = Cli::command();
    let help = cmd.render_help();
    println!("{help}");
}

fn run_interactive() -> Result<(), AppError> {
    let mut input = String::new();
    let stdin = io::stdin();
    let mut stdin_lock = stdin.lock();

    loop {
        input.clear();
        let bytes = stdin_lock
            .read_line(&mut input)
            .map_err(|err| AppError::io(err.to_string()))?;

        if bytes == 0 {
            break;
        }

        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        if line == "help" || line == "?" {
            print_help();
            continue;
        }

        let args = match split_command_line(line) {
            Ok(args) => args,
            Err(err) => {
                eprintln!("ERROR: {}", err);
                continue;
            }
        };

        if args.is_empty() {
            continue;
        }

        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push("goalflow".to_string());
        argv.extend(args);

        let cli = match Cli::try_parse_from(argv) {
            Ok(cli) => cli,
            Err(err) => {
                eprintln!("ERROR: {}", normalize_parse_error(err));
                continue;
            }
        };

        if let Err(err) = run_command(cli) {
            eprintln!("ERROR: {}", err);
        }
    }

    Ok(())
}

fn init_logging_from_env() {
    if let Ok(dir) = std::env::var("GOALFLOW_LOG_DIR")
        && !dir.trim().is_empty()
    {
        let level = std::env::var("GOALFLOW_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        if let Err(err) = goalflow_core::logging::init_logging(&level, Path::new(&dir)) {
            eprintln!("WARNING: {err}");
        }
    }
}

fn main() {
    init_logging_from_env();

    let mut args = std::env::args_os();
    args.next();
    if args.next().is_none() {
        if let Err(err) = run_interactive() {
            eprintln!("ERROR: {}", err);
            std::process::exit(1);
        }
        return;
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    if let Err(err) = run_command(cli) {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}
