use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::model::{NewTask, Task};
use crate::priority::PrioritizationResult;

use super::{DecompositionOracle, DecompositionResponse, PrioritizationOracle, TaskPayload};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";

pub struct GeminiOracle {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiOracle {
    pub fn new(api_key: String, model: Option<String>) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn generate_structured_json(
        &self,
        prompt: &str,
        schema: serde_json::Value,
    ) -> Result<String, AppError> {
        let request = GenerateRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_json_schema: schema,
            },
        };

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .map_err(|err| {
                AppError::oracle_unavailable(format!("gemini request failed: {err}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            return Err(AppError::oracle_unavailable(format!(
                "gemini request failed: {status} {body}"
            )));
        }

        let body = response.text().map_err(|err| {
            AppError::oracle_unavailable(format!("gemini response unreadable: {err}"))
        })?;
        extract_response_text(&body)
    }
}

impl DecompositionOracle for GeminiOracle {
    fn decompose(&self, goal: &str) -> Result<Vec<NewTask>, AppError> {
        let text =
            self.generate_structured_json(&decomposition_prompt(goal), decomposition_schema())?;
        parse_decomposition(&text)
    }
}

impl PrioritizationOracle for GeminiOracle {
    fn prioritize(&self, tasks: &[Task]) -> Result<Vec<PrioritizationResult>, AppError> {
        let payloads: Vec<TaskPayload> = tasks.iter().map(TaskPayload::from_task).collect();
        let text = self
            .generate_structured_json(&prioritization_prompt(&payloads), prioritization_schema())?;
        parse_prioritization(&text)
    }
}

fn decomposition_prompt(goal: &str) -> String {
    format!(
        "You are an AI assistant designed to decompose complex goals into actionable tasks. \
         You will structure and prioritize tasks based on the SMART criteria (Specific, \
         Measurable, Achievable, Relevant, Time-bound), Eisenhower Matrix (urgency vs. \
         importance), and Pareto Principle (80/20 rule). Rate urgency and importance as \
         High, Medium or Low, give each task a due date (YYYY-MM-DD) and an impact score \
         (1-10). Make sure to output the tasks in a JSON format.\n\nGoal: {goal}\n"
    )
}

fn prioritization_prompt(tasks: &[TaskPayload]) -> String {
    let mut prompt = String::from(
        "You are an AI assistant that prioritizes tasks based on urgency, importance, \
         impact and due date.\n\nAnalyze the following tasks and assign a priority score \
         to each, explaining your reasoning. The priority score should be a number between \
         0 and 100.\n\nTasks:\n",
    );
    for task in tasks {
        prompt.push_str(&format!(
            "- ID: {}, Title: {}, Urgency: {}, Importance: {}, Due Date: {}, Impact: {}\n",
            task.id, task.title, task.urgency, task.importance, task.due_date, task.impact
        ));
    }
    prompt.push_str("\nReturn a JSON array of tasks with their priority scores and reasoning.\n");
    prompt
}

fn decomposition_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "tasks": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "title": { "type": "string" },
                        "urgency": { "type": "string", "enum": ["High", "Medium", "Low"] },
                        "importance": { "type": "string", "enum": ["High", "Medium", "Low"] },
                        "dueDate": { "type": "string" },
                        "impact": { "type": "number" }
                    },
                    "required": ["title", "urgency", "importance", "dueDate", "impact"]
                }
            }
        },
        "required": ["tasks"]
    })
}

fn prioritization_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "array",
        "items": {
            "type": "object",
            "properties": {
                "id": { "type": "string" },
                "priorityScore": { "type": "number" },
                "reason": { "type": "string" }
            },
            "required": ["id", "priorityScore", "reason"]
        }
    })
}

fn extract_response_text(body: &str) -> Result<String, AppError> {
    let response: GenerateResponse = serde_json::from_str(body)
        .map_err(|err| AppError::oracle_unavailable(format!("gemini response invalid: {err}")))?;

    let mut output = String::new();
    if let Some(candidate) = response.candidates.and_then(|mut list| list.pop()) {
        if let Some(content) = candidate.content {
            for part in content.parts {
                if let Some(text) = part.text {
                    output.push_str(&text);
                }
            }
        }
    }

    if output.trim().is_empty() {
        return Err(AppError::oracle_unavailable("gemini response missing text"));
    }

    Ok(output)
}

fn parse_decomposition(text: &str) -> Result<Vec<NewTask>, AppError> {
    let response: DecompositionResponse = serde_json::from_str(text).map_err(|err| {
        AppError::oracle_unavailable(format!("gemini decomposition payload invalid: {err}"))
    })?;
    Ok(response.tasks)
}

fn parse_prioritization(text: &str) -> Result<Vec<PrioritizationResult>, AppError> {
    serde_json::from_str(text).map_err(|err| {
        AppError::oracle_unavailable(format!("gemini prioritization payload invalid: {err}"))
    })
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
    #[serde(rename = "responseJsonSchema")]
    response_json_schema: serde_json::Value,
}

#[derive(Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Deserialize)]
struct ResponseContent {
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}
