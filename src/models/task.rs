use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[serde(alias = "moderate")]
    Medium,
    High,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(TaskPriority::Low),
            "medium" | "moderate" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            other => Err(format!("unknown task priority: {}", other)),
        }
    }
}

/// One line of a task's checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
    pub text: String,
    #[serde(default)]
    pub is_checked: bool,
}

/// Body of `POST /tasks` and `PUT /tasks/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TaskInput {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    pub priority: TaskPriority,

    #[serde(default)]
    #[validate(custom = "validate_checklist")]
    pub checklist: Vec<ChecklistItem>,

    #[serde(default, deserialize_with = "deserialize_due_date")]
    pub due_date: Option<DateTime<Utc>>,
}

/// Body of `PUT /tasks/{id}/status`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StatusInput {
    #[validate(length(min = 1, max = 50))]
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub priority: TaskPriority,
    pub checklist: Vec<ChecklistItem>,
    pub due_date: Option<DateTime<Utc>>,
    pub status: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    pub fn new(input: TaskInput, owner: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: input.title,
            priority: input.priority,
            checklist: input.checklist,
            due_date: input.due_date,
            status: None,
            created_by: owner,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrites the editable fields. `status` and ownership are left alone.
    pub fn apply(&mut self, input: &TaskInput) {
        self.title = input.title.clone();
        self.priority = input.priority;
        self.checklist = input.checklist.clone();
        self.due_date = input.due_date;
        self.updated_at = Utc::now();
    }
}

fn validate_checklist(items: &[ChecklistItem]) -> Result<(), ValidationError> {
    if items.iter().any(|item| item.text.trim().is_empty()) {
        return Err(ValidationError::new("checklist_item_empty"));
    }
    if items.iter().any(|item| item.text.chars().count() > 500) {
        return Err(ValidationError::new("checklist_item_too_long"));
    }
    Ok(())
}

/// Accepts either an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC).
pub fn parse_due_date(raw: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Ok(timestamp.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| format!("invalid due date: {}", raw))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| format!("invalid due date: {}", raw))?;
    Ok(Utc.from_utc_datetime(&midnight))
}

fn deserialize_due_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    raw.map(|value| parse_due_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    fn input(title: &str) -> TaskInput {
        TaskInput {
            title: title.to_string(),
            priority: TaskPriority::High,
            checklist: vec![],
            due_date: None,
        }
    }

    #[test]
    fn test_task_creation() {
        let owner = Uuid::new_v4();
        let task = Task::new(input("Test Task"), owner);

        assert_eq!(task.title, "Test Task");
        assert_eq!(task.created_by, owner);
        assert!(task.status.is_none());
        assert_eq!(task.created_at, task.updated_at);
    }

    #[test]
    fn test_apply_keeps_status_and_owner() {
        let owner = Uuid::new_v4();
        let mut task = Task::new(input("Before"), owner);
        task.status = Some("in progress".into());

        let mut update = input("After");
        update.priority = TaskPriority::Low;
        task.apply(&update);

        assert_eq!(task.title, "After");
        assert_eq!(task.priority, TaskPriority::Low);
        assert_eq!(task.status.as_deref(), Some("in progress"));
        assert_eq!(task.created_by, owner);
    }

    #[test]
    fn test_task_input_validation() {
        assert!(input("Valid Task").validate().is_ok());
        assert!(input("").validate().is_err());
        assert!(input(&"a".repeat(201)).validate().is_err());

        let mut blank_item = input("With checklist");
        blank_item.checklist = vec![ChecklistItem {
            text: "  ".into(),
            is_checked: false,
        }];
        assert!(blank_item.validate().is_err());
    }

    #[test]
    fn test_task_input_from_camel_case_json() {
        let parsed: TaskInput = serde_json::from_value(json!({
            "title": "T1",
            "priority": "moderate",
            "checklist": [{ "text": "step one" }, { "text": "step two", "isChecked": true }],
            "dueDate": "2025-01-01"
        }))
        .unwrap();

        assert_eq!(parsed.priority, TaskPriority::Medium);
        assert_eq!(parsed.checklist.len(), 2);
        assert!(!parsed.checklist[0].is_checked);
        assert!(parsed.checklist[1].is_checked);
        let due = parsed.due_date.unwrap();
        assert_eq!((due.year(), due.month(), due.day(), due.hour()), (2025, 1, 1, 0));
    }

    #[test]
    fn test_due_date_formats() {
        let due = parse_due_date("2025-03-04T10:30:00+02:00").unwrap();
        assert_eq!(due.hour(), 8);
        assert!(parse_due_date("next tuesday").is_err());
    }

    #[test]
    fn test_unknown_priority_is_rejected() {
        let parsed = serde_json::from_value::<TaskInput>(json!({
            "title": "T1",
            "priority": "urgent"
        }));
        assert!(parsed.is_err());
        assert!("urgent".parse::<TaskPriority>().is_err());
        assert_eq!("high".parse::<TaskPriority>(), Ok(TaskPriority::High));
    }
}
