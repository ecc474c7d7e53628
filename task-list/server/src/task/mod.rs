use crate::entities::task;
use crate::resource::{self, ResourceError};
use chrono::{DateTime, NaiveDateTime, Utc};
use sea_orm::*;

pub mod api;

#[derive(Debug, PartialEq, Clone, Eq)]
pub struct Task {
    id: i32,
    title: String,
    description: String,
    completed_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn new(
        id: i32,
        title: String,
        description: String,
        completed_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            title,
            description,
            completed_at,
        }
    }

    /// Returns the ID of the task.
    pub fn id(&self) -> i32 {
        self.id
    }

    /// Returns the title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns when the task was completed, if it is complete.
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// A task is complete exactly when it carries a completion timestamp.
    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }
}

impl From<task::Model> for Task {
    fn from(model: task::Model) -> Self {
        Task::new(model.id, model.title, model.description, model.completed_at)
    }
}

/// Fields required to create a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Fields replaced by an update. Completion is left alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskChanges {
    pub title: String,
    pub description: String,
}

/// Direction of a completion toggle, taken from the last path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionAction {
    MarkComplete,
    MarkIncomplete,
}

impl CompletionAction {
    /// `mark_complete` completes the task; any other segment clears completion.
    pub fn from_path_segment(segment: &str) -> Self {
        if segment == "mark_complete" {
            CompletionAction::MarkComplete
        } else {
            CompletionAction::MarkIncomplete
        }
    }
}

/// Title ordering for task listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    /// Reads the `sort` query value. Unknown values mean no ordering was asked for.
    pub fn from_query(value: Option<&str>) -> Option<Self> {
        match value {
            Some("asc") => Some(SortOrder::Ascending),
            Some("desc") => Some(SortOrder::Descending),
            _ => None,
        }
    }
}

/// Parses a client supplied completion timestamp.
///
/// Accepts RFC 3339, RFC 2822 (the HTTP date format) and naive
/// `YYYY-MM-DD[T ]HH:MM:SS[.fff]` values, the latter read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.with_timezone(&Utc));
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc2822(raw) {
        return Some(timestamp.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}

/// Message posted to the notification channel when a task is completed.
pub fn completion_message(task: &Task) -> String {
    format!("Someone just completed the task {}", task.title())
}

pub struct TaskService<'a> {
    db: &'a sea_orm::DatabaseConnection,
}

impl TaskService<'_> {
    pub fn new(db: &sea_orm::DatabaseConnection) -> TaskService<'_> {
        TaskService { db }
    }

    /// Creates a new task in the database.
    ///
    /// # Returns
    ///
    /// A `Result` containing the created `Task` with its store-assigned ID.
    #[tracing::instrument(skip(self))]
    pub async fn create_task(&self, new_task: NewTask) -> Result<Task, ResourceError> {
        let active_model = task::ActiveModel {
            title: ActiveValue::Set(new_task.title),
            description: ActiveValue::Set(new_task.description),
            completed_at: ActiveValue::Set(new_task.completed_at),
            ..Default::default()
        };
        let created_model = active_model.insert(self.db).await?;
        Ok(Task::from(created_model))
    }

    /// Retrieves all tasks, ordered by title when `sort` is given and by
    /// creation otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn get_all_tasks(&self, sort: Option<SortOrder>) -> Result<Vec<Task>, ResourceError> {
        let query = match sort {
            Some(SortOrder::Ascending) => task::Entity::find().order_by_asc(task::Column::Title),
            Some(SortOrder::Descending) => task::Entity::find().order_by_desc(task::Column::Title),
            None => task::Entity::find(),
        };
        let tasks = query
            .order_by_asc(task::Column::Id)
            .all(self.db)
            .await?
            .into_iter()
            .map(Task::from)
            .collect();
        Ok(tasks)
    }

    /// Resolves a raw path identifier into the stored task row.
    #[tracing::instrument(skip(self))]
    pub async fn find_task(&self, task_id: &str) -> Result<task::Model, ResourceError> {
        resource::resolve::<task::Entity>(self.db, task_id).await
    }

    /// Retrieves a task by its raw path identifier.
    #[tracing::instrument(skip(self))]
    pub async fn get_task(&self, task_id: &str) -> Result<Task, ResourceError> {
        self.find_task(task_id).await.map(Task::from)
    }

    /// Replaces the title and description of a resolved task.
    #[tracing::instrument(skip(self))]
    pub async fn update_task(
        &self,
        task_to_update: task::Model,
        changes: TaskChanges,
    ) -> Result<Task, ResourceError> {
        let mut active_model: task::ActiveModel = task_to_update.into();
        active_model.title = ActiveValue::Set(changes.title);
        active_model.description = ActiveValue::Set(changes.description);
        let updated_model = active_model.update(self.db).await?;
        Ok(Task::from(updated_model))
    }

    /// Sets or clears the completion timestamp of a resolved task.
    #[tracing::instrument(skip(self))]
    pub async fn set_completion(
        &self,
        task_to_update: task::Model,
        action: CompletionAction,
    ) -> Result<Task, ResourceError> {
        let completed_at = match action {
            CompletionAction::MarkComplete => Some(Utc::now()),
            CompletionAction::MarkIncomplete => None,
        };
        let mut active_model: task::ActiveModel = task_to_update.into();
        active_model.completed_at = ActiveValue::Set(completed_at);
        let updated_model = active_model.update(self.db).await?;
        Ok(Task::from(updated_model))
    }

    /// Deletes a resolved task.
    ///
    /// # Returns
    ///
    /// A `Result` containing the deleted `Task`.
    #[tracing::instrument(skip(self))]
    pub async fn delete_task(&self, task_to_delete: task::Model) -> Result<Task, ResourceError> {
        let task_id = task_to_delete.id;
        let deleted = Task::from(task_to_delete);
        task::Entity::delete_by_id(task_id).exec(self.db).await?;
        Ok(deleted)
    }
}
