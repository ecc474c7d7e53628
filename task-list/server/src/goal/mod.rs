use crate::entities::goal;
use crate::resource::{self, ResourceError};
use sea_orm::*;

pub mod api;

#[derive(Debug, PartialEq, Clone, Eq, Hash)]
pub struct Goal {
    id: i32,
    title: String,
}

impl Goal {
    pub fn new(id: i32, title: String) -> Self {
        Self { id, title }
    }

    /// Returns the ID of the goal.
    pub fn id(&self) -> i32 {
        self.id
    }

    /// Returns the title.
    pub fn title(&self) -> &str {
        &self.title
    }
}

impl From<goal::Model> for Goal {
    fn from(model: goal::Model) -> Self {
        Goal::new(model.goal_id, model.title)
    }
}

pub struct GoalService<'a> {
    db: &'a sea_orm::DatabaseConnection,
}

impl GoalService<'_> {
    pub fn new(db: &sea_orm::DatabaseConnection) -> GoalService<'_> {
        GoalService { db }
    }

    /// Creates a new goal in the database.
    /// # Arguments
    ///
    /// * `title` - The title of the goal.
    ///
    /// # Returns
    ///
    /// A `Result` containing the created `Goal` if successful, or an error otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn create_goal(&self, title: String) -> Result<Goal, ResourceError> {
        let active_model = goal::ActiveModel {
            title: ActiveValue::Set(title),
            ..Default::default()
        };
        let created_model = active_model.insert(self.db).await?;
        Ok(Goal::from(created_model))
    }

    /// Retrieves all goals in creation order.
    #[tracing::instrument(skip(self))]
    pub async fn get_all_goals(&self) -> Result<Vec<Goal>, ResourceError> {
        let goals = goal::Entity::find()
            .order_by_asc(goal::Column::GoalId)
            .all(self.db)
            .await?
            .into_iter()
            .map(Goal::from)
            .collect();
        Ok(goals)
    }

    /// Resolves a raw path identifier into the stored goal row.
    #[tracing::instrument(skip(self))]
    pub async fn find_goal(&self, goal_id: &str) -> Result<goal::Model, ResourceError> {
        resource::resolve::<goal::Entity>(self.db, goal_id).await
    }

    /// Retrieves a goal by its raw path identifier.
    #[tracing::instrument(skip(self))]
    pub async fn get_goal(&self, goal_id: &str) -> Result<Goal, ResourceError> {
        self.find_goal(goal_id).await.map(Goal::from)
    }

    /// Edits the title of a resolved goal.
    ///
    /// # Arguments
    ///
    /// * `goal_to_update` - The stored goal row.
    /// * `new_title` - The new title for the goal.
    #[tracing::instrument(skip(self))]
    pub async fn update_goal(
        &self,
        goal_to_update: goal::Model,
        new_title: String,
    ) -> Result<Goal, ResourceError> {
        let mut active_model: goal::ActiveModel = goal_to_update.into();
        active_model.title = ActiveValue::Set(new_title);
        let updated_model = active_model.update(self.db).await?;
        Ok(Goal::from(updated_model))
    }

    /// Deletes a resolved goal.
    ///
    /// # Returns
    ///
    /// A `Result` containing the deleted `Goal`.
    #[tracing::instrument(skip(self))]
    pub async fn delete_goal(&self, goal_to_delete: goal::Model) -> Result<Goal, ResourceError> {
        let goal_id = goal_to_delete.goal_id;
        let deleted = Goal::from(goal_to_delete);
        goal::Entity::delete_by_id(goal_id).exec(self.db).await?;
        Ok(deleted)
    }
}
