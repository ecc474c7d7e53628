pub use sea_orm_migration::prelude::*;

mod m20251018_000001_create_tasks_and_goals_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(
            m20251018_000001_create_tasks_and_goals_tables::Migration,
        )]
    }
}
