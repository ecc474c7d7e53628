//! sea-orm entity models for the `tasks` and `goals` tables.

pub mod prelude;

pub mod goal;
pub mod task;
