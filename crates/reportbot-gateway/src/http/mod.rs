pub mod activity;
pub mod generate;
pub mod health;
pub mod schedules;
pub mod templates;
