use diesel_migrations::{EmbeddedMigrations, embed_migrations};

pub mod admin;
pub mod auth;
pub mod config;
pub mod evaluations;
pub mod flash;
pub mod instructors;
pub mod questions;
pub mod schema;
pub mod settings;
pub mod state;
pub mod store;
pub mod students;
pub mod teachers;
pub mod template;
pub mod util_resp;
pub mod validation;
pub mod widgets;

#[cfg(test)]
mod test;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");
