#![doc = "The `taskboard` library crate."]
#![doc = ""]
#![doc = "A task-management REST backend: account registration and login with bcrypt"]
#![doc = "password hashing and JWT bearer tokens, plus CRUD on tasks owned by the caller."]
#![doc = "The binary (`main.rs`) wires these modules into an actix-web server."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;

pub use error::AppError;
pub use state::AppState;
