pub mod health;
pub mod tasks;
pub mod users;

use actix_web::{error::JsonPayloadError, web, HttpRequest};

use crate::error::AppError;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(health::health)
        .service(
            web::scope("/users")
                .app_data(path_config("User not found"))
                .service(users::register)
                .service(users::login)
                .service(users::update_profile)
                // `/me` must be registered ahead of `/{id}`
                .service(users::me)
                .service(users::get_user),
        )
        .service(
            web::scope("/tasks")
                .app_data(path_config("Task not found"))
                .service(tasks::list_tasks)
                .service(tasks::create_task)
                .service(tasks::update_task_status)
                .service(tasks::get_task)
                .service(tasks::update_task)
                .service(tasks::delete_task),
        );
}

/// Turns body parse failures into `400 { "error": ... }`.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error)
}

/// Path segments that do not parse (e.g. a task id that is not a UUID) answer `404`
/// with the same message the scope gives for a well-formed id that matches nothing.
fn path_config(not_found: &'static str) -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(move |_, _| AppError::NotFound(not_found.into()).into())
}

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(format!("Invalid request body: {}", err)).into()
}
