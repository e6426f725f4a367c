//! HTTP route handlers.

mod contents;
mod generate;
mod health;

pub use contents::{
    delete_content_handler, get_content_handler, list_contents_handler, update_content_handler,
};
pub use generate::{generate_handler, regenerate_post_handler, task_status_handler};
pub use health::health_handler;
