// Public API - what other modules can use
pub use handlers::{clear_items, list_items, publish_item};
pub use sweep_task::{start_sweep_task, SweepConfig};

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
pub mod service;
mod sweep_task;
pub mod types;
