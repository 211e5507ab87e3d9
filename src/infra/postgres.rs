pub mod activity_repo;
pub mod health_repo;
pub mod idea_repo;
pub mod notifier;
pub mod source;
