pub mod error;
pub mod event;
pub mod feed;
pub mod format;
pub mod health;
pub mod history;
pub mod id;
pub mod idea;
pub mod source;
pub mod stage;
