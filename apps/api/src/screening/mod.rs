pub mod assistant;
pub mod batch;
pub mod extraction;
pub mod handlers;
pub mod profile;
pub mod prompts;
