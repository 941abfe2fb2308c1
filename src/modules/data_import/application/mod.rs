pub mod orchestrator;
pub mod service;
