pub mod agent;
pub mod completions;
pub mod config;
pub mod create;
pub mod infer;
pub mod lookup;
