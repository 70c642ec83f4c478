pub mod ai;
pub mod api;
pub mod auth;
pub mod cli;
pub mod core;
pub mod kv;
pub mod openai;
pub mod triage;
