pub mod ai;
pub mod analytics;
pub mod app;
pub mod config;
pub mod controllers;
pub mod domain;
pub mod download;
pub mod error;
pub mod query_log;
pub mod session;
