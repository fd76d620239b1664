pub mod app;
pub mod cli;
pub mod config;
pub mod models;
pub mod paths;
pub mod provider;
pub mod settings;
