pub mod cli;
pub mod config;
pub mod doctor;
pub mod engine;
pub mod error;
pub mod language;
pub mod logger;
pub mod models;
pub mod service;
