pub mod cli;
pub mod db;
pub mod engine;
pub mod error;
pub mod models;
pub mod notify;
pub mod output;
pub mod snapshot;
