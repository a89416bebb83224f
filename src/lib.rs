//! Boefje task adapter: fetch a task descriptor, run an external scanner
//! against its target and relay the scanner output to the task API.

pub mod cli;
pub mod config;
pub mod errors;
pub mod runner;
pub mod scanner;
pub mod task;
