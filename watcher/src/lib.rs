//! deploywatch library
//!
//! Follows a dashboard deployment: polls its log endpoint on a fixed
//! cadence, renders the log and final status, and stops once the
//! deployment has finished.

pub mod app;
pub mod errors;
pub mod filesys;
pub mod http;
pub mod logs;
pub mod models;
pub mod storage;
pub mod utils;
pub mod view;
pub mod workers;
