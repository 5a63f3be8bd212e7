//! facewatch: command-line client and monitoring dashboard for a
//! face-comparison backend.

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod session;
pub mod utils;
pub mod web;
