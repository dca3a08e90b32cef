//! Bat-Q - canned Batfish network analysis questions from the command line.
//!
//! This library exposes the core modules for use by the binary and in
//! integration tests.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod pages;
pub mod present;
pub mod probe;
pub mod render;
pub mod selection;
pub mod session;
