// Main library entry point for ThrowTrace.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;
