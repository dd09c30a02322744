pub mod callgraph;
pub mod chain;
pub mod class;
pub mod config;
pub mod database;
pub mod inheritance;
pub mod method;
