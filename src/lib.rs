pub mod catalog;
pub mod config;
pub mod connector;
pub mod loader;
pub mod parser;
pub mod serialize;
