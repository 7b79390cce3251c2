pub mod app;
pub mod archive;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod error;
pub mod indexer;
pub mod output;
