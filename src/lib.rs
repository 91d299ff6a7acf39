pub mod cli;
pub mod config;
pub mod decoder;
pub mod entry;
pub mod error;
pub mod review;
pub mod storage;
pub mod store;
pub mod template;
