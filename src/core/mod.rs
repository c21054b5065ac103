pub mod config;
pub mod coordinator;
pub mod error;
pub mod feed;
pub mod mock;
pub mod model;
pub mod simulator;
