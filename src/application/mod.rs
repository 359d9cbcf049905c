pub mod config;
pub mod dispatcher;
pub mod heartbeat;
