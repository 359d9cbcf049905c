pub mod application;
pub mod core;
pub mod infrastructure;
pub mod interfaces;
