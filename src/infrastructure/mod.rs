pub mod cookies;
pub mod notification;
pub mod payload;
pub mod repository;
pub mod status;
