pub mod error;
pub mod lifecycle;
pub mod ports;
pub mod repo;
pub mod service;
