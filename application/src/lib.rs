pub mod service;
pub mod transfer;
