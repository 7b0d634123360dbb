pub mod guard;
pub mod password;
pub mod service;
pub mod token;
