//! Command implementations

pub mod export;
pub mod init;
pub mod notify;
pub mod validate;
