//! Command implementations that touch the filesystem outside the store.

pub mod init;
