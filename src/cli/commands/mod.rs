pub mod analyze;
pub mod info;
pub mod init;
