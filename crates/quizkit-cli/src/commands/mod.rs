pub mod init;
pub mod list_sources;
pub mod run;
pub mod validate;
