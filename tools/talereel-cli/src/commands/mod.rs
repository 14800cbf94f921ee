pub mod check;
pub mod config;
pub mod extract;
pub mod images;
pub mod init;
pub mod prompts;
pub mod render;
pub mod run;
pub mod scenes;
pub mod status;
pub mod transcribe;
