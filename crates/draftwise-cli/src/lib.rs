// Library root: re-exports all modules so integration tests can drive the
// app loop without a terminal.

pub mod app;
pub mod config;
pub mod db;
pub mod input;
pub mod protocol;
pub mod render;
