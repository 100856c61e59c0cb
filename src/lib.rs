pub mod adaptive;
pub mod config;
pub mod constants;
pub mod logging;
pub mod puzzle;
