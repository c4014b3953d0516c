//! Process-level infrastructure shared by the binary and the web layer:
//! command line / environment configuration and logger set-up.

pub mod config;
pub mod logging;
