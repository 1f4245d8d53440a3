//! linebot core library: config, LINE platform client, and the callback gateway
//! used by the `linebot-echo` binary.

pub mod config;
pub mod gateway;
pub mod init;
pub mod line;
