pub mod config;
pub mod network;
pub mod parser;
pub mod storage;
