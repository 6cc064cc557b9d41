//! ユーティリティモジュール

pub mod config;
pub mod log_trace;
