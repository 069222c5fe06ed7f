//! 外部服务接入

pub mod push;

pub use push::{BarkGateway, LogGateway, PushAlert, PushGateway};
