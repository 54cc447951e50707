// Config Ports Layer
//
// 端口层定义配置模块与外部的接口

mod config_repository;

pub use config_repository::*;
