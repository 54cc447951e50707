// Config Domain Layer
//
// 领域层定义配置的核心业务逻辑和规则

pub mod entities;
pub mod environment;

pub use entities::*;
pub use environment::*;
