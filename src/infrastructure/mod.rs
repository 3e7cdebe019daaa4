// 基础设施：令牌签发校验、进程级连接注册表

pub mod auth;
pub mod registry;

pub use auth::{Claims, Clock, SystemClock, TokenAuthority};
pub use registry::Registry;
