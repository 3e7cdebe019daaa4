use serde::{Deserialize, Serialize};

/// 接口统一返回包装，`code == 0` 表示成功
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResult<T: Serialize> {
    pub code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<T>,
}

impl<T: Serialize> ApiResult<T> {
    pub fn success(content: T) -> Self {
        Self {
            code: 0,
            error_message: None,
            content: Some(content),
        }
    }

    pub fn error(code: i32, message: &str) -> Self {
        Self {
            code,
            error_message: Some(message.to_owned()),
            content: None,
        }
    }
}

impl ApiResult<()> {
    /// 没有返回内容的成功响应
    pub fn ok() -> Self {
        Self {
            code: 0,
            error_message: None,
            content: None,
        }
    }
}
