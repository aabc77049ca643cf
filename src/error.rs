use thiserror::Error;

/// 应用错误
#[derive(Debug, Error)]
pub enum AppError {
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("请求失败: {0}")]
    Http(#[from] reqwest::Error),

    #[error("响应无法解析: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("接口返回状态码 {0}")]
    Status(u16),

    #[error("配置文件格式错误: {0}")]
    Config(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
