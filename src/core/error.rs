use thiserror::Error;

#[derive(Error, Debug)]
pub enum ControlError {
    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),

    #[error("配置解析错误: {0}")]
    ConfigError(#[from] serde_json::Error),

    #[error("配置无效: {0}")]
    InvalidConfig(String),

    #[error("未知命令: {0}")]
    UnknownCommand(String),

    #[error("命令参数错误: {0}")]
    BadArgument(String),

    #[error("字幕错误: {0}")]
    SubtitleError(String),
}

pub type Result<T> = std::result::Result<T, ControlError>;
