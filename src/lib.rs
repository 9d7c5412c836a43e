//! 播放器属性与命令控制核心
//!
//! 属性系统把播放状态统一暴露为带类型的命名值，命令系统把文本命令分发到属性或播放动作上。

pub mod command;
pub mod core;
pub mod player;
pub mod property;
