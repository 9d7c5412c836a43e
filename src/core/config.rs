use crate::core::{ControlError, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// 控制核心配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlConfig {
    /// OSD 消息显示时长（毫秒）
    #[serde(default = "default_osd_duration_ms")]
    pub osd_duration_ms: u32,

    /// 启动时的 OSD 等级
    #[serde(default = "default_osd_level")]
    pub osd_level: i32,

    /// 无视频时使用终端 OSD（最高等级为 1）
    #[serde(default = "default_term_osd")]
    pub term_osd: bool,

    /// 音量步进
    #[serde(default = "default_volume_step")]
    pub volume_step: f32,

    /// 切换视频轨时保留视频输出
    #[serde(default)]
    pub fixed_vo: bool,

    /// 字幕日志文件路径
    #[serde(default = "default_subtitle_log")]
    pub subtitle_log: PathBuf,

    /// EDL 输出文件（None = 不记录）
    #[serde(default)]
    pub edl_output: Option<PathBuf>,
}

fn default_osd_duration_ms() -> u32 {
    1000
}

fn default_osd_level() -> i32 {
    1
}

fn default_term_osd() -> bool {
    true
}

fn default_volume_step() -> f32 {
    3.0
}

fn default_subtitle_log() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".myy_player")
        .join("subtitle_log")
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            osd_duration_ms: default_osd_duration_ms(),
            osd_level: default_osd_level(),
            term_osd: default_term_osd(),
            volume_step: default_volume_step(),
            fixed_vo: false,
            subtitle_log: default_subtitle_log(),
            edl_output: None,
        }
    }
}

impl ControlConfig {
    /// 从 JSON 文件加载配置
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: ControlConfig = serde_json::from_str(&content)?;
        config.validate()?;
        info!("已加载配置: {}", path.display());
        Ok(config)
    }

    /// 校验配置值
    pub fn validate(&self) -> Result<()> {
        if !(0..=3).contains(&self.osd_level) {
            return Err(ControlError::InvalidConfig(format!(
                "OSD 等级必须在 0 到 3 之间: {}",
                self.osd_level
            )));
        }
        if !(self.volume_step > 0.0 && self.volume_step <= 100.0) {
            return Err(ControlError::InvalidConfig(format!(
                "音量步进必须在 (0, 100] 之间: {}",
                self.volume_step
            )));
        }
        if self.subtitle_log.as_os_str().is_empty() {
            return Err(ControlError::InvalidConfig("字幕日志路径不能为空".to_string()));
        }
        Ok(())
    }
}
