use serde::{Deserialize, Serialize};

/// 轨道选择结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackId {
    /// 已禁用（-1）
    Disabled,
    /// 等待解复用器确定（-2）
    Pending,
    Id(i32),
}

impl TrackId {
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            -2 => TrackId::Pending,
            n if n < 0 => TrackId::Disabled,
            n => TrackId::Id(n),
        }
    }

    pub fn to_raw(self) -> i32 {
        match self {
            TrackId::Disabled => -1,
            TrackId::Pending => -2,
            TrackId::Id(n) => n,
        }
    }
}

/// 节目（音视频轨组合）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Program {
    pub audio: i32,
    pub video: i32,
}

/// 章节跳转结果
#[derive(Debug, Clone, PartialEq)]
pub struct ChapterSeek {
    /// 从 0 开始的章节号
    pub chapter: i32,
    /// 章节起始时间（秒），None 表示解复用器已自行定位
    pub next_pts: Option<f64>,
    pub name: Option<String>,
}

/// 字节流范围
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamSpan {
    pub position: i64,
    pub start: i64,
    pub end: i64,
}

/// 解复用器字幕流类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubtitleKind {
    /// 图像字幕（需要 SPU 解码器）
    Bitmap,
    Text,
}

/// 解复用器抽象接口
///
/// 控制核心只通过这个 trait 读取流状态、切换轨道
pub trait Demuxer: Send {
    /// 解复用器名称
    fn name(&self) -> &str;

    /// 底层字节流的位置与范围，None 表示没有字节流
    fn stream_span(&self) -> Option<StreamSpan>;

    /// 字节流定位
    fn stream_seek(&mut self, position: i64);

    /// 媒体时长（秒）
    fn time_length(&self) -> f64;

    /// 播放进度百分比
    fn percent_pos(&self) -> i32;

    /// 当前音频流
    fn current_audio(&self) -> TrackId;

    /// 切换音频流，-1 表示下一条
    fn switch_audio(&mut self, request: i32) -> TrackId;

    fn current_video(&self) -> TrackId;

    fn switch_video(&mut self, request: i32) -> TrackId;

    /// 音轨语言
    fn audio_lang(&self, _id: i32) -> Option<String> {
        None
    }

    /// 内嵌字幕语言
    fn subtitle_lang(&self, _id: i32) -> Option<String> {
        None
    }

    /// 内嵌字幕流数量
    fn subtitle_count(&self) -> usize {
        0
    }

    /// 选择第 n 条内嵌字幕流，None 表示关闭
    fn select_subtitle(&mut self, _index: Option<i32>) -> Option<SubtitleKind> {
        None
    }

    /// 识别节目，None 表示解复用器不支持
    fn identify_program(&mut self, _request: i32) -> Option<Program> {
        None
    }

    /// 章节跳转，None 表示失败
    fn seek_chapter(&mut self, _chapter: i32, _absolute: bool) -> Option<ChapterSeek> {
        None
    }

    /// 元数据标签（Title、Artist、Album、Year、Comment、Track、Genre）
    fn info_tag(&self, _tag: &str) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_id_raw() {
        assert_eq!(TrackId::from_raw(-2), TrackId::Pending);
        assert_eq!(TrackId::from_raw(-1), TrackId::Disabled);
        assert_eq!(TrackId::from_raw(3), TrackId::Id(3));
        assert_eq!(TrackId::Pending.to_raw(), -2);
        assert_eq!(TrackId::Id(5).to_raw(), 5);
    }
}
