use serde::{Deserialize, Serialize};

/// 当前文件结束原因（播放列表跳转方向）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    NextEntry,
    PrevEntry,
    UpNext,
    UpPrev,
    NextSrc,
    PrevSrc,
}

/// 播放列表游标
pub trait Playlist: Send {
    /// 试探在同一层内移动 n 项是否落在条目上
    fn can_step(&self, n: i32) -> bool;

    /// 试探向上一层移动是否落在条目上
    fn can_up_step(&self, n: i32) -> bool;

    /// 当前条目的备选源数量
    fn file_count(&self) -> usize;

    /// 当前备选源序号（从 1 开始）
    fn current_file(&self) -> usize;

    /// 加入单个文件，`append` 为假时替换整个列表并回到起点
    fn load_file(&mut self, path: &str, append: bool);

    /// 加入播放列表文件，解析失败返回 false
    fn load_list(&mut self, path: &str, append: bool) -> bool;
}
