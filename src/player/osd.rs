use log::debug;

/// OSD 消息最大长度（字符）
pub const OSD_MSG_MAX_CHARS: usize = 63;

/// 进度条类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsdBarKind {
    Volume,
    Panscan,
    Brightness,
    Contrast,
    Saturation,
    Hue,
}

/// OSD 消息槽位，同一槽位的新消息替换旧消息
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OsdSlot {
    Text,
    SubDelay,
    Speed,
    OsdStatus,
    TvChannel,
    RadioChannel,
    /// 属性命令的私有槽位（命令表序号）
    Property(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct OsdMessage {
    pub level: i32,
    pub duration_ms: u32,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OsdBar {
    pub kind: OsdBarKind,
    pub title: String,
    pub min: f64,
    pub max: f64,
    pub value: f64,
}

/// 画面状态符号
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OsdFunction {
    #[default]
    Play,
    Pause,
    Ffw,
    Rew,
}

/// 需要重绘的 OSD 图层
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsdLayer {
    Subtitle,
    Spu,
}

/// OSD 状态（只记录内容，不负责渲染）
#[derive(Debug, Default)]
pub struct OsdState {
    /// 消息栈，最后一条在最上层
    messages: Vec<(OsdSlot, OsdMessage)>,
    bar: Option<OsdBar>,
    pub function: OsdFunction,
    /// seek 后显示百分比的帧数
    pub show_percentage: f32,
    changed: Vec<OsdLayer>,
}

impl OsdState {
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置消息，文本截断到 63 个字符
    pub fn set_message(&mut self, slot: OsdSlot, level: i32, duration_ms: u32, text: &str) {
        let text: String = text.chars().take(OSD_MSG_MAX_CHARS).collect();
        debug!("OSD 消息 {:?}: {}", slot, text);
        self.messages.retain(|(s, _)| *s != slot);
        self.messages.push((
            slot,
            OsdMessage {
                level,
                duration_ms,
                text,
            },
        ));
    }

    pub fn remove_message(&mut self, slot: OsdSlot) {
        self.messages.retain(|(s, _)| *s != slot);
    }

    pub fn message(&self, slot: OsdSlot) -> Option<&OsdMessage> {
        self.messages
            .iter()
            .find(|(s, _)| *s == slot)
            .map(|(_, m)| m)
    }

    pub fn top_message(&self) -> Option<&OsdMessage> {
        self.messages.last().map(|(_, m)| m)
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    pub fn set_bar(&mut self, kind: OsdBarKind, title: &str, min: f64, max: f64, value: f64) {
        debug!("OSD 进度条 {:?}: {} = {}", kind, title, value);
        self.bar = Some(OsdBar {
            kind,
            title: title.to_string(),
            min,
            max,
            value,
        });
    }

    pub fn bar(&self) -> Option<&OsdBar> {
        self.bar.as_ref()
    }

    pub fn mark_changed(&mut self, layer: OsdLayer) {
        if !self.changed.contains(&layer) {
            self.changed.push(layer);
        }
    }

    /// 取出并清空待重绘图层
    pub fn take_changed(&mut self) -> Vec<OsdLayer> {
        std::mem::take(&mut self.changed)
    }
}
