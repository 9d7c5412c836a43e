// 命令系统：命令记录、文本解析、属性桥接和命令分发

pub mod bridge;
pub mod dispatch;
pub mod parser;

pub use dispatch::{execute, LoopControl};
pub use parser::parse_command;

use crate::core::PropertyValue;

/// 命令标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandId {
    // 属性桥接命令
    Volume,
    Mute,
    AudioDelay,
    SwitchAudio,
    VoFullscreen,
    Panscan,
    VoOntop,
    VoRootwin,
    VoBorder,
    Framedropping,
    Gamma,
    Brightness,
    Contrast,
    Saturation,
    Hue,
    SwitchVsync,
    SubSelect,
    SubPos,
    SubAlignment,
    SubDelay,
    SubVisibility,
    SubForcedOnly,
    TvSetBrightness,
    TvSetHue,
    TvSetSaturation,
    TvSetContrast,

    // 播放控制
    Seek,
    SetProperty,
    StepProperty,
    GetProperty,
    EdlMark,
    SwitchRatio,
    SpeedIncr,
    SpeedMult,
    SpeedSet,
    Pause,
    FrameStep,
    FileFilter,
    Quit,
    PlayTreeStep,
    PlayTreeUpStep,
    PlayAltSrcStep,
    SeekChapter,

    // 字幕
    SubStep,
    SubLog,
    SubLoad,
    SubRemove,

    // OSD
    Osd,
    OsdShowText,
    OsdShowPropertyText,

    // 播放列表
    Loadfile,
    Loadlist,

    // 电视
    TvSetFreq,
    TvStepFreq,
    TvSetNorm,
    TvStepNorm,
    TvStepChannel,
    TvSetChannel,
    TvLastChannel,
    TvStepChanlist,

    // 收音机 / 数字电视
    RadioStepChannel,
    RadioSetChannel,
    RadioSetFreq,
    RadioStepFreq,
    DvbSetChannel,

    // 查询
    GetSubVisibility,
    GetTimeLength,
    GetFileName,
    GetVideoCodec,
    GetVideoBitrate,
    GetVideoResolution,
    GetAudioCodec,
    GetAudioBitrate,
    GetAudioSamples,
    GetMetaTitle,
    GetMetaArtist,
    GetMetaAlbum,
    GetMetaYear,
    GetMetaComment,
    GetMetaTrack,
    GetMetaGenre,
    GetVoFullscreen,
    GetPercentPos,
    GetTimePos,

    // 其他
    Screenshot,
    ChangeRectangle,
    Run,
    KeyDownEvent,
    SetMousePos,
    Dvdnav,
}

/// 命令参数
#[derive(Debug, Clone, PartialEq)]
pub enum CommandArg {
    Int(i32),
    Float(f32),
    String(String),
}

impl CommandArg {
    pub fn as_i32(&self) -> i32 {
        match self {
            CommandArg::Int(v) => *v,
            CommandArg::Float(v) => *v as i32,
            CommandArg::String(_) => 0,
        }
    }

    pub fn as_f32(&self) -> f32 {
        match self {
            CommandArg::Int(v) => *v as f32,
            CommandArg::Float(v) => *v,
            CommandArg::String(_) => 0.0,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CommandArg::String(s) => s,
            _ => "",
        }
    }

    /// 作为属性值传给属性系统
    pub fn to_value(&self) -> PropertyValue {
        match self {
            CommandArg::Int(v) => PropertyValue::Int(*v),
            CommandArg::Float(v) => PropertyValue::Float(*v),
            CommandArg::String(s) => PropertyValue::String(s.clone()),
        }
    }
}

/// 命令执行后的暂停处理
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Pausing {
    #[default]
    None,
    /// 执行后暂停
    Pause,
    /// 保持原来的暂停状态
    Keep,
    /// 翻转暂停状态
    Toggle,
}

/// 一条已解析的命令
///
/// `args` 包含默认值补齐后的全部参数，`nargs` 是实际给出的参数个数
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub id: CommandId,
    pub args: Vec<CommandArg>,
    pub nargs: usize,
    pub pausing: Pausing,
}

impl Command {
    /// 所有参数都视为显式给出
    pub fn new(id: CommandId, args: Vec<CommandArg>) -> Self {
        let nargs = args.len();
        Self {
            id,
            args,
            nargs,
            pausing: Pausing::None,
        }
    }

    pub fn int(&self, index: usize) -> i32 {
        self.args.get(index).map(CommandArg::as_i32).unwrap_or(0)
    }

    pub fn float(&self, index: usize) -> f32 {
        self.args.get(index).map(CommandArg::as_f32).unwrap_or(0.0)
    }

    pub fn string(&self, index: usize) -> &str {
        self.args.get(index).map(CommandArg::as_str).unwrap_or("")
    }
}
