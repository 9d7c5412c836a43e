use crate::core::ControlConfig;
use crate::player::demuxer::Demuxer;
use crate::player::edl::EdlRecorder;
use crate::player::menu::MenuNavigator;
use crate::player::mixer::Mixer;
use crate::player::osd::OsdState;
use crate::player::pipeline::{AudioStreamInfo, Pipeline, VideoStreamInfo};
use crate::player::playlist::{EndReason, Playlist};
use crate::player::status::StatusChannel;
use crate::player::subtitles::SubtitleState;
#[cfg(feature = "dvb")]
use crate::player::dvb::DvbTuner;
#[cfg(feature = "radio")]
use crate::player::radio::RadioTuner;
#[cfg(feature = "tv")]
use crate::player::tv::TvTuner;
use crate::player::video_out::{ColorChannel, VideoFilter, VideoOutput, VoFlags};
use log::info;
use std::collections::VecDeque;

/// 颜色缓存的"尚未读取"标记
pub const COLOR_UNREAD: i32 = 1000;

/// seek 方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekMode {
    Relative,
    /// 绝对时间（秒）
    Absolute,
    /// 百分比（0.0 - 1.0）
    Percent,
}

/// 待执行的 seek
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeekRequest {
    pub target: f64,
    pub mode: SeekMode,
}

/// 播放上下文 - 所有属性和命令都在它上面执行
pub struct PlaybackContext {
    pub config: ControlConfig,
    /// 当前媒体路径
    pub filename: Option<String>,

    // 子系统（可能随时不存在）
    pub demuxer: Option<Box<dyn Demuxer>>,
    pub pipeline: Option<Box<dyn Pipeline>>,
    pub video_out: Option<Box<dyn VideoOutput>>,
    pub video_filter: Option<Box<dyn VideoFilter>>,
    #[cfg(feature = "tv")]
    pub tv: Option<Box<dyn TvTuner>>,
    #[cfg(feature = "radio")]
    pub radio: Option<Box<dyn RadioTuner>>,
    #[cfg(feature = "dvb")]
    pub dvb: Option<Box<dyn DvbTuner>>,
    pub playlist: Option<Box<dyn Playlist>>,
    pub menu: Option<Box<dyn MenuNavigator>>,

    pub audio: Option<AudioStreamInfo>,
    pub video: Option<VideoStreamInfo>,

    pub mixer: Mixer,
    pub subs: SubtitleState,
    pub osd: OsdState,
    pub status: StatusChannel,
    pub edl: EdlRecorder,

    pub speed: f32,
    pub audio_delay: f32,
    /// 音视频同步偏移
    pub av_delay: f32,
    pub audio_id: i32,
    pub video_id: i32,
    pub osd_level: i32,
    pub frame_dropping: i32,
    pub panscan: f32,
    pub vsync: bool,
    pub vo_flags: VoFlags,
    /// 颜色值缓存，按 ColorChannel 顺序
    pub colors: [i32; 5],
    pub movie_aspect: f32,

    /// EDL 区间强制静音
    pub edl_muted: bool,
    pub user_muted: bool,

    pub seek: Option<SeekRequest>,
    pub eof: Option<EndReason>,
    pub play_tree_step: i32,
    /// 上次数字电视换台方向
    pub last_dvb_step: i32,
    /// 数字电视换台后需要重新打开流
    pub dvb_reopen: bool,
    pub file_filter: bool,
    pub exit_code: Option<i32>,
    pub was_paused: bool,
    /// 等待执行的后续命令
    pub queued: VecDeque<String>,
    /// 注入的按键
    pub keys: VecDeque<i32>,
}

impl PlaybackContext {
    pub fn new(config: ControlConfig) -> Self {
        let mixer = Mixer::new(
            Box::new(crate::player::mixer::SoftVolume::new(100.0, 100.0)),
            config.volume_step,
        );
        let osd_level = config.osd_level;
        Self {
            config,
            filename: None,
            demuxer: None,
            pipeline: None,
            video_out: None,
            video_filter: None,
            #[cfg(feature = "tv")]
            tv: None,
            #[cfg(feature = "radio")]
            radio: None,
            #[cfg(feature = "dvb")]
            dvb: None,
            playlist: None,
            menu: None,
            audio: None,
            video: None,
            mixer,
            subs: SubtitleState::new(),
            osd: OsdState::new(),
            status: StatusChannel::detached(),
            edl: EdlRecorder::new(),
            speed: 1.0,
            audio_delay: 0.0,
            av_delay: 0.0,
            audio_id: -1,
            video_id: -1,
            osd_level,
            frame_dropping: 0,
            panscan: 0.0,
            vsync: false,
            vo_flags: VoFlags::default(),
            colors: [COLOR_UNREAD; 5],
            movie_aspect: 0.0,
            edl_muted: false,
            user_muted: false,
            seek: None,
            eof: None,
            play_tree_step: 1,
            last_dvb_step: 1,
            dvb_reopen: false,
            file_filter: true,
            exit_code: None,
            was_paused: false,
            queued: VecDeque::new(),
            keys: VecDeque::new(),
        }
    }

    pub fn osd_duration(&self) -> u32 {
        self.config.osd_duration_ms
    }

    /// 不含目录的文件名
    pub fn basename(&self) -> Option<&str> {
        let name = self.filename.as_deref()?;
        match name.rfind(['/', '\\']) {
            Some(i) if i + 1 < name.len() => Some(&name[i + 1..]),
            _ => Some(name),
        }
    }

    /// 当前播放时间：优先视频时间戳，否则音频时间戳
    pub fn playing_pts(&self) -> f64 {
        if let Some(video) = &self.video {
            return video.pts;
        }
        if self.audio.is_some() {
            if let Some(pts) = self.pipeline.as_ref().and_then(|p| p.audio_pts()) {
                return pts;
            }
        }
        0.0
    }

    pub fn color(&self, channel: ColorChannel) -> i32 {
        self.colors[channel.index()]
    }

    pub fn set_color_cache(&mut self, channel: ColorChannel, value: i32) {
        self.colors[channel.index()] = value;
    }

    /// 请求退出
    pub fn request_exit(&mut self, code: i32) {
        info!("收到退出请求，退出码 {}", code);
        self.exit_code = Some(code);
    }

    pub fn rebuild_audio_filters(&mut self) {
        let speed = self.speed;
        if let Some(pipeline) = self.pipeline.as_mut() {
            pipeline.rebuild_audio_filters(speed);
        }
    }
}

impl Default for PlaybackContext {
    fn default() -> Self {
        Self::new(ControlConfig::default())
    }
}
