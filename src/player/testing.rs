//! 测试用的子系统替身，所有调用记录到共享日志

use crate::core::ControlConfig;
use crate::player::context::PlaybackContext;
use crate::player::demuxer::{ChapterSeek, Demuxer, Program, StreamSpan, SubtitleKind, TrackId};
use crate::player::menu::{MenuNavigator, MenuResult};
use crate::player::pipeline::{AudioStreamInfo, Pipeline, VideoStreamInfo};
use crate::player::playlist::Playlist;
use crate::player::status::StatusChannel;
#[cfg(feature = "dvb")]
use crate::player::dvb::DvbTuner;
#[cfg(feature = "radio")]
use crate::player::radio::RadioTuner;
#[cfg(feature = "tv")]
use crate::player::tv::{TvColor, TvTuner};
use crate::player::video_out::{ColorChannel, VideoFilter, VideoOutput, VoControl, VoGeometry};
use crossbeam_channel::Receiver;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

pub type CallLog = Arc<Mutex<Vec<String>>>;

fn record(log: &CallLog, entry: impl Into<String>) {
    log.lock().push(entry.into());
}

pub fn calls(log: &CallLog) -> Vec<String> {
    log.lock().clone()
}

pub fn audio_info() -> AudioStreamInfo {
    AudioStreamInfo {
        format: 0x55,
        bitrate: 16000,
        samplerate: 44100,
        channels: 2,
        codec: "mp3".to_string(),
    }
}

pub fn video_info() -> VideoStreamInfo {
    VideoStreamInfo {
        format: 0x3447504d,
        bitrate: 125000,
        width: 640,
        height: 360,
        fps: 25.0,
        aspect: 1.7778,
        pts: 12.0,
        codec: "mpeg4".to_string(),
    }
}

pub struct FakeDemuxer {
    pub log: CallLog,
    pub span: Option<StreamSpan>,
    pub length: f64,
    pub audio: TrackId,
    pub audio_tracks: Vec<i32>,
    pub video: TrackId,
    pub video_tracks: Vec<i32>,
    pub subtitle_langs: Vec<String>,
    pub bitmap_subs: bool,
    pub program: Option<Program>,
    pub chapters: Vec<(f64, String)>,
    pub chapter: i32,
    pub tags: HashMap<String, String>,
}

impl FakeDemuxer {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            span: Some(StreamSpan {
                position: 4096,
                start: 0,
                end: 1_000_000,
            }),
            length: 3725.0,
            audio: TrackId::Id(1),
            audio_tracks: vec![1, 2],
            video: TrackId::Id(0),
            video_tracks: vec![0],
            subtitle_langs: Vec::new(),
            bitmap_subs: false,
            program: None,
            chapters: Vec::new(),
            chapter: 0,
            tags: HashMap::new(),
        }
    }

    fn switch(current: TrackId, tracks: &[i32], request: i32) -> TrackId {
        match request {
            -2 => TrackId::Pending,
            -1 => {
                let pos = tracks.iter().position(|t| TrackId::Id(*t) == current);
                match pos {
                    Some(i) if i + 1 < tracks.len() => TrackId::Id(tracks[i + 1]),
                    Some(_) => TrackId::Disabled,
                    None => tracks.first().map(|t| TrackId::Id(*t)).unwrap_or(TrackId::Disabled),
                }
            }
            n if tracks.contains(&n) => TrackId::Id(n),
            _ => TrackId::Disabled,
        }
    }
}

impl Demuxer for FakeDemuxer {
    fn name(&self) -> &str {
        "lavf"
    }

    fn stream_span(&self) -> Option<StreamSpan> {
        self.span
    }

    fn stream_seek(&mut self, position: i64) {
        record(&self.log, format!("stream_seek {}", position));
        if let Some(span) = self.span.as_mut() {
            span.position = position;
        }
    }

    fn time_length(&self) -> f64 {
        self.length
    }

    fn percent_pos(&self) -> i32 {
        42
    }

    fn current_audio(&self) -> TrackId {
        self.audio
    }

    fn switch_audio(&mut self, request: i32) -> TrackId {
        record(&self.log, format!("switch_audio {}", request));
        self.audio = Self::switch(self.audio, &self.audio_tracks, request);
        self.audio
    }

    fn current_video(&self) -> TrackId {
        self.video
    }

    fn switch_video(&mut self, request: i32) -> TrackId {
        record(&self.log, format!("switch_video {}", request));
        self.video = Self::switch(self.video, &self.video_tracks, request);
        self.video
    }

    fn audio_lang(&self, id: i32) -> Option<String> {
        (id == 2).then(|| "jpn".to_string())
    }

    fn subtitle_lang(&self, id: i32) -> Option<String> {
        self.subtitle_langs.get(id as usize).cloned()
    }

    fn subtitle_count(&self) -> usize {
        self.subtitle_langs.len()
    }

    fn select_subtitle(&mut self, index: Option<i32>) -> Option<SubtitleKind> {
        record(&self.log, format!("select_subtitle {:?}", index));
        index.map(|_| if self.bitmap_subs { SubtitleKind::Bitmap } else { SubtitleKind::Text })
    }

    fn identify_program(&mut self, request: i32) -> Option<Program> {
        record(&self.log, format!("identify_program {}", request));
        self.program
    }

    fn seek_chapter(&mut self, chapter: i32, absolute: bool) -> Option<ChapterSeek> {
        let target = if absolute { chapter } else { self.chapter + chapter };
        let (pts, name) = self.chapters.get(usize::try_from(target).ok()?)?.clone();
        self.chapter = target;
        Some(ChapterSeek {
            chapter: target,
            next_pts: Some(pts),
            name: Some(name),
        })
    }

    fn info_tag(&self, tag: &str) -> Option<String> {
        self.tags.get(tag).cloned()
    }
}

pub struct FakePipeline {
    pub log: CallLog,
    pub audio_pts: Option<f64>,
}

impl Pipeline for FakePipeline {
    fn uninit_audio(&mut self) {
        record(&self.log, "uninit_audio");
    }

    fn reinit_audio(&mut self, id: i32) -> Option<AudioStreamInfo> {
        record(&self.log, format!("reinit_audio {}", id));
        Some(audio_info())
    }

    fn uninit_video(&mut self, keep_vo: bool) {
        record(&self.log, format!("uninit_video keep_vo={}", keep_vo));
    }

    fn reinit_video(&mut self, id: i32) -> Option<VideoStreamInfo> {
        record(&self.log, format!("reinit_video {}", id));
        Some(video_info())
    }

    fn rebuild_audio_filters(&mut self, speed: f32) {
        record(&self.log, format!("rebuild_audio_filters {:.2}", speed));
    }

    fn audio_pts(&self) -> Option<f64> {
        self.audio_pts
    }

    fn refresh_subtitles(&mut self) {
        record(&self.log, "refresh_subtitles");
    }

    fn configure_vo(&mut self, width: i32, height: i32, aspect: f32) {
        record(&self.log, format!("configure_vo {}x{} {:.2}", width, height, aspect));
    }
}

pub struct FakeVideoOutput {
    pub log: CallLog,
    pub configured: bool,
    pub panscan: bool,
    pub geometry: VoGeometry,
}

impl VideoOutput for FakeVideoOutput {
    fn is_configured(&self) -> bool {
        self.configured
    }

    fn control(&mut self, ctl: VoControl) -> bool {
        record(&self.log, format!("vo {:?}", ctl));
        true
    }

    fn supports_panscan(&self) -> bool {
        self.panscan
    }

    fn set_panscan(&mut self, value: f32) {
        record(&self.log, format!("set_panscan {:.2}", value));
    }

    fn geometry(&self) -> VoGeometry {
        self.geometry
    }
}

pub struct FakeVideoFilter {
    pub log: CallLog,
    pub deinterlace: bool,
    /// None 表示滤镜链不支持颜色调节
    pub colors: Option<[i32; 5]>,
    pub screenshot: bool,
}

impl VideoFilter for FakeVideoFilter {
    fn deinterlace(&self) -> bool {
        self.deinterlace
    }

    fn set_deinterlace(&mut self, on: bool) {
        record(&self.log, format!("set_deinterlace {}", on));
        self.deinterlace = on;
    }

    fn color(&self, channel: ColorChannel) -> Option<i32> {
        self.colors.map(|c| c[channel.index()])
    }

    fn set_color(&mut self, channel: ColorChannel, value: i32) -> bool {
        match self.colors.as_mut() {
            Some(colors) => {
                record(&self.log, format!("set_color {} {}", channel.name(), value));
                colors[channel.index()] = value;
                true
            }
            None => false,
        }
    }

    fn screenshot(&mut self, mode: i32) -> bool {
        record(&self.log, format!("filter_screenshot {}", mode));
        self.screenshot
    }

    fn change_rectangle(&mut self, what: i32, value: i32) {
        record(&self.log, format!("change_rectangle {} {}", what, value));
    }
}

#[cfg(feature = "tv")]
pub struct FakeTuner {
    pub log: CallLog,
    pub colors: HashMap<&'static str, i32>,
    pub channel: Option<String>,
}

#[cfg(feature = "tv")]
fn tv_key(color: TvColor) -> &'static str {
    match color {
        TvColor::Brightness => "brightness",
        TvColor::Contrast => "contrast",
        TvColor::Saturation => "saturation",
        TvColor::Hue => "hue",
    }
}

#[cfg(feature = "tv")]
impl TvTuner for FakeTuner {
    fn color(&self, color: TvColor) -> Option<i32> {
        self.colors.get(tv_key(color)).copied()
    }

    fn set_color(&mut self, color: TvColor, value: i32) -> bool {
        record(&self.log, format!("tv_set_color {} {}", tv_key(color), value));
        self.colors.insert(tv_key(color), value);
        true
    }

    fn set_freq(&mut self, freq: i64) {
        record(&self.log, format!("tv_set_freq {}", freq));
    }

    fn step_freq(&mut self, delta: i64) {
        record(&self.log, format!("tv_step_freq {}", delta));
    }

    fn set_norm(&mut self, norm: &str) {
        record(&self.log, format!("tv_set_norm {}", norm));
    }

    fn step_norm(&mut self) {
        record(&self.log, "tv_step_norm");
    }

    fn step_channel(&mut self, up: bool) {
        record(&self.log, format!("tv_step_channel {}", up));
        self.channel = Some(if up { "E6".to_string() } else { "E4".to_string() });
    }

    fn set_channel(&mut self, channel: &str) {
        record(&self.log, format!("tv_set_channel {}", channel));
        self.channel = Some(channel.to_string());
    }

    fn last_channel(&mut self) {
        record(&self.log, "tv_last_channel");
    }

    fn step_chanlist(&mut self) {
        record(&self.log, "tv_step_chanlist");
    }

    fn channel_name(&self) -> Option<String> {
        self.channel.clone()
    }
}

#[cfg(feature = "radio")]
pub struct FakeRadio {
    pub log: CallLog,
    pub channel: Option<String>,
}

#[cfg(feature = "radio")]
impl RadioTuner for FakeRadio {
    fn step_channel(&mut self, up: bool) {
        record(&self.log, format!("radio_step_channel {}", up));
        self.channel = Some(if up { "FM3".to_string() } else { "FM1".to_string() });
    }

    fn set_channel(&mut self, channel: &str) {
        record(&self.log, format!("radio_set_channel {}", channel));
        self.channel = Some(channel.to_string());
    }

    fn set_freq(&mut self, freq: f32) {
        record(&self.log, format!("radio_set_freq {:.2}", freq));
    }

    fn step_freq(&mut self, delta: f32) {
        record(&self.log, format!("radio_step_freq {:.2}", delta));
    }

    fn channel_name(&self) -> Option<String> {
        self.channel.clone()
    }
}

#[cfg(feature = "dvb")]
pub struct FakeDvb {
    pub log: CallLog,
    pub on: bool,
    pub current: i32,
    /// set_channel 的返回值
    pub accept: bool,
}

#[cfg(feature = "dvb")]
impl DvbTuner for FakeDvb {
    fn is_on(&self) -> bool {
        self.on
    }

    fn current_channel(&self) -> i32 {
        self.current
    }

    fn set_channel(&mut self, card: i32, channel: i32) -> bool {
        record(&self.log, format!("dvb_set_channel card={} channel={}", card, channel));
        if self.accept {
            self.current = channel;
        }
        self.accept
    }
}

pub struct FakePlaylist {
    pub log: CallLog,
    pub entries_ahead: i32,
    pub entries_behind: i32,
    pub files: usize,
    pub file: usize,
}

impl Playlist for FakePlaylist {
    fn can_step(&self, n: i32) -> bool {
        if n > 0 {
            n <= self.entries_ahead
        } else {
            -n <= self.entries_behind
        }
    }

    fn can_up_step(&self, _n: i32) -> bool {
        false
    }

    fn file_count(&self) -> usize {
        self.files
    }

    fn current_file(&self) -> usize {
        self.file
    }

    fn load_file(&mut self, path: &str, append: bool) {
        record(&self.log, format!("load_file {} {}", path, append));
    }

    fn load_list(&mut self, path: &str, append: bool) -> bool {
        record(&self.log, format!("load_list {} {}", path, append));
        !path.is_empty()
    }
}

pub struct FakeMenu {
    pub log: CallLog,
    pub result: MenuResult,
}

impl MenuNavigator for FakeMenu {
    fn handle_input(&mut self, command: i32) -> MenuResult {
        record(&self.log, format!("menu_input {}", command));
        self.result
    }

    fn update_mouse(&mut self, x: i32, y: i32) -> Option<i32> {
        record(&self.log, format!("menu_mouse {} {}", x, y));
        Some(3)
    }
}

/// 带完整音视频的上下文
pub fn media_context() -> (PlaybackContext, CallLog, Receiver<String>) {
    let log: CallLog = Arc::new(Mutex::new(Vec::new()));
    let (status, rx) = StatusChannel::new();
    let mut ctx = PlaybackContext::new(ControlConfig::default());
    ctx.status = status;
    ctx.filename = Some("/media/movies/film.mkv".to_string());
    ctx.demuxer = Some(Box::new(FakeDemuxer::new(log.clone())));
    ctx.pipeline = Some(Box::new(FakePipeline {
        log: log.clone(),
        audio_pts: Some(11.5),
    }));
    ctx.video_out = Some(Box::new(FakeVideoOutput {
        log: log.clone(),
        configured: true,
        panscan: true,
        geometry: VoGeometry {
            screen_width: 1920,
            screen_height: 1080,
            display_width: 640,
            display_height: 360,
        },
    }));
    ctx.video_filter = Some(Box::new(FakeVideoFilter {
        log: log.clone(),
        deinterlace: false,
        colors: Some([0; 5]),
        screenshot: true,
    }));
    ctx.audio = Some(audio_info());
    ctx.video = Some(video_info());
    ctx.audio_id = 1;
    ctx.video_id = 0;
    (ctx, log, rx)
}

/// 替换解复用器并返回它的调用日志
pub fn with_demuxer(ctx: &mut PlaybackContext, configure: impl FnOnce(&mut FakeDemuxer)) -> CallLog {
    let log: CallLog = Arc::new(Mutex::new(Vec::new()));
    let mut demuxer = FakeDemuxer::new(log.clone());
    configure(&mut demuxer);
    ctx.demuxer = Some(Box::new(demuxer));
    log
}
