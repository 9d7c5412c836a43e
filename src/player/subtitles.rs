use crate::core::{Result, SubtitleFrame};
use crate::player::demuxer::{Demuxer, SubtitleKind};
use crate::player::external_subtitle::SubtitleTrack;
use log::{debug, info};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

/// 字幕来源，顺序决定起始序号相同时的优先级
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubSource {
    Text,
    Vobsub,
    Demux,
}

impl SubSource {
    const ALL: [SubSource; 3] = [SubSource::Text, SubSource::Vobsub, SubSource::Demux];

    fn slot(self) -> usize {
        self as usize
    }
}

/// 字幕选择状态
///
/// 三类来源拼接成一个全局序号空间，`indices` 记录每类来源的起始序号（-1 表示没有）
#[derive(Debug)]
pub struct SubtitleState {
    tracks: Vec<SubtitleTrack>,
    vobsub_langs: Vec<String>,
    indices: [i32; 3],
    pub global_size: i32,
    pub global_pos: i32,
    /// 选中的外部字幕文件序号
    pub text_pos: i32,
    pub vobsub_id: i32,
    /// 选中的内嵌字幕序号
    pub dvdsub_id: i32,
    /// SPU 解码器是否存在
    pub spu_decoder: bool,
    pub delay: f32,
    pub pos: i32,
    pub alignment: i32,
    pub visibility: bool,
    pub forced_only: bool,
}

impl Default for SubtitleState {
    fn default() -> Self {
        Self {
            tracks: Vec::new(),
            vobsub_langs: Vec::new(),
            indices: [-1; 3],
            global_size: 0,
            global_pos: -1,
            text_pos: -1,
            vobsub_id: -1,
            dvdsub_id: -1,
            spu_decoder: false,
            delay: 0.0,
            pos: 100,
            alignment: 2,
            visibility: true,
            forced_only: false,
        }
    }
}

impl SubtitleState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tracks(&self) -> &[SubtitleTrack] {
        &self.tracks
    }

    pub fn index_of(&self, source: SubSource) -> i32 {
        self.indices[source.slot()]
    }

    /// 当前选中的外部字幕
    pub fn selected_track(&self) -> Option<&SubtitleTrack> {
        usize::try_from(self.text_pos)
            .ok()
            .and_then(|i| self.tracks.get(i))
    }

    /// 注册 vobsub 字幕流
    pub fn attach_vobsub(&mut self, langs: Vec<String>) {
        if langs.is_empty() {
            return;
        }
        self.indices[SubSource::Vobsub.slot()] = self.global_size;
        self.global_size += langs.len() as i32;
        self.vobsub_langs = langs;
        self.spu_decoder = true;
    }

    /// 注册解复用器内嵌字幕流
    pub fn attach_demux(&mut self, count: usize) {
        if count == 0 {
            return;
        }
        self.indices[SubSource::Demux.slot()] = self.global_size;
        self.global_size += count as i32;
    }

    /// 加入外部字幕文件，第一条文件字幕的序号从当前总数开始
    pub fn add_track(&mut self, track: SubtitleTrack) {
        if self.indices[SubSource::Text.slot()] < 0 {
            self.indices[SubSource::Text.slot()] = self.global_size;
        }
        self.global_size += 1;
        self.tracks.push(track);
    }

    /// 移除外部字幕文件，`index` < 0 移除全部
    ///
    /// 返回 true 表示移除了正在显示的字幕，需要重新选择
    pub fn remove_tracks(&mut self, index: i32) -> bool {
        let count = self.tracks.len() as i32;
        if index < 0 {
            for (i, track) in self.tracks.iter().enumerate() {
                info!("已移除字幕文件 ({}): {}", i + 1, track.filename);
            }
            self.tracks.clear();
            self.indices[SubSource::Text.slot()] = -1;
            self.global_size -= count;
            if self.text_pos >= 0 {
                self.deselect();
                return true;
            }
            return false;
        }
        if index >= count {
            return false;
        }

        let removed = self.tracks.remove(index as usize);
        info!("已移除字幕文件 ({}): {}", index + 1, removed.filename);
        let mut reselect = false;
        if self.text_pos == index {
            self.deselect();
            reselect = true;
        } else if self.text_pos > index {
            self.text_pos -= 1;
            self.global_pos -= 1;
        }
        self.global_size -= 1;
        if self.tracks.is_empty() {
            self.indices[SubSource::Text.slot()] = -1;
        }
        reselect
    }

    fn deselect(&mut self) {
        self.global_pos = -2;
        self.text_pos = -1;
    }

    /// 全局序号所属的来源：起始序号不大于当前位置且最大的那一类
    pub fn source(&self) -> Option<SubSource> {
        let mut found = None;
        let mut top = -1;
        for source in SubSource::ALL {
            let start = self.indices[source.slot()];
            if start >= 0 && start > top && self.global_pos >= start {
                found = Some(source);
                top = start;
            }
        }
        found
    }

    /// 应用 `global_pos`：清空旧选择，按来源重新选择
    pub fn apply_selection(&mut self, demuxer: Option<&mut (dyn Demuxer + 'static)>) {
        let source = if self.global_pos >= 0 { self.source() } else { None };
        debug!(
            "字幕选择: 共 {} 条 (t@{} v@{} d@{}), 位置 {}, 来源 {:?}",
            self.global_size,
            self.indices[0],
            self.indices[1],
            self.indices[2],
            self.global_pos,
            source
        );

        self.text_pos = -1;
        self.vobsub_id = -1;
        self.dvdsub_id = -1;

        match source {
            Some(SubSource::Vobsub) => {
                self.vobsub_id = self.global_pos - self.index_of(SubSource::Vobsub);
            }
            Some(SubSource::Text) => {
                self.text_pos = self.global_pos - self.index_of(SubSource::Text);
            }
            Some(SubSource::Demux) => {
                self.dvdsub_id = self.global_pos - self.index_of(SubSource::Demux);
            }
            None => {}
        }

        if let Some(demuxer) = demuxer {
            if self.dvdsub_id >= 0 {
                if demuxer.select_subtitle(Some(self.dvdsub_id)) == Some(SubtitleKind::Bitmap) {
                    self.spu_decoder = true;
                }
            } else {
                demuxer.select_subtitle(None);
            }
        }
    }

    /// PRINT 文本：外部字幕显示文件名，其余显示语言
    pub fn describe(&self, demuxer: Option<&(dyn Demuxer + 'static)>) -> String {
        let text = if let Some(track) = self.selected_track() {
            let name = track.basename();
            let len = name.chars().count();
            if len < 20 {
                format!("({}) {}", self.text_pos + 1, name)
            } else {
                let tail: String = name.chars().skip(len - 19).collect();
                format!("({}) ...{}", self.text_pos + 1, tail)
            }
        } else if self.dvdsub_id >= 0 {
            let lang = demuxer
                .and_then(|d| d.subtitle_lang(self.dvdsub_id))
                .unwrap_or_else(|| "unknown".to_string());
            format!("({}) {}", self.dvdsub_id, lang)
        } else if self.vobsub_id >= 0 {
            let lang = self
                .vobsub_langs
                .get(self.vobsub_id as usize)
                .cloned()
                .unwrap_or_else(|| "unknown".to_string());
            format!("({}) {}", self.vobsub_id, lang)
        } else {
            "disabled".to_string()
        };
        text.chars().take(62).collect()
    }

    fn frame_key(track: &SubtitleTrack, seconds: f64, fps: f32) -> i64 {
        if track.uses_time {
            (seconds * 1000.0) as i64
        } else {
            (seconds * fps as f64) as i64
        }
    }

    fn locate(frames: &[SubtitleFrame], key: i64) -> Option<usize> {
        frames.iter().rposition(|f| f.pts <= key)
    }

    /// 按条目步进字幕：调整字幕延迟，让第 `movement` 条字幕在当前画面时间出现
    pub fn step(&mut self, pts: f64, fps: f32, movement: i32) -> bool {
        let Some(track) = self.selected_track() else {
            return false;
        };
        let frames = &track.frames;
        if frames.is_empty() {
            return false;
        }
        let key = Self::frame_key(track, pts + self.delay as f64, fps);
        let current = Self::locate(frames, key).unwrap_or(0);
        let count = frames.len() as i32;

        let mut movement = movement;
        // 尚未显示的下一条不计入；已结束的当前条不计入
        if movement > 0 && key < frames[current].pts {
            movement -= 1;
        }
        if movement < 0 && key >= frames[current].end_pts {
            movement += 1;
        }
        let current = current as i32;
        if current + movement < 0 {
            movement = -current;
        }
        if current + movement >= count {
            movement = count - current - 1;
        }
        let target = (current + movement) as usize;

        let start = frames[target].pts as f64;
        let uses_time = track.uses_time;
        if movement != 0 {
            let start_secs = if uses_time { start / 1000.0 } else { start / fps.max(1.0) as f64 };
            self.delay = (start_secs - pts) as f32;
        }
        true
    }

    /// 当前画面时间正在（或最近）显示的字幕条目
    pub fn last_shown(&self, pts: f64, fps: f32) -> Option<&SubtitleFrame> {
        let track = self.selected_track()?;
        let key = Self::frame_key(track, pts + self.delay as f64, fps);
        Self::locate(&track.frames, key).map(|i| &track.frames[i])
    }

    /// 把当前字幕追加写入字幕日志，便于事后修正
    pub fn log_current(&self, log_path: &Path, media: &str, pts: f64, fps: f32) -> Result<bool> {
        let (Some(track), Some(frame)) = (self.selected_track(), self.last_shown(pts, fps)) else {
            return Ok(false);
        };
        if let Some(parent) = log_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new().create(true).append(true).open(log_path)?;
        writeln!(file, "----------------------------------------------------------")?;
        if track.uses_time {
            writeln!(
                file,
                "N: {} S: {} E: {}",
                media,
                centi_timestamp(frame.pts / 10),
                centi_timestamp(frame.end_pts / 10)
            )?;
        } else {
            writeln!(file, "N: {} S: {} E: {}", media, frame.pts, frame.end_pts)?;
        }
        for line in frame.text.lines() {
            writeln!(file, "{}", line)?;
        }
        Ok(true)
    }
}

/// 百分之一秒 -> hh:mm:ss.cc
fn centi_timestamp(cs: i64) -> String {
    format!(
        "{:02}:{:02}:{:02}.{:02}",
        cs / 360_000,
        (cs / 6000) % 60,
        (cs / 100) % 60,
        cs % 100
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(name: &str, times: &[(i64, i64)]) -> SubtitleTrack {
        SubtitleTrack {
            filename: name.to_string(),
            uses_time: true,
            frames: times
                .iter()
                .enumerate()
                .map(|(i, (s, e))| SubtitleFrame {
                    pts: *s,
                    duration: e - s,
                    end_pts: *e,
                    text: format!("line {}", i),
                })
                .collect(),
        }
    }

    #[test]
    fn test_source_resolution() {
        let mut subs = SubtitleState::new();
        subs.attach_vobsub(vec!["en".into(), "de".into()]);
        subs.add_track(track("a.srt", &[(0, 1000)]));
        subs.attach_demux(2);
        assert_eq!(subs.global_size, 5);
        subs.global_pos = 1;
        assert_eq!(subs.source(), Some(SubSource::Vobsub));
        subs.global_pos = 2;
        assert_eq!(subs.source(), Some(SubSource::Text));
        subs.global_pos = 4;
        assert_eq!(subs.source(), Some(SubSource::Demux));
        subs.global_pos = -1;
        assert_eq!(subs.source(), None);
    }

    #[test]
    fn test_apply_selection_and_describe() {
        let mut subs = SubtitleState::new();
        subs.add_track(track("/tmp/some_really_long_subtitle_name.srt", &[(0, 1000)]));
        subs.attach_vobsub(vec!["fr".into()]);
        subs.global_pos = 0;
        subs.apply_selection(None);
        assert_eq!(subs.text_pos, 0);
        assert_eq!(subs.describe(None), "(1) ...g_subtitle_name.srt");

        subs.global_pos = 1;
        subs.apply_selection(None);
        assert_eq!(subs.text_pos, -1);
        assert_eq!(subs.vobsub_id, 0);
        assert_eq!(subs.describe(None), "(0) fr");

        subs.global_pos = -1;
        subs.apply_selection(None);
        assert_eq!(subs.describe(None), "disabled");
    }

    #[test]
    fn test_remove_selected_track() {
        let mut subs = SubtitleState::new();
        subs.add_track(track("a.srt", &[(0, 1000)]));
        subs.add_track(track("b.srt", &[(0, 1000)]));
        subs.global_pos = 1;
        subs.apply_selection(None);
        assert!(subs.remove_tracks(1));
        assert_eq!(subs.global_pos, -2);
        assert_eq!(subs.global_size, 1);
    }

    #[test]
    fn test_remove_earlier_track_shifts() {
        let mut subs = SubtitleState::new();
        subs.add_track(track("a.srt", &[(0, 1000)]));
        subs.add_track(track("b.srt", &[(0, 1000)]));
        subs.global_pos = 1;
        subs.apply_selection(None);
        assert!(!subs.remove_tracks(0));
        assert_eq!(subs.text_pos, 0);
        assert_eq!(subs.global_pos, 0);
        assert_eq!(subs.selected_track().unwrap().filename, "b.srt");
    }

    #[test]
    fn test_remove_all() {
        let mut subs = SubtitleState::new();
        subs.add_track(track("a.srt", &[(0, 1000)]));
        subs.add_track(track("b.srt", &[(0, 1000)]));
        subs.global_pos = 0;
        subs.apply_selection(None);
        assert!(subs.remove_tracks(-1));
        assert_eq!(subs.global_size, 0);
        assert_eq!(subs.index_of(SubSource::Text), -1);
    }

    #[test]
    fn test_step_forward_and_back() {
        let mut subs = SubtitleState::new();
        subs.add_track(track("a.srt", &[(1000, 2000), (5000, 6000), (9000, 10000)]));
        subs.global_pos = 0;
        subs.apply_selection(None);

        // 画面 1.5 秒，正在显示第 0 条，前进一条到 5 秒
        assert!(subs.step(1.5, 25.0, 1));
        assert!((subs.delay - 3.5).abs() < 1e-4);

        // 延迟后 key = 5.0，后退一条回到 1 秒
        assert!(subs.step(1.5, 25.0, -1));
        assert!((subs.delay + 0.5).abs() < 1e-4);

        // 越界步进停在最后一条
        assert!(subs.step(1.5, 25.0, 10));
        assert!((subs.delay - 7.5).abs() < 1e-4);
    }

    #[test]
    fn test_log_current() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("nested").join("subtitle_log");
        let mut subs = SubtitleState::new();
        subs.add_track(track("a.srt", &[(3_723_450, 3_725_000)]));
        subs.global_pos = 0;
        subs.apply_selection(None);

        assert!(!subs.log_current(&log, "movie.mkv", 1.0, 25.0).unwrap());
        assert!(subs.log_current(&log, "movie.mkv", 3724.0, 25.0).unwrap());
        let content = fs::read_to_string(&log).unwrap();
        assert_eq!(
            content,
            "----------------------------------------------------------\n\
             N: movie.mkv S: 01:02:03.45 E: 01:02:05.00\n\
             line 0\n"
        );
    }
}
