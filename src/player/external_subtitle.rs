use crate::core::{ControlError, Result, SubtitleFrame};
use log::{info, warn};
use std::fs;
use std::path::Path;

/// 已加载的外部字幕文件
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleTrack {
    pub filename: String,
    /// true: 时间单位为毫秒；false: 时间单位为帧号（MicroDVD）
    pub uses_time: bool,
    pub frames: Vec<SubtitleFrame>,
}

impl SubtitleTrack {
    /// 不含目录的文件名
    pub fn basename(&self) -> &str {
        self.filename
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(&self.filename)
    }
}

/// 外部字幕文件解析器
pub struct ExternalSubtitleParser;

impl ExternalSubtitleParser {
    /// 按扩展名解析字幕文件
    pub fn parse_file(path: &Path) -> Result<SubtitleTrack> {
        let content = fs::read_to_string(path)?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_lowercase();

        let (uses_time, frames) = match extension.as_str() {
            "srt" => (true, Self::parse_cues(&content, Self::parse_srt_timestamp)),
            "vtt" => (true, Self::parse_cues(&content, Self::parse_vtt_timestamp)),
            "ass" | "ssa" => (true, Self::parse_ass(&content)),
            "sub" => (false, Self::parse_microdvd(&content)),
            _ => {
                return Err(ControlError::SubtitleError(format!(
                    "不支持的字幕文件格式: {}",
                    extension
                )))
            }
        };

        if frames.is_empty() {
            return Err(ControlError::SubtitleError(format!(
                "字幕文件没有可用条目: {}",
                path.display()
            )));
        }

        info!("加载字幕 {}，共 {} 条", path.display(), frames.len());
        Ok(SubtitleTrack {
            filename: path.to_string_lossy().into_owned(),
            uses_time,
            frames,
        })
    }

    /// SRT / WebVTT 通用解析：时间行 + 文本行，空行结束一条
    fn parse_cues(content: &str, parse_ts: fn(&str) -> Option<i64>) -> Vec<SubtitleFrame> {
        let mut frames = Vec::new();
        let mut current: Option<(i64, i64, Vec<String>)> = None;

        for (line_num, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                if let Some(cue) = current.take() {
                    Self::push_cue(&mut frames, cue);
                }
                continue;
            }

            if line.contains("-->") {
                let mut parts = line.split("-->");
                let start = parts.next().and_then(|s| parse_ts(s.trim()));
                // VTT 时间行后可能跟定位设置
                let end = parts
                    .next()
                    .and_then(|s| s.split_whitespace().next())
                    .and_then(parse_ts);
                match (start, end) {
                    (Some(start), Some(end)) => current = Some((start, end, Vec::new())),
                    _ => warn!("无法解析字幕时间行 (第{}行): {}", line_num + 1, line),
                }
                continue;
            }

            match current.as_mut() {
                Some((_, _, lines)) => lines.push(line.to_string()),
                // 序号行、WEBVTT 头、NOTE 块
                None => continue,
            }
        }

        if let Some(cue) = current {
            Self::push_cue(&mut frames, cue);
        }
        frames
    }

    fn push_cue(frames: &mut Vec<SubtitleFrame>, (start, end, lines): (i64, i64, Vec<String>)) {
        if lines.is_empty() {
            return;
        }
        frames.push(SubtitleFrame {
            pts: start,
            duration: end - start,
            end_pts: end,
            text: lines.join("\n"),
        });
    }

    /// 00:01:30,500 -> 90500
    fn parse_srt_timestamp(timestamp: &str) -> Option<i64> {
        let (hms, ms) = timestamp.split_once(',')?;
        let ms: i64 = ms.parse().ok()?;
        let parts: Vec<i64> = hms
            .split(':')
            .map(|p| p.parse().ok())
            .collect::<Option<Vec<_>>>()?;
        match parts.as_slice() {
            [h, m, s] => Some(h * 3_600_000 + m * 60_000 + s * 1000 + ms),
            _ => None,
        }
    }

    /// 00:01:30.500 或 01:30.500 -> 90500
    fn parse_vtt_timestamp(timestamp: &str) -> Option<i64> {
        let (hms, ms) = timestamp.split_once('.')?;
        let ms: i64 = ms.parse().ok()?;
        let parts: Vec<i64> = hms
            .split(':')
            .map(|p| p.parse().ok())
            .collect::<Option<Vec<_>>>()?;
        match parts.as_slice() {
            [m, s] => Some(m * 60_000 + s * 1000 + ms),
            [h, m, s] => Some(h * 3_600_000 + m * 60_000 + s * 1000 + ms),
            _ => None,
        }
    }

    /// 只读取 [Events] 段的 Dialogue 行
    fn parse_ass(content: &str) -> Vec<SubtitleFrame> {
        let mut frames = Vec::new();
        let mut in_events = false;

        for line in content.lines().map(str::trim) {
            if line.starts_with('[') && line.ends_with(']') {
                in_events = line.eq_ignore_ascii_case("[Events]");
                continue;
            }
            if !in_events {
                continue;
            }
            let Some(rest) = line.strip_prefix("Dialogue:") else {
                continue;
            };
            // Layer,Start,End,Style,Name,MarginL,MarginR,MarginV,Effect,Text
            let fields: Vec<&str> = rest.splitn(10, ',').collect();
            if fields.len() < 10 {
                continue;
            }
            let (Some(start), Some(end)) = (
                Self::parse_ass_timestamp(fields[1].trim()),
                Self::parse_ass_timestamp(fields[2].trim()),
            ) else {
                continue;
            };
            let text = Self::strip_ass_tags(fields[9]);
            if !text.is_empty() {
                frames.push(SubtitleFrame {
                    pts: start,
                    duration: end - start,
                    end_pts: end,
                    text,
                });
            }
        }
        frames
    }

    /// 0:01:30.50 -> 90500
    fn parse_ass_timestamp(timestamp: &str) -> Option<i64> {
        let (hms, cs) = timestamp.split_once('.')?;
        let cs: i64 = cs.parse().ok()?;
        let parts: Vec<i64> = hms
            .split(':')
            .map(|p| p.parse().ok())
            .collect::<Option<Vec<_>>>()?;
        match parts.as_slice() {
            [h, m, s] => Some(h * 3_600_000 + m * 60_000 + s * 1000 + cs * 10),
            _ => None,
        }
    }

    /// 去掉 {...} 覆盖标签，\N 换行
    fn strip_ass_tags(text: &str) -> String {
        let mut result = String::new();
        let mut in_tag = false;
        let mut chars = text.chars().peekable();

        while let Some(ch) = chars.next() {
            match ch {
                '{' => in_tag = true,
                '}' => in_tag = false,
                _ if in_tag => {}
                '\\' => match chars.peek() {
                    Some('N') | Some('n') => {
                        chars.next();
                        result.push('\n');
                    }
                    Some('h') => {
                        chars.next();
                        result.push(' ');
                    }
                    _ => result.push(ch),
                },
                _ => result.push(ch),
            }
        }
        result.trim().to_string()
    }

    /// MicroDVD: {起始帧}{结束帧}第一行|第二行
    fn parse_microdvd(content: &str) -> Vec<SubtitleFrame> {
        let mut frames = Vec::new();
        for line in content.lines().map(str::trim) {
            let Some((start, rest)) = Self::braced_number(line) else {
                continue;
            };
            let Some((end, text)) = Self::braced_number(rest) else {
                continue;
            };
            let text = text.replace('|', "\n");
            if text.trim().is_empty() {
                continue;
            }
            frames.push(SubtitleFrame {
                pts: start,
                duration: end - start,
                end_pts: end,
                text,
            });
        }
        frames
    }

    fn braced_number(s: &str) -> Option<(i64, &str)> {
        let inner = s.strip_prefix('{')?;
        let (num, rest) = inner.split_once('}')?;
        Some((num.trim().parse().ok()?, rest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_srt_timestamp() {
        assert_eq!(ExternalSubtitleParser::parse_srt_timestamp("00:01:30,500"), Some(90500));
        assert_eq!(ExternalSubtitleParser::parse_srt_timestamp("01:23:45,123"), Some(5025123));
        assert_eq!(ExternalSubtitleParser::parse_srt_timestamp("01:23:45"), None);
    }

    #[test]
    fn test_parse_ass_timestamp() {
        assert_eq!(ExternalSubtitleParser::parse_ass_timestamp("0:01:30.50"), Some(90500));
    }

    #[test]
    fn test_strip_ass_tags() {
        assert_eq!(ExternalSubtitleParser::strip_ass_tags("{\\b1}Hello{\\b0} World"), "Hello World");
        assert_eq!(ExternalSubtitleParser::strip_ass_tags("Line 1\\NLine 2"), "Line 1\nLine 2");
    }

    #[test]
    fn test_parse_srt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("movie.srt");
        let mut file = fs::File::create(&path).unwrap();
        write!(
            file,
            "1\n00:00:01,000 --> 00:00:02,500\nHello\nWorld\n\n2\n00:00:03,000 --> 00:00:04,000\nBye\n"
        )
        .unwrap();

        let track = ExternalSubtitleParser::parse_file(&path).unwrap();
        assert!(track.uses_time);
        assert_eq!(track.basename(), "movie.srt");
        assert_eq!(track.frames.len(), 2);
        assert_eq!(track.frames[0].text, "Hello\nWorld");
        assert_eq!(track.frames[0].end_pts, 2500);
        assert_eq!(track.frames[1].pts, 3000);
    }

    #[test]
    fn test_parse_vtt_with_settings() {
        let frames = ExternalSubtitleParser::parse_cues(
            "WEBVTT\n\n00:01.000 --> 00:02.000 align:start\nHi\n",
            ExternalSubtitleParser::parse_vtt_timestamp,
        );
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].pts, 1000);
        assert_eq!(frames[0].end_pts, 2000);
    }

    #[test]
    fn test_parse_microdvd() {
        let frames = ExternalSubtitleParser::parse_microdvd("{10}{50}Top|Bottom\n{60}{70}x\n");
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].pts, 10);
        assert_eq!(frames[0].text, "Top\nBottom");
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.txt");
        fs::write(&path, "hi").unwrap();
        assert!(ExternalSubtitleParser::parse_file(&path).is_err());
    }
}
