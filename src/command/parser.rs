use super::{Command, CommandArg, CommandId, Pausing};
use crate::core::{ControlError, Result};
use log::debug;

/// 参数声明，`Some` 表示可选参数及其默认值
#[derive(Debug, Clone, Copy)]
enum ArgSpec {
    Int(Option<i32>),
    Float(Option<f32>),
    Str(Option<&'static str>),
}

impl ArgSpec {
    fn default_value(&self) -> Option<CommandArg> {
        match *self {
            ArgSpec::Int(d) => d.map(CommandArg::Int),
            ArgSpec::Float(d) => d.map(CommandArg::Float),
            ArgSpec::Str(d) => d.map(|s| CommandArg::String(s.to_string())),
        }
    }
}

struct CommandSpec {
    name: &'static str,
    id: CommandId,
    args: &'static [ArgSpec],
}

const INT: ArgSpec = ArgSpec::Int(None);
const FLOAT: ArgSpec = ArgSpec::Float(None);
const STR: ArgSpec = ArgSpec::Str(None);

macro_rules! spec {
    ($name:expr, $id:ident) => {
        CommandSpec { name: $name, id: CommandId::$id, args: &[] }
    };
    ($name:expr, $id:ident, $($arg:expr),+) => {
        CommandSpec { name: $name, id: CommandId::$id, args: &[$($arg),+] }
    };
}

static COMMANDS: &[CommandSpec] = &[
    spec!("seek", Seek, FLOAT, ArgSpec::Int(Some(0))),
    spec!("edl_mark", EdlMark),
    spec!("audio_delay", AudioDelay, FLOAT, ArgSpec::Int(Some(0))),
    spec!("speed_incr", SpeedIncr, FLOAT),
    spec!("speed_mult", SpeedMult, FLOAT),
    spec!("speed_set", SpeedSet, FLOAT),
    spec!("quit", Quit, ArgSpec::Int(Some(0))),
    spec!("pause", Pause),
    spec!("frame_step", FrameStep),
    spec!("pt_step", PlayTreeStep, INT, ArgSpec::Int(Some(0))),
    spec!("pt_up_step", PlayTreeUpStep, INT, ArgSpec::Int(Some(0))),
    spec!("alt_src_step", PlayAltSrcStep, INT),
    spec!("sub_delay", SubDelay, FLOAT, ArgSpec::Int(Some(0))),
    spec!("sub_step", SubStep, INT, ArgSpec::Int(Some(0))),
    spec!("osd", Osd, ArgSpec::Int(Some(-1))),
    spec!("osd_show_text", OsdShowText, STR, ArgSpec::Int(Some(-1)), ArgSpec::Int(Some(0))),
    spec!("osd_show_property_text", OsdShowPropertyText, STR, ArgSpec::Int(Some(-1)), ArgSpec::Int(Some(0))),
    spec!("volume", Volume, FLOAT, ArgSpec::Int(Some(0))),
    spec!("mute", Mute, ArgSpec::Int(Some(-1))),
    spec!("contrast", Contrast, INT, ArgSpec::Int(Some(0))),
    spec!("gamma", Gamma, INT, ArgSpec::Int(Some(0))),
    spec!("brightness", Brightness, INT, ArgSpec::Int(Some(0))),
    spec!("hue", Hue, INT, ArgSpec::Int(Some(0))),
    spec!("saturation", Saturation, INT, ArgSpec::Int(Some(0))),
    spec!("frame_drop", Framedropping, ArgSpec::Int(Some(-1))),
    spec!("sub_pos", SubPos, INT, ArgSpec::Int(Some(0))),
    spec!("sub_alignment", SubAlignment, ArgSpec::Int(Some(-1))),
    spec!("sub_visibility", SubVisibility, ArgSpec::Int(Some(-1))),
    spec!("sub_load", SubLoad, STR),
    spec!("sub_remove", SubRemove, ArgSpec::Int(Some(-1))),
    spec!("sub_select", SubSelect, ArgSpec::Int(Some(-2))),
    spec!("sub_log", SubLog),
    spec!("sub_forced_only", SubForcedOnly, ArgSpec::Int(Some(-1))),
    spec!("get_percent_pos", GetPercentPos),
    spec!("get_time_pos", GetTimePos),
    spec!("get_time_length", GetTimeLength),
    spec!("get_file_name", GetFileName),
    spec!("get_video_codec", GetVideoCodec),
    spec!("get_video_bitrate", GetVideoBitrate),
    spec!("get_video_resolution", GetVideoResolution),
    spec!("get_audio_codec", GetAudioCodec),
    spec!("get_audio_bitrate", GetAudioBitrate),
    spec!("get_audio_samples", GetAudioSamples),
    spec!("get_meta_title", GetMetaTitle),
    spec!("get_meta_artist", GetMetaArtist),
    spec!("get_meta_album", GetMetaAlbum),
    spec!("get_meta_year", GetMetaYear),
    spec!("get_meta_comment", GetMetaComment),
    spec!("get_meta_track", GetMetaTrack),
    spec!("get_meta_genre", GetMetaGenre),
    spec!("get_sub_visibility", GetSubVisibility),
    spec!("get_vo_fullscreen", GetVoFullscreen),
    spec!("switch_audio", SwitchAudio, ArgSpec::Int(Some(-1))),
    spec!("switch_ratio", SwitchRatio, ArgSpec::Float(Some(0.0))),
    spec!("vo_fullscreen", VoFullscreen, ArgSpec::Int(Some(-1))),
    spec!("vo_ontop", VoOntop, ArgSpec::Int(Some(-1))),
    spec!("vo_rootwin", VoRootwin, ArgSpec::Int(Some(-1))),
    spec!("vo_border", VoBorder, ArgSpec::Int(Some(-1))),
    spec!("screenshot", Screenshot, ArgSpec::Int(Some(0))),
    spec!("panscan", Panscan, FLOAT, ArgSpec::Int(Some(0))),
    spec!("switch_vsync", SwitchVsync, ArgSpec::Int(Some(0))),
    spec!("loadfile", Loadfile, STR, ArgSpec::Int(Some(0))),
    spec!("loadlist", Loadlist, STR, ArgSpec::Int(Some(0))),
    spec!("run", Run, STR),
    spec!("change_rectangle", ChangeRectangle, INT, INT),
    spec!("tv_step_channel", TvStepChannel, INT),
    spec!("tv_step_norm", TvStepNorm),
    spec!("tv_step_chanlist", TvStepChanlist),
    spec!("tv_set_channel", TvSetChannel, STR),
    spec!("tv_last_channel", TvLastChannel),
    spec!("tv_set_freq", TvSetFreq, FLOAT),
    spec!("tv_step_freq", TvStepFreq, FLOAT),
    spec!("tv_set_norm", TvSetNorm, STR),
    spec!("radio_step_channel", RadioStepChannel, INT),
    spec!("radio_set_channel", RadioSetChannel, STR),
    spec!("radio_set_freq", RadioSetFreq, FLOAT),
    spec!("radio_step_freq", RadioStepFreq, FLOAT),
    spec!("dvb_set_channel", DvbSetChannel, INT, INT),
    spec!("tv_set_brightness", TvSetBrightness, INT, ArgSpec::Int(Some(0))),
    spec!("tv_set_contrast", TvSetContrast, INT, ArgSpec::Int(Some(0))),
    spec!("tv_set_hue", TvSetHue, INT, ArgSpec::Int(Some(0))),
    spec!("tv_set_saturation", TvSetSaturation, INT, ArgSpec::Int(Some(0))),
    spec!("dvdnav", Dvdnav, INT),
    spec!("set_mouse_pos", SetMousePos, INT, INT),
    spec!("key_down_event", KeyDownEvent, INT),
    spec!("seek_chapter", SeekChapter, INT, ArgSpec::Int(Some(0))),
    spec!("file_filter", FileFilter, INT),
    spec!("set_property", SetProperty, STR, STR),
    spec!("step_property", StepProperty, STR, ArgSpec::Float(Some(0.0))),
    spec!("get_property", GetProperty, STR),
];

/// 命令名（用于帮助和日志）
pub fn command_names() -> impl Iterator<Item = &'static str> {
    COMMANDS.iter().map(|c| c.name)
}

/// 拆出下一个参数，支持单引号或双引号包裹，引号内可用反斜杠转义
fn next_token(input: &str) -> Option<(String, &str)> {
    let input = input.trim_start();
    let mut chars = input.char_indices();
    let (_, first) = chars.next()?;

    if first == '"' || first == '\'' {
        let mut token = String::new();
        let mut escaped = false;
        for (i, c) in chars {
            if escaped {
                token.push(c);
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == first {
                return Some((token, &input[i + c.len_utf8()..]));
            } else {
                token.push(c);
            }
        }
        // 没有闭合引号，取到行尾
        return Some((token, ""));
    }

    let end = input.find(char::is_whitespace).unwrap_or(input.len());
    Some((input[..end].to_string(), &input[end..]))
}

fn parse_arg(spec: ArgSpec, token: &str, command: &str) -> Result<CommandArg> {
    let bad = || ControlError::BadArgument(format!("{}: '{}'", command, token));
    match spec {
        ArgSpec::Int(_) => token
            .parse::<i32>()
            .ok()
            .or_else(|| token.parse::<f64>().ok().map(|v| v as i32))
            .map(CommandArg::Int)
            .ok_or_else(bad),
        ArgSpec::Float(_) => token.parse::<f32>().map(CommandArg::Float).map_err(|_| bad()),
        ArgSpec::Str(_) => Ok(CommandArg::String(token.to_string())),
    }
}

/// 解析一行文本命令
pub fn parse_command(line: &str) -> Result<Command> {
    let mut rest = line.trim();
    let mut pausing = Pausing::None;

    let (first, after) = next_token(rest).ok_or_else(|| ControlError::UnknownCommand(String::new()))?;
    let prefix = match first.as_str() {
        "pausing" => Some(Pausing::Pause),
        "pausing_keep" => Some(Pausing::Keep),
        "pausing_toggle" => Some(Pausing::Toggle),
        _ => None,
    };
    if let Some(p) = prefix {
        pausing = p;
        rest = after;
    }

    let (name, mut rest) =
        next_token(rest).ok_or_else(|| ControlError::UnknownCommand(first.clone()))?;
    let spec = COMMANDS
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(&name))
        .ok_or_else(|| ControlError::UnknownCommand(name.clone()))?;

    let mut args = Vec::with_capacity(spec.args.len());
    let mut nargs = 0;
    for arg_spec in spec.args {
        // 字符串参数前的空白由 next_token 处理
        match next_token(rest) {
            Some((token, after)) => {
                args.push(parse_arg(*arg_spec, &token, spec.name)?);
                nargs += 1;
                rest = after;
            }
            None => match arg_spec.default_value() {
                Some(default) => args.push(default),
                None => {
                    return Err(ControlError::BadArgument(format!(
                        "{} 需要至少 {} 个参数",
                        spec.name,
                        spec.args.iter().filter(|a| a.default_value().is_none()).count()
                    )))
                }
            },
        }
    }
    if !rest.trim().is_empty() {
        debug!("命令 {} 忽略多余参数: {}", spec.name, rest.trim());
    }

    Ok(Command {
        id: spec.id,
        args,
        nargs,
        pausing,
    })
}
