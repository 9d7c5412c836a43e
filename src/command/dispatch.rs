use super::{bridge, Command, CommandId, Pausing};
use crate::core::{Action, PropertyValue, Reply};
use crate::player::menu::MenuResult;
use crate::player::osd::{OsdFunction, OsdLayer};
use crate::player::playlist::EndReason;
use crate::player::{ExternalSubtitleParser, OsdSlot, PlaybackContext, SeekMode, SeekRequest};
use crate::property::helpers::round_ms;
use crate::property::Registry;
use log::{debug, error, info, warn};
use std::path::Path;

/// 无视频且使用终端 OSD 时的最高 OSD 等级
const MAX_TERM_OSD_LEVEL: i32 = 1;
const MAX_OSD_LEVEL: i32 = 3;

/// 命令执行后主循环的动作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum LoopControl {
    /// 继续当前帧
    Continue = 0,
    /// 中断当前帧，处理 seek / 跳转 / 退出
    Break = 1,
    /// 重新初始化播放
    Reinit = 2,
}

/// 执行一条命令
///
/// 先尝试属性桥接，再按命令分发；最后无条件执行暂停状态机
pub fn execute(cmd: &Command, ctx: &mut PlaybackContext) -> LoopControl {
    let mut pausing = cmd.pausing;
    let control = if bridge::try_dispatch(cmd, ctx) {
        LoopControl::Continue
    } else {
        run_command(cmd, ctx, &mut pausing)
    };

    match pausing {
        Pausing::None => {}
        Pausing::Pause => ctx.osd.function = OsdFunction::Pause,
        Pausing::Toggle | Pausing::Keep => {
            if pausing == Pausing::Toggle {
                ctx.was_paused = !ctx.was_paused;
            }
            if ctx.was_paused {
                ctx.osd.function = OsdFunction::Pause;
            }
        }
    }
    control
}

fn show_text(ctx: &mut PlaybackContext, slot: OsdSlot, text: &str) {
    let duration = ctx.osd_duration();
    ctx.osd.set_message(slot, 1, duration, text);
}

fn run_command(cmd: &Command, ctx: &mut PlaybackContext, pausing: &mut Pausing) -> LoopControl {
    match cmd.id {
        CommandId::Seek => {
            seek(cmd, ctx);
            return LoopControl::Break;
        }

        CommandId::SetProperty => {
            let (name, value) = (cmd.string(0), cmd.string(1));
            match Registry::find(name) {
                None => warn!("未知属性: '{}'", name),
                Some(prop) => {
                    if let Err(e) = Registry::dispatch(prop, Action::Parse(value.to_string()), ctx) {
                        warn!("设置属性 '{}' 为 '{}' 失败: {}", name, value, e);
                    }
                }
            }
        }

        CommandId::StepProperty => {
            let name = cmd.string(0);
            let step = cmd.float(1);
            let arg = (step != 0.0).then_some(PropertyValue::Float(step));
            match Registry::find(name) {
                None => warn!("未知属性: '{}'", name),
                Some(prop) => {
                    if let Err(e) = Registry::dispatch(prop, Action::StepUp(arg), ctx) {
                        warn!("调整属性 '{}' 失败: {}", name, e);
                    }
                }
            }
        }

        CommandId::GetProperty => {
            let name = cmd.string(0);
            match Registry::find(name) {
                None => warn!("未知属性: '{}'", name),
                Some(prop) => match Registry::dispatch(prop, Action::Get, ctx) {
                    Ok(Reply::Value(v)) => ctx.status.answer(name, v.format_plain()),
                    Ok(_) => warn!("属性 '{}' 没有返回值", name),
                    Err(e) => warn!("读取属性 '{}' 失败: {}", name, e),
                },
            }
        }

        CommandId::EdlMark => {
            if ctx.edl.is_active() {
                let pts = ctx.playing_pts();
                match ctx.edl.mark(pts) {
                    Ok(Some(mark)) => debug!("EDL 标记: {:?}", mark),
                    Ok(None) => {}
                    Err(e) => warn!("写入 EDL 失败: {}", e),
                }
            }
        }

        CommandId::SwitchRatio => {
            if let Some(video) = ctx.video.as_ref() {
                let (width, height) = (video.width, video.height);
                let aspect = if cmd.nargs == 0 || cmd.float(0) == -1.0 {
                    width as f32 / height.max(1) as f32
                } else {
                    cmd.float(0)
                };
                ctx.movie_aspect = aspect;
                if let Some(pipeline) = ctx.pipeline.as_mut() {
                    pipeline.configure_vo(width, height, aspect);
                }
            }
        }

        CommandId::SpeedIncr | CommandId::SpeedMult | CommandId::SpeedSet => {
            let v = cmd.float(0);
            match cmd.id {
                CommandId::SpeedIncr => ctx.speed += v,
                CommandId::SpeedMult => ctx.speed *= v,
                _ => ctx.speed = v,
            }
            ctx.rebuild_audio_filters();
            let text = format!("Speed: x {:6.2}", ctx.speed);
            show_text(ctx, OsdSlot::Speed, &text);
        }

        CommandId::Pause | CommandId::FrameStep => {
            *pausing = Pausing::Pause;
            return LoopControl::Break;
        }

        CommandId::FileFilter => ctx.file_filter = cmd.int(0) != 0,

        CommandId::Quit => {
            let code = if cmd.nargs > 0 { cmd.int(0) } else { 0 };
            ctx.request_exit(code);
            return LoopControl::Break;
        }

        CommandId::PlayTreeStep => {
            let n = match cmd.int(0) {
                0 => 1,
                n => n,
            };
            let force = cmd.int(1) != 0;
            let reason = if n > 0 { EndReason::NextEntry } else { EndReason::PrevEntry };
            match ctx.playlist.as_ref() {
                Some(playlist) if !force => {
                    if playlist.can_step(n) {
                        ctx.eof = Some(reason);
                    }
                }
                _ => ctx.eof = Some(reason),
            }
            if ctx.eof.is_some() {
                ctx.play_tree_step = n;
            }
            return LoopControl::Break;
        }

        CommandId::PlayTreeUpStep => {
            let n = if cmd.int(0) > 0 { 1 } else { -1 };
            if ctx.playlist.as_ref().is_some_and(|p| p.can_up_step(n)) {
                ctx.eof = Some(if n > 0 { EndReason::UpNext } else { EndReason::UpPrev });
            }
            return LoopControl::Break;
        }

        CommandId::PlayAltSrcStep => {
            if let Some(playlist) = ctx.playlist.as_ref() {
                let (count, file) = (playlist.file_count(), playlist.current_file());
                let v = cmd.int(0);
                if count > 1 {
                    if v > 0 && file < count {
                        ctx.eof = Some(EndReason::NextSrc);
                    } else if v < 0 && file > 1 {
                        ctx.eof = Some(EndReason::PrevSrc);
                    }
                }
            }
            return LoopControl::Break;
        }

        CommandId::SubStep => {
            if let Some(video) = ctx.video.as_ref() {
                let (pts, fps) = (video.pts, video.fps);
                ctx.subs.step(pts, fps, cmd.int(0));
                let text = format!("Sub delay: {} ms", round_ms(ctx.subs.delay));
                show_text(ctx, OsdSlot::SubDelay, &text);
            }
        }

        CommandId::SubLog => {
            if let Some(video) = ctx.video.as_ref() {
                let (pts, fps) = (video.pts, video.fps);
                let media = ctx.filename.as_deref().unwrap_or("");
                match ctx.subs.log_current(&ctx.config.subtitle_log, media, pts, fps) {
                    Ok(true) => info!("字幕已记录到 {}", ctx.config.subtitle_log.display()),
                    Ok(false) => debug!("当前没有可记录的字幕"),
                    Err(e) => warn!("写入字幕日志失败: {}", e),
                }
            }
        }

        CommandId::SubLoad => {
            if ctx.video.is_some() {
                let path = cmd.string(0);
                match ExternalSubtitleParser::parse_file(Path::new(path)) {
                    Ok(track) => {
                        info!("已加载字幕文件: {} ({} 条)", track.filename, track.frames.len());
                        ctx.subs.add_track(track);
                    }
                    Err(e) => warn!("无法加载字幕 {}: {}", path, e),
                }
            }
        }

        CommandId::SubRemove => {
            if ctx.video.is_some() && ctx.subs.remove_tracks(cmd.int(0)) {
                ctx.osd.mark_changed(OsdLayer::Subtitle);
                if let Some(pipeline) = ctx.pipeline.as_mut() {
                    pipeline.refresh_subtitles();
                }
                ctx.queued.push_back("sub_select".to_string());
            }
        }

        CommandId::Osd => osd(cmd, ctx),

        CommandId::OsdShowText | CommandId::OsdShowPropertyText => {
            let text = if cmd.id == CommandId::OsdShowPropertyText {
                Registry::expand_template(cmd.string(0), ctx)
            } else {
                cmd.string(0).to_string()
            };
            let duration = match cmd.int(1) {
                d if d < 0 => ctx.osd_duration(),
                d => d as u32,
            };
            ctx.osd.set_message(OsdSlot::Text, cmd.int(2), duration, &text);
        }

        CommandId::Loadfile => {
            let append = cmd.int(1) != 0;
            match ctx.playlist.as_mut() {
                Some(playlist) => playlist.load_file(cmd.string(0), append),
                None => warn!("没有播放列表，忽略 loadfile"),
            }
            if !append {
                ctx.eof = Some(EndReason::NextSrc);
            }
            return LoopControl::Break;
        }

        CommandId::Loadlist => {
            let append = cmd.int(1) != 0;
            let loaded = ctx
                .playlist
                .as_mut()
                .is_some_and(|p| p.load_list(cmd.string(0), append));
            if !loaded {
                error!("无法加载播放列表 {}", cmd.string(0));
            } else if !append {
                ctx.eof = Some(EndReason::NextSrc);
            }
            return LoopControl::Break;
        }

        #[cfg(feature = "tv")]
        CommandId::TvSetFreq
        | CommandId::TvStepFreq
        | CommandId::TvSetNorm
        | CommandId::TvStepNorm
        | CommandId::TvStepChannel
        | CommandId::TvSetChannel
        | CommandId::TvLastChannel
        | CommandId::TvStepChanlist => tv_command(cmd, ctx),

        #[cfg(feature = "radio")]
        CommandId::RadioStepChannel
        | CommandId::RadioSetChannel
        | CommandId::RadioSetFreq
        | CommandId::RadioStepFreq => radio_command(cmd, ctx),

        #[cfg(feature = "dvb")]
        CommandId::DvbSetChannel => dvb_set_channel(cmd, ctx),

        CommandId::GetSubVisibility => {
            if ctx.video.is_some() {
                ctx.status.answer("SUB_VISIBILITY", ctx.subs.visibility as i32);
            }
        }

        CommandId::GetTimeLength => {
            let length = ctx.demuxer.as_ref().map(|d| d.time_length()).unwrap_or(0.0);
            ctx.status.answer("LENGTH", format!("{:.2}", length));
        }

        CommandId::GetFileName => {
            let name = ctx.basename().unwrap_or("").to_string();
            ctx.status.answer_quoted("FILENAME", &name);
        }

        CommandId::GetVideoCodec
        | CommandId::GetVideoBitrate
        | CommandId::GetVideoResolution
        | CommandId::GetAudioCodec
        | CommandId::GetAudioBitrate
        | CommandId::GetAudioSamples => stream_info(cmd.id, ctx),

        CommandId::GetMetaTitle
        | CommandId::GetMetaArtist
        | CommandId::GetMetaAlbum
        | CommandId::GetMetaYear
        | CommandId::GetMetaComment
        | CommandId::GetMetaTrack
        | CommandId::GetMetaGenre => meta_info(cmd.id, ctx),

        CommandId::GetVoFullscreen => {
            if ctx.video_out.as_ref().is_some_and(|vo| vo.is_configured()) {
                ctx.status.answer("VO_FULLSCREEN", ctx.vo_flags.fullscreen as i32);
            }
        }

        CommandId::GetPercentPos => {
            if let Some(demuxer) = ctx.demuxer.as_ref() {
                ctx.status.answer("PERCENT_POSITION", demuxer.percent_pos());
            }
        }

        CommandId::GetTimePos => {
            let pos = ctx.playing_pts();
            ctx.status.answer("TIME_POSITION", format!("{:.1}", pos));
        }

        CommandId::Screenshot => {
            if ctx.video_out.as_ref().is_some_and(|vo| vo.is_configured()) {
                let mode = cmd.int(0);
                let taken = ctx.video_filter.as_mut().is_some_and(|f| f.screenshot(mode));
                if !taken {
                    if let Some(vo) = ctx.video_out.as_mut() {
                        vo.control(crate::player::video_out::VoControl::Screenshot);
                    }
                }
            }
        }

        CommandId::ChangeRectangle => {
            if let Some(filter) = ctx.video_filter.as_mut() {
                filter.change_rectangle(cmd.int(0), cmd.int(1));
            }
        }

        CommandId::Run => run_shell(cmd.string(0)),

        CommandId::KeyDownEvent => ctx.keys.push_back(cmd.int(0)),

        CommandId::SeekChapter => seek_chapter(cmd, ctx),

        CommandId::SetMousePos => set_mouse_pos(cmd, ctx),

        CommandId::Dvdnav => {
            let Some(menu) = ctx.menu.as_mut() else {
                return LoopControl::Continue;
            };
            match menu.handle_input(cmd.int(0)) {
                MenuResult::Reinit => {
                    info!("菜单切换标题，重新初始化播放");
                    let keep_vo = ctx.config.fixed_vo;
                    if let Some(pipeline) = ctx.pipeline.as_mut() {
                        pipeline.uninit_audio();
                        pipeline.uninit_video(keep_vo);
                    }
                    ctx.audio = None;
                    ctx.video = None;
                    return LoopControl::Reinit;
                }
                MenuResult::Selected(button) => {
                    if button > 0 {
                        let text = format!("Selected button number {}", button);
                        show_text(ctx, OsdSlot::Text, &text);
                    }
                }
                MenuResult::Idle => {}
            }
        }

        other => debug!("命令 {:?} 未处理", other),
    }
    LoopControl::Continue
}

fn seek(cmd: &Command, ctx: &mut PlaybackContext) {
    let v = cmd.float(0) as f64;
    if let Some(video) = ctx.video.as_ref() {
        ctx.osd.show_percentage = video.fps;
    }
    let mode = if cmd.nargs > 1 { cmd.int(1) } else { 0 };
    match mode {
        2 => {
            if let Some(video) = ctx.video.as_ref() {
                ctx.osd.function = if v > video.pts { OsdFunction::Ffw } else { OsdFunction::Rew };
            }
            ctx.seek = Some(SeekRequest {
                target: v,
                mode: SeekMode::Absolute,
            });
        }
        0 => {
            // 相对 seek 累加到尚未执行的请求上
            ctx.seek = Some(match ctx.seek {
                Some(pending) => SeekRequest {
                    target: pending.target + v,
                    mode: pending.mode,
                },
                None => SeekRequest {
                    target: v,
                    mode: SeekMode::Relative,
                },
            });
            ctx.osd.function = if v > 0.0 { OsdFunction::Ffw } else { OsdFunction::Rew };
        }
        _ => {
            if ctx.video.is_some() {
                ctx.osd.function = OsdFunction::Ffw;
            }
            ctx.seek = Some(SeekRequest {
                target: v / 100.0,
                mode: SeekMode::Percent,
            });
        }
    }
}

fn osd(cmd: &Command, ctx: &mut PlaybackContext) {
    let v = cmd.int(0);
    let max = if ctx.config.term_osd && ctx.video.is_none() {
        MAX_TERM_OSD_LEVEL
    } else {
        MAX_OSD_LEVEL
    };
    if ctx.osd_level > max {
        ctx.osd_level = max;
    }
    ctx.osd_level = if v < 0 {
        (ctx.osd_level + 1) % (max + 1)
    } else {
        v.min(max)
    };
    // 显式给出等级时不提示
    if v == -1 && ctx.osd_level <= 1 {
        let state = if ctx.osd_level != 0 { "enabled" } else { "disabled" };
        let duration = ctx.osd_duration();
        ctx.osd
            .set_message(OsdSlot::OsdStatus, 0, duration, &format!("OSD: {}", state));
    } else {
        ctx.osd.remove_message(OsdSlot::OsdStatus);
    }
}

#[cfg(feature = "tv")]
fn tv_command(cmd: &Command, ctx: &mut PlaybackContext) {
    let Some(tuner) = ctx.tv.as_mut() else {
        debug!("没有电视源，忽略 {:?}", cmd.id);
        return;
    };
    let mut channel_changed = false;
    match cmd.id {
        CommandId::TvSetFreq => tuner.set_freq((cmd.float(0) * 16.0) as i64),
        CommandId::TvStepFreq => tuner.step_freq((cmd.float(0) * 16.0) as i64),
        CommandId::TvSetNorm => tuner.set_norm(cmd.string(0)),
        CommandId::TvStepNorm => tuner.step_norm(),
        CommandId::TvStepChanlist => tuner.step_chanlist(),
        CommandId::TvStepChannel => {
            tuner.step_channel(cmd.int(0) > 0);
            channel_changed = true;
        }
        CommandId::TvSetChannel => {
            tuner.set_channel(cmd.string(0));
            channel_changed = true;
        }
        CommandId::TvLastChannel => {
            tuner.last_channel();
            channel_changed = true;
        }
        _ => {}
    }
    if channel_changed {
        if let Some(name) = tuner.channel_name() {
            show_text(ctx, OsdSlot::TvChannel, &format!("Channel: {}", name));
        }
    }
}

#[cfg(feature = "radio")]
fn radio_command(cmd: &Command, ctx: &mut PlaybackContext) {
    let Some(tuner) = ctx.radio.as_mut() else {
        debug!("没有收音机源，忽略 {:?}", cmd.id);
        return;
    };
    match cmd.id {
        CommandId::RadioSetFreq => tuner.set_freq(cmd.float(0)),
        CommandId::RadioStepFreq => tuner.step_freq(cmd.float(0)),
        CommandId::RadioStepChannel | CommandId::RadioSetChannel => {
            if cmd.id == CommandId::RadioStepChannel {
                tuner.step_channel(cmd.int(0) > 0);
            } else {
                tuner.set_channel(cmd.string(0));
            }
            if let Some(name) = tuner.channel_name() {
                show_text(ctx, OsdSlot::RadioChannel, &format!("Channel: {}", name));
            }
        }
        _ => {}
    }
}

/// `dvb_set_channel <channel> <card>`
#[cfg(feature = "dvb")]
fn dvb_set_channel(cmd: &Command, ctx: &mut PlaybackContext) {
    let Some(tuner) = ctx.dvb.as_mut() else {
        debug!("没有数字电视源，忽略换台");
        return;
    };
    if !tuner.is_on() {
        return;
    }
    let (channel, card) = (cmd.int(0), cmd.int(1));
    ctx.last_dvb_step = if tuner.current_channel() <= channel { 1 } else { -1 };
    if tuner.set_channel(card, channel) {
        info!("数字电视切换到频道 {} (卡 {})", channel, card);
        ctx.eof = Some(EndReason::NextEntry);
        ctx.dvb_reopen = true;
    }
}

fn stream_info(id: CommandId, ctx: &mut PlaybackContext) {
    let video = ctx.video.as_ref();
    let audio = ctx.audio.as_ref();
    let (name, value) = match id {
        CommandId::GetVideoCodec => ("VIDEO_CODEC", video.map(|v| v.codec.clone())),
        CommandId::GetVideoBitrate => (
            "VIDEO_BITRATE",
            video.map(|v| format!("{} kbps", v.bitrate * 8 / 1000)),
        ),
        CommandId::GetVideoResolution => (
            "VIDEO_RESOLUTION",
            video.map(|v| format!("{} x {}", v.width, v.height)),
        ),
        CommandId::GetAudioCodec => ("AUDIO_CODEC", audio.map(|a| a.codec.clone())),
        CommandId::GetAudioBitrate => (
            "AUDIO_BITRATE",
            audio.map(|a| format!("{} kbps", a.bitrate * 8 / 1000)),
        ),
        _ => (
            "AUDIO_SAMPLES",
            audio.map(|a| format!("{} Hz, {} ch.", a.samplerate, a.channels)),
        ),
    };
    ctx.status.answer_quoted(name, value.as_deref().unwrap_or(""));
}

fn meta_info(id: CommandId, ctx: &mut PlaybackContext) {
    let (name, tag) = match id {
        CommandId::GetMetaTitle => ("META_TITLE", "Title"),
        CommandId::GetMetaArtist => ("META_ARTIST", "Artist"),
        CommandId::GetMetaAlbum => ("META_ALBUM", "Album"),
        CommandId::GetMetaYear => ("META_YEAR", "Year"),
        CommandId::GetMetaComment => ("META_COMMENT", "Comment"),
        CommandId::GetMetaTrack => ("META_TRACK", "Track"),
        _ => ("META_GENRE", "Genre"),
    };
    let value = ctx.demuxer.as_ref().and_then(|d| d.info_tag(tag));
    ctx.status.answer_quoted(name, value.as_deref().unwrap_or(""));
}

fn seek_chapter(cmd: &Command, ctx: &mut PlaybackContext) {
    let step = cmd.int(0);
    let absolute = cmd.nargs > 1 && cmd.int(1) != 0;
    ctx.seek = None;
    let Some(demuxer) = ctx.demuxer.as_mut() else {
        return;
    };
    match demuxer.seek_chapter(step, absolute) {
        Some(chapter) => {
            if let Some(pts) = chapter.next_pts {
                ctx.seek = Some(SeekRequest {
                    target: pts,
                    mode: SeekMode::Absolute,
                });
            }
            if let Some(name) = chapter.name {
                let text = format!("Chapter: ({}) {}", chapter.chapter + 1, name);
                show_text(ctx, OsdSlot::Text, &text);
            }
        }
        None => {
            if step > 0 {
                // 超出最后一章，跳到结尾
                ctx.seek = Some(SeekRequest {
                    target: 1e9,
                    mode: SeekMode::Relative,
                });
            } else {
                show_text(ctx, OsdSlot::Text, "Chapter: (0) unknown");
            }
        }
    }
}

fn set_mouse_pos(cmd: &Command, ctx: &mut PlaybackContext) {
    let (Some(vo), Some(video)) = (ctx.video_out.as_ref(), ctx.video.as_ref()) else {
        return;
    };
    let Some((dx, dy)) = vo.geometry().rescale(cmd.int(0), cmd.int(1), ctx.vo_flags.fullscreen) else {
        return;
    };
    if dx <= 0.0 || dy <= 0.0 {
        return;
    }
    let x = (dx * video.width as f64) as i32;
    let y = (dy * video.height as f64) as i32;
    let Some(menu) = ctx.menu.as_mut() else {
        return;
    };
    if let Some(button) = menu.update_mouse(x, y) {
        if button > 0 {
            let text = format!("Selected button number {}", button);
            show_text(ctx, OsdSlot::Text, &text);
        }
    }
}

#[cfg(unix)]
fn run_shell(command: &str) {
    match std::process::Command::new("sh").arg("-c").arg(command).spawn() {
        Ok(child) => info!("已启动外部命令 (pid {}): {}", child.id(), command),
        Err(e) => warn!("无法执行外部命令 '{}': {}", command, e),
    }
}

#[cfg(not(unix))]
fn run_shell(command: &str) {
    warn!("当前平台不支持 run 命令: {}", command);
}
