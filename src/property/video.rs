use super::helpers;
use super::{Constraint, PropertyDescriptor, PropertyHandler, Registry};
use crate::core::{Action, PropertyError, PropertyResult, PropertyValue, Reply, ValueKind};
use crate::player::context::COLOR_UNREAD;
use crate::player::video_out::{ColorChannel, VoControl};
use crate::player::{PlaybackContext, TrackId};
use log::info;

/// 视频属性
pub enum Video {
    /// 窗口状态开关（全屏、置顶、根窗口、边框）
    VoFlag(VoControl),
    Deinterlace,
    Framedropping,
    Color(ColorChannel),
    Panscan,
    Vsync,
    Format,
    Bitrate,
    Width,
    Height,
    Fps,
    Aspect,
    SwitchVideo,
    SwitchProgram,
}

pub static PROPERTIES: [PropertyDescriptor; 21] = [
    PropertyDescriptor { name: "fullscreen", kind: ValueKind::Flag, constraint: Constraint::RANGE, min: 0.0, max: 1.0, handler: &Video::VoFlag(VoControl::Fullscreen) },
    PropertyDescriptor { name: "deinterlace", kind: ValueKind::Flag, constraint: Constraint::RANGE, min: 0.0, max: 1.0, handler: &Video::Deinterlace },
    PropertyDescriptor { name: "ontop", kind: ValueKind::Flag, constraint: Constraint::RANGE, min: 0.0, max: 1.0, handler: &Video::VoFlag(VoControl::Ontop) },
    PropertyDescriptor { name: "rootwin", kind: ValueKind::Flag, constraint: Constraint::RANGE, min: 0.0, max: 1.0, handler: &Video::VoFlag(VoControl::Rootwin) },
    PropertyDescriptor { name: "border", kind: ValueKind::Flag, constraint: Constraint::RANGE, min: 0.0, max: 1.0, handler: &Video::VoFlag(VoControl::Border) },
    PropertyDescriptor { name: "framedropping", kind: ValueKind::Choice, constraint: Constraint::RANGE, min: 0.0, max: 2.0, handler: &Video::Framedropping },
    PropertyDescriptor { name: "gamma", kind: ValueKind::Int, constraint: Constraint::RANGE, min: -100.0, max: 100.0, handler: &Video::Color(ColorChannel::Gamma) },
    PropertyDescriptor { name: "brightness", kind: ValueKind::Int, constraint: Constraint::RANGE, min: -100.0, max: 100.0, handler: &Video::Color(ColorChannel::Brightness) },
    PropertyDescriptor { name: "contrast", kind: ValueKind::Int, constraint: Constraint::RANGE, min: -100.0, max: 100.0, handler: &Video::Color(ColorChannel::Contrast) },
    PropertyDescriptor { name: "saturation", kind: ValueKind::Int, constraint: Constraint::RANGE, min: -100.0, max: 100.0, handler: &Video::Color(ColorChannel::Saturation) },
    PropertyDescriptor { name: "hue", kind: ValueKind::Int, constraint: Constraint::RANGE, min: -100.0, max: 100.0, handler: &Video::Color(ColorChannel::Hue) },
    PropertyDescriptor { name: "panscan", kind: ValueKind::Float, constraint: Constraint::RANGE, min: 0.0, max: 1.0, handler: &Video::Panscan },
    PropertyDescriptor { name: "vsync", kind: ValueKind::Flag, constraint: Constraint::RANGE, min: 0.0, max: 1.0, handler: &Video::Vsync },
    PropertyDescriptor { name: "video_format", kind: ValueKind::Int, constraint: Constraint::empty(), min: 0.0, max: 0.0, handler: &Video::Format },
    PropertyDescriptor { name: "video_bitrate", kind: ValueKind::Int, constraint: Constraint::empty(), min: 0.0, max: 0.0, handler: &Video::Bitrate },
    PropertyDescriptor { name: "width", kind: ValueKind::Int, constraint: Constraint::empty(), min: 0.0, max: 0.0, handler: &Video::Width },
    PropertyDescriptor { name: "height", kind: ValueKind::Int, constraint: Constraint::empty(), min: 0.0, max: 0.0, handler: &Video::Height },
    PropertyDescriptor { name: "fps", kind: ValueKind::Float, constraint: Constraint::empty(), min: 0.0, max: 0.0, handler: &Video::Fps },
    PropertyDescriptor { name: "aspect", kind: ValueKind::Float, constraint: Constraint::empty(), min: 0.0, max: 0.0, handler: &Video::Aspect },
    PropertyDescriptor { name: "switch_video", kind: ValueKind::Int, constraint: Constraint::RANGE, min: -2.0, max: 255.0, handler: &Video::SwitchVideo },
    PropertyDescriptor { name: "switch_program", kind: ValueKind::Int, constraint: Constraint::RANGE, min: -1.0, max: 65535.0, handler: &Video::SwitchProgram },
];

impl PropertyHandler for Video {
    fn handle(
        &self,
        prop: &PropertyDescriptor,
        action: &Action,
        ctx: &mut PlaybackContext,
    ) -> PropertyResult {
        match self {
            Video::VoFlag(ctl) => vo_flag(prop, action, ctx, *ctl),
            Video::Deinterlace => deinterlace(prop, action, ctx),
            Video::Framedropping => {
                if ctx.video.is_none() {
                    return Err(PropertyError::Unavailable);
                }
                match action {
                    Action::Print => Ok(Reply::Text(
                        match ctx.frame_dropping {
                            1 => "enabled",
                            2 => "hard",
                            _ => "disabled",
                        }
                        .to_string(),
                    )),
                    _ => helpers::choice(prop, action, &mut ctx.frame_dropping),
                }
            }
            Video::Color(channel) => color(prop, action, ctx, *channel),
            Video::Panscan => panscan(prop, action, ctx),
            Video::Vsync => helpers::flag(prop, action, &mut ctx.vsync),
            Video::Format | Video::Bitrate | Video::Width | Video::Height | Video::Fps | Video::Aspect => {
                let video = ctx.video.as_ref().ok_or(PropertyError::Unavailable)?;
                match self {
                    Video::Format => helpers::int_ro(prop, action, video.format),
                    Video::Bitrate => match action {
                        Action::Print => Ok(Reply::Text(format!("{} kbps", video.bitrate * 8 / 1000))),
                        _ => helpers::int_ro(prop, action, video.bitrate),
                    },
                    Video::Width => helpers::int_ro(prop, action, video.width),
                    Video::Height => helpers::int_ro(prop, action, video.height),
                    Video::Fps => helpers::float_ro(action, video.fps),
                    _ => helpers::float_ro(action, video.aspect),
                }
            }
            Video::SwitchVideo => switch_video(prop, action, ctx),
            Video::SwitchProgram => switch_program(prop, action, ctx),
        }
    }
}

fn vo_flag(prop: &PropertyDescriptor, action: &Action, ctx: &mut PlaybackContext, ctl: VoControl) -> PropertyResult {
    let Some(vo) = ctx.video_out.as_mut() else {
        return Err(PropertyError::Unavailable);
    };
    match action {
        Action::Set(_) | Action::StepUp(_) | Action::StepDown(_) => {
            if let Action::Set(v) = action {
                let on = prop.clamp_i32(v.as_i32().ok_or(PropertyError::Error)?) != 0;
                if on == ctx.vo_flags.get(ctl) {
                    return Ok(Reply::Done);
                }
            }
            if vo.is_configured() {
                vo.control(ctl);
                ctx.vo_flags.toggle(ctl);
            }
            Ok(Reply::Done)
        }
        _ => {
            let mut on = ctx.vo_flags.get(ctl);
            helpers::flag(prop, action, &mut on)
        }
    }
}

fn deinterlace(prop: &PropertyDescriptor, action: &Action, ctx: &mut PlaybackContext) -> PropertyResult {
    if ctx.video.is_none() {
        return Err(PropertyError::Unavailable);
    }
    let filter = ctx.video_filter.as_mut().ok_or(PropertyError::Unavailable)?;
    let mut on = filter.deinterlace();
    let result = helpers::flag(prop, action, &mut on)?;
    if action.is_write() {
        filter.set_deinterlace(on);
    }
    Ok(result)
}

/// 颜色缓存只在写入时初始化
fn cached_color(ctx: &mut PlaybackContext, channel: ColorChannel) -> i32 {
    if ctx.color(channel) == COLOR_UNREAD {
        let value = ctx
            .video_filter
            .as_ref()
            .and_then(|f| f.color(channel))
            .unwrap_or(0);
        ctx.set_color_cache(channel, value);
    }
    ctx.color(channel)
}

fn write_color(ctx: &mut PlaybackContext, channel: ColorChannel, value: i32) -> bool {
    ctx.set_color_cache(channel, value);
    ctx.video_filter
        .as_mut()
        .is_some_and(|f| f.set_color(channel, value))
}

fn color(prop: &PropertyDescriptor, action: &Action, ctx: &mut PlaybackContext, channel: ColorChannel) -> PropertyResult {
    if ctx.video.is_none() {
        return Err(PropertyError::Unavailable);
    }
    let handled = match action {
        Action::Set(v) => {
            let v = prop.clamp_i32(v.as_i32().ok_or(PropertyError::Error)?);
            cached_color(ctx, channel);
            write_color(ctx, channel, v)
        }
        Action::StepUp(arg) | Action::StepDown(arg) => {
            let step = arg.as_ref().and_then(PropertyValue::as_i32).unwrap_or(1);
            let sign = if matches!(action, Action::StepDown(_)) { -1 } else { 1 };
            let v = prop.clamp_i32(cached_color(ctx, channel) + step * sign);
            write_color(ctx, channel, v)
        }
        Action::Get => {
            if let Some(v) = ctx.video_filter.as_ref().and_then(|f| f.color(channel)) {
                return Ok(Reply::Value(PropertyValue::Int(v)));
            }
            false
        }
        _ => return Err(PropertyError::NotImplemented),
    };
    if handled {
        return Ok(Reply::Done);
    }
    tv_color_fallback(prop, action, ctx)
}

/// 滤镜链不支持颜色调节时，电视源转交给同名的 tv_ 属性
#[cfg_attr(not(feature = "tv"), allow(unused_variables))]
fn tv_color_fallback(prop: &PropertyDescriptor, action: &Action, ctx: &mut PlaybackContext) -> PropertyResult {
    #[cfg(feature = "tv")]
    if ctx.tv.is_some() {
        return Registry::dispatch_by_name(&format!("tv_{}", prop.name), action.clone(), ctx);
    }
    Err(PropertyError::Unavailable)
}

fn panscan(prop: &PropertyDescriptor, action: &Action, ctx: &mut PlaybackContext) -> PropertyResult {
    if !ctx.video_out.as_ref().is_some_and(|vo| vo.supports_panscan()) {
        return Err(PropertyError::Unavailable);
    }
    let result = helpers::float_range(prop, action, &mut ctx.panscan)?;
    if action.is_write() {
        let value = ctx.panscan;
        if let Some(vo) = ctx.video_out.as_mut() {
            vo.set_panscan(value);
        }
    }
    Ok(result)
}

fn switch_video(prop: &PropertyDescriptor, action: &Action, ctx: &mut PlaybackContext) -> PropertyResult {
    if ctx.demuxer.is_none() {
        return Err(PropertyError::Unavailable);
    }
    match action {
        Action::Get => {
            if ctx.video.is_none() {
                return Err(PropertyError::Unavailable);
            }
            Ok(Reply::Value(PropertyValue::Int(ctx.video_id)))
        }
        Action::Print => {
            if ctx.video.is_none() {
                return Err(PropertyError::Unavailable);
            }
            if ctx.video_id < 0 {
                return Ok(Reply::Text("disabled".to_string()));
            }
            Ok(Reply::Text(format!("({}) unknown", ctx.video_id)))
        }
        Action::Set(_) | Action::StepUp(_) => {
            let request = match action {
                Action::Set(v) => prop.clamp_i32(v.as_i32().ok_or(PropertyError::Error)?),
                _ => -1,
            };
            let Some(demuxer) = ctx.demuxer.as_mut() else {
                return Err(PropertyError::Unavailable);
            };
            let current = demuxer.current_video();
            let resolved = demuxer.switch_video(request);
            let changed = demuxer.current_video() != current;

            let teardown = resolved == TrackId::Pending
                || (matches!(resolved, TrackId::Id(_)) && changed && current != TrackId::Pending);
            if teardown {
                let keep_vo = ctx.config.fixed_vo && resolved != TrackId::Pending;
                if let Some(pipeline) = ctx.pipeline.as_mut() {
                    pipeline.uninit_video(keep_vo);
                }
                ctx.video = None;
            }
            if let (TrackId::Id(id), true) = (resolved, changed) {
                ctx.video = ctx.pipeline.as_mut().and_then(|p| p.reinit_video(id));
            }

            ctx.video_id = resolved.to_raw();
            info!("切换视频轨: {:?}", resolved);
            ctx.status.emit(format!("ID_VIDEO_TRACK={}", ctx.video_id));
            Ok(Reply::Done)
        }
        _ => Err(PropertyError::NotImplemented),
    }
}

fn switch_program(prop: &PropertyDescriptor, action: &Action, ctx: &mut PlaybackContext) -> PropertyResult {
    let request = match action {
        Action::Set(v) => prop.clamp_i32(v.as_i32().ok_or(PropertyError::Error)?),
        Action::StepUp(_) => -1,
        _ => return Err(PropertyError::NotImplemented),
    };
    let demuxer = ctx.demuxer.as_mut().ok_or(PropertyError::Unavailable)?;
    let program = demuxer.identify_program(request).ok_or(PropertyError::Error)?;
    info!("切换节目: 音频 {} 视频 {}", program.audio, program.video);
    // 子属性失败不影响节目切换结果
    let _ = Registry::dispatch_by_name("switch_audio", Action::Set(PropertyValue::Int(program.audio)), ctx);
    let _ = Registry::dispatch_by_name("switch_video", Action::Set(PropertyValue::Int(program.video)), ctx);
    Ok(Reply::Done)
}
