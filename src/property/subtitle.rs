use super::helpers;
use super::{Constraint, PropertyDescriptor, PropertyHandler};
use crate::core::{Action, PropertyError, PropertyResult, PropertyValue, Reply, ValueKind};
use crate::player::osd::OsdLayer;
use crate::player::subtitles::SubSource;
use crate::player::PlaybackContext;

/// 字幕属性
pub enum Subtitle {
    Select,
    Delay,
    Pos,
    Alignment,
    Visibility,
    ForcedOnly,
}

pub static PROPERTIES: [PropertyDescriptor; 6] = [
    PropertyDescriptor { name: "sub", kind: ValueKind::Int, constraint: Constraint::MIN, min: -1.0, max: 0.0, handler: &Subtitle::Select },
    PropertyDescriptor { name: "sub_delay", kind: ValueKind::Float, constraint: Constraint::empty(), min: 0.0, max: 0.0, handler: &Subtitle::Delay },
    PropertyDescriptor { name: "sub_pos", kind: ValueKind::Int, constraint: Constraint::RANGE, min: 0.0, max: 100.0, handler: &Subtitle::Pos },
    PropertyDescriptor { name: "sub_alignment", kind: ValueKind::Choice, constraint: Constraint::RANGE, min: 0.0, max: 2.0, handler: &Subtitle::Alignment },
    PropertyDescriptor { name: "sub_visibility", kind: ValueKind::Flag, constraint: Constraint::RANGE, min: 0.0, max: 1.0, handler: &Subtitle::Visibility },
    PropertyDescriptor { name: "sub_forced_only", kind: ValueKind::Flag, constraint: Constraint::RANGE, min: 0.0, max: 1.0, handler: &Subtitle::ForcedOnly },
];

impl PropertyHandler for Subtitle {
    fn handle(
        &self,
        prop: &PropertyDescriptor,
        action: &Action,
        ctx: &mut PlaybackContext,
    ) -> PropertyResult {
        match self {
            Subtitle::Select => select(prop, action, ctx),
            Subtitle::Delay => {
                if ctx.video.is_none() {
                    return Err(PropertyError::Unavailable);
                }
                helpers::delay(prop, action, &mut ctx.subs.delay)
            }
            Subtitle::Pos => {
                if ctx.video.is_none() {
                    return Err(PropertyError::Unavailable);
                }
                if action.is_write() {
                    ctx.osd.mark_changed(OsdLayer::Subtitle);
                }
                helpers::int_range(prop, action, &mut ctx.subs.pos)
            }
            Subtitle::Alignment => alignment(prop, action, ctx),
            Subtitle::Visibility => {
                if ctx.video.is_none() {
                    return Err(PropertyError::Unavailable);
                }
                if action.is_write() {
                    ctx.osd.mark_changed(OsdLayer::Subtitle);
                    if ctx.subs.spu_decoder {
                        ctx.osd.mark_changed(OsdLayer::Spu);
                    }
                }
                helpers::flag(prop, action, &mut ctx.subs.visibility)
            }
            Subtitle::ForcedOnly => {
                if !ctx.subs.spu_decoder {
                    return Err(PropertyError::Unavailable);
                }
                if action.is_write() {
                    ctx.osd.mark_changed(OsdLayer::Spu);
                }
                helpers::flag(prop, action, &mut ctx.subs.forced_only)
            }
        }
    }
}

/// 全局字幕序号：-1 关闭，0..size-1 依次为外部文件、vobsub、内嵌字幕
fn select(prop: &PropertyDescriptor, action: &Action, ctx: &mut PlaybackContext) -> PropertyResult {
    let size = ctx.subs.global_size;
    if size <= 0 {
        return Err(PropertyError::Unavailable);
    }
    let pos = ctx.subs.global_pos;
    let new_pos = match action {
        Action::Get => return Ok(Reply::Value(PropertyValue::Int(pos))),
        Action::Print => return Ok(Reply::Text(ctx.subs.describe(ctx.demuxer.as_deref()))),
        Action::Set(v) => prop.clamp_i32(v.as_i32().ok_or(PropertyError::Error)?).min(size - 1),
        Action::StepUp(_) => (pos + 2).rem_euclid(size + 1) - 1,
        Action::StepDown(_) => (pos + size + 1).rem_euclid(size + 1) - 1,
        Action::Parse(_) => return Err(PropertyError::NotImplemented),
    };

    ctx.subs.global_pos = new_pos;
    ctx.subs.apply_selection(ctx.demuxer.as_deref_mut());
    if let Some(pipeline) = ctx.pipeline.as_mut() {
        pipeline.refresh_subtitles();
    }
    ctx.osd.mark_changed(OsdLayer::Subtitle);
    Ok(Reply::Done)
}

fn alignment(prop: &PropertyDescriptor, action: &Action, ctx: &mut PlaybackContext) -> PropertyResult {
    if ctx.video.is_none() || ctx.subs.global_pos < 0 || ctx.subs.source() != Some(SubSource::Text) {
        return Err(PropertyError::Unavailable);
    }
    match action {
        Action::Print => {
            let name = match prop.clamp_i32(ctx.subs.alignment) {
                0 => "top",
                1 => "center",
                _ => "bottom",
            };
            Ok(Reply::Text(name.to_string()))
        }
        _ => {
            if action.is_write() {
                ctx.osd.mark_changed(OsdLayer::Subtitle);
            }
            helpers::choice(prop, action, &mut ctx.subs.alignment)
        }
    }
}
