use super::helpers;
use super::{Constraint, PropertyDescriptor, PropertyHandler};
use crate::core::{Action, PropertyError, PropertyResult, PropertyValue, Reply, ValueKind};
use crate::player::PlaybackContext;

/// 通用属性
pub enum General {
    OsdLevel,
    Speed,
    Filename,
    Path,
    Demuxer,
    StreamPos,
    StreamStart,
    StreamEnd,
    StreamLength,
    Length,
}

pub static PROPERTIES: [PropertyDescriptor; 10] = [
    PropertyDescriptor { name: "osdlevel", kind: ValueKind::Choice, constraint: Constraint::RANGE, min: 0.0, max: 3.0, handler: &General::OsdLevel },
    PropertyDescriptor { name: "speed", kind: ValueKind::Float, constraint: Constraint::RANGE, min: 0.01, max: 100.0, handler: &General::Speed },
    PropertyDescriptor { name: "filename", kind: ValueKind::String, constraint: Constraint::empty(), min: 0.0, max: 0.0, handler: &General::Filename },
    PropertyDescriptor { name: "path", kind: ValueKind::String, constraint: Constraint::empty(), min: 0.0, max: 0.0, handler: &General::Path },
    PropertyDescriptor { name: "demuxer", kind: ValueKind::String, constraint: Constraint::empty(), min: 0.0, max: 0.0, handler: &General::Demuxer },
    PropertyDescriptor { name: "stream_pos", kind: ValueKind::Position, constraint: Constraint::MIN, min: 0.0, max: 0.0, handler: &General::StreamPos },
    PropertyDescriptor { name: "stream_start", kind: ValueKind::Position, constraint: Constraint::MIN, min: 0.0, max: 0.0, handler: &General::StreamStart },
    PropertyDescriptor { name: "stream_end", kind: ValueKind::Position, constraint: Constraint::MIN, min: 0.0, max: 0.0, handler: &General::StreamEnd },
    PropertyDescriptor { name: "stream_length", kind: ValueKind::Position, constraint: Constraint::MIN, min: 0.0, max: 0.0, handler: &General::StreamLength },
    PropertyDescriptor { name: "length", kind: ValueKind::Double, constraint: Constraint::empty(), min: 0.0, max: 0.0, handler: &General::Length },
];

impl PropertyHandler for General {
    fn handle(
        &self,
        prop: &PropertyDescriptor,
        action: &Action,
        ctx: &mut PlaybackContext,
    ) -> PropertyResult {
        match self {
            General::OsdLevel => helpers::choice(prop, action, &mut ctx.osd_level),
            General::Speed => speed(prop, action, ctx),
            General::Filename => {
                let name = ctx.basename().ok_or(PropertyError::Unavailable)?;
                helpers::string_ro(action, name)
            }
            General::Path => {
                let path = ctx.filename.as_deref().ok_or(PropertyError::Unavailable)?;
                helpers::string_ro(action, path)
            }
            General::Demuxer => {
                let demuxer = ctx.demuxer.as_ref().ok_or(PropertyError::Unavailable)?;
                helpers::string_ro(action, demuxer.name())
            }
            General::StreamPos => stream_pos(prop, action, ctx),
            General::StreamStart | General::StreamEnd | General::StreamLength => {
                let span = ctx
                    .demuxer
                    .as_ref()
                    .and_then(|d| d.stream_span())
                    .ok_or(PropertyError::Unavailable)?;
                let value = match self {
                    General::StreamStart => span.start,
                    General::StreamEnd => span.end,
                    _ => span.end - span.start,
                };
                helpers::position_ro(action, value)
            }
            General::Length => length(action, ctx),
        }
    }
}

fn speed(prop: &PropertyDescriptor, action: &Action, ctx: &mut PlaybackContext) -> PropertyResult {
    match action {
        Action::Set(_) | Action::StepUp(_) | Action::StepDown(_) => {
            helpers::float_range(prop, action, &mut ctx.speed)?;
            ctx.rebuild_audio_filters();
            Ok(Reply::Done)
        }
        _ => helpers::float_range(prop, action, &mut ctx.speed),
    }
}

fn stream_pos(prop: &PropertyDescriptor, action: &Action, ctx: &mut PlaybackContext) -> PropertyResult {
    let demuxer = ctx.demuxer.as_mut().ok_or(PropertyError::Unavailable)?;
    let span = demuxer.stream_span().ok_or(PropertyError::Unavailable)?;
    match action {
        Action::Get => Ok(Reply::Value(PropertyValue::Position(span.position))),
        Action::Set(v) => {
            let v = v.as_f64().ok_or(PropertyError::Error)?;
            demuxer.stream_seek(prop.clamp(v) as i64);
            Ok(Reply::Done)
        }
        _ => Err(PropertyError::NotImplemented),
    }
}

fn length(action: &Action, ctx: &mut PlaybackContext) -> PropertyResult {
    let len = ctx
        .demuxer
        .as_ref()
        .map(|d| d.time_length())
        .ok_or(PropertyError::Unavailable)?;
    if len as i32 == 0 {
        return Err(PropertyError::Unavailable);
    }
    match action {
        Action::Print => Ok(Reply::Text(format_duration(len))),
        _ => helpers::double_ro(action, len),
    }
}

/// 秒 -> h:mm:ss / m:ss / s
pub fn format_duration(seconds: f64) -> String {
    let total = seconds as i64;
    let h = total / 3600;
    let m = (total - h * 3600) / 60;
    let s = total - h * 3600 - m * 60;
    if h > 0 {
        format!("{}:{:02}:{:02}", h, m, s)
    } else if m > 0 {
        format!("{}:{:02}", m, s)
    } else {
        format!("{}", s)
    }
}
