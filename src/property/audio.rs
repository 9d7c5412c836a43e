use super::helpers;
use super::{Constraint, PropertyDescriptor, PropertyHandler};
use crate::core::{Action, PropertyError, PropertyResult, PropertyValue, Reply, ValueKind};
use crate::player::{PlaybackContext, TrackId};
use log::info;

/// 音频属性
pub enum Audio {
    Volume,
    Mute,
    AudioDelay,
    Format,
    Bitrate,
    Samplerate,
    Channels,
    SwitchAudio,
}

pub static PROPERTIES: [PropertyDescriptor; 8] = [
    PropertyDescriptor { name: "volume", kind: ValueKind::Float, constraint: Constraint::RANGE, min: 0.0, max: 100.0, handler: &Audio::Volume },
    PropertyDescriptor { name: "mute", kind: ValueKind::Flag, constraint: Constraint::RANGE, min: 0.0, max: 1.0, handler: &Audio::Mute },
    PropertyDescriptor { name: "audio_delay", kind: ValueKind::Float, constraint: Constraint::RANGE, min: -100.0, max: 100.0, handler: &Audio::AudioDelay },
    PropertyDescriptor { name: "audio_format", kind: ValueKind::Int, constraint: Constraint::empty(), min: 0.0, max: 0.0, handler: &Audio::Format },
    PropertyDescriptor { name: "audio_bitrate", kind: ValueKind::Int, constraint: Constraint::empty(), min: 0.0, max: 0.0, handler: &Audio::Bitrate },
    PropertyDescriptor { name: "samplerate", kind: ValueKind::Int, constraint: Constraint::empty(), min: 0.0, max: 0.0, handler: &Audio::Samplerate },
    PropertyDescriptor { name: "channels", kind: ValueKind::Int, constraint: Constraint::empty(), min: 0.0, max: 0.0, handler: &Audio::Channels },
    PropertyDescriptor { name: "switch_audio", kind: ValueKind::Int, constraint: Constraint::RANGE, min: -2.0, max: 255.0, handler: &Audio::SwitchAudio },
];

impl PropertyHandler for Audio {
    fn handle(
        &self,
        prop: &PropertyDescriptor,
        action: &Action,
        ctx: &mut PlaybackContext,
    ) -> PropertyResult {
        match self {
            Audio::Volume => volume(prop, action, ctx),
            Audio::Mute => mute(prop, action, ctx),
            Audio::AudioDelay => audio_delay(prop, action, ctx),
            Audio::Format => {
                let audio = ctx.audio.as_ref().ok_or(PropertyError::Unavailable)?;
                helpers::int_ro(prop, action, audio.format)
            }
            Audio::Bitrate => {
                let audio = ctx.audio.as_ref().ok_or(PropertyError::Unavailable)?;
                match action {
                    Action::Print => Ok(Reply::Text(format!("{} kbps", audio.bitrate * 8 / 1000))),
                    _ => helpers::int_ro(prop, action, audio.bitrate),
                }
            }
            Audio::Samplerate => {
                let audio = ctx.audio.as_ref().ok_or(PropertyError::Unavailable)?;
                match action {
                    Action::Print => Ok(Reply::Text(format!("{} kHz", audio.samplerate / 1000))),
                    _ => helpers::int_ro(prop, action, audio.samplerate),
                }
            }
            Audio::Channels => {
                let audio = ctx.audio.as_ref().ok_or(PropertyError::Unavailable)?;
                match action {
                    Action::Print => Ok(Reply::Text(match audio.channels {
                        1 => "mono".to_string(),
                        2 => "stereo".to_string(),
                        n => format!("{} channels", n),
                    })),
                    _ => helpers::int_ro(prop, action, audio.channels),
                }
            }
            Audio::SwitchAudio => switch_audio(prop, action, ctx),
        }
    }
}

fn volume(prop: &PropertyDescriptor, action: &Action, ctx: &mut PlaybackContext) -> PropertyResult {
    if ctx.audio.is_none() {
        return Err(PropertyError::Unavailable);
    }
    match action {
        Action::Get => Ok(Reply::Value(PropertyValue::Float(ctx.mixer.both_volume()))),
        Action::Print => Ok(Reply::Text(format!("{:.2}", ctx.mixer.both_volume()))),
        Action::Set(_) | Action::StepUp(_) | Action::StepDown(_) => {
            if ctx.edl_muted {
                return Err(PropertyError::Disabled);
            }
            ctx.user_muted = false;
            match action {
                Action::Set(v) => {
                    let v = prop.clamp(v.as_f64().ok_or(PropertyError::Error)?) as f32;
                    ctx.mixer.set_volume(v, v);
                }
                Action::StepUp(arg) | Action::StepDown(arg) => {
                    // 参数只决定方向，步长由混音器决定
                    let negative = arg.as_ref().and_then(PropertyValue::as_f64).is_some_and(|v| v <= 0.0);
                    let up = matches!(action, Action::StepUp(_)) != negative;
                    if up {
                        ctx.mixer.inc_volume();
                    } else {
                        ctx.mixer.dec_volume();
                    }
                }
                _ => {}
            }
            Ok(Reply::Done)
        }
        Action::Parse(_) => Err(PropertyError::NotImplemented),
    }
}

fn mute(prop: &PropertyDescriptor, action: &Action, ctx: &mut PlaybackContext) -> PropertyResult {
    if ctx.audio.is_none() {
        return Err(PropertyError::Unavailable);
    }
    match action {
        Action::Set(_) | Action::StepUp(_) | Action::StepDown(_) => {
            if ctx.edl_muted {
                return Err(PropertyError::Disabled);
            }
            match action {
                Action::Set(v) => {
                    let on = prop.clamp_i32(v.as_i32().ok_or(PropertyError::Error)?) != 0;
                    if on != ctx.mixer.is_muted() {
                        ctx.mixer.toggle_mute();
                    }
                }
                _ => ctx.mixer.toggle_mute(),
            }
            ctx.user_muted = ctx.mixer.is_muted();
            Ok(Reply::Done)
        }
        Action::Print if ctx.edl_muted => Ok(Reply::Text("enabled (EDL)".to_string())),
        _ => {
            let mut muted = ctx.mixer.is_muted();
            helpers::flag(prop, action, &mut muted)
        }
    }
}

fn audio_delay(prop: &PropertyDescriptor, action: &Action, ctx: &mut PlaybackContext) -> PropertyResult {
    if ctx.audio.is_none() || ctx.video.is_none() {
        return Err(PropertyError::Unavailable);
    }
    let old = ctx.audio_delay;
    let result = helpers::delay(prop, action, &mut ctx.audio_delay)?;
    if action.is_write() {
        ctx.av_delay -= ctx.audio_delay - old;
    }
    Ok(result)
}

fn switch_audio(prop: &PropertyDescriptor, action: &Action, ctx: &mut PlaybackContext) -> PropertyResult {
    if ctx.demuxer.is_none() {
        return Err(PropertyError::Unavailable);
    }
    match action {
        Action::Get => {
            if ctx.audio.is_none() {
                return Err(PropertyError::Unavailable);
            }
            Ok(Reply::Value(PropertyValue::Int(ctx.audio_id)))
        }
        Action::Print => {
            if ctx.audio.is_none() {
                return Err(PropertyError::Unavailable);
            }
            if ctx.audio_id < 0 {
                return Ok(Reply::Text("disabled".to_string()));
            }
            let lang = ctx
                .demuxer
                .as_ref()
                .and_then(|d| d.audio_lang(ctx.audio_id))
                .unwrap_or_else(|| "unknown".to_string());
            Ok(Reply::Text(format!("({}) {}", ctx.audio_id, lang)))
        }
        Action::Set(_) | Action::StepUp(_) => {
            let request = match action {
                Action::Set(v) => prop.clamp_i32(v.as_i32().ok_or(PropertyError::Error)?),
                _ => -1,
            };
            let Some(demuxer) = ctx.demuxer.as_mut() else {
                return Err(PropertyError::Unavailable);
            };
            let current = demuxer.current_audio();
            let resolved = demuxer.switch_audio(request);
            let changed = demuxer.current_audio() != current;

            let teardown = resolved == TrackId::Pending
                || (matches!(resolved, TrackId::Id(_)) && changed && current != TrackId::Pending);
            if teardown {
                if let Some(pipeline) = ctx.pipeline.as_mut() {
                    pipeline.uninit_audio();
                }
                ctx.audio = None;
            }
            if let (TrackId::Id(id), true) = (resolved, changed) {
                ctx.audio = ctx.pipeline.as_mut().and_then(|p| p.reinit_audio(id));
            }

            ctx.audio_id = resolved.to_raw();
            info!("切换音轨: {:?}", resolved);
            ctx.status.emit(format!("ID_AUDIO_TRACK={}", ctx.audio_id));
            Ok(Reply::Done)
        }
        _ => Err(PropertyError::NotImplemented),
    }
}
