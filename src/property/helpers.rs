//! 通用属性实现，按存储类型复用

use super::PropertyDescriptor;
use crate::core::{Action, PropertyError, PropertyResult, PropertyValue, Reply, ValueKind};

/// 步进方向与步长（无参数时用默认步长）
fn step_of(action: &Action, default: f64) -> Option<f64> {
    let (arg, sign) = match action {
        Action::StepUp(arg) => (arg, 1.0),
        Action::StepDown(arg) => (arg, -1.0),
        _ => return None,
    };
    let amount = arg.as_ref().and_then(PropertyValue::as_f64).unwrap_or(default);
    Some(amount * sign)
}

/// 按属性类型构造整数值（Choice / Flag 与 Int 共用整数存储）
fn int_value(prop: &PropertyDescriptor, value: i32) -> PropertyValue {
    match prop.kind {
        ValueKind::Choice => PropertyValue::Choice(value),
        ValueKind::Flag => PropertyValue::Flag(value != 0),
        _ => PropertyValue::Int(value),
    }
}

fn set_arg(action: &Action) -> Option<&PropertyValue> {
    match action {
        Action::Set(v) => Some(v),
        _ => None,
    }
}

pub fn int_ro(prop: &PropertyDescriptor, action: &Action, value: i32) -> PropertyResult {
    match action {
        Action::Get => Ok(Reply::Value(int_value(prop, value))),
        _ => Err(PropertyError::NotImplemented),
    }
}

pub fn int_range(prop: &PropertyDescriptor, action: &Action, var: &mut i32) -> PropertyResult {
    if let Some(v) = set_arg(action) {
        let v = v.as_i32().ok_or(PropertyError::Error)?;
        *var = prop.clamp_i32(v);
        return Ok(Reply::Done);
    }
    if let Some(step) = step_of(action, 1.0) {
        *var = prop.clamp(*var as f64 + step.round()) as i32;
        return Ok(Reply::Done);
    }
    int_ro(prop, action, *var)
}

/// 枚举选择：步进时在 [0, max] 内循环，忽略步长
pub fn choice(prop: &PropertyDescriptor, action: &Action, var: &mut i32) -> PropertyResult {
    let modulus = prop.max_i32() + 1;
    match action {
        Action::StepUp(_) => {
            *var = (*var + 1).rem_euclid(modulus);
            Ok(Reply::Done)
        }
        Action::StepDown(_) => {
            *var = (*var + prop.max_i32()).rem_euclid(modulus);
            Ok(Reply::Done)
        }
        _ => int_range(prop, action, var),
    }
}

pub fn flag(prop: &PropertyDescriptor, action: &Action, var: &mut bool) -> PropertyResult {
    match action {
        Action::StepUp(_) | Action::StepDown(_) => {
            *var = !*var;
            Ok(Reply::Done)
        }
        Action::Print => Ok(Reply::Text(enabled_text(*var).to_string())),
        Action::Set(v) => {
            let v = v.as_i32().ok_or(PropertyError::Error)?;
            *var = prop.clamp_i32(v) != 0;
            Ok(Reply::Done)
        }
        Action::Get => Ok(Reply::Value(PropertyValue::Flag(*var))),
        Action::Parse(_) => Err(PropertyError::NotImplemented),
    }
}

pub fn enabled_text(on: bool) -> &'static str {
    if on {
        "enabled"
    } else {
        "disabled"
    }
}

pub fn float_ro(action: &Action, value: f32) -> PropertyResult {
    match action {
        Action::Get => Ok(Reply::Value(PropertyValue::Float(value))),
        Action::Print => Ok(Reply::Text(format!("{:.2}", value))),
        _ => Err(PropertyError::NotImplemented),
    }
}

pub fn float_range(prop: &PropertyDescriptor, action: &Action, var: &mut f32) -> PropertyResult {
    if let Some(v) = set_arg(action) {
        let v = v.as_f64().ok_or(PropertyError::Error)?;
        *var = prop.clamp(v) as f32;
        return Ok(Reply::Done);
    }
    if let Some(step) = step_of(action, 0.1) {
        *var = prop.clamp(*var as f64 + step) as f32;
        return Ok(Reply::Done);
    }
    float_ro(action, *var)
}

/// 延迟类属性：秒存储，毫秒显示
pub fn delay(prop: &PropertyDescriptor, action: &Action, var: &mut f32) -> PropertyResult {
    match action {
        Action::Print => Ok(Reply::Text(format!("{} ms", round_ms(*var)))),
        _ => float_range(prop, action, var),
    }
}

/// 秒转毫秒，四舍五入（远离零）
pub fn round_ms(seconds: f32) -> i32 {
    (seconds as f64 * 1000.0).round() as i32
}

pub fn double_ro(action: &Action, value: f64) -> PropertyResult {
    match action {
        Action::Get => Ok(Reply::Value(PropertyValue::Double(value))),
        Action::Print => Ok(Reply::Text(format!("{:.2}", value))),
        _ => Err(PropertyError::NotImplemented),
    }
}

pub fn string_ro(action: &Action, value: &str) -> PropertyResult {
    match action {
        Action::Get => Ok(Reply::Value(PropertyValue::String(value.to_string()))),
        Action::Print => Ok(Reply::Text(value.to_string())),
        _ => Err(PropertyError::NotImplemented),
    }
}

pub fn position_ro(action: &Action, value: i64) -> PropertyResult {
    match action {
        Action::Get => Ok(Reply::Value(PropertyValue::Position(value))),
        _ => Err(PropertyError::NotImplemented),
    }
}
