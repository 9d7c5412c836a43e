use super::{Constraint, PropertyDescriptor, PropertyHandler};
use crate::core::{Action, PropertyError, PropertyResult, PropertyValue, Reply, ValueKind};
use crate::player::tv::TvColor;
use crate::player::PlaybackContext;

/// 电视调谐器颜色属性
pub struct TvProperty(pub TvColor);

pub static PROPERTIES: [PropertyDescriptor; 4] = [
    PropertyDescriptor { name: "tv_brightness", kind: ValueKind::Int, constraint: Constraint::RANGE, min: -100.0, max: 100.0, handler: &TvProperty(TvColor::Brightness) },
    PropertyDescriptor { name: "tv_contrast", kind: ValueKind::Int, constraint: Constraint::RANGE, min: -100.0, max: 100.0, handler: &TvProperty(TvColor::Contrast) },
    PropertyDescriptor { name: "tv_saturation", kind: ValueKind::Int, constraint: Constraint::RANGE, min: -100.0, max: 100.0, handler: &TvProperty(TvColor::Saturation) },
    PropertyDescriptor { name: "tv_hue", kind: ValueKind::Int, constraint: Constraint::RANGE, min: -100.0, max: 100.0, handler: &TvProperty(TvColor::Hue) },
];

impl PropertyHandler for TvProperty {
    fn handle(
        &self,
        prop: &PropertyDescriptor,
        action: &Action,
        ctx: &mut PlaybackContext,
    ) -> PropertyResult {
        let color = self.0;
        let tuner = ctx.tv.as_mut().ok_or(PropertyError::Unavailable)?;
        let value = match action {
            Action::Get => {
                let v = tuner.color(color).ok_or(PropertyError::Error)?;
                return Ok(Reply::Value(PropertyValue::Int(v)));
            }
            Action::Set(v) => prop.clamp_i32(v.as_i32().ok_or(PropertyError::Error)?),
            Action::StepUp(arg) | Action::StepDown(arg) => {
                let current = tuner.color(color).ok_or(PropertyError::Error)?;
                let step = arg.as_ref().and_then(PropertyValue::as_i32).unwrap_or(1);
                let sign = if matches!(action, Action::StepDown(_)) { -1 } else { 1 };
                prop.clamp_i32(current + step * sign)
            }
            _ => return Err(PropertyError::NotImplemented),
        };
        if tuner.set_color(color, value) {
            Ok(Reply::Done)
        } else {
            Err(PropertyError::Error)
        }
    }
}
