use super::{audio, expand, general, subtitle, video, Constraint, PropertyDescriptor};
#[cfg(feature = "tv")]
use super::tv;
use crate::core::{Action, PropertyError, PropertyResult, PropertyValue, Reply, ValueKind};
use crate::player::PlaybackContext;
use log::debug;
use serde::Serialize;

/// 属性帮助条目
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyHelp {
    pub name: &'static str,
    pub kind: ValueKind,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// SET 之后 GET 读不回同一个值的属性
///
/// 轨道和节目切换由解复用器决定最终编号，流位置由解复用器对齐，
/// 颜色与去隔行读的是滤镜的实际状态，`sub` 受字幕总数限制
pub const ROUND_TRIP_EXCEPTIONS: &[&str] = &[
    "switch_audio",
    "switch_video",
    "switch_program",
    "stream_pos",
    "sub",
    "deinterlace",
    "gamma",
    "brightness",
    "contrast",
    "saturation",
    "hue",
];

/// 全局属性注册表
///
/// 属性表是静态的，按分组顺序排列：通用、音频、视频、字幕、电视
pub struct Registry;

impl Registry {
    /// 按表顺序遍历所有属性
    pub fn all() -> impl Iterator<Item = &'static PropertyDescriptor> {
        let props = general::PROPERTIES
            .iter()
            .chain(audio::PROPERTIES.iter())
            .chain(video::PROPERTIES.iter())
            .chain(subtitle::PROPERTIES.iter());
        #[cfg(feature = "tv")]
        let props = props.chain(tv::PROPERTIES.iter());
        props
    }

    /// 按名称查找（区分大小写）
    pub fn find(name: &str) -> Option<&'static PropertyDescriptor> {
        Self::all().find(|p| p.name == name)
    }

    /// 对属性执行动作
    ///
    /// - `Parse` 先按属性类型解析文本，再作为 `Set` 执行
    /// - `Set` 的值会转换为属性类型，无法转换返回 `Error`
    /// - `Print` 在处理器没有专用格式时回退到 `Get` 加通用格式
    pub fn dispatch(
        prop: &PropertyDescriptor,
        action: Action,
        ctx: &mut PlaybackContext,
    ) -> PropertyResult {
        let action = match action {
            Action::Parse(text) => match PropertyValue::parse(prop.kind, &text) {
                Some(value) => Action::Set(value),
                None => {
                    debug!("属性 {} 无法解析值 '{}'", prop.name, text);
                    return Err(PropertyError::Error);
                }
            },
            Action::Set(value) => match Self::clamp_flag(prop, value).coerce(prop.kind) {
                Some(value) => Action::Set(value),
                None => {
                    debug!("属性 {} 的值类型不匹配", prop.name);
                    return Err(PropertyError::Error);
                }
            },
            other => other,
        };

        if action == Action::Print {
            return Self::print_with_fallback(prop, ctx);
        }

        let result = prop.handler.handle(prop, &action, ctx);
        if let Err(e) = result {
            debug!("属性 {} 执行 {} 失败: {}", prop.name, action.name(), e);
        }
        result
    }

    /// 数值转开关前先钳位，-1 视为 0 而不是开
    fn clamp_flag(prop: &PropertyDescriptor, value: PropertyValue) -> PropertyValue {
        if prop.kind != ValueKind::Flag || value.kind() == ValueKind::Flag {
            return value;
        }
        match value.as_f64() {
            Some(v) => PropertyValue::Double(prop.clamp(v)),
            None => value,
        }
    }

    fn print_with_fallback(prop: &PropertyDescriptor, ctx: &mut PlaybackContext) -> PropertyResult {
        match prop.handler.handle(prop, &Action::Print, ctx) {
            Err(PropertyError::Error) => Err(PropertyError::Error),
            Err(_) => match prop.handler.handle(prop, &Action::Get, ctx)? {
                Reply::Value(value) => Ok(Reply::Text(value.format_plain())),
                _ => Err(PropertyError::Error),
            },
            ok => ok,
        }
    }

    /// 按名称执行动作，未知名称视为不可用
    pub fn dispatch_by_name(name: &str, action: Action, ctx: &mut PlaybackContext) -> PropertyResult {
        match Self::find(name) {
            Some(prop) => Self::dispatch(prop, action, ctx),
            None => {
                debug!("未知属性: {}", name);
                Err(PropertyError::Unavailable)
            }
        }
    }

    /// 属性的显示文本
    pub fn print(prop: &PropertyDescriptor, ctx: &mut PlaybackContext) -> Option<String> {
        match Self::dispatch(prop, Action::Print, ctx) {
            Ok(Reply::Text(text)) => Some(text),
            _ => None,
        }
    }

    pub fn print_by_name(name: &str, ctx: &mut PlaybackContext) -> Option<String> {
        Self::print(Self::find(name)?, ctx)
    }

    /// 展开 `${name}` 和 `?(name:...)` 模板
    pub fn expand_template(template: &str, ctx: &mut PlaybackContext) -> String {
        expand::expand(template, ctx)
    }

    pub fn help() -> Vec<PropertyHelp> {
        Self::all()
            .map(|p| PropertyHelp {
                name: p.name,
                kind: p.kind,
                min: p.constraint.contains(Constraint::MIN).then_some(p.min),
                max: p.constraint.contains(Constraint::MAX).then_some(p.max),
            })
            .collect()
    }

    /// 帮助表格文本
    pub fn format_help() -> String {
        let help = Self::help();
        let mut out = format!(" {:<25} {:<10} {:>10} {:>10}\n\n", "Name", "Type", "Min", "Max");
        for entry in &help {
            let bound = |v: Option<f64>| v.map(|v| format!("{:.2}", v)).unwrap_or_else(|| "No".to_string());
            out.push_str(&format!(
                " {:<25} {:<10} {:>10} {:>10}\n",
                entry.name,
                entry.kind.type_name(),
                bound(entry.min),
                bound(entry.max)
            ));
        }
        out.push_str(&format!("\nTotal: {} properties\n", help.len()));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Outcome;
    use crate::player::testing::media_context;
    use std::collections::HashSet;

    #[test]
    fn test_names_unique() {
        let mut seen = HashSet::new();
        for prop in Registry::all() {
            assert!(seen.insert(prop.name), "重复的属性名 {}", prop.name);
        }
        assert!(seen.len() > 40);
    }

    #[test]
    fn test_find_is_exact() {
        assert!(Registry::find("volume").is_some());
        assert!(Registry::find("Volume").is_none());
        assert!(Registry::find("vol").is_none());
    }

    #[test]
    fn test_unknown_name_unavailable() {
        let mut ctx = PlaybackContext::default();
        let r = Registry::dispatch_by_name("nope", Action::Get, &mut ctx);
        assert_eq!(Outcome::of(&r), Outcome::Unavailable);
        let r = Registry::dispatch_by_name("nope", Action::Set(PropertyValue::Int(1)), &mut ctx);
        assert_eq!(r, Err(PropertyError::Unavailable));
        assert_eq!(Registry::print_by_name("nope", &mut ctx), None);
    }

    /// 取一个落在约束内的测试值
    fn sample_value(prop: &PropertyDescriptor) -> PropertyValue {
        let v = if prop.kind == ValueKind::Flag {
            1.0
        } else if prop.constraint.contains(Constraint::RANGE) {
            prop.min + (prop.max - prop.min) / 4.0
        } else if prop.constraint.contains(Constraint::MIN) {
            prop.min + 1.0
        } else {
            1.0
        };
        PropertyValue::Double(v)
    }

    fn close(a: &PropertyResult, b: &PropertyResult) -> bool {
        match (a, b) {
            (Ok(Reply::Value(x)), Ok(Reply::Value(y))) => match (x.as_f64(), y.as_f64()) {
                (Some(x), Some(y)) => (x - y).abs() < 1e-4,
                _ => x == y,
            },
            _ => a == b,
        }
    }

    #[test]
    fn test_round_trip_exceptions_exist() {
        for name in ROUND_TRIP_EXCEPTIONS {
            assert!(Registry::find(name).is_some(), "未知属性 {}", name);
        }
    }

    #[test]
    fn test_set_then_get_round_trip() {
        let mut checked = 0;
        for prop in Registry::all().filter(|p| !ROUND_TRIP_EXCEPTIONS.contains(&p.name)) {
            let (mut ctx, _log, _rx) = media_context();
            let value = sample_value(prop);
            // 只读或当前不可用的属性跳过
            if Registry::dispatch(prop, Action::Set(value.clone()), &mut ctx).is_err() {
                continue;
            }
            let expected = value.coerce(prop.kind).map(Reply::Value).ok_or(PropertyError::Error);
            assert_eq!(
                Registry::dispatch(prop, Action::Get, &mut ctx),
                expected,
                "属性 {}",
                prop.name
            );
            checked += 1;
        }
        assert!(checked >= 12, "只检查了 {} 个属性", checked);
    }

    #[test]
    fn test_flag_set_negative_is_off() {
        for name in ["mute", "fullscreen", "vsync", "sub_visibility"] {
            let (mut ctx, _log, _rx) = media_context();
            Registry::dispatch_by_name(name, Action::Set(PropertyValue::Flag(true)), &mut ctx).unwrap();
            Registry::dispatch_by_name(name, Action::Set(PropertyValue::Int(-1)), &mut ctx).unwrap();
            assert_eq!(
                Registry::dispatch_by_name(name, Action::Get, &mut ctx),
                Ok(Reply::Value(PropertyValue::Flag(false))),
                "属性 {}",
                name
            );
        }
    }

    #[test]
    fn test_set_out_of_range_matches_bound() {
        let mut checked = 0;
        for prop in Registry::all().filter(|p| p.kind != ValueKind::String) {
            let mut bounds = Vec::new();
            if prop.constraint.contains(Constraint::MIN) {
                bounds.push((prop.min - 1.0, prop.min));
            }
            if prop.constraint.contains(Constraint::MAX) {
                bounds.push((prop.max + 1.0, prop.max));
            }
            for (outside, bound) in bounds {
                let (mut a, _log_a, _rx_a) = media_context();
                let (mut b, _log_b, _rx_b) = media_context();
                let ra = Registry::dispatch(prop, Action::Set(PropertyValue::Double(outside)), &mut a);
                let rb = Registry::dispatch(prop, Action::Set(PropertyValue::Double(bound)), &mut b);
                assert_eq!(ra, rb, "属性 {} 设置 {}", prop.name, outside);
                let ga = Registry::dispatch(prop, Action::Get, &mut a);
                let gb = Registry::dispatch(prop, Action::Get, &mut b);
                assert!(close(&ga, &gb), "属性 {} 设置 {}: {:?} != {:?}", prop.name, outside, ga, gb);
                checked += 1;
            }
        }
        assert!(checked > 20);
    }

    #[test]
    fn test_step_up_then_down_restores() {
        for name in ["speed", "audio_delay", "panscan", "sub_pos", "sub_delay"] {
            let prop = Registry::find(name).unwrap();
            let (mut ctx, _log, _rx) = media_context();
            let start = if prop.constraint.contains(Constraint::RANGE) {
                (prop.min + prop.max) / 2.0
            } else {
                0.0
            };
            Registry::dispatch(prop, Action::Set(PropertyValue::Double(start)), &mut ctx).unwrap();
            let before = Registry::dispatch(prop, Action::Get, &mut ctx);
            Registry::dispatch(prop, Action::StepUp(None), &mut ctx).unwrap();
            Registry::dispatch(prop, Action::StepDown(None), &mut ctx).unwrap();
            let after = Registry::dispatch(prop, Action::Get, &mut ctx);
            assert!(close(&before, &after), "属性 {}: {:?} != {:?}", name, before, after);
        }
    }

    #[test]
    fn test_step_at_bound_loses_position() {
        for name in ["speed", "audio_delay", "panscan", "sub_pos"] {
            let prop = Registry::find(name).unwrap();
            let (mut ctx, _log, _rx) = media_context();
            Registry::dispatch(prop, Action::Set(PropertyValue::Double(prop.max)), &mut ctx).unwrap();
            // 在上限处上调被钳住，再下调就回不到上限
            Registry::dispatch(prop, Action::StepUp(None), &mut ctx).unwrap();
            Registry::dispatch(prop, Action::StepDown(None), &mut ctx).unwrap();
            let after = Registry::dispatch(prop, Action::Get, &mut ctx)
                .ok()
                .and_then(|r| match r {
                    Reply::Value(v) => v.as_f64(),
                    _ => None,
                })
                .unwrap();
            assert!(after < prop.max - 1e-4, "属性 {} = {}", name, after);
        }
    }

    #[test]
    fn test_parse_then_set() {
        let (mut ctx, _log, _rx) = media_context();
        Registry::dispatch_by_name("sub_pos", Action::Parse("40".into()), &mut ctx).unwrap();
        assert_eq!(ctx.subs.pos, 40);
        let r = Registry::dispatch_by_name("sub_pos", Action::Parse("forty".into()), &mut ctx);
        assert_eq!(r, Err(PropertyError::Error));
        assert_eq!(ctx.subs.pos, 40);
    }

    #[test]
    fn test_set_coerces_value() {
        let mut ctx = PlaybackContext::default();
        Registry::dispatch_by_name("osdlevel", Action::Set(PropertyValue::Float(1.6)), &mut ctx).unwrap();
        assert_eq!(ctx.osd_level, 2);
        let r = Registry::dispatch_by_name("osdlevel", Action::Set(PropertyValue::String("x".into())), &mut ctx);
        assert_eq!(r, Err(PropertyError::Error));
    }

    #[test]
    fn test_print_falls_back_to_get() {
        let (mut ctx, _log, _rx) = media_context();
        // width 没有专用格式
        assert_eq!(Registry::print_by_name("width", &mut ctx), Some("640".into()));
        assert_eq!(Registry::print_by_name("osdlevel", &mut ctx), Some("1".into()));
        ctx.video = None;
        assert_eq!(Registry::print_by_name("width", &mut ctx), None);
    }

    #[test]
    fn test_help_listing() {
        let help = Registry::help();
        let volume = help.iter().find(|h| h.name == "volume").unwrap();
        assert_eq!(volume.min, Some(0.0));
        assert_eq!(volume.max, Some(100.0));
        let filename = help.iter().find(|h| h.name == "filename").unwrap();
        assert_eq!(filename.min, None);
        let text = Registry::format_help();
        assert!(text.contains(&format!("Total: {} properties", help.len())));
        assert!(text.contains("switch_audio"));
    }
}
