//! 属性命令桥接：把简单命令映射为属性动作，并按表配置显示 OSD

use super::{Command, CommandId};
use crate::core::{Action, Reply, ValueKind};
use crate::player::{OsdBarKind, OsdSlot, PlaybackContext};
use crate::property::Registry;
use log::{debug, error};

struct BridgeEntry {
    property: &'static str,
    command: CommandId,
    /// 开关类命令：参数缺省时 STEP，否则 SET
    toggle: bool,
    bar: Option<OsdBarKind>,
    slot: Option<OsdSlot>,
    /// OSD 文本模板，`{}` 替换为属性显示值；有进度条时作为进度条标题
    template: Option<&'static str>,
}

const fn entry(
    property: &'static str,
    command: CommandId,
    toggle: bool,
    bar: Option<OsdBarKind>,
    template: Option<&'static str>,
) -> BridgeEntry {
    BridgeEntry { property, command, toggle, bar, slot: None, template }
}

// 顺序决定属性私有 OSD 槽位
static BRIDGE: &[BridgeEntry] = &[
    // 音频
    entry("volume", CommandId::Volume, false, Some(OsdBarKind::Volume), Some("Volume")),
    entry("mute", CommandId::Mute, true, None, Some("Mute: {}")),
    entry("audio_delay", CommandId::AudioDelay, false, None, Some("A-V delay: {}")),
    entry("switch_audio", CommandId::SwitchAudio, true, None, Some("Audio: {}")),
    // 视频
    entry("fullscreen", CommandId::VoFullscreen, true, None, None),
    entry("panscan", CommandId::Panscan, false, Some(OsdBarKind::Panscan), Some("Panscan")),
    entry("ontop", CommandId::VoOntop, true, None, Some("Stay on top: {}")),
    entry("rootwin", CommandId::VoRootwin, true, None, Some("View in root window: {}")),
    entry("border", CommandId::VoBorder, true, None, Some("Border: {}")),
    entry("framedropping", CommandId::Framedropping, true, None, Some("Framedropping: {}")),
    entry("gamma", CommandId::Gamma, false, Some(OsdBarKind::Brightness), Some("Gamma")),
    entry("brightness", CommandId::Brightness, false, Some(OsdBarKind::Brightness), Some("Brightness")),
    entry("contrast", CommandId::Contrast, false, Some(OsdBarKind::Contrast), Some("Contrast")),
    entry("saturation", CommandId::Saturation, false, Some(OsdBarKind::Saturation), Some("Saturation")),
    entry("hue", CommandId::Hue, false, Some(OsdBarKind::Hue), Some("Hue")),
    entry("vsync", CommandId::SwitchVsync, true, None, Some("VSync: {}")),
    // 字幕
    entry("sub", CommandId::SubSelect, true, None, Some("Subtitles: {}")),
    entry("sub_pos", CommandId::SubPos, false, None, Some("Sub position: {}/100")),
    entry("sub_alignment", CommandId::SubAlignment, true, None, Some("Sub alignment: {}")),
    BridgeEntry {
        property: "sub_delay",
        command: CommandId::SubDelay,
        toggle: false,
        bar: None,
        slot: Some(OsdSlot::SubDelay),
        template: Some("Sub delay: {}"),
    },
    entry("sub_visibility", CommandId::SubVisibility, true, None, Some("Subtitles: {}")),
    entry("sub_forced_only", CommandId::SubForcedOnly, true, None, Some("Forced sub only: {}")),
    // 电视
    #[cfg(feature = "tv")]
    entry("tv_brightness", CommandId::TvSetBrightness, false, Some(OsdBarKind::Brightness), Some("Brightness")),
    #[cfg(feature = "tv")]
    entry("tv_hue", CommandId::TvSetHue, false, Some(OsdBarKind::Hue), Some("Hue")),
    #[cfg(feature = "tv")]
    entry("tv_saturation", CommandId::TvSetSaturation, false, Some(OsdBarKind::Saturation), Some("Saturation")),
    #[cfg(feature = "tv")]
    entry("tv_contrast", CommandId::TvSetContrast, false, Some(OsdBarKind::Contrast), Some("Contrast")),
];

/// 尝试把命令当作属性命令执行
///
/// 返回 false 表示命令不在桥接表中；属性操作失败也算已处理（不显示 OSD）
pub fn try_dispatch(cmd: &Command, ctx: &mut PlaybackContext) -> bool {
    let Some((index, entry)) = BRIDGE.iter().enumerate().find(|(_, e)| e.command == cmd.id) else {
        return false;
    };
    let Some(prop) = Registry::find(entry.property) else {
        return false;
    };

    let arg0 = cmd.args.first().map(|a| a.to_value());
    let action = if entry.toggle {
        match arg0 {
            Some(v) if cmd.nargs > 0 && cmd.float(0) as f64 >= prop.min => Action::Set(v),
            _ => Action::StepUp(None),
        }
    } else {
        match arg0 {
            Some(v) if cmd.int(1) != 0 => Action::Set(v),
            other => Action::StepUp(other),
        }
    };

    if let Err(e) = Registry::dispatch(prop, action, ctx) {
        debug!("属性命令 {:?} 未生效: {}", cmd.id, e);
        return true;
    }

    if let Some(bar) = entry.bar {
        match prop.kind {
            ValueKind::Int | ValueKind::Float => {
                if let Ok(Reply::Value(v)) = Registry::dispatch(prop, Action::Get, ctx) {
                    let value = v.as_f64().unwrap_or(0.0);
                    ctx.osd.set_bar(bar, entry.template.unwrap_or(""), prop.min, prop.max, value);
                }
            }
            _ => error!("属性 {} 的类型不支持进度条", prop.name),
        }
        return true;
    }

    if let Some(template) = entry.template {
        if let Some(text) = Registry::print(prop, ctx) {
            let slot = entry.slot.unwrap_or(OsdSlot::Property(index));
            let duration = ctx.osd_duration();
            ctx.osd.set_message(slot, 1, duration, &template.replace("{}", &text));
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{parse_command, CommandArg};
    use crate::player::osd::OsdBar;
    use crate::player::testing::media_context;

    fn run(line: &str, ctx: &mut PlaybackContext) -> bool {
        try_dispatch(&parse_command(line).unwrap(), ctx)
    }

    #[test]
    fn test_unrelated_command_not_handled() {
        let (mut ctx, _log, _rx) = media_context();
        assert!(!run("seek 5", &mut ctx));
        assert!(!run("get_time_pos", &mut ctx));
    }

    #[test]
    fn test_volume_draws_bar() {
        let (mut ctx, _log, _rx) = media_context();
        assert!(run("volume -1", &mut ctx));
        assert_eq!(
            ctx.osd.bar(),
            Some(&OsdBar {
                kind: OsdBarKind::Volume,
                title: "Volume".into(),
                min: 0.0,
                max: 100.0,
                value: 97.0,
            })
        );
        assert_eq!(ctx.osd.message_count(), 0);

        assert!(run("volume 40 1", &mut ctx));
        assert_eq!(ctx.osd.bar().unwrap().value, 40.0);
    }

    #[test]
    fn test_toggle_without_argument_steps() {
        let (mut ctx, _log, _rx) = media_context();
        assert!(run("mute", &mut ctx));
        assert!(ctx.mixer.is_muted());
        let msg = ctx.osd.message(OsdSlot::Property(1)).unwrap();
        assert_eq!(msg.text, "Mute: enabled");
        assert_eq!(msg.level, 1);
        assert_eq!(msg.duration_ms, ctx.osd_duration());

        // 0 >= min，按 SET 处理
        assert!(run("mute 0", &mut ctx));
        assert!(!ctx.mixer.is_muted());
        assert!(run("mute 0", &mut ctx));
        assert!(!ctx.mixer.is_muted());
    }

    #[test]
    fn test_mute_negative_toggles_positive_sets() {
        let (mut ctx, _log, _rx) = media_context();
        // -1 小于下限，每次都切换
        assert!(run("mute -1", &mut ctx));
        assert!(ctx.mixer.is_muted());
        assert!(run("mute -1", &mut ctx));
        assert!(!ctx.mixer.is_muted());

        // 1 按 SET 处理，重复执行保持静音
        assert!(run("mute 1", &mut ctx));
        assert!(ctx.mixer.is_muted());
        assert!(run("mute 1", &mut ctx));
        assert!(ctx.mixer.is_muted());
        assert_eq!(
            ctx.osd.message(OsdSlot::Property(1)).map(|m| m.text.as_str()),
            Some("Mute: enabled")
        );
    }

    #[test]
    fn test_toggle_below_min_steps() {
        let (mut ctx, _log, _rx) = media_context();
        // switch_vsync 给出参数 -5，小于下限，变成 STEP
        let cmd = Command::new(CommandId::SwitchVsync, vec![CommandArg::Int(-5)]);
        assert!(try_dispatch(&cmd, &mut ctx));
        assert!(ctx.vsync);
        assert_eq!(
            ctx.osd.message(OsdSlot::Property(15)).map(|m| m.text.as_str()),
            Some("VSync: enabled")
        );
    }

    #[test]
    fn test_sub_delay_uses_own_slot() {
        let (mut ctx, _log, _rx) = media_context();
        assert!(run("sub_delay 0.1", &mut ctx));
        assert_eq!(
            ctx.osd.message(OsdSlot::SubDelay).map(|m| m.text.as_str()),
            Some("Sub delay: 100 ms")
        );
    }

    #[test]
    fn test_failure_is_silent() {
        let (mut ctx, _log, _rx) = media_context();
        ctx.audio = None;
        assert!(run("mute", &mut ctx));
        assert_eq!(ctx.osd.message_count(), 0);
        assert!(ctx.osd.bar().is_none());
    }

    #[test]
    fn test_fullscreen_has_no_osd() {
        let (mut ctx, _log, _rx) = media_context();
        assert!(run("vo_fullscreen", &mut ctx));
        assert!(ctx.vo_flags.fullscreen);
        assert_eq!(ctx.osd.message_count(), 0);
    }

    #[test]
    fn test_gamma_bar() {
        let (mut ctx, _log, _rx) = media_context();
        assert!(run("gamma 10", &mut ctx));
        let bar = ctx.osd.bar().unwrap();
        assert_eq!(bar.kind, OsdBarKind::Brightness);
        assert_eq!(bar.title, "Gamma");
        assert_eq!(bar.value, 10.0);
    }
}
