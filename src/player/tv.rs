/// 电视颜色选项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TvColor {
    Brightness,
    Contrast,
    Saturation,
    Hue,
}

/// 电视调谐器
pub trait TvTuner: Send {
    /// 读取颜色选项，None 表示读取失败
    fn color(&self, color: TvColor) -> Option<i32>;

    fn set_color(&mut self, color: TvColor, value: i32) -> bool;

    /// 设置频率（1/16 MHz 单位）
    fn set_freq(&mut self, freq: i64);

    fn step_freq(&mut self, delta: i64);

    fn set_norm(&mut self, norm: &str);

    fn step_norm(&mut self);

    fn step_channel(&mut self, up: bool);

    fn set_channel(&mut self, channel: &str);

    fn last_channel(&mut self);

    fn step_chanlist(&mut self);

    /// 当前频道名，没有频道表时为 None
    fn channel_name(&self) -> Option<String>;
}
