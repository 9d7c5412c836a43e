/// 收音机调谐器
pub trait RadioTuner: Send {
    fn step_channel(&mut self, up: bool);

    fn set_channel(&mut self, channel: &str);

    /// 设置频率（MHz）
    fn set_freq(&mut self, freq: f32);

    fn step_freq(&mut self, delta: f32);

    /// 当前频道名，没有频道表时为 None
    fn channel_name(&self) -> Option<String>;
}
