/// 数字电视调谐器
pub trait DvbTuner: Send {
    /// 前端是否已打开
    fn is_on(&self) -> bool;

    /// 当前频道在频道表中的序号
    fn current_channel(&self) -> i32;

    /// 切换到指定卡上的频道，成功后需要重新打开流
    fn set_channel(&mut self, card: i32, channel: i32) -> bool;
}
