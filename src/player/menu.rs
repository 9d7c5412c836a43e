/// 菜单导航结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuResult {
    /// 无变化
    Idle,
    /// 高亮了某个按钮
    Selected(i32),
    /// 标题切换，需要重新初始化播放
    Reinit,
}

/// 光盘菜单导航
pub trait MenuNavigator: Send {
    fn handle_input(&mut self, command: i32) -> MenuResult;

    /// 鼠标移动到视频坐标，返回被选中的按钮
    fn update_mouse(&mut self, x: i32, y: i32) -> Option<i32>;
}
