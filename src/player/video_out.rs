/// 视频输出控制
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoControl {
    Fullscreen,
    Ontop,
    Rootwin,
    Border,
    Screenshot,
}

/// 视频输出窗口状态
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VoFlags {
    pub fullscreen: bool,
    pub ontop: bool,
    pub rootwin: bool,
    pub border: bool,
}

impl VoFlags {
    pub fn get(&self, ctl: VoControl) -> bool {
        match ctl {
            VoControl::Fullscreen => self.fullscreen,
            VoControl::Ontop => self.ontop,
            VoControl::Rootwin => self.rootwin,
            VoControl::Border => self.border,
            VoControl::Screenshot => false,
        }
    }

    pub fn toggle(&mut self, ctl: VoControl) {
        match ctl {
            VoControl::Fullscreen => self.fullscreen = !self.fullscreen,
            VoControl::Ontop => self.ontop = !self.ontop,
            VoControl::Rootwin => self.rootwin = !self.rootwin,
            VoControl::Border => self.border = !self.border,
            VoControl::Screenshot => {}
        }
    }
}

/// 屏幕与显示区域尺寸
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VoGeometry {
    pub screen_width: i32,
    pub screen_height: i32,
    pub display_width: i32,
    pub display_height: i32,
}

impl VoGeometry {
    /// 去掉全屏黑边，把窗口坐标换算到 [0,1]，落在黑边上返回 None
    pub fn rescale(&self, x: i32, y: i32, fullscreen: bool) -> Option<(f64, f64)> {
        if self.display_width <= 0 || self.display_height <= 0 {
            return None;
        }
        let (mut ix, mut iy) = (x, y);
        if fullscreen {
            if self.screen_width > self.display_width {
                ix -= (self.screen_width - self.display_width) / 2;
            }
            if self.screen_height > self.display_height {
                iy -= (self.screen_height - self.display_height) / 2;
            }
            if ix < 0 || ix > self.display_width || iy < 0 || iy > self.display_height {
                return None;
            }
        }
        Some((
            ix as f64 / self.display_width as f64,
            iy as f64 / self.display_height as f64,
        ))
    }
}

/// 视频输出设备
pub trait VideoOutput: Send {
    /// 是否已完成配置（已打开窗口）
    fn is_configured(&self) -> bool;

    fn control(&mut self, ctl: VoControl) -> bool;

    fn supports_panscan(&self) -> bool;

    fn set_panscan(&mut self, value: f32);

    fn geometry(&self) -> VoGeometry;
}

/// 颜色通道
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorChannel {
    Gamma,
    Brightness,
    Contrast,
    Saturation,
    Hue,
}

impl ColorChannel {
    pub const ALL: [ColorChannel; 5] = [
        ColorChannel::Gamma,
        ColorChannel::Brightness,
        ColorChannel::Contrast,
        ColorChannel::Saturation,
        ColorChannel::Hue,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ColorChannel::Gamma => "gamma",
            ColorChannel::Brightness => "brightness",
            ColorChannel::Contrast => "contrast",
            ColorChannel::Saturation => "saturation",
            ColorChannel::Hue => "hue",
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }
}

/// 视频滤镜链
pub trait VideoFilter: Send {
    fn deinterlace(&self) -> bool;

    fn set_deinterlace(&mut self, on: bool);

    /// 读取颜色值，None 表示滤镜链不支持
    fn color(&self, channel: ColorChannel) -> Option<i32>;

    fn set_color(&mut self, channel: ColorChannel, value: i32) -> bool;

    /// 截图，返回 false 时交给视频输出处理
    fn screenshot(&mut self, mode: i32) -> bool;

    fn change_rectangle(&mut self, what: i32, value: i32);
}
