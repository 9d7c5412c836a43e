use log::debug;

/// 音量控制后端（左右声道，0-100）
pub trait VolumeControl: Send {
    fn volume(&self) -> (f32, f32);

    fn set_volume(&mut self, left: f32, right: f32);
}

/// 软件音量，输出链按当前增益缩放采样
pub struct SoftVolume {
    levels: (f32, f32),
}

impl SoftVolume {
    pub fn new(left: f32, right: f32) -> Self {
        Self {
            levels: (left, right),
        }
    }
}

impl VolumeControl for SoftVolume {
    fn volume(&self) -> (f32, f32) {
        self.levels
    }

    fn set_volume(&mut self, left: f32, right: f32) {
        self.levels = (left, right);
    }
}

/// 混音器
pub struct Mixer {
    control: Box<dyn VolumeControl>,
    step: f32,
    muted: bool,
    last: (f32, f32),
}

impl Mixer {
    pub fn new(control: Box<dyn VolumeControl>, step: f32) -> Self {
        Self {
            control,
            step,
            muted: false,
            last: (0.0, 0.0),
        }
    }

    pub fn volume(&self) -> (f32, f32) {
        self.control.volume()
    }

    /// 左右声道平均音量
    pub fn both_volume(&self) -> f32 {
        let (left, right) = self.volume();
        (left + right) / 2.0
    }

    pub fn set_volume(&mut self, left: f32, right: f32) {
        debug!("设置音量: {:.1} / {:.1}", left, right);
        self.control.set_volume(left, right);
        self.muted = false;
    }

    pub fn inc_volume(&mut self) {
        let (left, right) = self.volume();
        let step = self.step;
        self.set_volume((left + step).min(100.0), (right + step).min(100.0));
    }

    pub fn dec_volume(&mut self) {
        let (left, right) = self.volume();
        let step = self.step;
        self.set_volume((left - step).max(0.0), (right - step).max(0.0));
    }

    /// 切换静音，取消静音时恢复之前的音量
    pub fn toggle_mute(&mut self) {
        if self.muted {
            let (left, right) = self.last;
            self.set_volume(left, right);
        } else {
            self.last = self.volume();
            self.set_volume(0.0, 0.0);
            self.muted = true;
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn step(&self) -> f32 {
        self.step
    }
}

impl Default for Mixer {
    fn default() -> Self {
        Self::new(Box::new(SoftVolume::new(100.0, 100.0)), 3.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inc_dec_clamp() {
        let mut mixer = Mixer::new(Box::new(SoftVolume::new(98.0, 98.0)), 3.0);
        mixer.inc_volume();
        assert_eq!(mixer.volume(), (100.0, 100.0));
        mixer.set_volume(2.0, 4.0);
        mixer.dec_volume();
        assert_eq!(mixer.volume(), (0.0, 1.0));
    }

    #[test]
    fn test_mute_restores_volume() {
        let mut mixer = Mixer::new(Box::new(SoftVolume::new(40.0, 60.0)), 3.0);
        mixer.toggle_mute();
        assert!(mixer.is_muted());
        assert_eq!(mixer.both_volume(), 0.0);
        mixer.toggle_mute();
        assert!(!mixer.is_muted());
        assert_eq!(mixer.volume(), (40.0, 60.0));
    }

    #[test]
    fn test_set_volume_clears_mute() {
        let mut mixer = Mixer::default();
        mixer.toggle_mute();
        mixer.set_volume(10.0, 10.0);
        assert!(!mixer.is_muted());
    }
}
