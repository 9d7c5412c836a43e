/// 音频流信息
#[derive(Debug, Clone, PartialEq)]
pub struct AudioStreamInfo {
    /// 编码标签
    pub format: i32,
    /// 码率（字节/秒）
    pub bitrate: i32,
    pub samplerate: i32,
    pub channels: i32,
    pub codec: String,
}

/// 视频流信息
#[derive(Debug, Clone, PartialEq)]
pub struct VideoStreamInfo {
    pub format: i32,
    /// 码率（字节/秒）
    pub bitrate: i32,
    pub width: i32,
    pub height: i32,
    pub fps: f32,
    pub aspect: f32,
    /// 当前视频时间戳（秒）
    pub pts: f64,
    pub codec: String,
}

/// 解码输出链
///
/// 轨道切换时拆除、重建解码器和输出设备
pub trait Pipeline: Send {
    /// 拆除音频输出和解码器
    fn uninit_audio(&mut self);

    /// 为新音频流重建输出链
    fn reinit_audio(&mut self, id: i32) -> Option<AudioStreamInfo>;

    /// 拆除视频解码器，`keep_vo` 为真时保留视频输出
    fn uninit_video(&mut self, keep_vo: bool);

    fn reinit_video(&mut self, id: i32) -> Option<VideoStreamInfo>;

    /// 播放速度变化后重建音频滤镜
    fn rebuild_audio_filters(&mut self, speed: f32);

    /// 正在播放的音频时间戳（秒）
    fn audio_pts(&self) -> Option<f64>;

    /// 字幕选择变化后刷新
    fn refresh_subtitles(&mut self);

    /// 按新宽高比重新配置视频输出
    fn configure_vo(&mut self, width: i32, height: i32, aspect: f32);
}
