use crate::core::Result;
use log::{info, warn};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

/// EDL 标记结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EdlMark {
    /// 记录了跳过区间起点
    Started(f64),
    /// 写入了完整区间
    Written(f64, f64),
    /// 终点早于起点，区间作废
    BadStop,
}

/// EDL 输出（跳过区间记录）
#[derive(Default)]
pub struct EdlRecorder {
    file: Option<File>,
    begin: Option<f64>,
}

impl EdlRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建 EDL 输出文件
    pub fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        info!("EDL 输出文件: {}", path.display());
        Ok(Self {
            file: Some(file),
            begin: None,
        })
    }

    pub fn is_active(&self) -> bool {
        self.file.is_some()
    }

    /// 第一次调用记录起点，第二次写入 `start end 0`
    pub fn mark(&mut self, pts: f64) -> Result<Option<EdlMark>> {
        let Some(file) = self.file.as_mut() else {
            return Ok(None);
        };
        match self.begin.take() {
            None => {
                self.begin = Some(pts);
                info!("EDL 跳过区间开始: {:.2}", pts);
                Ok(Some(EdlMark::Started(pts)))
            }
            Some(begin) if begin > pts => {
                warn!("EDL 终点早于起点，已忽略");
                Ok(Some(EdlMark::BadStop))
            }
            Some(begin) => {
                writeln!(file, "{:.6} {:.6} {}", begin, pts, 0)?;
                file.flush()?;
                info!("EDL 跳过区间结束: {:.2}", pts);
                Ok(Some(EdlMark::Written(begin, pts)))
            }
        }
    }
}
