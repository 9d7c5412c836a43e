// 属性系统：带类型的属性描述、注册表和动作协议

pub mod audio;
pub mod expand;
pub mod general;
pub mod helpers;
pub mod registry;
pub mod subtitle;
#[cfg(feature = "tv")]
pub mod tv;
pub mod video;

use crate::core::{Action, PropertyResult, ValueKind};
use crate::player::PlaybackContext;
use bitflags::bitflags;

pub use registry::{PropertyHelp, Registry, ROUND_TRIP_EXCEPTIONS};

bitflags! {
    /// 取值约束
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Constraint: u8 {
        const MIN = 0b01;
        const MAX = 0b10;
        const RANGE = Self::MIN.bits() | Self::MAX.bits();
    }
}

/// 属性动作处理器，每个属性组一个实现
pub trait PropertyHandler: Sync {
    /// 执行动作。进入这里的值已经转换成属性自身的类型，`Parse` 已被转换为 `Set`
    fn handle(
        &self,
        prop: &PropertyDescriptor,
        action: &Action,
        ctx: &mut PlaybackContext,
    ) -> PropertyResult;
}

/// 属性描述
pub struct PropertyDescriptor {
    pub name: &'static str,
    pub kind: ValueKind,
    pub constraint: Constraint,
    pub min: f64,
    pub max: f64,
    pub handler: &'static dyn PropertyHandler,
}

impl PropertyDescriptor {
    /// 先检查下限，低于下限取下限；否则检查上限
    pub fn clamp(&self, value: f64) -> f64 {
        if self.constraint.contains(Constraint::MIN) && value < self.min {
            self.min
        } else if self.constraint.contains(Constraint::MAX) && value > self.max {
            self.max
        } else {
            value
        }
    }

    pub fn clamp_i32(&self, value: i32) -> i32 {
        self.clamp(value as f64) as i32
    }

    pub fn clamp_f32(&self, value: f32) -> f32 {
        self.clamp(value as f64) as f32
    }

    pub fn min_i32(&self) -> i32 {
        self.min as i32
    }

    pub fn max_i32(&self) -> i32 {
        self.max as i32
    }
}

impl std::fmt::Debug for PropertyDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertyDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("constraint", &self.constraint)
            .field("min", &self.min)
            .field("max", &self.max)
            .finish()
    }
}
