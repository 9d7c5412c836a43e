use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// 属性值类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueKind {
    Int,
    Flag,
    Float,
    Double,
    String,
    /// 字节偏移（64 位）
    Position,
    /// 枚举选择（整数存储，STEP 时循环）
    Choice,
}

impl ValueKind {
    /// 帮助列表中显示的类型名
    pub fn type_name(&self) -> &'static str {
        match self {
            ValueKind::Int => "Integer",
            ValueKind::Flag => "Flag",
            ValueKind::Float => "Float",
            ValueKind::Double => "Double",
            ValueKind::String => "String",
            ValueKind::Position => "Position",
            ValueKind::Choice => "Choice",
        }
    }
}

/// 属性值（与 ValueKind 一一对应的带标签联合体）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    Int(i32),
    Flag(bool),
    Float(f32),
    Double(f64),
    String(String),
    Position(i64),
    Choice(i32),
}

impl PropertyValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            PropertyValue::Int(_) => ValueKind::Int,
            PropertyValue::Flag(_) => ValueKind::Flag,
            PropertyValue::Float(_) => ValueKind::Float,
            PropertyValue::Double(_) => ValueKind::Double,
            PropertyValue::String(_) => ValueKind::String,
            PropertyValue::Position(_) => ValueKind::Position,
            PropertyValue::Choice(_) => ValueKind::Choice,
        }
    }

    /// 数值视图，字符串返回 None
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PropertyValue::Int(v) | PropertyValue::Choice(v) => Some(*v as f64),
            PropertyValue::Flag(v) => Some(if *v { 1.0 } else { 0.0 }),
            PropertyValue::Float(v) => Some(*v as f64),
            PropertyValue::Double(v) => Some(*v),
            PropertyValue::Position(v) => Some(*v as f64),
            PropertyValue::String(_) => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        self.as_f64().map(round_to_i32)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// 转换为目标类型，数值类型之间互转（浮点转整数四舍五入），字符串只接受字符串
    pub fn coerce(self, kind: ValueKind) -> Option<PropertyValue> {
        if self.kind() == kind {
            return Some(self);
        }
        if kind == ValueKind::String {
            return None;
        }
        let v = self.as_f64()?;
        Some(match kind {
            ValueKind::Int => PropertyValue::Int(round_to_i32(v)),
            ValueKind::Choice => PropertyValue::Choice(round_to_i32(v)),
            ValueKind::Flag => PropertyValue::Flag(v != 0.0),
            ValueKind::Float => PropertyValue::Float(v as f32),
            ValueKind::Double => PropertyValue::Double(v),
            ValueKind::Position => PropertyValue::Position(v.round() as i64),
            ValueKind::String => return None,
        })
    }

    /// 按类型解析文本
    pub fn parse(kind: ValueKind, text: &str) -> Option<PropertyValue> {
        let text = text.trim();
        match kind {
            ValueKind::Int => text.parse().ok().map(PropertyValue::Int),
            ValueKind::Choice => text.parse().ok().map(PropertyValue::Choice),
            ValueKind::Position => text.parse().ok().map(PropertyValue::Position),
            ValueKind::Float => text.parse().ok().map(PropertyValue::Float),
            ValueKind::Double => text.parse().ok().map(PropertyValue::Double),
            ValueKind::Flag => match text.to_ascii_lowercase().as_str() {
                "yes" | "on" | "1" | "true" => Some(PropertyValue::Flag(true)),
                "no" | "off" | "0" | "false" => Some(PropertyValue::Flag(false)),
                _ => None,
            },
            ValueKind::String => Some(PropertyValue::String(text.to_string())),
        }
    }

    /// 通用格式化，用于 PRINT 回退和 ANS_ 应答
    pub fn format_plain(&self) -> String {
        match self {
            PropertyValue::Int(v) | PropertyValue::Choice(v) => v.to_string(),
            PropertyValue::Flag(v) => if *v { "yes" } else { "no" }.to_string(),
            PropertyValue::Float(v) => format!("{:.6}", v),
            PropertyValue::Double(v) => format!("{:.6}", v),
            PropertyValue::Position(v) => v.to_string(),
            PropertyValue::String(s) => s.clone(),
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_plain())
    }
}

fn round_to_i32(v: f64) -> i32 {
    v.round().clamp(i32::MIN as f64, i32::MAX as f64) as i32
}

/// 属性动作
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Get,
    Set(PropertyValue),
    StepUp(Option<PropertyValue>),
    StepDown(Option<PropertyValue>),
    Print,
    /// 解析文本后按 Set 处理
    Parse(String),
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Get => "GET",
            Action::Set(_) => "SET",
            Action::StepUp(_) => "STEP_UP",
            Action::StepDown(_) => "STEP_DOWN",
            Action::Print => "PRINT",
            Action::Parse(_) => "PARSE",
        }
    }

    pub fn is_write(&self) -> bool {
        matches!(
            self,
            Action::Set(_) | Action::StepUp(_) | Action::StepDown(_) | Action::Parse(_)
        )
    }
}

/// 属性动作失败结果
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyError {
    #[error("属性当前不可用")]
    Unavailable,

    #[error("属性操作失败")]
    Error,

    #[error("属性已被禁用")]
    Disabled,

    #[error("属性不支持该动作")]
    NotImplemented,
}

/// 属性动作成功结果
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// 写动作完成
    Done,
    /// GET 的值
    Value(PropertyValue),
    /// PRINT 的文本
    Text(String),
}

pub type PropertyResult = std::result::Result<Reply, PropertyError>;

/// 扁平化的动作结果，用于日志和测试
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ok,
    Unavailable,
    Error,
    Disabled,
    NotImplemented,
}

impl Outcome {
    pub fn of(result: &PropertyResult) -> Self {
        match result {
            Ok(_) => Outcome::Ok,
            Err(PropertyError::Unavailable) => Outcome::Unavailable,
            Err(PropertyError::Error) => Outcome::Error,
            Err(PropertyError::Disabled) => Outcome::Disabled,
            Err(PropertyError::NotImplemented) => Outcome::NotImplemented,
        }
    }
}

/// 字幕帧（时间单位：毫秒）
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleFrame {
    pub pts: i64,
    pub duration: i64,
    pub end_pts: i64,
    pub text: String,
}
