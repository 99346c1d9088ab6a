//! # Error 模块
//!
//! 定义 tween-runtime 中使用的错误类型。

use thiserror::Error;

/// Tween 错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TweenError {
    /// 属性未声明，或目标对象无法解析该属性名
    #[error("未知属性 '{name}'")]
    UnknownProperty { name: String },

    /// 缓动曲线名称未注册
    #[error("未知缓动曲线 '{name}'")]
    UnknownCurve { name: String },

    /// 时长为负数或非有限值
    #[error("无效的时长 {value}")]
    InvalidDuration { value: f32 },

    /// 目标对象在 Tween 使用前已被释放
    #[error("动画目标已被释放")]
    TargetDropped,
}

impl TweenError {
    pub(crate) fn unknown_property(name: impl Into<String>) -> Self {
        Self::UnknownProperty { name: name.into() }
    }

    pub(crate) fn unknown_curve(name: impl Into<String>) -> Self {
        Self::UnknownCurve { name: name.into() }
    }
}

/// Result 类型别名
pub type TweenResult<T> = Result<T, TweenError>;

/// 校验时长类参数（duration / delay / repeat_delay）
pub(crate) fn check_duration(value: f32) -> TweenResult<f32> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(TweenError::InvalidDuration { value })
    }
}
