//! # Easing 模块
//!
//! 缓动曲线库，以及按名称解析曲线的注册表。
//!
//! 曲线的输入为线性进度 (0.0 - 1.0)，输出不做限制：
//! Back / Elastic 类曲线会超出 [0, 1]。

use std::collections::HashMap;
use std::f32::consts::{PI, TAU};
use std::fmt;
use std::rc::Rc;

use crate::error::{TweenError, TweenResult};

/// 缓动函数对象
pub type EasingFn = Rc<dyn Fn(f32) -> f32>;

/// 内置缓动函数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EasingFunction {
    /// 线性（匀速）
    #[default]
    Linear,
    /// 缓入（先慢后快）
    EaseIn,
    /// 缓出（先快后慢）
    EaseOut,
    /// 缓入缓出（两头慢中间快）
    EaseInOut,
    /// 缓出缓入（两头快中间慢）
    EaseOutIn,
    /// 二次缓入
    EaseInQuad,
    /// 二次缓出
    EaseOutQuad,
    /// 二次缓入缓出
    EaseInOutQuad,
    /// 三次缓入
    EaseInCubic,
    /// 三次缓出
    EaseOutCubic,
    /// 三次缓入缓出
    EaseInOutCubic,
    /// 正弦缓入
    EaseInSine,
    /// 正弦缓出
    EaseOutSine,
    /// 正弦缓入缓出
    EaseInOutSine,
    /// 回弹缓入（起步先反向）
    EaseInBack,
    /// 回弹缓出（终点前越过目标）
    EaseOutBack,
    /// 回弹缓入缓出
    EaseInOutBack,
    /// 弹性缓入
    EaseInElastic,
    /// 弹性缓出
    EaseOutElastic,
    /// 弹性缓入缓出
    EaseInOutElastic,
    /// 弹跳缓入
    EaseInBounce,
    /// 弹跳缓出
    EaseOutBounce,
    /// 弹跳缓入缓出
    EaseInOutBounce,
}

impl EasingFunction {
    /// 全部内置曲线
    pub const ALL: [EasingFunction; 23] = [
        Self::Linear,
        Self::EaseIn,
        Self::EaseOut,
        Self::EaseInOut,
        Self::EaseOutIn,
        Self::EaseInQuad,
        Self::EaseOutQuad,
        Self::EaseInOutQuad,
        Self::EaseInCubic,
        Self::EaseOutCubic,
        Self::EaseInOutCubic,
        Self::EaseInSine,
        Self::EaseOutSine,
        Self::EaseInOutSine,
        Self::EaseInBack,
        Self::EaseOutBack,
        Self::EaseInOutBack,
        Self::EaseInElastic,
        Self::EaseOutElastic,
        Self::EaseInOutElastic,
        Self::EaseInBounce,
        Self::EaseOutBounce,
        Self::EaseInOutBounce,
    ];

    /// 曲线名称（camelCase，如 `easeInOut`）
    pub fn name(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::EaseIn => "easeIn",
            Self::EaseOut => "easeOut",
            Self::EaseInOut => "easeInOut",
            Self::EaseOutIn => "easeOutIn",
            Self::EaseInQuad => "easeInQuad",
            Self::EaseOutQuad => "easeOutQuad",
            Self::EaseInOutQuad => "easeInOutQuad",
            Self::EaseInCubic => "easeInCubic",
            Self::EaseOutCubic => "easeOutCubic",
            Self::EaseInOutCubic => "easeInOutCubic",
            Self::EaseInSine => "easeInSine",
            Self::EaseOutSine => "easeOutSine",
            Self::EaseInOutSine => "easeInOutSine",
            Self::EaseInBack => "easeInBack",
            Self::EaseOutBack => "easeOutBack",
            Self::EaseInOutBack => "easeInOutBack",
            Self::EaseInElastic => "easeInElastic",
            Self::EaseOutElastic => "easeOutElastic",
            Self::EaseInOutElastic => "easeInOutElastic",
            Self::EaseInBounce => "easeInBounce",
            Self::EaseOutBounce => "easeOutBounce",
            Self::EaseInOutBounce => "easeInOutBounce",
        }
    }

    /// 按名称查找内置曲线
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|e| e.name() == name)
    }

    /// 计算缓动值
    ///
    /// # 参数
    /// - `t`: 时间进度 (0.0 - 1.0)，超出范围会被限制
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            Self::Linear => t,
            Self::EaseIn | Self::EaseInCubic => ease_in_cubic(t),
            Self::EaseOut | Self::EaseOutCubic => ease_out_cubic(t),
            Self::EaseInOut | Self::EaseInOutCubic => combine(ease_in_cubic, ease_out_cubic, t),
            Self::EaseOutIn => combine(ease_out_cubic, ease_in_cubic, t),
            Self::EaseInQuad => t * t,
            Self::EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Self::EaseInSine => 1.0 - (t * PI / 2.0).cos(),
            Self::EaseOutSine => (t * PI / 2.0).sin(),
            Self::EaseInOutSine => -((PI * t).cos() - 1.0) / 2.0,
            Self::EaseInBack => ease_in_back(t),
            Self::EaseOutBack => ease_out_back(t),
            Self::EaseInOutBack => combine(ease_in_back, ease_out_back, t),
            Self::EaseInElastic => 1.0 - ease_out_elastic(1.0 - t),
            Self::EaseOutElastic => ease_out_elastic(t),
            Self::EaseInOutElastic => combine(
                |t| 1.0 - ease_out_elastic(1.0 - t),
                ease_out_elastic,
                t,
            ),
            Self::EaseInBounce => 1.0 - ease_out_bounce(1.0 - t),
            Self::EaseOutBounce => ease_out_bounce(t),
            Self::EaseInOutBounce => combine(|t| 1.0 - ease_out_bounce(1.0 - t), ease_out_bounce, t),
        }
    }

    /// 包装为函数对象
    pub fn to_fn(self) -> EasingFn {
        Rc::new(move |t| self.apply(t))
    }
}

impl fmt::Display for EasingFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 前半段用 `first`、后半段用 `second` 拼接成一条曲线
fn combine(first: impl Fn(f32) -> f32, second: impl Fn(f32) -> f32, t: f32) -> f32 {
    if t < 0.5 {
        0.5 * first(t * 2.0)
    } else {
        0.5 * second((t - 0.5) * 2.0) + 0.5
    }
}

fn ease_in_cubic(t: f32) -> f32 {
    t * t * t
}

fn ease_out_cubic(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}

const BACK_OVERSHOOT: f32 = 1.70158;

fn ease_in_back(t: f32) -> f32 {
    t * t * ((BACK_OVERSHOOT + 1.0) * t - BACK_OVERSHOOT)
}

fn ease_out_back(t: f32) -> f32 {
    let inv = t - 1.0;
    inv * inv * ((BACK_OVERSHOOT + 1.0) * inv + BACK_OVERSHOOT) + 1.0
}

/// 弹性振荡周期
const ELASTIC_PERIOD: f32 = TAU / 3.0;

/// 弹性缓出：衰减的正弦振荡，端点精确落在 0 / 1
fn ease_out_elastic(t: f32) -> f32 {
    if t <= 0.0 || t >= 1.0 {
        return t.clamp(0.0, 1.0);
    }
    2.0_f32.powf(-10.0 * t) * ((10.0 * t - 0.75) * ELASTIC_PERIOD).sin() + 1.0
}

const BOUNCE_SPAN: f32 = 2.75;
const BOUNCE_STIFFNESS: f32 = 7.5625;

/// 每段弹跳：(结束位置, 顶点位置, 顶点高度)，位置以 `1 / BOUNCE_SPAN` 为单位
const BOUNCES: [(f32, f32, f32); 4] = [
    (1.0, 0.0, 0.0),
    (2.0, 1.5, 0.75),
    (2.5, 2.25, 0.9375),
    (f32::INFINITY, 2.625, 0.984375),
];

/// 弹跳缓出：四段抛物线
fn ease_out_bounce(t: f32) -> f32 {
    let x = t * BOUNCE_SPAN;
    let (_, apex, height) = BOUNCES
        .iter()
        .copied()
        .find(|(end, _, _)| x < *end)
        .unwrap_or(BOUNCES[3]);
    let d = (x - apex) / BOUNCE_SPAN;
    BOUNCE_STIFFNESS * d * d + height
}

/// 缓动选择器
///
/// `Custom` 总是优先于名称；名称在解析时才查找注册表。
#[derive(Clone)]
pub enum Easing {
    /// 按名称引用的曲线
    Named(String),
    /// 用户提供的曲线
    Custom(EasingFn),
}

impl Easing {
    /// 包装一个自定义曲线
    pub fn custom(f: impl Fn(f32) -> f32 + 'static) -> Self {
        Self::Custom(Rc::new(f))
    }

    /// 曲线名称（自定义曲线返回 `None`）
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Named(name) => Some(name),
            Self::Custom(_) => None,
        }
    }
}

impl Default for Easing {
    fn default() -> Self {
        EasingFunction::Linear.into()
    }
}

impl fmt::Debug for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl From<&str> for Easing {
    fn from(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

impl From<String> for Easing {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

impl From<EasingFunction> for Easing {
    fn from(function: EasingFunction) -> Self {
        Self::Named(function.name().to_string())
    }
}

/// 缓动曲线注册表
///
/// 内置曲线无需注册；`register` 添加的同名曲线会覆盖内置曲线。
/// 注册表是普通的值，由使用方显式持有。
#[derive(Default, Clone)]
pub struct EasingRegistry {
    custom: HashMap<String, EasingFn>,
}

impl fmt::Debug for EasingRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.custom.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("EasingRegistry")
            .field("custom", &names)
            .finish()
    }
}

impl EasingRegistry {
    /// 创建只包含内置曲线的注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册自定义名称的曲线
    pub fn register(&mut self, name: impl Into<String>, f: impl Fn(f32) -> f32 + 'static) {
        self.custom.insert(name.into(), Rc::new(f));
    }

    /// 名称是否可解析
    pub fn contains(&self, name: &str) -> bool {
        self.custom.contains_key(name) || EasingFunction::from_name(name).is_some()
    }

    /// 解析缓动选择器
    pub fn resolve(&self, easing: &Easing) -> TweenResult<EasingFn> {
        match easing {
            Easing::Custom(f) => Ok(Rc::clone(f)),
            Easing::Named(name) => self.resolve_name(name),
        }
    }

    /// 按名称解析
    pub fn resolve_name(&self, name: &str) -> TweenResult<EasingFn> {
        if let Some(f) = self.custom.get(name) {
            return Ok(Rc::clone(f));
        }
        EasingFunction::from_name(name)
            .map(EasingFunction::to_fn)
            .ok_or_else(|| TweenError::unknown_curve(name))
    }
}
