//! # Property 模块
//!
//! 单个属性的动画记录。
//!
//! 属性名决定插值方式：
//! - 名称含 `color` / `Color`，或以 `#rgb` 结尾：`0xRRGGBB` 颜色，三个通道分别插值
//! - 以 `#rad` 结尾：弧度角，走最短弧
//! - 以 `#deg` 结尾：角度，走最短弧
//! - 其他：普通数值
//!
//! 后缀只用于声明，写回目标时会被去掉。

use std::f32::consts::TAU;

const SUFFIX_RGB: &str = "#rgb";
const SUFFIX_RAD: &str = "#rad";
const SUFFIX_DEG: &str = "#deg";

/// 属性值类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueKind {
    /// 普通数值
    #[default]
    Plain,
    /// 打包为 `0xRRGGBB` 的颜色
    Color,
    /// 弧度角
    AngleRadians,
    /// 角度
    AngleDegrees,
}

impl ValueKind {
    /// 解析声明名
    ///
    /// # 返回
    /// `(写回目标时使用的属性名, 值类型)`
    pub fn parse(declared: &str) -> (&str, ValueKind) {
        if let Some(key) = declared.strip_suffix(SUFFIX_RGB) {
            (key, Self::Color)
        } else if let Some(key) = declared.strip_suffix(SUFFIX_RAD) {
            (key, Self::AngleRadians)
        } else if let Some(key) = declared.strip_suffix(SUFFIX_DEG) {
            (key, Self::AngleDegrees)
        } else if declared.contains("color") || declared.contains("Color") {
            (declared, Self::Color)
        } else {
            (declared, Self::Plain)
        }
    }

    /// 一整圈的大小（非角度类型返回 `None`）
    fn full_turn(self) -> Option<f32> {
        match self {
            Self::AngleRadians => Some(TAU),
            Self::AngleDegrees => Some(360.0),
            Self::Plain | Self::Color => None,
        }
    }

    /// 调整终值，使 `end - start` 落在最短的有向弧上
    fn shortest_arc_end(self, start: f32, end: f32) -> f32 {
        let Some(turn) = self.full_turn() else {
            return end;
        };
        let half = turn / 2.0;
        let mut delta = (end - start) % turn;
        if delta > half {
            delta -= turn;
        } else if delta < -half {
            delta += turn;
        }
        start + delta
    }
}

/// 属性动画记录
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyAnimation {
    /// 声明时使用的名称（可能带后缀）
    name: String,
    /// 目标对象上的属性名
    key: String,
    /// 值类型
    kind: ValueKind,
    /// 起始值（Tween 真正开始时才从目标读取）
    start: Option<f32>,
    /// 声明的终值
    end: f32,
    /// 本次运行实际使用的终值（角度已按最短弧调整）
    run_end: f32,
}

impl PropertyAnimation {
    /// 创建记录
    pub fn new(declared: impl Into<String>, end: f32) -> Self {
        let name = declared.into();
        let (key, kind) = ValueKind::parse(&name);
        let key = key.to_string();
        Self {
            name,
            key,
            kind,
            start: None,
            end,
            run_end: end,
        }
    }

    /// 声明名
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 目标属性名
    pub fn key(&self) -> &str {
        &self.key
    }

    /// 值类型
    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// 起始值（尚未开始时为 `None`）
    pub fn start_value(&self) -> Option<f32> {
        self.start
    }

    /// 声明的终值
    pub fn end_value(&self) -> f32 {
        self.end
    }

    /// 替换终值（已开始的记录会重新计算最短弧）
    pub(crate) fn set_end(&mut self, end: f32) {
        self.end = end;
        self.run_end = match self.start {
            Some(start) => self.kind.shortest_arc_end(start, end),
            None => end,
        };
    }

    /// 记录起始值，并确定本次运行的终值
    pub(crate) fn capture_start(&mut self, start: f32) {
        self.start = Some(start);
        self.run_end = self.kind.shortest_arc_end(start, self.end);
    }

    /// 计算缓动进度 `eased` 下的值
    ///
    /// 未开始的记录直接返回终值。
    pub fn value_at(&self, eased: f32, round_to_int: bool) -> f32 {
        let Some(start) = self.start else {
            return self.end;
        };

        match self.kind {
            ValueKind::Color => lerp_color(start, self.run_end, eased),
            ValueKind::Plain | ValueKind::AngleRadians | ValueKind::AngleDegrees => {
                let value = lerp(start, self.run_end, eased);
                if round_to_int { value.round() } else { value }
            }
        }
    }
}

fn lerp(start: f32, end: f32, t: f32) -> f32 {
    start + (end - start) * t
}

/// 三个 8 位通道分别插值，截断并限制在 0..=255
fn lerp_color(start: f32, end: f32, t: f32) -> f32 {
    let start = start as u32;
    let end = end as u32;
    let mut packed = 0u32;
    for shift in [16, 8, 0] {
        let s = ((start >> shift) & 0xFF) as f32;
        let e = ((end >> shift) & 0xFF) as f32;
        let channel = lerp(s, e, t).clamp(0.0, 255.0) as u32;
        packed |= channel << shift;
    }
    packed as f32
}
