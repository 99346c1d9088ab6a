//! # Config 模块
//!
//! 可序列化的 Tween 描述，用于从配置文件构建动画。
//!
//! ```json
//! {
//!   "duration": 1.0,
//!   "easing": "easeOut",
//!   "repeat_count": 2,
//!   "reverse": true,
//!   "properties": { "x": 100.0, "rotation#deg": 90.0 },
//!   "next": { "duration": 0.5, "properties": { "alpha": 0.0 } }
//! }
//! ```

use std::collections::BTreeMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::easing::EasingRegistry;
use crate::error::TweenResult;
use crate::target::PropertyAccessor;
use crate::tween::Tween;

/// Tween 配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TweenConfig {
    /// 时长（秒）
    pub duration: f32,

    /// 缓动曲线名称
    #[serde(default = "default_easing")]
    pub easing: String,

    /// 开始前的延迟
    #[serde(default)]
    pub delay: f32,

    /// 运行轮数，0 表示无限
    #[serde(default = "default_repeat_count")]
    pub repeat_count: u32,

    /// 两轮之间的停顿
    #[serde(default)]
    pub repeat_delay: f32,

    /// 偶数轮反向运行
    #[serde(default)]
    pub reverse: bool,

    /// 写回前四舍五入
    #[serde(default)]
    pub round_to_int: bool,

    /// 属性声明名 -> 终值
    #[serde(default)]
    pub properties: BTreeMap<String, f32>,

    /// 完成后接着运行的 Tween
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<Box<TweenConfig>>,
}

fn default_easing() -> String {
    "linear".to_string()
}

fn default_repeat_count() -> u32 {
    1
}

impl TweenConfig {
    /// 只指定时长，其余取默认值
    pub fn new(duration: f32) -> Self {
        Self {
            duration,
            easing: default_easing(),
            delay: 0.0,
            repeat_count: default_repeat_count(),
            repeat_delay: 0.0,
            reverse: false,
            round_to_int: false,
            properties: BTreeMap::new(),
            next: None,
        }
    }

    /// 按配置构建 Tween（连同 `next` 链）
    pub fn build<T: PropertyAccessor + 'static>(
        &self,
        target: &Rc<T>,
        registry: &Rc<EasingRegistry>,
    ) -> TweenResult<Tween> {
        let mut tween =
            Tween::with_registry(target, self.duration, self.easing.as_str(), Rc::clone(registry))?;
        tween.set_delay(self.delay)?;
        tween.set_repeat_count(self.repeat_count);
        tween.set_repeat_delay(self.repeat_delay)?;
        tween.set_reverse(self.reverse);
        tween.set_round_to_int(self.round_to_int);
        tween.animate_properties(self.properties.iter().map(|(k, v)| (k.as_str(), *v)));

        if let Some(next) = &self.next {
            tween.set_next_tween(next.build(target, registry)?);
        }
        Ok(tween)
    }
}
