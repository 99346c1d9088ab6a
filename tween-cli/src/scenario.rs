//! # Scenario 模块
//!
//! 场景文件：一个属性表目标加若干 Tween 配置，按固定帧率播放。
//!
//! ```json
//! {
//!   "target": { "x": 0.0, "alpha": 1.0 },
//!   "frame_rate": 30.0,
//!   "duration": 2.0,
//!   "tweens": [
//!     { "duration": 1.0, "easing": "easeOut", "properties": { "x": 100.0 } }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use anyhow::{Context, bail};
use serde::Deserialize;
use tracing::{debug, info};
use tween_runtime::{EasingRegistry, Juggler, JugglerEvent, PropertyMap, Scheduler, TweenConfig};

/// 场景描述
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    /// 目标对象的初始属性
    pub target: BTreeMap<String, f32>,

    /// 帧率（帧/秒）
    #[serde(default = "default_frame_rate")]
    pub frame_rate: f32,

    /// 播放时长（秒）
    pub duration: f32,

    /// 同时加入调度器的 Tween
    #[serde(default)]
    pub tweens: Vec<TweenConfig>,
}

fn default_frame_rate() -> f32 {
    60.0
}

/// 一帧的属性快照
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub index: u32,
    pub time: f32,
    pub values: Vec<(String, f32)>,
}

impl Scenario {
    /// 从 JSON 文件加载
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("读取场景文件失败: {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("解析场景文件失败: {}", path.display()))
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// 播放场景
    ///
    /// # 参数
    /// - `frame_rate`: 帧率
    /// - `every`: 每隔多少帧记录一次（首帧和末帧总会记录）
    pub fn play(&self, frame_rate: f32, every: u32) -> anyhow::Result<Vec<Frame>> {
        if !(frame_rate.is_finite() && frame_rate > 0.0) {
            bail!("帧率必须为正数: {frame_rate}");
        }
        if !(self.duration.is_finite() && self.duration >= 0.0) {
            bail!("播放时长不能为负数: {}", self.duration);
        }
        let every = every.max(1);

        let target: Rc<PropertyMap> = Rc::new(
            self.target
                .iter()
                .map(|(name, value)| (name.clone(), *value))
                .collect(),
        );
        let registry = Rc::new(EasingRegistry::new());

        let mut juggler = Juggler::new();
        for (index, config) in self.tweens.iter().enumerate() {
            let tween = config
                .build(&target, &registry)
                .with_context(|| format!("第 {} 个 Tween 配置无效", index + 1))?;
            juggler.add(Box::new(tween));
        }

        let dt = 1.0 / frame_rate;
        let total = (self.duration * frame_rate).ceil() as u32;
        debug!(frames = total, tweens = self.tweens.len(), "开始播放场景");

        let mut frames = vec![Frame::capture(0, 0.0, &target)];
        for index in 1..=total {
            for event in juggler.advance_time(dt) {
                // 失败已由调度器记录
                if let JugglerEvent::Completed(id) = event {
                    info!(id = id.value(), frame = index, "动画完成");
                }
            }
            if index % every == 0 || index == total {
                frames.push(Frame::capture(index, index as f32 / frame_rate, &target));
            }
        }
        Ok(frames)
    }
}

impl Frame {
    fn capture(index: u32, time: f32, target: &PropertyMap) -> Self {
        Self {
            index,
            time,
            values: target.snapshot(),
        }
    }
}
