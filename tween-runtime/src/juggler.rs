//! # Juggler 模块
//!
//! 调度器：每帧推进所有已注册的可动画对象，并移除已完成的对象。
//!
//! ## 约定
//!
//! - 每个对象每帧收到一次 `advance_time(dt)`，`dt` 非负
//! - 对象在某次推进后报告 `is_complete()`，即被移除，之后不再被推进
//! - 推进过程中新加入的对象（如 Tween 的 `next_tween`）从下一帧开始推进

use tracing::{debug, warn};

use crate::error::{TweenError, TweenResult};
use crate::target::PropertyAccessor;

/// 可动画对象接口
pub trait Animatable {
    /// 推进时间
    ///
    /// # 参数
    /// - `dt`: 距上次推进经过的时间（秒）
    /// - `scheduler`: 正在推进此对象的调度器，用于移交后续对象
    fn advance_time(&mut self, dt: f32, scheduler: &mut dyn Scheduler) -> TweenResult<()>;

    /// 是否已完成
    fn is_complete(&self) -> bool;

    /// 是否在驱动指定目标
    fn animates(&self, _target: &dyn PropertyAccessor) -> bool {
        false
    }
}

/// 调度器接口
pub trait Scheduler {
    /// 注册可动画对象
    fn add(&mut self, object: Box<dyn Animatable>) -> AnimatableId;
}

/// 可动画对象 ID
///
/// 由 `Juggler` 在注册时分配，不会重复。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimatableId(u64);

impl AnimatableId {
    /// 获取内部 ID 值
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for AnimatableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AnimatableId({})", self.0)
    }
}

/// 调度事件
#[derive(Debug, Clone, PartialEq)]
pub enum JugglerEvent {
    /// 对象已注册
    Added(AnimatableId),
    /// 对象已完成并被移除
    Completed(AnimatableId),
    /// 对象推进失败并被移除
    Failed {
        id: AnimatableId,
        error: TweenError,
    },
}

/// 调度器
pub struct Juggler {
    /// 已注册的对象（按注册顺序）
    objects: Vec<(AnimatableId, Box<dyn Animatable>)>,
    /// 下一个对象 ID
    next_id: u64,
    /// 累计经过的时间（已乘以速度）
    elapsed_time: f32,
    /// 时间倍率
    speed: f32,
    /// 待处理的事件队列
    events: Vec<JugglerEvent>,
}

impl Default for Juggler {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Juggler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Juggler")
            .field("objects", &self.objects.len())
            .field("elapsed_time", &self.elapsed_time)
            .field("speed", &self.speed)
            .finish()
    }
}

impl Juggler {
    /// 创建空调度器
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            next_id: 1,
            elapsed_time: 0.0,
            speed: 1.0,
            events: Vec::new(),
        }
    }

    /// 推进所有对象
    ///
    /// # 返回
    /// 本次推进产生的事件（包括上次推进之后 `add` 产生的 `Added`）
    pub fn advance_time(&mut self, dt: f32) -> Vec<JugglerEvent> {
        let dt = (dt * self.speed).max(0.0);
        self.elapsed_time += dt;

        // 推进期间 self.objects 只收集新加入的对象
        let current = std::mem::take(&mut self.objects);
        let mut kept = Vec::with_capacity(current.len());

        for (id, mut object) in current {
            match object.advance_time(dt, self) {
                Ok(()) if object.is_complete() => {
                    debug!(id = id.value(), "动画完成，移出调度器");
                    self.events.push(JugglerEvent::Completed(id));
                }
                Ok(()) => kept.push((id, object)),
                Err(error) => {
                    warn!(id = id.value(), error = %error, "动画推进失败，移出调度器");
                    self.events.push(JugglerEvent::Failed { id, error });
                }
            }
        }

        let added = std::mem::replace(&mut self.objects, kept);
        self.objects.extend(added);

        std::mem::take(&mut self.events)
    }

    /// 移除对象（不会触发任何回调）
    pub fn remove(&mut self, id: AnimatableId) -> Option<Box<dyn Animatable>> {
        let index = self.objects.iter().position(|(i, _)| *i == id)?;
        Some(self.objects.remove(index).1)
    }

    /// 移除所有驱动指定目标的对象
    ///
    /// # 返回
    /// 被移除的对象数量
    pub fn remove_tweens_of(&mut self, target: &dyn PropertyAccessor) -> usize {
        let before = self.objects.len();
        self.objects.retain(|(_, object)| !object.animates(target));
        before - self.objects.len()
    }

    /// 移除所有对象
    pub fn clear(&mut self) {
        self.objects.clear();
    }

    /// 检查对象是否已注册
    pub fn contains(&self, id: AnimatableId) -> bool {
        self.objects.iter().any(|(i, _)| *i == id)
    }

    /// 已注册对象数量
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// 是否没有已注册对象
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// 累计经过的时间（秒）
    pub fn elapsed_time(&self) -> f32 {
        self.elapsed_time
    }

    /// 时间倍率
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// 设置时间倍率（负数按 0 处理）
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed.max(0.0);
    }
}

impl Scheduler for Juggler {
    fn add(&mut self, object: Box<dyn Animatable>) -> AnimatableId {
        let id = AnimatableId(self.next_id);
        self.next_id += 1;
        self.objects.push((id, object));
        self.events.push(JugglerEvent::Added(id));
        id
    }
}
