//! # Tween 模块
//!
//! 在给定时长内把目标对象的若干数值属性从当前值插值到终值。
//!
//! ## 状态机
//!
//! ```text
//! Waiting ──延迟结束──► Running ──本轮结束──► Complete
//!                         ▲  │
//!                         │  └──还有重复──► RepeatPause（仅 repeat_delay > 0）
//!                         └─────────────────────┘
//! ```
//!
//! - 起始值在延迟结束、真正开始运行时才从目标读取
//! - 一次 `advance` 跨越多个阶段时，剩余时间会在同一次调用里继续消耗
//! - 一次 `advance` 跨越多轮重复时，每一轮都会单独触发 `on_update` 和 `on_repeat`，
//!   最多 [`MAX_CYCLES_PER_ADVANCE`] 轮；其余完整周期直接跳过，不写属性也不触发回调

use std::fmt;
use std::rc::{Rc, Weak};

use tracing::debug;

use crate::easing::{Easing, EasingFn, EasingRegistry};
use crate::error::{TweenError, TweenResult, check_duration};
use crate::juggler::{Animatable, Scheduler};
use crate::property::PropertyAnimation;
use crate::target::PropertyAccessor;

/// 不超过此值的时长视为瞬时完成
pub const MIN_DURATION: f32 = 0.0001;

/// 一次 `advance` 中逐轮处理（触发回调）的最大轮数
///
/// 超出部分的完整周期按算术合并，只保留重复轮数的奇偶性。
pub const MAX_CYCLES_PER_ADVANCE: u32 = 64;

/// 生命周期回调
pub type TweenCallback = Box<dyn FnMut(&Tween)>;

/// Tween 状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TweenState {
    /// 等待延迟结束
    #[default]
    Waiting,
    /// 正在插值
    Running,
    /// 两轮重复之间的停顿
    RepeatPause,
    /// 已完成
    Complete,
}

#[derive(Debug, Clone, Copy)]
enum Phase {
    Start,
    Update,
    Repeat,
    Complete,
}

#[derive(Default)]
struct Callbacks {
    on_start: Option<TweenCallback>,
    on_update: Option<TweenCallback>,
    on_repeat: Option<TweenCallback>,
    on_complete: Option<TweenCallback>,
}

impl Callbacks {
    fn slot(&mut self, phase: Phase) -> &mut Option<TweenCallback> {
        match phase {
            Phase::Start => &mut self.on_start,
            Phase::Update => &mut self.on_update,
            Phase::Repeat => &mut self.on_repeat,
            Phase::Complete => &mut self.on_complete,
        }
    }
}

/// 属性补间动画
///
/// # 使用示例
///
/// ```rust,ignore
/// let sprite = Rc::new(PropertyMap::new().with("x", 0.0).with("alpha", 1.0));
///
/// let mut tween = Tween::new(&sprite, 2.0, "easeInOut")?;
/// tween.move_to(50.0, 20.0);
/// tween.fade_to(0.0);
/// tween.set_on_complete(|_| println!("done"));
///
/// juggler.add(Box::new(tween));
/// ```
pub struct Tween {
    /// 动画目标（不持有所有权）
    target: Weak<dyn PropertyAccessor>,
    /// 属性记录，按目标属性名唯一
    properties: Vec<PropertyAnimation>,
    /// 解析缓动名称用的注册表
    registry: Rc<EasingRegistry>,
    /// 缓动选择器
    easing: Easing,
    /// 已解析的缓动曲线
    curve: EasingFn,
    /// 总时长（秒）
    total_time: f32,
    /// 本轮已运行的时间（不含延迟）
    current_time: f32,
    /// 开始前的延迟
    delay: f32,
    /// 当前延迟 / 重复停顿剩余的时间
    pending: f32,
    /// 运行轮数，0 表示无限
    repeat_count: u32,
    /// 两轮之间的停顿
    repeat_delay: f32,
    /// 偶数轮（第 2、4…轮）反向运行
    reverse: bool,
    /// 写回前四舍五入
    round_to_int: bool,
    /// 已完成的轮数
    cycle: u32,
    /// 缓动后的进度
    progress: f32,
    /// 当前状态
    state: TweenState,
    callbacks: Callbacks,
    /// 完成后交给调度器的后续 Tween
    next_tween: Option<Box<Tween>>,
}

impl Tween {
    /// 创建 Tween，使用内置缓动曲线
    ///
    /// # 错误
    /// - `InvalidDuration`: 时长为负数
    /// - `UnknownCurve`: 缓动名称未知
    pub fn new<T: PropertyAccessor + 'static>(
        target: &Rc<T>,
        total_time: f32,
        easing: impl Into<Easing>,
    ) -> TweenResult<Self> {
        Self::with_registry(target, total_time, easing, Rc::new(EasingRegistry::new()))
    }

    /// 创建 Tween，缓动名称通过指定注册表解析
    pub fn with_registry<T: PropertyAccessor + 'static>(
        target: &Rc<T>,
        total_time: f32,
        easing: impl Into<Easing>,
        registry: Rc<EasingRegistry>,
    ) -> TweenResult<Self> {
        let target: Weak<T> = Rc::downgrade(target);
        let target: Weak<dyn PropertyAccessor> = target;
        Self::from_weak(target, total_time, easing, registry)
    }

    /// 以弱引用目标创建 Tween
    pub fn from_weak(
        target: Weak<dyn PropertyAccessor>,
        total_time: f32,
        easing: impl Into<Easing>,
        registry: Rc<EasingRegistry>,
    ) -> TweenResult<Self> {
        let total_time = check_duration(total_time)?;
        let easing = easing.into();
        let curve = registry.resolve(&easing)?;

        Ok(Self {
            target,
            properties: Vec::new(),
            registry,
            easing,
            curve,
            total_time,
            current_time: 0.0,
            delay: 0.0,
            pending: 0.0,
            repeat_count: 1,
            repeat_delay: 0.0,
            reverse: false,
            round_to_int: false,
            cycle: 0,
            progress: 0.0,
            state: TweenState::Waiting,
            callbacks: Callbacks::default(),
            next_tween: None,
        })
    }

    // ========== 属性声明 ==========

    /// 把属性动画到目标值
    ///
    /// 同一属性重复声明时替换之前的终值。名称规则见 [`crate::property`]。
    pub fn animate_property(&mut self, name: &str, target_value: f32) {
        let record = PropertyAnimation::new(name, target_value);
        match self.properties.iter_mut().find(|p| p.key() == record.key()) {
            Some(existing) if existing.kind() == record.kind() => existing.set_end(target_value),
            Some(existing) => *existing = record,
            None => self.properties.push(record),
        }
    }

    /// 批量声明属性
    pub fn animate_properties<'a, I>(&mut self, properties: I)
    where
        I: IntoIterator<Item = (&'a str, f32)>,
    {
        for (name, value) in properties {
            self.animate_property(name, value);
        }
    }

    /// 同时动画 `x` 和 `y`
    pub fn move_to(&mut self, x: f32, y: f32) {
        self.animate_property("x", x);
        self.animate_property("y", y);
    }

    /// 同时动画 `scaleX` 和 `scaleY`
    pub fn scale_to(&mut self, scale: f32) {
        self.animate_property("scaleX", scale);
        self.animate_property("scaleY", scale);
    }

    /// 动画 `alpha`
    pub fn fade_to(&mut self, alpha: f32) {
        self.animate_property("alpha", alpha);
    }

    /// 查询属性的终值
    ///
    /// `name` 可以是声明名（如 `rotation#rad`）或目标属性名（如 `rotation`）。
    pub fn end_value_of_property(&self, name: &str) -> TweenResult<f32> {
        self.properties
            .iter()
            .find(|p| p.name() == name || p.key() == name)
            .map(PropertyAnimation::end_value)
            .ok_or_else(|| TweenError::unknown_property(name))
    }

    /// 所有属性记录
    pub fn properties(&self) -> &[PropertyAnimation] {
        &self.properties
    }

    // ========== 设置 ==========

    /// 设置开始前的延迟
    ///
    /// 仍在等待时，已等待的时间会保留。
    pub fn set_delay(&mut self, delay: f32) -> TweenResult<()> {
        let delay = check_duration(delay)?;
        if self.state == TweenState::Waiting {
            self.pending += delay - self.delay;
        }
        self.delay = delay;
        Ok(())
    }

    /// 设置运行轮数（0 表示无限）
    pub fn set_repeat_count(&mut self, repeat_count: u32) {
        self.repeat_count = repeat_count;
    }

    /// 设置两轮之间的停顿
    pub fn set_repeat_delay(&mut self, repeat_delay: f32) -> TweenResult<()> {
        self.repeat_delay = check_duration(repeat_delay)?;
        Ok(())
    }

    /// 设置是否往返运行
    pub fn set_reverse(&mut self, reverse: bool) {
        self.reverse = reverse;
    }

    /// 设置是否四舍五入
    pub fn set_round_to_int(&mut self, round_to_int: bool) {
        self.round_to_int = round_to_int;
    }

    /// 更换缓动曲线（立即解析）
    pub fn set_easing(&mut self, easing: impl Into<Easing>) -> TweenResult<()> {
        let easing = easing.into();
        self.curve = self.registry.resolve(&easing)?;
        self.easing = easing;
        Ok(())
    }

    /// 使用自定义缓动曲线
    pub fn set_easing_fn(&mut self, f: impl Fn(f32) -> f32 + 'static) {
        let easing = Easing::custom(f);
        if let Easing::Custom(curve) = &easing {
            self.curve = Rc::clone(curve);
        }
        self.easing = easing;
    }

    /// 开始运行时的回调
    pub fn set_on_start(&mut self, f: impl FnMut(&Tween) + 'static) {
        self.callbacks.on_start = Some(Box::new(f));
    }

    /// 每次推进时的回调
    pub fn set_on_update(&mut self, f: impl FnMut(&Tween) + 'static) {
        self.callbacks.on_update = Some(Box::new(f));
    }

    /// 每轮结束（最后一轮除外）时的回调
    pub fn set_on_repeat(&mut self, f: impl FnMut(&Tween) + 'static) {
        self.callbacks.on_repeat = Some(Box::new(f));
    }

    /// 完成时的回调
    pub fn set_on_complete(&mut self, f: impl FnMut(&Tween) + 'static) {
        self.callbacks.on_complete = Some(Box::new(f));
    }

    /// 设置完成后加入同一调度器的 Tween
    pub fn set_next_tween(&mut self, next: Tween) {
        self.next_tween = Some(Box::new(next));
    }

    // ========== 查询 ==========

    /// 动画目标（已释放时返回 `None`）
    pub fn target(&self) -> Option<Rc<dyn PropertyAccessor>> {
        self.target.upgrade()
    }

    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    pub fn current_time(&self) -> f32 {
        self.current_time
    }

    pub fn delay(&self) -> f32 {
        self.delay
    }

    pub fn repeat_count(&self) -> u32 {
        self.repeat_count
    }

    pub fn repeat_delay(&self) -> f32 {
        self.repeat_delay
    }

    pub fn reverse(&self) -> bool {
        self.reverse
    }

    pub fn round_to_int(&self) -> bool {
        self.round_to_int
    }

    pub fn easing(&self) -> &Easing {
        &self.easing
    }

    pub fn state(&self) -> TweenState {
        self.state
    }

    /// 缓动后的进度（Back / Elastic 类曲线可能超出 [0, 1]）
    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn is_complete(&self) -> bool {
        self.state == TweenState::Complete
    }

    pub fn next_tween(&self) -> Option<&Tween> {
        self.next_tween.as_deref()
    }

    // ========== 推进 ==========

    /// 推进时间
    ///
    /// `dt` 不大于 0（或为 NaN）时不做任何事。
    ///
    /// # 返回
    /// 本次调用中完成时，返回需要交给调度器的后续 Tween
    pub fn advance(&mut self, dt: f32) -> TweenResult<Option<Box<Tween>>> {
        if !(dt > 0.0) || self.is_complete() {
            return Ok(None);
        }

        let mut remaining = dt;
        let mut cycles = 0;
        while remaining > 0.0 {
            match self.state {
                TweenState::Waiting | TweenState::RepeatPause => {
                    self.pending -= remaining;
                    // 恰好等满延迟时仍在等待，时间留给下一帧
                    if self.pending >= 0.0 {
                        break;
                    }
                    remaining = -self.pending;
                    self.pending = 0.0;
                    if self.state == TweenState::Waiting {
                        self.begin()?;
                    }
                    self.state = TweenState::Running;
                }
                TweenState::Running => remaining = self.step(remaining, &mut cycles)?,
                TweenState::Complete => break,
            }
        }

        if self.is_complete() {
            Ok(self.next_tween.take())
        } else {
            Ok(None)
        }
    }

    /// 延迟结束：读取起始值并触发 `on_start`
    fn begin(&mut self) -> TweenResult<()> {
        let target = self.live_target()?;
        let starts = self
            .properties
            .iter()
            .map(|p| {
                target
                    .get_property(p.key())
                    .ok_or_else(|| TweenError::unknown_property(p.key()))
            })
            .collect::<TweenResult<Vec<f32>>>()?;

        for (property, start) in self.properties.iter_mut().zip(starts) {
            property.capture_start(start);
        }

        debug!(
            total_time = self.total_time,
            properties = self.properties.len(),
            "Tween 开始"
        );
        self.fire(Phase::Start);
        Ok(())
    }

    /// 运行一个时间片
    ///
    /// `cycles` 为本次 `advance` 已完成的重复轮数。
    ///
    /// # 返回
    /// 本轮结束后剩余、需要继续消耗的时间
    fn step(&mut self, slice: f32, cycles: &mut u32) -> TweenResult<f32> {
        let target = self.live_target()?;

        let end_time = self.current_time + slice;
        let leftover = (end_time - self.total_time).max(0.0);
        self.current_time = end_time.min(self.total_time);

        let ratio = if self.total_time <= MIN_DURATION {
            1.0
        } else {
            self.current_time / self.total_time
        };
        let backwards = self.reverse && self.cycle % 2 == 1;
        self.progress = (self.curve)(if backwards { 1.0 - ratio } else { ratio });

        let (progress, round_to_int) = (self.progress, self.round_to_int);
        for property in &mut self.properties {
            // 运行中途新声明的属性，从当前值开始
            if property.start_value().is_none() {
                let start = target
                    .get_property(property.key())
                    .ok_or_else(|| TweenError::unknown_property(property.key()))?;
                property.capture_start(start);
            }
            let value = property.value_at(progress, round_to_int);
            if !target.set_property(property.key(), value) {
                return Err(TweenError::unknown_property(property.key()));
            }
        }

        self.fire(Phase::Update);

        if self.current_time < self.total_time {
            return Ok(0.0);
        }

        // 无限重复时只有奇偶性有意义，2^32 为偶数，回绕不影响方向
        self.cycle = self.cycle.wrapping_add(1);
        if self.repeat_count == 0 || self.cycle < self.repeat_count {
            self.current_time = 0.0;
            if self.repeat_delay > 0.0 {
                self.state = TweenState::RepeatPause;
                self.pending = self.repeat_delay;
            }
            debug!(cycle = self.cycle, "Tween 重复");
            self.fire(Phase::Repeat);
            // 瞬时 Tween 每帧只跑一轮
            if self.total_time <= MIN_DURATION {
                return Ok(0.0);
            }
            *cycles += 1;
            if *cycles >= MAX_CYCLES_PER_ADVANCE {
                return Ok(self.skip_periods(leftover));
            }
            Ok(leftover)
        } else {
            self.state = TweenState::Complete;
            debug!(cycles = self.cycle, "Tween 完成");
            self.fire(Phase::Complete);
            Ok(0.0)
        }
    }

    /// 跳过 `leftover` 中完整的周期（一轮运行加一次重复停顿）
    ///
    /// 有限重复时至少留下最后一轮正常运行，以便触发 `on_complete`。
    ///
    /// # 返回
    /// 跳过后剩余的时间
    fn skip_periods(&mut self, leftover: f32) -> f32 {
        let period = self.total_time + self.repeat_delay;
        let whole = (f64::from(leftover) / f64::from(period)).floor();
        if whole < 1.0 {
            return leftover;
        }

        if self.repeat_count == 0 {
            if whole % 2.0 == 1.0 {
                self.cycle = self.cycle.wrapping_add(1);
            }
            debug!(skipped = whole, "Tween 合并重复周期");
            return leftover % period;
        }

        let runs_left = self.repeat_count - self.cycle;
        let skip = whole.min(f64::from(runs_left - 1)) as u32;
        self.cycle += skip;
        debug!(skipped = skip, "Tween 合并重复周期");
        (f64::from(leftover) - f64::from(skip) * f64::from(period)) as f32
    }

    fn live_target(&self) -> TweenResult<Rc<dyn PropertyAccessor>> {
        self.target.upgrade().ok_or(TweenError::TargetDropped)
    }

    fn fire(&mut self, phase: Phase) {
        if let Some(mut callback) = self.callbacks.slot(phase).take() {
            callback(&*self);
            *self.callbacks.slot(phase) = Some(callback);
        }
    }
}

impl Animatable for Tween {
    fn advance_time(&mut self, dt: f32, scheduler: &mut dyn Scheduler) -> TweenResult<()> {
        if let Some(next) = self.advance(dt)? {
            let id = scheduler.add(next);
            debug!(next = id.value(), "移交后续 Tween");
        }
        Ok(())
    }

    fn is_complete(&self) -> bool {
        Tween::is_complete(self)
    }

    fn animates(&self, target: &dyn PropertyAccessor) -> bool {
        std::ptr::addr_eq(self.target.as_ptr(), std::ptr::from_ref(target))
    }
}

impl fmt::Debug for Tween {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tween")
            .field("properties", &self.properties)
            .field("easing", &self.easing)
            .field("total_time", &self.total_time)
            .field("current_time", &self.current_time)
            .field("delay", &self.delay)
            .field("repeat_count", &self.repeat_count)
            .field("repeat_delay", &self.repeat_delay)
            .field("reverse", &self.reverse)
            .field("round_to_int", &self.round_to_int)
            .field("state", &self.state)
            .field("has_next", &self.next_tween.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::PropertyMap;
    use std::cell::{Cell, RefCell};

    fn sprite() -> Rc<PropertyMap> {
        Rc::new(PropertyMap::new().with("x", 0.0).with("y", 0.0).with("alpha", 1.0))
    }

    fn counter() -> Rc<Cell<u32>> {
        Rc::new(Cell::new(0))
    }

    fn bump(counter: &Rc<Cell<u32>>) -> impl FnMut(&Tween) + 'static {
        let counter = Rc::clone(counter);
        move |_: &Tween| counter.set(counter.get() + 1)
    }

    #[test]
    fn test_tween_creation() {
        let target = sprite();
        let tween = Tween::new(&target, 2.0, "linear").unwrap();
        assert_eq!(tween.state(), TweenState::Waiting);
        assert_eq!(tween.total_time(), 2.0);
        assert_eq!(tween.current_time(), 0.0);
        assert_eq!(tween.repeat_count(), 1);
        assert!(!tween.is_complete());
        assert!(tween.target().is_some());
    }

    #[test]
    fn test_negative_duration() {
        let target = sprite();
        let err = Tween::new(&target, -1.0, "linear").err();
        assert_eq!(err, Some(TweenError::InvalidDuration { value: -1.0 }));
    }

    #[test]
    fn test_unknown_curve_fails_fast() {
        let target = sprite();
        let err = Tween::new(&target, 1.0, "wobble").err();
        assert_eq!(
            err,
            Some(TweenError::UnknownCurve {
                name: "wobble".to_string()
            })
        );

        let mut tween = Tween::new(&target, 1.0, "linear").unwrap();
        assert!(tween.set_easing("wobble").is_err());
        // 失败时保留原曲线
        assert_eq!(tween.easing().name(), Some("linear"));
    }

    #[test]
    fn test_redeclare_replaces_end_value() {
        let target = sprite();
        let mut tween = Tween::new(&target, 1.0, "linear").unwrap();
        tween.animate_property("x", 10.0);
        tween.animate_property("x", 20.0);

        assert_eq!(tween.properties().len(), 1);
        assert_eq!(tween.end_value_of_property("x"), Ok(20.0));
    }

    #[test]
    fn test_end_value_of_unknown_property() {
        let target = sprite();
        let mut tween = Tween::new(&target, 1.0, "linear").unwrap();
        tween.animate_property("rotation#deg", 90.0);

        assert_eq!(tween.end_value_of_property("rotation#deg"), Ok(90.0));
        assert_eq!(tween.end_value_of_property("rotation"), Ok(90.0));
        assert_eq!(
            tween.end_value_of_property("alpha"),
            Err(TweenError::UnknownProperty {
                name: "alpha".to_string()
            })
        );
    }

    #[test]
    fn test_conveniences() {
        let target = sprite();
        let mut tween = Tween::new(&target, 1.0, "linear").unwrap();
        tween.move_to(50.0, 20.0);
        tween.scale_to(2.0);
        tween.fade_to(0.0);

        let keys: Vec<&str> = tween.properties().iter().map(|p| p.key()).collect();
        assert_eq!(keys, vec!["x", "y", "scaleX", "scaleY", "alpha"]);
        assert_eq!(tween.end_value_of_property("scaleY"), Ok(2.0));
    }

    #[test]
    fn test_full_duration_in_one_call() {
        let target = sprite();
        let mut tween = Tween::new(&target, 2.0, "easeInOut").unwrap();
        tween.animate_property("x", 100.0);

        tween.advance(2.0).unwrap();
        assert_eq!(tween.current_time(), 2.0);
        assert_eq!(target.get("x"), Some(100.0));
        assert!(tween.is_complete());
    }

    #[test]
    fn test_split_ticks_match_single_tick() {
        let split = sprite();
        let whole = sprite();

        let mut a = Tween::new(&split, 2.0, "easeInQuad").unwrap();
        a.animate_property("x", 100.0);
        a.advance(0.5).unwrap();
        a.advance(0.75).unwrap();

        let mut b = Tween::new(&whole, 2.0, "easeInQuad").unwrap();
        b.animate_property("x", 100.0);
        b.advance(1.25).unwrap();

        assert_eq!(a.current_time(), b.current_time());
        assert_eq!(split.get("x"), whole.get("x"));
    }

    #[test]
    fn test_delay_carries_overshoot() {
        let target = sprite();
        let started = counter();
        let mut tween = Tween::new(&target, 2.0, "linear").unwrap();
        tween.animate_property("x", 100.0);
        tween.set_delay(1.0).unwrap();
        tween.set_on_start(bump(&started));

        tween.advance(0.5).unwrap();
        tween.advance(0.5).unwrap();
        assert_eq!(tween.state(), TweenState::Waiting);
        assert_eq!(started.get(), 0);
        assert_eq!(target.get("x"), Some(0.0));

        tween.advance(1.0).unwrap();
        assert_eq!(tween.state(), TweenState::Running);
        assert_eq!(started.get(), 1);
        assert_eq!(tween.current_time(), 1.0);
        assert_eq!(target.get("x"), Some(50.0));
    }

    #[test]
    fn test_set_delay_while_waiting_keeps_elapsed() {
        let target = sprite();
        let mut tween = Tween::new(&target, 1.0, "linear").unwrap();
        tween.animate_property("x", 10.0);
        tween.set_delay(1.0).unwrap();
        tween.advance(0.75).unwrap();

        // 再多等 0.5，剩余 0.75
        tween.set_delay(1.5).unwrap();
        tween.advance(0.5).unwrap();
        assert_eq!(tween.state(), TweenState::Waiting);
        tween.advance(0.5).unwrap();
        assert_eq!(tween.current_time(), 0.25);

        assert!(tween.set_delay(-1.0).is_err());
    }

    #[test]
    fn test_zero_dt_is_noop() {
        let target = sprite();
        let started = counter();
        let mut tween = Tween::new(&target, 1.0, "linear").unwrap();
        tween.animate_property("x", 10.0);
        tween.set_on_start(bump(&started));

        tween.advance(0.0).unwrap();
        tween.advance(f32::NAN).unwrap();
        assert_eq!(tween.state(), TweenState::Waiting);
        assert_eq!(started.get(), 0);
    }

    #[test]
    fn test_start_value_captured_at_start() {
        let target = sprite();
        let mut tween = Tween::new(&target, 1.0, "linear").unwrap();
        tween.animate_property("x", 100.0);

        // 创建之后、开始之前修改目标
        target.declare("x", 50.0);
        tween.advance(0.5).unwrap();

        assert_eq!(tween.properties()[0].start_value(), Some(50.0));
        assert_eq!(target.get("x"), Some(75.0));
    }

    #[test]
    fn test_property_declared_mid_run() {
        let target = sprite();
        let mut tween = Tween::new(&target, 1.0, "linear").unwrap();
        tween.animate_property("x", 100.0);
        tween.advance(0.5).unwrap();

        target.declare("y", 10.0);
        tween.animate_property("y", 20.0);
        tween.advance(0.25).unwrap();

        assert_eq!(target.get("x"), Some(75.0));
        assert_eq!(target.get("y"), Some(17.5));
    }

    #[test]
    fn test_round_to_int() {
        let target = sprite();
        let mut tween = Tween::new(&target, 1.0, "linear").unwrap();
        tween.animate_property("x", 10.0);
        tween.set_round_to_int(true);

        tween.advance(0.46).unwrap();
        assert_eq!(target.get("x"), Some(5.0));
    }

    #[test]
    fn test_custom_easing_takes_precedence() {
        let target = sprite();
        let mut tween = Tween::new(&target, 1.0, Easing::custom(|t| t * t)).unwrap();
        tween.animate_property("x", 100.0);
        tween.advance(0.5).unwrap();
        assert_eq!(target.get("x"), Some(25.0));

        tween.set_easing_fn(|_| 1.0);
        assert_eq!(tween.easing().name(), None);
        tween.advance(0.25).unwrap();
        assert_eq!(target.get("x"), Some(100.0));
    }

    #[test]
    fn test_registry_curve() {
        let mut registry = EasingRegistry::new();
        registry.register("half", |_| 0.5);

        let target = sprite();
        let mut tween = Tween::with_registry(&target, 1.0, "half", Rc::new(registry)).unwrap();
        tween.animate_property("x", 40.0);
        tween.advance(0.1).unwrap();
        assert_eq!(target.get("x"), Some(20.0));
        assert_eq!(tween.progress(), 0.5);
    }

    #[test]
    fn test_reverse_repeat() {
        let target = sprite();
        let (started, repeated, completed) = (counter(), counter(), counter());
        let mut tween = Tween::new(&target, 1.0, "linear").unwrap();
        tween.animate_property("x", 10.0);
        tween.set_repeat_count(2);
        tween.set_reverse(true);
        tween.set_on_start(bump(&started));
        tween.set_on_repeat(bump(&repeated));
        tween.set_on_complete(bump(&completed));

        tween.advance(1.0).unwrap();
        assert_eq!(target.get("x"), Some(10.0));
        assert_eq!(repeated.get(), 1);
        assert!(!tween.is_complete());

        tween.advance(0.5).unwrap();
        assert_eq!(target.get("x"), Some(5.0));

        tween.advance(0.5).unwrap();
        assert_eq!(target.get("x"), Some(0.0));
        assert!(tween.is_complete());

        assert_eq!(started.get(), 1);
        assert_eq!(repeated.get(), 1);
        assert_eq!(completed.get(), 1);
    }

    #[test]
    fn test_repeat_without_reverse_restarts_from_start() {
        let target = sprite();
        let mut tween = Tween::new(&target, 1.0, "linear").unwrap();
        tween.animate_property("x", 10.0);
        tween.set_repeat_count(2);

        tween.advance(1.25).unwrap();
        assert_eq!(target.get("x"), Some(2.5));
        assert_eq!(tween.current_time(), 0.25);
    }

    #[test]
    fn test_repeat_delay() {
        let target = sprite();
        let started = counter();
        let mut tween = Tween::new(&target, 1.0, "linear").unwrap();
        tween.animate_property("x", 10.0);
        tween.set_repeat_count(2);
        tween.set_repeat_delay(0.5).unwrap();
        tween.set_on_start(bump(&started));

        tween.advance(1.25).unwrap();
        assert_eq!(tween.state(), TweenState::RepeatPause);
        assert_eq!(target.get("x"), Some(10.0));

        tween.advance(0.5).unwrap();
        assert_eq!(tween.state(), TweenState::Running);
        assert_eq!(tween.current_time(), 0.25);
        assert_eq!(target.get("x"), Some(2.5));
        assert_eq!(started.get(), 1);
    }

    #[test]
    fn test_infinite_repeat_never_completes() {
        let target = sprite();
        let repeated = counter();
        let mut tween = Tween::new(&target, 0.5, "linear").unwrap();
        tween.animate_property("x", 10.0);
        tween.set_repeat_count(0);
        tween.set_on_repeat(bump(&repeated));

        for _ in 0..20 {
            tween.advance(0.25).unwrap();
        }
        assert!(!tween.is_complete());
        assert_eq!(repeated.get(), 10);
    }

    #[test]
    fn test_large_dt_runs_every_cycle() {
        let target = sprite();
        let (updated, repeated, completed) = (counter(), counter(), counter());
        let mut tween = Tween::new(&target, 1.0, "linear").unwrap();
        tween.animate_property("x", 10.0);
        tween.set_repeat_count(3);
        tween.set_on_update(bump(&updated));
        tween.set_on_repeat(bump(&repeated));
        tween.set_on_complete(bump(&completed));

        tween.advance(10.0).unwrap();
        assert!(tween.is_complete());
        assert_eq!(updated.get(), 3);
        assert_eq!(repeated.get(), 2);
        assert_eq!(completed.get(), 1);
        assert_eq!(target.get("x"), Some(10.0));
        assert_eq!(tween.current_time(), 1.0);
    }

    #[test]
    fn test_zero_duration_is_instant() {
        let target = sprite();
        let mut tween = Tween::new(&target, 0.0, "linear").unwrap();
        tween.fade_to(0.0);

        tween.advance(0.016).unwrap();
        assert!(tween.is_complete());
        assert_eq!(tween.current_time(), 0.0);
        assert_eq!(target.get("alpha"), Some(0.0));
    }

    #[test]
    fn test_zero_duration_infinite_repeat_is_bounded() {
        let target = sprite();
        let repeated = counter();
        let mut tween = Tween::new(&target, 0.0, "linear").unwrap();
        tween.fade_to(0.0);
        tween.set_repeat_count(0);
        tween.set_on_repeat(bump(&repeated));

        tween.advance(100.0).unwrap();
        assert_eq!(repeated.get(), 1);
    }

    #[test]
    fn test_infinite_repeat_huge_dt_is_bounded() {
        let target = sprite();
        let repeated = counter();
        let mut tween = Tween::new(&target, 0.5, "linear").unwrap();
        tween.animate_property("x", 10.0);
        tween.set_repeat_count(0);
        tween.set_reverse(true);
        tween.set_on_repeat(bump(&repeated));

        // 在 f32 下 16777216 - 0.5 == 16777216，逐轮消耗永远不会结束
        tween.advance(16_777_216.0).unwrap();
        assert!(!tween.is_complete());
        assert_eq!(repeated.get(), MAX_CYCLES_PER_ADVANCE);
        assert_eq!(tween.current_time(), 0.0);

        // 跳过的周期数为偶数，下一轮仍正向运行
        tween.advance(0.125).unwrap();
        assert_eq!(target.get("x"), Some(2.5));
    }

    #[test]
    fn test_finite_repeat_huge_dt_still_completes() {
        let target = sprite();
        let (repeated, completed) = (counter(), counter());
        let mut tween = Tween::new(&target, 1.0, "linear").unwrap();
        tween.animate_property("x", 10.0);
        tween.set_repeat_count(1000);
        tween.set_on_repeat(bump(&repeated));
        tween.set_on_complete(bump(&completed));

        tween.advance(5000.0).unwrap();
        assert!(tween.is_complete());
        assert_eq!(repeated.get(), MAX_CYCLES_PER_ADVANCE);
        assert_eq!(completed.get(), 1);
        assert_eq!(tween.cycle, 1000);
        assert_eq!(target.get("x"), Some(10.0));
    }

    #[test]
    fn test_skipped_periods_include_repeat_delay() {
        let target = sprite();
        let mut tween = Tween::new(&target, 1.0, "linear").unwrap();
        tween.animate_property("x", 10.0);
        tween.set_repeat_count(0);
        tween.set_repeat_delay(1.0).unwrap();

        // 每个周期 2 秒：逐轮处理 64 轮后余下 873.5 秒，
        // 跳过 436 个周期，再停顿 1 秒，停在下一轮开始后 0.5 秒
        tween.advance(1000.5).unwrap();
        assert_eq!(tween.state(), TweenState::Running);
        assert_eq!(tween.current_time(), 0.5);
        assert_eq!(target.get("x"), Some(5.0));
    }

    #[test]
    fn test_cycle_counter_wraps() {
        let target = sprite();
        let mut tween = Tween::new(&target, 0.0, "linear").unwrap();
        tween.fade_to(0.0);
        tween.set_repeat_count(0);
        tween.set_reverse(true);
        tween.cycle = u32::MAX;

        tween.advance(0.016).unwrap();
        assert_eq!(tween.cycle, 0);
        assert!(!tween.is_complete());
    }

    #[test]
    fn test_unknown_property_fails_at_start() {
        let target = sprite();
        let started = counter();
        let mut tween = Tween::new(&target, 1.0, "linear").unwrap();
        tween.animate_property("x", 10.0);
        tween.animate_property("rotation", 1.0);
        tween.set_on_start(bump(&started));

        let err = tween.advance(0.1).err();
        assert_eq!(
            err,
            Some(TweenError::UnknownProperty {
                name: "rotation".to_string()
            })
        );
        assert_eq!(started.get(), 0);
        // 不会写入部分属性
        assert_eq!(target.get("x"), Some(0.0));
    }

    #[test]
    fn test_target_dropped() {
        let target = sprite();
        let mut tween = Tween::new(&target, 1.0, "linear").unwrap();
        tween.animate_property("x", 10.0);
        drop(target);

        assert!(tween.target().is_none());
        assert_eq!(tween.advance(0.1).err(), Some(TweenError::TargetDropped));
    }

    #[test]
    fn test_callbacks_see_tween_state() {
        let target = sprite();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut tween = Tween::new(&target, 1.0, "linear").unwrap();
        tween.animate_property("x", 10.0);

        let log = Rc::clone(&seen);
        tween.set_on_update(move |t| log.borrow_mut().push((t.current_time(), t.is_complete())));
        let log = Rc::clone(&seen);
        tween.set_on_complete(move |t| log.borrow_mut().push((t.progress(), t.is_complete())));

        tween.advance(0.5).unwrap();
        tween.advance(0.5).unwrap();

        assert_eq!(
            *seen.borrow(),
            vec![(0.5, false), (1.0, false), (1.0, true)]
        );
    }

    #[test]
    fn test_next_tween_is_returned_once() {
        let target = sprite();
        let mut first = Tween::new(&target, 1.0, "linear").unwrap();
        first.animate_property("x", 10.0);
        let mut second = Tween::new(&target, 1.0, "linear").unwrap();
        second.animate_property("x", 0.0);
        first.set_next_tween(second);
        assert!(first.next_tween().is_some());

        assert!(first.advance(0.5).unwrap().is_none());
        let next = first.advance(0.5).unwrap();
        assert!(next.is_some());
        assert!(first.next_tween().is_none());
        assert!(first.advance(0.5).unwrap().is_none());
    }

    #[test]
    fn test_animates_target() {
        let target = sprite();
        let other = sprite();
        let tween = Tween::new(&target, 1.0, "linear").unwrap();
        assert!(tween.animates(&*target));
        assert!(!tween.animates(&*other));
    }
}
