//! # Tween Runtime
//!
//! 基于时间的属性补间动画核心库。
//!
//! ## 架构概述
//!
//! `tween-runtime` 是纯逻辑核心，不依赖任何 IO 或渲染引擎。
//! 宿主每帧驱动调度器，调度器推进所有 Tween：
//!
//! ```text
//! Host                 Juggler                 Tween              Target
//!   │ advance_time(dt) ──►│                        │                   │
//!   │                     │── advance_time(dt) ───►│── set_property ──►│
//!   │                     │◄── next_tween (add) ───│                   │
//!   │◄── Vec<JugglerEvent>│                        │                   │
//! ```
//!
//! ## 核心类型
//!
//! - [`Tween`]：属性补间动画
//! - [`Juggler`]：调度器，实现 [`Scheduler`]
//! - [`PropertyAccessor`]：动画目标接口
//! - [`EasingRegistry`] / [`Easing`]：缓动曲线解析
//! - [`TweenConfig`]：可序列化的 Tween 描述
//!
//! ## 使用示例
//!
//! ```ignore
//! use std::rc::Rc;
//! use tween_runtime::{Juggler, PropertyMap, Scheduler, Tween};
//!
//! let sprite = Rc::new(PropertyMap::new().with("x", 0.0).with("heading", 350.0));
//!
//! let mut tween = Tween::new(&sprite, 1.0, "easeInOut")?;
//! tween.animate_property("x", 100.0);
//! tween.animate_property("heading#deg", 10.0);
//!
//! let mut juggler = Juggler::new();
//! juggler.add(Box::new(tween));
//!
//! loop {
//!     for event in juggler.advance_time(1.0 / 60.0) {
//!         // 处理 Completed / Failed ...
//!     }
//! }
//! ```
//!
//! ## 模块结构
//!
//! - [`easing`]：缓动曲线与注册表
//! - [`property`]：单个属性的动画记录
//! - [`target`]：动画目标接口
//! - [`tween`]：Tween 状态机
//! - [`juggler`]：调度器
//! - [`config`]：配置
//! - [`error`]：错误类型定义

pub mod config;
pub mod easing;
pub mod error;
pub mod juggler;
pub mod property;
pub mod target;
pub mod tween;

// 重导出核心类型
pub use config::TweenConfig;
pub use easing::{Easing, EasingFn, EasingFunction, EasingRegistry};
pub use error::{TweenError, TweenResult};
pub use juggler::{Animatable, AnimatableId, Juggler, JugglerEvent, Scheduler};
pub use property::{PropertyAnimation, ValueKind};
pub use target::{PropertyAccessor, PropertyMap};
pub use tween::{MAX_CYCLES_PER_ADVANCE, MIN_DURATION, Tween, TweenCallback, TweenState};
