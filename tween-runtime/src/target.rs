//! # Target 模块
//!
//! 动画目标接口：按名称读写 f32 属性。
//!
//! Tween 只以弱引用持有目标，目标的生命周期由场景图决定。
//! 因此接口使用 `&self`，实现方通过 `Cell` / `RefCell` 获得内部可变性。

use std::cell::RefCell;
use std::collections::BTreeMap;

/// 属性访问器接口
///
/// ## 实现示例
///
/// ```rust,ignore
/// struct Sprite {
///     x: Cell<f32>,
///     alpha: Cell<f32>,
/// }
///
/// impl PropertyAccessor for Sprite {
///     fn get_property(&self, name: &str) -> Option<f32> {
///         match name {
///             "x" => Some(self.x.get()),
///             "alpha" => Some(self.alpha.get()),
///             _ => None,
///         }
///     }
///
///     fn set_property(&self, name: &str, value: f32) -> bool {
///         match name {
///             "x" => self.x.set(value),
///             "alpha" => self.alpha.set(value),
///             _ => return false,
///         }
///         true
///     }
/// }
/// ```
pub trait PropertyAccessor {
    /// 获取属性的当前值
    ///
    /// 属性不存在时返回 `None`。
    fn get_property(&self, name: &str) -> Option<f32>;

    /// 设置属性的新值
    ///
    /// 属性不存在时返回 `false`。
    fn set_property(&self, name: &str, value: f32) -> bool;
}

/// 基于注册表的属性容器
///
/// 只有先 `declare` 过的属性才能被读写，未声明的名称与其他目标一样会失败。
#[derive(Debug, Default)]
pub struct PropertyMap {
    values: RefCell<BTreeMap<String, f32>>,
}

impl PropertyMap {
    /// 创建空容器
    pub fn new() -> Self {
        Self::default()
    }

    /// 声明属性及其初始值（已存在则覆盖）
    pub fn declare(&self, name: impl Into<String>, value: f32) {
        self.values.borrow_mut().insert(name.into(), value);
    }

    /// 链式声明
    pub fn with(self, name: impl Into<String>, value: f32) -> Self {
        self.declare(name, value);
        self
    }

    /// 读取属性（等价于 `get_property`）
    pub fn get(&self, name: &str) -> Option<f32> {
        self.values.borrow().get(name).copied()
    }

    /// 是否声明了该属性
    pub fn contains(&self, name: &str) -> bool {
        self.values.borrow().contains_key(name)
    }

    /// 所有属性的快照（按名称排序）
    pub fn snapshot(&self) -> Vec<(String, f32)> {
        self.values
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect()
    }
}

impl FromIterator<(String, f32)> for PropertyMap {
    fn from_iter<I: IntoIterator<Item = (String, f32)>>(iter: I) -> Self {
        Self {
            values: RefCell::new(iter.into_iter().collect()),
        }
    }
}

impl PropertyAccessor for PropertyMap {
    fn get_property(&self, name: &str) -> Option<f32> {
        self.get(name)
    }

    fn set_property(&self, name: &str, value: f32) -> bool {
        match self.values.borrow_mut().get_mut(name) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }
}
