//!
//! 寻路上下文：单次寻路的配置，包括代价函数、路径点丢弃判断、首尾路径点的弹出，以及到达目标的判定方式
//!

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use num_traits::Zero;
use serde::{Deserialize, Serialize};

use crate::*;

/// 到达目标的判定方式，可按位组合
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct DestinationMode(u8);

impl DestinationMode {
    /// 必须到达目标点
    pub const EXACT: DestinationMode = DestinationMode(1);
    /// 到达目标点的上下左右邻居即可
    pub const CARDINAL_NEIGHBOR: DestinationMode = DestinationMode(2);
    /// 到达目标点的斜向邻居即可
    pub const INTERCARDINAL_NEIGHBOR: DestinationMode = DestinationMode(4);
    /// 到达目标点的任意邻居即可
    pub const ANY_NEIGHBOR: DestinationMode = DestinationMode(2 | 4);
    /// 优先到达目标点，到达不了再用邻居
    pub const ALL: DestinationMode = DestinationMode(1 | 2 | 4);

    pub const fn from_bits(bits: u8) -> Self {
        DestinationMode(bits & 7)
    }
    pub const fn bits(&self) -> u8 {
        self.0
    }
    pub const fn contains(&self, other: DestinationMode) -> bool {
        self.0 & other.0 == other.0
    }
    /// 是否接受到达目标点本身，没有设置任何邻居时也按目标点处理
    pub const fn is_exact(&self) -> bool {
        self.contains(Self::EXACT) || self.0 & Self::ANY_NEIGHBOR.0 == 0
    }
    /// 目标点的邻居集合，按上下左右、斜向的顺序
    pub fn neighbors_of(&self, end: Point) -> Vec<Point> {
        let mut arr = Vec::with_capacity(8);
        if self.contains(Self::CARDINAL_NEIGHBOR) {
            arr.extend_from_slice(&[end.offset(0, -1), end.offset(0, 1), end.offset(1, 0), end.offset(-1, 0)]);
        }
        if self.contains(Self::INTERCARDINAL_NEIGHBOR) {
            arr.extend_from_slice(&[end.offset(-1, -1), end.offset(1, -1), end.offset(-1, 1), end.offset(1, 1)]);
        }
        arr
    }
}
impl Default for DestinationMode {
    fn default() -> Self {
        Self::EXACT
    }
}
impl From<u8> for DestinationMode {
    fn from(bits: u8) -> Self {
        DestinationMode::from_bits(bits)
    }
}
impl From<DestinationMode> for u8 {
    fn from(mode: DestinationMode) -> Self {
        mode.0
    }
}
impl BitOr for DestinationMode {
    type Output = DestinationMode;
    fn bitor(self, other: DestinationMode) -> DestinationMode {
        DestinationMode(self.0 | other.0)
    }
}
impl BitOrAssign for DestinationMode {
    fn bitor_assign(&mut self, other: DestinationMode) {
        self.0 |= other.0;
    }
}
impl fmt::Debug for DestinationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = Vec::new();
        if self.contains(Self::EXACT) {
            names.push("Exact");
        }
        if self.contains(Self::CARDINAL_NEIGHBOR) {
            names.push("CardinalNeighbor");
        }
        if self.contains(Self::INTERCARDINAL_NEIGHBOR) {
            names.push("IntercardinalNeighbor");
        }
        write!(f, "DestinationMode({})", names.join(" | "))
    }
}

/// 单次寻路的上下文
///
/// 寻路时会记录本次寻路的起点和终点
pub struct SearchContext<'a, N> {
    /// 是否弹出第一个路径点（通常就是寻路主体当前所在的格子）
    pub pop_first_waypoint: bool,
    /// 弹出最后N个路径点，N大于路径长度时整条路径作废
    pub pop_last_n_waypoints: usize,
    pub destination_mode: DestinationMode,
    /// 本次寻路的起点
    pub start: Point,
    /// 本次寻路的终点
    pub end: Point,
    // 从父节点进入候选点的代价，参数为（候选点，终点）
    weight: Box<dyn Fn(Point, Point) -> N + Send + Sync + 'a>,
    // 从路径末尾丢弃路径点的判断，参数为（路径点，路径点的序号）
    pop_test: Box<dyn Fn(Point, usize) -> bool + Send + Sync + 'a>,
}

impl<'a, N: Zero + 'a> SearchContext<'a, N> {
    /// 默认上下文，代价恒为0，不丢弃路径点，必须到达目标点
    pub fn new() -> Self {
        SearchContext {
            pop_first_waypoint: false,
            pop_last_n_waypoints: 0,
            destination_mode: DestinationMode::EXACT,
            start: Point::default(),
            end: Point::default(),
            weight: Box::new(|_, _| N::zero()),
            pop_test: Box::new(|_, _| false),
        }
    }
    /// 按配置创建上下文
    pub fn from_config(config: &PathfinderConfig) -> Self {
        let mut ctx = Self::new();
        ctx.pop_first_waypoint = config.pop_first_waypoint;
        ctx.pop_last_n_waypoints = config.pop_last_n_waypoints;
        ctx.destination_mode = config.destination_mode;
        ctx
    }
}
impl<'a, N: Zero + 'a> Default for SearchContext<'a, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, N> SearchContext<'a, N> {
    /// 设置代价函数
    pub fn with_weight<F: Fn(Point, Point) -> N + Send + Sync + 'a>(mut self, weight: F) -> Self {
        self.weight = Box::new(weight);
        self
    }
    /// 设置路径末尾的丢弃判断
    pub fn with_pop_test<F: Fn(Point, usize) -> bool + Send + Sync + 'a>(mut self, pop_test: F) -> Self {
        self.pop_test = Box::new(pop_test);
        self
    }
    pub fn with_destination_mode(mut self, mode: DestinationMode) -> Self {
        self.destination_mode = mode;
        self
    }
    pub fn with_pop_first_waypoint(mut self, pop: bool) -> Self {
        self.pop_first_waypoint = pop;
        self
    }
    pub fn with_pop_last_n_waypoints(mut self, n: usize) -> Self {
        self.pop_last_n_waypoints = n;
        self
    }
    /// 进入候选点的代价
    #[inline]
    pub fn weight(&self, pos: Point, end: Point) -> N {
        (self.weight)(pos, end)
    }
    /// 路径点是否应该从末尾丢弃
    #[inline]
    pub fn pop_waypoint_test(&self, pos: Point, index: usize) -> bool {
        (self.pop_test)(pos, index)
    }
}
