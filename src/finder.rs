//!
//! 网格寻路算法
//!
//! 均匀代价的最佳优先搜索：总是展开累计代价最小的节点，不加入到终点的预估代价，所以不是A*。
//! 累计代价相同的节点按进入open表的先后顺序展开，保证结果可复现。
//!
//! 大概流程：
//!
//! + 1、起点放入open表，close表置空。
//!
//! + 2、从open表取出代价最小的节点n，如果open表为空，有备选节点则返回第一个备选节点，否则返回NotFound。
//!
//! + 3、n是终点则返回Found；n是终点的邻居时，如果要求优先到达终点，则记为备选节点并继续搜索，否则返回Found。
//!
//! + 4、先展开n的左上右下4个方向，再展开斜方向，斜方向只在相邻的两个直方向都成功展开时才尝试，避免穿过阻挡的拐角。
//!
//! + 5、n放入close表，回到2。
//!

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashSet};
use std::fmt::Debug;

use log::{debug, trace, warn};
use num_traits::Zero;
use pi_null::Null;

use crate::*;

/// 寻路的返回类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindResult {
    /// 找到了路径，值为终点节点
    Found(NodeIndex),
    /// 没有到达终点，退而使用第一个到达的终点邻居
    Fallback(NodeIndex),
    /// 没找到路径
    NotFound,
    /// 被展开次数限制，没找到路径
    LimitNotFound,
}

impl FindResult {
    /// 结果路径的末端节点
    pub fn node(&self) -> Option<NodeIndex> {
        match self {
            FindResult::Found(n) | FindResult::Fallback(n) => Some(*n),
            _ => None,
        }
    }
}

/// open表中的排序节点，先按累计代价，再按进入open表的顺序
#[derive(Clone, Debug)]
pub struct FNode<N: PartialOrd + Copy> {
    pub weight: N,
    pub seq: usize,
    pub node: NodeIndex,
}

// Ord trait所需
impl<N: PartialOrd + Copy> Eq for FNode<N> {}
// Ord trait所需
impl<N: PartialOrd + Copy> PartialEq for FNode<N> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
// Ord trait所需
impl<N: PartialOrd + Copy> PartialOrd for FNode<N> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
// 通过代价的比较实现Ord trait，代价不可比较（如NaN）时视为相等
impl<N: PartialOrd + Copy> Ord for FNode<N> {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.weight.partial_cmp(&other.weight) {
            None | Some(Ordering::Equal) => self.seq.cmp(&other.seq),
            Some(r) => r,
        }
    }
}

/// 搜索器，复用节点表、open表和close表
///
/// ### 对`N`的约束，数字集合
/// + 可拷贝，可偏序比较，有零值；
/// + 实际使用的时候就是数字类型，比如：i32/u32/usize/f32/f64；
/// + 代价必须非负，否则结果不保证是代价最小的路径
pub struct Finder<N: PartialOrd + Zero + Copy + Debug> {
    // 本次搜索创建的节点
    pub nodes: NodeArena<N>,
    // open表，最小堆
    open: BinaryHeap<Reverse<FNode<N>>>,
    // 在open表中的坐标
    open_set: HashSet<Point>,
    // close表
    close: HashSet<Point>,
    // 到达终点邻居的备选节点
    possible: Vec<NodeIndex>,
    // 进入open表的序号
    seq: usize,
    // 最多展开的节点数
    max_number: usize,
    // 本次搜索展开的节点数
    expanded: usize,
}

impl<N: PartialOrd + Zero + Copy + Debug> Finder<N> {
    /// 不限制展开次数的搜索器
    pub fn new() -> Self {
        Self::with_capacity(0, usize::MAX)
    }
    /// 可选传入可能搜索的节点数量以提前初始化节约性能，以及最多展开的节点数
    pub fn with_capacity(node_number: usize, max_number: usize) -> Self {
        Finder {
            nodes: NodeArena::with_capacity(node_number),
            open: BinaryHeap::with_capacity(node_number),
            open_set: HashSet::with_capacity(node_number),
            close: HashSet::with_capacity(node_number),
            possible: Vec::new(),
            seq: 0,
            max_number,
            expanded: 0,
        }
    }
    pub fn max_number(&self) -> usize {
        self.max_number
    }
    pub fn set_max_number(&mut self, max_number: usize) {
        self.max_number = max_number;
    }
    /// 上次搜索展开的节点数
    pub fn expanded(&self) -> usize {
        self.expanded
    }
    fn clear(&mut self) {
        self.nodes.clear();
        self.open.clear();
        self.open_set.clear();
        self.close.clear();
        self.possible.clear();
        self.seq = 0;
        self.expanded = 0;
    }
    /// 从`start`到`end`寻路
    ///
    /// `is_pass`判断格子是否可以进入，`weight`为进入候选点的代价，参数为（候选点，终点）。
    /// 起点不做可走判断。
    pub fn find<P, W>(&mut self, start: Point, end: Point, mode: DestinationMode, is_pass: P, weight: W) -> FindResult
    where
        P: Fn(Point) -> bool,
        W: Fn(Point, Point) -> N,
    {
        self.clear();
        let targets = mode.neighbors_of(end);
        let exact = mode.is_exact();
        // 同时接受终点和邻居时，邻居只作为备选
        let defer = exact && !targets.is_empty();

        let root = self.nodes.push(start, NodeIndex::null(), N::zero());
        self.push_open(root);
        let r = loop {
            let Some(Reverse(f)) = self.open.pop() else {
                break match self.possible.first() {
                    Some(n) => FindResult::Fallback(*n),
                    None => FindResult::NotFound,
                };
            };
            let cur = self.nodes[f.node];
            self.open_set.remove(&cur.position);
            if self.close.contains(&cur.position) {
                continue;
            }
            if exact && cur.position == end {
                break FindResult::Found(f.node);
            }
            if targets.contains(&cur.position) {
                if !defer {
                    break FindResult::Found(f.node);
                }
                self.possible.push(f.node);
            }
            if self.expanded >= self.max_number {
                warn!("find {:?} -> {:?} stopped after {} expansions", start, end, self.expanded);
                break match self.possible.first() {
                    Some(n) => FindResult::Fallback(*n),
                    None => FindResult::LimitNotFound,
                };
            }
            self.expand(f.node, end, &is_pass, &weight);
            self.close.insert(cur.position);
        };
        debug!(
            "find {:?} -> {:?} {:?}: {:?}, expanded {}, nodes {}",
            start,
            end,
            mode,
            r,
            self.expanded,
            self.nodes.len()
        );
        r
    }
    /// 从起点到指定节点的坐标序列
    pub fn path_to(&self, node: NodeIndex) -> Vec<Point> {
        self.nodes.path_to(node)
    }
    // 展开节点的8个方向
    fn expand<P, W>(&mut self, cur: NodeIndex, end: Point, is_pass: &P, weight: &W)
    where
        P: Fn(Point) -> bool,
        W: Fn(Point, Point) -> N,
    {
        self.expanded += 1;
        trace!("expand {:?}", self.nodes[cur]);
        let left = self.process_node(cur, -1, 0, end, is_pass, weight);
        let up = self.process_node(cur, 0, -1, end, is_pass, weight);
        let right = self.process_node(cur, 1, 0, end, is_pass, weight);
        let down = self.process_node(cur, 0, 1, end, is_pass, weight);
        if left && up {
            self.process_node(cur, -1, -1, end, is_pass, weight);
        }
        if right && up {
            self.process_node(cur, 1, -1, end, is_pass, weight);
        }
        if right && down {
            self.process_node(cur, 1, 1, end, is_pass, weight);
        }
        if left && down {
            self.process_node(cur, -1, 1, end, is_pass, weight);
        }
    }
    // 候选点可走且不在open表和close表中时，创建节点放入open表
    fn process_node<P, W>(&mut self, cur: NodeIndex, x: isize, y: isize, end: Point, is_pass: &P, weight: &W) -> bool
    where
        P: Fn(Point) -> bool,
        W: Fn(Point, Point) -> N,
    {
        let parent = self.nodes[cur];
        let pos = parent.position.offset(x, y);
        if self.close.contains(&pos) || self.open_set.contains(&pos) || !is_pass(pos) {
            return false;
        }
        let node = self.nodes.push(pos, cur, parent.weight + weight(pos, end));
        self.push_open(node);
        true
    }
    fn push_open(&mut self, node: NodeIndex) {
        let f = FNode {
            weight: self.nodes[node].weight,
            seq: self.seq,
            node,
        };
        self.seq += 1;
        self.open_set.insert(self.nodes[node].position);
        self.open.push(Reverse(f));
    }
}

impl<N: PartialOrd + Zero + Copy + Debug> Default for Finder<N> {
    fn default() -> Self {
        Self::new()
    }
}
