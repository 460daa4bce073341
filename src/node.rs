//!
//! 搜索节点表
//!
//! 一次寻路过程中产生的节点按创建顺序存放在数组中，父节点用数组索引表示，根节点的父节点为Null。
//! 节点创建后不再修改，每个坐标在一次寻路中最多出现一次。
//!

use std::fmt::Debug;
use std::ops::Deref;

use pi_null::Null;

use crate::*;

/// 节点在节点表中的索引
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Default, Debug, Hash)]
pub struct NodeIndex(pub usize);

impl Deref for NodeIndex {
    type Target = usize;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Null for NodeIndex {
    fn is_null(&self) -> bool {
        self.0.is_null()
    }

    fn null() -> Self {
        NodeIndex(usize::null())
    }
}

/// 搜索节点
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchNode<N> {
    /// 节点的列行
    pub position: Point,
    /// 父节点，根节点为Null
    pub parent: NodeIndex,
    /// 从起点累计的代价
    pub weight: N,
}

/// 节点表
#[derive(Debug, Clone)]
pub struct NodeArena<N> {
    nodes: Vec<SearchNode<N>>,
}

impl<N: Copy + Debug> NodeArena<N> {
    pub fn with_capacity(capacity: usize) -> Self {
        NodeArena {
            nodes: Vec::with_capacity(capacity),
        }
    }
    /// 放入新节点，返回节点索引
    pub fn push(&mut self, position: Point, parent: NodeIndex, weight: N) -> NodeIndex {
        let index = NodeIndex(self.nodes.len());
        self.nodes.push(SearchNode {
            position,
            parent,
            weight,
        });
        index
    }
    pub fn get(&self, index: NodeIndex) -> Option<&SearchNode<N>> {
        self.nodes.get(index.0)
    }
    pub fn len(&self) -> usize {
        self.nodes.len()
    }
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
    pub fn clear(&mut self) {
        self.nodes.clear();
    }
    /// 从指定节点沿父节点回溯到根节点的迭代器，顺序为终点到起点
    pub fn result_iter(&self, node: NodeIndex) -> ResultIterator<'_, N> {
        ResultIterator { arena: self, node }
    }
    /// 从起点到指定节点的坐标序列
    pub fn path_to(&self, node: NodeIndex) -> Vec<Point> {
        let mut path: Vec<Point> = self.result_iter(node).map(|n| n.position).collect();
        path.reverse();
        path
    }
}

impl<N> std::ops::Index<NodeIndex> for NodeArena<N> {
    type Output = SearchNode<N>;
    fn index(&self, index: NodeIndex) -> &Self::Output {
        &self.nodes[index.0]
    }
}

// 结果的迭代器
#[derive(Clone)]
pub struct ResultIterator<'a, N> {
    arena: &'a NodeArena<N>,
    node: NodeIndex,
}

impl<'a, N: Copy> Iterator for ResultIterator<'a, N> {
    type Item = SearchNode<N>;
    fn next(&mut self) -> Option<Self::Item> {
        if self.node.is_null() {
            return None;
        }
        let e = self.arena.nodes[self.node.0];
        self.node = e.parent;
        Some(e)
    }
}
