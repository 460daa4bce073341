//!
//! 寻路器
//!
//! 组合格子的可走判断、路径处理器链和后处理器，对外提供两种寻路：
//! `find_points`返回列行坐标的路径，`find_path`再经过后处理器得到场景中的路径点。
//!
//! 寻路器本身在寻路时只读，多个线程可以共享同一个寻路器，各自使用自己的`SearchContext`和`Finder`。
//!

use std::any::{type_name, TypeId};
use std::fmt::Debug;

use log::debug;
use num_traits::Zero;

use crate::*;

/// 格子是否可以进入，参数为（列，行，上下文）
pub type CheckNode<'a, N> = dyn Fn(isize, isize, &SearchContext<'_, N>) -> bool + Send + Sync + 'a;

pub struct Pathfinder<'a, N> {
    // 没有设置时所有格子都可以进入
    check_node: Option<Box<CheckNode<'a, N>>>,
    processors: Vec<Box<dyn PathProcessor>>,
    // 没有设置时使用CellCenterPostProcessor
    post_processor: Option<Box<dyn PathPostProcessor + 'a>>,
    max_number: usize,
}

impl<'a, N> Default for Pathfinder<'a, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, N> Pathfinder<'a, N> {
    pub fn new() -> Self {
        Pathfinder {
            check_node: None,
            processors: Vec::new(),
            post_processor: None,
            max_number: usize::MAX,
        }
    }
    /// 按配置创建，配置了合并路径点时注册TrimPathProcessor
    pub fn from_config(config: &PathfinderConfig) -> Self {
        let mut pathfinder = Self::new();
        pathfinder.max_number = config.max_number();
        if config.trim_paths {
            pathfinder.add_processor(TrimPathProcessor);
        }
        pathfinder
    }
    /// 设置格子的可走判断
    pub fn set_check_node<F>(&mut self, check_node: F)
    where
        F: Fn(isize, isize, &SearchContext<'_, N>) -> bool + Send + Sync + 'a,
    {
        self.check_node = Some(Box::new(check_node));
    }
    pub fn clear_check_node(&mut self) {
        self.check_node = None;
    }
    /// 格子是否可以进入
    pub fn check_node(&self, column: isize, row: isize, ctx: &SearchContext<'_, N>) -> bool {
        match &self.check_node {
            Some(f) => f(column, row, ctx),
            None => true,
        }
    }
    pub fn max_number(&self) -> usize {
        self.max_number
    }
    /// 每次寻路最多展开的节点数
    pub fn set_max_number(&mut self, max_number: usize) {
        self.max_number = max_number;
    }

    /// 在处理器链的末尾加入处理器
    pub fn add_processor<P: PathProcessor>(&mut self, processor: P) {
        debug!("add processor {}", type_name::<P>());
        self.processors.push(Box::new(processor));
    }
    /// 移除所有类型为`T`的处理器，返回是否有处理器被移除
    pub fn remove_processor<T: PathProcessor>(&mut self) -> bool {
        let len = self.processors.len();
        self.processors.retain(|p| (**p).type_id() != TypeId::of::<T>());
        let removed = self.processors.len() != len;
        if removed {
            debug!("remove processor {}", type_name::<T>());
        }
        removed
    }
    /// 处理器链中是否有类型为`T`的处理器
    pub fn has_processor<T: PathProcessor>(&self) -> bool {
        self.processors.iter().any(|p| (**p).type_id() == TypeId::of::<T>())
    }
    /// 有类型为`T`的处理器时移除，没有时加入，返回切换后是否有该处理器
    pub fn toggle_processor<T: PathProcessor + Default>(&mut self) -> bool {
        if self.remove_processor::<T>() {
            return false;
        }
        self.add_processor(T::default());
        true
    }
    pub fn processors(&self) -> &[Box<dyn PathProcessor>] {
        &self.processors
    }

    pub fn set_post_processor<P: PathPostProcessor + 'a>(&mut self, post_processor: P) {
        debug!("set post processor {}", type_name::<P>());
        self.post_processor = Some(Box::new(post_processor));
    }
    /// 恢复使用默认的后处理器
    pub fn reset_post_processor(&mut self) {
        self.post_processor = None;
    }
    /// 当前的后处理器
    pub fn post_processor(&self) -> &dyn PathPostProcessor {
        match &self.post_processor {
            Some(p) => p.as_ref(),
            None => CellCenterPostProcessor::instance(),
        }
    }
}

impl<'a, N: PartialOrd + Zero + Copy + Debug> Pathfinder<'a, N> {
    /// 从`start`到`end`寻路，返回列行坐标的路径
    ///
    /// 上下文会记录本次的起点和终点。没有路径时返回空路径，深度为0
    pub fn find_points(&self, start: Point, end: Point, ctx: &mut SearchContext<'_, N>) -> GridPath {
        let mut finder = Finder::with_capacity(0, self.max_number);
        self.find_points_with(&mut finder, start, end, ctx)
    }
    /// 同`find_points`，复用传入的搜索器，搜索器的展开上限以寻路器的为准
    pub fn find_points_with(
        &self,
        finder: &mut Finder<N>,
        start: Point,
        end: Point,
        ctx: &mut SearchContext<'_, N>,
    ) -> GridPath {
        self.search(finder, start, end, ctx, None)
    }
    /// 在导航网格上寻路，返回后处理器生成的场景路径点
    ///
    /// 只能进入网格中可走且满足可走判断的格子，起点不在网格中时没有路径
    pub fn find_path(&self, start: Point, end: Point, ctx: &mut SearchContext<'_, N>, grid: &NavGrid) -> WaypointPath {
        let mut finder = Finder::with_capacity(0, self.max_number);
        self.find_path_with(&mut finder, start, end, ctx, grid)
    }
    pub fn find_path_with(
        &self,
        finder: &mut Finder<N>,
        start: Point,
        end: Point,
        ctx: &mut SearchContext<'_, N>,
        grid: &NavGrid,
    ) -> WaypointPath {
        if !grid.contains_column_row(start.x, start.y) {
            ctx.start = start;
            ctx.end = end;
            debug!("find_path {:?} -> {:?}: start outside grid", start, end);
            return WaypointPath::default();
        }
        let path = self.search(finder, start, end, ctx, Some(grid));
        WaypointPath::new(self.post_processor().process(&path.points, grid), path.depth)
    }

    fn search(
        &self,
        finder: &mut Finder<N>,
        start: Point,
        end: Point,
        ctx: &mut SearchContext<'_, N>,
        grid: Option<&NavGrid>,
    ) -> GridPath {
        ctx.start = start;
        ctx.end = end;
        finder.set_max_number(self.max_number);
        let ctx = &*ctx;
        let is_pass = |p: Point| {
            grid.map_or(true, |g| g.is_pathable(p.x, p.y)) && self.check_node(p.x, p.y, ctx)
        };
        let r = finder.find(start, end, ctx.destination_mode, is_pass, |p, e| ctx.weight(p, e));
        let path = match r.node() {
            Some(node) => create_path(&finder.nodes, node, ctx, &self.processors),
            None => GridPath::default(),
        };
        debug!(
            "find_points {:?} -> {:?}: {:?}, depth {}, len {}",
            start,
            end,
            r,
            path.depth,
            path.len()
        );
        path
    }
}
