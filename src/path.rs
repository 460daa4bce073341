//!
//! 从搜索结果生成路径
//!
//! 沿父节点回溯得到从起点到终点的坐标序列，然后依次：
//! 从末尾丢弃满足丢弃判断的路径点、弹出第一个路径点、弹出最后N个路径点，
//! 此时记录路径长度`depth`，最后依次运行处理器。
//!

use std::fmt::Debug;

use crate::*;

/// 网格坐标表示的路径
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridPath {
    pub points: Vec<Point>,
    /// 处理器运行之前的路径长度，0表示没有路径
    pub depth: usize,
}

impl GridPath {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
    pub fn len(&self) -> usize {
        self.points.len()
    }
}

/// 弹出首尾的路径点，返回调整后的路径
pub fn adjust_path<N>(mut points: Vec<Point>, ctx: &SearchContext<'_, N>) -> Vec<Point> {
    // 从末尾开始丢弃，遇到第一个不丢弃的点停止
    while let Some(last) = points.last() {
        if !ctx.pop_waypoint_test(*last, points.len() - 1) {
            break;
        }
        points.pop();
    }
    if points.is_empty() {
        return points;
    }
    if ctx.pop_first_waypoint {
        points.remove(0);
    }
    let n = ctx.pop_last_n_waypoints;
    if n > 0 {
        if n > points.len() {
            // 弹出的数量超过路径长度，整条路径作废
            points.clear();
        } else {
            points.truncate(points.len() - n);
        }
    }
    points
}

/// 依次运行处理器，每个处理器的输出作为下一个处理器的输入
pub fn process_path(points: Vec<Point>, processors: &[Box<dyn PathProcessor>]) -> Vec<Point> {
    if processors.is_empty() {
        return points;
    }
    let initial = points.clone();
    processors.iter().fold(points, |points, p| p.process(points, &initial))
}

/// 从搜索结果的节点生成路径
pub fn create_path<N: Copy + Debug>(
    nodes: &NodeArena<N>,
    node: NodeIndex,
    ctx: &SearchContext<'_, N>,
    processors: &[Box<dyn PathProcessor>],
) -> GridPath {
    let points = adjust_path(nodes.path_to(node), ctx);
    let depth = points.len();
    GridPath {
        points: process_path(points, processors),
        depth,
    }
}

#[cfg(test)]
mod test_path {
    use crate::*;
    use pi_null::Null;

    fn line(n: isize) -> Vec<Point> {
        (0..n).map(|x| Point::new(x, 0)).collect()
    }

    // 反转的处理器，用来检查处理器的顺序
    struct ReverseProcessor;
    impl PathProcessor for ReverseProcessor {
        fn process(&self, mut input: Vec<Point>, initial: &[Point]) -> Vec<Point> {
            assert_eq!(initial.first(), Some(&Point::new(0, 0)));
            input.reverse();
            input
        }
    }

    #[test]
    fn test_adjust() {
        let ctx: SearchContext<u32> = SearchContext::new();
        assert_eq!(adjust_path(line(5), &ctx), line(5));

        let ctx: SearchContext<u32> = SearchContext::new().with_pop_first_waypoint(true);
        assert_eq!(adjust_path(line(5), &ctx), line(5)[1..].to_vec());

        let ctx: SearchContext<u32> = SearchContext::new().with_pop_last_n_waypoints(2);
        assert_eq!(adjust_path(line(5), &ctx), line(3));

        // 正好弹出全部
        let ctx: SearchContext<u32> = SearchContext::new().with_pop_last_n_waypoints(5);
        assert!(adjust_path(line(5), &ctx).is_empty());

        let ctx: SearchContext<u32> = SearchContext::new().with_pop_last_n_waypoints(9);
        assert!(adjust_path(line(5), &ctx).is_empty());

        let ctx: SearchContext<u32> = SearchContext::new()
            .with_pop_first_waypoint(true)
            .with_pop_last_n_waypoints(5);
        assert!(adjust_path(line(5), &ctx).is_empty());
    }
    #[test]
    fn test_pop_test() {
        // 丢弃x>=3的点，从末尾开始遇到不满足的点就停止
        let ctx: SearchContext<u32> = SearchContext::new().with_pop_test(|p, _| p.x >= 3);
        assert_eq!(adjust_path(line(5), &ctx), line(3));

        // 序号从路径起点算起
        let ctx: SearchContext<u32> = SearchContext::new().with_pop_test(|_, i| i == 4 || i == 2);
        assert_eq!(adjust_path(line(5), &ctx), line(4));

        // 全部丢弃后不再弹出第一个点
        let ctx: SearchContext<u32> = SearchContext::new()
            .with_pop_test(|_, _| true)
            .with_pop_first_waypoint(true);
        assert!(adjust_path(line(5), &ctx).is_empty());
    }
    #[test]
    fn test_create_path() {
        let mut nodes: NodeArena<u32> = NodeArena::with_capacity(3);
        let mut parent = NodeIndex::null();
        for x in 0..3 {
            parent = nodes.push(Point::new(x, 0), parent, x as u32);
        }
        let ctx = SearchContext::new();
        let processors: Vec<Box<dyn PathProcessor>> = vec![Box::new(TrimPathProcessor)];
        let path = create_path(&nodes, parent, &ctx, &processors);
        assert_eq!(path.points, vec![Point::new(0, 0), Point::new(2, 0)]);
        assert_eq!(path.depth, 3);

        let processors: Vec<Box<dyn PathProcessor>> = vec![Box::new(TrimPathProcessor), Box::new(ReverseProcessor)];
        let path = create_path(&nodes, parent, &ctx, &processors);
        assert_eq!(path.points, vec![Point::new(2, 0), Point::new(0, 0)]);
        assert_eq!(path.len(), 2);
        assert_eq!(path.depth, 3);

        let ctx = SearchContext::new().with_pop_last_n_waypoints(4);
        let path = create_path(&nodes, parent, &ctx, &[]);
        assert!(path.is_empty());
        assert_eq!(path.depth, 0);
    }
}
