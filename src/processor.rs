//!
//! 路径处理器
//!
//! `PathProcessor`可以串联，依次处理寻路得到的列行坐标序列，比如合并同方向的路径点。
//! `PathPostProcessor`只有一个，最后把列行坐标转换为场景中的路径点。
//!

use std::any::Any;

use nalgebra::Vector3;

use crate::*;

/// 路径处理器，输入当前的坐标序列和处理前的原始坐标序列，输出新的坐标序列
pub trait PathProcessor: Any + Send + Sync {
    fn process(&self, input: Vec<Point>, initial: &[Point]) -> Vec<Point>;
}

/// 路径后处理器，把列行坐标转换为场景中的路径点
pub trait PathPostProcessor: Send + Sync {
    fn process(&self, input: &[Point], grid: &NavGrid) -> Vec<Vector3<f32>>;
}

/// 合并同方向的路径点，水平、垂直、斜向连续的3个点去掉中间的点
///
/// 比如 (1,1) (2,1) (3,1) 合并为 (1,1) (3,1)
#[derive(Debug, Clone, Copy, Default)]
pub struct TrimPathProcessor;

impl TrimPathProcessor {
    /// 寻路器是否在合并路径点
    pub fn is_trimming<N>(pathfinder: &Pathfinder<'_, N>) -> bool {
        pathfinder.has_processor::<TrimPathProcessor>()
    }
    /// 切换寻路器是否合并路径点，返回切换后的状态
    pub fn toggle<N>(pathfinder: &mut Pathfinder<'_, N>) -> bool {
        pathfinder.toggle_processor::<TrimPathProcessor>()
    }
}

impl PathProcessor for TrimPathProcessor {
    fn process(&self, mut input: Vec<Point>, _initial: &[Point]) -> Vec<Point> {
        if input.len() < 3 {
            return input;
        }
        // 先记下要去掉的点，判断都基于原序列
        let mut keep = vec![true; input.len()];
        for i in 1..input.len() - 1 {
            let (prev, cur, next) = (input[i - 1], input[i], input[i + 1]);
            if continues_horizontally(prev, cur, next)
                || continues_vertically(prev, cur, next)
                || continues_diagonally(prev, cur, next)
            {
                keep[i] = false;
            }
        }
        let mut flags = keep.into_iter();
        input.retain(|_| flags.next().unwrap_or(true));
        input
    }
}

// 3个点是否在同一行
fn continues_horizontally(prev: Point, cur: Point, next: Point) -> bool {
    cur.y == next.y && next.y == prev.y && cur.x != next.x
}

// 3个点是否在同一列
fn continues_vertically(prev: Point, cur: Point, next: Point) -> bool {
    cur.x == next.x && next.x == prev.x && cur.y != next.y
}

// 3个点是否在同一条45°斜线上相邻
fn continues_diagonally(prev: Point, cur: Point, next: Point) -> bool {
    [(1, -1), (1, 1), (-1, 1), (-1, -1)]
        .iter()
        .any(|&(x, y)| cur.offset(x, y) == next && cur.offset(-x, -y) == prev)
}

/// 默认的后处理器，取每个格子像素范围的中心，z为0
#[derive(Debug, Clone, Copy, Default)]
pub struct CellCenterPostProcessor;

static CELL_CENTER: CellCenterPostProcessor = CellCenterPostProcessor;

impl CellCenterPostProcessor {
    /// 全局共享的实例
    pub fn instance() -> &'static CellCenterPostProcessor {
        &CELL_CENTER
    }
}

impl PathPostProcessor for CellCenterPostProcessor {
    fn process(&self, input: &[Point], grid: &NavGrid) -> Vec<Vector3<f32>> {
        input
            .iter()
            .map(|p| {
                let center = grid.cell_at(p.x, p.y).bounds.center();
                Vector3::new(center.x as f32, center.y as f32, 0.0)
            })
            .collect()
    }
}

/// 直接把列行当作场景坐标，适用于格子就是场景单位的地图
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectPathPostProcessor;

impl PathPostProcessor for DirectPathPostProcessor {
    fn process(&self, input: &[Point], _grid: &NavGrid) -> Vec<Vector3<f32>> {
        input.iter().map(|p| Vector3::new(p.x as f32, p.y as f32, 0.0)).collect()
    }
}

#[cfg(test)]
mod test_processor {
    use crate::*;
    use nalgebra::Vector3;

    fn points(arr: &[(isize, isize)]) -> Vec<Point> {
        arr.iter().map(|&p| Point::from(p)).collect()
    }

    #[test]
    fn test_trim() {
        let trim = TrimPathProcessor;
        let input = points(&[(0, 0), (1, 0), (2, 0)]);
        assert_eq!(trim.process(input.clone(), &input), points(&[(0, 0), (2, 0)]));

        let input = points(&[(0, 0), (1, 1), (2, 2), (3, 3), (3, 4), (3, 5), (2, 6)]);
        assert_eq!(trim.process(input.clone(), &input), points(&[(0, 0), (3, 3), (3, 5), (2, 6)]));

        // 反方向的斜线
        let input = points(&[(4, 0), (3, 1), (2, 2), (1, 1)]);
        assert_eq!(trim.process(input.clone(), &input), points(&[(4, 0), (2, 2), (1, 1)]));

        // 拐弯处保留
        let input = points(&[(0, 0), (1, 0), (1, 1), (2, 1)]);
        assert_eq!(trim.process(input.clone(), &input), input);

        let input = points(&[(0, 0), (1, 0)]);
        assert_eq!(trim.process(input.clone(), &input), input);
        assert!(trim.process(Vec::new(), &[]).is_empty());
    }
    #[test]
    fn test_post_processor() {
        let mut region = Region::from_points(vec![
            Point::new(100, 50),
            Point::new(164, 50),
            Point::new(164, 114),
            Point::new(100, 114),
        ]);
        region.close().unwrap();
        region.create_grid(16, 16).unwrap();
        let input = points(&[(1, 1), (2, 3)]);
        let r = CellCenterPostProcessor::instance().process(&input, region.grid());
        assert_eq!(r, vec![Vector3::new(124.0, 74.0, 0.0), Vector3::new(140.0, 106.0, 0.0)]);
        let r = DirectPathPostProcessor.process(&input, region.grid());
        assert_eq!(r, vec![Vector3::new(1.0, 1.0, 0.0), Vector3::new(2.0, 3.0, 0.0)]);
    }
}
