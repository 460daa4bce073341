//!
//! 多边形区域及其导航网格
//!
//! 多边形的顶点按顺序首尾相连，围成一个闭合区域。
//! 按指定的格子宽高切分多边形的包围盒，得到导航网格，每个格子用射线法判断是否位于多边形内，位于多边形内的格子可走。
//! 网格每次生成都整体重建，不做增量更新。
//!

use std::collections::HashSet;

use bitvec::prelude::*;
use log::debug;
use num_derive::FromPrimitive;
use serde::{Deserialize, Serialize};

use crate::*;

/// 格子是否位于多边形内的判定方式
#[repr(u8)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromPrimitive, Serialize, Deserialize)]
pub enum RasterMode {
    /// 左上右下、右上左下两组对角点，任意一组都在多边形内，则格子可走
    #[default]
    Loose = 0,
    /// 两组对角点都在多边形内，格子才可走
    Tight = 1,
}

/// 射线法判断点是否在多边形内
///
/// 逐条边检查（最后一个顶点连回第一个顶点），统计向右的水平射线穿过边的次数，奇数次表示在多边形内。
/// 水平边直接跳过，避免求交点时除0。
pub fn is_point_inside_polygon(points: &[Point], x: isize, y: isize) -> bool {
    if points.is_empty() {
        return false;
    }
    let mut counter = 0usize;
    let mut p1 = points[0];
    for i in 1..=points.len() {
        let p2 = points[i % points.len()];
        if y > p1.y.min(p2.y) && y <= p1.y.max(p2.y) && x <= p1.x.max(p2.x) && p1.y != p2.y {
            // 边在y高度上的交点x坐标，整数除法
            let xinters = (y - p1.y) * (p2.x - p1.x) / (p2.y - p1.y) + p1.x;
            if p1.x == p2.x || x <= xinters {
                counter += 1;
            }
        }
        p1 = p2;
    }
    counter % 2 != 0
}

/// 判断矩形是否在多边形内，用两组对角点测试
pub fn is_rect_inside_polygon(points: &[Point], rect: &Aabb, mode: RasterMode) -> bool {
    let left_top_right_bottom = is_point_inside_polygon(points, rect.left(), rect.top())
        && is_point_inside_polygon(points, rect.right(), rect.bottom());
    let right_top_left_bottom = is_point_inside_polygon(points, rect.right(), rect.top())
        && is_point_inside_polygon(points, rect.left(), rect.bottom());
    match mode {
        RasterMode::Tight => left_top_right_bottom && right_top_left_bottom,
        RasterMode::Loose => left_top_right_bottom || right_top_left_bottom,
    }
}

/// 网格中的格子
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell {
    pub column: isize,
    pub row: isize,
    // 格子的像素范围
    pub bounds: Aabb,
    // 是否可走
    pub pathable: bool,
}
impl GridCell {
    /// 无效格子，按像素查询不到格子时返回
    pub const INVALID: GridCell = GridCell {
        column: -1,
        row: -1,
        bounds: Aabb {
            min: Point::new(0, 0),
            max: Point::new(0, 0),
        },
        pathable: false,
    };
    pub fn is_valid(&self) -> bool {
        self.column >= 0 && self.row >= 0
    }
    /// 格子的列行坐标
    pub fn position(&self) -> Point {
        Point::new(self.column, self.row)
    }
}

/// 导航网格，由多边形区域生成，格子按从左到右、从上到下排列
#[derive(Debug, Clone, Default)]
pub struct NavGrid {
    // 网格左上角的像素坐标
    origin: Point,
    cell_width: usize,
    cell_height: usize,
    // 列数
    width: usize,
    // 行数
    height: usize,
    // 每个格子是否可走
    pathable: BitVec,
}

impl NavGrid {
    fn rasterize(points: &[Point], bounds: Aabb, cell_width: usize, cell_height: usize, mode: RasterMode) -> Self {
        let width = (bounds.width() as usize).div_ceil(cell_width);
        let height = (bounds.height() as usize).div_ceil(cell_height);
        let mut grid = NavGrid {
            origin: bounds.min,
            cell_width,
            cell_height,
            width,
            height,
            pathable: bitvec![0; width * height],
        };
        for row in 0..height {
            for column in 0..width {
                let rect = grid.cell_bounds(column as isize, row as isize);
                let ok = is_rect_inside_polygon(points, &rect, mode);
                grid.pathable.set(row * width + column, ok);
            }
        }
        grid
    }
    /// 列数
    pub fn width(&self) -> usize {
        self.width
    }
    /// 行数
    pub fn height(&self) -> usize {
        self.height
    }
    pub fn cell_width(&self) -> usize {
        self.cell_width
    }
    pub fn cell_height(&self) -> usize {
        self.cell_height
    }
    /// 格子总数
    pub fn len(&self) -> usize {
        self.width * self.height
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// 可走格子的数量
    pub fn pathable_count(&self) -> usize {
        self.pathable.count_ones()
    }
    /// 整个网格覆盖的像素范围
    pub fn bounds(&self) -> Aabb {
        Aabb::with_size(
            self.origin.x,
            self.origin.y,
            (self.width * self.cell_width) as isize,
            (self.height * self.cell_height) as isize,
        )
    }
    /// 列行是否在网格内
    pub fn contains_column_row(&self, column: isize, row: isize) -> bool {
        column >= 0 && (column as usize) < self.width && row >= 0 && (row as usize) < self.height
    }
    /// 列行是否在网格内并且可走
    pub fn is_pathable(&self, column: isize, row: isize) -> bool {
        self.contains_column_row(column, row) && self.pathable[row as usize * self.width + column as usize]
    }
    /// 按列行获取格子
    ///
    /// # Panics
    ///
    /// 列行超出网格时panic，调用前应先用`contains_column_row`检查
    pub fn cell_at(&self, column: isize, row: isize) -> GridCell {
        assert!(
            self.contains_column_row(column, row),
            "cell ({}, {}) is outside the {}x{} grid",
            column,
            row,
            self.width,
            self.height
        );
        GridCell {
            column,
            row,
            bounds: self.cell_bounds(column, row),
            pathable: self.pathable[row as usize * self.width + column as usize],
        }
    }
    /// 按像素坐标获取格子，没有格子包含该点时返回`GridCell::INVALID`
    pub fn cell_at_xy(&self, x: isize, y: isize) -> GridCell {
        if self.is_empty() || !self.bounds().contains(Point::new(x, y)) {
            return GridCell::INVALID;
        }
        let column = (x - self.origin.x) / self.cell_width as isize;
        let row = (y - self.origin.y) / self.cell_height as isize;
        self.cell_at(column, row)
    }
    /// 按从左到右、从上到下的顺序遍历所有格子
    pub fn cells(&self) -> impl Iterator<Item = GridCell> + '_ {
        (0..self.len()).map(move |i| self.cell_at((i % self.width) as isize, (i / self.width) as isize))
    }
    // 格子的像素范围
    fn cell_bounds(&self, column: isize, row: isize) -> Aabb {
        Aabb::with_size(
            self.origin.x + column * self.cell_width as isize,
            self.origin.y + row * self.cell_height as isize,
            self.cell_width as isize,
            self.cell_height as isize,
        )
    }
}

/// 多边形区域，拥有由它生成的导航网格
#[derive(Debug, Clone, Default)]
pub struct Region {
    points: Vec<Point>,
    closed: bool,
    raster_mode: RasterMode,
    grid: NavGrid,
}

impl Region {
    pub fn new() -> Self {
        Self::default()
    }
    /// 用顶点序列创建区域，不自动闭合
    pub fn from_points(points: Vec<Point>) -> Self {
        Region {
            points,
            ..Default::default()
        }
    }
    pub fn points(&self) -> &[Point] {
        &self.points
    }
    /// 追加顶点，区域变为未闭合
    pub fn push(&mut self, point: Point) {
        self.points.push(point);
        self.closed = false;
    }
    pub fn is_closed(&self) -> bool {
        self.closed
    }
    pub fn raster_mode(&self) -> RasterMode {
        self.raster_mode
    }
    /// 设置判定方式，下次生成网格时生效
    pub fn set_raster_mode(&mut self, mode: RasterMode) {
        self.raster_mode = mode;
    }
    pub fn grid(&self) -> &NavGrid {
        &self.grid
    }
    /// 闭合区域，最后一个顶点和第一个顶点不同时，追加第一个顶点
    pub fn close(&mut self) -> Result<()> {
        if self.points.len() < 2 {
            return Err(PolyPathError::TooFewVertices {
                expected: 2,
                found: self.points.len(),
            });
        }
        if self.points.last() != self.points.first() {
            self.points.push(self.points[0]);
        }
        self.closed = true;
        Ok(())
    }
    /// 清空顶点和网格
    pub fn clear(&mut self) {
        self.points.clear();
        self.grid = NavGrid::default();
        self.closed = false;
    }
    /// 按格子宽高重新生成导航网格
    pub fn create_grid(&mut self, cell_width: usize, cell_height: usize) -> Result<&NavGrid> {
        if cell_width == 0 || cell_height == 0 {
            return Err(PolyPathError::InvalidCellSize {
                width: cell_width,
                height: cell_height,
            });
        }
        let distinct = self.points.iter().collect::<HashSet<_>>().len();
        if distinct < 3 {
            return Err(PolyPathError::DegenerateRegion(distinct));
        }
        let bounds = Aabb::from_points(&self.points).ok_or(PolyPathError::DegenerateRegion(0))?;
        self.grid = NavGrid::rasterize(&self.points, bounds, cell_width, cell_height, self.raster_mode);
        debug!(
            "create grid {}x{}, cell {}x{}, {:?}, pathable {}",
            self.grid.width,
            self.grid.height,
            cell_width,
            cell_height,
            self.raster_mode,
            self.grid.pathable_count()
        );
        Ok(&self.grid)
    }
    /// 按配置的判定方式和格子宽高生成导航网格
    pub fn create_grid_with(&mut self, config: &PathfinderConfig) -> Result<&NavGrid> {
        self.raster_mode = config.raster_mode;
        self.create_grid(config.cell_width, config.cell_height)
    }
    pub fn contains_column_row(&self, column: isize, row: isize) -> bool {
        self.grid.contains_column_row(column, row)
    }
    pub fn cell_at(&self, column: isize, row: isize) -> GridCell {
        self.grid.cell_at(column, row)
    }
    pub fn cell_at_xy(&self, x: isize, y: isize) -> GridCell {
        self.grid.cell_at_xy(x, y)
    }
}

#[cfg(test)]
mod test_polygon {
    use crate::*;

    fn square() -> Region {
        let mut region = Region::from_points(vec![
            Point::new(0, 0),
            Point::new(64, 0),
            Point::new(64, 64),
            Point::new(0, 64),
        ]);
        region.close().unwrap();
        region
    }

    #[test]
    fn test_close() {
        let mut region = square();
        assert!(region.is_closed());
        assert_eq!(region.points().len(), 5);
        assert_eq!(region.points()[4], Point::new(0, 0));
        // 已经闭合的不再追加
        region.close().unwrap();
        assert_eq!(region.points().len(), 5);

        region.push(Point::new(10, 10));
        assert!(!region.is_closed());

        let mut one = Region::from_points(vec![Point::new(1, 1)]);
        assert!(matches!(one.close(), Err(PolyPathError::TooFewVertices { found: 1, .. })));
    }
    #[test]
    fn test_point_inside() {
        let region = square();
        let points = region.points();
        assert!(is_point_inside_polygon(points, 32, 32));
        assert!(!is_point_inside_polygon(points, 80, 32));
        assert!(!is_point_inside_polygon(points, -1, 32));
        // 上边和左边不算在内，右边和下边算在内
        assert!(!is_point_inside_polygon(points, 32, 0));
        assert!(!is_point_inside_polygon(points, 0, 32));
        assert!(is_point_inside_polygon(points, 64, 32));
        assert!(is_point_inside_polygon(points, 32, 64));
    }
    #[test]
    fn test_create_grid() {
        let mut region = square();
        for mode in [RasterMode::Loose, RasterMode::Tight] {
            region.set_raster_mode(mode);
            let grid = region.create_grid(16, 16).unwrap();
            assert_eq!(grid.width(), 4);
            assert_eq!(grid.height(), 4);
            assert_eq!(grid.cells().count(), 16);
            // 内部格子一定可走
            assert!(grid.cell_at(1, 1).pathable);
            assert!(grid.cell_at(2, 2).pathable);
            // 左上角位于边上的格子不可走
            assert!(!grid.cell_at(0, 0).pathable);
            assert!(!grid.cell_at(0, 2).pathable);
            assert_eq!(grid.pathable_count(), 9);
        }
    }
    #[test]
    fn test_grid_ceil() {
        let mut region = Region::from_points(vec![
            Point::new(10, 20),
            Point::new(60, 20),
            Point::new(60, 50),
            Point::new(10, 50),
        ]);
        region.close().unwrap();
        let grid = region.create_grid(16, 16).unwrap();
        assert_eq!(grid.width(), 4);
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.len(), 8);
        assert_eq!(grid.bounds(), Aabb::with_size(10, 20, 64, 32));
        let cell = grid.cell_at(3, 1);
        assert_eq!(cell.bounds, Aabb::with_size(58, 36, 16, 16));
    }
    #[test]
    fn test_cell_at_xy() {
        let mut region = square();
        region.create_grid(16, 16).unwrap();
        let cell = region.cell_at_xy(20, 20);
        assert_eq!(cell.position(), Point::new(1, 1));
        assert_eq!(cell.bounds, Aabb::with_size(16, 16, 16, 16));
        let cell = region.cell_at_xy(63, 0);
        assert_eq!(cell.position(), Point::new(3, 0));
        assert_eq!(region.cell_at_xy(-5, 3), GridCell::INVALID);
        assert_eq!(region.cell_at_xy(64, 10), GridCell::INVALID);
        assert!(!GridCell::INVALID.is_valid());
        assert!(region.contains_column_row(3, 3));
        assert!(!region.contains_column_row(4, 0));
        assert!(!region.contains_column_row(0, -1));
    }
    #[test]
    #[should_panic]
    fn test_cell_at_outside() {
        let mut region = square();
        region.create_grid(16, 16).unwrap();
        region.cell_at(-1, 1);
    }
    #[test]
    fn test_loose_tight() {
        // 右上角被切掉，只有左上右下一组在多边形内
        let mut region = Region::from_points(vec![
            Point::new(0, 0),
            Point::new(8, 0),
            Point::new(64, 56),
            Point::new(64, 64),
            Point::new(0, 64),
        ]);
        region.close().unwrap();
        region.set_raster_mode(RasterMode::Loose);
        assert!(region.create_grid(16, 16).unwrap().cell_at(1, 1).pathable);
        region.set_raster_mode(RasterMode::Tight);
        assert!(!region.create_grid(16, 16).unwrap().cell_at(1, 1).pathable);

        // 左上角被切掉，只有右上左下一组在多边形内
        let mut region = Region::from_points(vec![
            Point::new(40, 0),
            Point::new(64, 0),
            Point::new(64, 64),
            Point::new(0, 64),
            Point::new(0, 40),
        ]);
        region.close().unwrap();
        region.set_raster_mode(RasterMode::Loose);
        assert!(region.create_grid(16, 16).unwrap().cell_at(1, 1).pathable);
        region.set_raster_mode(RasterMode::Tight);
        assert!(!region.create_grid(16, 16).unwrap().cell_at(1, 1).pathable);
    }
    #[test]
    fn test_invalid_grid() {
        let mut region = Region::from_points(vec![Point::new(0, 0), Point::new(10, 0), Point::new(0, 0)]);
        assert!(matches!(region.create_grid(16, 16), Err(PolyPathError::DegenerateRegion(2))));
        let mut region = square();
        assert!(matches!(region.create_grid(0, 16), Err(PolyPathError::InvalidCellSize { .. })));
    }
    #[test]
    fn test_clear() {
        let mut region = square();
        region.create_grid(16, 16).unwrap();
        region.clear();
        assert!(region.points().is_empty());
        assert!(!region.is_closed());
        assert!(region.grid().is_empty());
        assert_eq!(region.cell_at_xy(10, 10), GridCell::INVALID);
    }
    #[test]
    fn test_create_grid_with() {
        let mut region = square();
        let config = PathfinderConfig {
            cell_width: 32,
            cell_height: 32,
            raster_mode: RasterMode::Tight,
            ..Default::default()
        };
        let grid = region.create_grid_with(&config).unwrap();
        assert_eq!((grid.width(), grid.height()), (2, 2));
        assert_eq!(region.raster_mode(), RasterMode::Tight);
    }
}
