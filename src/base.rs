//!
//! 基础类型：整数坐标点和轴对齐矩形
//!

use serde::{Deserialize, Serialize};

/// 整数坐标点，既用作网格的列行，也用作多边形的像素顶点
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    // x坐标，网格中为列
    pub x: isize,
    // y坐标，网格中为行
    pub y: isize,
}
impl Point {
    pub const fn new(x: isize, y: isize) -> Self {
        Point { x, y }
    }
    /// 偏移后的新坐标
    pub fn offset(&self, x: isize, y: isize) -> Self {
        Point::new(self.x + x, self.y + y)
    }
    /// 切比雪夫距离，即8方向移动的最少步数
    pub fn chebyshev(&self, other: Point) -> usize {
        let x = (self.x - other.x).unsigned_abs();
        let y = (self.y - other.y).unsigned_abs();
        x.max(y)
    }
}
// 实现 Add trait，定义加法操作
impl std::ops::Add for Point {
    type Output = Point;

    fn add(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }
}

// 实现 Sub trait，定义减法操作
impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }
}
impl From<(isize, isize)> for Point {
    fn from((x, y): (isize, isize)) -> Self {
        Point::new(x, y)
    }
}

/// 轴对齐矩形，min包含，max不包含
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Point,
    pub max: Point,
}
impl Aabb {
    pub fn new(min: Point, max: Point) -> Self {
        Aabb { min, max }
    }
    /// 用左上角和宽高创建矩形
    pub fn with_size(x: isize, y: isize, width: isize, height: isize) -> Self {
        Aabb::new(Point::new(x, y), Point::new(x + width, y + height))
    }
    /// 包含所有点的最小矩形，点集为空时返回None
    ///
    /// 注意max是最大的顶点本身，不是开区间的边界，`contains`不包含max所在的边，这里只用来求宽高
    pub fn from_points<'a, I: IntoIterator<Item = &'a Point>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let mut aabb = Aabb::new(first, first);
        for p in iter {
            aabb.min.x = aabb.min.x.min(p.x);
            aabb.min.y = aabb.min.y.min(p.y);
            aabb.max.x = aabb.max.x.max(p.x);
            aabb.max.y = aabb.max.y.max(p.y);
        }
        Some(aabb)
    }
    pub fn width(&self) -> isize {
        self.max.x - self.min.x
    }
    pub fn height(&self) -> isize {
        self.max.y - self.min.y
    }
    pub fn left(&self) -> isize {
        self.min.x
    }
    pub fn top(&self) -> isize {
        self.min.y
    }
    pub fn right(&self) -> isize {
        self.max.x
    }
    pub fn bottom(&self) -> isize {
        self.max.y
    }
    /// 矩形中心，整数除法向下取整
    pub fn center(&self) -> Point {
        Point::new(self.min.x + self.width() / 2, self.min.y + self.height() / 2)
    }
    // 判断点是否在矩形内
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.min.x && point.x < self.max.x && point.y >= self.min.y && point.y < self.max.y
    }
}
