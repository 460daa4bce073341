//!
//! 场景中的路径
//!

use nalgebra::Vector3;

/// 场景中的路径点序列，以及处理器合并路径点之前的路径长度
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WaypointPath {
    waypoints: Vec<Vector3<f32>>,
    // 路径长度，在弹出首尾路径点之后、处理器运行之前记录，0表示没有路径
    depth: usize,
}

impl WaypointPath {
    pub fn new(waypoints: Vec<Vector3<f32>>, depth: usize) -> Self {
        WaypointPath { waypoints, depth }
    }
    pub fn waypoints(&self) -> &[Vector3<f32>] {
        &self.waypoints
    }
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }
    pub fn depth(&self) -> usize {
        self.depth
    }
    pub fn set_depth(&mut self, depth: usize) {
        self.depth = depth;
    }
    /// 下一个路径点
    pub fn next_waypoint(&self) -> Option<&Vector3<f32>> {
        self.waypoints.first()
    }
    pub fn last_waypoint(&self) -> Option<&Vector3<f32>> {
        self.waypoints.last()
    }
    pub fn add_waypoint(&mut self, waypoint: Vector3<f32>) {
        self.waypoints.push(waypoint);
    }
    pub fn add_waypoints<I: IntoIterator<Item = Vector3<f32>>>(&mut self, waypoints: I) {
        self.waypoints.extend(waypoints);
    }
    /// 弹出下一个路径点
    pub fn pop_waypoint(&mut self) -> Option<Vector3<f32>> {
        if self.waypoints.is_empty() {
            return None;
        }
        Some(self.waypoints.remove(0))
    }
    pub fn clear(&mut self) {
        self.waypoints.clear();
    }
    /// 从指定位置到下一个路径点的向量，没有路径点时为0向量
    pub fn distance_to_next(&self, position: &Vector3<f32>) -> Vector3<f32> {
        match self.next_waypoint() {
            Some(next) => next - position,
            None => Vector3::zeros(),
        }
    }
    /// 从指定位置到下一个路径点的单位方向，没有路径点或已在路径点上时为0向量
    pub fn direction_to_next(&self, position: &Vector3<f32>) -> Vector3<f32> {
        self.distance_to_next(position)
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vector3::zeros)
    }
}
