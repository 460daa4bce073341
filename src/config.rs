//!
//! 寻路配置
//!
//! 所有字段都有默认值，可以从JSON读取部分字段
//!

use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathfinderConfig {
    /// 格子宽度（像素）
    pub cell_width: usize,
    /// 格子高度（像素）
    pub cell_height: usize,
    /// 格子是否位于多边形内的判定方式
    pub raster_mode: RasterMode,
    /// 是否合并同方向的路径点
    pub trim_paths: bool,
    /// 到达目标的判定方式
    pub destination_mode: DestinationMode,
    /// 是否弹出第一个路径点
    pub pop_first_waypoint: bool,
    /// 弹出最后N个路径点
    pub pop_last_n_waypoints: usize,
    /// 最多展开的节点数，None表示不限制
    pub max_expansions: Option<usize>,
}

impl Default for PathfinderConfig {
    fn default() -> Self {
        PathfinderConfig {
            cell_width: 16,
            cell_height: 16,
            raster_mode: RasterMode::Loose,
            trim_paths: false,
            destination_mode: DestinationMode::EXACT,
            pop_first_waypoint: false,
            pop_last_n_waypoints: 0,
            max_expansions: None,
        }
    }
}

impl PathfinderConfig {
    /// 从JSON字符串读取
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
    /// 展开次数上限，不限制时为usize::MAX
    pub fn max_number(&self) -> usize {
        self.max_expansions.unwrap_or(usize::MAX)
    }
}
