//! 多边形区域的网格寻路
//!
//! polygon 模块：把闭合多边形光栅化为导航网格；
//!
//! finder 模块：均匀代价的最佳优先搜索，支持到达终点邻居的判定方式；
//!
//! path、processor 模块：从搜索结果生成路径，弹出首尾路径点，经过处理器链和后处理器得到场景中的路径点；
//!
//! pathfinder 模块：组合以上各步的寻路器
//!

mod base;
mod config;
mod context;
mod error;
mod finder;
mod fixture;
mod node;
mod path;
mod pathfinder;
mod polygon;
mod processor;
mod waypoint;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use base::*;
pub use config::*;
pub use context::*;
pub use error::*;
pub use finder::*;
pub use fixture::*;
pub use node::*;
pub use path::*;
pub use pathfinder::*;
pub use polygon::*;
pub use processor::*;
pub use waypoint::*;
