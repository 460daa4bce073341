//!
//! wasm接口
//!

use bytemuck::{Pod, Zeroable};
use js_sys::{Float32Array, Function};
use num_traits::FromPrimitive;
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

use crate::{
    Finder, PathfinderConfig, Point, RasterMode, SearchContext, TrimPathProcessor,
};

// 场景中的路径点
#[derive(Clone, Copy, Pod, Zeroable)]
#[repr(C)]
struct P(f32, f32, f32);

fn to_js_error(e: crate::PolyPathError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen]
pub struct Region {
    inner: crate::Region,
}

#[wasm_bindgen]
impl Region {
    pub fn new() -> Self {
        Self {
            inner: crate::Region::new(),
        }
    }
    /// 从小端i32的顶点数据创建
    pub fn from_bytes(data: &[u8]) -> Result<Region, JsValue> {
        let mut reader = data;
        let inner = crate::Region::from_reader(&mut reader).map_err(to_js_error)?;
        Ok(Self { inner })
    }
    pub fn to_bytes(&self) -> Result<Vec<u8>, JsValue> {
        let mut buf = Vec::new();
        self.inner.write_to(&mut buf).map_err(to_js_error)?;
        Ok(buf)
    }
    pub fn push(&mut self, x: isize, y: isize) {
        self.inner.push(Point::new(x, y));
    }
    pub fn close(&mut self) -> Result<(), JsValue> {
        self.inner.close().map_err(to_js_error)
    }
    pub fn clear(&mut self) {
        self.inner.clear();
    }
    /// 0为宽松，1为严格
    pub fn set_raster_mode(&mut self, mode: u8) {
        self.inner.set_raster_mode(RasterMode::from_u8(mode).unwrap_or_default());
    }
    pub fn create_grid(&mut self, cell_width: usize, cell_height: usize) -> Result<(), JsValue> {
        self.inner.create_grid(cell_width, cell_height).map_err(to_js_error)?;
        Ok(())
    }
    pub fn width(&self) -> usize {
        self.inner.grid().width()
    }
    pub fn height(&self) -> usize {
        self.inner.grid().height()
    }
    pub fn is_pathable(&self, column: isize, row: isize) -> bool {
        self.inner.grid().is_pathable(column, row)
    }
    /// 像素坐标所在格子的列行，不在网格中时为[-1, -1]
    pub fn cell_at_xy(&self, x: isize, y: isize) -> JsValue {
        let cell = self.inner.cell_at_xy(x, y);
        to_value(&cell.position()).unwrap_or(JsValue::NULL)
    }
}

#[wasm_bindgen]
pub struct Pathfinder {
    config: PathfinderConfig,
    finder: Finder<f32>,
    trim: bool,
}

#[wasm_bindgen]
impl Pathfinder {
    pub fn new() -> Self {
        Self::with_config(PathfinderConfig::default())
    }
    /// 从js对象读取配置，缺少的字段使用默认值
    pub fn from_config(config: JsValue) -> Result<Pathfinder, JsValue> {
        let config: PathfinderConfig = from_value(config)?;
        Ok(Self::with_config(config))
    }
    pub fn config(&self) -> JsValue {
        to_value(&self.config).unwrap_or(JsValue::NULL)
    }
    /// 切换是否合并路径点，返回切换后的状态
    pub fn toggle_trimming(&mut self) -> bool {
        self.trim = !self.trim;
        self.trim
    }
    /// 寻路，返回x, y, z依次排列的路径点，没有路径时为空数组
    ///
    /// `weight`可选，参数为（列，行，终点列，终点行），返回代价。
    /// 不传或者js函数抛出异常、返回非数字时每步代价为1，和`SearchContext::new`默认的0不同，
    /// 这样不传代价函数时得到步数最少的路径
    pub fn find_path(
        &mut self,
        region: &Region,
        start_column: isize,
        start_row: isize,
        end_column: isize,
        end_row: isize,
        weight: Option<Function>,
    ) -> Float32Array {
        let mut pathfinder = crate::Pathfinder::from_config(&self.config);
        if self.trim != pathfinder.has_processor::<TrimPathProcessor>() {
            TrimPathProcessor::toggle(&mut pathfinder);
        }
        let mut ctx = SearchContext::from_config(&self.config);
        // js函数不是Send，只能在当前线程调用
        let weight = weight.map(SendFunction);
        ctx = match weight {
            Some(f) => ctx.with_weight(move |p: Point, e: Point| f.call(p, e)),
            None => ctx.with_weight(|_, _| 1.0),
        };
        let path = pathfinder.find_path_with(
            &mut self.finder,
            Point::new(start_column, start_row),
            Point::new(end_column, end_row),
            &mut ctx,
            region.inner.grid(),
        );
        let arr: Vec<P> = path.waypoints().iter().map(|v| P(v.x, v.y, v.z)).collect();
        let data: &[f32] = bytemuck::cast_slice(&arr);
        let r = Float32Array::new_with_length(data.len() as u32);
        r.copy_from(data);
        r
    }
}

impl Pathfinder {
    fn with_config(config: PathfinderConfig) -> Self {
        Self {
            finder: Finder::with_capacity(0, config.max_number()),
            trim: config.trim_paths,
            config,
        }
    }
}

struct SendFunction(Function);

// wasm32只有一个线程
unsafe impl Send for SendFunction {}
unsafe impl Sync for SendFunction {}

impl SendFunction {
    fn call(&self, p: Point, e: Point) -> f32 {
        let args = js_sys::Array::of4(
            &JsValue::from(p.x as i32),
            &JsValue::from(p.y as i32),
            &JsValue::from(e.x as i32),
            &JsValue::from(e.y as i32),
        );
        self.0
            .apply(&JsValue::NULL, &args)
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(1.0) as f32
    }
}
