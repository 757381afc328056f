mod utils;

use scribble_system::euclid::default::Point2D;
use scribble_system::{serde_json, CanvasSession, Stroke, StrokeScene, SyncMessage, ToolMode};
use wasm_bindgen::prelude::*;

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen]
extern "C" {
    /// Shim the JS shell builds over the vector-graphics library; path ids
    /// are plain numbers on the JS side.
    pub type Scene;

    #[wasm_bindgen(method, js_name = beginPath)]
    fn begin_path(this: &Scene, color: &str, width: f32) -> u32;

    #[wasm_bindgen(method, js_name = addPoint)]
    fn add_point(this: &Scene, path: u32, x: f32, y: f32);

    #[wasm_bindgen(method)]
    fn simplify(this: &Scene, path: u32) -> u32;

    /// Flattened as [x0, y0, x1, y1, ...].
    #[wasm_bindgen(method, js_name = pathPoints)]
    fn path_points(this: &Scene, path: u32) -> Box<[f32]>;

    #[wasm_bindgen(method, js_name = removePath)]
    fn remove_path(this: &Scene, path: u32);

    #[wasm_bindgen(method, js_name = hitTest)]
    fn hit_test(this: &Scene, x: f32, y: f32, tolerance: f32) -> Option<u32>;

    #[wasm_bindgen(method)]
    fn clear(this: &Scene);
}

struct SceneBridge(Scene);

impl StrokeScene for SceneBridge {
    type PathId = u32;

    fn begin_path(&mut self, color: &str, width: f32) -> u32 {
        self.0.begin_path(color, width)
    }

    fn add_point(&mut self, path: &u32, point: Point2D<f32>) {
        self.0.add_point(*path, point.x, point.y);
    }

    fn simplify(&mut self, path: &u32) -> usize {
        self.0.simplify(*path) as usize
    }

    fn path_points(&self, path: &u32) -> Vec<Point2D<f32>> {
        self.0
            .path_points(*path)
            .chunks(2)
            .map(|pair| Point2D::new(pair[0], pair[1]))
            .collect()
    }

    fn remove_path(&mut self, path: &u32) {
        self.0.remove_path(*path);
    }

    fn hit_test(&self, point: Point2D<f32>, tolerance: f32) -> Option<u32> {
        self.0.hit_test(point.x, point.y, tolerance)
    }

    fn clear(&mut self) {
        self.0.clear();
    }
}

/// The sync client, exported to the JS shell. Effects come back as JSON
/// strings; passing plain JSON across the boundary keeps the JS side free of
/// manual memory management.
#[wasm_bindgen]
pub struct SyncSession {
    session: CanvasSession<SceneBridge>,
}

#[wasm_bindgen]
impl SyncSession {
    #[wasm_bindgen(constructor)]
    pub fn new(scene: Scene, user: String) -> Self {
        utils::set_panic_hook();

        Self {
            session: CanvasSession::new(SceneBridge(scene), user),
        }
    }

    pub fn set_draw_mode(&mut self) {
        self.session.set_mode(ToolMode::Draw);
    }

    pub fn set_erase_mode(&mut self) {
        self.session.set_mode(ToolMode::Erase);
    }

    pub fn set_color(&mut self, color: String) {
        self.session.set_color(color);
    }

    pub fn set_width(&mut self, width: f32) {
        self.session.set_width(width);
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.session.pointer_down(Point2D::new(x, y));
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) -> Option<String> {
        let effect = self.session.pointer_move(Point2D::new(x, y))?;
        Some(serde_json::to_string(&effect).expect("must succeed"))
    }

    pub fn pointer_up(&mut self) -> Option<String> {
        let effect = self.session.pointer_up()?;
        Some(serde_json::to_string(&effect).expect("must succeed"))
    }

    pub fn handle_socket_message(&mut self, text: String) -> Option<String> {
        match SyncMessage::decode(&text) {
            Ok(message) => {
                let effect = self.session.handle_message(message)?;
                Some(serde_json::to_string(&effect).expect("must succeed"))
            }
            Err(err) => {
                log::warn!("ignoring malformed frame: {}", err);
                None
            }
        }
    }

    pub fn apply_snapshot(&mut self, json: String) {
        match serde_json::from_str::<Vec<Stroke>>(&json) {
            Ok(strokes) => self.session.apply_snapshot(strokes),
            Err(err) => log::warn!("ignoring malformed snapshot: {}", err),
        }
    }

    pub fn clear_own(&self) -> String {
        serde_json::to_string(&self.session.clear_own()).expect("must succeed")
    }

    pub fn stroke_count(&self) -> usize {
        self.session.stroke_count()
    }
}
