use euclid::default::Point2D;

/// Seam to the external 2D vector-graphics library that owns rendering and
/// path geometry. The sync client only ever talks to the scene through this
/// trait; the wasm crate binds it to the real library, tests use a fake.
pub trait StrokeScene {
    /// Handle to one renderable path living in the scene.
    type PathId: Copy + PartialEq;

    /// Creates an empty path rendered with the given color and width.
    fn begin_path(&mut self, color: &str, width: f32) -> Self::PathId;

    fn add_point(&mut self, path: &Self::PathId, point: Point2D<f32>);

    /// Thins the accumulated points into a smoother path and returns the
    /// remaining segment count.
    fn simplify(&mut self, path: &Self::PathId) -> usize;

    /// Points of the path as currently rendered (post-simplify, in order).
    fn path_points(&self, path: &Self::PathId) -> Vec<Point2D<f32>>;

    /// Detaches the path from the scene.
    fn remove_path(&mut self, path: &Self::PathId);

    /// First path whose rendered geometry passes within `tolerance` of the
    /// given point, if any.
    fn hit_test(&self, point: Point2D<f32>, tolerance: f32) -> Option<Self::PathId>;

    /// Removes every path from the scene.
    fn clear(&mut self);
}
