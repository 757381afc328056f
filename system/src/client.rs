use euclid::default::Point2D;
use serde::Serialize;

use crate::message::SyncMessage;
use crate::traits::StrokeScene;
use crate::types::{Stroke, UserId};

/// Hit-test distance for the eraser, in canvas units.
pub const ERASE_TOLERANCE: f32 = 5.0;

/// How long to wait after a pushed delete signal before pulling a fresh
/// snapshot, so the originator's durable mutation has landed.
pub const REFRESH_DELAY_MS: u64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToolMode {
    Draw,
    Erase,
}

/// Network side effect for the shell to execute. The session owns no sockets
/// and performs no I/O itself; it hands these out and the shell feeds results
/// back through `handle_message` / `apply_snapshot`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SyncEffect {
    /// Send the stroke over the socket and POST it to the draw endpoint.
    Submit(Stroke),
    /// Issue an HTTP delete for this exact structural match.
    DeleteStroke(Stroke),
    /// Issue an HTTP delete for every stroke owned by this user, then apply
    /// the response body as a snapshot.
    ClearOwn { user: UserId },
    /// Wait, then fetch a full snapshot and apply it.
    RefreshAfter { delay_ms: u64 },
}

enum Gesture<Id> {
    Idle,
    Drawing { path: Id },
    Erasing,
}

struct LocalStroke<Id> {
    path: Id,
    stroke: Stroke,
}

/// Browser-side sync client: the local stroke list plus the pointer gesture
/// state machine. Keeps the local view approximately consistent with the
/// store: locally drawn strokes are submitted, pushed strokes appended, and
/// pushed delete signals answered with a delayed full resynchronization.
pub struct CanvasSession<S: StrokeScene> {
    scene: S,
    strokes: Vec<LocalStroke<S::PathId>>,
    gesture: Gesture<S::PathId>,
    mode: ToolMode,
    color: String,
    width: f32,
    user: UserId,
}

impl<S: StrokeScene> CanvasSession<S> {
    pub fn new(scene: S, user: impl Into<UserId>) -> Self {
        Self {
            scene,
            strokes: Vec::new(),
            gesture: Gesture::Idle,
            mode: ToolMode::Draw,
            color: "#000000".to_string(),
            width: 2.0,
            user: user.into(),
        }
    }

    pub fn set_mode(&mut self, mode: ToolMode) {
        self.mode = mode;
    }

    pub fn set_color(&mut self, color: impl Into<String>) {
        self.color = color.into();
    }

    pub fn set_width(&mut self, width: f32) {
        self.width = width;
    }

    pub fn stroke_count(&self) -> usize {
        self.strokes.len()
    }

    pub fn pointer_down(&mut self, point: Point2D<f32>) {
        if let Gesture::Idle = self.gesture {
            match self.mode {
                ToolMode::Draw => {
                    let path = self.scene.begin_path(&self.color, self.width);
                    self.scene.add_point(&path, point);
                    self.gesture = Gesture::Drawing { path };
                }
                ToolMode::Erase => {
                    self.gesture = Gesture::Erasing;
                }
            }
        }
    }

    pub fn pointer_move(&mut self, point: Point2D<f32>) -> Option<SyncEffect> {
        match self.gesture {
            Gesture::Drawing { path } => {
                self.scene.add_point(&path, point);
                None
            }
            Gesture::Erasing => self.erase_at(point),
            Gesture::Idle => None,
        }
    }

    pub fn pointer_up(&mut self) -> Option<SyncEffect> {
        match std::mem::replace(&mut self.gesture, Gesture::Idle) {
            Gesture::Drawing { path } => {
                if self.scene.simplify(&path) <= 1 {
                    // A click with no drag; nothing worth keeping.
                    self.scene.remove_path(&path);
                    return None;
                }
                let stroke = Stroke::new(
                    self.scene.path_points(&path),
                    self.color.clone(),
                    self.width,
                    self.user.clone(),
                );
                self.strokes.push(LocalStroke {
                    path,
                    stroke: stroke.clone(),
                });
                Some(SyncEffect::Submit(stroke))
            }
            _ => None,
        }
    }

    /// Removes the first stroke whose rendered geometry passes within the
    /// erase tolerance of the pointer, locally and (via the returned effect)
    /// from the store. Erasing an already-gone stroke is a store no-op, so
    /// rapid pointer movement issuing several deletes is harmless.
    fn erase_at(&mut self, point: Point2D<f32>) -> Option<SyncEffect> {
        let hit = self.scene.hit_test(point, ERASE_TOLERANCE)?;
        let index = self.strokes.iter().position(|s| s.path == hit)?;
        let local = self.strokes.remove(index);
        self.scene.remove_path(&local.path);
        Some(SyncEffect::DeleteStroke(local.stroke))
    }

    /// Handles one frame pushed over the socket.
    pub fn handle_message(&mut self, message: SyncMessage) -> Option<SyncEffect> {
        match message {
            SyncMessage::NewStroke(stroke) => {
                // Append-only: a pushed stroke never triggers a hit-test or
                // removal.
                self.insert_stroke(stroke);
                None
            }
            SyncMessage::Delete => {
                log::debug!("delete signal received, scheduling refresh");
                Some(SyncEffect::RefreshAfter {
                    delay_ms: REFRESH_DELAY_MS,
                })
            }
        }
    }

    /// Replaces the entire local view with a freshly fetched snapshot. This
    /// is the only path by which a peer's deletions become visible locally.
    pub fn apply_snapshot(&mut self, strokes: Vec<Stroke>) {
        self.scene.clear();
        self.strokes.clear();
        for stroke in strokes {
            self.insert_stroke(stroke);
        }
    }

    /// Starts the clear-all flow; the shell issues the HTTP delete and feeds
    /// the response body back through `apply_snapshot`. The live delete
    /// signal to peers is fired by the server on that HTTP call.
    pub fn clear_own(&self) -> SyncEffect {
        SyncEffect::ClearOwn {
            user: self.user.clone(),
        }
    }

    /// Rebuilds a wire stroke as a fresh renderable path in the scene.
    fn insert_stroke(&mut self, stroke: Stroke) {
        let path = self.scene.begin_path(&stroke.color, stroke.width);
        for point in &stroke.points {
            self.scene.add_point(&path, *point);
        }
        self.strokes.push(LocalStroke { path, stroke });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct FakePath {
        color: String,
        width: f32,
        points: Vec<Point2D<f32>>,
    }

    /// Scene fake: no rendering, straight-line hit-testing against stored
    /// points, simplify keeps every other point plus the endpoints.
    #[derive(Default)]
    struct FakeScene {
        paths: HashMap<u32, FakePath>,
        next_id: u32,
    }

    impl StrokeScene for FakeScene {
        type PathId = u32;

        fn begin_path(&mut self, color: &str, width: f32) -> u32 {
            let id = self.next_id;
            self.next_id += 1;
            self.paths.insert(
                id,
                FakePath {
                    color: color.to_string(),
                    width,
                    points: Vec::new(),
                },
            );
            id
        }

        fn add_point(&mut self, path: &u32, point: Point2D<f32>) {
            self.paths.get_mut(path).unwrap().points.push(point);
        }

        fn simplify(&mut self, path: &u32) -> usize {
            let points = &mut self.paths.get_mut(path).unwrap().points;
            if points.len() > 2 {
                let last = *points.last().unwrap();
                let mut index = 0;
                points.retain(|_| {
                    index += 1;
                    index % 2 == 1
                });
                if *points.last().unwrap() != last {
                    points.push(last);
                }
            }
            points.len()
        }

        fn path_points(&self, path: &u32) -> Vec<Point2D<f32>> {
            self.paths[path].points.clone()
        }

        fn remove_path(&mut self, path: &u32) {
            self.paths.remove(path);
        }

        fn hit_test(&self, point: Point2D<f32>, tolerance: f32) -> Option<u32> {
            let mut ids: Vec<_> = self.paths.keys().copied().collect();
            ids.sort();
            ids.into_iter().find(|id| {
                self.paths[id]
                    .points
                    .iter()
                    .any(|p| (*p - point).length() <= tolerance)
            })
        }

        fn clear(&mut self) {
            self.paths.clear();
        }
    }

    fn session() -> CanvasSession<FakeScene> {
        CanvasSession::new(FakeScene::default(), "alice")
    }

    fn draw(session: &mut CanvasSession<FakeScene>, points: &[(f32, f32)]) -> Option<SyncEffect> {
        let mut points = points.iter().map(|&(x, y)| Point2D::new(x, y));
        session.pointer_down(points.next().unwrap());
        for point in points {
            session.pointer_move(point);
        }
        session.pointer_up()
    }

    #[test]
    fn it_submits_a_finished_stroke() {
        let mut session = session();
        session.set_color("#ff0000");

        let effect = draw(&mut session, &[(0.0, 0.0), (10.0, 10.0)]);
        match effect {
            Some(SyncEffect::Submit(stroke)) => {
                assert_eq!(stroke.points, vec![Point2D::new(0.0, 0.0), Point2D::new(10.0, 10.0)]);
                assert_eq!(stroke.color, "#ff0000");
                assert_eq!(stroke.user, "alice");
            }
            other => panic!("unexpected effect: {:?}", other),
        }
        assert_eq!(session.stroke_count(), 1);
    }

    #[test]
    fn it_discards_a_stroke_that_simplifies_to_a_click() {
        let mut session = session();

        assert_eq!(draw(&mut session, &[(3.0, 3.0)]), None);
        assert_eq!(session.stroke_count(), 0);
        assert!(session.scene.paths.is_empty());
    }

    #[test]
    fn it_submits_the_simplified_points() {
        let mut session = session();

        let effect = draw(
            &mut session,
            &[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (3.0, 3.0), (4.0, 4.0)],
        );
        match effect {
            Some(SyncEffect::Submit(stroke)) => {
                assert_eq!(
                    stroke.points,
                    vec![Point2D::new(0.0, 0.0), Point2D::new(2.0, 2.0), Point2D::new(4.0, 4.0)]
                );
            }
            other => panic!("unexpected effect: {:?}", other),
        }
    }

    #[test]
    fn it_erases_exactly_the_hit_stroke() {
        let mut session = session();
        draw(&mut session, &[(0.0, 0.0), (10.0, 10.0)]);
        let submitted = match draw(&mut session, &[(50.0, 50.0), (60.0, 50.0)]) {
            Some(SyncEffect::Submit(stroke)) => stroke,
            other => panic!("unexpected effect: {:?}", other),
        };

        session.set_mode(ToolMode::Erase);
        session.pointer_down(Point2D::new(52.0, 48.0));
        let effect = session.pointer_move(Point2D::new(52.0, 48.0));

        assert_eq!(effect, Some(SyncEffect::DeleteStroke(submitted)));
        assert_eq!(session.stroke_count(), 1);

        // Same spot again: nothing left within tolerance, no second request.
        assert_eq!(session.pointer_move(Point2D::new(52.0, 48.0)), None);
        session.pointer_up();
    }

    #[test]
    fn it_appends_pushed_strokes_without_hit_testing() {
        let mut session = session();
        let stroke = Stroke::new(
            vec![Point2D::new(0.0, 0.0), Point2D::new(10.0, 10.0)],
            "#00ff00",
            2.0,
            "bob",
        );

        assert_eq!(session.handle_message(SyncMessage::NewStroke(stroke)), None);
        assert_eq!(session.stroke_count(), 1);

        // The renderable path is reconstructed fresh with the pushed
        // attributes.
        let rebuilt = session.scene.paths.values().next().unwrap();
        assert_eq!(rebuilt.color, "#00ff00");
        assert_eq!(rebuilt.width, 2.0);
        assert_eq!(rebuilt.points.len(), 2);
    }

    #[test]
    fn it_schedules_a_delayed_refresh_on_a_pushed_delete() {
        let mut session = session();
        assert_eq!(
            session.handle_message(SyncMessage::Delete),
            Some(SyncEffect::RefreshAfter { delay_ms: 1000 })
        );
    }

    #[test]
    fn it_replaces_the_local_view_on_snapshot() {
        let mut session = session();
        draw(&mut session, &[(0.0, 0.0), (10.0, 10.0)]);

        let snapshot = vec![
            Stroke::new(vec![Point2D::new(1.0, 1.0), Point2D::new(2.0, 2.0)], "#0000ff", 4.0, "bob"),
        ];
        session.apply_snapshot(snapshot.clone());
        assert_eq!(session.stroke_count(), 1);

        // Applying the same snapshot twice must not duplicate strokes.
        session.apply_snapshot(snapshot);
        assert_eq!(session.stroke_count(), 1);
        assert_eq!(session.scene.paths.len(), 1);
    }

    #[test]
    fn it_emits_a_clear_request_for_its_own_user() {
        let session = session();
        assert_eq!(
            session.clear_own(),
            SyncEffect::ClearOwn {
                user: "alice".to_string()
            }
        );
    }
}
