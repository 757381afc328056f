use euclid::default::Point2D;
use serde::{Deserialize, Serialize};

pub type SessionId = uuid::Uuid;
pub type UserId = String;

/// One continuous drawn line. Point order is drawing order and is never
/// reordered. There is no identifier field: a stroke is identified by
/// structural equality of its attributes, so two attribute-equal strokes are
/// indistinguishable to the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub points: Vec<Point2D<f32>>,
    pub color: String,
    pub width: f32,
    pub user: UserId,
}

impl Stroke {
    pub fn new(
        points: Vec<Point2D<f32>>,
        color: impl Into<String>,
        width: f32,
        user: impl Into<UserId>,
    ) -> Self {
        Self {
            points,
            color: color.into(),
            width,
            user: user.into(),
        }
    }
}
