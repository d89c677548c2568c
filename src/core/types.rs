//! Core type definitions used throughout the codebase

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Unique identifier for universe objects
#[derive(
    Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ObjectId(pub i32);

impl ObjectId {
    /// Sentinel for "no object"
    pub const INVALID: ObjectId = ObjectId(-1);

    pub fn new(id: i32) -> Self {
        Self(id)
    }

    pub fn is_valid(&self) -> bool {
        self.0 >= 0
    }
}

/// Empire identifier
#[derive(
    Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct EmpireId(pub i32);

impl EmpireId {
    /// Sentinel meaning "every empire" (or none in particular)
    pub const ALL: EmpireId = EmpireId(-1);

    pub fn new(id: i32) -> Self {
        Self(id)
    }
}

/// Ship design identifier
#[derive(
    Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct DesignId(pub i32);

impl DesignId {
    pub const INVALID: DesignId = DesignId(-1);

    pub fn new(id: i32) -> Self {
        Self(id)
    }

    pub fn is_valid(&self) -> bool {
        self.0 >= 0
    }
}

/// Game turn counter
pub type Turn = i32;

/// 2D galaxy position
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared euclidean distance; callers compare against squared thresholds
    pub fn distance_squared(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_id_validity() {
        assert!(ObjectId(0).is_valid());
        assert!(ObjectId::new(42).is_valid());
        assert!(!ObjectId::INVALID.is_valid());
    }

    #[test]
    fn test_object_id_hash() {
        use std::collections::HashMap;
        let mut map: HashMap<ObjectId, &str> = HashMap::new();
        map.insert(ObjectId(7), "planet");
        assert_eq!(map.get(&ObjectId(7)), Some(&"planet"));
    }

    #[test]
    fn test_id_display() {
        assert_eq!(ObjectId(12).to_string(), "12");
        assert_eq!(EmpireId::ALL.to_string(), "-1");
    }

    #[test]
    fn test_distance_squared() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(3.0, 4.0);
        assert_eq!(a.distance_squared(&b), 25.0);
        assert_eq!(b.distance_squared(&a), 25.0);
    }
}
