//! Plain 2D vector and rectangle math for world coordinates. The y axis
//! points down and rectangles are anchored at their top-left corner.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, Sub};

/// A position or direction in world coordinates.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Vec2 { x, y }
    }

    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn distance(self, other: Vec2) -> f64 {
        (other - self).length()
    }

    pub fn distance_squared(self, other: Vec2) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    /// Unit vector in the same direction, or zero for the zero vector.
    pub fn normalized(self) -> Vec2 {
        let length = self.length();
        if length == 0.0 {
            Vec2::ZERO
        } else {
            Vec2::new(self.x / length, self.y / length)
        }
    }

    /// Rotates the vector by `angle` radians.
    pub fn rotated(self, angle: f64) -> Vec2 {
        let (sin, cos) = angle.sin_cos();
        Vec2::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// An axis-aligned rectangle.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Boundary points count as inside.
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    /// The rectangle shrunk by `inset` on every side. An inset larger than
    /// half the extent collapses that axis to the center instead of turning
    /// the rectangle inside out.
    pub fn shrunk(&self, inset: f64) -> Rect {
        let inset_x = inset.min(self.width / 2.0);
        let inset_y = inset.min(self.height / 2.0);
        Rect::new(
            self.x + inset_x,
            self.y + inset_y,
            self.width - 2.0 * inset_x,
            self.height - 2.0 * inset_y,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_and_distance() {
        let v = Vec2::new(3.0, 4.0);
        assert_eq!(v.length(), 5.0);
        assert_eq!(Vec2::ZERO.distance(v), 5.0);
        assert_eq!(Vec2::ZERO.distance_squared(v), 25.0);
    }

    #[test]
    fn normalizing_zero_stays_zero() {
        assert_eq!(Vec2::ZERO.normalized(), Vec2::ZERO);
        let unit = Vec2::new(0.0, -2.5).normalized();
        assert!((unit.length() - 1.0).abs() < 1e-12);
        assert_eq!(unit, Vec2::new(0.0, -1.0));
    }

    #[test]
    fn quarter_turn_rotation() {
        let rotated = Vec2::new(1.0, 0.0).rotated(std::f64::consts::FRAC_PI_2);
        assert!(rotated.x.abs() < 1e-12);
        assert!((rotated.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn rect_contains_its_boundary() {
        let rect = Rect::new(10.0, 10.0, 20.0, 5.0);
        assert!(rect.contains(Vec2::new(10.0, 10.0)));
        assert!(rect.contains(Vec2::new(30.0, 15.0)));
        assert!(!rect.contains(Vec2::new(30.1, 15.0)));
    }

    #[test]
    fn oversized_inset_collapses_to_center() {
        let rect = Rect::new(0.0, 0.0, 10.0, 4.0);
        let inner = rect.shrunk(100.0);
        assert_eq!(inner.width, 0.0);
        assert_eq!(inner.x, 5.0);
        assert_eq!(inner.y, 2.0);
    }

    #[test]
    fn modest_inset_shrinks_evenly() {
        let inner = Rect::new(950.0, 50.0, 200.0, 200.0).shrunk(10.0);
        assert_eq!(inner, Rect::new(960.0, 60.0, 180.0, 180.0));
    }
}
