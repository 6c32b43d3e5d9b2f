//! Geometrische Hilfstypen: Ausdehnung (Extent) und Bildschirm-Ränder (Insets).

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Achsenparallele Ausdehnung in Kartenkoordinaten.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    /// Minimale Ecke (x, y)
    pub min: DVec2,
    /// Maximale Ecke (x, y)
    pub max: DVec2,
}

impl Extent {
    /// Erstellt einen Extent aus zwei beliebigen Ecken.
    pub fn new(a: DVec2, b: DVec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Gibt `true` zurück, wenn alle Werte endlich sind und min ≤ max gilt.
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min.cmple(self.max).all()
    }

    /// Vereinigung zweier Extents.
    pub fn union(&self, other: &Extent) -> Extent {
        Extent {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Mittelpunkt der Ausdehnung.
    pub fn center(&self) -> DVec2 {
        (self.min + self.max) * 0.5
    }

    /// Breite und Höhe.
    pub fn size(&self) -> DVec2 {
        self.max - self.min
    }
}

/// Vereinigt eine Folge von Extents; `None` bei leerer Eingabe.
pub fn union_all<'a>(extents: impl IntoIterator<Item = &'a Extent>) -> Option<Extent> {
    extents
        .into_iter()
        .filter(|e| e.is_valid())
        .fold(None, |acc: Option<Extent>, e| {
            Some(match acc {
                Some(a) => a.union(e),
                None => *e,
            })
        })
}

/// Ränder in Screen-Pixeln (z.B. für verdeckende UI-Elemente).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Insets {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Insets {
    /// Gleiche Ränder auf allen Seiten.
    pub fn uniform(value: f64) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }
}

impl std::ops::Add for Insets {
    type Output = Insets;

    fn add(self, rhs: Insets) -> Insets {
        Insets {
            top: self.top + rhs.top,
            right: self.right + rhs.right,
            bottom: self.bottom + rhs.bottom,
            left: self.left + rhs.left,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn new_normalizes_corners() {
        let extent = Extent::new(DVec2::new(10.0, -5.0), DVec2::new(0.0, 5.0));
        assert_eq!(extent.min, DVec2::new(0.0, -5.0));
        assert_eq!(extent.max, DVec2::new(10.0, 5.0));
        assert!(extent.is_valid());
    }

    #[test]
    fn union_all_skips_invalid_extents() {
        let a = Extent::new(DVec2::ZERO, DVec2::ONE);
        let broken = Extent {
            min: DVec2::new(f64::NAN, 0.0),
            max: DVec2::ONE,
        };
        let b = Extent::new(DVec2::new(2.0, 2.0), DVec2::new(3.0, 4.0));

        let union = union_all([&a, &broken, &b]).expect("Vereinigung erwartet");

        assert_relative_eq!(union.min.x, 0.0);
        assert_relative_eq!(union.max.y, 4.0);
        assert_relative_eq!(union.center().x, 1.5);
        assert!(union_all(std::iter::empty()).is_none());
    }

    #[test]
    fn insets_add_per_side() {
        let sum = Insets::uniform(10.0)
            + Insets {
                top: 0.0,
                right: 0.0,
                bottom: 0.0,
                left: 250.0,
            };
        assert_eq!(sum.left, 260.0);
        assert_eq!(sum.top, 10.0);
    }
}
