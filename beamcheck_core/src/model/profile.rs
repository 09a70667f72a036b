//! # Profile Descriptors
//!
//! Closed set of 2D cross-section shapes a beam profile can be described by,
//! with one bounding-extent formula per shape.
//!
//! ## Example
//!
//! ```rust
//! use beamcheck_core::model::ProfileDescriptor;
//!
//! let rect = ProfileDescriptor::Rectangle { width: 0.3, height: 0.6 };
//! assert_eq!(rect.extents(), Some((0.3, 0.6)));
//!
//! let circle = ProfileDescriptor::Circle { radius: 0.2 };
//! assert_eq!(circle.extents(), Some((0.4, 0.4)));
//! ```

use serde::{Deserialize, Serialize};

/// A cross-section shape in model units.
///
/// Field names follow the IFC parameterized profile attributes they are read
/// from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape")]
pub enum ProfileDescriptor {
    Rectangle {
        width: f64,
        height: f64,
    },
    IShape {
        overall_width: f64,
        overall_depth: f64,
    },
    TShape {
        flange_width: f64,
        depth: f64,
    },
    UShape {
        flange_width: f64,
        depth: f64,
    },
    LShape {
        width: f64,
        depth: f64,
    },
    Circle {
        radius: f64,
    },
    Ellipse {
        semi_axis1: f64,
        semi_axis2: f64,
    },
    /// Closed outline given as an ordered point list
    ArbitraryClosed {
        points: Vec<(f64, f64)>,
    },
    /// Several profiles combined; only the first one is measured
    Composite {
        profiles: Vec<ProfileDescriptor>,
    },
    /// A profile type the reader does not map, or one with malformed data
    Unsupported {
        kind: String,
    },
}

impl ProfileDescriptor {
    /// Raw (dx, dy) extents in model units, or `None` when the shape cannot be
    /// measured.
    ///
    /// Arbitrary outlines are measured by their axis-aligned bounding box.
    /// Composite profiles are measured by their first sub-profile only.
    pub fn extents(&self) -> Option<(f64, f64)> {
        let (dx, dy) = match self {
            ProfileDescriptor::Rectangle { width, height } => (*width, *height),
            ProfileDescriptor::IShape {
                overall_width,
                overall_depth,
            } => (*overall_width, *overall_depth),
            ProfileDescriptor::TShape {
                flange_width,
                depth,
            }
            | ProfileDescriptor::UShape {
                flange_width,
                depth,
            } => (*flange_width, *depth),
            ProfileDescriptor::LShape { width, depth } => (*width, *depth),
            ProfileDescriptor::Circle { radius } => (2.0 * radius, 2.0 * radius),
            ProfileDescriptor::Ellipse {
                semi_axis1,
                semi_axis2,
            } => (2.0 * semi_axis1, 2.0 * semi_axis2),
            ProfileDescriptor::ArbitraryClosed { points } => bounding_box(points)?,
            ProfileDescriptor::Composite { profiles } => profiles.first()?.extents()?,
            ProfileDescriptor::Unsupported { .. } => return None,
        };

        let usable = |v: f64| v.is_finite() && v > 0.0;
        (usable(dx) && usable(dy)).then_some((dx, dy))
    }

    /// Short shape name for logs
    pub fn kind(&self) -> &str {
        match self {
            ProfileDescriptor::Rectangle { .. } => "Rectangle",
            ProfileDescriptor::IShape { .. } => "IShape",
            ProfileDescriptor::TShape { .. } => "TShape",
            ProfileDescriptor::UShape { .. } => "UShape",
            ProfileDescriptor::LShape { .. } => "LShape",
            ProfileDescriptor::Circle { .. } => "Circle",
            ProfileDescriptor::Ellipse { .. } => "Ellipse",
            ProfileDescriptor::ArbitraryClosed { .. } => "ArbitraryClosed",
            ProfileDescriptor::Composite { .. } => "Composite",
            ProfileDescriptor::Unsupported { kind } => kind,
        }
    }
}

/// Axis-aligned extent (max − min per axis) of a point list
fn bounding_box(points: &[(f64, f64)]) -> Option<(f64, f64)> {
    let (first, rest) = points.split_first()?;
    let init = (first.0, first.0, first.1, first.1);
    let (min_x, max_x, min_y, max_y) = rest.iter().fold(init, |(x0, x1, y0, y1), &(x, y)| {
        (x0.min(x), x1.max(x), y0.min(y), y1.max(y))
    });
    Some((max_x - min_x, max_y - min_y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parametric_shapes() {
        let i = ProfileDescriptor::IShape {
            overall_width: 200.0,
            overall_depth: 400.0,
        };
        assert_eq!(i.extents(), Some((200.0, 400.0)));

        let t = ProfileDescriptor::TShape {
            flange_width: 800.0,
            depth: 500.0,
        };
        assert_eq!(t.extents(), Some((800.0, 500.0)));

        let l = ProfileDescriptor::LShape {
            width: 100.0,
            depth: 150.0,
        };
        assert_eq!(l.extents(), Some((100.0, 150.0)));

        let e = ProfileDescriptor::Ellipse {
            semi_axis1: 150.0,
            semi_axis2: 300.0,
        };
        assert_eq!(e.extents(), Some((300.0, 600.0)));
    }

    #[test]
    fn test_arbitrary_bounding_box() {
        let outline = ProfileDescriptor::ArbitraryClosed {
            points: vec![
                (-150.0, -300.0),
                (150.0, -300.0),
                (150.0, 300.0),
                (-150.0, 300.0),
                (-150.0, -300.0),
            ],
        };
        assert_eq!(outline.extents(), Some((300.0, 600.0)));
    }

    #[test]
    fn test_empty_outline_fails() {
        let outline = ProfileDescriptor::ArbitraryClosed { points: vec![] };
        assert_eq!(outline.extents(), None);
    }

    #[test]
    fn test_composite_uses_first_profile_only() {
        let composite = ProfileDescriptor::Composite {
            profiles: vec![
                ProfileDescriptor::Rectangle {
                    width: 250.0,
                    height: 500.0,
                },
                ProfileDescriptor::Rectangle {
                    width: 1000.0,
                    height: 1000.0,
                },
            ],
        };
        assert_eq!(composite.extents(), Some((250.0, 500.0)));

        let empty = ProfileDescriptor::Composite { profiles: vec![] };
        assert_eq!(empty.extents(), None);
    }

    #[test]
    fn test_unsupported_and_degenerate_fail() {
        let unsupported = ProfileDescriptor::Unsupported {
            kind: "IFCZSHAPEPROFILEDEF".to_string(),
        };
        assert_eq!(unsupported.extents(), None);
        assert_eq!(unsupported.kind(), "IFCZSHAPEPROFILEDEF");

        let flat = ProfileDescriptor::Rectangle {
            width: 0.0,
            height: 600.0,
        };
        assert_eq!(flat.extents(), None);

        let nan = ProfileDescriptor::Circle { radius: f64::NAN };
        assert_eq!(nan.extents(), None);
    }
}
