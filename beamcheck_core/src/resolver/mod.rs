//! # Dimension Resolver
//!
//! Finds the cross-section width and height of a beam by trying each source
//! of dimensions in turn. The first strategy that produces a pair wins and no
//! strategy is retried:
//!
//! 1. Member profile: material profile set first, then the "Body"
//!    representation
//! 2. Type profile: type representation first, then type material
//! 3. Dimension text in member name, member tag, type name, type tag
//! 4. Unknown
//!
//! Profile extents are in model units and are scaled to millimeters; text
//! dimensions carry their own unit. Every resolved pair is sorted so that
//! width <= height.
//!
//! ## Example
//!
//! ```rust
//! use beamcheck_core::model::StructuralMemberRecord;
//! use beamcheck_core::resolver::{resolve, SourceTag};
//! use beamcheck_core::units::UnitScale;
//!
//! let mut beam = StructuralMemberRecord::beam("2O2Fr$t4X7Zf8NOew3FLOH");
//! beam.name = Some("Precast 600x300".to_string());
//!
//! let resolution = resolve(&beam, UnitScale::default());
//! let dims = resolution.dimensions.unwrap();
//! assert_eq!((dims.width_mm, dims.height_mm), (300.0, 600.0));
//! assert_eq!(resolution.source.label(), "name_parse");
//! ```

pub mod text;

use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::model::{
    MaterialAssociation, MaterialProfileSet, ProductRepresentation, ProfileDescriptor,
    RepresentationItem, StructuralMemberRecord,
};
use crate::units::UnitScale;

/// Where a member's dimensions came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum SourceTag {
    /// Member's own profile; `raw` is the scaled, unsorted (dx, dy)
    Profile { raw: (f64, f64) },
    /// Type object's profile; `raw` is the scaled, unsorted (dx, dy)
    TypeProfile { raw: (f64, f64) },
    /// Dimension text; `text` is the field that matched, `raw` the values
    /// in written order
    NameParse { text: String, raw: (f64, f64) },
    Unknown,
}

impl SourceTag {
    /// Stable label used in reports
    pub fn label(&self) -> &'static str {
        match self {
            SourceTag::Profile { .. } => "profile",
            SourceTag::TypeProfile { .. } => "type_profile",
            SourceTag::NameParse { .. } => "name_parse",
            SourceTag::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Cross-section dimensions in millimeters, `width_mm <= height_mm`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedDimensions {
    pub width_mm: f64,
    pub height_mm: f64,
}

impl ResolvedDimensions {
    /// Sort a raw pair into (width, height)
    pub fn from_pair((a, b): (f64, f64)) -> Self {
        let (width_mm, height_mm) = if a <= b { (a, b) } else { (b, a) };
        ResolvedDimensions {
            width_mm,
            height_mm,
        }
    }
}

/// Outcome of resolving one member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub dimensions: Option<ResolvedDimensions>,
    pub source: SourceTag,
}

impl Resolution {
    fn resolved(raw: (f64, f64), source: SourceTag) -> Self {
        Resolution {
            dimensions: Some(ResolvedDimensions::from_pair(raw)),
            source,
        }
    }

    fn unknown() -> Self {
        Resolution {
            dimensions: None,
            source: SourceTag::Unknown,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.dimensions.is_some()
    }
}

/// Resolve a member's cross-section dimensions
pub fn resolve(member: &StructuralMemberRecord, unit_scale: UnitScale) -> Resolution {
    let resolution = resolve_chain(member, unit_scale);
    debug!(
        global_id = member.global_id.as_str(),
        source = resolution.source.label();
        "Resolved member dimensions"
    );
    resolution
}

fn resolve_chain(member: &StructuralMemberRecord, unit_scale: UnitScale) -> Resolution {
    let member_profile = profile_from_materials(&member.materials)
        .or_else(|| profile_from_representation(member.representation.as_ref()));
    if let Some(raw) = scaled_extents(member_profile, unit_scale) {
        return Resolution::resolved(raw, SourceTag::Profile { raw });
    }

    let member_type = member.member_type.as_ref();
    if let Some(member_type) = member_type {
        let type_profile = profile_from_representation(member_type.representation.as_ref())
            .or_else(|| profile_from_materials(&member_type.materials));
        if let Some(raw) = scaled_extents(type_profile, unit_scale) {
            return Resolution::resolved(raw, SourceTag::TypeProfile { raw });
        }
    }

    let fields = [
        member.name.as_deref(),
        member.tag.as_deref(),
        member_type.and_then(|t| t.name.as_deref()),
        member_type.and_then(|t| t.tag.as_deref()),
    ];
    for field in fields.into_iter().flatten() {
        if let Some(raw) = text::parse_dimensions(field) {
            let source = SourceTag::NameParse {
                text: field.to_string(),
                raw,
            };
            return Resolution::resolved(raw, source);
        }
    }

    Resolution::unknown()
}

fn scaled_extents(profile: Option<&ProfileDescriptor>, unit_scale: UnitScale) -> Option<(f64, f64)> {
    profile?.extents().map(|pair| unit_scale.pair_to_mm(pair))
}

/// First profile with a shape across the profile-based material associations
pub fn profile_from_materials(materials: &[MaterialAssociation]) -> Option<&ProfileDescriptor> {
    materials
        .iter()
        .filter_map(MaterialAssociation::profile_set)
        .find_map(MaterialProfileSet::first_profile)
}

/// First profile found in the "Body" representations.
///
/// Extrusions give their swept area and sectioned solids their first cross
/// section; mapped items are followed one level, extrusions only.
pub fn profile_from_representation(
    representation: Option<&ProductRepresentation>,
) -> Option<&ProfileDescriptor> {
    representation?
        .representations
        .iter()
        .filter(|r| r.is_body())
        .flat_map(|r| &r.items)
        .find_map(item_profile)
}

fn item_profile(item: &RepresentationItem) -> Option<&ProfileDescriptor> {
    match item {
        RepresentationItem::ExtrudedAreaSolid { swept_area } => swept_area.as_ref(),
        RepresentationItem::SectionedSolid { cross_sections } => cross_sections.first(),
        RepresentationItem::MappedItem { mapped } => {
            mapped.as_ref()?.items.iter().find_map(|sub| match sub {
                RepresentationItem::ExtrudedAreaSolid { swept_area } => swept_area.as_ref(),
                _ => None,
            })
        }
        RepresentationItem::Other => None,
    }
}
