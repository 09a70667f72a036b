//! # Building Model
//!
//! Read-only records describing the structural members of a building model,
//! as produced by the IFC reader in [`ifc`] from a STEP file parsed by
//! [`step`].
//!
//! ## Structure
//!
//! ```text
//! BuildingModel
//! ├── schema: "IFC4" / "IFC2X3" / ...
//! ├── unit_scale: UnitScale (model length unit -> mm)
//! └── members: Vec<StructuralMemberRecord>
//!     ├── global_id, name, tag
//!     ├── materials: Vec<MaterialAssociation>
//!     ├── representation: Option<ProductRepresentation>
//!     └── member_type: Option<MemberTypeRecord> (same fields, no further type)
//! ```

pub mod ifc;
pub mod profile;
pub mod step;

use serde::{Deserialize, Serialize};

use crate::units::UnitScale;

pub use profile::ProfileDescriptor;

/// Kind of structural member a record was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemberKind {
    Beam,
}

/// Ordered material profiles of a profile set
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MaterialProfileSet {
    /// One entry per material profile; `None` where the profile is not set
    pub profiles: Vec<Option<ProfileDescriptor>>,
}

impl MaterialProfileSet {
    /// First material profile that carries a shape
    pub fn first_profile(&self) -> Option<&ProfileDescriptor> {
        self.profiles.iter().flatten().next()
    }
}

/// A material linked to a member or type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MaterialAssociation {
    /// Profile set usage; the referenced set may be missing
    ProfileSetUsage(Option<MaterialProfileSet>),
    /// Profile set linked directly
    ProfileSet(MaterialProfileSet),
    /// Any other material definition (layers, constituents, plain material)
    Other,
}

impl MaterialAssociation {
    /// The profile set behind this association, if it is profile-based
    pub fn profile_set(&self) -> Option<&MaterialProfileSet> {
        match self {
            MaterialAssociation::ProfileSetUsage(set) => set.as_ref(),
            MaterialAssociation::ProfileSet(set) => Some(set),
            MaterialAssociation::Other => None,
        }
    }
}

/// One geometric item of a shape representation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RepresentationItem {
    /// Profile swept along a straight direction
    ExtrudedAreaSolid { swept_area: Option<ProfileDescriptor> },
    /// Solid lofted through cross-sections placed along a curve
    SectionedSolid { cross_sections: Vec<ProfileDescriptor> },
    /// Instance of a shared representation
    MappedItem { mapped: Option<Box<ShapeRepresentation>> },
    /// Any other geometry (BREP, clipping results, ...)
    Other,
}

/// A named view of a product's geometry ("Body", "Axis", ...)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ShapeRepresentation {
    pub identifier: Option<String>,
    pub items: Vec<RepresentationItem>,
}

impl ShapeRepresentation {
    /// Whether this is the 3D body view
    pub fn is_body(&self) -> bool {
        self.identifier.as_deref() == Some("Body")
    }
}

/// All shape representations of a product
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProductRepresentation {
    pub representations: Vec<ShapeRepresentation>,
}

/// Type object a member is defined by
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MemberTypeRecord {
    pub global_id: String,
    pub name: Option<String>,
    pub tag: Option<String>,
    pub materials: Vec<MaterialAssociation>,
    pub representation: Option<ProductRepresentation>,
}

/// A structural member occurrence (one beam)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuralMemberRecord {
    pub kind: MemberKind,
    pub global_id: String,
    pub name: Option<String>,
    pub tag: Option<String>,
    pub materials: Vec<MaterialAssociation>,
    pub representation: Option<ProductRepresentation>,
    pub member_type: Option<MemberTypeRecord>,
}

impl StructuralMemberRecord {
    /// Create a beam record with only an identifier set
    pub fn beam(global_id: impl Into<String>) -> Self {
        StructuralMemberRecord {
            kind: MemberKind::Beam,
            global_id: global_id.into(),
            name: None,
            tag: None,
            materials: Vec::new(),
            representation: None,
            member_type: None,
        }
    }
}

/// A loaded building model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingModel {
    schema: Option<String>,
    unit_scale: UnitScale,
    members: Vec<StructuralMemberRecord>,
}

impl BuildingModel {
    pub fn new(
        schema: Option<String>,
        unit_scale: UnitScale,
        members: Vec<StructuralMemberRecord>,
    ) -> Self {
        BuildingModel {
            schema,
            unit_scale,
            members,
        }
    }

    /// Schema identifier from the file header (e.g. "IFC4")
    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    /// Factor converting model lengths to millimeters
    pub fn unit_scale(&self) -> UnitScale {
        self.unit_scale
    }

    /// Members of one kind, in file order
    pub fn members_of_kind(&self, kind: MemberKind) -> impl Iterator<Item = &StructuralMemberRecord> {
        self.members.iter().filter(move |m| m.kind == kind)
    }
}
