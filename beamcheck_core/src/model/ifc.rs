//! # IFC Reader
//!
//! Maps the entity table of a parsed STEP file onto [`BuildingModel`] records.
//!
//! Only the parts of the IFC schema that carry beam dimensions are read:
//!
//! - the project length unit (`IFCUNITASSIGNMENT` / `IFCSIUNIT`)
//! - beam occurrences (`IFCBEAM`, `IFCBEAMSTANDARDCASE`) with name and tag
//! - material profile sets linked through `IFCRELASSOCIATESMATERIAL`
//! - body representations: extrusions, sectioned solids and mapped items
//! - beam types linked through `IFCRELDEFINESBYTYPE`
//!
//! Anything malformed degrades to "absent" or to
//! [`ProfileDescriptor::Unsupported`] rather than failing the whole read.

use std::collections::HashMap;

use log::{debug, warn};

use super::step::{Entity, Parameter, StepFile};
use super::{
    BuildingModel, MaterialAssociation, MaterialProfileSet, MemberKind, MemberTypeRecord,
    ProductRepresentation, ProfileDescriptor, RepresentationItem, ShapeRepresentation,
    StructuralMemberRecord,
};
use crate::units::{LengthUnit, UnitScale};

/// Occurrence entities read as beams
const BEAM_KEYWORDS: [&str; 2] = ["IFCBEAM", "IFCBEAMSTANDARDCASE"];

/// Nesting limit for composite profiles
const MAX_PROFILE_DEPTH: usize = 8;

/// Build the building model from a parsed file
pub fn read_model(file: &StepFile) -> BuildingModel {
    let unit_scale = unit_scale(file);
    let relations = Relations::collect(file);

    let members: Vec<StructuralMemberRecord> = file
        .iter()
        .filter(|(_, e)| BEAM_KEYWORDS.contains(&e.keyword.as_str()))
        .map(|(id, e)| beam_record(file, &relations, id, e))
        .collect();

    debug!(
        beams = members.len(),
        unit_scale = unit_scale.value();
        "Read IFC model"
    );

    BuildingModel::new(file.schema().map(str::to_string), unit_scale, members)
}

/// Millimeters per model length unit.
///
/// Taken from the first SI length unit of the first unit assignment; defaults
/// to meters when there is none or its prefix is not supported.
pub fn unit_scale(file: &StepFile) -> UnitScale {
    let Some((_, assignment)) = file.by_keyword("IFCUNITASSIGNMENT").next() else {
        debug!("No unit assignment, assuming meters");
        return UnitScale::default();
    };

    let units = assignment.list(0).unwrap_or_default();
    for unit in units.iter().filter_map(|p| file.resolve(p)) {
        if unit.enumeration(1) != Some("LENGTHUNIT") {
            continue;
        }
        if unit.keyword != "IFCSIUNIT" {
            debug!(keyword = unit.keyword.as_str(); "Skipping non-SI length unit");
            continue;
        }

        let prefix = unit.enumeration(2);
        return match LengthUnit::from_si_prefix(prefix) {
            Some(length_unit) => {
                debug!(unit = length_unit.symbol(); "Model length unit");
                UnitScale::from(length_unit)
            }
            None => {
                warn!(
                    prefix = prefix.unwrap_or_default();
                    "Unsupported length unit prefix, assuming meters"
                );
                UnitScale::default()
            }
        };
    }

    debug!("No SI length unit assigned, assuming meters");
    UnitScale::default()
}

// ============================================================================
// Relationships
// ============================================================================

/// Inverse lookups for the objectified relationships the reader follows
#[derive(Debug, Default)]
struct Relations {
    /// Object id -> relating material ids, in file order
    materials: HashMap<u64, Vec<u64>>,
    /// Object id -> relating type id (first wins)
    types: HashMap<u64, u64>,
}

impl Relations {
    fn collect(file: &StepFile) -> Self {
        let mut relations = Relations::default();

        for (_, rel) in file.by_keyword("IFCRELASSOCIATESMATERIAL") {
            let Some(material) = rel.reference(5) else {
                continue;
            };
            for object in related_objects(rel) {
                relations.materials.entry(object).or_default().push(material);
            }
        }

        for (_, rel) in file.by_keyword("IFCRELDEFINESBYTYPE") {
            let Some(member_type) = rel.reference(5) else {
                continue;
            };
            for object in related_objects(rel) {
                relations.types.entry(object).or_insert(member_type);
            }
        }

        relations
    }

    fn materials_of(&self, file: &StepFile, id: u64) -> Vec<MaterialAssociation> {
        self.materials
            .get(&id)
            .map(|ids| ids.iter().map(|m| material_association(file, *m)).collect())
            .unwrap_or_default()
    }
}

fn related_objects(rel: &Entity) -> impl Iterator<Item = u64> + '_ {
    rel.list(4)
        .unwrap_or_default()
        .iter()
        .filter_map(Parameter::as_reference)
}

// ============================================================================
// Members and types
// ============================================================================

fn beam_record(file: &StepFile, relations: &Relations, id: u64, beam: &Entity) -> StructuralMemberRecord {
    let global_id = beam
        .string(0)
        .map(str::to_string)
        .unwrap_or_else(|| format!("#{id}"));

    let member_type = relations
        .types
        .get(&id)
        .and_then(|type_id| type_record(file, relations, *type_id));

    let representation = beam
        .reference(6)
        .and_then(|r| product_representation(file, r));

    debug!(
        id,
        global_id = global_id.as_str(),
        typed = member_type.is_some();
        "Read beam"
    );

    StructuralMemberRecord {
        kind: MemberKind::Beam,
        global_id,
        name: beam.string(2).map(str::to_string),
        tag: beam.string(7).map(str::to_string),
        materials: relations.materials_of(file, id),
        representation,
        member_type,
    }
}

fn type_record(file: &StepFile, relations: &Relations, id: u64) -> Option<MemberTypeRecord> {
    let entity = file.get(id)?;

    // Type geometry lives in RepresentationMaps; each map contributes its
    // mapped representation.
    let representations: Vec<ShapeRepresentation> = entity
        .list(6)
        .unwrap_or_default()
        .iter()
        .filter_map(|p| file.resolve(p))
        .filter(|map| map.keyword == "IFCREPRESENTATIONMAP")
        .filter_map(|map| map.reference(1))
        .filter_map(|r| shape_representation(file, r, 0))
        .collect();

    Some(MemberTypeRecord {
        global_id: entity
            .string(0)
            .map(str::to_string)
            .unwrap_or_else(|| format!("#{id}")),
        name: entity.string(2).map(str::to_string),
        tag: entity.string(7).map(str::to_string),
        materials: relations.materials_of(file, id),
        representation: (!representations.is_empty())
            .then_some(ProductRepresentation { representations }),
    })
}

// ============================================================================
// Materials
// ============================================================================

fn material_association(file: &StepFile, id: u64) -> MaterialAssociation {
    let Some(entity) = file.get(id) else {
        return MaterialAssociation::Other;
    };

    match entity.keyword.as_str() {
        "IFCMATERIALPROFILESETUSAGE" | "IFCMATERIALPROFILESETUSAGETAPERING" => {
            let set = entity
                .reference(0)
                .and_then(|r| file.get(r))
                .filter(|set| set.keyword == "IFCMATERIALPROFILESET")
                .map(|set| profile_set(file, set));
            MaterialAssociation::ProfileSetUsage(set)
        }
        "IFCMATERIALPROFILESET" => MaterialAssociation::ProfileSet(profile_set(file, entity)),
        _ => MaterialAssociation::Other,
    }
}

fn profile_set(file: &StepFile, set: &Entity) -> MaterialProfileSet {
    let profiles = set
        .list(2)
        .unwrap_or_default()
        .iter()
        .map(|p| {
            file.resolve(p)
                .and_then(|material_profile| material_profile.reference(3))
                .map(|profile_id| profile(file, profile_id, 0))
        })
        .collect();

    MaterialProfileSet { profiles }
}

// ============================================================================
// Representations
// ============================================================================

fn product_representation(file: &StepFile, id: u64) -> Option<ProductRepresentation> {
    let shape = file.get(id)?;
    let representations = shape
        .list(2)?
        .iter()
        .filter_map(Parameter::as_reference)
        .filter_map(|r| shape_representation(file, r, 0))
        .collect();

    Some(ProductRepresentation { representations })
}

/// `depth` counts mapped-item indirections; a mapped item inside a mapped
/// representation is not followed.
fn shape_representation(file: &StepFile, id: u64, depth: usize) -> Option<ShapeRepresentation> {
    let entity = file.get(id)?;
    if !entity.keyword.ends_with("REPRESENTATION") {
        return None;
    }

    let items = entity
        .list(3)
        .unwrap_or_default()
        .iter()
        .filter_map(Parameter::as_reference)
        .map(|r| representation_item(file, r, depth))
        .collect();

    Some(ShapeRepresentation {
        identifier: entity.string(1).map(str::to_string),
        items,
    })
}

fn representation_item(file: &StepFile, id: u64, depth: usize) -> RepresentationItem {
    let Some(entity) = file.get(id) else {
        return RepresentationItem::Other;
    };

    match entity.keyword.as_str() {
        "IFCEXTRUDEDAREASOLID" | "IFCEXTRUDEDAREASOLIDTAPERED" => {
            RepresentationItem::ExtrudedAreaSolid {
                swept_area: entity.reference(0).map(|r| profile(file, r, 0)),
            }
        }
        "IFCSECTIONEDSOLIDHORIZONTAL" => RepresentationItem::SectionedSolid {
            cross_sections: entity
                .list(1)
                .unwrap_or_default()
                .iter()
                .filter_map(Parameter::as_reference)
                .map(|r| profile(file, r, 0))
                .collect(),
        },
        "IFCMAPPEDITEM" => {
            let mapped = (depth == 0)
                .then(|| entity.reference(0))
                .flatten()
                .and_then(|r| file.get(r))
                .and_then(|map| map.reference(1))
                .and_then(|r| shape_representation(file, r, depth + 1))
                .map(Box::new);
            RepresentationItem::MappedItem { mapped }
        }
        _ => RepresentationItem::Other,
    }
}

// ============================================================================
// Profiles
// ============================================================================

fn profile(file: &StepFile, id: u64, depth: usize) -> ProfileDescriptor {
    let Some(entity) = file.get(id) else {
        return ProfileDescriptor::Unsupported {
            kind: format!("#{id}"),
        };
    };

    if depth > MAX_PROFILE_DEPTH {
        warn!(id; "Composite profile nesting too deep");
        return unsupported(entity);
    }

    parametric_profile(file, entity, depth).unwrap_or_else(|| {
        debug!(id, keyword = entity.keyword.as_str(); "Profile not measurable");
        unsupported(entity)
    })
}

fn unsupported(entity: &Entity) -> ProfileDescriptor {
    ProfileDescriptor::Unsupported {
        kind: entity.keyword.clone(),
    }
}

/// Known profile types with all required attributes present
fn parametric_profile(file: &StepFile, e: &Entity, depth: usize) -> Option<ProfileDescriptor> {
    let profile = match e.keyword.as_str() {
        "IFCRECTANGLEPROFILEDEF"
        | "IFCRECTANGLEHOLLOWPROFILEDEF"
        | "IFCROUNDEDRECTANGLEPROFILEDEF" => ProfileDescriptor::Rectangle {
            width: e.real(3)?,
            height: e.real(4)?,
        },
        "IFCISHAPEPROFILEDEF" => ProfileDescriptor::IShape {
            overall_width: e.real(3)?,
            overall_depth: e.real(4)?,
        },
        "IFCASYMMETRICISHAPEPROFILEDEF" => {
            let bottom_flange = e.real(3)?;
            ProfileDescriptor::IShape {
                overall_width: e
                    .real(top_flange_width_index(file))
                    .map_or(bottom_flange, |top| top.max(bottom_flange)),
                overall_depth: e.real(4)?,
            }
        }
        "IFCTSHAPEPROFILEDEF" => ProfileDescriptor::TShape {
            depth: e.real(3)?,
            flange_width: e.real(4)?,
        },
        "IFCUSHAPEPROFILEDEF" => ProfileDescriptor::UShape {
            depth: e.real(3)?,
            flange_width: e.real(4)?,
        },
        "IFCLSHAPEPROFILEDEF" => ProfileDescriptor::LShape {
            depth: e.real(3)?,
            width: e.real(4)?,
        },
        "IFCCIRCLEPROFILEDEF" | "IFCCIRCLEHOLLOWPROFILEDEF" => ProfileDescriptor::Circle {
            radius: e.real(3)?,
        },
        "IFCELLIPSEPROFILEDEF" => ProfileDescriptor::Ellipse {
            semi_axis1: e.real(3)?,
            semi_axis2: e.real(4)?,
        },
        "IFCARBITRARYCLOSEDPROFILEDEF" | "IFCARBITRARYPROFILEDEFWITHVOIDS" => {
            ProfileDescriptor::ArbitraryClosed {
                points: curve_points(file, e.reference(2)?)?,
            }
        }
        "IFCCOMPOSITEPROFILEDEF" => ProfileDescriptor::Composite {
            profiles: e
                .list(2)?
                .iter()
                .filter_map(Parameter::as_reference)
                .map(|r| profile(file, r, depth + 1))
                .collect(),
        },
        _ => return None,
    };
    Some(profile)
}

/// `TopFlangeWidth` position; IFC4 inserts `BottomFlangeFilletRadius` before it
fn top_flange_width_index(file: &StepFile) -> usize {
    match file.schema() {
        Some(schema) if schema.eq_ignore_ascii_case("IFC2X3") => 8,
        _ => 9,
    }
}

/// 2D vertices of a polyline or indexed poly curve
fn curve_points(file: &StepFile, id: u64) -> Option<Vec<(f64, f64)>> {
    let curve = file.get(id)?;
    match curve.keyword.as_str() {
        "IFCPOLYLINE" => curve
            .list(0)?
            .iter()
            .map(|p| {
                let point = file.resolve(p)?;
                coordinate_pair(point.list(0)?)
            })
            .collect(),
        "IFCINDEXEDPOLYCURVE" => {
            let list = file.get(curve.reference(0)?)?;
            list.list(0)?
                .iter()
                .map(|p| coordinate_pair(p.as_list()?))
                .collect()
        }
        _ => None,
    }
}

fn coordinate_pair(coords: &[Parameter]) -> Option<(f64, f64)> {
    match coords {
        [x, y, ..] => Some((x.as_f64()?, y.as_f64()?)),
        _ => None,
    }
}
