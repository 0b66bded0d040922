//! Absorption-catalog upgrade search

use std::cmp::Ordering;

use crate::config::defaults::UNKNOWN_CATEGORY;
use crate::config::{MaterialCatalog, MaterialCategory};
use crate::types::{FeatureVector, MaterialCandidate};

/// Best strictly-better material in `category` for `current`.
///
/// `current` resolves to the first catalog name it contains, ignoring case.
/// An unresolved material gets no suggestion. Among candidates with a
/// strictly higher coefficient the highest wins; equal coefficients go to
/// the name that sorts last.
pub fn recommend_upgrade(
    category: MaterialCategory,
    current: &str,
    catalog: &MaterialCatalog,
) -> Option<MaterialCandidate> {
    let resolved = catalog.containing(category, current)?;
    let baseline = resolved.absorption;

    let best = catalog
        .category(category)
        .iter()
        .filter(|c| c.absorption > baseline)
        .max_by(|a, b| {
            a.absorption
                .partial_cmp(&b.absorption)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.name.cmp(&b.name))
        })
        .cloned();

    tracing::debug!(
        %category,
        current,
        resolved = %resolved.name,
        baseline,
        upgrade = best.as_ref().map(|c| c.name.as_str()),
        "Upgrade search"
    );
    best
}

/// Copy of `vector` with the wall finish swapped for `upgrade`.
///
/// The element description is rewritten where it names the old wall; an
/// "Unknown" description becomes `Wall: <upgrade>`.
pub fn apply_wall_upgrade(vector: &FeatureVector, upgrade: &MaterialCandidate) -> FeatureVector {
    let mut upgraded = vector.clone();
    let new_name = upgrade.name.as_str();

    upgraded.element_materials = match vector.wall_material.as_deref() {
        Some(old) if !old.is_empty() && vector.element_materials.contains(old) => {
            vector.element_materials.replace(old, new_name)
        }
        _ if vector.element_materials == UNKNOWN_CATEGORY => format!("Wall: {new_name}"),
        _ => vector.element_materials.clone(),
    };
    upgraded.wall_material = Some(upgrade.name.clone());
    upgraded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ApartmentType, DayNight};

    #[test]
    fn test_gypsum_upgrades_to_fiberglass() {
        let catalog = MaterialCatalog::default();
        let upgrade = recommend_upgrade(MaterialCategory::Wall, "painted gypsum board", &catalog);
        assert_eq!(upgrade, Some(MaterialCandidate::new("Fiberglass Board", 0.80)));
    }

    #[test]
    fn test_best_material_has_no_upgrade() {
        let catalog = MaterialCatalog::default();
        assert_eq!(recommend_upgrade(MaterialCategory::Wall, "Fiberglass Board", &catalog), None);
    }

    #[test]
    fn test_unresolved_material_has_no_upgrade() {
        let catalog = MaterialCatalog::default();
        assert_eq!(recommend_upgrade(MaterialCategory::Wall, "Rammed Earth", &catalog), None);
    }

    #[test]
    fn test_ties_go_to_last_name() {
        let catalog = MaterialCatalog {
            wall: vec![
                MaterialCandidate::new("Brick", 0.02),
                MaterialCandidate::new("Alpha Panel", 0.6),
                MaterialCandidate::new("Zeta Panel", 0.6),
            ],
            ..MaterialCatalog::default()
        };
        let upgrade = recommend_upgrade(MaterialCategory::Wall, "brick", &catalog);
        assert_eq!(upgrade.map(|c| c.name), Some("Zeta Panel".to_string()));
    }

    #[test]
    fn test_apply_wall_upgrade_rewrites_description() {
        let mut v = FeatureVector::empty(
            "Z",
            ApartmentType::OneBed,
            DayNight::Day,
            "Wall: Gypsum Board; Window: Double Glazing",
        );
        v.wall_material = Some("Gypsum Board".to_string());
        let upgraded = apply_wall_upgrade(&v, &MaterialCandidate::new("Fiberglass Board", 0.8));
        assert_eq!(
            upgraded.element_materials,
            "Wall: Fiberglass Board; Window: Double Glazing"
        );
        assert_eq!(upgraded.wall_material.as_deref(), Some("Fiberglass Board"));
        assert_eq!(v.wall_material.as_deref(), Some("Gypsum Board"));
    }
}
