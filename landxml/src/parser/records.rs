//! Parsers des enregistrements Monument et Parcel

use std::sync::OnceLock;

use regex::Regex;
use roxmltree::Node;
use tracing::debug;

use super::points::PointTable;
use super::segment::SegmentReader;
use super::{attr, Namespace};
use crate::assemble;
use crate::types::{Monument, Parcel};
use crate::LandXmlError;

/// Sépare le suffixe numérique `[n]` d'un nom (ex: `Lot 5 [42]` → `Lot 5`, 42).
///
/// Sans suffixe, le nom est inchangé et l'identifiant vaut 0. Un suffixe
/// trop grand pour un `u64` est retiré du nom et l'identifiant vaut 0.
pub fn parse_label(name: &str) -> (String, u64) {
    static SUFFIX: OnceLock<Regex> = OnceLock::new();
    let suffix = SUFFIX.get_or_init(|| Regex::new(r"\s+\[(\d+)\]\s*$").expect("valid regex"));

    let Some(caps) = suffix.captures(name) else {
        return (name.to_string(), 0);
    };
    let (Some(whole), Some(digits)) = (caps.get(0), caps.get(1)) else {
        return (name.to_string(), 0);
    };

    let label = digits.as_str().parse::<u64>().unwrap_or_else(|_| {
        debug!(name, "Label suffix overflows u64, using 0");
        0
    });
    (name[..whole.start()].to_string(), label)
}

/// Surface déclarée; 0.0 si absente ou invalide
pub fn parse_area(value: Option<&str>) -> f64 {
    value
        .and_then(|v| fast_float::parse(v.trim()).ok())
        .unwrap_or(0.0)
}

/// Parse un élément Monument
pub fn parse_monument(
    element: Node,
    points: &PointTable,
) -> Result<Monument, LandXmlError> {
    let (name, label) = parse_label(attr(element, "name"));

    let Some(point_ref) = element.attribute("pntRef") else {
        return Err(LandXmlError::malformed(format!(
            "pntRef attribute missing in Monument {}",
            name
        )));
    };
    let point = points.resolve(point_ref)?.clone();

    Ok(Monument {
        point,
        name,
        label,
        description: attr(element, "desc").to_string(),
        monument_type: attr(element, "type").to_string(),
        beacon: attr(element, "beacon").to_string(),
        protection: attr(element, "beaconProtection").to_string(),
        state: attr(element, "state").to_string(),
        condition: attr(element, "condition").to_string(),
    })
}

/// Parse un élément Parcel.
///
/// Retourne `Ok(None)` pour une parcelle sans CoordGeom (ou avec un
/// CoordGeom vide): elle n'a pas de contour, ce n'est pas une erreur. Les
/// erreurs de géométrie sont rattachées au nom de la parcelle.
pub fn parse_parcel(
    element: Node,
    ns: &Namespace,
    points: &PointTable,
) -> Result<Option<Parcel>, LandXmlError> {
    let (name, label) = parse_label(attr(element, "name"));

    let coord_geom = ns
        .child(element, "CoordGeom")
        .filter(|cg| cg.children().any(|n| n.is_element()));
    let Some(coord_geom) = coord_geom else {
        debug!(parcel = %name, "Parcel without CoordGeom, skipped");
        return Ok(None);
    };

    let reader = SegmentReader::new(ns, points);
    let geometry =
        assemble::build_geometry(coord_geom, &reader).map_err(|e| e.in_parcel(name.as_str()))?;

    Ok(Some(Parcel {
        name,
        label,
        geometry,
        description: attr(element, "desc").to_string(),
        area: parse_area(element.attribute("area")),
        state: attr(element, "state").to_string(),
        class: attr(element, "class").to_string(),
        parcel_type: attr(element, "parcelType").to_string(),
    }))
}
