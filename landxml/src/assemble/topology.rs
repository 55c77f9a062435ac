//! Classification des anneaux (extérieurs, trous) et géométrie finale

use geo::{Coord, LineString, MultiLineString, MultiPolygon, Polygon};

use crate::types::ParcelGeometry;
use crate::LandXmlError;

/// Vrai si la chaîne est un anneau: au moins 3 points, fermée
pub fn is_ring(chain: &[Coord]) -> bool {
    chain.len() >= 3 && chain.first() == chain.last()
}

/// Surface signée d'un anneau fermé (positive dans le sens trigonométrique).
///
/// Formule du lacet calculée sur les écarts au premier sommet, arête par
/// arête; le dernier point répète le premier, il n'y a donc pas d'arête de
/// fermeture à ajouter.
pub fn signed_area(ring: &[Coord]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }

    let origin = ring[0];
    let mut previous = Coord { x: 0.0, y: 0.0 };
    let mut twice_area = 0.0;

    for &coord in &ring[1..] {
        let delta = coord - origin;
        twice_area += previous.x * delta.y - delta.x * previous.y;
        previous = delta;
    }

    twice_area / 2.0
}

/// Construit la géométrie d'une parcelle depuis ses chaînes.
///
/// Le signe du premier anneau rencontré fixe la polarité: les anneaux de
/// même sens ouvrent un nouveau polygone, ceux de sens opposé sont des trous
/// du dernier polygone ouvert. Les trous suivent donc leur anneau extérieur
/// dans l'ordre du document.
pub fn classify(chains: Vec<Vec<Coord>>) -> Result<ParcelGeometry, LandXmlError> {
    let mut polygons: Vec<(LineString, Vec<LineString>)> = Vec::new();
    let mut lines: Vec<LineString> = Vec::new();
    let mut polarity: Option<f64> = None;

    for chain in chains {
        if !is_ring(&chain) {
            lines.push(LineString::new(chain));
            continue;
        }

        let area = signed_area(&chain);
        let multiplier = *polarity.get_or_insert(if area < 0.0 { -1.0 } else { 1.0 });

        if area * multiplier >= 0.0 {
            polygons.push((LineString::new(chain), Vec::new()));
        } else {
            let Some((_, holes)) = polygons.last_mut() else {
                return Err(LandXmlError::malformed(
                    "inner ring found before any outer ring",
                ));
            };
            holes.push(LineString::new(chain));
        }
    }

    if !lines.is_empty() && !polygons.is_empty() {
        return Err(LandXmlError::MixedGeometry);
    }

    if !lines.is_empty() {
        return Ok(ParcelGeometry::MultiLineString(MultiLineString::new(lines)));
    }

    Ok(ParcelGeometry::MultiPolygon(MultiPolygon::new(
        polygons
            .into_iter()
            .map(|(exterior, holes)| Polygon::new(exterior, holes))
            .collect(),
    )))
}
