//! Lecture des segments de CoordGeom (Line, IrregularLine, Curve)
//!
//! Les coordonnées LandXML sont écrites `nord est`: elles sont réordonnées en
//! `(x = est, y = nord)` ici, et seulement ici.

use geo::Coord;
use roxmltree::Node;

use super::points::PointTable;
use super::{text, Namespace};
use crate::LandXmlError;

/// Convertit les éléments de géométrie en chaînes de coordonnées
pub struct SegmentReader<'a> {
    namespace: &'a Namespace,
    points: &'a PointTable,
}

impl<'a> SegmentReader<'a> {
    pub fn new(namespace: &'a Namespace, points: &'a PointTable) -> Self {
        Self { namespace, points }
    }

    /// Lit un segment selon son tag
    pub fn read_segment(&self, element: Node) -> Result<Vec<Coord>, LandXmlError> {
        let tag = element.tag_name().name();
        if element.tag_name().namespace() != self.namespace.uri() {
            return Err(LandXmlError::UnsupportedGeometry {
                tag: tag.to_string(),
            });
        }

        match tag {
            "Line" => self.read_line(element),
            "IrregularLine" => self.read_irregular_line(element),
            "Curve" => self.read_curve(element),
            _ => Err(LandXmlError::UnsupportedGeometry {
                tag: tag.to_string(),
            }),
        }
    }

    /// Ligne droite: `[Start, End]`
    pub fn read_line(&self, element: Node) -> Result<Vec<Coord>, LandXmlError> {
        Ok(vec![
            self.read_point_type(element, "Start")?,
            self.read_point_type(element, "End")?,
        ])
    }

    /// Polyligne: liste PntList2D/PntList3D encadrée par Start et End
    /// lorsqu'ils diffèrent des extrémités de la liste
    pub fn read_irregular_line(&self, element: Node) -> Result<Vec<Coord>, LandXmlError> {
        let (list, dim) = match self.namespace.child(element, "PntList2D") {
            Some(list) => (list, 2),
            None => match self.namespace.child(element, "PntList3D") {
                Some(list) => (list, 3),
                None => {
                    return Err(LandXmlError::malformed(
                        "PntList2D or PntList3D element missing in IrregularLine",
                    ))
                }
            },
        };

        let mut coords = parse_coord_list(text(list).unwrap_or(""), dim)?;

        let start = self.read_point_type(element, "Start")?;
        if coords.first() != Some(&start) {
            coords.insert(0, start);
        }

        let end = self.read_point_type(element, "End")?;
        if coords.last() != Some(&end) {
            coords.push(end);
        }

        Ok(coords)
    }

    /// Arc approximé par sa corde
    // TODO: échantillonner l'arc à partir de Center/radius quand un consommateur en aura besoin
    pub fn read_curve(&self, element: Node) -> Result<Vec<Coord>, LandXmlError> {
        self.read_line(element)
    }

    /// Lit une extrémité: coordonnées en ligne ou référence `pntRef`
    fn read_point_type(&self, element: Node, tag: &str) -> Result<Coord, LandXmlError> {
        let Some(point) = self.namespace.child(element, tag) else {
            return Err(LandXmlError::malformed(format!(
                "{} element missing in {}",
                tag,
                element.tag_name().name()
            )));
        };

        if let Some(value) = text(point) {
            return parse_coord(value);
        }

        match point.attribute("pntRef") {
            Some(id) => Ok(self.points.resolve(id)?.coord),
            None => Err(LandXmlError::malformed(format!(
                "{} element in {} has neither coordinates nor pntRef",
                tag,
                element.tag_name().name()
            ))),
        }
    }
}

/// Parse une paire `nord est` (une éventuelle altitude est ignorée)
pub fn parse_coord(value: &str) -> Result<Coord, LandXmlError> {
    let mut tokens = value.split_whitespace();
    let northing = parse_number(tokens.next(), value)?;
    let easting = parse_number(tokens.next(), value)?;
    Ok(Coord {
        x: easting,
        y: northing,
    })
}

/// Parse une liste de tuples de dimension `dim` (2 ou 3)
pub fn parse_coord_list(value: &str, dim: usize) -> Result<Vec<Coord>, LandXmlError> {
    let tokens: Vec<&str> = value.split_whitespace().collect();
    if tokens.len() % dim != 0 {
        return Err(LandXmlError::malformed(format!(
            "point list has {} values, not a multiple of {}",
            tokens.len(),
            dim
        )));
    }

    tokens
        .chunks_exact(dim)
        .map(|tuple| -> Result<Coord, LandXmlError> {
            Ok(Coord {
                x: parse_number(Some(tuple[1]), value)?,
                y: parse_number(Some(tuple[0]), value)?,
            })
        })
        .collect()
}

#[inline]
fn parse_number(token: Option<&str>, context: &str) -> Result<f64, LandXmlError> {
    token
        .and_then(|t| fast_float::parse(t).ok())
        .ok_or_else(|| LandXmlError::malformed(format!("invalid coordinates '{}'", context)))
}
