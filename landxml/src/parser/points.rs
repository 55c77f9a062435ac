//! Table des points de contrôle (CgPoints)

use std::collections::HashMap;

use roxmltree::Node;
use tracing::debug;

use super::segment::parse_coord;
use super::{attr, text, Namespace, Records};
use crate::types::Point;
use crate::LandXmlError;

/// Points du fichier indexés par identifiant
#[derive(Debug, Default)]
pub struct PointTable {
    points: HashMap<String, Point>,
    file: String,
}

impl PointTable {
    /// Crée une table vide pour le fichier `file` (utilisé dans les erreurs)
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            points: HashMap::new(),
            file: file.into(),
        }
    }

    /// Insère un point; le dernier point d'un identifiant dupliqué l'emporte
    pub fn register(&mut self, point: Point) {
        if let Some(previous) = self.points.insert(point.id.clone(), point) {
            debug!(id = %previous.id, file = %self.file, "Duplicate CgPoint, keeping last");
        }
    }

    /// Résout une référence de point
    pub fn resolve(&self, id: &str) -> Result<&Point, LandXmlError> {
        self.points
            .get(id)
            .ok_or_else(|| LandXmlError::MissingPointReference {
                id: id.to_string(),
                file: self.file.clone(),
            })
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Point> {
        self.points.values()
    }
}

/// Construit la table depuis tous les `CgPoints/CgPoint` de la racine.
///
/// Un CgPoint sans coordonnées mais avec `pntRef` est un alias d'un autre
/// point; les alias sont résolus après le parcours complet.
pub fn parse(root: Node, ns: &Namespace, file: &str) -> Result<PointTable, LandXmlError> {
    let mut table = PointTable::new(file);
    let mut aliases = Vec::new();

    for element in Records::new(root, ns, "CgPoints", "CgPoint") {
        let id = attr(element, "name");
        let order = attr(element, "surveyOrder").to_string();
        let point_type = attr(element, "pntSurv").to_string();

        match (text(element), element.attribute("pntRef")) {
            (Some(value), _) => {
                let coord = parse_coord(value).map_err(|_| {
                    LandXmlError::malformed(format!(
                        "CgPoint {} has invalid coordinates '{}'",
                        id, value
                    ))
                })?;
                table.register(Point {
                    id: id.to_string(),
                    coord,
                    order,
                    point_type,
                });
            }
            (None, Some(target)) => aliases.push((id, order, point_type, target)),
            (None, None) => {
                return Err(LandXmlError::malformed(format!(
                    "CgPoint {} has neither coordinates nor pntRef",
                    id
                )))
            }
        }
    }

    // Un alias peut viser un autre alias déclaré plus loin: passes répétées
    // jusqu'à ce que plus rien ne se résolve
    while !aliases.is_empty() {
        let pending = aliases.len();
        let mut unresolved = Vec::new();

        for (id, order, point_type, target) in aliases {
            match table.points.get(target).map(|p| p.coord) {
                Some(coord) => table.register(Point {
                    id: id.to_string(),
                    coord,
                    order,
                    point_type,
                }),
                None => unresolved.push((id, order, point_type, target)),
            }
        }

        if unresolved.len() == pending {
            // Cible inconnue ou cycle d'alias
            return Err(LandXmlError::MissingPointReference {
                id: unresolved[0].3.to_string(),
                file: file.to_string(),
            });
        }
        aliases = unresolved;
    }

    debug!(file = %file, points = table.len(), "Point table built");

    Ok(table)
}
