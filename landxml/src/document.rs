//! Façade du document LandXML

use std::path::Path;

use tracing::{info, warn};

use crate::parser::points::PointTable;
use crate::parser::{header, points, records, Namespace, Records};
use crate::types::{CoordinateSystem, Monument, Parcel, ParseResult};
use crate::{source, LandXmlError};

/// Contenu texte d'un fichier LandXML, chargé en mémoire
#[derive(Debug, Clone)]
pub struct LandXmlFile {
    file: String,
    text: String,
}

impl LandXmlFile {
    /// Charge et décode un fichier
    pub fn open(path: &Path) -> Result<Self, LandXmlError> {
        Ok(Self {
            file: path.display().to_string(),
            text: source::read(path)?,
        })
    }

    /// Construit un document depuis un texte déjà en mémoire
    pub fn from_string(file: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            text: text.into(),
        }
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    /// Parse l'arbre XML, l'en-tête et la table des points
    pub fn parse(&self) -> Result<LandXml<'_>, LandXmlError> {
        LandXml::parse(&self.file, &self.text)
    }
}

/// Document LandXML parsé.
///
/// Les monuments et les parcelles ne sont construits qu'à l'itération.
pub struct LandXml<'input> {
    document: roxmltree::Document<'input>,
    file: &'input str,
    namespace: Namespace,
    coordinate_system: Option<CoordinateSystem>,
    points: PointTable,
}

impl<'input> LandXml<'input> {
    fn parse(file: &'input str, text: &'input str) -> Result<Self, LandXmlError> {
        let options = roxmltree::ParsingOptions {
            allow_dtd: true,
            ..roxmltree::ParsingOptions::default()
        };
        let document = roxmltree::Document::parse_with_options(text, options).map_err(|e| {
            LandXmlError::Xml {
                file: file.to_string(),
                source: e,
            }
        })?;

        let root = document.root_element();
        if root.tag_name().name() != "LandXML" {
            warn!(file = %file, root = root.tag_name().name(), "Unexpected root element");
        }

        let namespace = Namespace::from_root(root);
        let coordinate_system = header::parse(root, &namespace);
        let points = points::parse(root, &namespace, file)?;

        info!(
            file = %file,
            coordinate_system = ?coordinate_system.as_ref().map(|cs| cs.name.as_str()),
            points = points.len(),
            "LandXML document loaded"
        );

        Ok(Self {
            document,
            file,
            namespace,
            coordinate_system,
            points,
        })
    }

    pub fn file(&self) -> &str {
        self.file
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub fn coordinate_system(&self) -> Option<&CoordinateSystem> {
        self.coordinate_system.as_ref()
    }

    pub fn coordinate_system_name(&self) -> Option<&str> {
        self.coordinate_system.as_ref().map(|cs| cs.name.as_str())
    }

    /// Code EPSG du système de coordonnées, `None` si absent ou non répertorié
    pub fn coordinate_system_epsg_id(&self) -> Option<u32> {
        self.coordinate_system_name().and_then(header::epsg_for)
    }

    pub fn points(&self) -> &PointTable {
        &self.points
    }

    /// Itère sur les monuments (`Monuments/Monument`)
    pub fn monuments(&self) -> Monuments<'_, 'input> {
        Monuments {
            records: Records::new(
                self.document.root_element(),
                &self.namespace,
                "Monuments",
                "Monument",
            ),
            points: &self.points,
            done: false,
        }
    }

    /// Itère sur les parcelles (`Parcels/Parcel`) ayant une géométrie
    pub fn parcels(&self) -> Parcels<'_, 'input> {
        Parcels {
            records: Records::new(
                self.document.root_element(),
                &self.namespace,
                "Parcels",
                "Parcel",
            ),
            namespace: &self.namespace,
            points: &self.points,
            done: false,
        }
    }

    /// Lit tous les monuments et parcelles, en s'arrêtant à la première erreur
    pub fn read_all(&self) -> Result<ParseResult, LandXmlError> {
        let monuments = self.monuments().collect::<Result<Vec<_>, _>>()?;
        let parcels = self.parcels().collect::<Result<Vec<_>, _>>()?;

        Ok(ParseResult {
            coordinate_system: self.coordinate_system.clone(),
            epsg: self.coordinate_system_epsg_id(),
            point_count: self.points.len(),
            monuments,
            parcels,
        })
    }
}

/// Itérateur paresseux sur les monuments; s'arrête après la première erreur
pub struct Monuments<'a, 'input> {
    records: Records<'a, 'input>,
    points: &'a PointTable,
    done: bool,
}

impl Iterator for Monuments<'_, '_> {
    type Item = Result<Monument, LandXmlError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let element = self.records.next()?;
        let result = records::parse_monument(element, self.points);
        self.done = result.is_err();
        Some(result)
    }
}

/// Itérateur paresseux sur les parcelles; s'arrête après la première erreur
pub struct Parcels<'a, 'input> {
    records: Records<'a, 'input>,
    namespace: &'a Namespace,
    points: &'a PointTable,
    done: bool,
}

impl Iterator for Parcels<'_, '_> {
    type Item = Result<Parcel, LandXmlError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        for element in self.records.by_ref() {
            match records::parse_parcel(element, self.namespace, self.points) {
                Ok(Some(parcel)) => return Some(Ok(parcel)),
                Ok(None) => continue,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }

        None
    }
}
