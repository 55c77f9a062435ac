//! Types de données pour le crate landxml

use geo::{Coord, Geometry, MultiLineString, MultiPolygon};

/// Point de contrôle (CgPoint) de la table des points
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    /// Identifiant (attribut `name`), unique dans un fichier
    pub id: String,

    /// Coordonnée (x = est, y = nord)
    pub coord: Coord,

    /// Ordre de levé (`surveyOrder`)
    pub order: String,

    /// Type de point (`pntSurv`)
    pub point_type: String,
}

/// Système de coordonnées déclaré dans l'en-tête
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinateSystem {
    /// Nom (ex: NZGD2000, WELLTM2000)
    pub name: String,

    /// Description libre (`desc`)
    pub description: Option<String>,
}

/// Repère (borne, marque de levé)
#[derive(Debug, Clone)]
pub struct Monument {
    pub point: Point,
    pub name: String,
    /// Identifiant numérique extrait du suffixe `[n]` du nom (0 si absent)
    pub label: u64,
    pub description: String,
    pub monument_type: String,
    pub beacon: String,
    pub protection: String,
    pub state: String,
    pub condition: String,
}

/// Géométrie reconstruite d'une parcelle
#[derive(Debug, Clone, PartialEq)]
pub enum ParcelGeometry {
    /// Anneaux fermés: extérieurs et trous
    MultiPolygon(MultiPolygon),
    /// Chaînes ouvertes
    MultiLineString(MultiLineString),
}

impl ParcelGeometry {
    /// Nom du type de géométrie (au sens OGC)
    pub fn geom_type(&self) -> &'static str {
        match self {
            Self::MultiPolygon(_) => "MultiPolygon",
            Self::MultiLineString(_) => "MultiLineString",
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::MultiPolygon(mp) => mp.0.is_empty(),
            Self::MultiLineString(mls) => mls.0.is_empty(),
        }
    }
}

impl From<ParcelGeometry> for Geometry {
    fn from(geometry: ParcelGeometry) -> Self {
        match geometry {
            ParcelGeometry::MultiPolygon(mp) => Geometry::MultiPolygon(mp),
            ParcelGeometry::MultiLineString(mls) => Geometry::MultiLineString(mls),
        }
    }
}

/// Parcelle avec sa géométrie et ses attributs
#[derive(Debug, Clone)]
pub struct Parcel {
    pub name: String,
    pub label: u64,
    pub geometry: ParcelGeometry,
    pub description: String,
    /// Surface déclarée (0.0 si absente ou invalide)
    pub area: f64,
    pub state: String,
    /// Classe (`class`)
    pub class: String,
    /// Type (`parcelType`)
    pub parcel_type: String,
}

/// Résultat de la lecture complète d'un fichier LandXML
#[derive(Debug)]
pub struct ParseResult {
    /// Système de coordonnées détecté
    pub coordinate_system: Option<CoordinateSystem>,

    /// Code EPSG associé au système de coordonnées
    pub epsg: Option<u32>,

    /// Nombre de points dans la table
    pub point_count: usize,

    pub monuments: Vec<Monument>,

    pub parcels: Vec<Parcel>,
}
