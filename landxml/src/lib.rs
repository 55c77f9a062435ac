//! # landxml
//!
//! Parser pour les fichiers d'échange de levés LandXML (plans cadastraux).
//!
//! ## Features
//!
//! - Table des points (CgPoints) et résolution des références `pntRef`
//! - Monuments (repères) et parcelles
//! - Reconstruction des contours de parcelles en MultiPolygon (avec trous)
//!   ou MultiLineString quand les chaînes ne sont pas fermées
//! - Identification du système de coordonnées et de son code EPSG
//! - Types `geo` pour l'interopérabilité avec l'écosystème Rust géospatial
//!
//! Les arcs (Curve) sont approximés par leur corde et aucune reprojection
//! n'est effectuée.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use landxml::LandXmlFile;
//! use std::path::Path;
//!
//! let source = LandXmlFile::open(Path::new("plan.xml"))?;
//! let doc = source.parse()?;
//! println!("EPSG: {:?}", doc.coordinate_system_epsg_id());
//!
//! for parcel in doc.parcels() {
//!     let parcel = parcel?;
//!     println!("{} [{}]: {}", parcel.name, parcel.label, parcel.geometry.geom_type());
//! }
//! ```

pub mod assemble;
pub mod document;
pub mod error;
pub mod parser;
pub mod source;
pub mod types;

pub use document::{LandXml, LandXmlFile, Monuments, Parcels};
pub use error::LandXmlError;
pub use parser::header::epsg_for;
pub use types::{CoordinateSystem, Monument, Parcel, ParcelGeometry, ParseResult, Point};

use std::path::Path;

/// Lit un fichier LandXML complet.
///
/// # Errors
///
/// Retourne `LandXmlError` si le fichier est illisible, si le XML est mal
/// formé, ou à la première erreur de monument ou de parcelle.
pub fn parse(path: &Path) -> Result<ParseResult, LandXmlError> {
    let source = LandXmlFile::open(path)?;
    let doc = source.parse()?;
    doc.read_all()
}
