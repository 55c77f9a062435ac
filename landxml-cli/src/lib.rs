//! # landxml-cli
//!
//! Inspection et export GeoJSON de plans LandXML.
//!
//! ## Usage CLI
//!
//! ```bash
//! # Système de coordonnées et comptages
//! landxml-cli info --path ./plan.xml
//!
//! # Export GeoJSON (un dossier par fichier source)
//! landxml-cli to-geojson --path ./plans/ --output ./geojson/ --config minimal
//! ```

pub mod config;
pub mod export;
pub mod report;

pub use config::Config;
pub use report::{ExportReport, ExportStatus};
