//! Conversion des enregistrements LandXML en features exportables

pub mod geojson;

use std::path::Path;

use anyhow::{Context, Result};
use geo::Geometry;
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::config::{Config, LayerConfig, MONUMENTS, PARCELS};
use crate::report::{ErrorLevel, ExportError, FileOutcome};
use landxml::{LandXmlError, LandXmlFile, Monument, Parcel};

/// Feature prête à l'export
#[derive(Debug, Clone)]
pub struct Feature {
    /// Identifiant (label LandXML si présent, sinon nom)
    pub id: String,

    pub geometry: Geometry,

    pub properties: Map<String, Value>,
}

/// Valeur d'un attribut de monument
fn monument_value(monument: &Monument, source: &str) -> Value {
    match source {
        "name" => Value::from(monument.name.as_str()),
        "label" => Value::from(monument.label),
        "description" => Value::from(monument.description.as_str()),
        "type" => Value::from(monument.monument_type.as_str()),
        "beacon" => Value::from(monument.beacon.as_str()),
        "protection" => Value::from(monument.protection.as_str()),
        "state" => Value::from(monument.state.as_str()),
        "condition" => Value::from(monument.condition.as_str()),
        "point_id" => Value::from(monument.point.id.as_str()),
        "survey_order" => Value::from(monument.point.order.as_str()),
        "point_type" => Value::from(monument.point.point_type.as_str()),
        _ => Value::Null,
    }
}

/// Valeur d'un attribut de parcelle
fn parcel_value(parcel: &Parcel, source: &str) -> Value {
    match source {
        "name" => Value::from(parcel.name.as_str()),
        "label" => Value::from(parcel.label),
        "description" => Value::from(parcel.description.as_str()),
        "area" => Value::from(parcel.area),
        "state" => Value::from(parcel.state.as_str()),
        "class" => Value::from(parcel.class.as_str()),
        "type" => Value::from(parcel.parcel_type.as_str()),
        "geometry_type" => Value::from(parcel.geometry.geom_type()),
        _ => Value::Null,
    }
}

fn feature_id(name: &str, label: u64) -> String {
    if label != 0 {
        label.to_string()
    } else {
        name.to_string()
    }
}

/// Construit la feature Point d'un monument
pub fn monument_feature(monument: &Monument, layer: &LayerConfig) -> Feature {
    let properties = layer
        .fields
        .iter()
        .map(|f| (f.target.clone(), monument_value(monument, &f.source)))
        .collect();

    Feature {
        id: feature_id(&monument.name, monument.label),
        geometry: Geometry::Point(geo::Point::from(monument.point.coord)),
        properties,
    }
}

/// Construit la feature d'une parcelle (MultiPolygon ou MultiLineString)
pub fn parcel_feature(parcel: Parcel, layer: &LayerConfig) -> Feature {
    let properties = layer
        .fields
        .iter()
        .map(|f| (f.target.clone(), parcel_value(&parcel, &f.source)))
        .collect();

    Feature {
        id: feature_id(&parcel.name, parcel.label),
        geometry: parcel.geometry.into(),
        properties,
    }
}

/// Exporte les couches configurées d'un fichier LandXML dans `output`.
///
/// Un fichier illisible est une erreur. Une entité en erreur arrête sa
/// couche et est reportée dans le `FileOutcome`; l'autre couche est tout de
/// même exportée.
pub fn export_file(path: &Path, output: &Path, config: &Config) -> Result<FileOutcome> {
    let file = path.display().to_string();
    let source = LandXmlFile::open(path).with_context(|| format!("Failed to read {}", file))?;
    let doc = source
        .parse()
        .with_context(|| format!("Failed to parse {}", file))?;

    std::fs::create_dir_all(output)?;
    let epsg = doc.coordinate_system_epsg_id();

    let mut outcome = FileOutcome {
        file: file.clone(),
        ..Default::default()
    };

    if let Some(layer) = config.get_layer_config(MONUMENTS) {
        let output_file = output.join(format!("{}.geojson", layer.file));
        let features = doc
            .monuments()
            .map(|m| m.map(|m| monument_feature(&m, layer)));
        let result = geojson::export_to_geojson(features, epsg, &output_file)?;
        record_layer(&mut outcome, MONUMENTS, result);
    }

    if let Some(layer) = config.get_layer_config(PARCELS) {
        let output_file = output.join(format!("{}.geojson", layer.file));
        let features = doc.parcels().map(|p| p.map(|p| parcel_feature(p, layer)));
        let result = geojson::export_to_geojson(features, epsg, &output_file)?;
        record_layer(&mut outcome, PARCELS, result);
    }

    info!(
        file = %file,
        epsg = ?epsg,
        layers = outcome.exported.len(),
        "Exported"
    );

    Ok(outcome)
}

fn record_layer(outcome: &mut FileOutcome, layer: &str, result: geojson::LayerOutcome) {
    outcome.exported.push((layer.to_string(), result.written));

    if let Some(error) = result.error {
        warn!(file = %outcome.file, layer, "Layer stopped: {}", error);
        outcome.errors.push(ExportError {
            level: ErrorLevel::Error,
            file: outcome.file.clone(),
            layer: Some(layer.to_string()),
            entity: error_entity(&error),
            message: error.root_cause().to_string(),
        });
    }
}

/// Nom de l'entité portée par l'erreur
fn error_entity(error: &LandXmlError) -> Option<String> {
    match error {
        LandXmlError::Parcel { name, .. } => Some(name.clone()),
        _ => None,
    }
}
