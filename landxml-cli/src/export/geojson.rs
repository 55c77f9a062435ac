//! Export vers GeoJSON avec geozero (streaming)

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use geozero::geojson::GeoJsonWriter;
use geozero::GeozeroGeometry;

use super::Feature;

/// Résultat de l'export d'une couche
#[derive(Debug, Default)]
pub struct LayerOutcome {
    /// Nombre de features écrites
    pub written: usize,

    /// Erreur ayant interrompu la lecture des enregistrements
    pub error: Option<landxml::LandXmlError>,
}

/// Exporte un flux de features en GeoJSON.
///
/// La lecture s'arrête à la première erreur: les features déjà écrites
/// restent dans une FeatureCollection valide et l'erreur est retournée dans
/// le `LayerOutcome`. Les erreurs d'écriture, elles, sont fatales.
pub fn export_to_geojson<I>(features: I, epsg: Option<u32>, output_path: &Path) -> Result<LayerOutcome>
where
    I: IntoIterator<Item = Result<Feature, landxml::LandXmlError>>,
{
    let file = File::create(output_path)
        .context(format!("Failed to create file: {}", output_path.display()))?;
    let mut writer = BufWriter::new(file);

    // Header FeatureCollection avec CRS si le système est identifié
    write!(writer, r#"{{"type":"FeatureCollection","#)?;
    if let Some(epsg) = epsg {
        write!(
            writer,
            r#""crs":{{"type":"name","properties":{{"name":"urn:ogc:def:crs:EPSG::{}"}}}},"#,
            epsg
        )?;
    }
    write!(writer, r#""features":["#)?;

    let mut outcome = LayerOutcome::default();
    for feature in features {
        match feature {
            Ok(feature) => {
                if outcome.written > 0 {
                    write!(writer, ",")?;
                }
                write_feature(&mut writer, &feature)?;
                outcome.written += 1;
            }
            Err(e) => {
                outcome.error = Some(e);
                break;
            }
        }
    }

    // Footer
    write!(writer, "]}}")?;
    writer.flush()?;

    Ok(outcome)
}

/// Écrit une feature en GeoJSON
fn write_feature<W: Write>(writer: &mut W, feature: &Feature) -> Result<()> {
    write!(
        writer,
        r#"{{"type":"Feature","id":{},"#,
        serde_json::to_string(&feature.id)?
    )?;

    // Geometry via geozero
    write!(writer, r#""geometry":"#)?;
    let mut geom_buf = Vec::new();
    let mut geom_writer = GeoJsonWriter::new(&mut geom_buf);
    feature.geometry.process_geom(&mut geom_writer)?;
    writer.write_all(&geom_buf)?;

    write!(writer, r#","properties":"#)?;
    serde_json::to_writer(&mut *writer, &feature.properties)?;
    write!(writer, "}}")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Geometry, Point};
    use serde_json::{Map, Value};
    use std::io::Cursor;

    fn point_feature(id: &str) -> Feature {
        Feature {
            id: id.to_string(),
            geometry: Geometry::Point(Point::new(1750000.0, 5430000.0)),
            properties: [("name".to_string(), Value::from("PEG \"1\""))]
                .into_iter()
                .collect::<Map<_, _>>(),
        }
    }

    #[test]
    fn test_write_feature() {
        let mut buffer = Cursor::new(Vec::new());
        write_feature(&mut buffer, &point_feature("test_123")).unwrap();

        let json = String::from_utf8(buffer.into_inner()).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["type"], "Feature");
        assert_eq!(value["id"], "test_123");
        assert_eq!(value["properties"]["name"], "PEG \"1\"");
        assert_eq!(value["geometry"]["type"], "Point");
    }

    #[test]
    fn test_export_to_geojson() {
        let output_path = std::env::temp_dir().join("test_landxml_export.geojson");
        let outcome = export_to_geojson(
            vec![Ok(point_feature("1")), Ok(point_feature("2"))],
            Some(2193),
            &output_path,
        )
        .unwrap();
        assert_eq!(outcome.written, 2);
        assert!(outcome.error.is_none());

        let content = std::fs::read_to_string(&output_path).unwrap();
        let value: Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["type"], "FeatureCollection");
        assert_eq!(
            value["crs"]["properties"]["name"],
            "urn:ogc:def:crs:EPSG::2193"
        );
        assert_eq!(value["features"].as_array().unwrap().len(), 2);

        std::fs::remove_file(output_path).ok();
    }

    #[test]
    fn test_export_stops_on_error() {
        let output_path = std::env::temp_dir().join("test_landxml_export_error.geojson");
        let features = vec![
            Ok(point_feature("1")),
            Err(landxml::LandXmlError::MixedGeometry),
            Ok(point_feature("3")),
        ];
        let outcome = export_to_geojson(features, None, &output_path).unwrap();
        assert_eq!(outcome.written, 1);
        assert!(outcome.error.is_some());

        let content = std::fs::read_to_string(&output_path).unwrap();
        let value: Value = serde_json::from_str(&content).unwrap();
        assert!(value.get("crs").is_none());
        assert_eq!(value["features"].as_array().unwrap().len(), 1);

        std::fs::remove_file(output_path).ok();
    }
}
