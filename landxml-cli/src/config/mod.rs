//! Configuration de l'export

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};

/// Nom de la couche des monuments
pub const MONUMENTS: &str = "monuments";

/// Nom de la couche des parcelles
pub const PARCELS: &str = "parcels";

/// Attributs disponibles pour les monuments
const MONUMENT_FIELDS: &[&str] = &[
    "name",
    "label",
    "description",
    "type",
    "beacon",
    "protection",
    "state",
    "condition",
    "point_id",
    "survey_order",
    "point_type",
];

/// Attributs disponibles pour les parcelles
const PARCEL_FIELDS: &[&str] = &[
    "name",
    "label",
    "description",
    "area",
    "state",
    "class",
    "type",
    "geometry_type",
];

/// Configuration principale
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    #[serde(flatten)]
    pub layers: HashMap<String, LayerConfig>,
}

/// Configuration d'une couche exportée
#[derive(Debug, Deserialize, Serialize)]
pub struct LayerConfig {
    /// Nom du fichier GeoJSON cible (sans extension)
    pub file: String,

    /// Mapping des attributs LandXML vers les propriétés GeoJSON
    pub fields: Vec<FieldMapping>,
}

/// Mapping d'un champ
#[derive(Debug, Deserialize, Serialize)]
pub struct FieldMapping {
    /// Nom de l'attribut source
    pub source: String,

    /// Nom de la propriété cible
    pub target: String,
}

impl Config {
    /// Charge une configuration depuis un fichier
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        let config: Self = serde_json::from_str(&content).context("Failed to parse config JSON")?;
        config.validate()?;
        Ok(config)
    }

    /// Charge une configuration depuis un preset embarqué
    pub fn from_preset(preset: &str) -> Result<Self> {
        match preset {
            "full" => Self::load_embedded(include_str!("presets/full.json")),
            "minimal" => Self::load_embedded(include_str!("presets/minimal.json")),
            _ => anyhow::bail!("Unknown preset: {}. Use: full, minimal", preset),
        }
    }

    /// Preset embarqué ou chemin vers un fichier JSON
    pub fn resolve(spec: &str) -> Result<Self> {
        match spec {
            "full" | "minimal" => Self::from_preset(spec),
            _ => Self::load(Path::new(spec)),
        }
    }

    fn load_embedded(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).context("Failed to parse embedded config")?;
        config.validate()?;
        Ok(config)
    }

    /// Vérifie les noms de couches et d'attributs
    pub fn validate(&self) -> Result<()> {
        for (layer, config) in &self.layers {
            let known = match layer.as_str() {
                MONUMENTS => MONUMENT_FIELDS,
                PARCELS => PARCEL_FIELDS,
                _ => anyhow::bail!("Unknown layer '{}'. Use: {}, {}", layer, MONUMENTS, PARCELS),
            };

            if config.file.trim().is_empty() {
                anyhow::bail!("Layer '{}' has an empty file name", layer);
            }

            for field in &config.fields {
                if !known.contains(&field.source.as_str()) {
                    anyhow::bail!(
                        "Unknown field '{}' for layer '{}'. Available: {}",
                        field.source,
                        layer,
                        known.join(", ")
                    );
                }
            }
        }
        Ok(())
    }

    /// Récupère la configuration d'une couche
    pub fn get_layer_config(&self, layer: &str) -> Option<&LayerConfig> {
        self.layers.get(layer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        let full = Config::from_preset("full").unwrap();
        assert!(full.get_layer_config(MONUMENTS).is_some());
        assert_eq!(full.get_layer_config(PARCELS).unwrap().file, "parcels");

        let minimal = Config::from_preset("minimal").unwrap();
        assert!(minimal.get_layer_config(PARCELS).is_some());
    }

    #[test]
    fn test_unknown_preset() {
        assert!(Config::from_preset("bati").is_err());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let json = r#"{"parcels": {"file": "p", "fields": [{"source": "idu", "target": "idu"}]}}"#;
        assert!(Config::load_embedded(json).is_err());
    }

    #[test]
    fn test_unknown_layer_rejected() {
        let json = r#"{"roads": {"file": "r", "fields": []}}"#;
        assert!(Config::load_embedded(json).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join("landxml_config_test.json");
        std::fs::write(
            &path,
            r#"{"monuments": {"file": "marks", "fields": [{"source": "name", "target": "nom"}]}}"#,
        )
        .unwrap();

        let config = Config::resolve(path.to_str().unwrap()).unwrap();
        let layer = config.get_layer_config(MONUMENTS).unwrap();
        assert_eq!(layer.file, "marks");
        assert_eq!(layer.fields[0].target, "nom");
        assert!(config.get_layer_config(PARCELS).is_none());

        std::fs::remove_file(path).ok();
    }
}
