//! Types d'erreurs pour le crate landxml

use thiserror::Error;

/// Erreurs pouvant survenir lors du parsing LandXML
#[derive(Debug, Error)]
pub enum LandXmlError {
    /// Erreur d'I/O lors de la lecture du fichier
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Document XML mal formé
    #[error("Invalid XML in {file}: {source}")]
    Xml {
        file: String,
        #[source]
        source: roxmltree::Error,
    },

    /// Encodage déclaré non supporté
    #[error("Unsupported encoding '{label}' declared in {file}")]
    Encoding { file: String, label: String },

    /// Référence vers un CgPoint absent de la table des points
    #[error("CgPoint with name {id} is not defined in {file}")]
    MissingPointReference { id: String, file: String },

    /// Élément de CoordGeom non géré
    #[error("CoordGeom {tag} type not handled")]
    UnsupportedGeometry { tag: String },

    /// Parcelle mêlant anneaux fermés et lignes ouvertes
    #[error("Cannot handle parcel with both polygon and linear geometries")]
    MixedGeometry,

    /// Sous-élément ou valeur obligatoire absent/invalide
    #[error("Malformed element: {0}")]
    MalformedElement(String),

    /// Erreur de géométrie rattachée à une parcelle
    #[error("Parcel {name}: {source}")]
    Parcel {
        name: String,
        #[source]
        source: Box<LandXmlError>,
    },
}

impl LandXmlError {
    /// Crée une erreur d'élément mal formé
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedElement(reason.into())
    }

    /// Rattache l'erreur à la parcelle `name`
    pub fn in_parcel(self, name: impl Into<String>) -> Self {
        Self::Parcel {
            name: name.into(),
            source: Box::new(self),
        }
    }

    /// Erreur d'origine, sans le contexte de parcelle
    pub fn root_cause(&self) -> &LandXmlError {
        match self {
            Self::Parcel { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
