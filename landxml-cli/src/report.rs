//! Rapport d'export avec graceful degradation
//!
//! Un fichier en erreur n'interrompt pas l'export des autres: chaque
//! échec est collecté ici puis affiché en fin de traitement.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use serde::Serialize;

/// Statut global de l'export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExportStatus {
    /// Export réussi sans erreur
    Success,
    /// Export réussi avec des erreurs non-fatales
    PartialSuccess,
    /// Export échoué
    Failed,
}

/// Niveau de sévérité des erreurs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorLevel {
    /// Fichier illisible: aucune couche exportée
    Fatal,
    /// Entité en erreur: la couche s'arrête à cette entité
    Error,
}

/// Erreur d'export avec contexte
#[derive(Debug, Clone, Serialize)]
pub struct ExportError {
    pub level: ErrorLevel,
    /// Fichier LandXML source
    pub file: String,
    /// Couche concernée (optionnel)
    pub layer: Option<String>,
    /// Entité concernée, ex: nom de la parcelle (optionnel)
    pub entity: Option<String>,
    pub message: String,
}

/// Statistiques par couche
#[derive(Debug, Clone, Default, Serialize)]
pub struct LayerStats {
    /// Nombre de features écrites
    pub exported: usize,
    /// Nombre de fichiers dont la couche s'est arrêtée sur une erreur
    pub errors: usize,
}

/// Résultat de l'export d'un fichier, fusionné dans le rapport
#[derive(Debug, Clone, Default)]
pub struct FileOutcome {
    pub file: String,
    pub checksum: Option<String>,
    pub exported: Vec<(String, usize)>,
    pub errors: Vec<ExportError>,
}

/// Rapport complet d'export
#[derive(Debug, Clone, Serialize)]
pub struct ExportReport {
    pub duration_secs: f64,
    pub status: ExportStatus,

    pub files_processed: usize,
    pub files_failed: usize,
    pub entities_exported: usize,

    /// Statistiques par couche
    pub by_layer: HashMap<String, LayerStats>,

    /// Checksum blake3 de chaque fichier source
    pub checksums: HashMap<String, String>,

    pub errors: Vec<ExportError>,
}

impl Default for ExportReport {
    fn default() -> Self {
        Self {
            duration_secs: 0.0,
            status: ExportStatus::Success,
            files_processed: 0,
            files_failed: 0,
            entities_exported: 0,
            by_layer: HashMap::new(),
            checksums: HashMap::new(),
            errors: Vec::new(),
        }
    }
}

impl ExportReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enregistre des features écrites pour une couche
    pub fn record_export(&mut self, layer: &str, count: usize) {
        self.entities_exported += count;
        self.by_layer.entry(layer.to_string()).or_default().exported += count;
    }

    /// Enregistre une erreur
    pub fn record_error(&mut self, error: ExportError) {
        if let Some(ref layer) = error.layer {
            self.by_layer.entry(layer.clone()).or_default().errors += 1;
        }
        self.errors.push(error);
    }

    /// Enregistre un fichier illisible
    pub fn record_file_failure(&mut self, file: &str, message: &str) {
        self.files_processed += 1;
        self.files_failed += 1;
        self.errors.push(ExportError {
            level: ErrorLevel::Fatal,
            file: file.to_string(),
            layer: None,
            entity: None,
            message: message.to_string(),
        });
    }

    /// Fusionne le résultat d'un fichier exporté
    pub fn merge(&mut self, outcome: FileOutcome) {
        self.files_processed += 1;
        if let Some(checksum) = outcome.checksum {
            self.checksums.insert(outcome.file.clone(), checksum);
        }
        for (layer, count) in &outcome.exported {
            self.record_export(layer, *count);
        }
        for error in outcome.errors {
            self.record_error(error);
        }
    }

    pub fn set_duration(&mut self, duration: Duration) {
        self.duration_secs = duration.as_secs_f64();
    }

    /// Détermine le statut final basé sur les erreurs
    pub fn finalize(&mut self) {
        let has_errors = !self.errors.is_empty();
        let has_success = self.entities_exported > 0 || self.files_processed > self.files_failed;

        self.status = if has_errors && has_success {
            ExportStatus::PartialSuccess
        } else if has_errors {
            ExportStatus::Failed
        } else {
            ExportStatus::Success
        };
    }

    /// Affiche le rapport sur la console
    pub fn display(&self) {
        println!("\n{}", "=".repeat(60));
        println!("EXPORT REPORT");
        println!("{}", "=".repeat(60));

        println!("\nStatus: {:?}", self.status);
        println!("Duration: {:.2}s", self.duration_secs);

        println!("\n--- SUMMARY ---");
        println!(
            "Files: {} processed, {} failed",
            self.files_processed, self.files_failed
        );
        println!("Entities: {} exported", self.entities_exported);

        if !self.by_layer.is_empty() {
            println!("\n--- BY LAYER ---");
            let mut layers: Vec<_> = self.by_layer.iter().collect();
            layers.sort_by_key(|(k, _)| k.as_str());
            for (name, stats) in layers {
                println!("  {}: {} exported, {} errors", name, stats.exported, stats.errors);
            }
        }

        if !self.errors.is_empty() {
            println!("\n--- ERRORS ({}) ---", self.errors.len());
            for e in self.errors.iter().take(20) {
                let location = match &e.entity {
                    Some(entity) => format!("[{}:{}]", e.file, entity),
                    None => format!("[{}]", e.file),
                };
                println!("  {:?} {} {}", e.level, location, e.message);
            }
            if self.errors.len() > 20 {
                println!("  ... and {} more", self.errors.len() - 20);
            }
        }

        println!("\n{}", "=".repeat(60));
    }

    /// Sauvegarde le rapport en JSON
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Affichage compact pour le résumé
    pub fn summary(&self) -> String {
        format!(
            "{} files, {} exported, {} errors",
            self.files_processed,
            self.entities_exported,
            self.errors.len()
        )
    }
}
