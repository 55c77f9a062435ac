//! Définition et implémentation des commandes CLI
//!
//! - `info`: système de coordonnées et comptages d'un plan
//! - `to-geojson`: LandXML → GeoJSON, un dossier par fichier source

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Subcommand;
use rayon::prelude::*;
use tracing::{info, warn};

use landxml::LandXmlFile;
use landxml_cli::config::Config;
use landxml_cli::export::export_file;
use landxml_cli::report::{ExportReport, ExportStatus, FileOutcome};

/// Variable d'environnement donnant la configuration par défaut
const CONFIG_ENV: &str = "LANDXML_CONFIG";

#[derive(Subcommand)]
pub enum Commands {
    /// Show the coordinate system and entity counts of a LandXML file
    Info {
        /// Path to a LandXML file
        #[arg(short, long)]
        path: PathBuf,
    },

    /// Export monuments and parcels to GeoJSON
    ToGeojson {
        /// Path to a LandXML file or a directory of .xml files
        #[arg(short, long)]
        path: PathBuf,

        /// Output directory for GeoJSON files
        #[arg(short, long)]
        output: PathBuf,

        /// Config preset name (full/minimal) or path to a JSON config
        /// (default: env LANDXML_CONFIG, then full)
        #[arg(long)]
        config: Option<String>,

        /// Write the export report as JSON to this file
        #[arg(long)]
        report: Option<PathBuf>,

        /// Maximum number of files processed concurrently
        #[arg(long, alias = "threads")]
        jobs: Option<usize>,
    },
}

/// Exécute la commande info
pub fn cmd_info(path: &Path) -> Result<()> {
    let source = LandXmlFile::open(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let doc = source
        .parse()
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    println!("=== {} ===", path.display());
    match doc.coordinate_system() {
        Some(cs) => {
            println!("Coordinate system: {}", cs.name);
            if let Some(ref desc) = cs.description {
                println!("Description: {}", desc);
            }
            match doc.coordinate_system_epsg_id() {
                Some(epsg) => println!("EPSG: {}", epsg),
                None => println!("EPSG: unknown"),
            }
        }
        None => println!("Coordinate system: none"),
    }
    println!("Points: {}", doc.points().len());

    let monuments = count_entities(doc.monuments(), "monuments");
    let parcels = count_entities(doc.parcels(), "parcels");
    println!("Monuments: {}", monuments);
    println!("Parcels: {}", parcels);

    Ok(())
}

/// Compte les entités lisibles, jusqu'à la première erreur
fn count_entities<T>(
    entities: impl Iterator<Item = Result<T, landxml::LandXmlError>>,
    layer: &str,
) -> usize {
    let mut count = 0;
    for entity in entities {
        match entity {
            Ok(_) => count += 1,
            Err(e) => {
                warn!(layer, "Stopped after {} entities: {}", count, e);
                break;
            }
        }
    }
    count
}

/// Exécute la commande to-geojson
pub fn cmd_export(
    path: &Path,
    output: &Path,
    config_spec: Option<&str>,
    report_path: Option<&Path>,
    jobs: Option<usize>,
) -> Result<()> {
    let started_at = Instant::now();
    let config = load_config(config_spec)?;

    let files = collect_files(path)?;
    if files.is_empty() {
        anyhow::bail!("No LandXML files (.xml) found in {}", path.display());
    }

    std::fs::create_dir_all(output)?;
    info!("Found {} files to export", files.len());

    let results = match jobs {
        Some(jobs) => rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()?
            .install(|| export_files(path, &files, output, &config)),
        None => export_files(path, &files, output, &config),
    };

    let mut report = ExportReport::new();
    for (file, result) in results {
        match result {
            Ok(outcome) => report.merge(outcome),
            Err(e) => {
                warn!("Failed to export {}: {:#}", file.display(), e);
                report.record_file_failure(&file.display().to_string(), &format!("{:#}", e));
            }
        }
    }

    report.set_duration(started_at.elapsed());
    report.finalize();
    report.display();

    if let Some(report_path) = report_path {
        report
            .save_to_file(report_path)
            .with_context(|| format!("Failed to write report {}", report_path.display()))?;
        info!("Report saved to {}", report_path.display());
    }

    println!("Export complete: {}", report.summary());

    if report.status == ExportStatus::Failed {
        anyhow::bail!("Export failed");
    }

    Ok(())
}

/// Preset ou fichier de configuration, avec repli sur l'environnement
fn load_config(spec: Option<&str>) -> Result<Config> {
    let spec = spec
        .map(str::to_string)
        .or_else(|| std::env::var(CONFIG_ENV).ok())
        .unwrap_or_else(|| "full".to_string());

    Config::resolve(&spec).with_context(|| format!("Invalid config '{}'", spec))
}

/// Exporte les fichiers en parallèle
fn export_files(
    root: &Path,
    files: &[PathBuf],
    output: &Path,
    config: &Config,
) -> Vec<(PathBuf, Result<FileOutcome>)> {
    files
        .par_iter()
        .map(|file| (file.clone(), process_file_for_export(root, file, output, config)))
        .collect()
}

/// Traite un fichier pour l'export
fn process_file_for_export(
    root: &Path,
    path: &Path,
    output: &Path,
    config: &Config,
) -> Result<FileOutcome> {
    let file_output = output.join(output_subdir(root, path));
    let mut outcome = export_file(path, &file_output, config)?;

    outcome.checksum = match compute_file_checksum(path) {
        Ok(checksum) => Some(checksum),
        Err(e) => {
            warn!("Failed to compute checksum for {}: {}", path.display(), e);
            None
        }
    };

    Ok(outcome)
}

/// Dossier de sortie d'un fichier: son chemin relatif à la racine parcourue,
/// sans extension, pour que `a/plan.xml` et `b/plan.xml` restent distincts
fn output_subdir(root: &Path, file: &Path) -> PathBuf {
    match file.strip_prefix(root) {
        Ok(relative) if !relative.as_os_str().is_empty() => relative.with_extension(""),
        _ => PathBuf::from(get_file_basename(file)),
    }
}

/// Extrait le nom de base d'un fichier (sans .xml)
fn get_file_basename(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown")
        .to_string()
}

fn is_xml(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ext.eq_ignore_ascii_case("xml"))
}

/// Collecte récursivement les fichiers LandXML
fn collect_files(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files = Vec::new();
    let entries = std::fs::read_dir(path).with_context(|| format!("Cannot read {}", path.display()))?;
    for entry in entries {
        let entry_path = entry?.path();

        if entry_path.is_dir() {
            files.extend(collect_files(&entry_path)?);
        } else if is_xml(&entry_path) {
            files.push(entry_path);
        }
    }

    files.sort();
    Ok(files)
}

/// Empreinte blake3 du fichier source, consignée dans le rapport
fn compute_file_checksum(path: &Path) -> Result<String> {
    let file = std::fs::File::open(path).with_context(|| format!("Cannot open {}", path.display()))?;
    let mut hasher = blake3::Hasher::new();
    hasher
        .update_reader(file)
        .with_context(|| format!("Cannot read {}", path.display()))?;

    Ok(hasher.finalize().to_hex().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_file_basename() {
        assert_eq!(get_file_basename(Path::new("/plans/DP 12345.xml")), "DP 12345");
        assert_eq!(get_file_basename(Path::new("survey.XML")), "survey");
        assert_eq!(get_file_basename(Path::new("noextension")), "noextension");
    }

    #[test]
    fn test_output_subdir() {
        let root = Path::new("/plans");
        assert_eq!(
            output_subdir(root, Path::new("/plans/a/plan.xml")),
            PathBuf::from("a/plan")
        );
        assert_eq!(
            output_subdir(root, Path::new("/plans/b/plan.xml")),
            PathBuf::from("b/plan")
        );
        assert_eq!(output_subdir(root, Path::new("/plans/DP 1.2.xml")), PathBuf::from("DP 1.2"));

        // Fichier passé directement
        let file = Path::new("/plans/plan.xml");
        assert_eq!(output_subdir(file, file), PathBuf::from("plan"));
    }

    #[test]
    fn test_export_same_name_in_subdirectories() {
        let root = std::env::temp_dir().join("landxml_same_name_input");
        let output = std::env::temp_dir().join("landxml_same_name_output");
        std::fs::remove_dir_all(&root).ok();
        std::fs::remove_dir_all(&output).ok();

        for (dir, mark) in [("a", "PEG A"), ("b", "PEG B")] {
            std::fs::create_dir_all(root.join(dir)).unwrap();
            std::fs::write(
                root.join(dir).join("plan.xml"),
                format!(
                    r#"<LandXML><CgPoints><CgPoint name="1">0 0</CgPoint></CgPoints>
                       <Monuments><Monument name="{}" pntRef="1"/></Monuments></LandXML>"#,
                    mark
                ),
            )
            .unwrap();
        }

        cmd_export(&root, &output, Some("full"), None, Some(2)).unwrap();

        for (dir, mark) in [("a", "PEG A"), ("b", "PEG B")] {
            let content =
                std::fs::read_to_string(output.join(dir).join("plan").join("monuments.geojson"))
                    .unwrap();
            let value: serde_json::Value = serde_json::from_str(&content).unwrap();
            assert_eq!(value["features"][0]["properties"]["name"], mark);
        }

        std::fs::remove_dir_all(root).ok();
        std::fs::remove_dir_all(output).ok();
    }

    #[test]
    fn test_collect_files() {
        let root = std::env::temp_dir().join("landxml_collect_test");
        let nested = root.join("nested");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(root.join("a.xml"), "<LandXML/>").unwrap();
        std::fs::write(nested.join("b.XML"), "<LandXML/>").unwrap();
        std::fs::write(root.join("notes.txt"), "").unwrap();

        let files = collect_files(&root).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|f| is_xml(f)));

        // Un fichier explicite est accepté quelle que soit son extension
        assert_eq!(collect_files(&root.join("notes.txt")).unwrap().len(), 1);

        std::fs::remove_dir_all(root).ok();
    }

    #[test]
    fn test_compute_file_checksum() {
        let path = std::env::temp_dir().join("landxml_checksum_test.xml");
        std::fs::write(&path, b"<LandXML/>").unwrap();

        let checksum = compute_file_checksum(&path).unwrap();
        assert_eq!(checksum, blake3::hash(b"<LandXML/>").to_hex().to_string());
        assert_eq!(checksum.len(), 64);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_config_explicit_spec() {
        let config = load_config(Some("minimal")).unwrap();
        assert!(config.get_layer_config("monuments").is_none());
        assert!(load_config(Some("/does/not/exist.json")).is_err());
    }
}
