//! Chargement et décodage des fichiers LandXML

use std::io::Read;
use std::path::Path;

use encoding_rs::Encoding;
use memchr::memmem;

use crate::LandXmlError;

/// Lit un fichier entier en mémoire et le décode en texte.
///
/// Le fichier est fermé avant le décodage, que celui-ci réussisse ou non.
pub fn read(path: &Path) -> Result<String, LandXmlError> {
    let mut data = Vec::new();
    {
        let mut file = std::fs::File::open(path)?;
        file.read_to_end(&mut data)?;
    }

    decode(data, &path.display().to_string())
}

/// Décode le contenu brut.
///
/// Ordre: BOM, UTF-8 valide, encodage déclaré dans le prologue XML, puis
/// Windows-1252 (sur-ensemble d'ISO-8859-1) par défaut.
pub fn decode(data: Vec<u8>, file: &str) -> Result<String, LandXmlError> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(&data) {
        let (decoded, _) = encoding.decode_without_bom_handling(&data[bom_len..]);
        return Ok(decoded.into_owned());
    }

    let data = match String::from_utf8(data) {
        Ok(text) => return Ok(text),
        Err(e) => e.into_bytes(),
    };

    let encoding = match declared_encoding(&data) {
        Some(label) => Encoding::for_label(label.as_bytes()).ok_or_else(|| {
            LandXmlError::Encoding {
                file: file.to_string(),
                label: label.clone(),
            }
        })?,
        None => encoding_rs::WINDOWS_1252,
    };

    let (decoded, _) = encoding.decode_without_bom_handling(&data);
    Ok(decoded.into_owned())
}

/// Extrait l'attribut `encoding` de la déclaration XML
fn declared_encoding(data: &[u8]) -> Option<String> {
    let end = memmem::find(data, b"?>")?;
    let prolog = &data[..end];
    if memmem::find(prolog, b"<?xml").is_none() {
        return None;
    }

    let pos = memmem::find(prolog, b"encoding")?;
    let rest = &prolog[pos + b"encoding".len()..];
    let eq = rest.iter().position(|&b| b == b'=')?;
    let rest = &rest[eq + 1..];
    let quote_pos = rest.iter().position(|&b| b == b'"' || b == b'\'')?;
    let quote = rest[quote_pos];
    let value = &rest[quote_pos + 1..];
    let close = value.iter().position(|&b| b == quote)?;

    std::str::from_utf8(&value[..close])
        .ok()
        .map(|s| s.trim().to_string())
}
