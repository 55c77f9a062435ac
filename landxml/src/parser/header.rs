//! Parser de l'en-tête (système de coordonnées)

use roxmltree::Node;

use super::{attr, Namespace};
use crate::types::CoordinateSystem;

/// Mapping des systèmes de coordonnées LINZ vers EPSG
const COORDINATE_SYSTEMS: &[(&str, u32)] = &[
    ("COLLTM2000", 2114),
    ("COLLTM1949", 27214),
    ("GAWLTM2000", 2125),
    ("GAWLTM1949", 27225),
    ("GREYTM2000", 2118),
    ("GREYTM1949", 27218),
    ("HAWKTM2000", 2108),
    ("HAWKTM1949", 27208),
    ("HOKITM2000", 2121),
    ("HOKITM1949", 27221),
    ("JACKTM2000", 2123),
    ("JACKTM1949", 27223),
    ("KARATM2000", 2116),
    ("KARATM1949", 27216),
    ("LINDTM2000", 2127),
    ("LINDTM1949", 27227),
    ("MARLTM2000", 2120),
    ("MARLTM1949", 27220),
    ("EDENTM2000", 2105),
    ("EDENTM1949", 27205),
    ("PLEATM2000", 2124),
    ("PLEATM1949", 27224),
    ("YORKTM2000", 2129),
    ("YORKTM1949", 27229),
    ("NICHTM2000", 2128),
    ("NICHTM1949", 27228),
    ("NELSTM2000", 2115),
    ("NELSTM1949", 27215),
    ("TAIETM2000", 2131),
    ("TAIETM1949", 27231),
    ("OBSETM2000", 2130),
    ("OBSETM1949", 27230),
    ("OKARTM2000", 2122),
    ("OKARTM1949", 27222),
    ("POVETM2000", 2107),
    ("POVETM1949", 27207),
    ("TARATM2000", 2109),
    ("TARATM1949", 27209),
    ("TIMATM2000", 2126),
    ("TIMATM1949", 27226),
    ("TUHITM2000", 2110),
    ("TUHITM1949", 27210),
    ("WAIRTM2000", 2112),
    ("WAIRTM1949", 27212),
    ("WANGTM2000", 2111),
    ("WANGTM1949", 27211),
    ("WELLTM2000", 2113),
    ("WELLTM1949", 27213),
    ("NZGD1949", 4272),
    ("NZGD2000", 4167),
    ("NZMG", 27200),
    ("NZTM", 2193),
];

/// Code EPSG d'un système de coordonnées, `None` si non répertorié
pub fn epsg_for(name: &str) -> Option<u32> {
    COORDINATE_SYSTEMS
        .iter()
        .find(|&&(known, _)| known == name)
        .map(|&(_, epsg)| epsg)
}

/// Lit l'élément CoordinateSystem sous la racine.
///
/// Un en-tête sans système de coordonnées n'est pas une erreur.
pub fn parse(root: Node, ns: &Namespace) -> Option<CoordinateSystem> {
    let cs = ns.child(root, "CoordinateSystem")?;

    Some(CoordinateSystem {
        name: attr(cs, "name").to_string(),
        description: cs.attribute("desc").map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(xml: &str) -> Option<CoordinateSystem> {
        let doc = roxmltree::Document::parse(xml).unwrap();
        let root = doc.root_element();
        parse(root, &Namespace::from_root(root))
    }

    #[test]
    fn test_epsg_nztm() {
        assert_eq!(epsg_for("NZTM"), Some(2193));
        assert_eq!(epsg_for("NZGD2000"), Some(4167));
        assert_eq!(epsg_for("NZMG"), Some(27200));
    }

    #[test]
    fn test_epsg_circuits() {
        assert_eq!(epsg_for("WELLTM2000"), Some(2113));
        assert_eq!(epsg_for("WELLTM1949"), Some(27213));
        assert_eq!(epsg_for("TAIETM2000"), Some(2131));
        assert_eq!(COORDINATE_SYSTEMS.len(), 52);
    }

    #[test]
    fn test_epsg_unknown() {
        assert_eq!(epsg_for("LAMB93"), None);
        assert_eq!(epsg_for("nztm"), None);
    }

    #[test]
    fn test_parse_header() {
        let cs = header(
            r#"<LandXML xmlns="http://www.landxml.org/schema/LandXML-1.2">
                 <CoordinateSystem name="NZGD2000" desc="New Zealand Geodetic Datum 2000"/>
               </LandXML>"#,
        )
        .unwrap();
        assert_eq!(cs.name, "NZGD2000");
        assert_eq!(
            cs.description.as_deref(),
            Some("New Zealand Geodetic Datum 2000")
        );
    }

    #[test]
    fn test_parse_header_missing() {
        assert!(header("<LandXML><Units/></LandXML>").is_none());
    }
}
