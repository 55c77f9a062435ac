//! Reconstruction des géométries de parcelles depuis un CoordGeom

pub mod chain;
pub mod topology;

use roxmltree::Node;

use crate::parser::segment::SegmentReader;
use crate::types::ParcelGeometry;
use crate::LandXmlError;

/// Construit la géométrie d'un élément CoordGeom.
///
/// Les segments sont lus dans l'ordre du document, joints en chaînes, puis
/// classés en anneaux (MultiPolygon) ou en lignes (MultiLineString).
pub fn build_geometry(
    coord_geom: Node,
    reader: &SegmentReader,
) -> Result<ParcelGeometry, LandXmlError> {
    let segments = coord_geom
        .children()
        .filter(|n| n.is_element())
        .map(|element| reader.read_segment(element))
        .collect::<Result<Vec<_>, _>>()?;

    let chains = chain::join_chains(segments);
    topology::classify(chains)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::points::PointTable;
    use crate::parser::Namespace;
    use crate::types::Point;
    use geo::Coord;

    const NS: &str = "http://www.landxml.org/schema/LandXML-1.2";

    fn build(body: &str, points: &PointTable) -> Result<ParcelGeometry, LandXmlError> {
        let xml = format!(r#"<CoordGeom xmlns="{}">{}</CoordGeom>"#, NS, body);
        let doc = roxmltree::Document::parse(&xml).unwrap();
        let element = doc.root_element();
        let ns = Namespace::from_root(element);
        build_geometry(element, &SegmentReader::new(&ns, points))
    }

    fn line(n0: f64, e0: f64, n1: f64, e1: f64) -> String {
        format!(
            "<Line><Start>{} {}</Start><End>{} {}</End></Line>",
            n0, e0, n1, e1
        )
    }

    #[test]
    fn test_square_from_lines() {
        let body = [
            line(0.0, 0.0, 0.0, 10.0),
            line(0.0, 10.0, 10.0, 10.0),
            line(10.0, 10.0, 10.0, 0.0),
            line(10.0, 0.0, 0.0, 0.0),
        ]
        .concat();

        let geometry = build(&body, &PointTable::new("t.xml")).unwrap();
        let ParcelGeometry::MultiPolygon(mp) = geometry else {
            panic!("Expected MultiPolygon");
        };
        assert_eq!(mp.0.len(), 1);
        assert!(mp.0[0].interiors().is_empty());
        assert_eq!(
            mp.0[0].exterior().0,
            vec![
                Coord { x: 0.0, y: 0.0 },
                Coord { x: 10.0, y: 0.0 },
                Coord { x: 10.0, y: 10.0 },
                Coord { x: 0.0, y: 10.0 },
                Coord { x: 0.0, y: 0.0 },
            ]
        );
    }

    #[test]
    fn test_ring_from_point_references() {
        let mut points = PointTable::new("t.xml");
        for (id, x, y) in [("a", 0.0, 0.0), ("b", 5.0, 0.0), ("c", 5.0, 5.0)] {
            points.register(Point {
                id: id.to_string(),
                coord: Coord { x, y },
                order: String::new(),
                point_type: String::new(),
            });
        }

        let body = r#"
            <Line><Start pntRef="a"/><End pntRef="b"/></Line>
            <Curve rot="ccw"><Start pntRef="b"/><Center>0 0</Center><End pntRef="c"/></Curve>
            <Line><Start pntRef="c"/><End pntRef="a"/></Line>"#;

        let geometry = build(body, &points).unwrap();
        assert_eq!(geometry.geom_type(), "MultiPolygon");
    }

    #[test]
    fn test_disconnected_lines() {
        let body = [line(0.0, 0.0, 0.0, 10.0), line(50.0, 50.0, 60.0, 60.0)].concat();
        let geometry = build(&body, &PointTable::new("t.xml")).unwrap();
        let ParcelGeometry::MultiLineString(mls) = geometry else {
            panic!("Expected MultiLineString");
        };
        assert_eq!(mls.0.len(), 2);
    }

    #[test]
    fn test_missing_reference_propagates() {
        let body = r#"<Line><Start pntRef="nope"/><End>0 0</End></Line>"#;
        let err = build(body, &PointTable::new("t.xml")).unwrap_err();
        assert!(matches!(err, LandXmlError::MissingPointReference { .. }));
    }

    #[test]
    fn test_unsupported_element() {
        let body = r#"<Spiral length="10"/>"#;
        let err = build(body, &PointTable::new("t.xml")).unwrap_err();
        assert!(matches!(err, LandXmlError::UnsupportedGeometry { ref tag } if tag == "Spiral"));
    }
}
