//! Benchmarks pour le parsing LandXML

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use landxml::LandXmlFile;

/// Génère un plan synthétique: une grille de parcelles carrées
fn synthetic_document(side: usize) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0"?>
<LandXML xmlns="http://www.landxml.org/schema/LandXML-1.2">
<CoordinateSystem name="NZTM"/>
<CgPoints>
"#,
    );

    let id = |row: usize, col: usize| row * (side + 1) + col;

    for row in 0..=side {
        for col in 0..=side {
            xml.push_str(&format!(
                "<CgPoint name=\"{}\">{} {}</CgPoint>\n",
                id(row, col),
                5_430_000 + row * 20,
                1_750_000 + col * 20
            ));
        }
    }
    xml.push_str("</CgPoints>\n<Parcels>\n");

    for row in 0..side {
        for col in 0..side {
            let corners = [
                id(row, col),
                id(row, col + 1),
                id(row + 1, col + 1),
                id(row + 1, col),
                id(row, col),
            ];
            xml.push_str(&format!(
                "<Parcel name=\"Lot {} [{}]\" area=\"400\"><CoordGeom>",
                row * side + col,
                row * side + col
            ));
            for pair in corners.windows(2) {
                xml.push_str(&format!(
                    "<Line><Start pntRef=\"{}\"/><End pntRef=\"{}\"/></Line>",
                    pair[0], pair[1]
                ));
            }
            xml.push_str("</CoordGeom></Parcel>\n");
        }
    }
    xml.push_str("</Parcels>\n</LandXML>\n");
    xml
}

fn bench_parse_parcels(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_parcels");

    for side in [10usize, 50] {
        let xml = synthetic_document(side);
        group.throughput(Throughput::Bytes(xml.len() as u64));

        group.bench_with_input(BenchmarkId::from_parameter(side * side), &xml, |b, xml| {
            b.iter(|| {
                let source = LandXmlFile::from_string("bench.xml", black_box(xml.as_str()));
                let doc = source.parse().unwrap();
                let count = doc.parcels().filter(|p| p.is_ok()).count();
                black_box(count)
            })
        });
    }

    group.finish();
}

fn bench_header_only(c: &mut Criterion) {
    let xml = synthetic_document(50);

    c.bench_function("header_and_points", |b| {
        b.iter(|| {
            let source = LandXmlFile::from_string("bench.xml", black_box(xml.as_str()));
            let doc = source.parse().unwrap();
            black_box(doc.points().len())
        })
    });
}

criterion_group!(benches, bench_parse_parcels, bench_header_only);
criterion_main!(benches);
