//! DXF export for flat patterns.
//!
//! Writes DXF R12 text for laser cutting and press-brake services:
//! - Sheet outline (layer "0", closed LWPOLYLINE)
//! - Fold lines (layer "1", LINE)
//! - Direction ticks (layer "2", LINE)
//!
//! Coordinates are sheet millimeters, unscaled.

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crease_kernel_drafting::{
    DrawEntity, EntityKind, Point2D, FOLD_LAYER, OUTLINE_LAYER, TICK_LAYER,
};

/// Layer table entries as `(layer, ACI color)`.
const LAYERS: [(u32, u32); 3] = [(OUTLINE_LAYER, 7), (FOLD_LAYER, 5), (TICK_LAYER, 3)];

/// DXF writer over an ordered flat-pattern entity list.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatPatternDxf {
    entities: Vec<DrawEntity>,
    precision: usize,
}

impl FlatPatternDxf {
    /// Writer for `entities`, 6 decimal places.
    pub fn new(entities: Vec<DrawEntity>) -> Self {
        Self {
            entities,
            precision: 6,
        }
    }

    /// Set the number of decimal places written per coordinate.
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// Entities in output order.
    pub fn entities(&self) -> &[DrawEntity] {
        &self.entities
    }

    /// Export to DXF file.
    pub fn export(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)?;
        writer.flush()
    }

    /// DXF content as bytes.
    pub fn to_bytes(&self) -> std::io::Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(buffer)
    }

    /// Write the full document: header, layer table, entities.
    pub fn write_to(&self, mut writer: impl Write) -> std::io::Result<()> {
        self.write_header(&mut writer)?;
        self.write_tables(&mut writer)?;
        self.write_entities(&mut writer)?;

        writeln!(writer, "0")?;
        writeln!(writer, "EOF")?;
        Ok(())
    }

    fn write_header(&self, writer: &mut impl Write) -> std::io::Result<()> {
        writeln!(writer, "0")?;
        writeln!(writer, "SECTION")?;
        writeln!(writer, "2")?;
        writeln!(writer, "HEADER")?;

        writeln!(writer, "9")?;
        writeln!(writer, "$ACADVER")?;
        writeln!(writer, "1")?;
        writeln!(writer, "AC1009")?; // DXF R12

        writeln!(writer, "9")?;
        writeln!(writer, "$INSUNITS")?;
        writeln!(writer, "70")?;
        writeln!(writer, "4")?; // Millimeters

        writeln!(writer, "0")?;
        writeln!(writer, "ENDSEC")?;
        Ok(())
    }

    fn write_tables(&self, writer: &mut impl Write) -> std::io::Result<()> {
        writeln!(writer, "0")?;
        writeln!(writer, "SECTION")?;
        writeln!(writer, "2")?;
        writeln!(writer, "TABLES")?;

        self.write_ltype_table(writer)?;

        writeln!(writer, "0")?;
        writeln!(writer, "TABLE")?;
        writeln!(writer, "2")?;
        writeln!(writer, "LAYER")?;
        writeln!(writer, "70")?;
        writeln!(writer, "{}", LAYERS.len())?;

        for (layer, color) in LAYERS {
            writeln!(writer, "0")?;
            writeln!(writer, "LAYER")?;
            writeln!(writer, "2")?;
            writeln!(writer, "{layer}")?;
            writeln!(writer, "70")?;
            writeln!(writer, "0")?;
            writeln!(writer, "62")?;
            writeln!(writer, "{color}")?;
            writeln!(writer, "6")?;
            writeln!(writer, "CONTINUOUS")?;
        }

        writeln!(writer, "0")?;
        writeln!(writer, "ENDTAB")?;
        writeln!(writer, "0")?;
        writeln!(writer, "ENDSEC")?;
        Ok(())
    }

    /// The CONTINUOUS linetype every layer references.
    fn write_ltype_table(&self, writer: &mut impl Write) -> std::io::Result<()> {
        writeln!(writer, "0")?;
        writeln!(writer, "TABLE")?;
        writeln!(writer, "2")?;
        writeln!(writer, "LTYPE")?;
        writeln!(writer, "70")?;
        writeln!(writer, "1")?;

        writeln!(writer, "0")?;
        writeln!(writer, "LTYPE")?;
        writeln!(writer, "2")?;
        writeln!(writer, "CONTINUOUS")?;
        writeln!(writer, "70")?;
        writeln!(writer, "0")?;
        writeln!(writer, "3")?;
        writeln!(writer, "Solid line")?;
        writeln!(writer, "72")?;
        writeln!(writer, "65")?;
        writeln!(writer, "73")?;
        writeln!(writer, "0")?;
        writeln!(writer, "40")?;
        writeln!(writer, "0.0")?;

        writeln!(writer, "0")?;
        writeln!(writer, "ENDTAB")?;
        Ok(())
    }

    fn write_entities(&self, writer: &mut impl Write) -> std::io::Result<()> {
        writeln!(writer, "0")?;
        writeln!(writer, "SECTION")?;
        writeln!(writer, "2")?;
        writeln!(writer, "ENTITIES")?;

        for entity in &self.entities {
            match entity.kind {
                EntityKind::Outline => self.write_polyline(writer, entity)?,
                EntityKind::Fold | EntityKind::Tick => self.write_lines(writer, entity)?,
            }
        }

        writeln!(writer, "0")?;
        writeln!(writer, "ENDSEC")?;
        Ok(())
    }

    fn write_polyline(&self, writer: &mut impl Write, entity: &DrawEntity) -> std::io::Result<()> {
        let mut points = entity.points.as_slice();
        // a repeated first point becomes the closed flag
        let closed = points.len() > 2 && points.first() == points.last();
        if closed {
            points = &points[..points.len() - 1];
        }

        writeln!(writer, "0")?;
        writeln!(writer, "LWPOLYLINE")?;
        writeln!(writer, "8")?;
        writeln!(writer, "{}", entity.layer)?;
        writeln!(writer, "90")?;
        writeln!(writer, "{}", points.len())?;
        writeln!(writer, "70")?;
        writeln!(writer, "{}", u8::from(closed))?;

        for p in points {
            self.write_coord(writer, 10, p)?;
        }
        Ok(())
    }

    /// One LINE per consecutive point pair.
    fn write_lines(&self, writer: &mut impl Write, entity: &DrawEntity) -> std::io::Result<()> {
        for pair in entity.points.windows(2) {
            writeln!(writer, "0")?;
            writeln!(writer, "LINE")?;
            writeln!(writer, "8")?;
            writeln!(writer, "{}", entity.layer)?;
            self.write_coord(writer, 10, &pair[0])?;
            self.write_coord(writer, 11, &pair[1])?;
        }
        Ok(())
    }

    fn write_coord(&self, writer: &mut impl Write, code: u32, p: &Point2D) -> std::io::Result<()> {
        let prec = self.precision;
        writeln!(writer, "{code}")?;
        writeln!(writer, "{:.*}", prec, p.x)?;
        writeln!(writer, "{}", code + 10)?;
        writeln!(writer, "{:.*}", prec, p.y)?;
        Ok(())
    }
}

impl fmt::Display for FlatPatternDxf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.to_bytes().map_err(|_| fmt::Error)?;
        f.write_str(&String::from_utf8_lossy(&bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crease_ir::FoldSpec;
    use crease_kernel_drafting::{emit_flat_pattern, FlatPatternOptions};
    use std::fs;

    fn pattern(spec: &FoldSpec) -> FlatPatternDxf {
        FlatPatternDxf::new(emit_flat_pattern(spec, &FlatPatternOptions::default()))
    }

    #[test]
    fn test_dxf_structure() {
        let content = pattern(&FoldSpec::default()).to_string();
        assert!(content.starts_with("0\nSECTION\n2\nHEADER\n"));
        assert!(content.contains("$ACADVER\n1\nAC1009\n"));
        assert!(content.contains("$INSUNITS\n70\n4\n"));
        assert!(content.contains("TABLES"));
        assert!(content.contains("ENTITIES"));
        assert!(content.ends_with("0\nEOF\n"));
        for layer in ["2\n0\n70", "2\n1\n70", "2\n2\n70"] {
            assert!(content.contains(layer), "missing layer entry {layer:?}");
        }
    }

    #[test]
    fn test_linetype_defined_before_layers() {
        let content = pattern(&FoldSpec::default()).to_string();
        let ltype = content
            .find("0\nLTYPE\n2\nCONTINUOUS\n")
            .expect("CONTINUOUS linetype entry");
        let layers = content.find("TABLE\n2\nLAYER\n").unwrap();
        assert!(ltype < layers);
        assert_eq!(content.matches("6\nCONTINUOUS\n").count(), 3);
        assert_eq!(content.matches("ENDTAB").count(), 2);
    }

    #[test]
    fn test_outline_is_closed_four_vertex_polyline() {
        let content = pattern(&FoldSpec::default()).to_string();
        assert_eq!(content.matches("LWPOLYLINE").count(), 1);
        assert!(content.contains("LWPOLYLINE\n8\n0\n90\n4\n70\n1\n"));
        assert!(content.contains("10\n300.000000\n20\n200.000000\n"));
        assert!(!content.contains("\nLINE\n"));
    }

    #[test]
    fn test_fold_and_tick_lines() {
        let mut spec = FoldSpec::default();
        spec.add_fold_line().unwrap();
        let content = pattern(&spec).with_precision(1).to_string();

        assert_eq!(content.matches("\nLINE\n").count(), 2);
        assert!(content.contains(
            "LINE\n8\n1\n10\n0.0\n20\n100.0\n11\n300.0\n21\n100.0\n"
        ));
        assert!(content.contains(
            "LINE\n8\n2\n10\n150.0\n20\n100.0\n11\n150.0\n21\n90.0\n"
        ));
        // fold precedes its tick
        let fold = content.find("LINE\n8\n1\n").unwrap();
        let tick = content.find("LINE\n8\n2\n").unwrap();
        assert!(fold < tick);
    }

    #[test]
    fn test_export_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flat.dxf");
        let doc = pattern(&FoldSpec::default());
        doc.export(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), doc.to_string());
    }
}
