//! Queue input: every ASCII digit in the text is one shape id.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use dropline_core::{ShapeCatalog, ShapeId};
use log::warn;

/// Shape ids in reading order. Zeros are skipped; ids `catalog` cannot draw
/// (no polygon or no colour) are skipped with a warning. Everything that is
/// not a digit is ignored.
pub fn parse_queue(text: &str, catalog: &ShapeCatalog) -> Vec<ShapeId> {
    let mut shapes = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        for digit in line.chars().filter_map(|c| c.to_digit(10)) {
            if digit == 0 {
                continue;
            }
            let id = ShapeId(digit as u16);
            if !catalog.is_valid(id) {
                warn!("line {}: shape {} is not valid in the catalog, skipped", line_no + 1, id);
                continue;
            }
            shapes.push(id);
        }
    }
    shapes
}

pub fn read_queue(path: &Path, catalog: &ShapeCatalog) -> Result<Vec<ShapeId>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading queue from {}", path.display()))?;
    Ok(parse_queue(&text, catalog))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(shapes: &[ShapeId]) -> Vec<u16> {
        shapes.iter().map(|s| s.0).collect()
    }

    #[test]
    fn test_digits_only() {
        let catalog = ShapeCatalog::standard();
        let shapes = parse_queue("5, 4\n2 1\n", &catalog);
        assert_eq!(ids(&shapes), vec![5, 4, 2, 1]);
    }

    #[test]
    fn test_zeros_are_dropped() {
        let catalog = ShapeCatalog::standard();
        assert_eq!(ids(&parse_queue("1020 03", &catalog)), vec![1, 2, 3]);
    }

    #[test]
    fn test_adjacent_digits_are_separate_pieces() {
        let catalog = ShapeCatalog::standard();
        assert_eq!(ids(&parse_queue("367\n67", &catalog)), vec![3, 6, 7, 6, 7]);
    }

    #[test]
    fn test_unknown_shapes_are_dropped() {
        let standard = ShapeCatalog::standard();
        assert_eq!(ids(&parse_queue("8 1 9 2", &standard)), vec![1, 2]);
        let extended = ShapeCatalog::extended();
        assert_eq!(ids(&parse_queue("8 1 9 2", &extended)), vec![8, 1, 9, 2]);
    }

    #[test]
    fn test_shapes_without_colour_are_dropped() {
        let mut catalog = ShapeCatalog::standard();
        catalog
            .insert(ShapeId(8), &[(0, 0), (1, 0), (1, 1), (0, 1)])
            .expect("unit square");
        assert!(catalog.template(ShapeId(8)).is_ok());
        assert_eq!(ids(&parse_queue("1 8 2", &catalog)), vec![1, 2]);

        catalog.set_color(ShapeId(8), "#AAAAAA");
        assert_eq!(ids(&parse_queue("1 8 2", &catalog)), vec![1, 8, 2]);
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_queue("no pieces here\n", &ShapeCatalog::standard()).is_empty());
    }
}
