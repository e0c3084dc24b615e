//! Tabular export of an element tree: one table of flame parameters
//! over the valid elements, one table of cached statistics with the
//! derived framing values appended.

use itertools::Itertools;

use crate::model::Element;

/// Build the CSV rows.  The two leading columns of every row are the
/// element's traversal depth and its index among its siblings.
pub fn table(root: &Element) -> Vec<String> {
    let mut rows: Vec<String> = vec![];
    root.traverse(&mut |elt, depth, number| {
        if elt.is_valid() {
            if rows.is_empty() {
                let bv = (0..elt.varias.len()).map(|i| format!("b{}", i)).join(", ");
                rows.push(format!("#, %, a, b, c, d, tx, ty, {}, h", bv));
            }
            for flame in &elt.flames {
                let m = flame.affine.flatten();
                let mut fields: Vec<f64> = vec![m.a, m.b, m.c, m.d, m.tx, m.ty];
                fields.extend(flame.blend.iter().cloned());
                fields.push(flame.color);
                let line = fields.iter().map(|v| v.to_string()).join(", ");
                rows.push(format!("{}, {}, {}", depth, number, line));
            }
        }
    });
    rows.push("#, %, xmin, xmax, ymin, ymax, vmin, vmax, Tx, Ty, Scale, Vspan".to_string());
    root.traverse(&mut |elt, depth, number| {
        if let Some(stat) = elt.stat {
            let tx = -stat.x.center();
            let ty = -stat.y.center();
            let scale = (2.0 / stat.x.value()).min(2.0 / stat.y.value());
            let fields = vec![
                stat.x.min,
                stat.x.max,
                stat.y.min,
                stat.y.max,
                stat.v.min,
                stat.v.max,
                tx,
                ty,
                scale,
                stat.v.value(),
            ];
            let line = fields.iter().map(|v| v.to_string()).join(", ");
            rows.push(format!("{}, {}, {}", depth, number, line));
        }
    });
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::affine::{Affine, Matrix};
    use crate::model::{Flame, Stat};
    use crate::span::Span;
    use crate::variation::Varia;

    fn leaf() -> Element {
        let mut e = Element::new();
        e.varias = vec![Varia::named("Linear"), Varia::named("Spherical")];
        e.flames = vec![Flame {
            affine: Affine::Matrix(Matrix::new(1.0, 0.0, 0.0, 1.0, 0.5, -0.5)),
            blend: vec![0.25, 0.75],
            color: 0.1,
        }];
        e.stat = Some(Stat {
            x: Span::new(0.0, 2.0),
            y: Span::new(1.0, 5.0),
            v: Span::new(0.0, 3.0),
        });
        e
    }

    #[test]
    fn header_names_one_blend_column_per_variation() {
        let mut root = Element::new();
        root.add(leaf());
        let rows = table(&root);
        assert_eq!(rows[0], "#, %, a, b, c, d, tx, ty, b0, b1, h");
    }

    #[test]
    fn flame_rows_carry_depth_and_number() {
        let mut root = Element::new();
        root.add(leaf());
        root.add(leaf());
        let rows = table(&root);
        assert!(rows[1].starts_with("1, 0, "));
        assert!(rows[2].starts_with("1, 1, "));
    }

    #[test]
    fn stat_rows_append_the_framing_values() {
        let mut root = Element::new();
        root.add(leaf());
        let rows = table(&root);
        let stat_header = rows
            .iter()
            .position(|r| r.contains("xmin"))
            .expect("stat header");
        let stat_row = &rows[stat_header + 1];
        // recentering offsets, then the fit scale min(2/2, 2/4) = 0.5
        assert!(stat_row.ends_with("-1, -3, 0.5, 3"), "row was: {}", stat_row);
    }

    #[test]
    fn invalid_elements_are_excluded() {
        let root = Element::new();
        let rows = table(&root);
        // only the stat header appears for an empty tree
        assert_eq!(rows.len(), 1);
        assert!(rows[0].contains("xmin"));
    }
}
