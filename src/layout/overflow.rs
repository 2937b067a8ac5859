use super::types::{LabelPlacement, TextItem, Viewport};

/// Grows the viewport to cover inline labels that spill past either container edge.
pub fn viewport_for_labels(
    labels: &[LabelPlacement],
    width: f64,
    height: f64,
    tolerance: f64,
) -> Viewport {
    let fixed = Viewport {
        min_x: 0.0,
        width,
        height,
        expanded: false,
    };
    let bounds = labels.iter().fold(None, |acc: Option<(f64, f64)>, label| {
        let half = label.inner_width / 2.0;
        let (left, right) = (label.x - half, label.x + half);
        Some(match acc {
            Some((min, max)) => (min.min(left), max.max(right)),
            None => (left, right),
        })
    });
    let Some((left, right)) = bounds else {
        return fixed;
    };
    if right <= width + tolerance && left >= -tolerance {
        return fixed;
    }
    let min_x = left.min(0.0);
    Viewport {
        min_x,
        width: width.max(right) - min_x,
        height,
        expanded: true,
    }
}

/// Two centered titles collide when their horizontal extents overlap.
pub fn titles_overlap(a: &TextItem, a_width: f64, b: &TextItem, b_width: f64) -> bool {
    (a.x - b.x).abs() < (a_width + b_width) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::types::TextAnchor;

    fn label(x: f64, inner_width: f64) -> LabelPlacement {
        LabelPlacement {
            feature: 0,
            text: String::new(),
            effect: -1.0,
            text_x: 0.0,
            anchor_x: x - inner_width / 2.0,
            x,
            y: 98.0,
            left: x - inner_width / 2.0,
            right: x + inner_width / 2.0,
            width: inner_width,
            inner_width,
            fill: String::new(),
        }
    }

    fn title(x: f64) -> TextItem {
        TextItem {
            text: "t".into(),
            x,
            y: 28.0,
            anchor: TextAnchor::Middle,
            font_size: 12.0,
            fill: "#000".into(),
            opacity: 0.5,
        }
    }

    #[test]
    fn labels_inside_container_keep_viewport() {
        let vp = viewport_for_labels(&[label(200.0, 40.0)], 400.0, 150.0, 1.0);
        assert!(!vp.expanded);
        assert_eq!((vp.min_x, vp.width), (0.0, 400.0));
        let vp = viewport_for_labels(&[label(380.5, 40.0)], 400.0, 150.0, 1.0);
        assert!(!vp.expanded);
    }

    #[test]
    fn overflow_to_the_right_widens() {
        let vp = viewport_for_labels(&[label(420.0, 40.0)], 400.0, 150.0, 1.0);
        assert!(vp.expanded);
        assert_eq!(vp.min_x, 0.0);
        assert_eq!(vp.width, 440.0);
    }

    #[test]
    fn overflow_to_the_left_shifts_origin() {
        let vp = viewport_for_labels(&[label(0.0, 40.0), label(200.0, 10.0)], 400.0, 150.0, 1.0);
        assert!(vp.expanded);
        assert_eq!(vp.min_x, -20.0);
        assert_eq!(vp.width, 420.0);
    }

    #[test]
    fn no_labels_no_overflow() {
        assert!(!viewport_for_labels(&[], 400.0, 150.0, 1.0).expanded);
    }

    #[test]
    fn title_overlap() {
        assert!(titles_overlap(&title(200.0), 60.0, &title(200.0), 24.0));
        assert!(titles_overlap(&title(200.0), 60.0, &title(240.0), 24.0));
        assert!(!titles_overlap(&title(200.0), 60.0, &title(243.0), 24.0));
    }
}
