//! ASCII plotting of a precision-recall curve for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid with fixed axes: recall
//! `[0, 1]` across, precision `[0, 1.05]` up), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - post-step precision level: `-`
//! - vertical step edges: `|`
//! - filled area under the curve: `:`

use crate::domain::PrCurve;

pub const RECALL_RANGE: (f64, f64) = (0.0, 1.0);
pub const PRECISION_RANGE: (f64, f64) = (0.0, 1.05);

/// Render the curve with a short header (title, average precision, axes).
pub fn render_pr_ascii(curve: &PrCurve, title: &str, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let mut grid = vec![vec![' '; width]; height];
    let mut prev_top: Option<usize> = None;

    for x in 0..width {
        let recall = RECALL_RANGE.0 + (x as f64 / (width as f64 - 1.0)) * (RECALL_RANGE.1 - RECALL_RANGE.0);
        let Some(precision) = step_precision(curve, recall) else {
            prev_top = None;
            continue;
        };

        let top = map_y(precision, height);
        grid[top][x] = '-';
        for row in grid.iter_mut().skip(top + 1) {
            row[x] = ':';
        }
        if let Some(prev) = prev_top {
            for row in grid.iter_mut().take(prev.max(top)).skip(prev.min(top) + 1) {
                if row[x] == ' ' {
                    row[x] = '|';
                }
            }
        }
        prev_top = Some(top);
    }

    let mut out = String::new();
    out.push_str(&format!("{title}: AP={:.4}\n", curve.average_precision));
    out.push_str(&format!(
        "Precision [{:.2}, {:.2}] vs Recall [{:.2}, {:.2}]\n",
        PRECISION_RANGE.0, PRECISION_RANGE.1, RECALL_RANGE.0, RECALL_RANGE.1
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out
}

/// Precision held over `recall` by a post-step drawing of the curve.
///
/// The curve runs in decreasing recall; point `i` holds its precision from
/// `recall[i]` down to `recall[i + 1]`. Zero-width steps are skipped.
pub fn step_precision(curve: &PrCurve, recall: f64) -> Option<f64> {
    let r = &curve.recall;
    let p = &curve.precision;
    (0..r.len().saturating_sub(1))
        .find(|&i| r[i] > r[i + 1] && r[i + 1] <= recall && recall <= r[i])
        .map(|i| p[i])
}

fn map_y(precision: f64, height: usize) -> usize {
    let (lo, hi) = PRECISION_RANGE;
    let u = ((precision - lo) / (hi - lo)).clamp(0.0, 1.0);
    // Row 0 is the top.
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_curve() -> PrCurve {
        PrCurve {
            precision: vec![2.0 / 3.0, 0.5, 1.0, 1.0],
            recall: vec![1.0, 0.5, 0.5, 0.0],
            thresholds: vec![0.35, 0.4, 0.8],
            average_precision: 5.0 / 6.0,
        }
    }

    #[test]
    fn step_lookup_follows_post_steps() {
        let curve = reference_curve();
        assert_eq!(step_precision(&curve, 0.25), Some(1.0));
        assert_eq!(step_precision(&curve, 0.75), Some(2.0 / 3.0));
        assert_eq!(step_precision(&curve, 1.0), Some(2.0 / 3.0));
    }

    #[test]
    fn plot_golden_snapshot_small() {
        let txt = render_pr_ascii(&reference_curve(), "2-class Precision-Recall curve", 11, 6);
        let expected = concat!(
            "2-class Precision-Recall curve: AP=0.8333\n",
            "Precision [0.00, 1.05] vs Recall [0.00, 1.00]\n",
            "-----      \n",
            ":::::|     \n",
            ":::::------\n",
            ":::::::::::\n",
            ":::::::::::\n",
            ":::::::::::\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn columns_beyond_the_curve_stay_blank() {
        let curve = PrCurve {
            precision: vec![1.0, 1.0],
            recall: vec![0.5, 0.0],
            thresholds: vec![0.9],
            average_precision: 0.5,
        };
        let txt = render_pr_ascii(&curve, "t", 11, 5);
        let last_row = txt.lines().last().unwrap();
        assert_eq!(last_row, "::::::     ");
    }
}
