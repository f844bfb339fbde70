//! Run-length tracer: bitmap sample to compact vector path.
//!
//! Scans every second row of a sample and emits one closed 2-pixel-tall bar
//! per horizontal run of dark pixels. The 2-row vertical stride halves the
//! vertical resolution on purpose: the traced path is a preview blueprint,
//! not a faithful vectorization, and the coarser shape keeps path strings
//! small for large crops. Downstream consumers rely on this exact shape, so
//! the stride is part of the contract.

use crate::raster::RasterSample;

/// Vertical sampling stride (rows per emitted bar).
const ROW_STRIDE: u32 = 2;

/// Channel thresholds for classifying a pixel as ink.
const ALPHA_MIN: u8 = 128;
const CHANNEL_MAX: u8 = 128;

/// True when the pixel is opaque enough and dark in every channel.
fn is_dark(rgba: [u8; 4]) -> bool {
    let [r, g, b, a] = rgba;
    a > ALPHA_MIN && r < CHANNEL_MAX && g < CHANNEL_MAX && b < CHANNEL_MAX
}

/// Traces dark-pixel runs into a single SVG path string.
///
/// Each maximal run of dark pixels on an even row `y` becomes a closed bar
/// `M{x} {y}h{len}v2h-{len}z`. Runs that touch the right edge are closed
/// with the remaining width. An all-light sample yields an empty string,
/// which means "no ink" and is a valid result.
pub fn trace_runs(sample: &RasterSample) -> String {
    let mut path = String::new();
    let width = sample.width();
    let height = sample.height();

    let mut y = 0;
    while y < height {
        let mut run_start: Option<u32> = None;
        for x in 0..width {
            let dark = is_dark(sample.pixel(x, y));
            match (dark, run_start) {
                (true, None) => run_start = Some(x),
                (false, Some(start)) => {
                    emit_bar(&mut path, start, y, x - start);
                    run_start = None;
                }
                _ => {}
            }
        }
        // Close a run that reaches the right edge.
        if let Some(start) = run_start {
            emit_bar(&mut path, start, y, width - start);
        }
        y += ROW_STRIDE;
    }

    path
}

fn emit_bar(path: &mut String, x: u32, y: u32, len: u32) {
    path.push_str(&format!("M{} {}h{}v{}h-{}z", x, y, len, ROW_STRIDE, len));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::RasterSample;

    fn sample_from(width: u32, height: u32, rgba: &[[u8; 4]]) -> RasterSample {
        assert_eq!(rgba.len() as u32, width * height);
        let mut pixels = Vec::with_capacity(rgba.len() * 4);
        for px in rgba {
            pixels.extend_from_slice(px);
        }
        RasterSample::new(width, height, pixels).unwrap()
    }

    fn solid(width: u32, height: u32, rgba: [u8; 4]) -> RasterSample {
        sample_from(width, height, &vec![rgba; (width * height) as usize])
    }

    const BLACK: [u8; 4] = [0, 0, 0, 255];
    const CLEAR: [u8; 4] = [0, 0, 0, 0];

    #[test]
    fn test_transparent_sample_is_empty() {
        let sample = solid(10, 6, CLEAR);
        assert_eq!(trace_runs(&sample), "");
    }

    #[test]
    fn test_white_sample_is_empty() {
        let sample = solid(10, 6, [255, 255, 255, 255]);
        assert_eq!(trace_runs(&sample), "");
    }

    #[test]
    fn test_solid_black_covers_every_even_row() {
        let sample = solid(4, 6, BLACK);
        assert_eq!(
            trace_runs(&sample),
            "M0 0h4v2h-4zM0 2h4v2h-4zM0 4h4v2h-4z"
        );
    }

    #[test]
    fn test_run_touching_right_edge_closes() {
        // Row 0: light, light, dark, dark
        let sample = sample_from(4, 1, &[CLEAR, CLEAR, BLACK, BLACK]);
        assert_eq!(trace_runs(&sample), "M2 0h2v2h-2z");
    }

    #[test]
    fn test_odd_rows_skipped() {
        // Dark only on row 1, which the stride never visits.
        let mut rows = vec![CLEAR; 3];
        rows.extend_from_slice(&[BLACK, BLACK, BLACK]);
        let sample = sample_from(3, 2, &rows);
        assert_eq!(trace_runs(&sample), "");
    }

    #[test]
    fn test_multiple_runs_on_one_row() {
        // dark, light, dark, dark, light
        let sample = sample_from(5, 1, &[BLACK, CLEAR, BLACK, BLACK, CLEAR]);
        assert_eq!(trace_runs(&sample), "M0 0h1v2h-1zM2 0h2v2h-2z");
    }

    #[test]
    fn test_threshold_boundaries() {
        // Exactly at the thresholds: alpha must exceed 128, channels must
        // stay strictly below 128.
        let at_limits = sample_from(1, 1, &[[127, 127, 127, 129]]);
        assert_eq!(trace_runs(&at_limits), "M0 0h1v2h-1z");

        let alpha_too_low = sample_from(1, 1, &[[0, 0, 0, 128]]);
        assert_eq!(trace_runs(&alpha_too_low), "");

        let red_too_high = sample_from(1, 1, &[[128, 0, 0, 255]]);
        assert_eq!(trace_runs(&red_too_high), "");
    }
}
