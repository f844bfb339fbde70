//! SVG composition of the region collection.
//!
//! The export is one SVG document the size of the page canvas, white
//! background, with one nested viewport per content-bearing region in
//! collection order (later regions draw on top). Each nested viewport is
//! positioned at the region's placement in pixel space, declares the
//! region's local coordinate frame as its viewBox with stretch-to-fit
//! scaling, and applies the region's scale-then-translate transform around
//! the raw content.
//!
//! Grouping reuses [`write_region_block`] so a grouped region embeds its
//! children exactly the way the exporter would have placed them.

use crate::region::Region;
use pagevec_core::PxRect;

/// Formats a coordinate without trailing noise: integral values print as
/// integers, everything else is rounded to 4 decimals.
pub(crate) fn fmt_num(v: f64) -> String {
    if v == v.trunc() && v.abs() < 1e12 {
        format!("{}", v as i64)
    } else {
        let s = format!("{:.4}", v);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Writes one nested coordinate-system block for a region placed at
/// `placement` (pixel space relative to the enclosing viewport).
///
/// The viewBox spans the region's local content frame and
/// `preserveAspectRatio="none"` stretches it to the placement, so placement
/// size and content size vary independently. The inner group applies scale
/// first, then translate.
pub(crate) fn write_region_block(out: &mut String, region: &Region, placement: PxRect) {
    out.push_str(&format!(
        r#"<svg x="{}" y="{}" width="{}" height="{}" viewBox="0 0 {} {}" preserveAspectRatio="none">"#,
        fmt_num(placement.x),
        fmt_num(placement.y),
        fmt_num(placement.w),
        fmt_num(placement.h),
        fmt_num(region.content_size.w),
        fmt_num(region.content_size.h),
    ));
    out.push_str(&format!(
        r#"<g transform="translate({} {}) scale({} {})">"#,
        fmt_num(region.offset.x),
        fmt_num(region.offset.y),
        fmt_num(region.scale.x),
        fmt_num(region.scale.y),
    ));
    out.push_str(&region.svg_content);
    out.push_str("</g></svg>");
}

/// Serializes the region collection into one exportable SVG document.
///
/// Regions with no content (drafts, emptied split sources) are skipped
/// entirely; they never appear in the export.
pub fn compose(regions: &[Region], canvas_w: u32, canvas_h: u32) -> String {
    let w = canvas_w as f64;
    let h = canvas_h as f64;
    let mut out = String::new();
    out.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        fmt_num(w),
        fmt_num(h),
        fmt_num(w),
        fmt_num(h),
    ));
    out.push('\n');
    out.push_str(&format!(
        r##"<rect x="0" y="0" width="{}" height="{}" fill="#ffffff"/>"##,
        fmt_num(w),
        fmt_num(h),
    ));
    out.push('\n');
    for region in regions.iter().filter(|r| r.has_content()) {
        write_region_block(&mut out, region, region.rect.to_px(w, h));
        out.push('\n');
    }
    out.push_str("</svg>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagevec_core::{Rect, Size, Vec2};

    fn text_region(rect: Rect) -> Region {
        let mut region = Region::draft(rect);
        region.svg_content = r#"<text x="0" y="0">hi</text>"#.to_string();
        region.content_size = Size::new(100.0, 100.0);
        region
    }

    #[test]
    fn test_fmt_num() {
        assert_eq!(fmt_num(100.0), "100");
        assert_eq!(fmt_num(0.125), "0.125");
        assert_eq!(fmt_num(1.0 / 3.0), "0.3333");
    }

    #[test]
    fn test_compose_skips_empty_regions() {
        let draft = Region::draft(Rect::new(0.1, 0.1, 0.2, 0.2));
        let full = text_region(Rect::new(0.0, 0.0, 0.1, 0.1));
        let svg = compose(&[draft, full], 1000, 1000);
        assert_eq!(svg.matches("preserveAspectRatio").count(), 1);
    }

    #[test]
    fn test_compose_places_blocks_in_pixels() {
        let a = text_region(Rect::new(0.0, 0.0, 0.1, 0.1));
        let b = text_region(Rect::new(0.2, 0.0, 0.1, 0.1));
        let svg = compose(&[a, b], 1000, 1000);
        assert!(svg.contains(r#"<svg x="0" y="0" width="100" height="100""#));
        assert!(svg.contains(r#"<svg x="200" y="0" width="100" height="100""#));
    }

    #[test]
    fn test_compose_output_parses() {
        let a = text_region(Rect::new(0.25, 0.25, 0.5, 0.5));
        let svg = compose(&[a], 800, 600);
        let doc = roxmltree::Document::parse(&svg).unwrap();
        let root = doc.root_element();
        assert_eq!(root.attribute("width"), Some("800"));
        assert_eq!(root.attribute("height"), Some("600"));
    }

    #[test]
    fn test_transform_order_scale_then_translate() {
        let mut region = text_region(Rect::new(0.0, 0.0, 0.5, 0.5));
        region.scale = Vec2::new(2.0, 3.0);
        region.offset = Vec2::new(-4.0, -5.0);
        let svg = compose(&[region], 100, 100);
        // SVG applies transform list right to left: scale first.
        assert!(svg.contains(r#"transform="translate(-4 -5) scale(2 3)""#));
    }
}
