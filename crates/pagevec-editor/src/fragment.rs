//! Opaque vector-markup fragment surgery.
//!
//! Region content is an opaque SVG fragment: zero or more sibling elements
//! whose internals the engine never interprets. The operations here are the
//! few structural edits the engine needs: enumerating top-level elements,
//! removing one, and collapsing adjacent same-style text runs into a single
//! element.
//!
//! Implementation: the fragment is wrapped in a neutral root, parsed with
//! roxmltree, and re-serialized by slicing element byte ranges back out of
//! the source string. Elements the operation does not touch are reproduced
//! byte-for-byte. Unparseable input degrades to "no recognizable elements"
//! and every mutating operation returns its input unchanged.

use tracing::debug;

const WRAP_OPEN: &str =
    "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\">";
const WRAP_CLOSE: &str = "</svg>";

/// Vertical tolerance for treating two text elements as "same line" when
/// sorting.
const LINE_SORT_BAND: f64 = 0.5;

/// Vertical tolerance for letting a text element join the current run.
const LINE_MERGE_BAND: f64 = 1.0;

fn wrap(markup: &str) -> String {
    let mut s = String::with_capacity(WRAP_OPEN.len() + markup.len() + WRAP_CLOSE.len());
    s.push_str(WRAP_OPEN);
    s.push_str(markup);
    s.push_str(WRAP_CLOSE);
    s
}

/// Splits a fragment into its top-level elements, each serialized as the
/// byte range it occupied in the input.
///
/// Parse failure yields an empty sequence; callers treat that as a degraded
/// fragment, not an error.
pub fn parse_fragment(markup: &str) -> Vec<String> {
    let wrapped = wrap(markup);
    let doc = match roxmltree::Document::parse(&wrapped) {
        Ok(doc) => doc,
        Err(err) => {
            debug!("fragment parse failed, treating as opaque: {err}");
            return Vec::new();
        }
    };
    doc.root_element()
        .children()
        .filter(|n| n.is_element())
        .map(|n| wrapped[n.range()].to_string())
        .collect()
}

/// Removes the element at `index` (0-based, document order) and returns the
/// serialized remainder. Out-of-range indices and unparseable input are
/// no-ops.
pub fn remove_element_at(markup: &str, index: usize) -> String {
    let wrapped = wrap(markup);
    let doc = match roxmltree::Document::parse(&wrapped) {
        Ok(doc) => doc,
        Err(_) => return markup.to_string(),
    };
    let elements: Vec<_> = doc
        .root_element()
        .children()
        .filter(|n| n.is_element())
        .collect();
    if index >= elements.len() {
        return markup.to_string();
    }
    let mut out = String::new();
    for (i, node) in elements.iter().enumerate() {
        if i != index {
            out.push_str(&wrapped[node.range()]);
        }
    }
    out
}

struct TextRunInfo {
    /// Position among the fragment's top-level elements, document order.
    index: usize,
    x: f64,
    y: f64,
    fingerprint: String,
    text: String,
}

/// Collapses adjacent same-style text runs into single elements.
///
/// Top-level text-bearing elements are sorted by vertical position (with a
/// half-unit band treated as the same line) then horizontal position.
/// Consecutive elements whose vertical positions agree within one unit and
/// whose style fingerprints match form a run; every run of two or more
/// collapses into its leftmost member, text joined by single spaces. All
/// other elements pass through untouched in their original relative order.
///
/// Idempotent: a collapsed element forms a run of one on the next pass and
/// is reproduced verbatim.
pub fn merge_adjacent_text_runs(markup: &str) -> String {
    let wrapped = wrap(markup);
    let doc = match roxmltree::Document::parse(&wrapped) {
        Ok(doc) => doc,
        Err(_) => return markup.to_string(),
    };
    let elements: Vec<_> = doc
        .root_element()
        .children()
        .filter(|n| n.is_element())
        .collect();

    let mut texts: Vec<TextRunInfo> = elements
        .iter()
        .enumerate()
        .filter_map(|(index, node)| {
            let text = literal_text(node)?;
            Some(TextRunInfo {
                index,
                x: attr_f64(node, "x"),
                y: attr_f64(node, "y"),
                fingerprint: style_fingerprint(node),
                text,
            })
        })
        .collect();

    // Primary key: vertical position, with near-equal rows compared by x.
    texts.sort_by(|a, b| {
        if (a.y - b.y).abs() <= LINE_SORT_BAND {
            a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal)
        } else {
            a.y.partial_cmp(&b.y).unwrap_or(std::cmp::Ordering::Equal)
        }
    });

    // Walk the sorted sequence, grouping consecutive entries into runs.
    let mut runs: Vec<Vec<&TextRunInfo>> = Vec::new();
    for info in &texts {
        let joins_current = runs
            .last()
            .and_then(|run| run.last())
            .map(|prev| {
                (info.y - prev.y).abs() <= LINE_MERGE_BAND && info.fingerprint == prev.fingerprint
            })
            .unwrap_or(false);
        if joins_current {
            runs.last_mut().expect("checked non-empty").push(info);
        } else {
            runs.push(vec![info]);
        }
    }

    // Runs of two or more collapse into their leftmost member.
    let mut replacements: Vec<Option<String>> = vec![None; elements.len()];
    let mut removed = vec![false; elements.len()];
    for run in &mut runs {
        if run.len() < 2 {
            continue;
        }
        run.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));
        let leader = run[0];
        let joined = run
            .iter()
            .map(|i| i.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        replacements[leader.index] = Some(rebuild_with_text(&elements[leader.index], &joined));
        for member in &run[1..] {
            removed[member.index] = true;
        }
    }

    let mut out = String::new();
    for (i, node) in elements.iter().enumerate() {
        if removed[i] {
            continue;
        }
        match &replacements[i] {
            Some(rebuilt) => out.push_str(rebuilt),
            None => out.push_str(&wrapped[node.range()]),
        }
    }
    out
}

/// Concatenated literal text of an element, or None for non-text elements.
fn literal_text(node: &roxmltree::Node<'_, '_>) -> Option<String> {
    let mut text = String::new();
    for descendant in node.descendants() {
        if descendant.is_text() {
            if let Some(t) = descendant.text() {
                text.push_str(t);
            }
        }
    }
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn attr_f64(node: &roxmltree::Node<'_, '_>, name: &str) -> f64 {
    node.attribute(name)
        .and_then(|v| v.parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// Style identity used to decide whether two text elements may merge.
fn style_fingerprint(node: &roxmltree::Node<'_, '_>) -> String {
    let attr = |name: &str| node.attribute(name).unwrap_or("");
    format!(
        "{}|{}|{}|{}|{}",
        attr("font-family"),
        attr("font-size"),
        attr("font-weight"),
        attr("fill"),
        attr("style"),
    )
}

/// Rebuilds an element with its original attributes and new literal text.
fn rebuild_with_text(node: &roxmltree::Node<'_, '_>, text: &str) -> String {
    let tag = node.tag_name().name();
    let mut s = String::new();
    s.push('<');
    s.push_str(tag);
    for attr in node.attributes() {
        s.push(' ');
        s.push_str(attr.name());
        s.push_str("=\"");
        s.push_str(&escape_attr(attr.value()));
        s.push('"');
    }
    s.push('>');
    s.push_str(&escape_text(text));
    s.push_str("</");
    s.push_str(tag);
    s.push('>');
    s
}

fn escape_text(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fragment_enumerates_top_level() {
        let markup = r#"<text x="0" y="0">a</text><g><rect width="5" height="5"/></g>"#;
        let elements = parse_fragment(markup);
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0], r#"<text x="0" y="0">a</text>"#);
        assert_eq!(elements[1], r#"<g><rect width="5" height="5"/></g>"#);
    }

    #[test]
    fn test_parse_fragment_degrades_on_bad_markup() {
        assert!(parse_fragment("<text>unclosed").is_empty());
    }

    #[test]
    fn test_remove_element_at() {
        let markup = "<rect/><circle/><line/>";
        assert_eq!(remove_element_at(markup, 1), "<rect/><line/>");
    }

    #[test]
    fn test_remove_element_out_of_range_is_noop() {
        let markup = "<rect/><circle/>";
        assert_eq!(remove_element_at(markup, 5), markup);
    }

    #[test]
    fn test_remove_element_bad_markup_is_noop() {
        let markup = "<rect";
        assert_eq!(remove_element_at(markup, 0), markup);
    }

    #[test]
    fn test_merge_same_line_same_style() {
        let markup = concat!(
            r#"<text x="10" y="5" font-size="12">world</text>"#,
            r#"<text x="0" y="5" font-size="12">hello</text>"#,
        );
        let merged = merge_adjacent_text_runs(markup);
        assert_eq!(merged, r#"<text x="0" y="5" font-size="12">hello world</text>"#);
    }

    #[test]
    fn test_merge_respects_style_fingerprint() {
        let markup = concat!(
            r#"<text x="0" y="5" font-size="12">a</text>"#,
            r#"<text x="10" y="5" font-size="14">b</text>"#,
        );
        assert_eq!(merge_adjacent_text_runs(markup), markup);
    }

    #[test]
    fn test_merge_respects_line_band() {
        let markup = concat!(
            r#"<text x="0" y="5">a</text>"#,
            r#"<text x="10" y="7">b</text>"#,
        );
        assert_eq!(merge_adjacent_text_runs(markup), markup);
    }

    #[test]
    fn test_merge_passes_non_text_through() {
        let markup = concat!(
            r#"<rect width="5" height="5"/>"#,
            r#"<text x="0" y="5">a</text>"#,
            r#"<text x="8" y="5">b</text>"#,
        );
        let merged = merge_adjacent_text_runs(markup);
        assert_eq!(
            merged,
            concat!(
                r#"<rect width="5" height="5"/>"#,
                r#"<text x="0" y="5">a b</text>"#,
            )
        );
    }

    #[test]
    fn test_merge_is_idempotent() {
        let markup = concat!(
            r##"<text x="0" y="5" fill="#222">alpha</text>"##,
            r##"<text x="20" y="5.4" fill="#222">beta</text>"##,
            r##"<text x="0" y="30" fill="#222">gamma</text>"##,
            r#"<rect width="4" height="4"/>"#,
        );
        let once = merge_adjacent_text_runs(markup);
        let twice = merge_adjacent_text_runs(&once);
        assert_eq!(once, twice);
        assert!(once.contains("alpha beta"));
        assert!(once.contains("gamma"));
    }

    #[test]
    fn test_merge_escapes_text_content() {
        let markup = concat!(
            r#"<text x="0" y="0">a &amp; b</text>"#,
            r#"<text x="9" y="0">&lt;c&gt;</text>"#,
        );
        let merged = merge_adjacent_text_runs(markup);
        assert_eq!(merged, r#"<text x="0" y="0">a &amp; b &lt;c&gt;</text>"#);
    }
}
