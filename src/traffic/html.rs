//! Minimal HTML pretty-printer: one node per line, indented by nesting depth.

use regex::Regex;
use std::sync::OnceLock;

/// Elements that never have children or a closing tag.
const VOID_ELEMENTS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

fn re_html_node() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)<!--.*?-->|<![^>]*>|<\?[^>]*>|</[a-zA-Z][^>]*>|<[a-zA-Z][^>]*>|[^<]+|<")
            .expect("html node pattern is valid")
    })
}

/// Elements whose contents are raw text, not markup.
const RAW_TEXT_ELEMENTS: [&str; 2] = ["script", "style"];

fn tag_name(tag: &str) -> String {
    tag.trim_start_matches(|c| c == '<' || c == '/')
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | ':' | '_'))
        .collect::<String>()
        .to_ascii_lowercase()
}

/// Byte offset of the `</name` that closes a raw text element, or the end of
/// the document when it is never closed.
fn raw_text_end(html: &str, from: usize, name: &str) -> usize {
    let closing = format!("</{}", name);
    html[from..]
        .to_ascii_lowercase()
        .find(&closing)
        .map_or(html.len(), |offset| from + offset)
}

fn push_text(lines: &mut Vec<String>, depth: usize, text: &str) {
    let text = text.trim();
    if !text.is_empty() {
        lines.push(format!("{}{}", " ".repeat(depth), text));
    }
}

/// Reflow an HTML document so every tag, comment, and text run sits on its
/// own line, indented one space per level. `script` and `style` bodies are
/// kept as a single text node.
pub fn prettify(html: &str) -> String {
    let mut lines = Vec::new();
    let mut depth: usize = 0;
    let mut pos = 0;

    while let Some(found) = re_html_node().find_at(html, pos) {
        let node = found.as_str();
        pos = found.end();

        if node.starts_with("</") {
            depth = depth.saturating_sub(1);
            lines.push(format!("{}{}", " ".repeat(depth), node));
        } else if node.starts_with("<!") || node.starts_with("<?") {
            lines.push(format!("{}{}", " ".repeat(depth), node));
        } else if node.len() > 1 && node.starts_with('<') {
            lines.push(format!("{}{}", " ".repeat(depth), node));
            let name = tag_name(node);
            if node.ends_with("/>") || VOID_ELEMENTS.contains(&name.as_str()) {
                continue;
            }
            depth += 1;
            if RAW_TEXT_ELEMENTS.contains(&name.as_str()) {
                let end = raw_text_end(html, pos, &name);
                push_text(&mut lines, depth, &html[pos..end]);
                pos = end;
            }
        } else {
            push_text(&mut lines, depth, node);
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prettify_nested() {
        let html = "<html><body><p>Hello <b>world</b></p></body></html>";
        let expected = "<html>\n <body>\n  <p>\n   Hello\n   <b>\n    world\n   </b>\n  </p>\n </body>\n</html>";
        assert_eq!(prettify(html), expected);
    }

    #[test]
    fn test_void_and_self_closing_do_not_nest() {
        let html = "<div><br><img src=\"a.png\"/><input type=text></div>";
        let expected = "<div>\n <br>\n <img src=\"a.png\"/>\n <input type=text>\n</div>";
        assert_eq!(prettify(html), expected);
    }

    #[test]
    fn test_doctype_and_comments() {
        let html = "<!DOCTYPE html><!-- a <b> comment --><p>x</p>";
        let expected = "<!DOCTYPE html>\n<!-- a <b> comment -->\n<p>\n x\n</p>";
        assert_eq!(prettify(html), expected);
    }

    #[test]
    fn test_unbalanced_closing_tags() {
        assert_eq!(prettify("</div></div>text"), "</div>\n</div>\ntext");
    }

    #[test]
    fn test_script_body_is_raw_text() {
        let html = "<html><script>if (a<b) { x(); }</script><p>hi</p></html>";
        let expected = "<html>\n <script>\n  if (a<b) { x(); }\n </script>\n <p>\n  hi\n </p>\n</html>";
        assert_eq!(prettify(html), expected);
    }

    #[test]
    fn test_style_body_is_raw_text() {
        let html = "<STYLE>p > a { color: red }</Style><p>x</p>";
        let expected = "<STYLE>\n p > a { color: red }\n</Style>\n<p>\n x\n</p>";
        assert_eq!(prettify(html), expected);
    }

    #[test]
    fn test_unclosed_script_runs_to_end() {
        assert_eq!(prettify("<script>a < b"), "<script>\n a < b");
    }

    #[test]
    fn test_stray_angle_bracket_kept() {
        assert_eq!(prettify("<p>1 < 2</p>"), "<p>\n 1\n <\n 2\n</p>");
    }
}
