//! Optional terminal syntax highlighting for traffic dumps.
//!
//! Two implementations share the [`Highlighter`] trait: [`PlainHighlighter`]
//! passes content through, and `TerminalHighlighter` (behind the `highlight`
//! feature) adds ANSI colours. One of them is chosen once per process and
//! handed to the formatter.

use std::sync::OnceLock;

/// The kind of content being highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Json,
    Html,
    Http,
}

/// Renders a block of content for display. Output always ends with a newline.
pub trait Highlighter: Send + Sync {
    fn highlight(&self, kind: ContentKind, content: &str) -> String;

    /// Short name used in diagnostics.
    fn name(&self) -> &'static str;
}

/// Passthrough used when highlighting is unavailable or disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainHighlighter;

impl Highlighter for PlainHighlighter {
    fn highlight(&self, _kind: ContentKind, content: &str) -> String {
        format!("{}\n", content)
    }

    fn name(&self) -> &'static str {
        "plain"
    }
}

#[cfg(feature = "highlight")]
pub use terminal::TerminalHighlighter;

static ACTIVE: OnceLock<&'static dyn Highlighter> = OnceLock::new();

/// Select the process-wide highlighter. The first call wins.
pub fn install(enabled: bool) -> &'static dyn Highlighter {
    *ACTIVE.get_or_init(|| select(enabled))
}

/// The process-wide highlighter, selected from stderr's capabilities if
/// nothing was installed yet.
pub fn active() -> &'static dyn Highlighter {
    *ACTIVE.get_or_init(|| select(console::Term::stderr().features().colors_supported()))
}

#[cfg(feature = "highlight")]
fn select(enabled: bool) -> &'static dyn Highlighter {
    if enabled {
        &TerminalHighlighter
    } else {
        &PlainHighlighter
    }
}

#[cfg(not(feature = "highlight"))]
fn select(_enabled: bool) -> &'static dyn Highlighter {
    &PlainHighlighter
}

#[cfg(feature = "highlight")]
mod terminal {
    use super::{ContentKind, Highlighter};
    use console::Style;
    use regex::{Captures, Regex};
    use std::sync::OnceLock;

    fn re_json_token() -> &'static Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| {
            Regex::new(
                r#"(?P<key>"(?:[^"\\]|\\.)*")(?P<colon>\s*:)|(?P<string>"(?:[^"\\]|\\.)*")|(?P<number>-?\d+(?:\.\d+)?(?:[eE][+-]?\d+)?)|(?P<literal>\b(?:true|false|null)\b)"#,
            )
            .expect("json token pattern is valid")
        })
    }

    fn re_html_token() -> &'static Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| {
            Regex::new(r"(?s)(?P<comment><!--.*?-->)|(?P<decl><![^>]*>)|(?P<open></?[a-zA-Z][\w:.-]*)(?P<attrs>[^>]*?)(?P<close>/?>)")
                .expect("html token pattern is valid")
        })
    }

    fn re_html_attribute() -> &'static Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| {
            Regex::new(r#"(?P<name>[\w:.-]+)(?P<eq>\s*=\s*)(?P<value>"[^"]*"|'[^']*')"#)
                .expect("html attribute pattern is valid")
        })
    }

    fn style(base: Style) -> Style {
        base.force_styling(true)
    }

    /// Replace every regex match with its styled rendering.
    fn paint(re: &Regex, content: &str, render: impl Fn(&Captures<'_>) -> String) -> String {
        let mut out = String::with_capacity(content.len() * 2);
        let mut last = 0;

        for caps in re.captures_iter(content) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            out.push_str(&content[last..whole.start()]);
            out.push_str(&render(&caps));
            last = whole.end();
        }

        out.push_str(&content[last..]);
        out
    }

    /// ANSI colour highlighter for terminals.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct TerminalHighlighter;

    impl TerminalHighlighter {
        fn json(&self, content: &str) -> String {
            paint(re_json_token(), content, |caps| {
                if let (Some(key), Some(colon)) = (caps.name("key"), caps.name("colon")) {
                    format!("{}{}", style(Style::new().blue().bold()).apply_to(key.as_str()), colon.as_str())
                } else if let Some(s) = caps.name("string") {
                    style(Style::new().green()).apply_to(s.as_str()).to_string()
                } else if let Some(n) = caps.name("number") {
                    style(Style::new().cyan()).apply_to(n.as_str()).to_string()
                } else if let Some(l) = caps.name("literal") {
                    style(Style::new().magenta()).apply_to(l.as_str()).to_string()
                } else {
                    caps[0].to_string()
                }
            })
        }

        fn html(&self, content: &str) -> String {
            paint(re_html_token(), content, |caps| {
                if let Some(comment) = caps.name("comment") {
                    return style(Style::new().dim()).apply_to(comment.as_str()).to_string();
                }
                if let Some(decl) = caps.name("decl") {
                    return style(Style::new().magenta()).apply_to(decl.as_str()).to_string();
                }

                let tag = style(Style::new().blue().bold());
                let attrs = caps.name("attrs").map(|m| m.as_str()).unwrap_or_default();
                let attrs = paint(re_html_attribute(), attrs, |a| {
                    format!(
                        "{}{}{}",
                        style(Style::new().cyan()).apply_to(&a["name"]),
                        &a["eq"],
                        style(Style::new().green()).apply_to(&a["value"])
                    )
                });
                format!(
                    "{}{}{}",
                    tag.apply_to(caps.name("open").map(|m| m.as_str()).unwrap_or_default()),
                    attrs,
                    tag.apply_to(caps.name("close").map(|m| m.as_str()).unwrap_or_default())
                )
            })
        }

        fn http(&self, content: &str) -> String {
            let mut lines = content.split('\n');
            let mut out = Vec::new();

            if let Some(status) = lines.next() {
                out.push(style(Style::new().bold()).apply_to(status).to_string());
            }

            for line in lines {
                match line.split_once(':') {
                    Some((name, value)) => out.push(format!(
                        "{}:{}",
                        style(Style::new().cyan()).apply_to(name),
                        value
                    )),
                    None => out.push(line.to_string()),
                }
            }

            out.join("\n")
        }
    }

    impl Highlighter for TerminalHighlighter {
        fn highlight(&self, kind: ContentKind, content: &str) -> String {
            let mut out = match kind {
                ContentKind::Json => self.json(content),
                ContentKind::Html => self.html(content),
                ContentKind::Http => self.http(content),
            };
            if !out.ends_with('\n') {
                out.push('\n');
            }
            out
        }

        fn name(&self) -> &'static str {
            "terminal"
        }
    }

}
