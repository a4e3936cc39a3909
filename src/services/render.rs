//! Report document construction.
//!
//! The report is built as a tree of [`Node`]s and serialized once. Text is
//! escaped on the way out; only the grammar note is treated as markup, and
//! only after [`sanitize_inline_markup`] has reduced it to a small set of
//! attribute-free inline tags.

use crate::models::{AnalysisReport, SentenceAnalysis, StructureRole, VocabEntry};
use regex::Regex;
use std::sync::OnceLock;

const STYLE: &str = "
.page { padding: 24px; background: #ffffff; font-family: sans-serif; color: #111827; border: 1px solid #e5e7eb; border-radius: 12px; }
.divider-main { border-top: 2px solid #111827; margin: 12px 0; }
.title { font-size: 20px; font-weight: 700; }
.subtitle { font-size: 14px; color: #4b5563; font-weight: 400; }
.layout { display: flex; gap: 20px; }
.left { flex: 3; }
.right { flex: 1.5; }
.block { border: 1px solid #e5e7eb; border-radius: 8px; padding: 15px; margin-bottom: 15px; }
.full-en { font-size: 13px; line-height: 1.6; }
.full-ko { font-size: 13px; color: #4b5563; background: #f9fafb; padding: 10px; }
.sentence-item { border-bottom: 1px dashed #e5e7eb; padding: 10px 0; }
.sent-no { color: #2563eb; font-weight: bold; margin-right: 8px; }
.sent-ko { font-size: 12px; color: #4b5563; margin: 5px 0; }
.grammar { font-size: 11px; color: #dc2626; }
.structure-table { width: 100%; border-collapse: collapse; font-size: 12px; margin-top: 5px; }
.structure-table th, .structure-table td { border: 1px solid #e5e7eb; padding: 5px; text-align: left; }
.structure-table th { background: #f3f4f6; }
.summary { font-size: 12px; }
.flow { font-size: 11px; }
.vocab-table { width: 100%; border-collapse: collapse; font-size: 12px; }
.vocab-table td { border: 1px solid #e5e7eb; padding: 4px; }
";

/// Inline tags allowed through from the grammar note.
const INLINE_TAGS: &[&str] = &["b", "strong", "i", "em", "u", "br", "sub", "sup", "mark", "code"];

const VOID_TAGS: &[&str] = &["br", "hr"];

/// A piece of the output document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element {
        tag: &'static str,
        attrs: Vec<(&'static str, String)>,
        children: Vec<Node>,
    },
    /// Escaped on output.
    Text(String),
    /// Emitted verbatim; must already be safe.
    Markup(String),
}

impl Node {
    pub fn element(tag: &'static str) -> Self {
        Node::Element {
            tag,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        Node::Text(content.into())
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        if let Node::Element { attrs, .. } = &mut self {
            attrs.push((name, value.into()));
        }
        self
    }

    pub fn class(self, name: &'static str) -> Self {
        self.attr("class", name)
    }

    pub fn child(mut self, node: Node) -> Self {
        if let Node::Element { children, .. } = &mut self {
            children.push(node);
        }
        self
    }

    pub fn children(mut self, nodes: impl IntoIterator<Item = Node>) -> Self {
        if let Node::Element { children, .. } = &mut self {
            children.extend(nodes);
        }
        self
    }

    /// Shorthand for an element holding a single text child.
    pub fn with_text(self, content: impl Into<String>) -> Self {
        self.child(Node::text(content))
    }

    pub fn write_to(&self, out: &mut String) {
        match self {
            Node::Text(content) => {
                html_escape::encode_text_to_string(content, out);
            }
            Node::Markup(markup) => out.push_str(markup),
            Node::Element {
                tag,
                attrs,
                children,
            } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attrs {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    html_escape::encode_double_quoted_attribute_to_string(value, out);
                    out.push('"');
                }
                out.push('>');
                if VOID_TAGS.contains(tag) {
                    return;
                }
                for child in children {
                    child.write_to(out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_to(&mut out);
        out
    }
}

fn tag_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"<(/?)([A-Za-z][A-Za-z0-9]*)[^<>]*>").expect("tag pattern is valid")
    })
}

/// Reduces model-written markup to attribute-free whitelisted inline tags.
///
/// Text and any other tag are escaped. Stray closing tags are escaped too and
/// tags left open are closed at the end, so the note cannot leak formatting
/// into the rest of the document.
pub fn sanitize_inline_markup(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut open: Vec<String> = Vec::new();
    let mut last = 0;

    for caps in tag_pattern().captures_iter(raw) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(2)) else {
            continue;
        };
        html_escape::encode_text_to_string(&raw[last..whole.start()], &mut out);
        last = whole.end();

        let name = name.as_str().to_ascii_lowercase();
        let closing = caps.get(1).is_some_and(|m| !m.as_str().is_empty());

        if !INLINE_TAGS.contains(&name.as_str()) {
            html_escape::encode_text_to_string(whole.as_str(), &mut out);
        } else if VOID_TAGS.contains(&name.as_str()) {
            out.push_str("<br>");
        } else if !closing {
            out.push('<');
            out.push_str(&name);
            out.push('>');
            open.push(name);
        } else if let Some(position) = open.iter().rposition(|tag| *tag == name) {
            for tag in open.drain(position..).rev() {
                out.push_str("</");
                out.push_str(&tag);
                out.push('>');
            }
        } else {
            html_escape::encode_text_to_string(whole.as_str(), &mut out);
        }
    }

    html_escape::encode_text_to_string(&raw[last..], &mut out);
    for tag in open.into_iter().rev() {
        out.push_str("</");
        out.push_str(&tag);
        out.push('>');
    }
    out
}

fn block(heading: &str) -> Node {
    Node::element("div")
        .class("block")
        .child(Node::element("strong").with_text(heading))
}

fn header(report: &AnalysisReport) -> Vec<Node> {
    vec![
        Node::element("div")
            .class("title")
            .with_text(format!("{} ", report.title))
            .child(
                Node::element("span")
                    .class("subtitle")
                    .with_text(format!("| {}", report.subtitle)),
            ),
        Node::element("div").class("divider-main"),
    ]
}

fn structure_row(role: &StructureRole) -> Node {
    Node::element("tr")
        .child(Node::element("td").child(Node::element("b").with_text(role.role.as_str())))
        .child(Node::element("td").with_text(role.english.as_str()))
        .child(Node::element("td").with_text(role.korean.as_str()))
}

fn structure_table(structure: &[StructureRole]) -> Node {
    let head = Node::element("tr")
        .child(Node::element("th").with_text("역할"))
        .child(Node::element("th").with_text("영어"))
        .child(Node::element("th").with_text("설명"));
    Node::element("table")
        .class("structure-table")
        .child(Node::element("thead").child(head))
        .child(Node::element("tbody").children(structure.iter().map(structure_row)))
}

fn sentence_item(sentence: &SentenceAnalysis) -> Node {
    Node::element("div")
        .class("sentence-item")
        .child(
            Node::element("div")
                .child(
                    Node::element("span")
                        .class("sent-no")
                        .with_text(sentence.number.to_string()),
                )
                .with_text(sentence.english.as_str()),
        )
        .child(
            Node::element("div")
                .class("sent-ko")
                .with_text(sentence.korean.as_str()),
        )
        .child(
            Node::element("div")
                .class("grammar")
                .with_text("💡 ")
                .child(Node::Markup(sanitize_inline_markup(&sentence.grammar_note))),
        )
        .child(structure_table(&sentence.structure))
}

fn vocab_row(entry: &VocabEntry) -> Node {
    Node::element("tr")
        .child(Node::element("td").with_text(entry.word.as_str()))
        .child(Node::element("td").with_text(entry.meaning.as_str()))
}

fn left_column(report: &AnalysisReport) -> Node {
    let full_text = block("[본문 전체]")
        .child(
            Node::element("div")
                .class("full-en")
                .with_text(report.full_english.as_str()),
        )
        .child(Node::element("hr"))
        .child(
            Node::element("div")
                .class("full-ko")
                .with_text(report.full_korean.as_str()),
        );

    let analysis = block("[문장별 정밀 분석]")
        .attr("id", "sentence-analysis")
        .children(report.sentences.iter().map(sentence_item));

    Node::element("div")
        .class("left")
        .child(full_text)
        .child(analysis)
}

fn right_column(report: &AnalysisReport) -> Node {
    let summary = block("주제 및 요지").child(
        Node::element("p")
            .class("summary")
            .with_text(report.summary.as_str()),
    );

    let flow = block("글의 흐름").child(
        Node::element("ol").class("flow").children(
            report
                .logic_flow
                .iter()
                .map(|step| Node::element("li").with_text(step.as_str())),
        ),
    );

    let vocabulary = block("어휘 정리").child(
        Node::element("table")
            .class("vocab-table")
            .child(Node::element("tbody").children(report.vocabulary.iter().map(vocab_row))),
    );

    Node::element("div")
        .class("right")
        .child(summary)
        .child(flow)
        .child(vocabulary)
}

/// Builds the document tree for a report.
pub fn report_document(report: &AnalysisReport) -> Node {
    Node::element("div")
        .class("report")
        .child(Node::element("style").child(Node::Markup(STYLE.to_string())))
        .child(
            Node::element("div")
                .class("page")
                .children(header(report))
                .child(
                    Node::element("div")
                        .class("layout")
                        .child(left_column(report))
                        .child(right_column(report)),
                ),
        )
}

pub fn render_report(report: &AnalysisReport) -> String {
    report_document(report).to_html()
}
