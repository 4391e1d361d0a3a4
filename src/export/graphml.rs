//! GraphML writer.

use std::borrow::Cow;
use std::io::Write;

use anyhow::Result;

use crate::export::GraphExporter;
use crate::graph::GraphView;

const INDENT: &str = "  ";

/// Writes GraphML with typed nodes (`project` / `contributor`).
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphMlExporter;

impl GraphExporter for GraphMlExporter {
    fn write_to(&self, view: &GraphView, out: &mut dyn Write) -> Result<()> {
        writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
        writeln!(out, "<graphml>")?;
        writeln!(out, r#"{INDENT}<graph edgedefault="directed">"#)?;

        for node in view.nodes() {
            writeln!(
                out,
                r#"{INDENT}{INDENT}<node id="{}" type="{}"/>"#,
                escape_attr(&node.id),
                node.kind.as_str()
            )?;
        }
        for edge in view.edges() {
            writeln!(
                out,
                r#"{INDENT}{INDENT}<edge source="{}" target="{}"/>"#,
                escape_attr(edge.source),
                escape_attr(edge.target)
            )?;
        }

        writeln!(out, "{INDENT}</graph>")?;
        writeln!(out, "</graphml>")?;

        Ok(())
    }
}

/// Escapes a value for a double-quoted XML attribute.
///
/// Whitespace control characters are written as character references so
/// parsers do not normalize them to spaces. Characters XML 1.0 cannot carry
/// become U+FFFD.
fn escape_attr(value: &str) -> Cow<'_, str> {
    if !value.chars().any(needs_escape) {
        return Cow::Borrowed(value);
    }

    let mut escaped = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            '\t' => escaped.push_str("&#x9;"),
            '\n' => escaped.push_str("&#xA;"),
            '\r' => escaped.push_str("&#xD;"),
            c if !is_xml_char(c) => escaped.push('\u{FFFD}'),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

fn needs_escape(c: char) -> bool {
    matches!(c, '&' | '<' | '>' | '"' | '\'' | '\t' | '\n' | '\r') || !is_xml_char(c)
}

/// The XML 1.0 `Char` production, minus surrogates which `char` excludes.
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
}
