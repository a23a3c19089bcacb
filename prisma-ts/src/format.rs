//! Normalization pass over emitted TypeScript.
//!
//! The text is parsed with tree-sitter and reprinted in one canonical style:
//!
//! - semicolons after declarations and interface members
//! - double-quoted strings
//! - trailing commas on broken object literals
//! - object literals kept on one line while the statement fits
//!   `print_width`, one entry per line otherwise
//! - type alias unions that do not fit broken into `| member` lines
//! - at most one blank line between statements, a single final newline
//!
//! Constructs the printer has no rule for are reproduced verbatim, so the
//! pass never changes meaning. Formatting formatted text is a no-op.

use std::str::FromStr;

use tree_sitter::{Node, Parser};

use crate::error::FormatError;

/// Line ending of the formatted output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EndOfLine {
    /// `\n`
    Lf,
    /// `\r\n`
    Crlf,
    /// Keep the first line ending found in the input, `\n` if none.
    #[default]
    Auto,
}

impl FromStr for EndOfLine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lf" => Ok(EndOfLine::Lf),
            "crlf" => Ok(EndOfLine::Crlf),
            "auto" => Ok(EndOfLine::Auto),
            other => Err(format!("expected lf, crlf or auto, got '{other}'")),
        }
    }
}

/// Options for the normalization pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    /// Line width objects and unions are wrapped at.
    pub print_width: usize,

    /// Spaces per indentation level.
    pub tab_width: usize,

    /// Line ending of the output.
    pub end_of_line: EndOfLine,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            print_width: 100,
            tab_width: 2,
            end_of_line: EndOfLine::Auto,
        }
    }
}

/// Deterministic TypeScript formatter.
#[derive(Debug, Clone, Default)]
pub struct Formatter {
    options: FormatOptions,
}

impl Formatter {
    /// Create a formatter with the given options.
    pub fn new(options: FormatOptions) -> Self {
        Self { options }
    }

    /// Format TypeScript source.
    ///
    /// Fails if the source does not parse cleanly.
    pub fn format(&self, source: &str) -> Result<String, FormatError> {
        let crlf = match self.options.end_of_line {
            EndOfLine::Lf => false,
            EndOfLine::Crlf => true,
            EndOfLine::Auto => first_line_ending_is_crlf(source),
        };

        let source = source.replace("\r\n", "\n");
        if source.trim().is_empty() {
            return Ok(String::new());
        }

        let mut parser = Parser::new();
        parser
            .set_language(&arborium_typescript::language().into())
            .map_err(|e| FormatError::Parser(e.to_string()))?;

        let tree = parser
            .parse(&source, None)
            .ok_or_else(|| FormatError::Parser("parser returned no tree".to_string()))?;

        let root = tree.root_node();
        if root.has_error() {
            return Err(syntax_error(root, &source));
        }

        let printer = Printer {
            source: &source,
            options: &self.options,
        };
        let output = printer.program(root);

        if crlf {
            Ok(output.replace('\n', "\r\n"))
        } else {
            Ok(output)
        }
    }
}

fn first_line_ending_is_crlf(source: &str) -> bool {
    source
        .find('\n')
        .is_some_and(|i| i > 0 && source.as_bytes()[i - 1] == b'\r')
}

/// Build an error for the first erroneous or missing node.
fn syntax_error(root: Node, source: &str) -> FormatError {
    let node = first_error(root).unwrap_or(root);
    let position = node.start_position();

    let message = if node.is_missing() {
        format!("missing {}", node.kind())
    } else {
        let snippet: String = node
            .utf8_text(source.as_bytes())
            .unwrap_or("")
            .chars()
            .take(40)
            .collect();
        format!("unexpected `{}`", collapse_whitespace(&snippet))
    };

    FormatError::syntax(position.row, position.column, message)
}

fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|c| c.has_error() || c.is_missing())
        .find_map(first_error)
}

struct Printer<'a> {
    source: &'a str,
    options: &'a FormatOptions,
}

impl<'a> Printer<'a> {
    fn text(&self, node: Node) -> &'a str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    fn indent(&self, depth: usize) -> String {
        " ".repeat(self.options.tab_width * depth)
    }

    fn fits(&self, line: &str) -> bool {
        line.chars().count() <= self.options.print_width
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn program(&self, root: Node) -> String {
        let items = named_children(root);
        self.items(&items, 0, |printer, node| printer.statement(node, 0))
    }

    /// Print a sequence of statements or members, one per line, keeping a
    /// single blank line where the source had one and trailing comments on
    /// the line they followed.
    fn items<F>(&self, items: &[Node], depth: usize, print: F) -> String
    where
        F: Fn(&Self, Node) -> String,
    {
        let indent = self.indent(depth);
        let mut out = String::new();
        let mut prev_end_row: Option<usize> = None;

        for &item in items {
            let start_row = item.start_position().row;
            if let Some(prev) = prev_end_row {
                if item.kind() == "comment" && start_row == prev {
                    out.pop();
                    out.push(' ');
                    out.push_str(self.text(item).trim());
                    out.push('\n');
                    prev_end_row = Some(item.end_position().row);
                    continue;
                }
                if start_row > prev + 1 {
                    out.push('\n');
                }
            }

            let printed = if item.kind() == "comment" {
                self.text(item).trim().to_string()
            } else {
                print(self, item)
            };
            out.push_str(&indent);
            out.push_str(&printed);
            out.push('\n');
            prev_end_row = Some(item.end_position().row);
        }

        out
    }

    fn statement(&self, node: Node, depth: usize) -> String {
        match node.kind() {
            "export_statement" => match node.child_by_field_name("declaration") {
                Some(decl) if is_declaration(decl.kind()) => {
                    self.declaration(decl, "export ", depth)
                }
                _ => self.verbatim(node),
            },
            kind if is_declaration(kind) => self.declaration(node, "", depth),
            _ => self.verbatim(node),
        }
    }

    fn declaration(&self, node: Node, lead: &str, depth: usize) -> String {
        let printed = match node.kind() {
            "interface_declaration" => self.interface(node, lead, depth),
            "type_alias_declaration" => self.type_alias(node, lead, depth),
            "lexical_declaration" => self.lexical(node, lead, depth),
            _ => None,
        };
        printed.unwrap_or_else(|| format!("{lead}{}", self.verbatim(node)))
    }

    fn verbatim(&self, node: Node) -> String {
        self.text(node).trim().to_string()
    }

    fn interface(&self, node: Node, lead: &str, depth: usize) -> Option<String> {
        let name = node.child_by_field_name("name")?;
        let body = node.child_by_field_name("body")?;

        let mut header = format!("{lead}interface {}", self.text(name));
        if let Some(params) = node.child_by_field_name("type_parameters") {
            header.push_str(&collapse_whitespace(self.text(params)));
        }
        let children = children(node);
        if let Some(extends) = children.iter().find(|c| c.kind() == "extends_type_clause") {
            header.push(' ');
            header.push_str(&collapse_whitespace(self.text(*extends)));
        }

        let members = named_children(body);
        if members.is_empty() {
            return Some(format!("{header} {{}}"));
        }

        let body = self.items(&members, depth + 1, |printer, member| {
            format!("{};", printer.member(member))
        });
        Some(format!("{header} {{\n{body}{}}}", self.indent(depth)))
    }

    fn member(&self, node: Node) -> String {
        if node.kind() != "property_signature" {
            let text = collapse_whitespace(self.text(node));
            return text.trim_end_matches([';', ',']).to_string();
        }

        let name = node.child_by_field_name("name");
        let mut out = String::new();
        for child in children(node) {
            if Some(child) == name {
                out.push_str(&self.property_name(child));
                continue;
            }
            match child.kind() {
                "?" => out.push('?'),
                "type_annotation" => {
                    out.push_str(": ");
                    match named_children(child).first() {
                        Some(ty) => out.push_str(&self.ty(*ty)),
                        None => out.push_str(&collapse_whitespace(self.text(child))),
                    }
                }
                _ => {
                    out.push_str(self.text(child));
                    out.push(' ');
                }
            }
        }
        out
    }

    fn type_alias(&self, node: Node, lead: &str, depth: usize) -> Option<String> {
        let name = node.child_by_field_name("name")?;
        let value = node.child_by_field_name("value")?;

        let mut header = format!("{lead}type {}", self.text(name));
        if let Some(params) = node.child_by_field_name("type_parameters") {
            header.push_str(&collapse_whitespace(self.text(params)));
        }

        let flat = format!("{header} = {};", self.ty(value));
        let width = self.indent(depth).len() + flat.chars().count();
        if width <= self.options.print_width || value.kind() != "union_type" {
            return Some(flat);
        }

        let members = self.union_members(value);
        let indent = self.indent(depth + 1);
        let lines: Vec<String> = members.iter().map(|m| format!("{indent}| {m}")).collect();
        Some(format!("{header} =\n{};", lines.join("\n")))
    }

    fn lexical(&self, node: Node, lead: &str, depth: usize) -> Option<String> {
        let keyword = node.child_by_field_name("kind")?;
        let declarators: Vec<Node> = named_children(node)
            .into_iter()
            .filter(|c| c.kind() == "variable_declarator")
            .collect();
        if declarators.is_empty() {
            return None;
        }

        let print = |broken: bool| -> String {
            let parts: Vec<String> = declarators
                .iter()
                .map(|d| self.declarator(*d, depth, broken))
                .collect();
            format!("{lead}{} {};", self.text(keyword), parts.join(", "))
        };

        let flat = print(false);
        if self.fits(&format!("{}{flat}", self.indent(depth))) || !flat.contains('{') {
            Some(flat)
        } else {
            Some(print(true))
        }
    }

    fn declarator(&self, node: Node, depth: usize, broken: bool) -> String {
        let mut out = String::new();
        if let Some(name) = node.child_by_field_name("name") {
            out.push_str(&collapse_whitespace(self.text(name)));
        }
        if let Some(annotation) = node.child_by_field_name("type") {
            out.push_str(": ");
            match named_children(annotation).first() {
                Some(ty) => out.push_str(&self.ty(*ty)),
                None => out.push_str(&collapse_whitespace(self.text(annotation))),
            }
        }
        if let Some(value) = node.child_by_field_name("value") {
            out.push_str(" = ");
            out.push_str(&self.expression(value, depth, broken));
        }
        out
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn expression(&self, node: Node, depth: usize, broken: bool) -> String {
        match node.kind() {
            "object" => self.object(node, depth, broken),
            "as_expression" => self.as_expression(node, depth, broken),
            "string" => self.string(node),
            "parenthesized_expression" => match named_children(node).first() {
                Some(inner) => format!("({})", self.expression(*inner, depth, broken)),
                None => self.verbatim(node),
            },
            "array" => {
                let elements = named_children(node);
                if elements.iter().any(|e| e.kind() == "comment") {
                    return self.verbatim(node);
                }
                let parts: Vec<String> = elements
                    .iter()
                    .map(|e| self.expression(*e, depth, false))
                    .collect();
                format!("[{}]", parts.join(", "))
            }
            _ => self.verbatim(node),
        }
    }

    fn as_expression(&self, node: Node, depth: usize, broken: bool) -> String {
        let children = children(node);
        let Some(expr) = children.iter().find(|c| c.is_named()) else {
            return self.verbatim(node);
        };

        let target = children
            .iter()
            .skip_while(|c| c.kind() != "as")
            .nth(1)
            .map(|c| {
                if c.is_named() {
                    self.ty(*c)
                } else {
                    self.text(*c).to_string()
                }
            });

        match target {
            Some(target) => format!("{} as {target}", self.expression(*expr, depth, broken)),
            None => self.verbatim(node),
        }
    }

    fn object(&self, node: Node, depth: usize, broken: bool) -> String {
        let entries = named_children(node);
        if entries.is_empty() {
            return "{}".to_string();
        }
        if entries.iter().any(|e| e.kind() == "comment") {
            return self.verbatim(node);
        }

        let parts: Vec<String> = entries
            .iter()
            .map(|e| self.object_entry(*e, depth + 1))
            .collect();

        if broken {
            let indent = self.indent(depth + 1);
            let lines: String = parts
                .iter()
                .map(|p| format!("{indent}{p},\n"))
                .collect();
            format!("{{\n{lines}{}}}", self.indent(depth))
        } else {
            format!("{{ {} }}", parts.join(", "))
        }
    }

    fn object_entry(&self, node: Node, depth: usize) -> String {
        match node.kind() {
            "pair" => {
                let key = node.child_by_field_name("key");
                let value = node.child_by_field_name("value");
                match (key, value) {
                    (Some(key), Some(value)) => format!(
                        "{}: {}",
                        self.property_name(key),
                        self.expression(value, depth, false)
                    ),
                    _ => collapse_whitespace(self.text(node)),
                }
            }
            _ => collapse_whitespace(self.text(node)),
        }
    }

    fn property_name(&self, node: Node) -> String {
        match node.kind() {
            "string" => self.string(node),
            _ => self.text(node).to_string(),
        }
    }

    fn string(&self, node: Node) -> String {
        requote(self.text(node))
    }

    // =========================================================================
    // Types
    // =========================================================================

    fn ty(&self, node: Node) -> String {
        match node.kind() {
            "union_type" => self.union_members(node).join(" | "),
            "intersection_type" => {
                let parts: Vec<String> = named_children(node).iter().map(|t| self.ty(*t)).collect();
                parts.join(" & ")
            }
            "array_type" => match named_children(node).first() {
                Some(element) => format!("{}[]", self.ty(*element)),
                None => collapse_whitespace(self.text(node)),
            },
            "parenthesized_type" => match named_children(node).first() {
                Some(inner) => format!("({})", self.ty(*inner)),
                None => collapse_whitespace(self.text(node)),
            },
            "lookup_type" => match named_children(node).as_slice() {
                [object, index] => format!("{}[{}]", self.ty(*object), self.ty(*index)),
                _ => collapse_whitespace(self.text(node)),
            },
            "index_type_query" => match named_children(node).first() {
                Some(inner) => format!("keyof {}", self.ty(*inner)),
                None => collapse_whitespace(self.text(node)),
            },
            "type_query" => match named_children(node).first() {
                Some(inner) => format!("typeof {}", collapse_whitespace(self.text(*inner))),
                None => collapse_whitespace(self.text(node)),
            },
            "literal_type" => match named_children(node).first() {
                Some(inner) if inner.kind() == "string" => self.string(*inner),
                _ => collapse_whitespace(self.text(node)),
            },
            "generic_type" => {
                let name = node.child_by_field_name("name");
                let args = node.child_by_field_name("type_arguments");
                match (name, args) {
                    (Some(name), Some(args)) => {
                        let parts: Vec<String> =
                            named_children(args).iter().map(|t| self.ty(*t)).collect();
                        format!("{}<{}>", self.text(name), parts.join(", "))
                    }
                    _ => collapse_whitespace(self.text(node)),
                }
            }
            _ => collapse_whitespace(self.text(node)),
        }
    }

    /// Members of a union, flattened across the left-nested parse.
    fn union_members(&self, node: Node) -> Vec<String> {
        let mut members = Vec::new();
        for child in named_children(node) {
            if child.kind() == "union_type" {
                members.extend(self.union_members(child));
            } else {
                members.push(self.ty(child));
            }
        }
        members
    }
}

fn is_declaration(kind: &str) -> bool {
    matches!(
        kind,
        "interface_declaration" | "type_alias_declaration" | "lexical_declaration"
    )
}

fn children(node: Node) -> Vec<Node> {
    let mut cursor = node.walk();
    node.children(&mut cursor).collect()
}

fn named_children(node: Node) -> Vec<Node> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Rewrite a string literal with double quotes.
fn requote(literal: &str) -> String {
    if literal.len() < 2 || literal.starts_with('"') || !literal.starts_with('\'') {
        return literal.to_string();
    }

    let inner = &literal[1..literal.len() - 1];
    let mut out = String::with_capacity(literal.len() + 2);
    out.push('"');
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('\'') => out.push('\''),
                Some(next) => {
                    out.push('\\');
                    out.push(next);
                }
                None => out.push('\\'),
            },
            '"' => out.push_str("\\\""),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format(source: &str) -> String {
        Formatter::default().format(source).unwrap()
    }

    #[test]
    fn test_interface_is_reindented() {
        let output = format("export interface User {\nid: number\nemail: string| null\n}\n");
        assert_eq!(
            output,
            "export interface User {\n  id: number;\n  email: string | null;\n}\n"
        );
    }

    #[test]
    fn test_empty_interface() {
        assert_eq!(
            format("export interface Marker {\n}\n"),
            "export interface Marker {}\n"
        );
    }

    #[test]
    fn test_enum_object_collapses_to_one_line() {
        let source = "export const Role = {ADMIN: \"ADMIN\",\nUSER: \"USER\",\n} as const;\n\
                      export type Role = (typeof Role)[keyof typeof Role];\n";
        assert_eq!(
            format(source),
            "export const Role = { ADMIN: \"ADMIN\", USER: \"USER\" } as const;\n\
             export type Role = (typeof Role)[keyof typeof Role];\n"
        );
    }

    #[test]
    fn test_long_object_breaks_with_trailing_commas() {
        let options = FormatOptions {
            print_width: 40,
            ..Default::default()
        };
        let output = Formatter::new(options)
            .format("export const Status = { ACTIVE: \"ACTIVE\", INACTIVE: \"INACTIVE\" } as const;")
            .unwrap();
        assert_eq!(
            output,
            "export const Status = {\n  ACTIVE: \"ACTIVE\",\n  INACTIVE: \"INACTIVE\",\n} as const;\n"
        );
    }

    #[test]
    fn test_long_union_alias_breaks() {
        let options = FormatOptions {
            print_width: 30,
            ..Default::default()
        };
        let output = Formatter::new(options)
            .format("type Color = 'red' | 'green' | 'blue' | 'yellow';")
            .unwrap();
        assert_eq!(
            output,
            "type Color =\n  | \"red\"\n  | \"green\"\n  | \"blue\"\n  | \"yellow\";\n"
        );
    }

    #[test]
    fn test_single_quotes_become_double() {
        assert_eq!(
            format("const a = { k: 'it\\'s \"x\"' };"),
            "const a = { k: \"it's \\\"x\\\"\" };\n"
        );
    }

    #[test]
    fn test_blank_lines_are_collapsed() {
        let output = format("interface A {}\n\n\n\ninterface B {}\ninterface C {}");
        assert_eq!(output, "interface A {}\n\ninterface B {}\ninterface C {}\n");
    }

    #[test]
    fn test_comments_are_kept() {
        let output = format("// header\ninterface A {\n  // note\n  a: string; // trailing\n}\n");
        assert_eq!(
            output,
            "// header\ninterface A {\n  // note\n  a: string; // trailing\n}\n"
        );
    }

    #[test]
    fn test_tab_width() {
        let options = FormatOptions {
            tab_width: 4,
            ..Default::default()
        };
        let output = Formatter::new(options)
            .format("interface A { a: string }")
            .unwrap();
        assert_eq!(output, "interface A {\n    a: string;\n}\n");
    }

    #[test]
    fn test_end_of_line_auto_keeps_crlf() {
        let output = format("interface A {\r\na: string\r\n}\r\n");
        assert_eq!(output, "interface A {\r\n  a: string;\r\n}\r\n");
    }

    #[test]
    fn test_end_of_line_lf_overrides() {
        let options = FormatOptions {
            end_of_line: EndOfLine::Lf,
            ..Default::default()
        };
        let output = Formatter::new(options)
            .format("interface A {\r\na: string\r\n}\r\n")
            .unwrap();
        assert_eq!(output, "interface A {\n  a: string;\n}\n");
    }

    #[test]
    fn test_empty_source() {
        assert_eq!(format(""), "");
        assert_eq!(format("\n\n  \n"), "");
    }

    #[test]
    fn test_syntax_error_reports_position() {
        let err = Formatter::default()
            .format("export interface User {\n  id: number;\n")
            .unwrap_err();
        assert!(matches!(err, FormatError::Syntax { .. }), "{err}");
    }

    #[test]
    fn test_garbage_is_rejected() {
        let err = Formatter::default().format("export interface {{{").unwrap_err();
        match err {
            FormatError::Syntax { line, .. } => assert_eq!(line, 1),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_format_is_idempotent() {
        let source = "export interface Post {\ntitle: string\ntags: string[]\nmeta: any| null\n}\n\n\
                      export const Status = {DRAFT: \"DRAFT\",\nPUBLISHED: \"PUBLISHED\",\n} as const;\n\
                      export type Status = (typeof Status)[keyof typeof Status];\n";
        let once = format(source);
        assert_eq!(format(&once), once);
    }

    #[test]
    fn test_quoted_member_keeps_quotes() {
        let source = "export interface Paper {\n'abstract': string | null\n}\n";
        let once = format(source);
        assert_eq!(
            once,
            "export interface Paper {\n  \"abstract\": string | null;\n}\n"
        );
        assert_eq!(format(&once), once);
    }

    #[test]
    fn test_end_of_line_from_str() {
        assert_eq!("LF".parse::<EndOfLine>(), Ok(EndOfLine::Lf));
        assert_eq!("crlf".parse::<EndOfLine>(), Ok(EndOfLine::Crlf));
        assert_eq!("auto".parse::<EndOfLine>(), Ok(EndOfLine::Auto));
        assert!("cr".parse::<EndOfLine>().is_err());
    }

    #[test]
    fn test_requote() {
        assert_eq!(requote("'abc'"), "\"abc\"");
        assert_eq!(requote("\"abc\""), "\"abc\"");
        assert_eq!(requote("'a\"b'"), "\"a\\\"b\"");
        assert_eq!(requote("'a\\nb'"), "\"a\\nb\"");
    }
}
