//! TypeScript declaration emitter.
//!
//! Renders one block per declaration:
//!
//! - models become `export interface` declarations holding their scalar and
//!   enum fields
//! - enums become an `as const` object keyed by member name plus a type alias
//!   for the union of its values
//!
//! The emitted text is canonical but unformatted for width; the
//! [`format`](crate::format) pass normalizes it before it is written.

use crate::dmmf::{Datamodel, DatamodelEnum, Model};
use crate::type_mapper;

/// Render every model followed by every enum, blocks separated by a blank
/// line. An empty datamodel renders to an empty string.
pub fn render_datamodel(datamodel: &Datamodel) -> String {
    let blocks: Vec<String> = datamodel
        .models
        .iter()
        .map(render_model)
        .chain(datamodel.enums.iter().map(render_enum))
        .collect();

    if blocks.is_empty() {
        return String::new();
    }

    let mut output = blocks.join("\n\n");
    output.push('\n');
    output
}

/// Render a model as an interface.
pub fn render_model(model: &Model) -> String {
    for field in model.fields.iter().filter(|f| !f.kind.is_emitted()) {
        tracing::trace!(
            model = %model.name,
            field = %field.name,
            kind = ?field.kind,
            "Skipping non-scalar field"
        );
    }

    let fields: Vec<String> = model
        .emitted_fields()
        .map(|field| {
            format!(
                "  {}: {};",
                member_key(&field.name),
                type_mapper::map_field(field)
            )
        })
        .collect();

    tracing::debug!(model = %model.name, fields = fields.len(), "Rendered interface");

    if fields.is_empty() {
        format!("export interface {} {{}}", model.name)
    } else {
        format!(
            "export interface {} {{\n{}\n}}",
            model.name,
            fields.join("\n")
        )
    }
}

/// Render an enum as a const object and a derived union type.
pub fn render_enum(enum_def: &DatamodelEnum) -> String {
    let entries: Vec<String> = enum_def
        .values
        .iter()
        .map(|v| format!("{}: {}", property_key(&v.name), string_literal(&v.name)))
        .collect();

    tracing::debug!(
        name = %enum_def.name,
        values = entries.len(),
        "Rendered enum"
    );

    let object = if entries.is_empty() {
        "{}".to_string()
    } else {
        format!("{{ {} }}", entries.join(", "))
    };

    format!(
        "export const {name} = {object} as const;\nexport type {name} = (typeof {name})[keyof typeof {name}];",
        name = enum_def.name,
    )
}

/// Quote a name as an object key unless it is a plain identifier.
fn property_key(name: &str) -> String {
    if is_identifier(name) {
        name.to_string()
    } else {
        string_literal(name)
    }
}

/// Interface member names the TypeScript grammar reads as a modifier when
/// they stand alone before `:`.
const MODIFIER_MEMBER_NAMES: &[&str] = &["abstract"];

/// Key of an interface member. Names in [`MODIFIER_MEMBER_NAMES`] are
/// quoted so the declaration parses.
fn member_key(name: &str) -> String {
    if MODIFIER_MEMBER_NAMES.contains(&name) {
        string_literal(name)
    } else {
        property_key(name)
    }
}

/// Double-quoted string literal.
pub(crate) fn string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dmmf::{Field, FieldKind};

    fn user() -> Model {
        Model::new(
            "User",
            vec![
                Field::scalar("id", "Int").required(),
                Field::scalar("email", "String"),
                Field::scalar("tags", "String").required().list(),
            ],
        )
    }

    #[test]
    fn test_render_model() {
        assert_eq!(
            render_model(&user()),
            "export interface User {\n  id: number;\n  email: string | null;\n  tags: string[];\n}"
        );
    }

    #[test]
    fn test_render_model_skips_relations_and_unsupported() {
        let model = Model::new(
            "Post",
            vec![
                Field::relation("author", "User").required(),
                Field::scalar("title", "String").required(),
                Field::new("location", FieldKind::Unsupported, "point"),
                Field::enumeration("status", "Status").required(),
            ],
        );

        assert_eq!(
            render_model(&model),
            "export interface Post {\n  title: string;\n  status: Status;\n}"
        );
    }

    #[test]
    fn test_render_empty_model() {
        let model = Model::new("Marker", vec![Field::relation("owner", "User")]);
        assert_eq!(render_model(&model), "export interface Marker {}");
    }

    #[test]
    fn test_render_enum() {
        let role = DatamodelEnum::new("Role", ["ADMIN", "USER"]);
        assert_eq!(
            render_enum(&role),
            "export const Role = { ADMIN: \"ADMIN\", USER: \"USER\" } as const;\n\
             export type Role = (typeof Role)[keyof typeof Role];"
        );
    }

    #[test]
    fn test_render_empty_enum() {
        let empty = DatamodelEnum::new("Nothing", Vec::<String>::new());
        assert_eq!(
            render_enum(&empty),
            "export const Nothing = {} as const;\n\
             export type Nothing = (typeof Nothing)[keyof typeof Nothing];"
        );
    }

    #[test]
    fn test_render_datamodel_orders_models_before_enums() {
        let datamodel = Datamodel {
            models: vec![user(), Model::new("Empty", vec![])],
            enums: vec![DatamodelEnum::new("Role", ["ADMIN"])],
        };

        let output = render_datamodel(&datamodel);
        let user_at = output.find("interface User").unwrap();
        let empty_at = output.find("interface Empty").unwrap();
        let role_at = output.find("const Role").unwrap();
        assert!(user_at < empty_at && empty_at < role_at);
        assert!(output.contains("}\n\nexport interface Empty {}\n\nexport const Role"));
        assert!(output.ends_with(";\n"));
    }

    #[test]
    fn test_render_empty_datamodel() {
        assert_eq!(render_datamodel(&Datamodel::default()), "");
    }

    #[test]
    fn test_property_key_quotes_non_identifiers() {
        assert_eq!(property_key("ADMIN"), "ADMIN");
        assert_eq!(property_key("_private"), "_private");
        assert_eq!(property_key("1st"), "\"1st\"");
        assert_eq!(property_key("with-dash"), "\"with-dash\"");
    }

    #[test]
    fn test_member_key_quotes_modifier_names() {
        assert_eq!(member_key("abstract"), "\"abstract\"");
        assert_eq!(member_key("readonly"), "readonly");
        assert_eq!(member_key("with-dash"), "\"with-dash\"");
    }

    #[test]
    fn test_render_model_with_abstract_field() {
        let paper = Model::new(
            "Paper",
            vec![
                Field::scalar("title", "String").required(),
                Field::scalar("abstract", "String"),
            ],
        );
        assert_eq!(
            render_model(&paper),
            "export interface Paper {\n  title: string;\n  \"abstract\": string | null;\n}"
        );
    }

    #[test]
    fn test_enum_keys_are_not_member_quoted() {
        let kind = DatamodelEnum::new("Kind", ["abstract"]);
        assert!(render_enum(&kind).contains("{ abstract: \"abstract\" }"));
    }

    #[test]
    fn test_string_literal_escapes() {
        assert_eq!(string_literal("plain"), "\"plain\"");
        assert_eq!(string_literal("a\"b"), "\"a\\\"b\"");
        assert_eq!(string_literal("a\\b"), "\"a\\\\b\"");
    }
}
