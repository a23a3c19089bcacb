//! Prisma scalar to TypeScript type mappings.
//!
//! # Type Mappings
//!
//! | Prisma Scalar | TypeScript |
//! |---------------|------------|
//! | `Decimal`, `Int`, `Float`, `BigInt` | `number` |
//! | `DateTime` | `Date` |
//! | `Boolean` | `boolean` |
//! | `Json` | `any` |
//! | `String` | `string` |
//! | Anything else | unchanged (enum or custom type name) |

use crate::dmmf::Field;

/// Suffix appended to the type of a nullable field.
pub const NULLABLE_SUFFIX: &str = " | null";

/// Suffix appended to the type of a list field.
pub const LIST_SUFFIX: &str = "[]";

/// Map a scalar type identifier to its TypeScript type name.
///
/// Unknown identifiers are enum or custom type names and come back as-is.
pub fn map_scalar(scalar: &str) -> &str {
    match scalar {
        "Decimal" | "Int" | "Float" | "BigInt" => "number",
        "DateTime" => "Date",
        "Boolean" => "boolean",
        "Json" => "any",
        "String" => "string",
        other => other,
    }
}

/// Render the full TypeScript type of a field, including the nullable and
/// list suffixes.
pub fn map_field(field: &Field) -> String {
    let mut ty = map_scalar(&field.field_type).to_string();
    if !field.is_required {
        ty.push_str(NULLABLE_SUFFIX);
    }
    if field.is_list {
        ty.push_str(LIST_SUFFIX);
    }
    ty
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_scalars() {
        for scalar in ["Decimal", "Int", "Float", "BigInt"] {
            assert_eq!(map_scalar(scalar), "number", "{scalar}");
        }
    }

    #[test]
    fn test_other_scalars() {
        assert_eq!(map_scalar("DateTime"), "Date");
        assert_eq!(map_scalar("Boolean"), "boolean");
        assert_eq!(map_scalar("Json"), "any");
        assert_eq!(map_scalar("String"), "string");
    }

    #[test]
    fn test_unknown_passes_through() {
        assert_eq!(map_scalar("Role"), "Role");
        assert_eq!(map_scalar("Bytes"), "Bytes");
        assert_eq!(map_scalar("int"), "int");
        assert_eq!(map_scalar(""), "");
    }

    #[test]
    fn test_map_field_suffixes() {
        assert_eq!(map_field(&Field::scalar("id", "Int").required()), "number");
        assert_eq!(map_field(&Field::scalar("email", "String")), "string | null");
        assert_eq!(
            map_field(&Field::scalar("tags", "String").required().list()),
            "string[]"
        );
        assert_eq!(
            map_field(&Field::enumeration("role", "Role").required()),
            "Role"
        );
    }

    #[test]
    fn test_optional_list_keeps_suffix_order() {
        assert_eq!(
            map_field(&Field::scalar("scores", "Float").list()),
            "number | null[]"
        );
    }
}
