//! Datamodel description handed over by the Prisma schema engine.
//!
//! These types deserialize the subset of the DMMF (data model meta format)
//! the generator reads. Every other attribute in the payload is ignored, so
//! newer engine versions that add fields keep deserializing.

use serde::Deserialize;

/// The `dmmf` document of a generator invocation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Resolved datamodel.
    pub datamodel: Datamodel,
}

/// Models and enums of a schema, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Datamodel {
    /// Models, in schema order.
    pub models: Vec<Model>,

    /// Enums, in schema order.
    pub enums: Vec<DatamodelEnum>,
}

/// A named entity with ordered fields.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Model {
    /// Model name, unique within the schema.
    pub name: String,

    /// Fields, in declaration order.
    #[serde(default)]
    pub fields: Vec<Field>,
}

/// A single field of a model.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    /// Field name.
    pub name: String,

    /// What the field holds.
    pub kind: FieldKind,

    /// Scalar type identifier (`Int`, `String`, ...) or the name of the
    /// referenced enum or model.
    #[serde(rename = "type")]
    pub field_type: String,

    /// Whether the field is non-nullable.
    #[serde(default)]
    pub is_required: bool,

    /// Whether the field is repeated.
    #[serde(default)]
    pub is_list: bool,
}

/// Kind of a field, as reported by the schema engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKind {
    /// Primitive value.
    Scalar,
    /// Value constrained to an enum.
    Enum,
    /// Relation to another model. The engine reports these as `object`.
    #[serde(rename = "object", alias = "relation")]
    Relation,
    /// Native type the engine cannot represent.
    Unsupported,
}

impl FieldKind {
    /// Whether fields of this kind become interface properties.
    pub fn is_emitted(self) -> bool {
        matches!(self, FieldKind::Scalar | FieldKind::Enum)
    }
}

/// A named enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatamodelEnum {
    /// Enum name, unique within the schema.
    pub name: String,

    /// Values, in declaration order.
    #[serde(default)]
    pub values: Vec<EnumValue>,
}

/// A single enum member.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumValue {
    /// Member name.
    pub name: String,

    /// Database-level name from `@map`, if any.
    #[serde(default)]
    pub db_name: Option<String>,
}

impl Model {
    /// Create a model with the given fields.
    pub fn new(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Fields that become interface properties, in declaration order.
    pub fn emitted_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.kind.is_emitted())
    }
}

impl Field {
    /// Create an optional, non-list field.
    pub fn new(name: impl Into<String>, kind: FieldKind, field_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            field_type: field_type.into(),
            is_required: false,
            is_list: false,
        }
    }

    /// Create a scalar field.
    pub fn scalar(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Scalar, field_type)
    }

    /// Create an enum field.
    pub fn enumeration(name: impl Into<String>, enum_name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Enum, enum_name)
    }

    /// Create a relation field.
    pub fn relation(name: impl Into<String>, model_name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Relation, model_name)
    }

    /// Mark the field as required.
    pub fn required(mut self) -> Self {
        self.is_required = true;
        self
    }

    /// Mark the field as a list.
    pub fn list(mut self) -> Self {
        self.is_list = true;
        self
    }
}

impl DatamodelEnum {
    /// Create an enum from its member names.
    pub fn new<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            values: values
                .into_iter()
                .map(|v| EnumValue {
                    name: v.into(),
                    db_name: None,
                })
                .collect(),
        }
    }
}
