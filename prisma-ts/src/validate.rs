//! Datamodel validation.
//!
//! Interfaces, enum constants and enum type aliases share one TypeScript
//! namespace per file, so model and enum names must be distinct from each
//! other. Field names are unique per model and value names per enum.

use std::collections::HashSet;

use crate::dmmf::{Datamodel, DatamodelEnum, Model};
use crate::error::ValidationError;

/// Validates a datamodel before emission.
///
/// # Errors
/// Returns the first duplicate found, models before enums.
pub fn validate_datamodel(datamodel: &Datamodel) -> Result<(), ValidationError> {
    let mut declarations = HashSet::new();

    for model in &datamodel.models {
        if !declarations.insert(model.name.as_str()) {
            return Err(ValidationError::DuplicateDeclaration {
                name: model.name.clone(),
            });
        }
        validate_model(model)?;
    }

    for enum_def in &datamodel.enums {
        if !declarations.insert(enum_def.name.as_str()) {
            return Err(ValidationError::DuplicateDeclaration {
                name: enum_def.name.clone(),
            });
        }
        validate_enum(enum_def)?;
    }

    Ok(())
}

fn validate_model(model: &Model) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for field in &model.fields {
        if !seen.insert(field.name.as_str()) {
            return Err(ValidationError::DuplicateField {
                model: model.name.clone(),
                field: field.name.clone(),
            });
        }
    }
    Ok(())
}

fn validate_enum(enum_def: &DatamodelEnum) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for value in &enum_def.values {
        if !seen.insert(value.name.as_str()) {
            return Err(ValidationError::DuplicateEnumValue {
                name: enum_def.name.clone(),
                value: value.name.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dmmf::Field;

    #[test]
    fn test_valid_datamodel() {
        let datamodel = Datamodel {
            models: vec![
                Model::new("User", vec![Field::scalar("id", "Int").required()]),
                Model::new("Post", vec![Field::scalar("id", "Int").required()]),
            ],
            enums: vec![DatamodelEnum::new("Role", ["ADMIN", "USER"])],
        };
        assert_eq!(validate_datamodel(&datamodel), Ok(()));
    }

    #[test]
    fn test_duplicate_model() {
        let datamodel = Datamodel {
            models: vec![Model::new("User", vec![]), Model::new("User", vec![])],
            enums: vec![],
        };
        assert_eq!(
            validate_datamodel(&datamodel),
            Err(ValidationError::DuplicateDeclaration {
                name: "User".to_string()
            })
        );
    }

    #[test]
    fn test_enum_clashing_with_model() {
        let datamodel = Datamodel {
            models: vec![Model::new("Status", vec![])],
            enums: vec![DatamodelEnum::new("Status", ["ON"])],
        };
        assert!(matches!(
            validate_datamodel(&datamodel),
            Err(ValidationError::DuplicateDeclaration { .. })
        ));
    }

    #[test]
    fn test_duplicate_field() {
        let datamodel = Datamodel {
            models: vec![Model::new(
                "User",
                vec![Field::scalar("id", "Int"), Field::scalar("id", "String")],
            )],
            enums: vec![],
        };
        assert_eq!(
            validate_datamodel(&datamodel),
            Err(ValidationError::DuplicateField {
                model: "User".to_string(),
                field: "id".to_string()
            })
        );
    }

    #[test]
    fn test_duplicate_enum_value() {
        let datamodel = Datamodel {
            models: vec![],
            enums: vec![DatamodelEnum::new("Role", ["ADMIN", "ADMIN"])],
        };
        assert_eq!(
            validate_datamodel(&datamodel),
            Err(ValidationError::DuplicateEnumValue {
                name: "Role".to_string(),
                value: "ADMIN".to_string()
            })
        );
    }
}
