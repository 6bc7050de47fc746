//! Validation errors raised while building a package descriptor.

use thiserror::Error;

/// Reasons a set of descriptor fields cannot become a [`PackageDescriptor`].
///
/// [`PackageDescriptor`]: super::PackageDescriptor
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("required field '{0}' is missing or empty")]
    MissingField(&'static str),

    #[error("invalid entry point '{entry}' in [{category}]: {reason}")]
    InvalidEntryPoint {
        category: String,
        entry: String,
        reason: String,
    },

    #[error("entry point category name cannot be empty")]
    EmptyCategory,

    #[error("entry point category '{0}' may only contain letters, digits, '_' and '.'")]
    InvalidCategory(String),

    #[error("command '{command}' is declared more than once in [{category}]")]
    DuplicateCommand { category: String, command: String },

    #[error("'{0}' is not a valid dotted package path")]
    InvalidPackage(String),

    #[error("invalid dependency specifier '{requirement}': {reason}")]
    InvalidRequirement { requirement: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ValidationError::MissingField("name").to_string(),
            "required field 'name' is missing or empty"
        );

        let err = ValidationError::InvalidEntryPoint {
            category: "console_scripts".to_string(),
            entry: "start-app".to_string(),
            reason: "expected 'command = module:callable'".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid entry point 'start-app' in [console_scripts]: expected 'command = module:callable'"
        );
    }

    #[test]
    fn test_error_converts_to_anyhow() {
        let err: anyhow::Error = ValidationError::MissingField("version").into();
        assert!(err.downcast_ref::<ValidationError>().is_some());
    }
}
