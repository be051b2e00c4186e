//! Flagset validation.
//!
//! Catches declaration mistakes that the builders accept, such as duplicate
//! names, names written with their `--` prefix, and a flag named `help`,
//! which the parser handles itself.
//!
//! # Examples
//!
//! ```
//! use flagset_core::*;
//!
//! let flagset = Flagset::new().with_flag(Flag::required("verbose", "", BooleanFlag));
//! assert!(validate_flagset(&flagset).is_empty());
//!
//! // Invalid: name given with its leading dashes
//! let bad = Flagset::new().with_flag(Flag::required("--verbose", "", BooleanFlag));
//! assert!(!validate_flagset(&bad).is_empty());
//! ```

use std::collections::HashSet;

use crate::error::DefinitionError;
use crate::flagset::Flagset;

/// Name the parser reserves for help requests.
pub const RESERVED_HELP: &str = "help";

/// Validates a flagset.
///
/// Checks for empty names, names starting with `-` or containing
/// whitespace or `=`, the reserved `help` name, and duplicates. Stops at the
/// first problem.
///
/// # Examples
///
/// ```
/// use flagset_core::*;
///
/// let flagset = Flagset::new()
///     .with_flag(Flag::optional("title", "", StringFlag))
///     .with_flag(Flag::required("title", "", StringFlag));
/// assert_eq!(
///     validate_flagset(&flagset),
///     vec![DefinitionError::DuplicateFlag("title".to_string())]
/// );
/// ```
pub fn validate_flagset(flagset: &Flagset) -> Vec<DefinitionError> {
    let mut errors = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for flag in flagset.iter() {
        let name = flag.name();
        if name.trim().is_empty() {
            errors.push(DefinitionError::EmptyFlagName);
            return errors;
        }

        if name.starts_with('-') || name.contains('=') || name.chars().any(char::is_whitespace) {
            errors.push(DefinitionError::InvalidFlagName(name.to_string()));
            return errors;
        }

        if name == RESERVED_HELP {
            errors.push(DefinitionError::ReservedFlagName(name.to_string()));
            return errors;
        }

        if !seen.insert(name) {
            errors.push(DefinitionError::DuplicateFlag(name.to_string()));
            return errors;
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flag_type::{BooleanFlag, StringFlag};
    use crate::flagset::Flag;

    #[test]
    fn test_validate_flagset_rejects_help() {
        let flagset = Flagset::new().with_flag(Flag::optional("help", "", BooleanFlag));

        let errors = validate_flagset(&flagset);
        assert_eq!(
            errors,
            vec![DefinitionError::ReservedFlagName("help".to_string())]
        );
    }

    #[test]
    fn test_validate_flagset_rejects_bad_names() {
        for name in ["--title", "dry run", "out=x", "-v"] {
            let flagset = Flagset::new().with_flag(Flag::optional(name, "", StringFlag));
            assert_eq!(
                validate_flagset(&flagset),
                vec![DefinitionError::InvalidFlagName(name.to_string())]
            );
        }
    }

    #[test]
    fn test_validate_flagset_rejects_empty_name() {
        let flagset = Flagset::new().with_flag(Flag::optional(" ", "", StringFlag));

        let errors = validate_flagset(&flagset);
        assert_eq!(errors, vec![DefinitionError::EmptyFlagName]);
    }

    #[test]
    fn test_validate_flagset_accepts_valid_flagset() {
        let flagset = Flagset::new()
            .with_flag(Flag::required("dry-run", "", BooleanFlag))
            .with_flag(Flag::optional("title", "", StringFlag));

        assert!(validate_flagset(&flagset).is_empty());
    }
}
