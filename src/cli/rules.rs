//! Rules command implementation: print a preset or check a rules file.

use super::{CliError, RulesPreset};
use ludo::game::{Board, Rules};
use std::path::Path;

/// Execute the rules command.
///
/// With a file, the file is loaded and validated against the standard
/// board. Without one, the preset is printed as JSON.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the rules are invalid.
pub(crate) fn execute(file: Option<&Path>, preset: RulesPreset) -> Result<(), CliError> {
    let rules = match file {
        Some(path) => load_checked(path)?,
        None => preset.rules(),
    };
    if let Some(path) = file {
        eprintln!("{}: OK", path.display());
    }
    println!("{}", rules.to_json()?);
    Ok(())
}

fn load_checked(path: &Path) -> Result<Rules, CliError> {
    let rules = Rules::from_json_file(path)
        .map_err(|e| CliError::new(format!("{}: {e}", path.display())))?;
    rules
        .validate(&Board::standard())
        .map_err(|e| CliError::new(format!("{}: {e}", path.display())))?;
    log::info!("{} validated", path.display());
    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_partial_rules_file_fills_defaults() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), r#"{"star_count": 2, "bonus_on_capture": true}"#).unwrap();
        let rules = load_checked(file.path()).unwrap();
        assert_eq!(rules.star_count, 2);
        assert!(rules.bonus_on_capture);
        assert_eq!(rules.dice_count, 1);
    }

    #[test]
    fn test_invalid_rules_file() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), r#"{"dice_count": 3}"#).unwrap();
        let err = load_checked(file.path()).unwrap_err();
        assert!(err.to_string().contains("dice_count"));
    }
}
