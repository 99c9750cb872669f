//! Client-side validation of collection config documents.
//!
//! Pure functions only. Validation runs before any RPC is issued so an
//! invalid document never reaches the server.

use serde_yaml::Value;

use crate::domain::error::ValidationError;
use crate::domain::model::{Config, ConfigType};

/// Fields a user may change on an existing config. `None` keeps the stored
/// value; the version is assigned by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigEdit {
    pub config_type: Option<ConfigType>,
    pub context: Option<String>,
    pub detail: Option<String>,
}

impl ConfigEdit {
    #[must_use]
    pub fn apply(&self, current: &Config) -> Config {
        Config {
            name: current.name.clone(),
            config_type: self.config_type.unwrap_or(current.config_type),
            version: current.version,
            context: self.context.clone().unwrap_or_else(|| current.context.clone()),
            detail: self.detail.clone().unwrap_or_else(|| current.detail.clone()),
        }
    }
}

/// Validate a whole config before it is sent.
pub fn validate_config(config: &Config) -> Result<(), ValidationError> {
    validate_detail(config.config_type, &config.detail)
}

/// Plugin sections every pipeline must declare with at least one plugin.
pub const REQUIRED_SECTIONS: &[&str] = &["inputs", "flushers"];

/// Plugin sections that may be omitted but must not be `null`.
pub const OPTIONAL_SECTIONS: &[&str] = &["processors", "aggregators"];

/// Validate a config `detail` for the given type.
///
/// Every document must be well-formed YAML. Pipeline documents must also
/// satisfy [`validate_pipeline`].
pub fn validate_detail(config_type: ConfigType, detail: &str) -> Result<(), ValidationError> {
    let doc = parse(detail)?;
    match config_type {
        ConfigType::Pipeline => validate_pipeline(&doc),
        ConfigType::Agent => Ok(()),
    }
}

fn parse(detail: &str) -> Result<Value, ValidationError> {
    serde_yaml::from_str(detail).map_err(|e| ValidationError::Parse(e.to_string()))
}

/// Check the plugin structure of a parsed pipeline document.
pub fn validate_pipeline(doc: &Value) -> Result<(), ValidationError> {
    let Value::Mapping(map) = doc else {
        return Err(ValidationError::NotAMapping);
    };

    for &section in REQUIRED_SECTIONS {
        match map.get(section) {
            None | Some(Value::Null) => return Err(ValidationError::MissingSection(section)),
            Some(Value::Sequence(plugins)) if plugins.is_empty() => {
                return Err(ValidationError::EmptySection(section));
            }
            Some(Value::Sequence(plugins)) => check_plugins(section, plugins)?,
            Some(_) => return Err(ValidationError::NotAList(section)),
        }
    }

    for &section in OPTIONAL_SECTIONS {
        match map.get(section) {
            None => {}
            Some(Value::Null) => return Err(ValidationError::NullSection(section)),
            Some(Value::Sequence(plugins)) => check_plugins(section, plugins)?,
            Some(_) => return Err(ValidationError::NotAList(section)),
        }
    }

    Ok(())
}

fn check_plugins(section: &'static str, plugins: &[Value]) -> Result<(), ValidationError> {
    for (index, plugin) in plugins.iter().enumerate() {
        let declared = plugin
            .get("Type")
            .and_then(Value::as_str)
            .is_some_and(|t| !t.trim().is_empty());
        if !declared {
            return Err(ValidationError::MissingType { section, index });
        }
    }
    Ok(())
}
