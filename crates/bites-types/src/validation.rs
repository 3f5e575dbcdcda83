//! Configuration validation for implementation-specific TOML tables.
//!
//! Each pluggable implementation receives its own raw `toml::Value` table
//! from the configuration file. This module lets an implementation describe
//! the fields it expects and check that table before it is constructed.

use thiserror::Error;

/// Errors that can occur during configuration validation.
#[derive(Debug, Error)]
pub enum ValidationError {
	/// A required field is missing.
	#[error("Missing required field: {0}")]
	MissingField(String),
	/// A field has an invalid value.
	#[error("Invalid value for field '{field}': {message}")]
	InvalidValue { field: String, message: String },
	/// A field has the wrong type.
	#[error("Type mismatch for field '{field}': expected {expected}, got {actual}")]
	TypeMismatch {
		field: String,
		expected: String,
		actual: String,
	},
}

/// The type of a configuration field.
#[derive(Debug)]
pub enum FieldType {
	/// A string value.
	String,
}

/// Custom check run after the type check passes.
pub type FieldValidator = Box<dyn Fn(&toml::Value) -> Result<(), String> + Send + Sync>;

/// A named field in a configuration schema.
pub struct Field {
	pub name: String,
	pub field_type: FieldType,
	pub validator: Option<FieldValidator>,
}

impl std::fmt::Debug for Field {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Field")
			.field("name", &self.name)
			.field("field_type", &self.field_type)
			.field("validator", &self.validator.is_some())
			.finish()
	}
}

impl Field {
	/// Creates a new field with the given name and type.
	pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
		Self {
			name: name.into(),
			field_type,
			validator: None,
		}
	}

	/// Attaches a custom validator that runs after the type check.
	pub fn with_validator<F>(mut self, validator: F) -> Self
	where
		F: Fn(&toml::Value) -> Result<(), String> + Send + Sync + 'static,
	{
		self.validator = Some(Box::new(validator));
		self
	}

	fn check(&self, value: &toml::Value) -> Result<(), ValidationError> {
		validate_field_type(&self.name, value, &self.field_type)?;

		if let Some(validator) = &self.validator {
			validator(value).map_err(|message| ValidationError::InvalidValue {
				field: self.name.clone(),
				message,
			})?;
		}

		Ok(())
	}
}

/// Required and optional fields of a TOML table.
#[derive(Debug)]
pub struct Schema {
	pub required: Vec<Field>,
	pub optional: Vec<Field>,
}

impl Schema {
	/// Creates a new schema with required and optional fields.
	pub fn new(required: Vec<Field>, optional: Vec<Field>) -> Self {
		Self { required, optional }
	}

	/// Validates a TOML value against this schema.
	///
	/// Fails if the value is not a table, a required field is missing, a
	/// present field has the wrong type, or a custom validator rejects it.
	/// Unknown keys are ignored.
	pub fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let table = config
			.as_table()
			.ok_or_else(|| ValidationError::TypeMismatch {
				field: "root".to_string(),
				expected: "table".to_string(),
				actual: config.type_str().to_string(),
			})?;

		for field in &self.required {
			let value = table
				.get(&field.name)
				.ok_or_else(|| ValidationError::MissingField(field.name.clone()))?;
			field.check(value)?;
		}

		for field in &self.optional {
			if let Some(value) = table.get(&field.name) {
				field.check(value)?;
			}
		}

		Ok(())
	}
}

fn type_mismatch(field_name: &str, expected: &str, value: &toml::Value) -> ValidationError {
	ValidationError::TypeMismatch {
		field: field_name.to_string(),
		expected: expected.to_string(),
		actual: value.type_str().to_string(),
	}
}

fn validate_field_type(
	field_name: &str,
	value: &toml::Value,
	expected_type: &FieldType,
) -> Result<(), ValidationError> {
	match expected_type {
		FieldType::String => {
			if !value.is_str() {
				return Err(type_mismatch(field_name, "string", value));
			}
		},
	}

	Ok(())
}

/// A configuration schema that can validate a TOML table.
///
/// Implementations hand one of these out so the builder can check the
/// table each one was constructed from.
pub trait ConfigSchema: Send + Sync {
	/// Validates a TOML configuration value against this schema.
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError>;
}

#[cfg(test)]
mod tests {
	use super::*;

	fn table(source: &str) -> toml::Value {
		toml::from_str(source).unwrap()
	}

	#[test]
	fn test_required_field_missing() {
		let schema = Schema::new(vec![Field::new("directory", FieldType::String)], vec![]);

		let err = schema.validate(&table("")).unwrap_err();
		assert!(matches!(err, ValidationError::MissingField(ref f) if f == "directory"));
	}

	#[test]
	fn test_type_mismatch_reports_actual_type() {
		let schema = Schema::new(vec![Field::new("directory", FieldType::String)], vec![]);

		let err = schema.validate(&table("directory = 5")).unwrap_err();
		assert_eq!(
			err.to_string(),
			"Type mismatch for field 'directory': expected string, got integer"
		);
	}

	#[test]
	fn test_optional_field_checked_when_present() {
		let schema = Schema::new(vec![], vec![Field::new("label", FieldType::String)]);

		assert!(schema.validate(&table("")).is_ok());
		assert!(schema.validate(&table(r#"label = "lunch""#)).is_ok());
		let err = schema.validate(&table("label = true")).unwrap_err();
		assert!(matches!(err, ValidationError::TypeMismatch { ref field, .. } if field == "label"));
	}

	#[test]
	fn test_non_table_root_rejected() {
		let schema = Schema::new(vec![], vec![]);

		let err = schema.validate(&toml::Value::String("orders".into())).unwrap_err();
		assert_eq!(
			err.to_string(),
			"Type mismatch for field 'root': expected table, got string"
		);
	}

	#[test]
	fn test_custom_validator() {
		let schema = Schema::new(
			vec![Field::new("directory", FieldType::String).with_validator(|v| {
				match v.as_str() {
					Some("") => Err("directory cannot be empty".to_string()),
					_ => Ok(()),
				}
			})],
			vec![],
		);

		assert!(schema.validate(&table(r#"directory = "orders""#)).is_ok());
		let err = schema.validate(&table(r#"directory = """#)).unwrap_err();
		assert!(matches!(err, ValidationError::InvalidValue { .. }));
	}
}
