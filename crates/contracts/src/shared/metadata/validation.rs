//! Правила проверки полей из метаданных

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ValidationRules {
    pub required: bool,
    /// Нижняя граница числового поля
    pub min: Option<f64>,
    pub max_length: Option<usize>,
}

impl ValidationRules {
    pub const fn none() -> Self {
        Self {
            required: false,
            min: None,
            max_length: None,
        }
    }

    /// Длина считается в символах, не в байтах
    pub fn validate_string(&self, value: &str, field_label: &str) -> Result<(), String> {
        if self.required && value.trim().is_empty() {
            return Err(format!("{} не может быть пустым", field_label));
        }

        let length = value.chars().count();
        if let Some(max) = self.max_length {
            if length > max {
                return Err(format!(
                    "{} не должен превышать {} символов",
                    field_label, max
                ));
            }
        }

        Ok(())
    }

    pub fn validate_number(&self, value: f64, field_label: &str) -> Result<(), String> {
        match self.min {
            Some(min) if value < min => Err(format!("{}: значение меньше {}", field_label, min)),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_string_counts_chars() {
        let rules = ValidationRules {
            required: true,
            max_length: Some(6),
            ..ValidationRules::none()
        };
        assert!(rules.validate_string("привет", "Код").is_ok());
        assert!(rules.validate_string("приветы", "Код").is_err());
        assert_eq!(
            rules.validate_string("  ", "Код").unwrap_err(),
            "Код не может быть пустым"
        );
    }

    #[test]
    fn test_validate_number_lower_bound() {
        let rules = ValidationRules {
            min: Some(0.0),
            ..ValidationRules::none()
        };
        assert!(rules.validate_number(0.0, "Срок").is_ok());
        assert_eq!(rules.validate_number(-1.0, "Срок").unwrap_err(), "Срок: значение меньше 0");
        assert!(ValidationRules::none().validate_number(-1.0, "Срок").is_ok());
    }
}
