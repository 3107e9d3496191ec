//! Преобразование строкового значения EAV в типизированное и обратно

use contracts::domain::a004_eav::{EavAttribute, EavValueType};
use serde_json::{json, Value};

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

fn split_multi(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    if trimmed.starts_with('[') {
        if let Ok(items) = serde_json::from_str::<Vec<Value>>(trimmed) {
            return items
                .into_iter()
                .map(|item| match item {
                    Value::String(s) => s,
                    other => other.to_string(),
                })
                .collect();
        }
    }
    trimmed
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Типизированное значение при чтении
///
/// Нечитаемые числа дают 0, некорректный JSON - пустой объект.
pub fn typed_value(value_type: EavValueType, raw: &str) -> Value {
    match value_type {
        EavValueType::Integer => {
            let text = raw.trim();
            if let Ok(number) = text.parse::<i64>() {
                Value::from(number)
            } else if let Ok(number) = text.parse::<f64>() {
                Value::from(number.trunc() as i64)
            } else {
                Value::from(0)
            }
        }
        EavValueType::Float => raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(Value::from)
            .unwrap_or_else(|| Value::from(0.0)),
        EavValueType::Boolean => Value::Bool(matches!(
            raw.trim().to_lowercase().as_str(),
            "true" | "1" | "yes" | "on"
        )),
        EavValueType::Json => serde_json::from_str(raw).unwrap_or_else(|_| json!({})),
        EavValueType::MultiChoice => Value::from(split_multi(raw)),
        EavValueType::Choice | EavValueType::String => Value::String(raw.to_string()),
    }
}

/// Тип атрибута по JSON-значению (для атрибутов, создаваемых при первой записи)
pub fn detect_value_type(value: &Value) -> EavValueType {
    match value {
        Value::Null | Value::String(_) => EavValueType::String,
        Value::Bool(_) => EavValueType::Boolean,
        Value::Number(n) if n.is_i64() || n.is_u64() => EavValueType::Integer,
        Value::Number(_) => EavValueType::Float,
        Value::Array(_) | Value::Object(_) => EavValueType::Json,
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Строгое преобразование значения для записи
///
/// `null` очищает значение. Варианты выбора сверяются со списком атрибута.
pub fn encode_value(attribute: &EavAttribute, value: &Value) -> Result<String, String> {
    if value.is_null() {
        return Ok(String::new());
    }
    let code = &attribute.base.code;

    match attribute.value_type {
        EavValueType::String => Ok(match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }),
        EavValueType::Integer => {
            let parsed = match value {
                Value::Number(n) => n.as_i64(),
                Value::String(s) => s.trim().parse::<i64>().ok(),
                _ => None,
            };
            parsed
                .map(|n| n.to_string())
                .ok_or_else(|| format!("Атрибут '{}': ожидается целое число, получено {}", code, value))
        }
        EavValueType::Float => {
            let parsed = match value {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.trim().replace(',', ".").parse::<f64>().ok(),
                _ => None,
            };
            parsed
                .filter(|n| n.is_finite())
                .map(|n| n.to_string())
                .ok_or_else(|| format!("Атрибут '{}': ожидается число, получено {}", code, value))
        }
        EavValueType::Boolean => {
            let parsed = match value {
                Value::Bool(b) => Some(*b),
                Value::Number(n) => match n.as_i64() {
                    Some(0) => Some(false),
                    Some(1) => Some(true),
                    _ => None,
                },
                Value::String(s) => parse_bool(s),
                _ => None,
            };
            parsed
                .map(|b| b.to_string())
                .ok_or_else(|| format!("Атрибут '{}': ожидается логическое значение, получено {}", code, value))
        }
        EavValueType::Json => match value {
            Value::String(s) => serde_json::from_str::<Value>(s)
                .map(|_| s.clone())
                .map_err(|e| format!("Атрибут '{}': некорректный JSON: {}", code, e)),
            other => Ok(other.to_string()),
        },
        EavValueType::Choice => {
            let choice = scalar_text(value)
                .ok_or_else(|| format!("Атрибут '{}': ожидается один вариант выбора", code))?;
            if attribute.choices_list().contains(&choice) {
                Ok(choice)
            } else {
                Err(format!("Атрибут '{}': недопустимое значение '{}'", code, choice))
            }
        }
        EavValueType::MultiChoice => {
            let items: Vec<String> = match value {
                Value::Array(items) => items
                    .iter()
                    .map(|item| {
                        scalar_text(item).ok_or_else(|| {
                            format!("Атрибут '{}': варианты выбора должны быть строками", code)
                        })
                    })
                    .collect::<Result<_, _>>()?,
                Value::String(s) => split_multi(s),
                _ => return Err(format!("Атрибут '{}': ожидается список вариантов", code)),
            };
            let allowed = attribute.choices_list();
            if let Some(bad) = items.iter().find(|item| !allowed.contains(item)) {
                return Err(format!("Атрибут '{}': недопустимое значение '{}'", code, bad));
            }
            Ok(items.join("\n"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attribute(value_type: EavValueType, choices: &str) -> EavAttribute {
        let mut attribute = EavAttribute::new_for_insert("attr".into(), value_type);
        attribute.choices = choices.into();
        attribute
    }

    #[test]
    fn test_typed_value_is_lenient() {
        assert_eq!(typed_value(EavValueType::Integer, " 42 "), json!(42));
        assert_eq!(typed_value(EavValueType::Integer, "abc"), json!(0));
        assert_eq!(typed_value(EavValueType::Float, "2.5"), json!(2.5));
        assert_eq!(typed_value(EavValueType::Float, "n/a"), json!(0.0));
        assert_eq!(typed_value(EavValueType::Boolean, "Yes"), json!(true));
        assert_eq!(typed_value(EavValueType::Boolean, "nope"), json!(false));
        assert_eq!(typed_value(EavValueType::Json, "{\"a\":1}"), json!({"a": 1}));
        assert_eq!(typed_value(EavValueType::Json, "{broken"), json!({}));
        assert_eq!(typed_value(EavValueType::Choice, "Сталь"), json!("Сталь"));
    }

    #[test]
    fn test_multi_choice_reads_lines_and_arrays() {
        assert_eq!(
            typed_value(EavValueType::MultiChoice, "A\n B \n\nC"),
            json!(["A", "B", "C"])
        );
        assert_eq!(typed_value(EavValueType::MultiChoice, "[\"A\",\"B\"]"), json!(["A", "B"]));
    }

    #[test]
    fn test_detect_value_type() {
        assert_eq!(detect_value_type(&json!(null)), EavValueType::String);
        assert_eq!(detect_value_type(&json!("x")), EavValueType::String);
        assert_eq!(detect_value_type(&json!(3)), EavValueType::Integer);
        assert_eq!(detect_value_type(&json!(3.5)), EavValueType::Float);
        assert_eq!(detect_value_type(&json!(true)), EavValueType::Boolean);
        assert_eq!(detect_value_type(&json!([1, 2])), EavValueType::Json);
        assert_eq!(detect_value_type(&json!({"k": 1})), EavValueType::Json);
    }

    #[test]
    fn test_encode_is_strict() {
        let integer = attribute(EavValueType::Integer, "");
        assert_eq!(encode_value(&integer, &json!(12)).unwrap(), "12");
        assert_eq!(encode_value(&integer, &json!("12")).unwrap(), "12");
        assert!(encode_value(&integer, &json!("12kg")).is_err());
        assert!(encode_value(&integer, &json!(1.5)).is_err());

        let float = attribute(EavValueType::Float, "");
        assert_eq!(encode_value(&float, &json!("1,5")).unwrap(), "1.5");

        let boolean = attribute(EavValueType::Boolean, "");
        assert_eq!(encode_value(&boolean, &json!("on")).unwrap(), "true");
        assert!(encode_value(&boolean, &json!("maybe")).is_err());

        let json_attr = attribute(EavValueType::Json, "");
        assert_eq!(encode_value(&json_attr, &json!({"a": 1})).unwrap(), "{\"a\":1}");
        assert!(encode_value(&json_attr, &json!("{oops")).is_err());

        assert_eq!(encode_value(&integer, &Value::Null).unwrap(), "");
    }

    #[test]
    fn test_encode_checks_choices() {
        let choice = attribute(EavValueType::Choice, "Сталь\nЧугун");
        assert_eq!(encode_value(&choice, &json!("Чугун")).unwrap(), "Чугун");
        assert!(encode_value(&choice, &json!("Латунь")).is_err());

        let multi = attribute(EavValueType::MultiChoice, "A\nB\nC");
        assert_eq!(encode_value(&multi, &json!(["A", "C"])).unwrap(), "A\nC");
        assert!(encode_value(&multi, &json!(["A", "Z"])).is_err());
        assert!(encode_value(&multi, &json!(5)).is_err());
    }
}
