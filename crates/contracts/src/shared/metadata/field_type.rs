//! Вид поля агрегата для генератора интерфейсов

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldType {
    /// Строки, числа, флаги, даты
    #[default]
    Primitive,
    /// Набор строковых значений
    Enum,
    /// Id другого агрегата каталога
    AggregateRef,
    /// Список вложенных значений
    NestedTable,
    /// Произвольный JSON
    Json,
}

impl FieldType {
    /// TypeScript-тип, не зависящий от Rust-типа поля
    pub fn fixed_ts_type(&self) -> Option<&'static str> {
        match self {
            FieldType::AggregateRef => Some("string"),
            FieldType::Json => Some("unknown"),
            FieldType::Primitive | FieldType::Enum | FieldType::NestedTable => None,
        }
    }
}

/// Где поле живет в структуре агрегата
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldSource {
    #[default]
    Specific,
    /// Из `BaseAggregate`
    Base,
    /// Из `EntityMetadata`
    Metadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_ts_type() {
        assert_eq!(FieldType::AggregateRef.fixed_ts_type(), Some("string"));
        assert_eq!(FieldType::Json.fixed_ts_type(), Some("unknown"));
        assert_eq!(FieldType::Primitive.fixed_ts_type(), None);
    }
}
