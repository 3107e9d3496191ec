use anyhow::Context;
use contracts::shared::metadata::{FieldMetadata, BASE_FIELDS, ENTITY_METADATA_FIELDS};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use super::registry::{entities, EntityDescriptor};

const HEADER: &str = "// Автоматически сгенерировано ts-codegen. Не редактировать вручную.\n";
const COMMON_MODULE: &str = "common";

/// Снять обертку `Wrapper<...>`, если тип ею начинается
fn unwrap_generic<'a>(rust_type: &'a str, wrapper: &str) -> Option<&'a str> {
    rust_type
        .strip_prefix(wrapper)
        .and_then(|rest| rest.strip_prefix('<'))
        .and_then(|rest| rest.strip_suffix('>'))
        .map(str::trim)
}

/// TypeScript-тип для Rust-типа без учета `Option`
pub fn map_rust_type(rust_type: &str) -> String {
    if let Some(inner) = unwrap_generic(rust_type, "Vec") {
        let element = map_rust_type(inner);
        return if element.contains(' ') {
            format!("({})[]", element)
        } else {
            format!("{}[]", element)
        };
    }
    if let Some(inner) = unwrap_generic(rust_type, "Option") {
        return format!("{} | null", map_rust_type(inner));
    }
    match rust_type {
        "String" | "&str" | "Uuid" => "string".into(),
        "i8" | "i16" | "i32" | "i64" | "u8" | "u16" | "u32" | "u64" | "usize" | "f32"
        | "f64" => "number".into(),
        "bool" => "boolean".into(),
        "serde_json::Value" | "Value" => "unknown".into(),
        "EntityMetadata" => "IEntityMetadata".into(),
        t if t.starts_with("DateTime") || t.starts_with("NaiveDate") => "string".into(),
        t if t.ends_with("Id") => "string".into(),
        _ => "unknown".into(),
    }
}

/// Тип поля и признак необязательности
pub fn ts_type(field: &FieldMetadata) -> (String, bool) {
    let (inner, optional) = match unwrap_generic(field.rust_type, "Option") {
        Some(inner) => (inner, true),
        None => (field.rust_type, false),
    };
    let ts = if let Some(values) = field.enum_values {
        values
            .iter()
            .map(|v| format!("\"{}\"", v))
            .collect::<Vec<_>>()
            .join(" | ")
    } else if let Some(fixed) = field.field_type.fixed_ts_type() {
        fixed.into()
    } else {
        map_rust_type(inner)
    };
    (ts, optional)
}

fn render_field(out: &mut String, field: &FieldMetadata) {
    let (ts, optional) = ts_type(field);
    let mut comment = field.ui.label.to_string();
    if let Some(max) = field.validation.max_length {
        let _ = write!(comment, "; max: {}", max);
    }
    if let Some(min) = field.validation.min {
        let _ = write!(comment, "; min: {}", min);
    }
    if let Some(aggregate) = field.referenced_aggregate() {
        let _ = write!(comment, "; ref: {}", aggregate);
    }
    if optional {
        let _ = writeln!(out, "  {}?: {} | null; // {}", field.name, ts, comment);
    } else {
        let _ = writeln!(out, "  {}: {}; // {}", field.name, ts, comment);
    }
}

/// Поля интерфейса: базовые, кроме переопределенных агрегатом, затем собственные
fn interface_fields(entity: &EntityDescriptor) -> Vec<&FieldMetadata> {
    let own: Vec<&str> = entity.fields.iter().map(|f| f.name).collect();
    BASE_FIELDS
        .iter()
        .filter(|f| !own.contains(&f.name))
        .chain(entity.fields.iter())
        .collect()
}

pub struct TypeScriptGenerator {
    out_dir: PathBuf,
}

impl TypeScriptGenerator {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// `export interface I<Entity> { ... }` для одного агрегата
    pub fn render_entity(entity: &EntityDescriptor) -> String {
        let mut out = String::from(HEADER);
        let _ = writeln!(
            out,
            "import type {{ IEntityMetadata }} from './{}';\n",
            COMMON_MODULE
        );
        let _ = writeln!(out, "/** {} ({}) */", entity.element_name, entity.index);
        let _ = writeln!(out, "export interface {} {{", entity.interface_name());
        for field in interface_fields(entity) {
            render_field(&mut out, field);
        }
        out.push_str("}\n");
        out
    }

    /// Общие типы: метаданные жизненного цикла
    pub fn render_common() -> String {
        let mut out = String::from(HEADER);
        out.push('\n');
        out.push_str("export interface IEntityMetadata {\n");
        for field in ENTITY_METADATA_FIELDS.iter() {
            render_field(&mut out, field);
        }
        out.push_str("}\n");
        out
    }

    pub fn render_index(entities: &[EntityDescriptor]) -> String {
        let mut out = String::from(HEADER);
        out.push('\n');
        let _ = writeln!(out, "export * from './{}';", COMMON_MODULE);
        for entity in entities {
            let _ = writeln!(out, "export * from './{}';", entity.collection);
        }
        out
    }

    fn write(&self, name: &str, content: &str) -> anyhow::Result<PathBuf> {
        let path = self.out_dir.join(format!("{}.ts", name));
        std::fs::write(&path, content)
            .with_context(|| format!("запись {}", path.display()))?;
        Ok(path)
    }

    /// Записать `<collection>.ts` для каждого агрегата, `common.ts` и `index.ts`
    pub fn generate_all(&self) -> anyhow::Result<Vec<PathBuf>> {
        std::fs::create_dir_all(&self.out_dir)
            .with_context(|| format!("создание каталога {}", self.out_dir.display()))?;

        let entities = entities();
        let mut written = vec![self.write(COMMON_MODULE, &Self::render_common())?];
        for entity in &entities {
            written.push(self.write(entity.collection, &Self::render_entity(entity))?);
        }
        written.push(self.write("index", &Self::render_index(&entities))?);

        tracing::info!(
            "ts-codegen: записано файлов: {} в {}",
            written.len(),
            self.out_dir.display()
        );
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a001_catalog_option::CatalogOption;
    use contracts::domain::a002_series_option::SeriesOption;
    use contracts::domain::a006_procurement::Procurement;

    #[test]
    fn test_map_rust_type() {
        assert_eq!(map_rust_type("String"), "string");
        assert_eq!(map_rust_type("f64"), "number");
        assert_eq!(map_rust_type("bool"), "boolean");
        assert_eq!(map_rust_type("DateTime<Utc>"), "string");
        assert_eq!(map_rust_type("Vec<String>"), "string[]");
        assert_eq!(map_rust_type("ProductSeriesId"), "string");
        assert_eq!(map_rust_type("serde_json::Value"), "unknown");
        assert_eq!(map_rust_type("Vec<Option<i32>>"), "(number | null)[]");
    }

    #[test]
    fn test_render_catalog_option() {
        let ts = TypeScriptGenerator::render_entity(&EntityDescriptor::of::<CatalogOption>());
        assert!(ts.contains("export interface ICatalogOption {"));
        assert!(ts.contains("  id: string; // ID"));
        assert!(ts.contains("  code: string; // Символьное обозначение; max: 50"));
        assert!(ts.contains("  metadata: IEntityMetadata; // Метаданные"));
        assert!(ts.contains("  rank?: number | null; // Ранг IP"));
        assert!(ts.contains("  voltageType?: \"AC\" | \"DC\" | null;"));
        assert!(ts.contains("  kind: \"ip\" | \"exd\" | \"body_coating\""));
    }

    #[test]
    fn test_render_procurement_enums_and_dates() {
        let ts = TypeScriptGenerator::render_entity(&EntityDescriptor::of::<Procurement>());
        assert!(ts.contains("  endDate: string; // Дата окончания"));
        assert!(ts.contains("  nmc?: number | null; // НМЦ"));
        assert!(ts.contains("  code: string; // № Закупки; max: 100"));
        assert!(ts.contains("  procurementType?: \"single_lot\" | \"price_request\""));
        assert!(ts.contains("  manager: string; // Менеджер; max: 100"));
    }

    #[test]
    fn test_render_references_as_ids() {
        let ts = TypeScriptGenerator::render_entity(&EntityDescriptor::of::<SeriesOption>());
        assert!(ts.contains("  seriesId: string; // Серия; ref: a003"));
        assert!(ts.contains("  optionId?: string | null; // Значение справочника; ref: a001"));
        assert!(ts.contains("  code: string; // Кодировка; max: 50"));
        assert!(ts.contains("  leadTimeDays: number; // Доп. срок, дней; min: 0"));
    }

    #[test]
    fn test_generate_all_writes_files() {
        let dir = tempfile::tempdir().unwrap();
        let generator = TypeScriptGenerator::new(dir.path().join("types"));
        let written = generator.generate_all().unwrap();

        assert_eq!(written.len(), entities().len() + 2);
        let index = std::fs::read_to_string(generator.out_dir().join("index.ts")).unwrap();
        assert!(index.contains("export * from './common';"));
        assert!(index.contains("export * from './procurement';"));
        let common = std::fs::read_to_string(generator.out_dir().join("common.ts")).unwrap();
        assert!(common.contains("  isDeleted: boolean; // Удалено"));
        assert!(generator.out_dir().join("series_option.ts").exists());
    }
}
