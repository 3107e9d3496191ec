//! Генерация TypeScript-интерфейсов по метаданным агрегатов
//!
//! Источник истины - статические `FieldMetadata` из `contracts`. Результат
//! кладется в `codegen.output_dir` (по умолчанию `frontend/src/types/auto-generated`).

pub mod generator;
pub mod registry;

pub use generator::TypeScriptGenerator;
pub use registry::{entities, EntityDescriptor};
