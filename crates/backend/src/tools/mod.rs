pub mod ts_codegen;
