use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Скопировать файл или каталог рядом с бинарником
fn copy_into(source: &Path, dest: &Path) -> std::io::Result<()> {
    if source.is_dir() {
        fs::create_dir_all(dest)?;
        for entry in fs::read_dir(source)? {
            let entry = entry?;
            copy_into(&entry.path(), &dest.join(entry.file_name()))?;
        }
        Ok(())
    } else {
        fs::copy(source, dest).map(|_| ())
    }
}

fn target_dir() -> Option<PathBuf> {
    let out_dir = env::var("OUT_DIR").ok()?;
    let profile = env::var("PROFILE").ok()?;
    // OUT_DIR: target/<profile>/build/catalog-backend-xxx/out
    Path::new(&out_dir)
        .ancestors()
        .find(|p| p.ends_with(&profile))
        .map(Path::to_path_buf)
}

fn main() {
    println!("cargo:rerun-if-changed=../../config.toml");
    println!("cargo:rerun-if-changed=../../migrations");

    let Some(target_dir) = target_dir() else {
        println!("cargo:warning=Could not find target profile directory");
        return;
    };
    let workspace_root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../..");

    for name in ["config.toml", "migrations"] {
        let source = workspace_root.join(name);
        if !source.exists() {
            println!("cargo:warning={} not found at {:?}", name, source);
            continue;
        }
        match copy_into(&source, &target_dir.join(name)) {
            Ok(()) => println!("cargo:warning=Copied {} to {:?}", name, target_dir),
            Err(e) => println!("cargo:warning=Failed to copy {}: {}", name, e),
        }
    }
}
