// tests/persistence_boundary.rs
// Fails if direct filesystem write calls appear outside the two modules
// allowed to touch disk: the settings/snapshot store and the export/io
// systems.

use std::fs;
use std::path::{Path, PathBuf};

fn collect_rs_files(dir: &Path, files: &mut Vec<PathBuf>) {
    if let Ok(entries) = fs::read_dir(dir) {
        for e in entries.flatten() {
            let p = e.path();
            if p.is_dir() {
                collect_rs_files(&p, files);
            } else if p.extension().map(|s| s == "rs").unwrap_or(false) {
                files.push(p);
            }
        }
    }
}

fn is_whitelisted(path: &Path) -> bool {
    let p = path.to_string_lossy();
    p.contains("/settings/io.rs") || p.contains("\\settings\\io.rs") ||
    p.contains("/invoice/systems/io.rs") || p.contains("\\invoice\\systems\\io.rs") ||
    // inline tests write a scripted engine to a temp dir
    p.contains("/invoice/engine.rs") || p.contains("\\invoice\\engine.rs")
}

#[test]
fn no_direct_fs_writes_in_runtime() {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let src_dir = Path::new(manifest_dir).join("src");

    let mut files = Vec::new();
    collect_rs_files(&src_dir, &mut files);

    // Patterns indicating direct disk writes
    let bad_patterns = [
        "fs::write(",
        "File::create(",
        "OpenOptions::new(",
        "create_dir_all(",
    ];

    let mut offenders: Vec<(String, String)> = Vec::new();

    for file in files {
        if is_whitelisted(&file) {
            continue;
        }
        let content = match fs::read_to_string(&file) {
            Ok(c) => c,
            Err(_) => continue,
        };
        if content.contains("#![cfg(test)]") {
            continue;
        }

        for pat in &bad_patterns {
            if content.contains(pat) {
                offenders.push((file.to_string_lossy().to_string(), pat.to_string()));
            }
        }
    }

    if !offenders.is_empty() {
        let mut msg = String::from("Direct filesystem writes found in runtime code:\n");
        for (file, pat) in offenders {
            msg.push_str(&format!(
                "  {} contains pattern '{}': route through settings::io or invoice::systems::io instead\n",
                file, pat
            ));
        }
        panic!("{}", msg);
    }
}
