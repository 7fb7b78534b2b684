//! File scanner supplying the candidate set for a pass.

use std::path::Path;

use indexer::{CandidateFile, FileMeta};
use walkdir::WalkDir;

const CODE_EXT: &[&str] = &[
    "cs", "shader", "cginc", "compute", "rs", "ts", "tsx", "js", "jsx", "py", "go", "java", "kt",
    "swift", "cpp", "c", "h",
];
const CONF_EXT: &[&str] = &[
    "json", "yaml", "yml", "toml", "xml", "md", "asmdef",
];

/// Walk `root` and collect indexable files with their sizes.
///
/// Paths are project-relative with forward slashes; results are sorted
/// so passes process files in a stable order.
pub fn scan_candidates(root: &Path) -> std::io::Result<Vec<CandidateFile>> {
    let mut out = Vec::new();
    for entry in WalkDir::new(root).into_iter().filter_map(Result::ok) {
        if !entry.file_type().is_file() {
            continue;
        }
        let p = entry.path();
        let s = p.to_string_lossy();

        // excludes
        if s.contains("/.git/")
            || s.contains("/Library/")
            || s.contains("/Temp/")
            || s.contains("/obj/")
            || s.contains("/target/")
            || s.contains("/node_modules/")
            || s.contains("/build/")
        {
            continue;
        }

        let ext = p.extension().and_then(|x| x.to_str()).unwrap_or("");
        if !(CODE_EXT.contains(&ext) || CONF_EXT.contains(&ext)) {
            continue;
        }

        let Ok(rel) = p.strip_prefix(root) else {
            continue;
        };
        let path = rel.to_string_lossy().replace('\\', "/");
        let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
        let lang = lang_for_path(&path).to_owned();

        out.push(CandidateFile {
            path,
            size,
            meta: FileMeta {
                lang,
                ..FileMeta::default()
            },
        });
    }
    out.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(out)
}

/// Map a file extension to a language tag for the point payload.
pub fn lang_for_path(path: &str) -> &'static str {
    let ext = Path::new(path)
        .extension()
        .and_then(|x| x.to_str())
        .unwrap_or("");
    match ext {
        "cs" => "csharp",
        "shader" | "cginc" | "compute" => "shaderlab",
        "rs" => "rust",
        "ts" | "tsx" => "typescript",
        "js" | "jsx" => "javascript",
        "py" => "python",
        "go" => "go",
        "java" => "java",
        "kt" => "kotlin",
        "swift" => "swift",
        "cpp" | "c" | "h" => "cpp",
        "json" => "json",
        "yaml" | "yml" => "yaml",
        "toml" => "toml",
        "xml" | "asmdef" => "xml",
        "md" => "markdown",
        _ => "text",
    }
}
