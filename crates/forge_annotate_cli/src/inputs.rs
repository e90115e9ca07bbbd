//! Input discovery and output paths

use anyhow::{bail, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Name used for stdin input
pub const STDIN_NAME: &str = "stdin";

/// One unit of work
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// The built-in demonstration source
    Demo,
    /// Standard input
    Stdin,
    /// A file on disk; `relative` is its path below the walked directory,
    /// or its file name when given directly
    File { path: PathBuf, relative: PathBuf },
}

impl Input {
    /// Label used in logs and the summary
    pub fn label(&self) -> String {
        match self {
            Input::Demo => forge_annotate::DEMO_FILE_NAME.to_string(),
            Input::Stdin => STDIN_NAME.to_string(),
            Input::File { path, .. } => path.display().to_string(),
        }
    }

    /// Output location below `out_dir`
    pub fn output_path(&self, out_dir: &Path, extension: &str) -> PathBuf {
        out_dir.join(self.output_stem()).with_extension(extension)
    }

    /// Output path relative to the output directory, without extension
    fn output_stem(&self) -> PathBuf {
        let relative = match self {
            Input::Demo => Path::new(forge_annotate::DEMO_FILE_NAME),
            Input::Stdin => Path::new(STDIN_NAME),
            Input::File { relative, .. } => relative.as_path(),
        };
        relative.with_extension("")
    }
}

/// `.ts` and `.tsx` files, excluding `.d.ts` declaration files
pub fn is_annotatable(path: &Path) -> bool {
    let name = match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => name,
        None => return false,
    };
    if name.ends_with(".d.ts") {
        return false;
    }
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("ts") | Some("tsx")
    )
}

/// Expand command-line inputs; no inputs means the demo
pub fn collect_inputs(args: &[String]) -> Result<Vec<Input>> {
    if args.is_empty() {
        return Ok(vec![Input::Demo]);
    }

    let mut inputs = Vec::new();
    for arg in args {
        if arg == "-" {
            inputs.push(Input::Stdin);
            continue;
        }

        let path = PathBuf::from(arg);
        if path.is_dir() {
            let before = inputs.len();
            for entry in WalkDir::new(&path)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
            {
                let file = entry.path();
                if entry.file_type().is_file() && is_annotatable(file) {
                    let relative = file.strip_prefix(&path).unwrap_or(file).to_path_buf();
                    inputs.push(Input::File {
                        path: file.to_path_buf(),
                        relative,
                    });
                }
            }
            if inputs.len() == before {
                tracing::warn!(dir = %path.display(), "no .ts or .tsx files found");
            }
        } else if path.is_file() {
            let relative = path
                .file_name()
                .map(PathBuf::from)
                .unwrap_or_else(|| path.clone());
            inputs.push(Input::File { path, relative });
        } else {
            bail!("Input not found: {}", path.display());
        }
    }

    Ok(inputs)
}

/// Fail when two inputs would write the same file below an output directory
pub fn check_output_collisions(inputs: &[Input]) -> Result<()> {
    let mut seen: HashMap<PathBuf, String> = HashMap::new();
    for input in inputs {
        let stem = input.output_stem();
        if let Some(first) = seen.get(&stem) {
            bail!(
                "Inputs {} and {} would both write {}",
                first,
                input.label(),
                stem.display()
            );
        }
        seen.insert(stem, input.label());
    }
    Ok(())
}
