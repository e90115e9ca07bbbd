//! Command-line arguments

use anyhow::{bail, Result};
use forge_annotate::ModuleKind;
use std::path::PathBuf;

pub const USAGE: &str = "\
forge-annotate - annotate TypeScript interfaces and classes with JSDoc

USAGE:
    forge-annotate [OPTIONS] [INPUT...]

INPUT:
    A .ts/.tsx file, a directory (walked for .ts/.tsx files, .d.ts excluded)
    or - for stdin. With no input the built-in demo is annotated.

OPTIONS:
    -o, --out-dir <DIR>     Write <name>.js files into DIR instead of stdout
    -c, --config <PATH>     Configuration file (default: ./forge-annotate.toml)
    -m, --module <KIND>     Module kind of the output: esm or cjs
        --no-strip          Keep TypeScript syntax in the output
    -f, --format <FORMAT>   Output format: js or json (the rewritten tree)
    -h, --help              Print this help

ENVIRONMENT:
    FORGE_LOG               Log filter, e.g. debug or forge_annotate=trace
";

/// What gets written for each input
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Annotated source text
    #[default]
    Js,
    /// The rewritten tree as JSON
    Json,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Js => "js",
            OutputFormat::Json => "json",
        }
    }
}

/// Parsed command line
#[derive(Debug, Default, PartialEq)]
pub struct AnnotateCommand {
    /// Files, directories or `-`
    pub inputs: Vec<String>,
    /// Output directory; stdout when unset
    pub out_dir: Option<PathBuf>,
    /// Explicit configuration file
    pub config: Option<PathBuf>,
    /// Module kind override
    pub module_kind: Option<ModuleKind>,
    /// Disable type stripping
    pub no_strip: bool,
    pub format: OutputFormat,
    pub help: bool,
}

impl AnnotateCommand {
    pub fn parse(args: &[String]) -> Result<Self> {
        let mut cmd = AnnotateCommand::default();

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--out-dir" | "-o" => {
                    if i + 1 < args.len() {
                        cmd.out_dir = Some(PathBuf::from(&args[i + 1]));
                        i += 2;
                    } else {
                        bail!("--out-dir requires a value");
                    }
                }
                "--config" | "-c" => {
                    if i + 1 < args.len() {
                        cmd.config = Some(PathBuf::from(&args[i + 1]));
                        i += 2;
                    } else {
                        bail!("--config requires a value");
                    }
                }
                "--module" | "-m" => {
                    if i + 1 < args.len() {
                        cmd.module_kind = Some(args[i + 1].parse()?);
                        i += 2;
                    } else {
                        bail!("--module requires a value (esm or cjs)");
                    }
                }
                "--format" | "-f" => {
                    if i + 1 < args.len() {
                        cmd.format = match args[i + 1].as_str() {
                            "js" => OutputFormat::Js,
                            "json" => OutputFormat::Json,
                            other => bail!("Unknown format: {} (expected js or json)", other),
                        };
                        i += 2;
                    } else {
                        bail!("--format requires a value (js or json)");
                    }
                }
                "--no-strip" => {
                    cmd.no_strip = true;
                    i += 1;
                }
                "--help" | "-h" => {
                    cmd.help = true;
                    i += 1;
                }
                "-" => {
                    cmd.inputs.push("-".to_string());
                    i += 1;
                }
                arg if !arg.starts_with('-') => {
                    cmd.inputs.push(arg.to_string());
                    i += 1;
                }
                _ => {
                    bail!("Unknown flag: {}", args[i]);
                }
            }
        }

        Ok(cmd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> Result<AnnotateCommand> {
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        AnnotateCommand::parse(&args)
    }

    #[test]
    fn test_no_arguments() {
        assert_eq!(parse(&[]).unwrap(), AnnotateCommand::default());
    }

    #[test]
    fn test_all_options() {
        let cmd = parse(&[
            "src",
            "-o",
            "out",
            "--config",
            "annotate.toml",
            "--module",
            "cjs",
            "--no-strip",
            "--format",
            "json",
            "-",
        ])
        .unwrap();

        assert_eq!(
            cmd,
            AnnotateCommand {
                inputs: vec!["src".to_string(), "-".to_string()],
                out_dir: Some(PathBuf::from("out")),
                config: Some(PathBuf::from("annotate.toml")),
                module_kind: Some(ModuleKind::Cjs),
                no_strip: true,
                format: OutputFormat::Json,
                help: false,
            }
        );
    }

    #[test]
    fn test_help() {
        assert!(parse(&["-h"]).unwrap().help);
        assert!(parse(&["--help"]).unwrap().help);
    }

    #[test]
    fn test_missing_values() {
        let err = parse(&["--out-dir"]).unwrap_err();
        assert!(err.to_string().contains("--out-dir requires a value"));
        assert!(parse(&["--module"]).is_err());
        assert!(parse(&["-f"]).is_err());
    }

    #[test]
    fn test_bad_values() {
        assert!(parse(&["--module", "amd"]).is_err());
        let err = parse(&["--format", "xml"]).unwrap_err();
        assert!(err.to_string().contains("Unknown format: xml"));
    }

    #[test]
    fn test_unknown_flag() {
        let err = parse(&["--verbose"]).unwrap_err();
        assert_eq!(err.to_string(), "Unknown flag: --verbose");
    }
}
