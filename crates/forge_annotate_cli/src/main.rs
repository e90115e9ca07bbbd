//! forge-annotate command-line tool
//!
//! Annotates TypeScript files with Closure-style JSDoc and writes the result
//! to stdout or an output directory.

mod args;
mod inputs;

use anyhow::{bail, Context, Result};
use args::{AnnotateCommand, OutputFormat, USAGE};
use forge_annotate::{
    AnnotateConfig, AnnotateOutput, AnnotatePipeline, RewriteStats, CONFIG_FILE_NAME,
    DEMO_FILE_NAME, DEMO_SOURCE,
};
use indexmap::IndexMap;
use inputs::{check_output_collisions, collect_inputs, Input, STDIN_NAME};
use std::io::Write;
use std::path::Path;
use tracing::{error, info, warn};

fn main() -> Result<()> {
    // FORGE_LOG selects the filter; logs go to stderr so stdout stays usable
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_env("FORGE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let cmd = AnnotateCommand::parse(&args)?;
    if cmd.help {
        print!("{}", USAGE);
        return Ok(());
    }

    run(&cmd)
}

fn run(cmd: &AnnotateCommand) -> Result<()> {
    let config = load_config(cmd)?;
    info!(
        module_kind = %config.module_kind,
        strip_types = config.strip_types,
        "configuration loaded"
    );

    let pipeline = AnnotatePipeline::new(config);
    let inputs = collect_inputs(&cmd.inputs)?;
    if cmd.out_dir.is_some() {
        check_output_collisions(&inputs)?;
    }

    let mut summary: IndexMap<String, RewriteStats> = IndexMap::new();
    let mut failures = 0usize;

    for input in &inputs {
        let label = input.label();
        match annotate(&pipeline, input) {
            Ok(output) => {
                for diagnostic in &output.diagnostics {
                    warn!("{}", diagnostic.format());
                }
                write_output(cmd, input, &output)?;
                summary.insert(label, output.stats);
            }
            Err(e) => {
                error!(file = %label, "{}", e);
                failures += 1;
            }
        }
    }

    let mut total = RewriteStats::default();
    for (file, stats) in &summary {
        info!(
            file = %file,
            interfaces = stats.interfaces,
            classes = stats.classes,
            methods = stats.methods,
            "summary"
        );
        total.merge(*stats);
    }
    info!(
        files = summary.len(),
        interfaces = total.interfaces,
        classes = total.classes,
        methods = total.methods,
        "done"
    );

    if failures > 0 {
        bail!("{} of {} inputs failed", failures, inputs.len());
    }
    Ok(())
}

/// `--config`, else `./forge-annotate.toml` when present, then flag overrides
fn load_config(cmd: &AnnotateCommand) -> Result<AnnotateConfig> {
    let mut config = match &cmd.config {
        Some(path) => AnnotateConfig::load(path)
            .with_context(|| format!("loading config at {}", path.display()))?,
        None if Path::new(CONFIG_FILE_NAME).is_file() => AnnotateConfig::load(CONFIG_FILE_NAME)
            .with_context(|| format!("loading config at {}", CONFIG_FILE_NAME))?,
        None => AnnotateConfig::default(),
    };

    if let Some(kind) = cmd.module_kind {
        config = config.with_module_kind(kind);
    }
    if cmd.no_strip {
        config = config.with_strip_types(false);
    }
    Ok(config)
}

fn annotate(pipeline: &AnnotatePipeline, input: &Input) -> Result<AnnotateOutput> {
    let output = match input {
        Input::Demo => pipeline.run_source(DEMO_FILE_NAME, DEMO_SOURCE)?,
        Input::Stdin => {
            let text = std::io::read_to_string(std::io::stdin()).context("reading stdin")?;
            pipeline.run_source(STDIN_NAME, &text)?
        }
        Input::File { path, .. } => pipeline.run_file(path)?,
    };
    Ok(output)
}

fn render(format: OutputFormat, output: &AnnotateOutput) -> Result<String> {
    match format {
        OutputFormat::Js => Ok(output.text.clone()),
        OutputFormat::Json => {
            let mut json =
                serde_json::to_string_pretty(&output.tree).context("serializing tree")?;
            json.push('\n');
            Ok(json)
        }
    }
}

fn write_output(cmd: &AnnotateCommand, input: &Input, output: &AnnotateOutput) -> Result<()> {
    let text = render(cmd.format, output)?;

    match &cmd.out_dir {
        Some(out_dir) => {
            let path = input.output_path(out_dir, cmd.format.extension());
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
            std::fs::write(&path, text).with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), "wrote");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(text.as_bytes()).context("writing stdout")?;
        }
    }
    Ok(())
}
