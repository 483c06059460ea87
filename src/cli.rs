use crate::config::load_config;
use crate::interact::bind;
use crate::layout::compute_layout;
use crate::model::NotationKind;
use crate::render::{render_svg, write_output_svg};
use crate::{extract, ExtractOptions};
use anyhow::Result;
use clap::Parser;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "docviz", version, about = "Extract and render diagrams from document text")]
pub struct Args {
    /// Input document or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output SVG path. Defaults to stdout; with multiple diagrams a
    /// numbered file per diagram is written next to this path.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Config JSON file with optional "theme" and "layout" sections
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Restrict detection to these notations (comma separated)
    #[arg(short = 'k', long = "kinds", value_delimiter = ',')]
    pub kinds: Vec<String>,

    /// List detected diagrams without rendering
    #[arg(short = 'l', long = "list")]
    pub list: bool,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;
    let mut options = ExtractOptions {
        theme: config.theme,
        layout: config.layout,
        ..ExtractOptions::default()
    };
    if !args.kinds.is_empty() {
        options.allowed_kinds = args
            .kinds
            .iter()
            .map(|token| {
                NotationKind::from_token(token)
                    .ok_or_else(|| anyhow::anyhow!("unknown notation kind: {token}"))
            })
            .collect::<Result<_>>()?;
    }

    let input = read_input(args.input.as_deref())?;
    let extraction = extract(&input, &options)?;
    for warning in &extraction.warnings {
        eprintln!("warning: {warning}");
    }

    if args.list {
        for diagram in &extraction.diagrams {
            println!(
                "{} (confidence {:.2}, {} warnings)",
                diagram.kind,
                diagram.confidence,
                diagram.warnings.len()
            );
        }
        return Ok(());
    }

    let outputs = resolve_outputs(args.output.as_deref(), extraction.diagrams.len())?;
    for (idx, diagram) in extraction.diagrams.iter().enumerate() {
        for warning in &diagram.warnings {
            eprintln!("warning [{}]: {warning}", diagram.kind);
        }
        let layout = compute_layout(&diagram.content, &options.theme, &options.layout);
        let svg = render_svg(&layout, &options.theme, &options.layout);
        let artifact = bind(&svg, &diagram.content, &layout, &options.theme, &options.layout);
        write_output_svg(&artifact.svg, outputs.get(idx).map(PathBuf::as_path))?;
    }

    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => Ok(std::fs::read_to_string(path)?),
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn resolve_outputs(output: Option<&Path>, count: usize) -> Result<Vec<PathBuf>> {
    let Some(base) = output else {
        // Stdout; every diagram is written there in order.
        return Ok(Vec::new());
    };
    if count <= 1 {
        return Ok(vec![base.to_path_buf()]);
    }
    if base.is_dir() {
        return Ok((0..count)
            .map(|idx| base.join(format!("diagram-{}.svg", idx + 1)))
            .collect());
    }
    let stem = base.file_stem().and_then(|s| s.to_str()).unwrap_or("diagram");
    let parent = base.parent().unwrap_or_else(|| Path::new("."));
    Ok((0..count)
        .map(|idx| parent.join(format!("{}-{}.svg", stem, idx + 1)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outputs_are_numbered_for_multiple_diagrams() {
        let outputs = resolve_outputs(Some(Path::new("out/report.svg")), 3).unwrap();
        assert_eq!(outputs[0], Path::new("out/report-1.svg"));
        assert_eq!(outputs[2], Path::new("out/report-3.svg"));
    }

    #[test]
    fn single_diagram_keeps_requested_path() {
        let outputs = resolve_outputs(Some(Path::new("report.svg")), 1).unwrap();
        assert_eq!(outputs, vec![PathBuf::from("report.svg")]);
    }

    #[test]
    fn stdout_when_no_output_given() {
        assert!(resolve_outputs(None, 2).unwrap().is_empty());
    }
}
