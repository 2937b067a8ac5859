use crate::config::load_config;
use crate::layout::compute_layout;
use crate::layout_dump::write_layout_dump;
use crate::parser::parse_force_plot;
use crate::render::{render_svg, write_output_svg};
use crate::text_metrics::FontMetrics;
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "fpr", version, about = "Additive force plot renderer")]
pub struct Args {
    /// Input file (.json/.json5, or .md with force-plot fences) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file (svg/png). Defaults to stdout for SVG if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Container width
    #[arg(short = 'w', long = "width")]
    pub width: Option<f64>,

    /// Write the computed layout as JSON
    #[arg(long = "dumpLayout")]
    pub dump_layout: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
}

/// Installs a compact fmt subscriber filtered by `RUST_LOG`, defaulting to `warn`.
pub fn init_tracing() -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .try_init()
        .is_ok()
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing();

    let mut config = load_config(args.config.as_deref())?;
    if let Some(width) = args.width {
        config.render.width = width;
    }

    let (input, is_markdown) = read_input(args.input.as_deref())?;
    let documents = if is_markdown {
        extract_force_plot_blocks(&input)
    } else {
        vec![input]
    };

    if documents.is_empty() {
        return Err(anyhow::anyhow!("No force plots found in input"));
    }

    let outputs = if documents.len() == 1 {
        vec![args.output.clone()]
    } else {
        resolve_multi_outputs(args.output.as_deref(), args.output_format, documents.len())?
            .into_iter()
            .map(Some)
            .collect()
    };
    let measurer = FontMetrics {
        fast: config.layout.fast_text_metrics,
    };

    for (idx, document) in documents.iter().enumerate() {
        let plot = parse_force_plot(document)?;
        let layout = compute_layout(
            &plot,
            &config.theme,
            &config.layout,
            config.render.width,
            &measurer,
        );
        if let Some(dump_path) = args.dump_layout.as_deref() {
            let path = if documents.len() == 1 {
                dump_path.to_path_buf()
            } else {
                numbered_path(dump_path, idx, "json")
            };
            write_layout_dump(&path, &layout, &plot)?;
        }
        let svg = render_svg(&layout, &config.theme);
        match args.output_format {
            OutputFormat::Svg => write_output_svg(&svg, outputs[idx].as_deref())?,
            OutputFormat::Png => {
                let output = ensure_output(&outputs[idx], "png")?;
                write_png(&svg, &output, &config.render)?;
            }
        }
    }

    Ok(())
}

#[cfg(feature = "png")]
fn write_png(svg: &str, output: &Path, render: &crate::config::RenderConfig) -> Result<()> {
    crate::render::write_output_png(svg, output, render)
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, _output: &Path, _render: &crate::config::RenderConfig) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

fn read_input(path: Option<&Path>) -> Result<(String, bool)> {
    if let Some(path) = path {
        if path == Path::new("-") {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            return Ok((buf, false));
        }
        let content = std::fs::read_to_string(path)?;
        let is_md = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|ext| matches!(ext, "md" | "markdown"))
            .unwrap_or(false);
        return Ok((content, is_md));
    }

    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok((buf, false))
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}

fn extract_force_plot_blocks(input: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut in_block = false;
    let mut current = Vec::new();
    let mut fence = String::new();

    for line in input.lines() {
        let trimmed = line.trim();
        if !in_block {
            if let Some(start_fence) = detect_force_plot_fence(trimmed) {
                in_block = true;
                fence = start_fence;
                continue;
            }
        } else if is_fence_end(trimmed, &fence) {
            in_block = false;
            blocks.push(current.join("\n"));
            current.clear();
            continue;
        }

        if in_block {
            current.push(line.to_string());
        }
    }

    blocks
}

fn detect_force_plot_fence(line: &str) -> Option<String> {
    for marker in ['`', '~'] {
        let fence: String = std::iter::repeat_n(marker, 3).collect();
        if line.starts_with(&fence) {
            let rest = line.trim_start_matches(marker).trim();
            if rest.starts_with("force-plot") || rest.starts_with("forceplot") {
                return Some(fence);
            }
        }
    }
    None
}

fn is_fence_end(line: &str, fence: &str) -> bool {
    if !line.starts_with(fence) {
        return false;
    }
    line[fence.len()..].trim().is_empty()
}

fn numbered_path(base: &Path, idx: usize, ext: &str) -> PathBuf {
    let stem = base.file_stem().and_then(|s| s.to_str()).unwrap_or("force-plot");
    let parent = base.parent().unwrap_or_else(|| Path::new("."));
    parent.join(format!("{}-{}.{}", stem, idx + 1, ext))
}

fn resolve_multi_outputs(
    output: Option<&Path>,
    format: OutputFormat,
    count: usize,
) -> Result<Vec<PathBuf>> {
    let ext = match format {
        OutputFormat::Svg => "svg",
        OutputFormat::Png => "png",
    };
    let base = output.ok_or_else(|| anyhow::anyhow!("Output path required for markdown input"))?;
    if base.is_dir() {
        return Ok((0..count)
            .map(|idx| base.join(format!("force-plot-{}.{}", idx + 1, ext)))
            .collect());
    }
    Ok((0..count).map(|idx| numbered_path(base, idx, ext)).collect())
}
