// inknote demo binary
// Stands in for the surrounding editor container: reads a markdown file,
// renders the highlighted overlay document as HTML and the minimap as SVG.

use clap::Parser;
use inknote::config::{self, Config};
use inknote::editor::EditorEngine;
use inknote::geometry::ViewportGeometry;
use inknote::preview::render_preview;
use inknote::svg::SvgDrawContext;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "inknote")]
#[command(about = "Render a markdown note the way the editor overlay would", long_about = None)]
struct Args {
    /// Markdown file to render
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Write the highlighted overlay document to this HTML file
    #[arg(long, value_name = "FILE")]
    html: Option<PathBuf>,

    /// Write the minimap rasterization to this SVG file
    #[arg(long, value_name = "FILE")]
    minimap_svg: Option<PathBuf>,

    /// Write a full markdown preview to this HTML file
    #[arg(long, value_name = "FILE")]
    preview: Option<PathBuf>,

    /// Cursor line used to resolve checkbox markers
    #[arg(long, default_value = "0")]
    cursor_line: usize,

    /// Simulated width of the editor surface in pixels
    #[arg(long, default_value = "800")]
    width: f64,

    /// Simulated height of the editor surface in pixels
    #[arg(long, default_value = "600")]
    height: f64,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("inknote: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), std::io::Error> {
    let text = fs::read_to_string(&args.input)?;

    let config = match config::config_file_path() {
        Some(path) => config::load_config(&path),
        None => Config::default(),
    };
    let style = config.style.clone();
    let minimap_width = config.minimap.width;
    let mut engine = EditorEngine::new(config);

    let index = inknote::document::LineIndex::new(&text);
    let cursor_line = args.cursor_line.min(index.line_count() - 1);
    let cursor_offset = index.line_start(cursor_line).unwrap_or(0);

    let content_height = style.padding_top
        + index.line_count() as f64 * style.line_height
        + style.padding_bottom;
    let geometry = ViewportGeometry {
        scroll_top: 0.0,
        client_height: args.height,
        scroll_height: content_height.max(args.height),
        client_width: args.width,
        outer_width: args.width,
    };

    engine.set_minimap_container_height(args.height);
    let frame = engine.render(&text, cursor_offset, &geometry);

    if let Some(path) = &args.html {
        let lines: Vec<String> = frame.lines.iter().map(|l| l.markup.clone()).collect();
        let overlay = engine.overlay();
        let html = format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<style>\n{}\n</style>\n</head>\n<body>\n{}\n</body>\n</html>\n",
            overlay.stylesheet(),
            overlay.overlay_document(&lines)
        );
        fs::write(path, html)?;
        println!("overlay html: {}", path.display());
    }

    if let Some(path) = &args.minimap_svg {
        if let Some(layout) = frame.minimap {
            let mut ctx = SvgDrawContext::new(minimap_width, layout.canvas_height);
            engine
                .minimap()
                .draw(&mut ctx, &text, &style, &geometry, args.height, 1.0);
            fs::write(path, ctx.finish())?;
            println!("minimap svg: {}", path.display());
        } else {
            eprintln!("inknote: surface not measurable, skipping minimap");
        }
    }

    if let Some(path) = &args.preview {
        fs::write(path, render_preview(&text))?;
        println!("preview html: {}", path.display());
    }

    if args.html.is_none() && args.minimap_svg.is_none() && args.preview.is_none() {
        for line in &frame.lines {
            println!("{}", line.markup);
        }
    }

    Ok(())
}
