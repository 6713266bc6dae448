use crate::config::load_config;
use crate::layout_dump::write_map_dump;
use crate::parser::parse_points;
use crate::render::{render_svg, write_output_svg};
use crate::session::{MapSession, ViewportCommand};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "poimap",
    version,
    about = "Render point-of-interest markers with overlap-free labels"
)]
pub struct Args {
    /// Points file (JSON/JSON5) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file (svg/png/json). Defaults to stdout for SVG and JSON.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON5 file (label metrics, viewport, theme)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Width
    #[arg(short = 'w', long = "width")]
    pub width: Option<f32>,

    /// Height
    #[arg(short = 'H', long = "height")]
    pub height: Option<f32>,

    /// Initial zoom level
    #[arg(short = 'z', long = "zoom")]
    pub zoom: Option<f64>,

    /// Initial center as LAT,LNG
    #[arg(long = "center", value_parser = parse_lat_lng, allow_hyphen_values = true)]
    pub center: Option<(f64, f64)>,

    /// Point id to show in the side panel
    #[arg(short = 's', long = "select")]
    pub select: Option<String>,

    /// Viewport gesture replayed after mount, e.g. pan:120,-40 or zoom:+1.
    /// Repeatable; applied in order.
    #[arg(long = "event", allow_hyphen_values = true)]
    pub events: Vec<ViewportCommand>,

    /// Hide the side panel
    #[arg(long = "no-side-panel")]
    pub no_side_panel: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
    Json,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;
    if let Some(width) = args.width {
        config.render.width = width;
    }
    if let Some(height) = args.height {
        config.render.height = height;
    }
    if let Some(zoom) = args.zoom {
        config.viewport.zoom = zoom;
    }
    if let Some(center) = args.center {
        config.viewport.center = center;
    }
    if args.no_side_panel {
        config.render.side_panel = false;
    }

    let input = read_input(args.input.as_deref())?;
    let points = parse_points(&input)?;
    log::info!("loaded {} points", points.len());

    let mut session = MapSession::from_config(points, &config);
    for event in &args.events {
        session.apply(*event);
    }
    if let Some(id) = args.select.as_deref() {
        session.select(Some(id));
    }

    let visibility = session.visibility();
    log::info!(
        "{} of {} labels visible after {} passes",
        visibility.visible_count(),
        visibility.len(),
        session.passes()
    );

    match args.output_format {
        OutputFormat::Svg => {
            let svg = render_svg(&session, &config.theme, &config.render);
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => write_png(&session, &config, args.output.as_deref())?,
        OutputFormat::Json => write_map_dump(args.output.as_deref(), &session)?,
    }
    Ok(())
}

#[cfg(feature = "png")]
fn write_png(session: &MapSession, config: &crate::config::Config, output: Option<&Path>) -> Result<()> {
    let output = output.ok_or_else(|| anyhow::anyhow!("Output path required for png output"))?;
    let svg = render_svg(session, &config.theme, &config.render);
    crate::render::write_output_png(&svg, output, &config.render)
}

#[cfg(not(feature = "png"))]
fn write_png(_: &MapSession, _: &crate::config::Config, _: Option<&Path>) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the 'png' feature"))
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return Ok(std::fs::read_to_string(path)?);
        }
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn parse_lat_lng(raw: &str) -> Result<(f64, f64), String> {
    let (lat, lng) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LNG, got '{raw}'"))?;
    let lat = lat.trim().parse::<f64>().map_err(|err| format!("latitude: {err}"))?;
    let lng = lng.trim().parse::<f64>().map_err(|err| format!("longitude: {err}"))?;
    Ok((lat, lng))
}
