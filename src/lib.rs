#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;
pub mod projection;
pub mod render;
pub mod session;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LabelConfig, RenderConfig, ViewportConfig, load_config, parse_config};
pub use ir::Point;
pub use layout::{ScreenBox, VisibilitySet, estimate_bounds, overlaps, resolve_visibility};
pub use parser::{PointsError, parse_points};
pub use projection::{Projection, Viewport};
pub use render::render_svg;
pub use session::{MapEvent, MapSession, ViewportCommand};
pub use theme::Theme;

/// Parse a points document, run the initial pass (plus any `commands`) and
/// render the map with `selected` shown in the side panel.
pub fn render_points_svg(
    input: &str,
    config: &Config,
    commands: &[ViewportCommand],
    selected: Option<&str>,
) -> anyhow::Result<String> {
    let points = parse_points(input)?;
    let mut session = MapSession::from_config(points, config);
    for command in commands {
        session.apply(*command);
    }
    if selected.is_some() {
        session.select(selected);
    }
    Ok(render_svg(&session, &config.theme, &config.render))
}
