//! Org chart viewer
//!
//! Loads a member list from JSON and shows it as an interactive org chart.
//!
//! ```text
//! org-chart --members fixtures/members.json --config config/org_chart.yaml
//! RUST_LOG=org_chart_core=trace org-chart --compact
//! ```

mod app;
mod manager_picker;
mod members;

use anyhow::Context;
use clap::Parser;
use org_chart_egui::{init_global_settings, OrgChartCapabilities, RenderMode, TreeViewOptions};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "org-chart")]
#[command(about = "Interactive org chart viewer")]
struct Args {
    /// JSON member list (array, or object with a `members` array)
    #[arg(short, long, default_value = "fixtures/members.json")]
    members: PathBuf,

    /// Visual settings
    #[arg(short, long, env = "ORG_CHART_CONFIG", default_value = "config/org_chart.yaml")]
    config: PathBuf,

    /// Start with cards fixed in place
    #[arg(long = "static")]
    static_mode: bool,

    /// Avatar and name only
    #[arg(long)]
    compact: bool,

    /// Hide invite and hierarchy editing actions
    #[arg(long)]
    read_only: bool,
}

impl Args {
    fn view_options(&self) -> TreeViewOptions {
        TreeViewOptions {
            mode: RenderMode::from_draggable(!self.static_mode),
            compact: self.compact,
            capabilities: if self.read_only {
                OrgChartCapabilities::read_only()
            } else {
                OrgChartCapabilities::all()
            },
        }
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_target(false)
        .init();

    let args = Args::parse();
    init_global_settings(&args.config);

    let members = members::load_members(&args.members).with_context(|| {
        format!(
            "Cannot start without a member list ({})",
            args.members.display()
        )
    })?;
    let options = args.view_options();

    tracing::info!(
        members = members.len(),
        mode = ?options.mode,
        compact = options.compact,
        "Starting org chart viewer"
    );

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Org Chart")
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Org Chart",
        native_options,
        Box::new(move |_cc| Ok(Box::new(app::OrgChartApp::new(members, options)))),
    )
    .map_err(|e| anyhow::anyhow!("Viewer exited with an error: {e}"))?;

    tracing::info!("Viewer closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_map_to_view_options() {
        let args = Args::parse_from(["org-chart", "--static", "--read-only"]);
        let options = args.view_options();
        assert_eq!(options.mode, RenderMode::Static);
        assert!(!options.capabilities.can_resend_invite);
        assert!(!options.capabilities.can_edit_hierarchy);
        assert_eq!(args.members, PathBuf::from("fixtures/members.json"));
    }
}
