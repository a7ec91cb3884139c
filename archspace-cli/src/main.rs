use anyhow::{bail, Context, Result};
use archspace_core::{
    AttributeKey, Axis, AxisReading, Catalogue, SceneFrame, Slot, ViewConfig, ViewSession,
};
use archspace_visualization::{headless_session, FrameLoop, SceneTable};
use clap::Parser;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod cli;

use cli::Cli;

/// Fixed step of the frame loop, in seconds
const FRAME_STEP: f32 = 1.0 / 60.0;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; stdout is reserved for the report
    let level = match cli.verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    let mut config = match &cli.config {
        Some(path) => ViewConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ViewConfig::default(),
    };
    if let Some(policy) = cli.labels {
        config.label_policy = policy;
    }
    if let Some(mode) = cli.ticks {
        config.tick_label_mode = mode;
    }
    config.show_clusters |= cli.clusters;

    let catalogue = match &cli.catalogue {
        Some(path) => Catalogue::from_file(path)
            .with_context(|| format!("failed to load catalogue {}", path.display()))?,
        None => Catalogue::builtin().context("built-in catalogue is invalid")?,
    };

    let mut session = headless_session(catalogue, config, cli.width, cli.height)
        .context("failed to start view session")?;
    apply_flags(&mut session, &cli)?;

    if cli.frames > 0 {
        let settings = session.config().camera;
        let mut frame_loop = FrameLoop::new(session.frame_slot(), &settings);
        frame_loop.run(session.renderer_mut().camera_mut(), cli.frames, FRAME_STEP);
        info!(frames = frame_loop.frame_count(), "frame loop finished");
    }

    if cli.json {
        print_json(&session)
    } else {
        print_table(&session);
        Ok(())
    }
}

fn apply_flags(session: &mut ViewSession<SceneTable>, cli: &Cli) -> Result<()> {
    for key in &cli.disable {
        session.toggle_attribute(*key, false);
    }

    let requests = [
        (Slot::X, cli.x),
        (Slot::Y, cli.y),
        (Slot::Z, cli.z),
        (Slot::Size, cli.size),
    ];
    for (slot, key) in requests {
        let Some(key) = key else { continue };
        let applied = match slot {
            Slot::X => session.set_axis(Axis::X, key),
            Slot::Y => session.set_axis(Axis::Y, key),
            Slot::Z => session.set_axis(Axis::Z, key),
            Slot::Size => session.set_size_attribute(key),
        };
        applied.with_context(|| format!("cannot map {} to `{}`", slot, key))?;
    }

    for category in &cli.hide_category {
        session.set_category_enabled(*category, false);
    }
    for id in &cli.hide {
        if !session.set_entity_enabled(id, false) {
            bail!("unknown entity `{}`", id);
        }
    }

    if let Some(id) = &cli.select {
        select(session, id)?;
    }
    Ok(())
}

/// Click on the screen position of an entity's point
fn select(session: &mut ViewSession<SceneTable>, id: &str) -> Result<()> {
    let point = session
        .frame()
        .point(id)
        .with_context(|| format!("unknown entity `{}`", id))?;
    if !point.transform.visible {
        bail!("entity `{}` is hidden and cannot be selected", id);
    }

    let position = point.transform.position;
    let pointer = session
        .renderer()
        .screen_position(&position)
        .with_context(|| format!("entity `{}` is behind the camera", id))?;
    session.pointer_clicked(pointer);

    match session.selection().selected() {
        Some(selected) if selected == id => {}
        Some(selected) => warn!(requested = id, %selected, "another point is in front of the requested one"),
        None => warn!(requested = id, "click on the requested point missed"),
    }
    Ok(())
}

#[derive(Serialize)]
struct MappingEntry {
    slot: Slot,
    attribute: AttributeKey,
    forced: bool,
}

#[derive(Serialize)]
struct Report<'a> {
    mapping: Vec<MappingEntry>,
    enabled_attributes: Vec<AttributeKey>,
    frame: &'a SceneFrame,
    selected: Option<[AxisReading; 4]>,
}

fn print_json(session: &ViewSession<SceneTable>) -> Result<()> {
    let mapping = session.mapping();
    let report = Report {
        mapping: Slot::ALL
            .iter()
            .map(|slot| MappingEntry {
                slot: *slot,
                attribute: mapping.get(*slot),
                forced: mapping.is_forced(*slot),
            })
            .collect(),
        enabled_attributes: mapping.enabled_attributes(),
        frame: session.frame(),
        selected: session.selected_snapshot(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn print_table(session: &ViewSession<SceneTable>) {
    let catalogue = session.catalogue();
    let mapping = session.mapping();
    let frame = session.frame();

    for slot in Slot::ALL {
        let key = mapping.get(slot);
        let forced = if mapping.is_forced(slot) {
            format!(" (forced, prefers {})", catalogue.attribute_label(mapping.preferred().get(slot)))
        } else {
            String::new()
        };
        println!("{:<2} {}{}", slot.short_label(), catalogue.attribute_label(key), forced);
    }
    println!();

    println!(
        "{:<20} {:<30} {:<11} {:>7} {:>7} {:>7} {:>5}",
        "id", "name", "category", "x", "y", "z", "size"
    );
    for point in frame.visible_points() {
        let p = point.transform.position;
        let marker = if frame.selected.as_ref() == Some(&point.id) { "*" } else { "" };
        println!(
            "{:<20} {:<30} {:<11} {:>7.2} {:>7.2} {:>7.2} {:>5.2}{}",
            point.id.as_str(),
            point.name,
            point.category.as_str(),
            p.x,
            p.y,
            p.z,
            point.transform.size_factor,
            marker
        );
    }
    println!(
        "{} of {} styles visible",
        frame.visible_points().count(),
        frame.points.len()
    );

    if frame.show_clusters {
        println!();
        for cluster in &frame.clusters {
            let c = cluster.centroid;
            println!(
                "{:<11} {} members, centre ({:.2}, {:.2}, {:.2}), radius {:.2}",
                cluster.label, cluster.member_count, c.x, c.y, c.z, cluster.radius
            );
        }
    }

    if let (Some(entity), Some(readings)) = (session.selected_entity(), session.selected_snapshot()) {
        println!();
        println!("{}", entity.name);
        println!("{}", entity.description);
        if let Some(url) = &entity.url {
            println!("{}", url);
        }
        for reading in &readings {
            println!(
                "  {:<2} {:<12} {:>5.0}  {}",
                reading.slot.short_label(),
                reading.label,
                reading.value,
                reading.note
            );
        }
    }
}
