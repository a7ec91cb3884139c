use archspace_core::{AttributeKey, CategoryKey, LabelPolicy, TickLabelMode};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "archspace")]
#[command(author, version, about = "Project architecture styles into a 3D attribute space")]
pub struct Cli {
    /// View configuration (JSON)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Catalogue to load instead of the built-in one (JSON)
    #[arg(long)]
    pub catalogue: Option<PathBuf>,

    /// Attribute on the X axis
    #[arg(long)]
    pub x: Option<AttributeKey>,

    /// Attribute on the Y axis
    #[arg(long)]
    pub y: Option<AttributeKey>,

    /// Attribute on the Z axis
    #[arg(long)]
    pub z: Option<AttributeKey>,

    /// Attribute driving point size
    #[arg(long)]
    pub size: Option<AttributeKey>,

    /// Disable an attribute (repeatable)
    #[arg(long, value_name = "ATTRIBUTE")]
    pub disable: Vec<AttributeKey>,

    /// Hide a whole category (repeatable)
    #[arg(long, value_name = "CATEGORY")]
    pub hide_category: Vec<CategoryKey>,

    /// Hide one entity by id (repeatable)
    #[arg(long, value_name = "ID")]
    pub hide: Vec<String>,

    /// Click on an entity's point on screen
    #[arg(long, value_name = "ID")]
    pub select: Option<String>,

    /// Label policy: hover, selected, hover+selected, all, off
    #[arg(long)]
    pub labels: Option<LabelPolicy>,

    /// Tick labels: none, endpoints, all
    #[arg(long)]
    pub ticks: Option<TickLabelMode>,

    /// Show category clusters
    #[arg(long)]
    pub clusters: bool,

    /// Print the scene as JSON
    #[arg(long)]
    pub json: bool,

    /// Run the frame loop for this many frames before printing
    #[arg(long, default_value_t = 0)]
    pub frames: u64,

    /// Viewport width in pixels
    #[arg(long, default_value_t = 1280)]
    pub width: u32,

    /// Viewport height in pixels
    #[arg(long, default_value_t = 720)]
    pub height: u32,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
