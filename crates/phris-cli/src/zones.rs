//! Zone inspection subcommands.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use phris_core::{Point, Zone, ZoneIndex};

use crate::{site, OutputFormat};

/// Arguments for the zones command
#[derive(Args, Debug)]
pub struct ZonesArgs {
    /// TOML site file (defaults to the built-in industrial layout)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the classify command
#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Horizontal image coordinate
    #[arg(long)]
    pub x: f64,

    /// Vertical image coordinate
    #[arg(long)]
    pub y: f64,

    /// TOML site file (defaults to the built-in industrial layout)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Zone display row for tables
#[derive(Tabled, Serialize)]
struct ZoneRow {
    #[tabled(rename = "#")]
    priority: usize,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Base Risk")]
    base_risk: u8,
    #[tabled(rename = "Vertices")]
    vertices: usize,
    #[tabled(rename = "Area (px2)")]
    area: String,
    #[tabled(rename = "Color (BGR)")]
    color: String,
}

impl ZoneRow {
    fn new(priority: usize, zone: &Zone) -> Self {
        let color = zone.color();
        Self {
            priority,
            name: zone.name().to_string(),
            label: zone.label().to_string(),
            base_risk: zone.base_risk(),
            vertices: zone.vertices().len(),
            area: format!("{:.0}", zone.area()),
            color: format!("{},{},{}", color.b(), color.g(), color.r()),
        }
    }
}

/// Load the site zones and build the index
fn load_index(config: Option<&std::path::Path>) -> Result<ZoneIndex> {
    let config = site::load(config)?;
    Ok(ZoneIndex::from_specs(&config.zones)?)
}

/// Execute the zones command
pub async fn execute_zones(args: ZonesArgs) -> Result<()> {
    let index = load_index(args.config.as_deref())?;
    let rows: Vec<ZoneRow> = index
        .zones()
        .iter()
        .enumerate()
        .map(|(i, zone)| ZoneRow::new(i + 1, zone))
        .collect();

    match args.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        OutputFormat::Table => {
            if rows.is_empty() {
                println!("{}", "No danger zones configured".yellow());
            } else {
                println!("{}", "Danger zones (first match wins)".bold().cyan());
                println!("{}", Table::new(rows).with(Style::rounded()));
            }
        }
    }

    Ok(())
}

/// Execute the classify command
pub async fn execute_classify(args: ClassifyArgs) -> Result<()> {
    let index = load_index(args.config.as_deref())?;
    let point = Point::new(args.x, args.y);
    let matched = index.classify(point);

    if matched.in_zone {
        let label = index
            .zone(&matched.zone_name)
            .map(|z| z.label().to_string())
            .unwrap_or_default();
        println!(
            "({}, {}) {} {} [{}] base risk {}",
            args.x,
            args.y,
            "is inside".red().bold(),
            matched.zone_name.bold(),
            label,
            matched.base_risk
        );
    } else {
        println!(
            "({}, {}) is {}",
            args.x,
            args.y,
            matched.zone_name.green().bold()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use phris_core::ZoneSpec;

    #[test]
    fn test_zone_rows_follow_priority() {
        let index = ZoneIndex::from_specs(&ZoneSpec::industrial_defaults()).unwrap();
        let rows: Vec<ZoneRow> = index
            .zones()
            .iter()
            .enumerate()
            .map(|(i, z)| ZoneRow::new(i + 1, z))
            .collect();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].name, "HEAVY_MACHINERY");
        assert_eq!(rows[0].priority, 1);
        assert_eq!(rows[0].area, "240000");
        assert_eq!(rows[1].color, "0,165,255");
    }

    #[test]
    fn test_default_index_loads() {
        let index = load_index(None).unwrap();
        assert_eq!(index.classify(Point::new(150.0, 200.0)).zone_name, "CHEMICAL");
    }
}
