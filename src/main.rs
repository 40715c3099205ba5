use std::{fs, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;

use crate::runner::{Config, Runner};

mod error;
mod overpass;
mod runner;
mod templates;
mod utils;

/// Pulls map layers from Overpass: one query template in, one geojson out.
#[derive(Debug, Parser)]
struct Cli {
    /// Bounding box as south,west,north,east
    #[arg(long, default_value = "45.4881,9.1811,45.4953,9.1935", value_parser = parse_bbox)]
    bbox: String,
    /// Fetch only this template file
    #[arg(long)]
    name: Option<String>,
    /// Directory holding the query templates
    #[arg(long, default_value = "./overpass")]
    templates: PathBuf,
    /// Directory the geojson files are written to
    #[arg(long, default_value = "./data")]
    out: PathBuf,
    /// Seconds to wait between queries
    #[arg(long, default_value_t = 10)]
    delay: u64,
}

fn parse_bbox(raw: &str) -> Result<String, String> {
    let parts: Vec<_> = raw.split(',').collect();
    if parts.len() != 4 || parts.iter().any(|p| p.parse::<f64>().is_err()) {
        return Err("expected south,west,north,east".into());
    }

    Ok(raw.to_string())
}

fn select_templates(name: Option<String>, dir: &std::path::Path) -> Result<Vec<String>> {
    match name {
        Some(name) => Ok(vec![name]),
        None => templates::list(dir),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    println!("fetching data from overpass");

    let names = select_templates(cli.name, &cli.templates)?;
    fs::create_dir_all(&cli.out)
        .with_context(|| format!("Failed to create {}", cli.out.display()))?;

    let runner = Runner::start(
        Config {
            templates_dir: cli.templates,
            out_dir: cli.out,
            bbox: cli.bbox,
            delay: Duration::from_secs(cli.delay),
            endpoint: overpass::DEFAULT_ENDPOINT.to_string(),
        },
        names.len() as u64,
    );

    for name in names {
        runner.submit(name);
    }

    let summary = runner.drain();
    println!("{} written, {} failed", summary.written, summary.failed);

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs::write;

    use super::*;

    #[test]
    fn bbox_must_be_four_numbers() {
        assert!(parse_bbox("45.4881,9.1811,45.4953,9.1935").is_ok());
        assert!(parse_bbox("-45,9,46,10").is_ok());
        assert!(parse_bbox("45,9,46").is_err());
        assert!(parse_bbox("45,9,46,10,11").is_err());
        assert!(parse_bbox("45,9,north,10").is_err());
    }

    #[test]
    fn name_flag_restricts_the_run_to_one_template() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path().join("roads.ql"), "way;").unwrap();
        write(dir.path().join("water.ql"), "way;").unwrap();

        let names = select_templates(Some("roads.ql".into()), dir.path()).unwrap();
        assert_eq!(names, ["roads.ql"]);

        let mut names = select_templates(None, dir.path()).unwrap();
        names.sort();
        assert_eq!(names, ["roads.ql", "water.ql"]);
    }

    #[test]
    fn cli_parses_the_documented_flags() {
        let cli = Cli::try_parse_from([
            "overpass-pull",
            "--bbox=45,9,46,10",
            "--name=transport.ql",
        ])
        .unwrap();
        assert_eq!(cli.bbox, "45,9,46,10");
        assert_eq!(cli.name.as_deref(), Some("transport.ql"));
        assert_eq!(cli.delay, 10);

        assert!(Cli::try_parse_from(["overpass-pull", "--bbox=bad"]).is_err());
    }
}
