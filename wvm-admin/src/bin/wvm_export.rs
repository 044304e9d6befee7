//! wvm-export - render the static venue map site without the server
//!
//! Reads the catalog and page template from a root folder and writes one
//! page per populated category (plus the landing page when configured).

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use wvm_common::catalog::CatalogStore;
use wvm_common::config::{RootFolderResolver, RootLayout, TomlConfig};
use wvm_common::export::export_site;

#[derive(Parser, Debug)]
#[command(name = "wvm-export")]
#[command(about = "Generate the static venue map pages")]
#[command(version)]
struct Args {
    /// Root folder holding data.json and templates/
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Output directory (defaults to the configured export dir, then the root folder)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Page template (defaults to templates/map-template.html in the root folder)
    #[arg(short, long)]
    template: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wvm_common=info,wvm_export=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = TomlConfig::load_or_default();

    let mut layout = RootLayout::new(RootFolderResolver::new(args.root_folder, &config).resolve());
    if let Some(dir) = args.out.or(config.export_dir) {
        layout = layout.with_export_dir(dir);
    }
    let template = args.template.unwrap_or_else(|| layout.template_file());

    info!("Root folder: {}", layout.root().display());
    let store = CatalogStore::new(layout.data_file());
    let files = export_site(&store, &template, layout.export_dir())
        .await
        .with_context(|| format!("Export from {} failed", layout.root().display()))?;

    for file in &files {
        println!("{}", layout.export_dir().join(file).display());
    }
    Ok(())
}
