use anyhow::Result;
use asset_gen::asset_gen::{generate_assets, Args};
use clap::Parser;

fn main() -> Result<()> {
    let args = Args::parse();

    if let Err(err) = generate_assets(&args) {
        println!("❌ Error: {err:#}");
        return Err(err);
    }

    Ok(())
}
