use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

mod contents_json;
mod draw;
mod icon_gen;

#[derive(Debug, Parser)]
#[clap(
    name = "appicon-gen",
    about = "Render the chat-bubble app icon into a macOS asset catalog"
)]
struct Args {
    /// Asset catalog root directory to (over)write.
    #[clap(short, long, value_name = "DIR", default_value = "Assets.xcassets")]
    output: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let iconset = icon_gen::generate(&args.output)?;
    println!("Generated icon assets at: {}", iconset.display());

    Ok(())
}
