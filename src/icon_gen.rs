use crate::contents_json::{write_contents_json, ContentsFile, ImageEntry, MAC_IDIOM, XCODE_AUTHOR};
use crate::draw::{
    fill_rounded_rect, fill_triangle, lerp_rgb, rounded_rect_coverage, stroke_arc, stroke_line,
    stroke_rounded_rect,
};
use anyhow::{Context, Result};
use image::{
    codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder},
    imageops::{self, FilterType},
    ColorType, ImageEncoder, Rgba, RgbaImage,
};
use std::{
    fs::{self, create_dir_all, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

/// Side length of the master image every exported size is derived from.
pub const MASTER_SIZE: u32 = 1024;

/// Directory name of the icon set inside the asset catalog root.
pub const ICONSET_DIR: &str = "AppIcon.appiconset";

// Background palette
const GRADIENT_TOP: [u8; 3] = [29, 56, 140];
const GRADIENT_BOTTOM: [u8; 3] = [89, 44, 180];
const GLOW: [u8; 3] = [24, 178, 255];

// Glow shaping: off-center focal point, squared-distance falloff, and the
// cap on how much glow mixes into the gradient.
const GLOW_FOCUS: (f32, f32) = (0.28, 0.26);
const GLOW_FALLOFF: f32 = 3.2;
const GLOW_STRENGTH: f32 = 0.35;

// Rounded-corner mask radius as a fraction of the side length.
const CORNER_RADIUS_FRAC: f32 = 0.23;

// Foreground palette
const LEFT_BUBBLE: Rgba<u8> = Rgba([22, 212, 255, 214]);
const RIGHT_BUBBLE: Rgba<u8> = Rgba([88, 240, 168, 220]);
const CHAIN: Rgba<u8> = Rgba([255, 255, 255, 245]);
const SPARK: Rgba<u8> = Rgba([255, 255, 255, 110]);
const BORDER: Rgba<u8> = Rgba([255, 255, 255, 90]);

/// One exported rendition of the master image.
#[derive(Debug)]
pub struct IconDefinition {
    /// Output filename inside the iconset directory
    pub filename: &'static str,
    /// Actual pixel side length of the exported PNG
    pub pixels: u32,
    /// Nominal size label for the manifest (points, not pixels)
    pub size: &'static str,
    /// Display scale label, "1x" or "2x"
    pub scale: &'static str,
}

/// The ten renditions a macOS app-icon set requires.
pub const ICON_DEFINITIONS: [IconDefinition; 10] = [
    IconDefinition { filename: "icon_16x16.png", pixels: 16, size: "16x16", scale: "1x" },
    IconDefinition { filename: "icon_16x16@2x.png", pixels: 32, size: "16x16", scale: "2x" },
    IconDefinition { filename: "icon_32x32.png", pixels: 32, size: "32x32", scale: "1x" },
    IconDefinition { filename: "icon_32x32@2x.png", pixels: 64, size: "32x32", scale: "2x" },
    IconDefinition { filename: "icon_128x128.png", pixels: 128, size: "128x128", scale: "1x" },
    IconDefinition { filename: "icon_128x128@2x.png", pixels: 256, size: "128x128", scale: "2x" },
    IconDefinition { filename: "icon_256x256.png", pixels: 256, size: "256x256", scale: "1x" },
    IconDefinition { filename: "icon_256x256@2x.png", pixels: 512, size: "256x256", scale: "2x" },
    IconDefinition { filename: "icon_512x512.png", pixels: 512, size: "512x512", scale: "1x" },
    IconDefinition { filename: "icon_512x512@2x.png", pixels: 1024, size: "512x512", scale: "2x" },
];

/// Runs the full pipeline: render the master image, composite the foreground,
/// and export the icon set into `asset_root`. Returns the iconset path.
pub fn generate(asset_root: &Path) -> Result<PathBuf> {
    println!("Rendering {MASTER_SIZE}x{MASTER_SIZE} master image...");
    let mut master = draw_background(MASTER_SIZE)?;
    draw_foreground(&mut master);

    println!("Generating {ICONSET_DIR}...");
    export_icon_set(&master, asset_root)
}

/// Renders the square gradient background with the corner glow, clipped to a
/// rounded-rectangle alpha mask.
///
/// Deterministic: the same `size` always produces an identical buffer.
pub fn draw_background(size: u32) -> Result<RgbaImage> {
    if size < 2 {
        anyhow::bail!("icon size must be at least 2x2, got {size}");
    }

    let mut image = RgbaImage::new(size, size);
    let span = (size - 1) as f32;

    for y in 0..size {
        let v = y as f32 / span;
        let base = lerp_rgb(GRADIENT_TOP, GRADIENT_BOTTOM, v);
        for x in 0..size {
            let u = x as f32 / span;
            let dx = u - GLOW_FOCUS.0;
            let dy = v - GLOW_FOCUS.1;
            let glow_mix = (1.0 - (dx * dx + dy * dy) * GLOW_FALLOFF).max(0.0);
            let w = glow_mix * GLOW_STRENGTH;
            image.put_pixel(
                x,
                y,
                Rgba([
                    glow_channel(base[0], GLOW[0], w),
                    glow_channel(base[1], GLOW[1], w),
                    glow_channel(base[2], GLOW[2], w),
                    255,
                ]),
            );
        }
    }

    // rounded clipping mask
    let bounds = [0.0, 0.0, size as f32, size as f32];
    let radius = size as f32 * CORNER_RADIUS_FRAC;
    for y in 0..size {
        for x in 0..size {
            let coverage = rounded_rect_coverage(x as f32 + 0.5, y as f32 + 0.5, bounds, radius);
            if coverage < 1.0 {
                let px = image.get_pixel_mut(x, y);
                px[3] = (px[3] as f32 * coverage).round() as u8;
            }
        }
    }

    Ok(image)
}

fn glow_channel(base: u8, glow: u8, weight: f32) -> u8 {
    (base as f32 * (1.0 - weight) + glow as f32 * weight).min(255.0) as u8
}

/// Composites the two chat bubbles, their tails, the chain motif, the spark
/// lines, and the border stroke onto `canvas` in place, with a Gaussian-blur
/// drop shadow beneath them.
///
/// All coordinates are fractions of the canvas side, so the composition
/// scales with any base resolution.
pub fn draw_foreground(canvas: &mut RgbaImage) {
    let size = canvas.width();
    let s = size as f32;
    let mut overlay = RgbaImage::new(size, size);

    // bubbles
    fill_rounded_rect(
        &mut overlay,
        [0.14 * s, 0.22 * s, 0.62 * s, 0.66 * s],
        0.11 * s,
        LEFT_BUBBLE,
    );
    fill_rounded_rect(
        &mut overlay,
        [0.38 * s, 0.34 * s, 0.86 * s, 0.78 * s],
        0.11 * s,
        RIGHT_BUBBLE,
    );

    // tails
    fill_triangle(
        &mut overlay,
        (0.25 * s, 0.66 * s),
        (0.23 * s, 0.82 * s),
        (0.39 * s, 0.66 * s),
        LEFT_BUBBLE,
    );
    fill_triangle(
        &mut overlay,
        (0.73 * s, 0.78 * s),
        (0.81 * s, 0.88 * s),
        (0.80 * s, 0.73 * s),
        RIGHT_BUBBLE,
    );

    // connector chain in center
    let chain_w = (0.04 * s).max(16.0);
    stroke_arc(&mut overlay, (0.49 * s, 0.52 * s), 0.08 * s, 15.0, 330.0, chain_w, CHAIN);
    stroke_arc(&mut overlay, (0.58 * s, 0.48 * s), 0.08 * s, 200.0, 160.0, chain_w, CHAIN);

    // subtle spark lines fanning out from a point near the top
    let spark_w = (0.006 * s).max(2.0);
    let (fan_x, fan_y) = (0.52 * s, 0.24 * s);
    for offset in [-70.0f32, -30.0, 0.0, 30.0, 70.0] {
        let o = offset * s / MASTER_SIZE as f32;
        stroke_line(
            &mut overlay,
            (fan_x + o, fan_y),
            (fan_x + o * 0.7, fan_y + 0.07 * s),
            spark_w,
            SPARK,
        );
    }

    // border stroke
    let inset = 0.01 * s;
    stroke_rounded_rect(
        &mut overlay,
        [inset, inset, s - inset, s - inset],
        0.22 * s,
        (0.008 * s).max(2.0),
        BORDER,
    );

    // soft drop shadow: blurred copy first, sharp overlay on top
    let shadow = imageops::blur(&overlay, 0.01 * s);
    imageops::overlay(canvas, &shadow, 0, 0);
    imageops::overlay(canvas, &overlay, 0, 0);
}

/// Resamples the master image to every required rendition, writes the PNGs
/// and both Contents.json manifests, and returns the iconset directory path.
///
/// Overwrites existing output; stale `*.png` files left in the iconset
/// directory by an earlier definition list are removed so the manifest stays
/// in one-to-one correspondence with the files on disk.
pub fn export_icon_set(master: &RgbaImage, asset_root: &Path) -> Result<PathBuf> {
    create_dir_all(asset_root)
        .with_context(|| format!("Can't create asset catalog root {}", asset_root.display()))?;
    let iconset_dir = asset_root.join(ICONSET_DIR);
    create_dir_all(&iconset_dir)
        .with_context(|| format!("Can't create iconset directory {}", iconset_dir.display()))?;

    write_contents_json(asset_root, &ContentsFile::new(XCODE_AUTHOR))?;

    remove_stale_icons(&iconset_dir)?;

    let mut contents = ContentsFile::new(XCODE_AUTHOR);
    for def in &ICON_DEFINITIONS {
        let resized = if def.pixels == master.width() {
            master.clone()
        } else {
            imageops::resize(master, def.pixels, def.pixels, FilterType::Lanczos3)
        };

        save_png(&resized, &iconset_dir.join(def.filename))?;
        println!("  ✓ Generated {}", def.filename);

        contents.add_image(ImageEntry::new(
            def.filename.to_string(),
            MAC_IDIOM.to_string(),
            def.scale.to_string(),
            def.size.to_string(),
        ));
    }

    write_contents_json(&iconset_dir, &contents)?;
    println!("  ✓ Generated {ICONSET_DIR}/Contents.json");

    Ok(iconset_dir)
}

// Removes PNG files that no current definition accounts for.
fn remove_stale_icons(iconset_dir: &Path) -> Result<()> {
    for entry in fs::read_dir(iconset_dir)
        .with_context(|| format!("Can't read iconset directory {}", iconset_dir.display()))?
    {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if name.ends_with(".png") && !ICON_DEFINITIONS.iter().any(|def| def.filename == name) {
            fs::remove_file(entry.path())
                .with_context(|| format!("Can't remove stale icon {name}"))?;
        }
    }
    Ok(())
}

// Encode the image as PNG with best compression and adaptive filtering.
fn save_png(image: &RgbaImage, path: &Path) -> Result<()> {
    let mut out_file = BufWriter::new(
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
    );
    let encoder =
        PngEncoder::new_with_quality(&mut out_file, CompressionType::Best, PngFilterType::Adaptive);
    encoder
        .write_image(image.as_raw(), image.width(), image.height(), ColorType::Rgba8)
        .with_context(|| format!("Failed to encode {}", path.display()))?;
    out_file.flush()?;
    Ok(())
}
