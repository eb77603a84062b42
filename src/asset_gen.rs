use crate::draw::{Canvas, Point};
use anyhow::{Context, Result};
use clap::Parser;
use image::{
    codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder},
    DynamicImage, GenericImageView, ImageEncoder, RgbImage, Rgba, RgbaImage,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::{
    f32::consts::PI,
    fs::{create_dir_all, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};
use tiny_skia::BlendMode;

pub const DEFAULT_OUTPUT_DIR: &str = "client/public/assets";

pub const HERO_BACKGROUND: &str = "hero_gradient_background.png";
pub const MOBILE_BACKGROUND: &str = "gold_pattern_mobile_background.png";
pub const CENTERPIECE_ICON: &str = "lucky_wheel_centerpiece_icon.png";
pub const CELEBRATION_GRAPHIC: &str = "success_celebration_graphic.png";

pub const HERO_SIZE: (u32, u32) = (1920, 1080);
pub const MOBILE_SIZE: (u32, u32) = (1080, 1920);
pub const ICON_SIZE: u32 = 500;
pub const CELEBRATION_SIZE: (u32, u32) = (800, 600);

const GOLD: Rgba<u8> = Rgba([218, 165, 32, 255]);
const DARK_GOLD: Rgba<u8> = Rgba([184, 134, 11, 255]);
const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

// Hero gradient anchors: top, middle, bottom
pub const NAVY: [u8; 3] = [15, 25, 50];
pub const AMBER: [u8; 3] = [184, 134, 11];
pub const DEEP_GOLD: [u8; 3] = [139, 90, 10];

pub const PATTERN_BASE: Rgba<u8> = Rgba([20, 30, 60, 255]);
const HEX_RADIUS: i64 = 80;
const HEX_ROTATIONS: [f32; 3] = [0.0, 60.0, 120.0];
const HEX_GOLDS: [Rgba<u8>; 3] = [
    Rgba([218, 165, 32, 40]),
    Rgba([184, 134, 11, 50]),
    Rgba([139, 90, 10, 60]),
];

pub const CONFETTI_SEED: u64 = 42;
pub const CONFETTI_COUNT: usize = 100;
const CONFETTI_ANGLES: [u32; 4] = [0, 45, 90, 135];
pub const CONFETTI_COLORS: [Rgba<u8>; 4] = [
    Rgba([218, 165, 32, 200]), // Gold
    Rgba([255, 193, 7, 200]),  // Amber
    Rgba([255, 235, 59, 200]), // Yellow
    Rgba([76, 175, 80, 200]),  // Green
];

#[derive(Debug, Parser)]
#[clap(
    name = "asset-gen",
    about = "Generate the decorative images for the gold trading app"
)]
pub struct Args {
    /// Output directory. Hidden: the assets always live under the client's
    /// public folder, this only redirects them for tests.
    #[clap(short, long, value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR, hide = true)]
    pub output: PathBuf,
}

/// Generate all four assets into `args.output`, returning the written paths
pub fn generate_assets(args: &Args) -> Result<Vec<PathBuf>> {
    println!("🎨 Generating Gold Trading App Images...\n");

    // Ensure the output directory exists
    create_dir_all(&args.output).context("Can't create output directory")?;

    let written = vec![
        write_asset(&args.output, HERO_BACKGROUND, || {
            hero_gradient_background().map(DynamicImage::ImageRgb8)
        })?,
        write_asset(&args.output, MOBILE_BACKGROUND, || {
            gold_pattern_mobile_background(&mut rand::thread_rng()).map(DynamicImage::ImageRgb8)
        })?,
        write_asset(&args.output, CENTERPIECE_ICON, || {
            lucky_wheel_centerpiece_icon().map(DynamicImage::ImageRgba8)
        })?,
        write_asset(&args.output, CELEBRATION_GRAPHIC, || {
            success_celebration_graphic().map(DynamicImage::ImageRgba8)
        })?,
    ];

    println!("\n✅ All images generated successfully!");

    let saved_to = args
        .output
        .canonicalize()
        .context("Failed to resolve output directory")?;
    println!("\n📁 Images saved to: {}", saved_to.display());

    println!("\nGenerated files:");
    for name in list_png_files(&args.output)? {
        println!("  • {name}");
    }

    Ok(written)
}

fn write_asset<F>(out_dir: &Path, filename: &str, paint: F) -> Result<PathBuf>
where
    F: FnOnce() -> Result<DynamicImage>,
{
    println!("Generating {filename}...");
    let image = paint().with_context(|| format!("Failed to paint {filename}"))?;

    let output_path = out_dir.join(filename);
    save_png(&image, &output_path)?;

    println!("✓ Generated: {filename}");
    Ok(output_path)
}

/// Encode `image` as PNG at `path`, replacing any existing file
pub fn save_png(image: &DynamicImage, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create PNG file {}", path.display()))?;
    let mut out_file = BufWriter::new(file);
    write_png(image, &mut out_file)
        .with_context(|| format!("Failed to write PNG {}", path.display()))?;
    out_file.flush()?;
    Ok(())
}

// Encode image data as PNG with compression
fn write_png<W: Write>(image: &DynamicImage, w: W) -> Result<()> {
    let (width, height) = image.dimensions();
    let encoder = PngEncoder::new_with_quality(w, CompressionType::Best, PngFilterType::Adaptive);
    encoder.write_image(image.as_bytes(), width, height, image.color())?;
    Ok(())
}

fn list_png_files(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir).context("Failed to list output directory")? {
        let path = entry.context("Failed to read output directory entry")?.path();
        if path.extension().map_or(true, |ext| ext != "png") {
            continue;
        }
        if let Some(name) = path.file_name() {
            names.push(name.to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

/// Navy to gold to deep gold vertical gradient with a gentle horizontal
/// wave and a few diagonal light rays
pub fn hero_gradient_background() -> Result<RgbImage> {
    let (width, height) = HERO_SIZE;
    let mut gradient = RgbaImage::new(width, height);

    for y in 0..height {
        let row = hero_row_color(y, height);
        for x in 0..width {
            let variation = (10.0 * (x as f64 / 300.0).sin()) as i32;
            gradient.put_pixel(
                x,
                y,
                Rgba([
                    shift_channel(row[0], variation),
                    shift_channel(row[1], variation),
                    shift_channel(row[2], variation),
                    255,
                ]),
            );
        }
    }

    // Light rays
    let mut canvas = Canvas::from_image(&gradient, BlendMode::SourceOver)?;
    let ray = Rgba([255, 255, 255, 15]);
    for start in (0..width).step_by(200) {
        canvas.draw_line(
            (start as f32, 0.0),
            ((start + 400) as f32, height as f32),
            3.0,
            ray,
        );
    }

    Ok(DynamicImage::ImageRgba8(canvas.into_image()).to_rgb8())
}

/// Unclamped gradient color of row `y` before the horizontal wave is applied
pub fn hero_row_color(y: u32, height: u32) -> [i32; 3] {
    let ratio = y as f64 / height as f64;
    let (from, to, t) = if ratio < 0.5 {
        (NAVY, AMBER, ratio * 2.0)
    } else {
        (AMBER, DEEP_GOLD, (ratio - 0.5) * 2.0)
    };

    [0usize, 1, 2].map(|c| (from[c] as f64 * (1.0 - t) + to[c] as f64 * t) as i32)
}

fn shift_channel(value: i32, variation: i32) -> u8 {
    (value + variation).clamp(0, 255) as u8
}

/// Honeycomb of translucent gold hexagons on a dark base, darkened towards
/// the top. Tile colors come from `rng`.
pub fn gold_pattern_mobile_background<R: Rng + ?Sized>(rng: &mut R) -> Result<RgbImage> {
    let mut pattern = gold_pattern_tiles(rng)?;
    darken_towards_top(&mut pattern);
    Ok(DynamicImage::ImageRgba8(pattern).to_rgb8())
}

/// The mobile pattern before the darkening overlay is composited
pub fn gold_pattern_tiles<R: Rng + ?Sized>(rng: &mut R) -> Result<RgbaImage> {
    let (width, height) = MOBILE_SIZE;
    let base = RgbaImage::from_pixel(width, height, PATTERN_BASE);
    let mut canvas = Canvas::from_image(&base, BlendMode::SourceOver)?;

    let row_stride = HEX_RADIUS * 2;
    let col_stride = HEX_RADIUS * 3;

    let rows = (0..height as i64 + row_stride).step_by(row_stride as usize);
    for (row_index, center_y) in rows.enumerate() {
        let offset = if row_index % 2 == 1 { HEX_RADIUS } else { 0 };

        for col in (-HEX_RADIUS..width as i64 + row_stride).step_by(col_stride as usize) {
            let center = ((col + offset) as f32, center_y as f32);
            let rotation = HEX_ROTATIONS[rng.gen_range(0..HEX_ROTATIONS.len())];
            let points = hexagon_points(center, HEX_RADIUS as f32, rotation);

            let color = HEX_GOLDS[rng.gen_range(0..HEX_GOLDS.len())];
            canvas.fill_polygon(&points, color);
        }
    }

    Ok(canvas.into_image())
}

fn hexagon_points(center: Point, radius: f32, rotation_degrees: f32) -> Vec<Point> {
    (0..6)
        .map(|i| {
            let angle = (i as f32 * 60.0 + rotation_degrees).to_radians();
            (center.0 + radius * angle.cos(), center.1 + radius * angle.sin())
        })
        .collect()
}

// Pastes a black layer whose alpha fades from 10 at the top to 0 at the bottom
fn darken_towards_top(pattern: &mut RgbaImage) {
    let height = pattern.height();
    for (_, y, pixel) in pattern.enumerate_pixels_mut() {
        let alpha = (100.0 * (1.0 - y as f64 / height as f64)) as u32 / 10;
        for channel in 0..3 {
            pixel[channel] = ((pixel[channel] as u32 * (255 - alpha) + 127) / 255) as u8;
        }
    }
}

/// Transparent icon with a gold glow, a gold disc, a white star and
/// decorative rings
pub fn lucky_wheel_centerpiece_icon() -> Result<RgbaImage> {
    let size = ICON_SIZE;
    let mut canvas = Canvas::new(size, size, BlendMode::Source)?;
    let center = ((size / 2) as f32, (size / 2) as f32);

    // Outer glow
    let outer_radius = 230.0;
    paint_glow(&mut canvas, center, (5..=230).rev().step_by(5), 3.0, |r| {
        255.0 * (1.0 - r / outer_radius) * 0.8
    });

    // Inner disc
    canvas.fill_circle(center, 100.0, DARK_GOLD);
    canvas.stroke_circle(center, 100.0, 3.0, GOLD);

    let star = star_points(center, 40.0, 20.0);
    canvas.fill_polygon(&star, WHITE);
    canvas.stroke_polygon(&star, 1.0, GOLD);

    for ring_radius in [150.0, 170.0, 190.0] {
        canvas.stroke_circle(center, ring_radius, 2.0, Rgba([218, 165, 32, 150]));
    }

    Ok(canvas.into_image())
}

/// Vertices of a five-pointed star, starting at the top and alternating
/// between the outer and inner radius every 36 degrees
pub fn star_points(center: Point, outer_radius: f32, inner_radius: f32) -> Vec<Point> {
    (0..10)
        .map(|i| {
            let angle = (i as f32 * 36.0).to_radians() - PI / 2.0;
            let radius = if i % 2 == 0 {
                outer_radius
            } else {
                inner_radius
            };
            (center.0 + radius * angle.cos(), center.1 + radius * angle.sin())
        })
        .collect()
}

/// Concentric gold rings whose alpha is a function of their radius
fn paint_glow<I, F>(canvas: &mut Canvas, center: Point, radii: I, width: f32, alpha_at: F)
where
    I: IntoIterator<Item = u32>,
    F: Fn(f32) -> f32,
{
    for radius in radii {
        let radius = radius as f32;
        let alpha = alpha_at(radius).clamp(0.0, 255.0) as u8;
        canvas.stroke_circle(center, radius, width, Rgba([218, 165, 32, alpha]));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfettiShape {
    Square,
    Circle,
    Triangle,
}

/// A single piece of confetti, anchored at its top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Confetti {
    pub x: u32,
    pub y: u32,
    pub size: u32,
    pub shape: ConfettiShape,
    pub color: Rgba<u8>,
}

/// Draw `count` confetti pieces from `rng`, anywhere within `width` x `height`
pub fn scatter_confetti<R: Rng + ?Sized>(
    rng: &mut R,
    width: u32,
    height: u32,
    count: usize,
) -> Vec<Confetti> {
    (0..count)
        .map(|_| {
            let x = rng.gen_range(0..=width);
            let y = rng.gen_range(0..=height);
            let size = rng.gen_range(5..=15);

            // The rotation bucket picks the shape
            let shape = match CONFETTI_ANGLES[rng.gen_range(0..CONFETTI_ANGLES.len())] {
                0 => ConfettiShape::Square,
                45 => ConfettiShape::Circle,
                _ => ConfettiShape::Triangle,
            };
            let color = CONFETTI_COLORS[rng.gen_range(0..CONFETTI_COLORS.len())];

            Confetti {
                x,
                y,
                size,
                shape,
                color,
            }
        })
        .collect()
}

fn paint_confetti(canvas: &mut Canvas, piece: &Confetti) {
    let (x, y, size) = (piece.x as f32, piece.y as f32, piece.size as f32);

    match piece.shape {
        // Corners are inclusive, so the square spans size + 1 pixels
        ConfettiShape::Square => canvas.fill_rect(x, y, size + 1.0, size + 1.0, piece.color),
        ConfettiShape::Circle => {
            let half = size / 2.0;
            canvas.fill_circle((x + half, y + half), half, piece.color);
        }
        ConfettiShape::Triangle => {
            let apex_x = (piece.x + piece.size / 2) as f32;
            canvas.fill_polygon(&[(x, y), (x + size, y), (apex_x, y + size)], piece.color);
        }
    }
}

/// Success badge with a checkmark over a blue gradient, sprinkled with
/// confetti from a fixed seed so the output is reproducible. Shapes replace
/// the pixels they cover, so translucent glow rings and confetti leave
/// translucent pixels behind.
pub fn success_celebration_graphic() -> Result<RgbaImage> {
    let (width, height) = CELEBRATION_SIZE;
    let mut canvas = Canvas::new(width, height, BlendMode::Source)?;

    for y in 0..height {
        let ratio = y as f64 / height as f64;
        let color = Rgba([
            (20.0 + 50.0 * ratio) as u8,
            (35.0 + 80.0 * ratio) as u8,
            (70.0 + 100.0 * ratio) as u8,
            255,
        ]);
        canvas.fill_rect(0.0, y as f32, width as f32, 1.0, color);
    }

    let center = ((width / 2) as f32, (height / 2) as f32);

    paint_glow(&mut canvas, center, (60..=150).rev().step_by(10), 2.0, |r| {
        255.0 * (1.0 - (r - 50.0) / 100.0) * 0.3
    });

    canvas.fill_circle(center, 80.0, Rgba([76, 175, 80, 255]));
    canvas.stroke_circle(center, 80.0, 4.0, GOLD);

    let checkmark = [
        (center.0 - 30.0, center.1 + 10.0),
        (center.0 - 5.0, center.1 + 35.0),
        (center.0 + 40.0, center.1 - 20.0),
    ];
    canvas.draw_polyline(&checkmark, 6.0, WHITE);

    let mut rng = StdRng::seed_from_u64(CONFETTI_SEED);
    for piece in scatter_confetti(&mut rng, width, height, CONFETTI_COUNT) {
        paint_confetti(&mut canvas, &piece);
    }

    Ok(canvas.into_image())
}
