use image::{ColorType, GenericImageView};
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const EXPECTED: [(&str, u32, u32, ColorType); 4] = [
    ("hero_gradient_background.png", 1920, 1080, ColorType::Rgb8),
    ("gold_pattern_mobile_background.png", 1080, 1920, ColorType::Rgb8),
    ("lucky_wheel_centerpiece_icon.png", 500, 500, ColorType::Rgba8),
    ("success_celebration_graphic.png", 800, 600, ColorType::Rgba8),
];

/// Runs `asset-gen -o <dir>` twice against the same directory and asserts that
/// both runs succeed and leave all four images with the right size and mode.
#[test]
fn test_generates_all_assets_and_overwrites_on_rerun() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let output_dir = temp_dir.path().join("client").join("public").join("assets");

    for run in 1..=2 {
        let output = run_asset_gen(&output_dir);
        assert_success(&output, run);

        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(
            stdout.contains("All images generated successfully"),
            "Run {} should report success, got: {}",
            run,
            stdout
        );

        for (filename, width, height, color) in EXPECTED {
            assert!(
                stdout.contains(&format!("✓ Generated: {}", filename)),
                "Run {} should report {}",
                run,
                filename
            );
            verify_image(&output_dir.join(filename), width, height, color);
        }
    }

    println!("✓ Integration test passed: four assets generated twice into the same directory");
}

#[test]
fn test_celebration_graphic_is_identical_across_runs() {
    let first = TempDir::new().expect("Failed to create temp directory");
    let second = TempDir::new().expect("Failed to create temp directory");

    assert_success(&run_asset_gen(first.path()), 1);
    assert_success(&run_asset_gen(second.path()), 2);

    let a = std::fs::read(first.path().join("success_celebration_graphic.png"))
        .expect("Failed to read first celebration graphic");
    let b = std::fs::read(second.path().join("success_celebration_graphic.png"))
        .expect("Failed to read second celebration graphic");

    assert_eq!(a, b, "Celebration graphic should be byte-for-byte reproducible");
}

#[test]
fn test_unwritable_output_reports_error_and_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");

    // A regular file where the output directory should go
    let blocker = temp_dir.path().join("assets");
    std::fs::write(&blocker, b"not a directory").expect("Failed to create blocker file");

    let output = run_asset_gen(&blocker);

    assert!(
        !output.status.success(),
        "asset-gen should fail when the output directory can't be created"
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("❌ Error"),
        "Failure should be reported on stdout, got: {}",
        stdout
    );
}

fn run_asset_gen(output_dir: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_asset-gen"))
        .arg("-o")
        .arg(output_dir)
        .output()
        .expect("Failed to run asset-gen command")
}

fn assert_success(output: &Output, run: u32) {
    if !output.status.success() {
        eprintln!("Run {} failed with status: {}", run, output.status);
        eprintln!("stdout: {}", String::from_utf8_lossy(&output.stdout));
        eprintln!("stderr: {}", String::from_utf8_lossy(&output.stderr));
        panic!("asset-gen command failed");
    }
}

fn verify_image(path: &Path, width: u32, height: u32, color: ColorType) {
    assert!(path.exists(), "Output image should exist at: {}", path.display());

    let image = image::open(path).expect("Failed to load generated image");
    assert_eq!(image.width(), width, "{} width", path.display());
    assert_eq!(image.height(), height, "{} height", path.display());
    assert_eq!(image.color(), color, "{} color type", path.display());
}
