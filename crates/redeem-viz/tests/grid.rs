//! Integration tests for the image grid figure.

use ndarray::{Array, Array3, Array4};
use redeem_viz::{plot_grid, GridConfig, GridError};

/// `n` images of `h x w` where pixel values count up row-major from 0.
fn ramp_batch(n: usize, h: usize, w: usize) -> Array4<f32> {
    Array::from_shape_fn((n, h, w, 1), |(_, r, c, _)| (r * w + c) as f32)
}

fn is_gray(px: &image::Rgb<u8>) -> bool {
    px[0] == px[1] && px[1] == px[2]
}

// ---------------------------------------------------------------------------
// Successful renders
// ---------------------------------------------------------------------------

#[test]
fn nine_single_channel_tiles_default_size() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("grid.png");
    let batch = ramp_batch(9, 8, 8);

    plot_grid(&batch, &path, &GridConfig::default()).unwrap();

    let figure = image::open(&path).unwrap().to_rgb8();
    assert_eq!(figure.dimensions(), (1000, 1000));
    assert!(figure.pixels().all(is_gray));

    // First cell spans 0..333; its tile sits inside a ~16px blank margin.
    assert_eq!(figure.get_pixel(5, 5), &image::Rgb([255, 255, 255]));
    assert_eq!(figure.get_pixel(30, 30), &image::Rgb([0, 0, 0]));
    assert_eq!(figure.get_pixel(300, 300), &image::Rgb([255, 255, 255]));
    // Centre of the last cell is mid-gray, and the grid gap next to it is blank.
    let centre = figure.get_pixel(833, 833);
    assert!(centre[0] > 0 && centre[0] < 255);
    assert_eq!(figure.get_pixel(670, 833), &image::Rgb([255, 255, 255]));
}

#[test]
fn three_axis_batch_is_grayscale() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("grid.png");
    let batch: Array3<u8> = Array::from_shape_fn((4, 5, 5), |(i, r, c)| (i + r + c) as u8);

    plot_grid(&batch, &path, &GridConfig::new(2).with_figsize(2.0, 2.0)).unwrap();

    let figure = image::open(&path).unwrap().to_rgb8();
    assert_eq!(figure.dimensions(), (200, 200));
}

#[test]
fn extra_images_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("grid.png");
    // Only the first four are ramps; the rest are all NaN and would render blank.
    let mut batch = ramp_batch(12, 4, 4);
    for i in 4..12 {
        batch.index_axis_mut(ndarray::Axis(0), i).fill(f32::NAN);
    }

    plot_grid(&batch, &path, &GridConfig::new(2).with_figsize(4.0, 4.0)).unwrap();

    let figure = image::open(&path).unwrap().to_rgb8();
    assert_eq!(figure.dimensions(), (400, 400));
    // Top-left pixel of the first tile is the ramp minimum.
    assert_eq!(figure.get_pixel(30, 30), &image::Rgb([0, 0, 0]));
}

#[test]
fn overwrites_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("grid.png");
    std::fs::write(&path, b"not a png").unwrap();

    plot_grid(&ramp_batch(1, 3, 3), &path, &GridConfig::new(1).with_figsize(1.0, 1.0)).unwrap();

    assert!(image::open(&path).is_ok());
}

#[test]
fn colour_batch_keeps_colour() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("grid.png");
    let batch: Array4<f64> =
        Array::from_shape_fn((1, 2, 2, 3), |(_, _, _, ch)| if ch == 0 { 1.0 } else { 0.0 });

    plot_grid(&batch, &path, &GridConfig::new(1).with_figsize(1.0, 1.0)).unwrap();

    let figure = image::open(&path).unwrap().to_rgb8();
    assert_eq!(figure.get_pixel(50, 50), &image::Rgb([255, 0, 0]));
}

#[test]
fn colour_scale_comes_from_element_type() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = GridConfig::new(1).with_figsize(1.0, 1.0);

    // Integer batches are on 0..255: a value of 1 is nearly black.
    let dark = dir.path().join("dark.png");
    let bytes: Array4<u8> = Array::from_elem((1, 2, 2, 3), 1);
    plot_grid(&bytes, &dark, &cfg).unwrap();
    let figure = image::open(&dark).unwrap().to_rgb8();
    assert_eq!(figure.get_pixel(50, 50), &image::Rgb([1, 1, 1]));

    // Float batches are on 0..1 and clipped: 1.05 is white.
    let bright = dir.path().join("bright.png");
    let floats: Array4<f64> = Array::from_elem((1, 2, 2, 3), 1.05);
    plot_grid(&floats, &bright, &cfg).unwrap();
    let figure = image::open(&bright).unwrap().to_rgb8();
    assert_eq!(figure.get_pixel(50, 50), &image::Rgb([255, 255, 255]));
}

#[test]
fn svg_extension_uses_svg_backend() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("grid.svg");

    plot_grid(&ramp_batch(4, 4, 4), &path, &GridConfig::new(2)).unwrap();

    let svg = std::fs::read_to_string(&path).unwrap();
    assert!(svg.contains("<svg"));
    assert!(svg.contains("rect"));
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[test]
fn too_few_images_is_out_of_range_and_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("grid.png");

    let err = plot_grid(&ramp_batch(8, 8, 8), &path, &GridConfig::default()).unwrap_err();

    match err {
        GridError::NotEnoughImages { needed, available } => {
            assert_eq!(needed, 9);
            assert_eq!(available, 8);
        }
        other => panic!("expected NotEnoughImages, got {:?}", other),
    }
    assert!(!path.exists());
}

#[test]
fn missing_parent_directory_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("grid.png");

    let err = plot_grid(&ramp_batch(9, 8, 8), &path, &GridConfig::default()).unwrap_err();

    match err {
        GridError::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
        other => panic!("expected Io, got {:?}", other),
    }
    assert!(!path.exists());
}

#[test]
fn unknown_extension_fails_to_encode() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("grid.xyz");

    let err = plot_grid(&ramp_batch(1, 2, 2), &path, &GridConfig::new(1)).unwrap_err();

    assert!(matches!(err, GridError::Encode(_)), "got {:?}", err);
    assert!(!path.exists());
}

#[test]
fn two_axis_array_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("grid.png");
    let flat = ndarray::Array2::<f32>::zeros((9, 64));

    let err = plot_grid(&flat, &path, &GridConfig::default()).unwrap_err();

    assert!(matches!(err, GridError::UnsupportedShape(ref s) if s == &vec![9, 64]));
}

#[test]
fn oversized_figure_is_rejected_before_allocating() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("grid.png");
    let cfg = GridConfig::default().with_figsize(100_000.0, 100_000.0);

    let err = plot_grid(&ramp_batch(9, 2, 2), &path, &cfg).unwrap_err();

    assert!(matches!(err, GridError::InvalidGrid(_)));
    assert!(!path.exists());
}

#[test]
fn zero_grid_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let err = plot_grid(&ramp_batch(1, 2, 2), dir.path().join("g.png"), &GridConfig::new(0)).unwrap_err();
    assert!(matches!(err, GridError::InvalidGrid(_)));
}
