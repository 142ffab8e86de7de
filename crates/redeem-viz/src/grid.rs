use std::fs;
use std::path::Path;

use image::RgbImage;
use ndarray::{ArrayBase, ArrayViewD, Axis, Data, Dimension};
use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use tqdm::tqdm;

use crate::config::GridConfig;
use crate::error::GridError;

/// Element types an image batch may hold.
///
/// Colour images of integer type are read on a 0..255 scale, floating point
/// colour images on 0..1. Values outside the range are clipped.
pub trait PixelValue: Copy {
    const BYTE_SCALE: bool;

    fn to_f64(self) -> f64;
}

macro_rules! impl_pixel_value {
    ($byte_scale:expr => $($t:ty),*) => {
        $(
            impl PixelValue for $t {
                const BYTE_SCALE: bool = $byte_scale;

                fn to_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

impl_pixel_value!(true => u8, u16, u32, u64, i8, i16, i32, i64);
impl_pixel_value!(false => f32, f64);

/// Pixel layout of every image in a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TileLayout {
    Gray,
    Rgb,
    Rgba,
}

/// One image converted to display colours, row-major.
#[derive(Debug, Clone)]
struct Tile {
    height: usize,
    width: usize,
    pixels: Vec<RGBColor>,
}

impl Tile {
    fn pixel(&self, row: usize, col: usize) -> RGBColor {
        self.pixels[row * self.width + col]
    }
}

/// Tile the first `k * k` images of `img` into a grid and save it to `filepath`.
///
/// Axis 0 of `img` indexes images; each image is `(H, W)`, `(H, W, 1)` for
/// grayscale or `(H, W, 3)` / `(H, W, 4)` for colour. Grayscale images are
/// min-max normalized individually. Images past `k * k` are ignored. The file
/// format follows the extension (`svg`, or any raster format `image` encodes),
/// and an existing file at `filepath` is overwritten.
///
/// Everything is validated before anything is written: a batch with fewer
/// than `k * k` images fails with [`GridError::NotEnoughImages`].
pub fn plot_grid<A, S, D, P>(img: &ArrayBase<S, D>, filepath: P, config: &GridConfig) -> Result<(), GridError>
where
    A: PixelValue,
    S: Data<Elem = A>,
    D: Dimension,
    P: AsRef<Path>,
{
    let filepath = filepath.as_ref();
    config.validate()?;

    let batch = img.view().into_dyn();
    let layout = tile_layout(batch.shape())?;
    let needed = config.cells();
    let available = batch.len_of(Axis(0));
    if available < needed {
        return Err(GridError::NotEnoughImages { needed, available });
    }

    let tiles: Vec<Tile> = (0..needed)
        .map(|i| to_tile(batch.index_axis(Axis(0), i), layout))
        .collect();

    let size = config.pixel_size();
    let is_svg = filepath
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("svg"))
        .unwrap_or(false);

    if is_svg {
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
            draw_grid(&root, &tiles, config).map_err(render_error)?;
            root.present().map_err(render_error)?;
        }
        fs::write(filepath, svg)?;
    } else {
        let (w, h) = size;
        let mut buffer = vec![255u8; w as usize * h as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, size).into_drawing_area();
            draw_grid(&root, &tiles, config).map_err(render_error)?;
            root.present().map_err(render_error)?;
        }
        let figure = RgbImage::from_raw(w, h, buffer)
            .ok_or_else(|| GridError::Render("figure buffer has the wrong length".to_string()))?;
        figure.save(filepath)?;
    }

    log::info!("saved grid to {}", filepath.display());
    Ok(())
}

fn render_error<E: std::error::Error + Send + Sync>(e: DrawingAreaErrorKind<E>) -> GridError {
    GridError::Render(e.to_string())
}

fn tile_layout(shape: &[usize]) -> Result<TileLayout, GridError> {
    match shape {
        [_, _, _] => Ok(TileLayout::Gray),
        [_, _, _, 1] => Ok(TileLayout::Gray),
        [_, _, _, 3] => Ok(TileLayout::Rgb),
        [_, _, _, 4] => Ok(TileLayout::Rgba),
        _ => Err(GridError::UnsupportedShape(shape.to_vec())),
    }
}

fn to_tile<A: PixelValue>(image: ArrayViewD<'_, A>, layout: TileLayout) -> Tile {
    let height = image.shape()[0];
    let width = image.shape()[1];
    let values: Vec<f64> = image.iter().map(|&v| v.to_f64()).collect();

    let pixels = match layout {
        TileLayout::Gray => gray_pixels(&values),
        TileLayout::Rgb => colour_pixels(&values, 3, A::BYTE_SCALE),
        TileLayout::Rgba => colour_pixels(&values, 4, A::BYTE_SCALE),
    };

    Tile {
        height,
        width,
        pixels,
    }
}

/// Min-max normalize to the gray colour map. A constant image maps to black,
/// non-finite pixels to the white background.
fn gray_pixels(values: &[f64]) -> Vec<RGBColor> {
    let (min, max) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let range = max - min;

    values
        .iter()
        .map(|&v| {
            if !v.is_finite() {
                return WHITE;
            }
            let t = if range > 0.0 { (v - min) / range } else { 0.0 };
            let g = (t * 255.0).round() as u8;
            RGBColor(g, g, g)
        })
        .collect()
}

fn colour_pixels(values: &[f64], channels: usize, byte_scale: bool) -> Vec<RGBColor> {
    let to_unit = |v: f64| {
        if !v.is_finite() {
            return 1.0;
        }
        let v = if byte_scale { v / 255.0 } else { v };
        v.clamp(0.0, 1.0)
    };

    values
        .chunks_exact(channels)
        .map(|px| {
            let alpha = if channels == 4 { to_unit(px[3]) } else { 1.0 };
            let blend = |c: f64| ((to_unit(c) * alpha + (1.0 - alpha)) * 255.0).round() as u8;
            RGBColor(blend(px[0]), blend(px[1]), blend(px[2]))
        })
        .collect()
}

fn draw_grid<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    tiles: &[Tile],
    config: &GridConfig,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&WHITE)?;
    let cells = root.split_evenly((config.k, config.k));

    for i in tqdm(0..config.cells()).desc(Some("plotting grid")) {
        draw_tile(&cells[i], &tiles[i], config.spacing)?;
    }
    Ok(())
}

/// Draw one tile centred in its cell, nearest-neighbour scaled with the
/// aspect ratio kept. Nothing else (ticks, frame, labels) goes in the cell.
fn draw_tile<DB: DrawingBackend>(
    cell: &DrawingArea<DB, Shift>,
    tile: &Tile,
    spacing: f64,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    if tile.height == 0 || tile.width == 0 {
        return Ok(());
    }
    let (cw, ch) = cell.dim_in_pixel();
    let pad_x = cw as f64 * spacing;
    let pad_y = ch as f64 * spacing;
    let inner_w = cw as f64 - 2.0 * pad_x;
    let inner_h = ch as f64 - 2.0 * pad_y;
    if inner_w <= 0.0 || inner_h <= 0.0 {
        return Ok(());
    }

    let scale = (inner_w / tile.width as f64).min(inner_h / tile.height as f64);
    let origin_x = pad_x + (inner_w - scale * tile.width as f64) / 2.0;
    let origin_y = pad_y + (inner_h - scale * tile.height as f64) / 2.0;

    for row in 0..tile.height {
        let y0 = (origin_y + row as f64 * scale).round() as i32;
        let y1 = (origin_y + (row + 1) as f64 * scale).round() as i32 - 1;
        for col in 0..tile.width {
            let x0 = (origin_x + col as f64 * scale).round() as i32;
            let x1 = (origin_x + (col + 1) as f64 * scale).round() as i32 - 1;
            if x1 < x0 || y1 < y0 {
                continue;
            }
            cell.draw(&Rectangle::new([(x0, y0), (x1, y1)], tile.pixel(row, col).filled()))?;
        }
    }
    Ok(())
}
