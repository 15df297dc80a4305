use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use fastrand::Rng;
use image::{Rgba, RgbaImage};

use crate::layout;

#[derive(Clone, Copy)]
struct Color {
    r: f32,
    g: f32,
    b: f32,
    a: f32,
}

fn color_from_rgba(r: u8, g: u8, b: u8, a: u8) -> Color {
    Color {
        r: r as f32 / 255.0,
        g: g as f32 / 255.0,
        b: b as f32 / 255.0,
        a: a as f32 / 255.0,
    }
}

fn color_to_rgba(color: Color) -> Rgba<u8> {
    let to_u8 = |channel: f32| -> u8 { (channel.clamp(0.0, 1.0) * 255.0).round() as u8 };
    Rgba([
        to_u8(color.r),
        to_u8(color.g),
        to_u8(color.b),
        to_u8(color.a),
    ])
}

fn mix(a: Color, b: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    Color {
        r: a.r + (b.r - a.r) * t,
        g: a.g + (b.g - a.g) * t,
        b: a.b + (b.b - a.b) * t,
        a: a.a + (b.a - a.a) * t,
    }
}

fn brighten(color: Color, amount: f32) -> Color {
    Color {
        r: (color.r + amount).clamp(0.0, 1.0),
        g: (color.g + amount).clamp(0.0, 1.0),
        b: (color.b + amount).clamp(0.0, 1.0),
        a: color.a,
    }
}

const FACE_PALETTE: [(u8, u8, u8); 8] = [
    (64, 48, 117),
    (31, 84, 128),
    (23, 105, 72),
    (140, 92, 28),
    (128, 44, 44),
    (96, 40, 104),
    (38, 98, 112),
    (92, 98, 36),
];

fn palette_color(slot: usize) -> Color {
    let (r, g, b) = FACE_PALETTE[slot % FACE_PALETTE.len()];
    color_from_rgba(r, g, b, 255)
}

fn rng_for_face(index: usize) -> Rng {
    let mut hasher = DefaultHasher::new();
    "card-face".hash(&mut hasher);
    index.hash(&mut hasher);
    Rng::with_seed(hasher.finish())
}

fn border_thickness(size: u32) -> u32 {
    (size / 32).max(1)
}

fn fill_vertical_gradient(image: &mut RgbaImage, top: Color, bottom: Color) {
    let width = image.width();
    let height = image.height().max(1);

    for y in 0..height {
        let t = y as f32 / (height - 1).max(1) as f32;
        let rgba = color_to_rgba(mix(top, bottom, t));
        for x in 0..width {
            image.put_pixel(x, y, rgba);
        }
    }
}

fn draw_diagonal_stripes(image: &mut RgbaImage, color: Color, period: u32, thickness: u32) {
    let rgba = color_to_rgba(color);
    let period = period.max(1);

    for y in 0..image.height() {
        for x in 0..image.width() {
            if (x + y) % period < thickness {
                image.put_pixel(x, y, rgba);
            }
        }
    }
}

fn draw_ring(image: &mut RgbaImage, center_x: f32, center_y: f32, radius: f32, thickness: f32, color: Color) {
    let rgba = color_to_rgba(color);
    let inner = (radius - thickness / 2.0).max(0.0);
    let outer = radius + thickness / 2.0;

    for y in 0..image.height() {
        for x in 0..image.width() {
            let dx = x as f32 + 0.5 - center_x;
            let dy = y as f32 + 0.5 - center_y;
            let distance = (dx * dx + dy * dy).sqrt();
            if distance >= inner && distance <= outer {
                image.put_pixel(x, y, rgba);
            }
        }
    }
}

fn draw_border(image: &mut RgbaImage, color: Color) {
    let rgba = color_to_rgba(color);
    let thickness = border_thickness(image.width().min(image.height()));
    let width = image.width();
    let height = image.height();

    for y in 0..height {
        for x in 0..width {
            let near_edge = x < thickness
                || y < thickness
                || x >= width - thickness
                || y >= height - thickness;
            if near_edge {
                image.put_pixel(x, y, rgba);
            }
        }
    }
}

/// Procedural face art for card `index`. Deterministic per index: the same
/// index always yields the same image, so regenerated assets stay stable
/// across runs.
pub fn build_face_image(index: usize) -> RgbaImage {
    let size = layout::FACE_PIXEL_SIZE;
    let mut rng = rng_for_face(index % layout::FACE_COUNT);
    let mut image = RgbaImage::new(size, size);

    let base = palette_color(rng.usize(0..FACE_PALETTE.len()));
    let top = brighten(base, 0.18);
    let bottom = mix(base, color_from_rgba(12, 12, 20, 255), 0.45);
    fill_vertical_gradient(&mut image, top, bottom);

    let accent = brighten(palette_color(rng.usize(0..FACE_PALETTE.len())), 0.25);
    let stripe_period = rng.u32(24..48);
    let stripe_thickness = rng.u32(2..6);
    draw_diagonal_stripes(&mut image, mix(accent, base, 0.6), stripe_period, stripe_thickness);

    let rings = rng.u32(1..4);
    for _ in 0..rings {
        let center_x = rng.u32(size / 4..size * 3 / 4) as f32;
        let center_y = rng.u32(size / 4..size * 3 / 4) as f32;
        let radius = rng.u32(size / 10..size / 3) as f32;
        let thickness = rng.u32(3..9) as f32;
        draw_ring(&mut image, center_x, center_y, radius, thickness, accent);
    }

    draw_border(&mut image, mix(base, color_from_rgba(0, 0, 0, 255), 0.55));
    image
}
