//! Luminance masks for the export.
//!
//! ## Alpha to grayscale
//!
//! Every pixel becomes `(a, a, a, 255)` where `a` is its alpha. Coverage is
//! independent of premultiplication, so surfaces are read as they come out of
//! the rasteriser.
//!
//! ## Fixed slots
//!
//! Per-layer masks are addressed by each layer's original slot, not by its
//! current stacking position. Unused slots hold a small black placeholder.

use image::{Rgba, RgbaImage};
use tiny_skia::Pixmap;

use crate::config::{MASK_SLOT_COUNT, PLACEHOLDER_MASK_SIZE};
use crate::layers::LayerSlot;

/// Convert a rendered surface's alpha channel into an opaque grayscale image.
pub fn alpha_to_grayscale(surface: &Pixmap) -> RgbaImage {
    let mut bytes = surface.data().to_vec();
    alpha_to_grayscale_in_place(&mut bytes);
    RgbaImage::from_raw(surface.width(), surface.height(), bytes)
        .unwrap_or_else(|| RgbaImage::new(surface.width(), surface.height()))
}

/// In-place variant over raw RGBA bytes.
pub fn alpha_to_grayscale_in_place(rgba: &mut [u8]) {
    for pixel in rgba.chunks_exact_mut(4) {
        let alpha = pixel[3];
        pixel[0] = alpha;
        pixel[1] = alpha;
        pixel[2] = alpha;
        pixel[3] = 255;
    }
}

/// Solid opaque black square filling an unused slot.
pub fn placeholder_mask() -> RgbaImage {
    RgbaImage::from_pixel(
        PLACEHOLDER_MASK_SIZE,
        PLACEHOLDER_MASK_SIZE,
        Rgba([0, 0, 0, 255]),
    )
}

/// Place masks at `slot - 1` and fill the gaps with placeholders.
///
/// A slot seen twice keeps the later mask.
pub fn assemble_slots<I>(masks: I) -> [RgbaImage; MASK_SLOT_COUNT]
where
    I: IntoIterator<Item = (LayerSlot, RgbaImage)>,
{
    let mut slots: [Option<RgbaImage>; MASK_SLOT_COUNT] = Default::default();
    for (slot, mask) in masks {
        slots[slot.index()] = Some(mask);
    }
    slots.map(|mask| mask.unwrap_or_else(placeholder_mask))
}
