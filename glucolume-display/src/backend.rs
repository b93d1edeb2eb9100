//! Pixel surface trait
//!
//! The physical panel driver lives outside this crate; it only has to
//! accept individual pixels and latch a finished frame.

use glucolume_core::traits::{DisplayError, DisplayView, ReadingDisplay};
use glucolume_core::Brightness;

use crate::frame::Frame;
use crate::renderer::Renderer;

/// 8-bit RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Linear per-channel brightness scale
    pub const fn scaled(self, brightness: Brightness) -> Self {
        Self {
            r: brightness.scale(self.r),
            g: brightness.scale(self.g),
            b: brightness.scale(self.b),
        }
    }

    pub const fn is_black(&self) -> bool {
        self.r == 0 && self.g == 0 && self.b == 0
    }
}

/// Panel driver interface
pub trait PixelSurface {
    /// Stage one pixel
    fn set_pixel(&mut self, x: u8, y: u8, color: Rgb) -> Result<(), DisplayError>;

    /// Show everything staged since the last present
    fn present(&mut self) -> Result<(), DisplayError>;
}

impl<S: PixelSurface + ?Sized> PixelSurface for &mut S {
    fn set_pixel(&mut self, x: u8, y: u8, color: Rgb) -> Result<(), DisplayError> {
        (**self).set_pixel(x, y, color)
    }

    fn present(&mut self) -> Result<(), DisplayError> {
        (**self).present()
    }
}

/// `ReadingDisplay` backed by a pixel surface
///
/// Every redraw writes all panel pixels, then presents exactly once.
pub struct FrameDisplay<S> {
    surface: S,
    renderer: Renderer,
    frame: Frame,
}

impl<S: PixelSurface> FrameDisplay<S> {
    pub fn new(surface: S, renderer: Renderer) -> Self {
        Self {
            surface,
            renderer,
            frame: Frame::new(),
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Last rendered frame
    pub fn frame(&self) -> &Frame {
        &self.frame
    }
}

impl<S: PixelSurface> ReadingDisplay for FrameDisplay<S> {
    fn show(&mut self, view: &DisplayView) -> Result<(), DisplayError> {
        self.renderer.render(view, &mut self.frame);
        for op in self.frame.ops() {
            self.surface.set_pixel(op.x, op.y, op.color)?;
        }
        self.surface.present()
    }
}
