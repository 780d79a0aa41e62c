use crate::color::Color;
use crate::config::{Configuration, DotStyle, ErrorCorrectionLevel, LogoPaddingStyle};
use crate::error::RenderError;
use crate::logo::load_logo;

use image::imageops::{self, FilterType};
use image::{Pixel, Rgba, RgbaImage};
use qrcode::QrCode;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, error, warn};

/*---- Render input ----*/

/// Everything the styled renderer needs, mapped one-to-one from a [`Configuration`].
///
/// The only translation is the background: a transparent export asks the renderer for a
/// `transparent` fill so the painted canvas carries no opaque backing.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderProps {
    pub content: String,
    pub size: u32,
    pub bg_color: String,
    pub fg_color: String,
    pub eye_color: String,
    pub dot_style: DotStyle,
    pub eye_radius: u32,
    pub ec_level: ErrorCorrectionLevel,
    pub quiet_zone: u32,
    pub logo_image: Option<String>,
    pub logo_width: u32,
    pub logo_height: u32,
    pub logo_opacity: f32,
    pub logo_padding: u32,
    pub logo_padding_style: LogoPaddingStyle,
    pub remove_code_behind_logo: bool,
    pub cross_origin: bool,
}

impl From<&Configuration> for RenderProps {
    fn from(config: &Configuration) -> Self {
        let bg_color = if config.transparent_background {
            "transparent".to_string()
        } else {
            config.background_color.clone()
        };
        Self {
            content: config.content.clone(),
            size: config.size,
            bg_color,
            fg_color: config.foreground_color.clone(),
            eye_color: config.eye_color.clone(),
            dot_style: config.dot_style,
            eye_radius: config.eye_radius,
            ec_level: config.error_correction_level,
            quiet_zone: config.quiet_zone,
            logo_image: config.has_logo().then(|| config.logo_image.clone()),
            logo_width: config.logo_width,
            logo_height: config.logo_height,
            logo_opacity: config.logo_opacity,
            logo_padding: config.logo_padding,
            logo_padding_style: config.logo_padding_style,
            remove_code_behind_logo: config.remove_code_behind_logo,
            cross_origin: config.cross_origin_mode,
        }
    }
}

/*---- Canvas handle ----*/

/// Something that may hold a rendered canvas.
pub trait CanvasSource {
    /// Returns the canvas, or `None` while nothing has been painted.
    fn locate(&self) -> Option<Arc<RgbaImage>>;
}

/// Shared reference to the canvas painted by a [`RenderSurface`].
///
/// Handles are cheap to clone and may be read from another thread while the surface paints.
#[derive(Debug, Clone, Default)]
pub struct CanvasHandle {
    slot: Arc<RwLock<Option<Arc<RgbaImage>>>>,
}

impl CanvasHandle {
    pub fn is_painted(&self) -> bool {
        self.locate().is_some()
    }

    fn store(&self, canvas: Option<RgbaImage>) {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        *slot = canvas.map(Arc::new);
    }
}

impl CanvasSource for CanvasHandle {
    fn locate(&self) -> Option<Arc<RgbaImage>> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/*---- Render surface ----*/

/// Turns configurations into a painted canvas.
///
/// [`update`](Self::update) only records the new props; the canvas is produced by
/// [`paint`](Self::paint). Until the first paint the handle locates nothing.
#[derive(Debug, Default)]
pub struct RenderSurface {
    pending: Option<RenderProps>,
    handle: CanvasHandle,
}

impl RenderSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self) -> CanvasHandle {
        self.handle.clone()
    }

    /// Queues `config` for the next paint and returns the handle to pass to the exporter.
    pub fn update(&mut self, config: &Configuration) -> CanvasHandle {
        self.pending = Some(RenderProps::from(config));
        self.handle()
    }

    /// Paints the queued props.
    ///
    /// On failure the previous canvas is dropped, so nothing stale can be exported.
    pub fn paint(&mut self) -> Result<(), RenderError> {
        let props = self.pending.take().ok_or(RenderError::NothingPending)?;
        match render_canvas(&props) {
            Ok(canvas) => {
                debug!(width = canvas.width(), height = canvas.height(), "canvas painted");
                self.handle.store(Some(canvas));
                Ok(())
            }
            Err(err) => {
                error!(%err, "render failed");
                self.handle.store(None);
                Err(err)
            }
        }
    }

    /// Updates and paints in one step.
    ///
    /// # Example
    ///
    /// ```
    /// use qrstudio::config::Configuration;
    /// use qrstudio::render::{CanvasSource, RenderSurface};
    ///
    /// let mut surface = RenderSurface::new();
    /// let handle = surface.render(&Configuration::default()).unwrap();
    /// let canvas = handle.locate().unwrap();
    /// assert_eq!(canvas.dimensions(), (276, 276));
    /// ```
    pub fn render(&mut self, config: &Configuration) -> Result<CanvasHandle, RenderError> {
        let handle = self.update(config);
        self.paint()?;
        Ok(handle)
    }
}

/*---- Rasterization ----*/

#[derive(Debug, Clone, Copy, PartialEq)]
struct Rect {
    x: f32,
    y: f32,
    w: f32,
    h: f32,
}

impl Rect {
    fn square(x: f32, y: f32, side: f32) -> Self {
        Self { x, y, w: side, h: side }
    }

    fn right(&self) -> f32 {
        self.x + self.w
    }

    fn bottom(&self) -> f32 {
        self.y + self.h
    }

    fn inset(&self, by: f32) -> Self {
        Self {
            x: self.x + by,
            y: self.y + by,
            w: self.w - 2.0 * by,
            h: self.h - 2.0 * by,
        }
    }

    fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Point test against the rectangle with corners rounded by `radii` (tl, tr, br, bl).
    fn contains_rounded(&self, radii: [f32; 4], x: f32, y: f32) -> bool {
        if !self.contains(x, y) {
            return false;
        }
        let [tl, tr, br, bl] = radii;
        let corners = [
            (self.x + tl, self.y + tl, tl, x < self.x + tl && y < self.y + tl),
            (self.right() - tr, self.y + tr, tr, x > self.right() - tr && y < self.y + tr),
            (
                self.right() - br,
                self.bottom() - br,
                br,
                x > self.right() - br && y > self.bottom() - br,
            ),
            (self.x + bl, self.bottom() - bl, bl, x < self.x + bl && y > self.bottom() - bl),
        ];
        corners.iter().all(|&(cx, cy, r, in_corner)| {
            !(r > 0.0 && in_corner) || (x - cx).powi(2) + (y - cy).powi(2) <= r * r
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Blend {
    Over,
    Replace,
}

/// Fills every pixel of `bounds` whose center satisfies `inside`.
fn fill(
    img: &mut RgbaImage,
    bounds: Rect,
    color: Color,
    blend: Blend,
    inside: impl Fn(f32, f32) -> bool,
) {
    let (width, height) = img.dimensions();
    let x0 = bounds.x.floor().max(0.0) as u32;
    let y0 = bounds.y.floor().max(0.0) as u32;
    let x1 = (bounds.right().ceil().max(0.0) as u32).min(width);
    let y1 = (bounds.bottom().ceil().max(0.0) as u32).min(height);
    let src: Rgba<u8> = color.into();

    for py in y0..y1 {
        for px in x0..x1 {
            if !inside(px as f32 + 0.5, py as f32 + 0.5) {
                continue;
            }
            let pixel = img.get_pixel_mut(px, py);
            match blend {
                Blend::Over => pixel.blend(&src),
                Blend::Replace => *pixel = src,
            }
        }
    }
}

/// Module grid laid over the canvas.
struct Grid {
    modules: Vec<qrcode::Color>,
    count: usize,
    cell: f32,
    origin: f32,
}

impl Grid {
    fn is_dark(&self, col: i64, row: i64) -> bool {
        let n = self.count as i64;
        (0..n).contains(&col)
            && (0..n).contains(&row)
            && self.modules[(row * n + col) as usize] == qrcode::Color::Dark
    }

    fn is_eye(&self, col: usize, row: usize) -> bool {
        let far = self.count - 7;
        (row < 7 && col < 7) || (row < 7 && col >= far) || (row >= far && col < 7)
    }

    fn cell_rect(&self, col: usize, row: usize) -> Rect {
        Rect::square(
            self.origin + col as f32 * self.cell,
            self.origin + row as f32 * self.cell,
            self.cell,
        )
    }

    fn eye_origins(&self) -> [(usize, usize); 3] {
        let far = self.count - 7;
        [(0, 0), (far, 0), (0, far)]
    }
}

/// Area reserved for the logo.
struct LogoArea {
    image: RgbaImage,
    frame: Rect,
    padded: Rect,
}

/// Largest canvas the renderer allocates, in pixels.
pub const MAX_CANVAS_PIXELS: u64 = 1 << 26;

/// Edge length of the canvas for `props`, if it stays within [`MAX_CANVAS_PIXELS`].
fn canvas_dimension(props: &RenderProps) -> Result<u32, RenderError> {
    let too_large = || RenderError::CanvasTooLarge {
        size: props.size,
        quiet_zone: props.quiet_zone,
    };
    let dim = props
        .quiet_zone
        .checked_mul(2)
        .and_then(|margins| margins.checked_add(props.size))
        .ok_or_else(too_large)?;
    if u64::from(dim) * u64::from(dim) > MAX_CANVAS_PIXELS {
        return Err(too_large());
    }
    Ok(dim)
}

/// Renders `props` to a fresh canvas of `size + 2 * quiet_zone` pixels.
///
/// # Arguments
///
/// * `props` - Render input, typically built from a [`Configuration`].
///
/// # Errors
///
/// Returns [`RenderError::Encode`] when the content does not fit any QR version at the
/// requested error correction level, and [`RenderError::CanvasTooLarge`] when size and quiet
/// zone exceed [`MAX_CANVAS_PIXELS`].
pub fn render_canvas(props: &RenderProps) -> Result<RgbaImage, RenderError> {
    let dim = canvas_dimension(props)?;
    let code =
        QrCode::with_error_correction_level(props.content.as_bytes(), props.ec_level.into())?;
    let count = code.width();
    let qz = props.quiet_zone as f32;
    let grid = Grid {
        modules: code.to_colors(),
        count,
        cell: props.size as f32 / count as f32,
        origin: qz,
    };

    let bg = Color::parse_or_black(&props.bg_color);
    let fg = Color::parse_or_black(&props.fg_color);
    let eye = Color::parse_or_black(&props.eye_color);

    let mut img = RgbaImage::new(dim, dim);
    let full = Rect::square(0.0, 0.0, dim as f32);
    fill(&mut img, full, bg, Blend::Replace, |_, _| true);

    let logo = props.logo_image.as_deref().and_then(|src| prepare_logo(props, src));
    let cleared = logo
        .as_ref()
        .filter(|_| props.remove_code_behind_logo)
        .map(|logo| logo.padded);

    draw_modules(&mut img, &grid, props.dot_style, fg, cleared.as_ref());
    draw_eyes(&mut img, &grid, props.eye_radius as f32, eye);

    if let Some(logo) = logo {
        if props.logo_padding > 0 {
            match props.logo_padding_style {
                LogoPaddingStyle::Square => {
                    fill(&mut img, logo.padded, bg, Blend::Replace, |x, y| {
                        logo.padded.contains(x, y)
                    });
                }
                LogoPaddingStyle::Circle => {
                    let r = logo.padded.w / 2.0;
                    let (cx, cy) = (logo.padded.x + r, logo.padded.y + r);
                    fill(&mut img, logo.padded, bg, Blend::Replace, |x, y| {
                        (x - cx).powi(2) + (y - cy).powi(2) <= r * r
                    });
                }
            }
        }
        imageops::overlay(
            &mut img,
            &logo.image,
            logo.frame.x.round() as i64,
            logo.frame.y.round() as i64,
        );
    }

    Ok(img)
}

fn draw_modules(
    img: &mut RgbaImage,
    grid: &Grid,
    style: DotStyle,
    color: Color,
    cleared: Option<&Rect>,
) {
    let half = grid.cell / 2.0;
    for row in 0..grid.count {
        for col in 0..grid.count {
            if grid.is_eye(col, row) || !grid.is_dark(col as i64, row as i64) {
                continue;
            }
            let rect = grid.cell_rect(col, row);
            if cleared.is_some_and(|area| area.intersects(&rect)) {
                continue;
            }
            match style {
                DotStyle::Squares => {
                    fill(img, rect, color, Blend::Over, |x, y| rect.contains(x, y))
                }
                DotStyle::Dots => {
                    let (cx, cy) = (rect.x + half, rect.y + half);
                    fill(img, rect, color, Blend::Over, |x, y| {
                        (x - cx).powi(2) + (y - cy).powi(2) <= half * half
                    });
                }
                DotStyle::Fluid => {
                    let (c, r) = (col as i64, row as i64);
                    let up = grid.is_dark(c, r - 1);
                    let down = grid.is_dark(c, r + 1);
                    let left = grid.is_dark(c - 1, r);
                    let right = grid.is_dark(c + 1, r);
                    let round = |a: bool, b: bool| if a || b { 0.0 } else { half };
                    let radii = [
                        round(up, left),
                        round(up, right),
                        round(down, right),
                        round(down, left),
                    ];
                    fill(img, rect, color, Blend::Over, |x, y| {
                        rect.contains_rounded(radii, x, y)
                    });
                }
            }
        }
    }
}

fn draw_eyes(img: &mut RgbaImage, grid: &Grid, radius: f32, color: Color) {
    for (col, row) in grid.eye_origins() {
        let outer = Rect::square(
            grid.origin + col as f32 * grid.cell,
            grid.origin + row as f32 * grid.cell,
            7.0 * grid.cell,
        );
        let hole = outer.inset(grid.cell);
        let pupil = outer.inset(2.0 * grid.cell);

        let outer_r = radius.min(outer.w / 2.0);
        let hole_r = (outer_r - grid.cell).max(0.0);
        let pupil_r = radius.min(pupil.w / 2.0);

        fill(img, outer, color, Blend::Over, |x, y| {
            outer.contains_rounded([outer_r; 4], x, y) && !hole.contains_rounded([hole_r; 4], x, y)
        });
        fill(img, pupil, color, Blend::Over, |x, y| {
            pupil.contains_rounded([pupil_r; 4], x, y)
        });
    }
}

/// Loads and scales the logo; a logo that cannot be loaded is skipped.
fn prepare_logo(props: &RenderProps, source: &str) -> Option<LogoArea> {
    let decoded = match load_logo(source, props.cross_origin) {
        Ok(img) => img,
        Err(err) => {
            warn!(%err, "logo skipped");
            return None;
        }
    };
    if props.logo_width == 0 || props.logo_height == 0 {
        return None;
    }
    if u64::from(props.logo_width) * u64::from(props.logo_height) > MAX_CANVAS_PIXELS {
        warn!(
            width = props.logo_width,
            height = props.logo_height,
            "logo skipped, too large"
        );
        return None;
    }

    let mut image = imageops::resize(
        &decoded.to_rgba8(),
        props.logo_width,
        props.logo_height,
        FilterType::Triangle,
    );
    let opacity = props.logo_opacity.clamp(0.0, 1.0);
    if opacity < 1.0 {
        for pixel in image.pixels_mut() {
            pixel[3] = (pixel[3] as f32 * opacity).round() as u8;
        }
    }

    let (w, h) = (props.logo_width as f32, props.logo_height as f32);
    let qz = props.quiet_zone as f32;
    let size = props.size as f32;
    let frame = Rect {
        x: qz + (size - w) / 2.0,
        y: qz + (size - h) / 2.0,
        w,
        h,
    };
    let pad = props.logo_padding as f32;
    let padded = match props.logo_padding_style {
        LogoPaddingStyle::Square => frame.inset(-pad),
        LogoPaddingStyle::Circle => {
            let r = w.max(h) / 2.0 + pad;
            Rect::square(frame.x + w / 2.0 - r, frame.y + h / 2.0 - r, 2.0 * r)
        }
    };

    Some(LogoArea {
        image,
        frame,
        padded,
    })
}

/*---- Preview ----*/

const CHECKER_LIGHT: Color = Color::rgb(0xf1, 0xf5, 0xf9);
const CHECKER_DARK: Color = Color::rgb(0xe2, 0xe8, 0xf0);
const CHECKER_TILE: u32 = 10;

/// Places a canvas on the backdrop shown to the user.
///
/// Transparent canvases sit on a checkerboard of 20 px tiles so the transparency is visible;
/// everything else sits on white.
pub fn framed_preview(canvas: &RgbaImage, transparent: bool) -> RgbaImage {
    let mut framed = RgbaImage::from_fn(canvas.width(), canvas.height(), |x, y| {
        if !transparent {
            return Color::WHITE.into();
        }
        if (x / CHECKER_TILE + y / CHECKER_TILE) % 2 == 1 {
            CHECKER_LIGHT.into()
        } else {
            CHECKER_DARK.into()
        }
    });
    imageops::overlay(&mut framed, canvas, 0, 0);
    framed
}

// Tests
#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::logo::{tests::png_bytes, LogoFile};
    use crate::store::{OptionStore, Update};

    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    fn props(config: &Configuration) -> RenderProps {
        RenderProps::from(config)
    }

    #[test]
    fn test_props_pass_through() {
        let config = Configuration {
            dot_style: DotStyle::Dots,
            eye_radius: 7,
            cross_origin_mode: true,
            ..Configuration::default()
        };
        let p = props(&config);
        assert_eq!(p.content, config.content);
        assert_eq!(p.bg_color, "#FFFFFF");
        assert_eq!(p.dot_style, DotStyle::Dots);
        assert_eq!(p.eye_radius, 7);
        assert!(p.cross_origin);
        assert_eq!(p.logo_image, None);
    }

    #[test]
    fn test_transparent_requests_transparent_fill() {
        let config = Configuration {
            transparent_background: true,
            ..Configuration::default()
        };
        assert_eq!(props(&config).bg_color, "transparent");

        let canvas = render_canvas(&props(&config)).unwrap();
        assert_eq!(canvas.get_pixel(0, 0)[3], 0);
    }

    #[test]
    fn test_canvas_dimensions_include_quiet_zone() {
        let config = Configuration {
            size: 200,
            quiet_zone: 20,
            ..Configuration::default()
        };
        let canvas = render_canvas(&props(&config)).unwrap();
        assert_eq!(canvas.dimensions(), (240, 240));
        assert_eq!(*canvas.get_pixel(5, 5), WHITE);
        // Top-left finder eye starts right after the quiet zone.
        assert_eq!(*canvas.get_pixel(21, 21), BLACK);
    }

    #[test]
    fn test_eye_color_and_hole() {
        let config = Configuration {
            eye_color: "#ff0000".into(),
            quiet_zone: 0,
            ..Configuration::default()
        };
        let p = props(&config);
        let canvas = render_canvas(&p).unwrap();
        let n = QrCode::with_error_correction_level(p.content.as_bytes(), p.ec_level.into())
            .unwrap()
            .width();
        let cell = p.size as f32 / n as f32;
        let at = |modx: f32, mody: f32| {
            *canvas.get_pixel((modx * cell) as u32, (mody * cell) as u32)
        };

        assert_eq!(at(0.5, 0.5), Rgba([255, 0, 0, 255]));
        assert_eq!(at(1.5, 1.5), WHITE);
        assert_eq!(at(3.5, 3.5), Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_rounded_eyes_clear_corners() {
        let config = Configuration {
            eye_radius: 20,
            quiet_zone: 0,
            ..Configuration::default()
        };
        let canvas = render_canvas(&props(&config)).unwrap();
        assert_eq!(*canvas.get_pixel(0, 0), WHITE);
    }

    #[test]
    fn test_every_dot_style_renders() {
        for style in [DotStyle::Squares, DotStyle::Dots, DotStyle::Fluid] {
            let config = Configuration {
                dot_style: style,
                ..Configuration::default()
            };
            let canvas = render_canvas(&props(&config)).unwrap();
            assert!(canvas.pixels().any(|p| *p == BLACK), "{style:?} drew nothing");
        }
    }

    #[test]
    fn test_dots_are_smaller_than_squares() {
        let dark = |style| {
            let config = Configuration {
                dot_style: style,
                ..Configuration::default()
            };
            render_canvas(&props(&config))
                .unwrap()
                .pixels()
                .filter(|p| p[0] < 128)
                .count()
        };
        assert!(dark(DotStyle::Dots) < dark(DotStyle::Squares));
        assert!(dark(DotStyle::Fluid) <= dark(DotStyle::Squares));
    }

    #[test]
    fn test_logo_is_drawn_and_clears_modules() {
        let logo = LogoFile::new("logo.png", png_bytes(10, 10, [0, 0, 255, 255])).to_data_url();
        let config = Configuration {
            logo_image: logo,
            logo_width: 40,
            logo_height: 40,
            logo_padding: 6,
            remove_code_behind_logo: true,
            quiet_zone: 0,
            ..Configuration::default()
        };
        let canvas = render_canvas(&props(&config)).unwrap();
        let center = canvas.get_pixel(128, 128);
        assert!(center[2] > 200 && center[0] < 50, "logo missing: {center:?}");
        // Inside the padding ring nothing but background remains.
        for (x, y) in [(128, 108 - 3), (128 - 23, 128), (150, 150)] {
            assert_eq!(*canvas.get_pixel(x, y), WHITE, "pixel {x},{y}");
        }
    }

    #[test]
    fn test_logo_opacity_applies() {
        let logo = LogoFile::new("logo.png", png_bytes(4, 4, [0, 0, 0, 255])).to_data_url();
        let config = Configuration {
            logo_image: logo,
            logo_opacity: 0.0,
            logo_padding: 4,
            quiet_zone: 0,
            ..Configuration::default()
        };
        let canvas = render_canvas(&props(&config)).unwrap();
        assert_eq!(*canvas.get_pixel(128, 128), WHITE);
    }

    #[test]
    fn test_broken_logo_is_skipped() {
        let config = Configuration {
            logo_image: "data:image/png;base64,AAAA".into(),
            ..Configuration::default()
        };
        let plain = render_canvas(&props(&Configuration::default())).unwrap();
        assert_eq!(render_canvas(&props(&config)).unwrap(), plain);
    }

    #[test]
    fn test_surface_paints_on_demand() {
        let mut surface = RenderSurface::new();
        let handle = surface.update(&Configuration::default());
        assert!(!handle.is_painted());
        surface.paint().unwrap();
        assert!(handle.is_painted());
        assert!(matches!(surface.paint(), Err(RenderError::NothingPending)));
    }

    #[test]
    fn test_failed_paint_clears_canvas() {
        let mut surface = RenderSurface::new();
        let handle = surface.render(&Configuration::default()).unwrap();
        let too_long = Configuration {
            content: "x".repeat(4000),
            error_correction_level: ErrorCorrectionLevel::H,
            ..Configuration::default()
        };
        surface.update(&too_long);
        assert!(matches!(surface.paint(), Err(RenderError::Encode(_))));
        assert!(handle.locate().is_none());
    }

    #[test]
    fn test_store_observer_drives_surface() {
        let surface = Rc::new(RefCell::new(RenderSurface::new()));
        let handle = surface.borrow().handle();
        let mut store = OptionStore::new();
        let observer = Rc::clone(&surface);
        store.subscribe(move |config| {
            let mut surface = observer.borrow_mut();
            surface.update(config);
            let _ = surface.paint();
        });

        store.set(Update::Size(128));
        assert_eq!(handle.locate().unwrap().dimensions(), (148, 148));
    }

    #[test]
    fn test_framed_preview() {
        let clear = RgbaImage::new(40, 40);
        let framed = framed_preview(&clear, true);
        assert_eq!(*framed.get_pixel(0, 0), Rgba::from(CHECKER_DARK));
        assert_eq!(*framed.get_pixel(15, 0), Rgba::from(CHECKER_LIGHT));
        assert_eq!(*framed.get_pixel(15, 15), Rgba::from(CHECKER_DARK));

        let framed = framed_preview(&clear, false);
        assert!(framed.pixels().all(|p| *p == WHITE));
    }

    #[test]
    fn test_oversized_canvas_is_an_error() {
        let mut store = OptionStore::new();
        store.set_field("quietZone", 3_000_000_000i64).unwrap();
        let mut surface = RenderSurface::new();
        assert!(matches!(
            surface.render(store.config()),
            Err(RenderError::CanvasTooLarge { quiet_zone: 3_000_000_000, .. })
        ));

        let huge = Configuration {
            size: 100_000,
            ..Configuration::default()
        };
        assert!(matches!(
            render_canvas(&props(&huge)),
            Err(RenderError::CanvasTooLarge { size: 100_000, .. })
        ));
    }

    #[test]
    fn test_oversized_canvas_clears_previous_paint() {
        let mut surface = RenderSurface::new();
        let handle = surface.render(&Configuration::default()).unwrap();
        let huge = Configuration {
            size: u32::MAX,
            ..Configuration::default()
        };
        surface.update(&huge);
        assert!(surface.paint().is_err());
        assert!(handle.locate().is_none());
    }

    #[test]
    fn test_oversized_logo_is_skipped() {
        let logo = LogoFile::new("logo.png", png_bytes(4, 4, [0, 0, 255, 255])).to_data_url();
        let config = Configuration {
            logo_image: logo,
            logo_width: 1_000_000,
            logo_height: 1_000_000,
            ..Configuration::default()
        };
        let plain = render_canvas(&props(&Configuration::default())).unwrap();
        assert_eq!(render_canvas(&props(&config)).unwrap(), plain);
    }
}
