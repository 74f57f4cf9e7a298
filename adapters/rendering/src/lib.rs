#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Thurs adapters.
//!
//! The simulation only reports geometry. Everything that turns a [`RayHit`]
//! into a shaded strip or an [`EntityDraw`] into a screen quad lives here so
//! every backend applies the same policy.

use anyhow::Result as AnyResult;
use std::{error::Error, fmt};
use thurs_core::{EntityDraw, EntityId, EntityTag, Frame, FrameInput, HitKind, PlayerView, RayHit, Side};

/// Number of texels across one wall texture.
pub const TEXTURE_SIZE: u32 = 64;

/// Distance at which fog fully hides a surface.
pub const FOG_DISTANCE: f32 = 10.0;

/// Screen-space scale applied to sprites at unit distance.
pub const SPRITE_PROJECTION: f32 = 500.0;

/// Smallest and largest sprite size in pixels.
pub const SPRITE_SIZE_RANGE: (f32, f32) = (20.0, 100.0);

const NEAR_BIAS: f32 = 0.1;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Color carried by an entity tag.
    #[must_use]
    pub const fn from_tag(tag: EntityTag) -> Self {
        Self::from_rgb_u8(tag.red(), tag.green(), tag.blue())
    }

    /// Returns the color darkened by `factor`, keeping alpha.
    #[must_use]
    pub fn scale(self, factor: f32) -> Self {
        let factor = factor.clamp(0.0, 1.0);
        Self {
            red: self.red * factor,
            green: self.green * factor,
            blue: self.blue * factor,
            alpha: self.alpha,
        }
    }

    /// Perceived brightness in the range 0.0..=1.0.
    #[must_use]
    pub fn luminance(&self) -> f32 {
        0.299 * self.red + 0.587 * self.green + 0.114 * self.blue
    }
}

/// Base colors used for shading.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    /// Fill for columns whose ray found nothing.
    pub background: Color,
    /// Base wall color before lighting.
    pub wall: Color,
    /// Base door color before lighting.
    pub door: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Color::from_rgb_u8(0x10, 0x10, 0x18),
            wall: Color::from_rgb_u8(0xb4, 0xb4, 0xb4),
            door: Color::from_rgb_u8(0x8b, 0x5a, 0x2b),
        }
    }
}

/// Pixel dimensions of the target surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    width: u32,
    height: u32,
}

impl Viewport {
    /// Creates a viewport, rejecting zero dimensions.
    pub fn new(width: u32, height: u32) -> Result<Self, RenderingError> {
        if width == 0 || height == 0 {
            return Err(RenderingError::EmptyViewport { width, height });
        }
        Ok(Self { width, height })
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Distance from the eye to the projection plane for `fov`.
    #[must_use]
    pub fn projection_plane(&self, fov: f32) -> f32 {
        (self.width as f32 / 2.0) / (fov / 2.0).tan()
    }
}

/// Shaded vertical strip for a surface hit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceStrip {
    /// Top edge in pixels. Negative when the strip overflows the screen.
    pub top: f32,
    /// Strip height in pixels.
    pub height: f32,
    /// Texture column sampled for this strip.
    pub texture_column: u32,
    /// Lit and fogged color.
    pub color: Color,
    /// Distance after fisheye correction.
    pub corrected_distance: f32,
    /// Whether the surface is a wall or a door.
    pub kind: HitKind,
}

/// What to draw for one screen column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ColumnStrip {
    /// The ray found nothing within the cutoff.
    Background,
    /// The ray hit a wall or door.
    Surface(SurfaceStrip),
}

/// Shades the strip for a single ray hit.
#[must_use]
pub fn shade_column(
    viewport: Viewport,
    palette: &Palette,
    view: &PlayerView,
    hit: &RayHit,
) -> ColumnStrip {
    let base = match hit.kind {
        HitKind::Miss => return ColumnStrip::Background,
        HitKind::Wall => palette.wall,
        HitKind::Door => palette.door,
    };

    let corrected_distance = hit.distance * (hit.angle - view.angle).cos();
    let height = viewport.projection_plane(view.fov) / (corrected_distance + NEAR_BIAS);
    let top = (viewport.height() as f32 - height) / 2.0;
    let fog = (1.0 - corrected_distance / FOG_DISTANCE).max(0.0);
    let brightness = match hit.side {
        Side::Vertical => 0.8,
        Side::Horizontal => 0.7,
    };

    ColumnStrip::Surface(SurfaceStrip {
        top,
        height,
        texture_column: texture_column(hit.wall_fraction),
        color: base.scale(brightness * fog),
        corrected_distance,
        kind: hit.kind,
    })
}

/// Texture column for a wall fraction, clamped to the texture.
#[must_use]
pub fn texture_column(wall_fraction: f32) -> u32 {
    let texel = (wall_fraction * TEXTURE_SIZE as f32).floor();
    if texel.is_nan() {
        return 0;
    }
    texel.clamp(0.0, (TEXTURE_SIZE - 1) as f32) as u32
}

/// Screen quad for a visible entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteQuad {
    /// Entity being drawn.
    pub id: EntityId,
    /// Horizontal centre in pixels.
    pub center_x: f32,
    /// Side length in pixels.
    pub size: f32,
    /// Fill color taken from the entity tag.
    pub color: Color,
}

/// Projects a visible entity onto the screen.
///
/// Returns `None` when the quad lies entirely outside the viewport.
#[must_use]
pub fn project_sprite(viewport: Viewport, draw: &EntityDraw) -> Option<SpriteQuad> {
    let projected = SPRITE_PROJECTION / draw.distance;
    let width = viewport.width() as f32;
    let center_x = width / 2.0 + draw.bearing.tan() * projected;
    let size = projected.clamp(SPRITE_SIZE_RANGE.0, SPRITE_SIZE_RANGE.1);

    let half = size / 2.0;
    if center_x + half < 0.0 || center_x - half > width {
        return None;
    }

    Some(SpriteQuad {
        id: draw.id,
        center_x,
        size,
        color: Color::from_tag(draw.tag),
    })
}

/// Renderer-ready description of a frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Composition {
    /// One strip per ray column, left to right.
    pub strips: Vec<ColumnStrip>,
    /// Sprites in painter's order, far to near.
    pub sprites: Vec<SpriteQuad>,
}

/// Applies the shading and projection policy to a whole frame.
#[must_use]
pub fn compose(viewport: Viewport, palette: &Palette, frame: &Frame) -> Composition {
    Composition {
        strips: frame
            .columns
            .iter()
            .map(|hit| shade_column(viewport, palette, &frame.player, hit))
            .collect(),
        sprites: frame
            .sprites
            .iter()
            .filter_map(|draw| project_sprite(viewport, draw))
            .collect(),
    }
}

/// Consumer of simulated frames.
pub trait Renderer {
    /// Presents one frame.
    fn present(&mut self, frame: &Frame) -> AnyResult<()>;
}

/// Producer of per-frame intents.
pub trait InputSource {
    /// Intents for the next frame, or `None` once input is exhausted.
    fn next_input(&mut self) -> Option<FrameInput>;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderingError {
    /// The viewport must cover at least one pixel.
    EmptyViewport {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyViewport { width, height } => {
                write!(f, "viewport must be non-empty (received {width}x{height})")
            }
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use std::f32::consts::FRAC_PI_3;
    use thurs_core::CellCoord;

    fn viewport() -> Viewport {
        Viewport::new(800, 600).expect("valid viewport")
    }

    fn view() -> PlayerView {
        PlayerView {
            position: Vec2::new(1.5, 1.5),
            angle: 0.0,
            fov: FRAC_PI_3,
        }
    }

    fn hit(angle: f32, distance: f32, side: Side, kind: HitKind) -> RayHit {
        RayHit {
            angle,
            distance,
            side,
            wall_fraction: 0.5,
            kind,
            cell: Some(CellCoord::new(5, 1)),
        }
    }

    #[test]
    fn empty_viewport_is_rejected() {
        assert_eq!(
            Viewport::new(0, 10),
            Err(RenderingError::EmptyViewport {
                width: 0,
                height: 10
            })
        );
    }

    #[test]
    fn misses_render_background() {
        let miss = RayHit::miss(0.0, 16.0, Side::Vertical);
        assert_eq!(
            shade_column(viewport(), &Palette::default(), &view(), &miss),
            ColumnStrip::Background
        );
    }

    #[test]
    fn strip_height_follows_projection_plane() {
        let strip = shade_column(
            viewport(),
            &Palette::default(),
            &view(),
            &hit(0.0, 3.5, Side::Vertical, HitKind::Wall),
        );
        let ColumnStrip::Surface(strip) = strip else {
            panic!("expected a surface strip");
        };
        let plane = 400.0 / (FRAC_PI_3 / 2.0).tan();
        assert!((strip.height - plane / 3.6).abs() < 1e-3);
        assert!((strip.top - (600.0 - strip.height) / 2.0).abs() < 1e-3);
        assert_eq!(strip.texture_column, 32);
    }

    #[test]
    fn off_axis_rays_are_fisheye_corrected() {
        let angle: f32 = 0.4;
        let strip = shade_column(
            viewport(),
            &Palette::default(),
            &view(),
            &hit(angle, 2.0, Side::Vertical, HitKind::Wall),
        );
        let ColumnStrip::Surface(strip) = strip else {
            panic!("expected a surface strip");
        };
        assert!((strip.corrected_distance - 2.0 * angle.cos()).abs() < 1e-6);
    }

    #[test]
    fn horizontal_faces_are_darker_and_fog_dims() {
        let palette = Palette::default();
        let shade = |distance, side| match shade_column(
            viewport(),
            &palette,
            &view(),
            &hit(0.0, distance, side, HitKind::Wall),
        ) {
            ColumnStrip::Surface(strip) => strip.color.luminance(),
            ColumnStrip::Background => 0.0,
        };

        assert!(shade(2.0, Side::Horizontal) < shade(2.0, Side::Vertical));
        assert!(shade(6.0, Side::Vertical) < shade(2.0, Side::Vertical));
        assert_eq!(shade(12.0, Side::Vertical), 0.0);
    }

    #[test]
    fn doors_use_their_own_tint() {
        let palette = Palette::default();
        let door = shade_column(
            viewport(),
            &palette,
            &view(),
            &hit(0.0, 1.0, Side::Vertical, HitKind::Door),
        );
        let ColumnStrip::Surface(strip) = door else {
            panic!("expected a surface strip");
        };
        assert_eq!(strip.kind, HitKind::Door);
        let expected = palette.door.scale(0.72);
        assert!((strip.color.red - expected.red).abs() < 1e-5);
        assert!((strip.color.green - expected.green).abs() < 1e-5);
    }

    #[test]
    fn texture_column_is_clamped() {
        assert_eq!(texture_column(0.0), 0);
        assert_eq!(texture_column(0.999), 63);
        assert_eq!(texture_column(1.0), 63);
        assert_eq!(texture_column(-0.2), 0);
        assert_eq!(texture_column(f32::NAN), 0);
    }

    #[test]
    fn sprites_are_centred_sized_and_culled() {
        let draw = |bearing: f32, distance: f32| EntityDraw {
            id: EntityId::new(1),
            bearing,
            distance,
            scale: distance.recip(),
            tag: EntityTag::from_rgb(0, 255, 0),
        };

        let ahead = project_sprite(viewport(), &draw(0.0, 10.0)).expect("visible");
        assert_eq!(ahead.center_x, 400.0);
        assert_eq!(ahead.size, 50.0);
        assert_eq!(ahead.color, Color::from_rgb_u8(0, 255, 0));

        let near = project_sprite(viewport(), &draw(0.0, 1.0)).expect("visible");
        assert_eq!(near.size, 100.0);
        let far = project_sprite(viewport(), &draw(0.0, 50.0)).expect("visible");
        assert_eq!(far.size, 20.0);

        assert_eq!(project_sprite(viewport(), &draw(1.0, 1.0)), None);
    }
}
