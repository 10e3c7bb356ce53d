//! Size and offset computation for the backdrop image.
//!
//! Everything here is a pure function of its inputs. Sizes are physical
//! pixels; offsets are relative to the top-left of the display area and go
//! negative when the rendered image overflows it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Endpoint of the custom scale slider range (`-999..=999`).
pub const CUSTOM_SCALE_LIMIT: i32 = 999;
/// Custom scaling never shrinks below this fraction of the natural size.
pub const MIN_CUSTOM_FACTOR: f64 = 0.02;

/// Width and height in pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when either side is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Strategy for mapping an image's natural size onto the display area.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalingMode {
    /// Natural size, never resized.
    #[serde(rename = "original_no_scaling")]
    NoScale,
    /// Natural size times the custom slider factor.
    #[serde(rename = "custom_scaling")]
    Custom,
    /// Stretch both axes independently to the display area.
    #[serde(rename = "fill_distort")]
    FillDistort,
    /// Cover the display area, keeping aspect; excess is cropped.
    #[serde(rename = "fill_crop")]
    FillCrop,
    /// Fit inside the display area, keeping aspect; may leave bars.
    #[default]
    #[serde(rename = "fit_nocrop")]
    FitNoCrop,
    /// Match the display width; height follows the aspect ratio.
    #[serde(rename = "fit_width")]
    FitWidth,
    /// Match the display height; width follows the aspect ratio.
    #[serde(rename = "fit_height")]
    FitHeight,
}

impl ScalingMode {
    pub const ALL: [ScalingMode; 7] = [
        ScalingMode::NoScale,
        ScalingMode::Custom,
        ScalingMode::FillDistort,
        ScalingMode::FillCrop,
        ScalingMode::FitNoCrop,
        ScalingMode::FitWidth,
        ScalingMode::FitHeight,
    ];

    /// Identifier used in the settings file.
    pub fn id(&self) -> &'static str {
        match self {
            ScalingMode::NoScale => "original_no_scaling",
            ScalingMode::Custom => "custom_scaling",
            ScalingMode::FillDistort => "fill_distort",
            ScalingMode::FillCrop => "fill_crop",
            ScalingMode::FitNoCrop => "fit_nocrop",
            ScalingMode::FitWidth => "fit_width",
            ScalingMode::FitHeight => "fit_height",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|mode| mode.id() == id)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScalingMode::NoScale => "Original (no scaling, keep aspect)",
            ScalingMode::Custom => "Custom Scaling (keep aspect, use slider >)",
            ScalingMode::FillDistort => "Fill screen (allow distortion)",
            ScalingMode::FillCrop => "Fill screen (keep aspect, crop any excess)",
            ScalingMode::FitNoCrop => "Fit within screen (keep aspect, no cropping)",
            ScalingMode::FitWidth => "Fit width to screen (crop any excess height)",
            ScalingMode::FitHeight => "Fit height to screen (crop any excess width)",
        }
    }
}

/// Alignment along one axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Align {
    Start,
    Center,
    End,
}

/// One of the nine positions of the 3x3 anchor grid.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnchorPoint {
    TopLeft,
    TopCenter,
    TopRight,
    MiddleLeft,
    #[default]
    MiddleCenter,
    MiddleRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl AnchorPoint {
    /// Row-major order, matching the preferences grid.
    pub const ALL: [AnchorPoint; 9] = [
        AnchorPoint::TopLeft,
        AnchorPoint::TopCenter,
        AnchorPoint::TopRight,
        AnchorPoint::MiddleLeft,
        AnchorPoint::MiddleCenter,
        AnchorPoint::MiddleRight,
        AnchorPoint::BottomLeft,
        AnchorPoint::BottomCenter,
        AnchorPoint::BottomRight,
    ];

    /// Identifier used in the settings file.
    pub fn id(&self) -> &'static str {
        match self {
            AnchorPoint::TopLeft => "top-left",
            AnchorPoint::TopCenter => "top-center",
            AnchorPoint::TopRight => "top-right",
            AnchorPoint::MiddleLeft => "middle-left",
            AnchorPoint::MiddleCenter => "middle-center",
            AnchorPoint::MiddleRight => "middle-right",
            AnchorPoint::BottomLeft => "bottom-left",
            AnchorPoint::BottomCenter => "bottom-center",
            AnchorPoint::BottomRight => "bottom-right",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|anchor| anchor.id() == id)
    }

    /// Short label shown on the grid radio buttons.
    pub fn grid_label(&self) -> &'static str {
        match self {
            AnchorPoint::TopLeft => "T-L",
            AnchorPoint::TopCenter => "T-C",
            AnchorPoint::TopRight => "T-R",
            AnchorPoint::MiddleLeft => "M-L",
            AnchorPoint::MiddleCenter => "M-C",
            AnchorPoint::MiddleRight => "M-R",
            AnchorPoint::BottomLeft => "B-L",
            AnchorPoint::BottomCenter => "B-C",
            AnchorPoint::BottomRight => "B-R",
        }
    }

    pub fn horizontal(&self) -> Align {
        match self {
            AnchorPoint::TopLeft | AnchorPoint::MiddleLeft | AnchorPoint::BottomLeft => {
                Align::Start
            }
            AnchorPoint::TopCenter | AnchorPoint::MiddleCenter | AnchorPoint::BottomCenter => {
                Align::Center
            }
            AnchorPoint::TopRight | AnchorPoint::MiddleRight | AnchorPoint::BottomRight => {
                Align::End
            }
        }
    }

    pub fn vertical(&self) -> Align {
        match self {
            AnchorPoint::TopLeft | AnchorPoint::TopCenter | AnchorPoint::TopRight => Align::Start,
            AnchorPoint::MiddleLeft | AnchorPoint::MiddleCenter | AnchorPoint::MiddleRight => {
                Align::Center
            }
            AnchorPoint::BottomLeft | AnchorPoint::BottomCenter | AnchorPoint::BottomRight => {
                Align::End
            }
        }
    }
}

/// Reasons no image can be placed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("image has no pixels")]
    EmptyImage,
    #[error("display area has no pixels")]
    EmptyDisplayArea,
}

/// Rendered size and top-left offset of the image within the display area.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Placement {
    pub size: Size,
    pub x: i32,
    pub y: i32,
}

/// Map a custom slider value to a scale factor.
///
/// Negative values shrink linearly towards zero, positive values grow
/// linearly up to 3x. Out-of-range values are clamped to the slider range
/// and the result never drops below [`MIN_CUSTOM_FACTOR`].
pub fn custom_scale_factor(value: i32) -> f64 {
    let value = value.clamp(-CUSTOM_SCALE_LIMIT, CUSTOM_SCALE_LIMIT);
    let limit = f64::from(CUSTOM_SCALE_LIMIT);
    let factor = if value < 0 {
        1.0 + f64::from(value) / limit
    } else {
        1.0 + 2.0 * f64::from(value) / limit
    };
    factor.max(MIN_CUSTOM_FACTOR)
}

/// Compute the rendered image size for a scaling mode.
pub fn scaled_size(
    natural: Size,
    area: Size,
    mode: ScalingMode,
    custom_value: i32,
) -> Result<Size, PlacementError> {
    if natural.is_empty() {
        return Err(PlacementError::EmptyImage);
    }
    if area.is_empty() {
        return Err(PlacementError::EmptyDisplayArea);
    }

    let size = match mode {
        ScalingMode::NoScale => natural,
        ScalingMode::Custom => {
            let factor = custom_scale_factor(custom_value);
            Size::new(
                scale_side(natural.width, factor),
                scale_side(natural.height, factor),
            )
        }
        ScalingMode::FillDistort => area,
        ScalingMode::FillCrop => keep_aspect(natural, area, true),
        ScalingMode::FitNoCrop => keep_aspect(natural, area, false),
        ScalingMode::FitWidth => Size::new(
            area.width,
            proportional(natural.height, area.width, natural.width),
        ),
        ScalingMode::FitHeight => Size::new(
            proportional(natural.width, area.height, natural.height),
            area.height,
        ),
    };
    Ok(size)
}

/// Top-left offset of `size` aligned inside `area`.
pub fn anchor_offset(size: Size, area: Size, anchor: AnchorPoint) -> (i32, i32) {
    (
        align_axis(size.width, area.width, anchor.horizontal()),
        align_axis(size.height, area.height, anchor.vertical()),
    )
}

/// Scale and align in one step.
pub fn compute_placement(
    natural: Size,
    area: Size,
    mode: ScalingMode,
    custom_value: i32,
    anchor: AnchorPoint,
) -> Result<Placement, PlacementError> {
    let size = scaled_size(natural, area, mode, custom_value)?;
    let (x, y) = anchor_offset(size, area, anchor);
    Ok(Placement { size, x, y })
}

/// Aspect-preserving scale into `area`. `cover` picks the smallest size
/// covering the area, otherwise the largest size contained in it.
fn keep_aspect(natural: Size, area: Size, cover: bool) -> Size {
    let (nw, nh) = (u64::from(natural.width), u64::from(natural.height));
    let (aw, ah) = (u64::from(area.width), u64::from(area.height));

    // Width the image would have at the area's height.
    let width_at_height = ah * nw / nh;
    let use_height = if cover {
        width_at_height >= aw
    } else {
        width_at_height <= aw
    };

    if use_height {
        Size::new(saturate(width_at_height).max(1), area.height)
    } else {
        Size::new(area.width, saturate(aw * nh / nw).max(1))
    }
}

/// `side * num / den`, rounded to the nearest pixel, at least 1.
fn proportional(side: u32, num: u32, den: u32) -> u32 {
    let den = u64::from(den);
    let scaled = (u64::from(side) * u64::from(num) + den / 2) / den;
    saturate(scaled).max(1)
}

fn scale_side(side: u32, factor: f64) -> u32 {
    // Float to int casts saturate.
    ((f64::from(side) * factor).round() as u32).max(1)
}

fn saturate(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

fn align_axis(extent: u32, area: u32, align: Align) -> i32 {
    let free = i64::from(area) - i64::from(extent);
    let offset = match align {
        Align::Start => 0,
        // Integer division truncates toward zero for overflowing images too.
        Align::Center => free / 2,
        Align::End => free,
    };
    offset.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    const HD: Size = Size::new(1920, 1080);

    fn size(mode: ScalingMode, natural: Size, area: Size) -> Size {
        scaled_size(natural, area, mode, 0).unwrap()
    }

    #[test]
    fn same_aspect_ratio_fits_exactly() {
        let natural = Size::new(3840, 2160);
        assert_eq!(size(ScalingMode::FitNoCrop, natural, HD), HD);
        assert_eq!(size(ScalingMode::FillCrop, natural, HD), HD);
        assert_eq!(size(ScalingMode::FitWidth, natural, HD), HD);
        assert_eq!(size(ScalingMode::FitHeight, natural, HD), HD);
    }

    #[test]
    fn fill_distort_ignores_aspect() {
        let natural = Size::new(1000, 1000);
        assert_eq!(size(ScalingMode::FillDistort, natural, HD), HD);
    }

    #[test]
    fn square_image_fit_and_fill() {
        let natural = Size::new(1000, 1000);
        assert_eq!(size(ScalingMode::FitNoCrop, natural, HD), Size::new(1080, 1080));
        assert_eq!(size(ScalingMode::FillCrop, natural, HD), Size::new(1920, 1920));
        assert_eq!(size(ScalingMode::FitWidth, natural, HD), Size::new(1920, 1920));
        assert_eq!(size(ScalingMode::FitHeight, natural, HD), Size::new(1080, 1080));
    }

    #[test]
    fn no_scale_keeps_natural_size() {
        let natural = Size::new(4000, 300);
        assert_eq!(size(ScalingMode::NoScale, natural, HD), natural);
    }

    #[test]
    fn custom_factor_endpoints() {
        assert_eq!(custom_scale_factor(0), 1.0);
        assert_eq!(custom_scale_factor(999), 3.0);
        assert_eq!(custom_scale_factor(-999), MIN_CUSTOM_FACTOR);
        assert_eq!(custom_scale_factor(-990), MIN_CUSTOM_FACTOR);
        assert!((custom_scale_factor(-500) - (1.0 - 500.0 / 999.0)).abs() < 1e-12);
    }

    #[test]
    fn custom_factor_clamps_corrupt_values() {
        assert_eq!(custom_scale_factor(50_000), 3.0);
        assert_eq!(custom_scale_factor(i32::MIN), MIN_CUSTOM_FACTOR);
    }

    #[test]
    fn custom_mode_scales_natural_size() {
        let natural = Size::new(1000, 500);
        let unchanged = scaled_size(natural, HD, ScalingMode::Custom, 0).unwrap();
        assert_eq!(unchanged, natural);

        let tripled = scaled_size(natural, HD, ScalingMode::Custom, 999).unwrap();
        assert_eq!(tripled, Size::new(3000, 1500));

        let halved = scaled_size(natural, HD, ScalingMode::Custom, -500).unwrap();
        assert!((499..=500).contains(&halved.width));
        assert!((249..=250).contains(&halved.height));

        let smallest = scaled_size(natural, HD, ScalingMode::Custom, -999).unwrap();
        assert_eq!(smallest, Size::new(20, 10));
    }

    #[test]
    fn fit_and_fill_bounds_hold_across_shapes() {
        let sides = [1, 7, 480, 1000, 1080, 1920, 2560, 4001];
        let areas = [HD, Size::new(1080, 1920), Size::new(800, 600), Size::new(3, 1)];
        for &w in &sides {
            for &h in &sides {
                let natural = Size::new(w, h);
                for &area in &areas {
                    let fit = size(ScalingMode::FitNoCrop, natural, area);
                    assert!(fit.width <= area.width && fit.height <= area.height);
                    assert!(fit.width == area.width || fit.height == area.height);

                    let fill = size(ScalingMode::FillCrop, natural, area);
                    assert!(fill.width >= area.width && fill.height >= area.height);
                    assert!(fill.width == area.width || fill.height == area.height);

                    assert_eq!(size(ScalingMode::FillDistort, natural, area), area);
                }
            }
        }
    }

    #[test]
    fn repeated_calls_are_identical() {
        let natural = Size::new(1234, 567);
        for mode in ScalingMode::ALL {
            let first = compute_placement(natural, HD, mode, -321, AnchorPoint::BottomRight);
            let second = compute_placement(natural, HD, mode, -321, AnchorPoint::BottomRight);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn empty_inputs_are_rejected() {
        for mode in ScalingMode::ALL {
            assert_eq!(
                scaled_size(Size::new(0, 0), HD, mode, 0),
                Err(PlacementError::EmptyImage)
            );
            assert_eq!(
                scaled_size(Size::new(10, 0), HD, mode, 0),
                Err(PlacementError::EmptyImage)
            );
            assert_eq!(
                scaled_size(Size::new(10, 10), Size::new(0, 1080), mode, 0),
                Err(PlacementError::EmptyDisplayArea)
            );
        }
    }

    #[test]
    fn anchors_align_smaller_image() {
        let image = Size::new(100, 50);
        let area = Size::new(1000, 500);
        assert_eq!(anchor_offset(image, area, AnchorPoint::TopLeft), (0, 0));
        assert_eq!(anchor_offset(image, area, AnchorPoint::TopCenter), (450, 0));
        assert_eq!(anchor_offset(image, area, AnchorPoint::TopRight), (900, 0));
        assert_eq!(anchor_offset(image, area, AnchorPoint::MiddleLeft), (0, 225));
        assert_eq!(anchor_offset(image, area, AnchorPoint::MiddleCenter), (450, 225));
        assert_eq!(anchor_offset(image, area, AnchorPoint::MiddleRight), (900, 225));
        assert_eq!(anchor_offset(image, area, AnchorPoint::BottomLeft), (0, 450));
        assert_eq!(anchor_offset(image, area, AnchorPoint::BottomCenter), (450, 450));
        assert_eq!(anchor_offset(image, area, AnchorPoint::BottomRight), (900, 450));
    }

    #[test]
    fn anchors_offset_overflowing_image_negatively() {
        let image = Size::new(1920, 1920);
        let placement = compute_placement(
            Size::new(1000, 1000),
            HD,
            ScalingMode::FillCrop,
            0,
            AnchorPoint::MiddleCenter,
        )
        .unwrap();
        assert_eq!(placement.size, image);
        assert_eq!((placement.x, placement.y), (0, -420));
        assert_eq!(anchor_offset(image, HD, AnchorPoint::BottomRight), (0, -840));
    }

    #[test]
    fn identifiers_round_trip() {
        for mode in ScalingMode::ALL {
            assert_eq!(ScalingMode::from_id(mode.id()), Some(mode));
            let json = serde_json::to_string(&mode).unwrap();
            assert_eq!(json, format!("\"{}\"", mode.id()));
        }
        for anchor in AnchorPoint::ALL {
            assert_eq!(AnchorPoint::from_id(anchor.id()), Some(anchor));
            let json = serde_json::to_string(&anchor).unwrap();
            assert_eq!(json, format!("\"{}\"", anchor.id()));
        }
        assert_eq!(ScalingMode::from_id("stretch"), None);
    }
}
