use focus_backdrop::placement::{
    AnchorPoint, PlacementError, ScalingMode, Size, compute_placement, custom_scale_factor,
    scaled_size,
};

const DISPLAY: Size = Size::new(1920, 1080);

#[test]
fn double_resolution_image_on_full_hd() {
    let natural = Size::new(3840, 2160);
    for mode in [
        ScalingMode::FitNoCrop,
        ScalingMode::FillCrop,
        ScalingMode::FitWidth,
    ] {
        let placement =
            compute_placement(natural, DISPLAY, mode, 0, AnchorPoint::MiddleCenter).unwrap();
        assert_eq!(placement.size, DISPLAY, "{mode:?}");
        assert_eq!((placement.x, placement.y), (0, 0));
    }
}

#[test]
fn square_image_distorted_to_display() {
    let size = scaled_size(Size::new(1000, 1000), DISPLAY, ScalingMode::FillDistort, 0).unwrap();
    assert_eq!(size, DISPLAY);
}

#[test]
fn custom_value_of_minus_500_roughly_halves() {
    let factor = custom_scale_factor(-500);
    assert!((factor - 0.4995).abs() < 1e-4);

    let size = scaled_size(Size::new(2000, 1000), DISPLAY, ScalingMode::Custom, -500).unwrap();
    assert_eq!(size, Size::new(999, 499));
}

#[test]
fn fit_leaves_bars_at_the_anchor() {
    let natural = Size::new(1000, 1000);
    let left = compute_placement(
        natural,
        DISPLAY,
        ScalingMode::FitNoCrop,
        0,
        AnchorPoint::MiddleLeft,
    )
    .unwrap();
    assert_eq!(left.size, Size::new(1080, 1080));
    assert_eq!((left.x, left.y), (0, 0));

    let right = compute_placement(
        natural,
        DISPLAY,
        ScalingMode::FitNoCrop,
        0,
        AnchorPoint::BottomRight,
    )
    .unwrap();
    assert_eq!((right.x, right.y), (840, 0));
}

#[test]
fn zero_sized_image_blanks_display() {
    for mode in ScalingMode::ALL {
        let result = compute_placement(Size::new(0, 0), DISPLAY, mode, 0, AnchorPoint::TopLeft);
        assert_eq!(result, Err(PlacementError::EmptyImage));
    }
}
