use image::{DynamicImage, Rgba, RgbaImage};
use sticker_palette::{Colors, Error};

fn solid(width: u32, height: u32, rgba: [u8; 4]) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba(rgba)))
}

#[test]
fn sticker_set_reduces_to_its_signature_colors() {
    // red appears in two stickers, blue in one
    let colors = Colors::from_images([
        solid(4, 4, [255, 0, 0, 255]),
        solid(4, 4, [0, 0, 255, 255]),
        solid(4, 4, [255, 0, 0, 255]),
    ]);

    let palette = colors
        .filter_transparency(230)
        .run_kmeans_seeded(2, 8, 50, 1)
        .unwrap()
        .filter_saturation(35)
        .unwrap()
        .filter_value(20)
        .unwrap();

    assert_eq!(palette.rgb_colors(), vec![(255, 0, 0), (0, 0, 255)]);
    assert_eq!(palette.weights(), vec![32, 16]);
}

#[test]
fn value_filter_drops_near_black() {
    let colors = Colors::from_images([
        solid(4, 4, [255, 0, 0, 255]),
        solid(4, 4, [0, 0, 255, 255]),
        solid(4, 4, [255, 0, 0, 255]),
        solid(4, 4, [5, 5, 5, 255]),
    ]);

    let clustered = colors
        .filter_transparency(230)
        .run_kmeans_seeded(3, 8, 50, 1)
        .unwrap();
    assert_eq!(clustered.len(), 3);

    let palette = clustered.filter_value(20).unwrap();

    assert_eq!(palette.rgb_colors(), vec![(255, 0, 0), (0, 0, 255)]);
}

#[test]
fn fully_transparent_set_cannot_be_clustered() {
    let colors = Colors::from_images([solid(4, 4, [0, 0, 0, 0])]).filter_transparency(230);

    assert!(colors.is_empty());

    let result = colors.run_kmeans_seeded(8, 64, 256, 0);

    assert!(matches!(result, Err(Error::InsufficientData { .. })));
}

#[test]
fn transparency_filter_is_monotone_in_threshold() {
    let images = [
        solid(2, 2, [200, 10, 10, 0]),
        solid(2, 2, [10, 200, 10, 100]),
        solid(2, 2, [10, 10, 200, 200]),
        solid(2, 2, [200, 200, 10, 255]),
    ];

    let mut previous = u64::MAX;
    for threshold in 0..=255u8 {
        let colors = Colors::from_images(images.clone()).filter_transparency(threshold);
        assert!(colors.pixel_count() <= previous);
        previous = colors.pixel_count();
    }

    // strictly below the threshold is removed, equal survives
    let colors = Colors::from_images(images.clone()).filter_transparency(100);
    assert_eq!(colors.pixel_count(), 12);
    let colors = Colors::from_images(images).filter_transparency(101);
    assert_eq!(colors.pixel_count(), 8);
}

#[test]
fn kmeans_returns_exactly_k_weighted_candidates() {
    let mut noisy = RgbaImage::new(16, 16);
    for (x, y, pixel) in noisy.enumerate_pixels_mut() {
        *pixel = Rgba([(x * 16) as u8, (y * 16) as u8, ((x + y) * 8) as u8, 255]);
    }

    let colors = Colors::from_images([DynamicImage::ImageRgba8(noisy)]);
    let total = colors.pixel_count();

    let clustered = colors.run_kmeans_seeded(4, 8, 64, 3).unwrap();

    assert_eq!(clustered.len(), 4);
    assert!(clustered.weights().iter().all(|&weight| weight >= 1));
    assert_eq!(clustered.pixel_count(), total);

    // most prevalent first
    let weights = clustered.weights();
    assert!(weights.windows(2).all(|pair| pair[0] >= pair[1]));
}

#[test]
fn perceptual_filters_prune_without_reordering() {
    let colors = Colors::from_images([
        solid(4, 4, [255, 0, 0, 255]),   // saturated
        solid(3, 3, [128, 128, 128, 255]), // grey, saturation 0
        solid(2, 2, [0, 0, 255, 255]),   // saturated
        solid(1, 1, [200, 200, 200, 255]), // grey, saturation 0
    ]);

    let before = colors.rgb_colors();
    let filtered = colors.filter_saturation(35).unwrap();
    let after = filtered.rgb_colors();

    assert!(after.len() <= before.len());

    // survivors keep their relative order from the unfiltered list
    let expected: Vec<_> = before.into_iter().filter(|rgb| after.contains(rgb)).collect();
    assert_eq!(after, expected);
    assert_eq!(after, vec![(255, 0, 0), (0, 0, 255)]);
}

#[test]
fn saturation_filter_is_idempotent() {
    let colors = Colors::from_images([
        solid(4, 4, [255, 0, 0, 255]),
        solid(4, 4, [120, 110, 100, 255]),
        solid(4, 4, [90, 90, 90, 255]),
    ]);

    let once = colors.filter_saturation(35).unwrap();
    let twice = once.clone().filter_saturation(35).unwrap();

    assert_eq!(once, twice);
}

#[test]
fn zero_saturation_threshold_is_a_noop() {
    let colors = Colors::from_images([
        solid(4, 4, [255, 0, 0, 255]),
        solid(4, 4, [0, 0, 0, 255]),
        solid(4, 4, [77, 12, 240, 130]),
    ]);

    let unfiltered = colors.clone();
    let filtered = colors.filter_saturation(0).unwrap();

    assert_eq!(filtered, unfiltered);
}

#[test]
fn out_of_range_parameters_fail_fast() {
    let colors = Colors::from_images([solid(2, 2, [1, 2, 3, 255])]);

    assert!(matches!(
        colors.clone().filter_saturation(101),
        Err(Error::InvalidParameter { .. })
    ));
    assert!(matches!(
        colors.clone().filter_value(200),
        Err(Error::InvalidParameter { .. })
    ));
    assert!(matches!(
        colors.clone().run_kmeans_seeded(0, 1, 1, 0),
        Err(Error::InvalidParameter { .. })
    ));
    assert!(matches!(
        colors.clone().run_kmeans_seeded(1, 0, 1, 0),
        Err(Error::InvalidParameter { .. })
    ));
    assert!(matches!(
        colors.run_kmeans_seeded(1, 1, 0, 0),
        Err(Error::InvalidParameter { .. })
    ));
}

#[test]
fn unreadable_path_reports_image_load_error() {
    let result = Colors::from_paths(["/no/such/sticker.png"]);

    match result {
        Err(Error::ImageLoad { path, .. }) => {
            assert_eq!(path, std::path::PathBuf::from("/no/such/sticker.png"));
        }
        other => panic!("expected ImageLoad error, got {other:?}"),
    }
}
