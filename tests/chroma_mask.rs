use posematch::chroma::{MASK_BACKGROUND, MASK_FOREGROUND};
use posematch::{foreground_mask, prepare_template, ChromaKey, ColorImage, IngestConfig, Rect};

#[test]
fn key_colored_pixels_become_background() {
    let img = ColorImage::new(vec![0, 0, 250, 10, 10, 10], 2, 1, 3).unwrap();
    let mask = foreground_mask(&img, &ChromaKey::default()).unwrap();
    assert_eq!(mask.data(), &[MASK_BACKGROUND, MASK_FOREGROUND]);
}

#[test]
fn key_range_bounds_are_inclusive() {
    let pixels = vec![
        0, 0, 244, // lower bound
        1, 1, 255, // upper bound
        0, 0, 243, // just below
        2, 0, 250, // first channel too high
    ];
    let img = ColorImage::new(pixels, 4, 1, 3).unwrap();
    let mask = foreground_mask(&img, &ChromaKey::default()).unwrap();
    assert_eq!(mask.data(), &[0, 0, 255, 255]);
}

#[test]
fn alpha_channel_does_not_affect_mask() {
    let img = ColorImage::new(vec![0, 0, 250, 0, 0, 0, 250, 255], 2, 1, 4).unwrap();
    let mask = foreground_mask(&img, &ChromaKey::default()).unwrap();
    assert_eq!(mask.data(), &[0, 0]);
}

#[test]
fn custom_key_selects_other_colors() {
    let red = ChromaKey {
        lower: [244, 0, 0],
        upper: [255, 1, 1],
    };
    let img = ColorImage::new(vec![250, 0, 0, 0, 0, 250], 2, 1, 3).unwrap();
    let mask = foreground_mask(&img, &red).unwrap();
    assert_eq!(mask.data(), &[0, 255]);
}

#[test]
fn grayscale_images_cannot_be_masked() {
    let img = ColorImage::filled(3, 3, &[128]).unwrap();
    assert!(foreground_mask(&img, &ChromaKey::default()).is_err());
}

#[test]
fn prepared_template_keeps_margin_of_key_color() {
    let key = [0u8, 0, 255];
    let mut img = ColorImage::filled(40, 30, &key).unwrap();
    for y in 10..16 {
        for x in 12..20 {
            img.put_pixel(x, y, &[(x * 20) as u8, (y * 10) as u8, 30]);
        }
    }

    let prepared = prepare_template(&img, &IngestConfig::default()).unwrap();
    // autocrop gives (12, 10, 9, 7); a 2 pixel margin is added on every side.
    assert_eq!(prepared.window, Rect::new(10, 8, 13, 11));
    assert_eq!(prepared.cropped.width(), 13);
    assert_eq!(prepared.cropped.height(), 11);
    assert_eq!(prepared.mask.width(), 13);

    let mask = &prepared.mask;
    assert_eq!(mask.get(0, 0), Some(MASK_BACKGROUND));
    assert_eq!(mask.get(2, 2), Some(MASK_FOREGROUND));
    assert_eq!(mask.get(9, 7), Some(MASK_FOREGROUND));
    assert_eq!(mask.get(10, 8), Some(MASK_BACKGROUND));
    let foreground = mask.data().iter().filter(|&&v| v == MASK_FOREGROUND).count();
    assert_eq!(foreground, 8 * 6);
}

#[test]
fn prepared_template_requires_margin_inside_image() {
    let key = [0u8, 0, 255];
    let mut img = ColorImage::filled(20, 20, &key).unwrap();
    img.put_pixel(1, 1, &[200, 200, 200]);
    assert!(prepare_template(&img, &IngestConfig::default()).is_err());
}
