use posematch::{autocrop, ColorImage, PoseMatchError, Rect};

const BACKGROUND: [u8; 3] = [240, 240, 240];
const INK: [u8; 3] = [10, 10, 10];

fn image_with_block(width: usize, height: usize, block: Rect) -> ColorImage {
    let mut img = ColorImage::filled(width, height, &BACKGROUND).unwrap();
    for y in block.y..block.y + block.height {
        for x in block.x..block.x + block.width {
            img.put_pixel(x as usize, y as usize, &INK);
        }
    }
    img
}

#[test]
fn centered_block_is_cropped_with_far_edge_inset() {
    let img = image_with_block(100, 100, Rect::new(40, 40, 20, 20));
    let win = autocrop(&img).unwrap();
    // Far edges are sampled one pixel inside, so the window keeps one extra
    // background row and column past the block.
    assert_eq!(win, Rect::new(40, 40, 21, 21));
}

#[test]
fn autocrop_is_idempotent() {
    let img = image_with_block(64, 48, Rect::new(7, 11, 30, 9));
    let first = autocrop(&img).unwrap();
    let second = autocrop(&img).unwrap();
    assert_eq!(first, second);
    assert_eq!(first, Rect::new(7, 11, 31, 10));
}

#[test]
fn crop_window_stays_inside_image() {
    let blocks = [
        Rect::new(1, 1, 1, 1),
        Rect::new(3, 5, 10, 2),
        Rect::new(20, 2, 9, 25),
        Rect::new(2, 2, 26, 26),
    ];
    for block in blocks {
        let img = image_with_block(31, 30, block);
        let win = autocrop(&img).unwrap();
        assert!(win.width >= 0 && win.height >= 0, "{win:?}");
        assert!(win.width <= 31 && win.height <= 30, "{win:?}");
        assert!(win.fits_within(31, 30), "{win:?}");
        assert_eq!((win.x, win.y), (block.x, block.y));
    }
}

#[test]
fn content_touching_any_sampled_edge_disables_cropping() {
    let full = Rect::new(0, 0, 50, 40);
    let touching = [
        Rect::new(20, 0, 5, 5),  // top row
        Rect::new(45, 10, 4, 4), // column width - 2
        Rect::new(10, 35, 5, 4), // row height - 2
        Rect::new(0, 10, 3, 3),  // left column
    ];
    for block in touching {
        let img = image_with_block(50, 40, block);
        assert_eq!(autocrop(&img).unwrap(), full, "block {block:?}");
    }
}

#[test]
fn artifact_on_last_row_is_ignored() {
    let mut img = ColorImage::filled(20, 20, &BACKGROUND).unwrap();
    for x in 1..18 {
        img.put_pixel(x, 19, &INK);
    }
    for y in 5..10 {
        for x in 6..12 {
            img.put_pixel(x, y, &INK);
        }
    }
    assert_eq!(autocrop(&img).unwrap(), Rect::new(6, 5, 7, 6));
}

#[test]
fn uniform_image_collapses_to_empty_window() {
    let img = ColorImage::filled(16, 12, &[0, 0, 255]).unwrap();
    let win = autocrop(&img).unwrap();
    assert_eq!(win, Rect::new(1, 1, 0, 0));
    assert!(win.is_empty());
}

#[test]
fn tiny_images_are_returned_uncropped() {
    let img = ColorImage::filled(1, 5, &BACKGROUND).unwrap();
    assert_eq!(autocrop(&img).unwrap(), Rect::new(0, 0, 1, 5));
}

#[test]
fn background_is_taken_from_the_origin_pixel() {
    let mut img = image_with_block(30, 30, Rect::new(10, 10, 5, 5));
    img.put_pixel(0, 0, &[1, 2, 3]);
    // The origin no longer matches its neighbours, so no strip is uniform.
    assert_eq!(autocrop(&img).unwrap(), Rect::new(0, 0, 30, 30));
}

#[test]
fn non_rgb_images_are_rejected() {
    let rgba = ColorImage::filled(8, 8, &[1, 2, 3, 255]).unwrap();
    assert_eq!(
        autocrop(&rgba).err().unwrap(),
        PoseMatchError::UnsupportedChannels {
            expected: "3",
            got: 4,
        }
    );

    let gray = ColorImage::filled(8, 8, &[9]).unwrap();
    assert!(autocrop(&gray).is_err());
}
