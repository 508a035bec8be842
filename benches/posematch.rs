use posematch::{
    autocrop, prepare_template, ColorImage, Detector, DetectorConfig, IngestConfig, MatchingEngine,
};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

const KEY: [u8; 3] = [0, 0, 255];

fn textured(x: usize, y: usize) -> [u8; 3] {
    let v = ((x * 13) ^ (y * 7) ^ (x * y)) & 0xFF;
    [v as u8, (v / 2) as u8, (40 + v / 4) as u8]
}

fn make_render(width: usize, height: usize) -> ColorImage {
    let mut img = ColorImage::filled(width, height, &KEY).unwrap();
    for y in height / 4..3 * height / 4 {
        for x in width / 4..3 * width / 4 {
            img.put_pixel(x, y, &textured(x, y));
        }
    }
    img
}

fn make_scene(width: usize, height: usize, render: &ColorImage, x0: usize, y0: usize) -> ColorImage {
    let mut scene = ColorImage::filled(width, height, &[0, 0, 0]).unwrap();
    for y in 0..height {
        for x in 0..width {
            let v = ((x * 5) ^ (y * 3)) as u8;
            scene.put_pixel(x, y, &[v, v, v]);
        }
    }
    for y in 0..render.height() {
        for x in 0..render.width() {
            let px = render.pixel(x, y).unwrap();
            if px[..3] != KEY {
                scene.put_pixel(x0 + x, y0 + y, px);
            }
        }
    }
    scene
}

fn bench_autocrop(c: &mut Criterion) {
    let render = make_render(640, 480);
    c.bench_function("autocrop_640x480", |b| {
        b.iter(|| black_box(autocrop(&render).unwrap()));
    });
    c.bench_function("prepare_template_640x480", |b| {
        b.iter(|| black_box(prepare_template(&render, &IngestConfig::default()).unwrap()));
    });
}

fn bench_detector(c: &mut Criterion) {
    let render = make_render(192, 160);
    let prepared = prepare_template(&render, &IngestConfig::default()).unwrap();
    let scene = make_scene(512, 512, &render, 120, 100);

    let mut detector = Detector::new(DetectorConfig::default());
    for idx in 0..4 {
        detector
            .add_template(
                std::slice::from_ref(&prepared.cropped),
                &format!("{idx:04}"),
                &prepared.mask,
            )
            .unwrap();
    }
    let sources = [scene];

    c.bench_function("detector_4_templates_512", |b| {
        b.iter(|| black_box(detector.match_sources(&sources, 50.0).unwrap()));
    });

    #[cfg(feature = "rayon")]
    {
        let mut parallel = Detector::new(DetectorConfig {
            parallel: true,
            ..DetectorConfig::default()
        });
        for idx in 0..4 {
            parallel
                .add_template(
                    std::slice::from_ref(&prepared.cropped),
                    &format!("{idx:04}"),
                    &prepared.mask,
                )
                .unwrap();
        }
        c.bench_function("detector_4_templates_512_parallel", |b| {
            b.iter(|| black_box(parallel.match_sources(&sources, 50.0).unwrap()));
        });
    }
}

criterion_group!(benches, bench_autocrop, bench_detector);
criterion_main!(benches);
