use posematch::kernel::scalar::ZnccMaskedScalar;
use posematch::kernel::{Kernel, ScanParams, ScanRoi};
use posematch::template::MaskedTemplatePlan;
use posematch::{nms_2d, ImageView, OwnedImage, Peak};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn brute_force_best(image: ImageView<'_, u8>, tpl: &MaskedTemplatePlan) -> (usize, usize, f64) {
    let tpl_w = tpl.width();
    let tpl_h = tpl.height();
    let t_prime = tpl.t_prime();
    let mask = tpl.mask();

    let mut best = (0usize, 0usize, f64::NEG_INFINITY);
    for y in 0..=image.height() - tpl_h {
        for x in 0..=image.width() - tpl_w {
            let mut dot = 0.0f64;
            let mut sum_i = 0.0f64;
            let mut sum_i2 = 0.0f64;
            for ty in 0..tpl_h {
                let row = image.row(y + ty).expect("row in bounds");
                for tx in 0..tpl_w {
                    let idx = ty * tpl_w + tx;
                    let w = f64::from(mask[idx]);
                    let value = f64::from(row[x + tx]);
                    dot += f64::from(t_prime[idx]) * value;
                    sum_i += w * value;
                    sum_i2 += w * value * value;
                }
            }
            let var_i = sum_i2 - (sum_i * sum_i) / tpl.sum_w();
            if var_i <= 1e-12 {
                continue;
            }
            let score = dot / (tpl.var_t() * var_i).sqrt();
            if score > best.2 {
                best = (x, y, score);
            }
        }
    }
    best
}

fn random_image(rng: &mut StdRng, width: usize, height: usize) -> Vec<u8> {
    (0..width * height).map(|_| rng.random_range(0..=255)).collect()
}

fn extract(image: &[u8], img_width: usize, x0: usize, y0: usize, w: usize, h: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(w * h);
    for y in y0..y0 + h {
        out.extend_from_slice(&image[y * img_width + x0..y * img_width + x0 + w]);
    }
    out
}

const PARAMS: ScanParams = ScanParams {
    topk: 5,
    min_var_i: 1e-3,
    min_score: f32::NEG_INFINITY,
};

#[test]
fn zncc_finds_perfect_match_with_ring_mask() {
    let mut rng = StdRng::seed_from_u64(123);
    let (width, height) = (32, 32);
    let image = random_image(&mut rng, width, height);

    let (tpl_w, tpl_h, x0, y0) = (11, 9, 7, 9);
    let tpl = OwnedImage::new(extract(&image, width, x0, y0, tpl_w, tpl_h), tpl_w, tpl_h).unwrap();
    // Outer ring is background.
    let mask_data = (0..tpl_w * tpl_h)
        .map(|i| {
            let (x, y) = (i % tpl_w, i / tpl_w);
            if x == 0 || y == 0 || x == tpl_w - 1 || y == tpl_h - 1 {
                0
            } else {
                255
            }
        })
        .collect();
    let mask = OwnedImage::new(mask_data, tpl_w, tpl_h).unwrap();
    let plan = MaskedTemplatePlan::from_views(tpl.view(), mask.view()).unwrap();

    let view = ImageView::from_slice(&image, width, height).unwrap();
    let peaks = <ZnccMaskedScalar as Kernel>::scan_full(view, &plan, 3, PARAMS).unwrap();
    let best = peaks.first().expect("at least one peak");
    assert_eq!((best.x, best.y, best.template_idx), (x0, y0, 3));
    assert!(best.score > 0.999);

    let (bx, by, bscore) = brute_force_best(view, &plan);
    assert_eq!((bx, by), (x0, y0));
    assert!((bscore - f64::from(best.score)).abs() < 1e-4);
}

#[test]
fn score_at_matches_scan_and_rejects_out_of_range() {
    let mut rng = StdRng::seed_from_u64(7);
    let (width, height) = (24, 20);
    let image = random_image(&mut rng, width, height);
    let tpl = OwnedImage::new(extract(&image, width, 3, 4, 6, 5), 6, 5).unwrap();
    let mask = OwnedImage::new(vec![255; 30], 6, 5).unwrap();
    let plan = MaskedTemplatePlan::from_views(tpl.view(), mask.view()).unwrap();
    let view = ImageView::from_slice(&image, width, height).unwrap();

    let roi = ScanRoi {
        x0: 10,
        y0: 10,
        x1: 12,
        y1: 11,
    };
    let peaks = <ZnccMaskedScalar as Kernel>::scan_roi(view, &plan, 0, roi, PARAMS).unwrap();
    for peak in &peaks {
        assert!((10..=12).contains(&peak.x) && (10..=11).contains(&peak.y));
        let score = <ZnccMaskedScalar as Kernel>::score_at(view, &plan, peak.x, peak.y, 1e-3);
        assert!((score - peak.score).abs() < 1e-6);
    }

    let score = <ZnccMaskedScalar as Kernel>::score_at(view, &plan, width - 5, 0, 1e-3);
    assert_eq!(score, f32::NEG_INFINITY);
    let exact = <ZnccMaskedScalar as Kernel>::score_at(view, &plan, 3, 4, 1e-3);
    assert!(exact > 0.999);
}

#[test]
fn nms_suppresses_only_within_the_same_template() {
    let mut peaks = vec![
        Peak {
            x: 10,
            y: 10,
            score: 0.9,
            template_idx: 0,
        },
        Peak {
            x: 11,
            y: 10,
            score: 0.8,
            template_idx: 0,
        },
        Peak {
            x: 11,
            y: 11,
            score: 0.85,
            template_idx: 1,
        },
        Peak {
            x: 30,
            y: 10,
            score: 0.7,
            template_idx: 0,
        },
    ];
    let kept = nms_2d(&mut peaks, 3);
    let kept: Vec<(usize, usize, usize)> = kept.iter().map(|p| (p.x, p.y, p.template_idx)).collect();
    assert_eq!(kept, vec![(10, 10, 0), (11, 11, 1), (30, 10, 0)]);
}
