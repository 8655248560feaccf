// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the pagekeep-document scan stages. Runs detection
// and both normalizers against a synthetic phone-sized capture.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{DynamicImage, Rgb, RgbImage};

use pagekeep_core::ScaleFactors;
use pagekeep_document::{
    BoundingBoxNormalizer, EdgeDetector, Frame, HomographyNormalizer, MarginDetector,
    PerspectiveNormalizer, map_to_original,
};

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// A 1200x1600 capture: grey desk with a lighter page in the middle.
fn synthetic_capture() -> Frame {
    let (width, height) = (1200u32, 1600u32);
    let mut img = RgbImage::from_pixel(width, height, Rgb([60u8, 60, 64]));
    for y in 160..1440 {
        for x in 120..1080 {
            img.put_pixel(x, y, Rgb([245u8, 244, 238]));
        }
    }
    Frame::from_image(DynamicImage::ImageRgb8(img))
}

fn bench_detect_and_map(c: &mut Criterion) {
    let original = synthetic_capture();

    c.bench_function("working_copy + detect + map (1200x1600)", |b| {
        b.iter(|| {
            let working = black_box(&original).working_copy(800);
            let quad = MarginDetector::default().detect(&working).unwrap();
            let scale =
                ScaleFactors::between(original.dimensions(), working.dimensions()).unwrap();
            black_box(map_to_original(&quad, scale, original.dimensions()).unwrap());
        });
    });
}

fn bench_normalizers(c: &mut Criterion) {
    let original = synthetic_capture();
    let quad = MarginDetector::default().detect(&original).unwrap();

    c.bench_function("bounding_box_normalize (1200x1600)", |b| {
        b.iter(|| {
            let doc = BoundingBoxNormalizer::default()
                .normalize(black_box(&original), &quad, 10)
                .unwrap();
            black_box(doc.encoded.len());
        });
    });

    c.bench_function("homography_normalize (1200x1600)", |b| {
        b.iter(|| {
            let doc = HomographyNormalizer::default()
                .normalize(black_box(&original), &quad, 10)
                .unwrap();
            black_box(doc.encoded.len());
        });
    });
}

criterion_group!(benches, bench_detect_and_map, bench_normalizers);
criterion_main!(benches);
