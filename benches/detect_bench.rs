//! Margin detection benchmarks
//!
//! Measures the ink scan on page-sized bitmaps at common render resolutions.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pdfclip::{Bitmap, DetectOptions, MarginDetector};

/// US-letter page at `dpi` with a text block inside 1-inch margins
fn letter_page(dpi: u32) -> Bitmap {
    let width = 612 * dpi / 72;
    let height = 792 * dpi / 72;
    let mut bitmap = Bitmap::blank(width, height).unwrap();

    // Sparse "text": every third row, every other column
    for row in (dpi..height - dpi).step_by(3) {
        for col in (dpi..width - dpi).step_by(2) {
            bitmap.set(row, col, 255);
        }
    }
    bitmap
}

fn bench_detect(c: &mut Criterion) {
    let mut group = c.benchmark_group("detect");

    for dpi in [72, 150, 300] {
        let page = letter_page(dpi);
        group.bench_with_input(BenchmarkId::from_parameter(format!("{dpi}dpi")), &page, |b, page| {
            b.iter(|| MarginDetector::detect(black_box(page), &DetectOptions::default()))
        });
    }

    group.finish();
}

fn bench_detect_blank(c: &mut Criterion) {
    // Worst case: every scan runs to the end
    let page = Bitmap::blank(612, 792).unwrap();
    let options = DetectOptions::masked();

    c.bench_function("detect_blank_masked", |b| {
        b.iter(|| MarginDetector::detect(black_box(&page), &options))
    });
}

criterion_group!(benches, bench_detect, bench_detect_blank);
criterion_main!(benches);
