use criterion::{black_box, criterion_group, criterion_main, Criterion};
use svgpng::rendering::NativeRenderer;
use svgpng::{ConversionRequest, Renderer};

const DIAGRAM: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 400 200">
  <style>.edge { stroke: #e5e5e5; opacity: 0.6; }</style>
  <rect x="10" y="10" width="120" height="60" style="fill: rgba(204, 204, 204, 0.5);"/>
  <rect x="270" y="130" width="120" height="60" fill="#f0f0f0"/>
  <path class="edge" d="M130 40 C200 40 200 160 270 160" stroke-width="1px" fill="none"/>
  <text x="20" y="45" fill="#cccccc">start</text>
  <text x="280" y="165" fill="#cccccc">end</text>
</svg>"##;

fn bench_preprocess(c: &mut Criterion) {
    c.bench_function("preprocess_diagram", |b| {
        b.iter(|| svgpng::preprocess::preprocess(black_box(DIAGRAM)).unwrap())
    });
}

fn bench_native_render(c: &mut Criterion) {
    let request = ConversionRequest {
        scale: 2.0,
        background: "white".into(),
        ..ConversionRequest::new("bench.svg")
    };
    c.bench_function("native_render_800x400", |b| {
        b.iter(|| NativeRenderer.render(black_box(DIAGRAM), &request).unwrap())
    });

    let fast = ConversionRequest {
        compression: 1,
        ..request.clone()
    };
    c.bench_function("native_render_800x400_fast_png", |b| {
        b.iter(|| NativeRenderer.render(black_box(DIAGRAM), &fast).unwrap())
    });
}

criterion_group!(benches, bench_preprocess, bench_native_render);
criterion_main!(benches);
