use std::fs;
use std::path::PathBuf;

use sha2::{Digest, Sha256};
use svgpng::rendering::NativeRenderer;
use svgpng::{ConversionRequest, Renderer};

fn golden_path(name: &str) -> PathBuf {
    let mut p = PathBuf::from("tests/goldens/expected");
    p.push(name);
    p
}

fn decode(png_data: &[u8]) -> (u32, u32, Vec<u8>) {
    let decoder = png::Decoder::new(png_data);
    let mut reader = decoder.read_info().expect("decode");
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf).expect("frame");
    buf.truncate(info.buffer_size());
    (info.width, info.height, buf)
}

fn pixel(buf: &[u8], x: usize, y: usize) -> [u8; 4] {
    let i = (y * 256 + x) * 4;
    [buf[i], buf[i + 1], buf[i + 2], buf[i + 3]]
}

fn pixel_digest(png_data: &[u8]) -> (u32, u32, String) {
    let (width, height, buf) = decode(png_data);
    (width, height, hex::encode(Sha256::digest(&buf)))
}

#[test]
fn golden_native_render_matches_fixture() {
    // edges land on whole pixels at 4x, so anti-aliasing leaves no partial coverage
    let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 64 32">
  <rect x="4" y="4" width="24" height="24" fill="#ff8800"/>
  <rect x="36" y="8" width="20" height="16" fill="#003366"/>
</svg>"##;
    let request = ConversionRequest {
        width: 256,
        background: "#fafafa".into(),
        ..ConversionRequest::new("golden.svg")
    };

    let image = NativeRenderer.render(svg, &request).expect("render");
    let (width, height, digest) = pixel_digest(&image.png_data);
    assert_eq!((width, height), (256, 128));

    // spot-check what the digest stands for
    let (_, _, pixels) = decode(&image.png_data);
    assert_eq!(pixel(&pixels, 0, 0), [0xfa, 0xfa, 0xfa, 255]);
    assert_eq!(pixel(&pixels, 16, 16), [0xff, 0x88, 0x00, 255]);
    assert_eq!(pixel(&pixels, 111, 111), [0xff, 0x88, 0x00, 255]);
    assert_eq!(pixel(&pixels, 112, 111), [0xfa, 0xfa, 0xfa, 255]);
    assert_eq!(pixel(&pixels, 144, 32), [0x00, 0x33, 0x66, 255]);

    // Pixels are content-addressed: the PNG container may change with the encoder
    let expected_path = golden_path("native_shapes.sha256");
    if std::env::var("UPDATE_GOLDENS").is_ok() {
        fs::create_dir_all("tests/goldens/expected").ok();
        fs::write(&expected_path, &digest).expect("write golden");
        println!("Updated golden: {:?}", expected_path);
        return;
    }

    let expected = fs::read_to_string(&expected_path).expect("unable to read golden");
    assert_eq!(digest, expected.trim());
}

#[test]
fn rendering_is_deterministic() {
    let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 10 10"><circle cx="5" cy="5" r="4"/></svg>"#;
    let request = ConversionRequest::new("det.svg");
    let a = NativeRenderer.render(svg, &request).unwrap();
    let b = NativeRenderer.render(svg, &request).unwrap();
    assert_eq!(pixel_digest(&a.png_data), pixel_digest(&b.png_data));
}
