use engine::graphics::{CpuRenderer, Rect, Renderer2d};
use engine::regression::{
    FrameHashGolden, assert_or_update_golden_json, rgba_sha256_hex, update_goldens_enabled,
};
use engine::regression_golden_path;
use engine::surface::{RgbaBufferSurface, Surface, SurfaceSize};

fn render_test_scene(surface: &mut RgbaBufferSurface) {
    let size = surface.size();
    let mut gfx = CpuRenderer::new(surface.frame_mut(), size);
    gfx.begin_frame(size);
    gfx.clear([10, 10, 14, 255]);
    gfx.fill_rect(Rect::new(8, 8, 16, 16), [0, 229, 255, 255]);
    gfx.rect_outline(Rect::new(4, 4, 24, 24), [255, 215, 0, 255]);
    gfx.draw_text(2, 40, "SCORE 42", [255, 255, 255, 255]);
}

#[test]
fn identical_scenes_hash_identically() {
    let size = SurfaceSize::new(64, 64);
    let mut a = RgbaBufferSurface::new(size);
    let mut b = RgbaBufferSurface::new(size);
    render_test_scene(&mut a);
    render_test_scene(&mut b);

    assert_eq!(rgba_sha256_hex(a.frame()), rgba_sha256_hex(b.frame()));
}

#[test]
fn scene_change_changes_the_hash() {
    let size = SurfaceSize::new(64, 64);
    let mut a = RgbaBufferSurface::new(size);
    let mut b = RgbaBufferSurface::new(size);
    render_test_scene(&mut a);
    render_test_scene(&mut b);
    {
        let mut gfx = CpuRenderer::new(b.frame_mut(), size);
        gfx.fill_rect(Rect::new(0, 0, 1, 1), [1, 2, 3, 255]);
    }

    assert_ne!(rgba_sha256_hex(a.frame()), rgba_sha256_hex(b.frame()));
}

#[test]
fn resize_preserves_presentability() {
    let mut surface = RgbaBufferSurface::new(SurfaceSize::new(16, 16));
    surface
        .resize(SurfaceSize::new(32, 8))
        .expect("in-memory resize is infallible");
    assert_eq!(surface.frame().len(), 32 * 8 * 4);
    surface.present().expect("in-memory present is infallible");
}

#[test]
fn test_scene_matches_golden_hashes() {
    let size = SurfaceSize::new(64, 64);
    let mut surface = RgbaBufferSurface::new(size);
    render_test_scene(&mut surface);

    let golden = FrameHashGolden::new(
        "engine_test_scene",
        size.width,
        size.height,
        vec![rgba_sha256_hex(surface.frame())],
    );
    assert_or_update_golden_json(
        regression_golden_path!("engine_test_scene"),
        &golden,
        update_goldens_enabled(),
    )
    .expect("golden comparison");
}
