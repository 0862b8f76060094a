use super::*;
use crate::foundation::core::Rgba8Premul;

fn close(a: [u8; 4], b: [u8; 4]) -> bool {
    a.iter().zip(b).all(|(x, y)| x.abs_diff(y) <= 2)
}

#[test]
fn new_surface_is_cleared() {
    let s = PixmapSurface::new(Canvas::new(3, 2).unwrap(), [10, 20, 30, 255]).unwrap();
    let snap = s.snapshot().unwrap();
    assert_eq!(snap.canvas(), Canvas::new(3, 2).unwrap());
    assert_eq!(snap.pixel(0, 0), Some([10, 20, 30, 255]));
    assert_eq!(snap.pixel(2, 1), Some([10, 20, 30, 255]));
}

#[test]
fn draw_frame_paints_over_background() {
    let canvas = Canvas::new(4, 4).unwrap();
    let mut s = PixmapSurface::new(canvas, [0, 0, 0, 255]).unwrap();
    let frame = RasterFrame::solid(canvas, Rgba8Premul::from_straight_rgba(200, 40, 10, 255));
    s.draw_frame(&frame).unwrap();

    let snap = s.snapshot().unwrap();
    for (x, y) in [(0, 0), (1, 2), (3, 3)] {
        let px = snap.pixel(x, y).unwrap();
        assert!(close(px, [200, 40, 10, 255]), "({x},{y}) = {px:?}");
    }
}

#[test]
fn draw_frame_stretches_to_surface() {
    let mut s = PixmapSurface::new(Canvas::new(8, 8).unwrap(), [0, 0, 0, 255]).unwrap();
    let frame = RasterFrame::solid(
        Canvas::new(2, 2).unwrap(),
        Rgba8Premul::from_straight_rgba(0, 255, 0, 255),
    );
    s.draw_frame(&frame).unwrap();

    let snap = s.snapshot().unwrap();
    for (x, y) in [(1, 1), (4, 4), (6, 6)] {
        let px = snap.pixel(x, y).unwrap();
        assert!(close(px, [0, 255, 0, 255]), "({x},{y}) = {px:?}");
    }
}

#[test]
fn resize_reallocates_and_rejects_empty() {
    let mut s = PixmapSurface::new(Canvas::new(4, 4).unwrap(), [1, 2, 3, 255]).unwrap();
    s.resize(Canvas::new(6, 2).unwrap()).unwrap();
    assert_eq!(s.canvas(), Canvas::new(6, 2).unwrap());
    s.clear();
    let snap = s.snapshot().unwrap();
    assert_eq!(snap.rgba8_premul.len(), 6 * 2 * 4);
    assert_eq!(snap.pixel(5, 1), Some([1, 2, 3, 255]));

    assert!(
        s.resize(Canvas {
            width: 0,
            height: 3
        })
        .is_err()
    );
}

#[test]
fn clear_colour_premultiplies_like_decoded_frames() {
    let s = PixmapSurface::new(Canvas::new(2, 2).unwrap(), [9, 3, 1, 128]).unwrap();
    let snap = s.snapshot().unwrap();
    let expected = Rgba8Premul::from_straight_rgba(9, 3, 1, 128).to_array();
    assert_eq!(snap.pixel(1, 1), Some(expected));
    assert_eq!(expected, [5, 2, 1, 128]);
}

#[test]
fn render_context_is_reused_until_the_size_changes() {
    let mut s = PixmapSurface::new(Canvas::new(4, 4).unwrap(), [0, 0, 0, 255]).unwrap();
    assert_eq!(s.cached_ctx_size(), None);

    let red = RasterFrame::solid(
        Canvas::new(2, 2).unwrap(),
        Rgba8Premul::from_straight_rgba(255, 0, 0, 255),
    );
    let blue = RasterFrame::solid(
        Canvas::new(2, 2).unwrap(),
        Rgba8Premul::from_straight_rgba(0, 0, 255, 255),
    );
    s.draw_frame(&red).unwrap();
    assert_eq!(s.cached_ctx_size(), Some((4, 4)));

    // A reused context starts from an empty scene each paint.
    s.draw_frame(&blue).unwrap();
    let px = s.snapshot().unwrap().pixel(2, 2).unwrap();
    assert!(close(px, [0, 0, 255, 255]), "{px:?}");

    s.resize(Canvas::new(6, 3).unwrap()).unwrap();
    s.draw_frame(&red).unwrap();
    assert_eq!(s.cached_ctx_size(), Some((6, 3)));
    let px = s.snapshot().unwrap().pixel(5, 2).unwrap();
    assert!(close(px, [255, 0, 0, 255]), "{px:?}");
}
