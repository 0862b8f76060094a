use std::{io::Cursor, sync::atomic::AtomicUsize};

use super::*;
use crate::{foundation::core::Rgba8Premul, frames::source::MemoryFrameSource};

fn png(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn five_frames() -> Vec<Vec<u8>> {
    (0..5u8).map(|i| png(2, 2, [i * 40, 0, 0, 255])).collect()
}

fn collect_events() -> (Mutex<Vec<LoadEvent>>, impl Fn(&Mutex<Vec<LoadEvent>>, &LoadEvent)) {
    (Mutex::new(Vec::new()), |sink: &Mutex<Vec<LoadEvent>>, e: &LoadEvent| {
        sink.lock().unwrap().push(e.clone())
    })
}

struct Stripes {
    canvas: Canvas,
}

impl FrameGenerator for Stripes {
    fn canvas(&self) -> Canvas {
        self.canvas
    }

    fn resize(&mut self, canvas: Canvas) -> ScrubResult<()> {
        self.canvas = canvas;
        Ok(())
    }

    fn generate(&self, index: FrameIndex, _frame_count: u64) -> ScrubResult<RasterFrame> {
        Ok(RasterFrame::solid(
            self.canvas,
            Rgba8Premul::from_straight_rgba(index.0 as u8, 0, 0, 255),
        ))
    }
}

#[test]
fn load_reports_strictly_increasing_percentages() {
    let source = MemoryFrameSource::new(five_frames());
    let (sink, push) = collect_events();
    let mut store = FrameStore::raster();
    assert!(!store.is_ready());

    store
        .load(&source, &LoadOptions::default(), &|e| push(&sink, e))
        .unwrap();

    let events = sink.into_inner().unwrap();
    let percents: Vec<u8> = events
        .iter()
        .map(|e| match e {
            LoadEvent::Progress(p) => p.percent,
            LoadEvent::Failed { .. } => panic!("unexpected failure: {e:?}"),
        })
        .collect();
    assert_eq!(percents, vec![20, 40, 60, 80, 100]);

    let ready_flags: Vec<bool> = events
        .iter()
        .map(|e| matches!(e, LoadEvent::Progress(p) if p.ready))
        .collect();
    assert_eq!(ready_flags, vec![false, false, false, false, true]);

    assert!(store.is_ready());
    assert_eq!(store.progress_percent(), 100);
    assert_eq!(store.frame_count(), 5);
    assert_eq!(store.frame_canvas(), Some(Canvas::new(2, 2).unwrap()));
}

#[test]
fn frames_keep_source_order() {
    let source = MemoryFrameSource::new(five_frames());
    let mut store = FrameStore::raster();
    store
        .load(&source, &LoadOptions::default(), &|_| {})
        .unwrap();
    for i in 0..5u64 {
        let frame = store.get(FrameIndex(i)).unwrap();
        assert_eq!(frame.pixel(0, 0).unwrap()[0], i as u8 * 40);
    }
}

#[test]
fn get_shares_frame_buffers() {
    let source = MemoryFrameSource::new(five_frames());
    let mut store = FrameStore::raster();
    store
        .load(&source, &LoadOptions::default(), &|_| {})
        .unwrap();
    let a = store.get(FrameIndex(3)).unwrap();
    let b = store.get(FrameIndex(3)).unwrap();
    assert!(a.shares_buffer(&b));
}

#[test]
fn one_failed_frame_fails_the_sequence() {
    let mut frames = five_frames();
    frames[2] = b"not a png".to_vec();
    let source = MemoryFrameSource::new(frames);
    let (sink, push) = collect_events();
    let mut store = FrameStore::raster();

    let err = store
        .load(&source, &LoadOptions::default(), &|e| push(&sink, e))
        .unwrap_err();
    assert!(matches!(err, ScrubError::Load { index: 2, .. }), "{err}");

    assert!(!store.is_ready());
    assert!(store.load_state().failed.contains(&2));
    assert!(store.progress_percent() < 100);
    assert!(matches!(
        store.get(FrameIndex(0)),
        Err(ScrubError::NotReady(_))
    ));

    let events = sink.into_inner().unwrap();
    assert!(
        events
            .iter()
            .all(|e| !matches!(e, LoadEvent::Progress(p) if p.ready))
    );
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, LoadEvent::Failed { index: 2, .. }))
            .count(),
        1
    );

    let reported: Vec<u64> = events
        .iter()
        .filter_map(|e| match e {
            LoadEvent::Failed { index, .. } => Some(*index),
            LoadEvent::Progress(_) => None,
        })
        .collect();
    let recorded: Vec<u64> = store.load_state().failed.iter().copied().collect();
    assert_eq!(reported, recorded);
}

#[test]
fn mismatched_frame_size_is_a_load_error() {
    let mut frames = five_frames();
    frames[3] = png(3, 3, [0, 0, 0, 255]);
    let source = MemoryFrameSource::new(frames);
    let mut store = FrameStore::raster();
    let opts = LoadOptions {
        threads: Some(1),
        ..LoadOptions::default()
    };

    let err = store.load(&source, &opts, &|_| {}).unwrap_err();
    assert!(matches!(err, ScrubError::Load { index: 3, .. }), "{err}");
    assert!(!store.is_ready());
    assert_eq!(store.frame_canvas(), None);
}

#[test]
fn cancelled_load_never_becomes_ready() {
    let source = MemoryFrameSource::new(five_frames());
    let opts = LoadOptions::default();
    opts.cancel.cancel();
    let seen = AtomicUsize::new(0);
    let mut store = FrameStore::raster();

    let err = store
        .load(&source, &opts, &|_| {
            seen.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap_err();
    assert!(matches!(err, ScrubError::Cancelled));
    assert_eq!(seen.load(Ordering::SeqCst), 0);
    assert!(!store.is_ready());
    assert_eq!(store.load_state().completed, 0);
}

#[test]
fn empty_source_and_zero_threads_are_rejected() {
    let mut store = FrameStore::raster();
    assert!(
        store
            .load(&MemoryFrameSource::default(), &LoadOptions::default(), &|_| {})
            .is_err()
    );

    let opts = LoadOptions {
        threads: Some(0),
        ..LoadOptions::default()
    };
    let err = store
        .load(&MemoryFrameSource::new(five_frames()), &opts, &|_| {})
        .unwrap_err();
    assert!(matches!(err, ScrubError::Validation(_)));
}

#[test]
fn get_before_ready_and_out_of_range() {
    let store = FrameStore::raster();
    assert!(matches!(
        store.get(FrameIndex(0)),
        Err(ScrubError::NotReady(_))
    ));

    let frames = vec![RasterFrame::solid(
        Canvas::new(1, 1).unwrap(),
        Rgba8Premul::transparent(),
    )];
    let store = FrameStore::from_frames(frames).unwrap();
    assert!(store.is_ready());
    assert!(matches!(
        store.get(FrameIndex(1)),
        Err(ScrubError::IndexOutOfRange { index: 1, count: 1 })
    ));
}

#[test]
fn from_frames_checks_dimensions() {
    let a = RasterFrame::solid(Canvas::new(2, 2).unwrap(), Rgba8Premul::transparent());
    let b = RasterFrame::solid(Canvas::new(2, 3).unwrap(), Rgba8Premul::transparent());
    assert!(matches!(
        FrameStore::from_frames(vec![a.clone(), b]),
        Err(ScrubError::Load { index: 1, .. })
    ));
    assert!(FrameStore::from_frames(Vec::new()).is_err());
    assert!(FrameStore::from_frames(vec![a]).is_ok());
}

#[test]
fn procedural_store_is_ready_immediately() {
    let canvas = Canvas::new(4, 3).unwrap();
    let mut store = FrameStore::procedural(Box::new(Stripes { canvas }), 60).unwrap();
    assert!(store.is_ready());
    assert!(store.is_procedural());
    assert_eq!(store.progress_percent(), 100);
    assert_eq!(store.frame_count(), 60);
    assert_eq!(store.frame_canvas(), Some(canvas));

    let f = store.get(FrameIndex(7)).unwrap();
    assert_eq!(f.pixel(0, 0), Some([7, 0, 0, 255]));
    assert!(store.get(FrameIndex(60)).is_err());

    let bigger = Canvas::new(8, 6).unwrap();
    store.resize(bigger).unwrap();
    assert_eq!(store.frame_canvas(), Some(bigger));
    assert_eq!(store.get(FrameIndex(0)).unwrap().canvas(), bigger);

    assert!(
        store
            .load(&MemoryFrameSource::new(five_frames()), &LoadOptions::default(), &|_| {})
            .is_err()
    );
    assert!(FrameStore::procedural(Box::new(Stripes { canvas }), 0).is_err());
}

#[test]
fn progress_percent_rounds() {
    let mut state = LoadState::new(3);
    assert_eq!(state.progress_percent(), 0);
    state.record_completed();
    assert_eq!(state.progress_percent(), 33);
    state.record_completed();
    assert_eq!(state.progress_percent(), 67);
    assert!(!state.ready);
    state.record_completed();
    assert!(state.ready);
    state.record_failed(1);
    assert!(!state.ready);
}
