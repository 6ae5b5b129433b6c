use super::*;
use crate::host::player::RecordingPlayerLoader;
use crate::host::surface::RecordingSurface;

fn scrubber(loader: &mut RecordingPlayerLoader) -> ScrubbedPlayer {
    let player = loader
        .load(PlayerRequest {
            container: TargetId::new("lottie"),
            renderer: Renderer::Svg,
            autoplay: false,
            looping: false,
            path: "anim.json".to_owned(),
        })
        .unwrap();
    ScrubbedPlayer::new(player, 180)
}

#[test]
fn quantization_matches_floor_formula() {
    assert_eq!(frame_for_progress(0.5, 180), Some(89));
    assert_eq!(frame_for_progress(1.0, 180), Some(179));
    assert_eq!(frame_for_progress(0.0, 180), Some(0));
    assert_eq!(frame_for_progress(0.0, 0), None);
    assert_eq!(frame_for_progress(1.0, 1), Some(0));
}

#[test]
fn pending_metadata_never_seeks() {
    let mut loader = RecordingPlayerLoader::new();
    let mut s = scrubber(&mut loader);
    let mut surface = RecordingSurface::new();

    s.on_progress(0.0, &mut surface);
    s.on_progress(0.7, &mut surface);

    assert_eq!(s.frame_count(), FrameCount::Pending);
    assert!(loader.log().seeks.is_empty());
    assert_eq!(s.last_frame(), None);
}

#[test]
fn resolved_metadata_drives_seeks_with_redraw() {
    let mut loader = RecordingPlayerLoader::new();
    let mut s = scrubber(&mut loader);
    let mut surface = RecordingSurface::new();

    s.on_progress(0.2, &mut surface);
    loader.resolve(AssetMetadata::Ready {
        total_frames: 180.0,
    });
    s.on_progress(0.5, &mut surface);
    s.on_progress(1.0, &mut surface);
    s.on_progress(0.5, &mut surface);

    assert_eq!(s.frame_count(), FrameCount::Resolved(180));
    assert_eq!(loader.log().seeks, vec![(89, true), (179, true), (89, true)]);
    assert_eq!(s.last_frame(), Some(89));
}

#[test]
fn zero_duration_and_failure_use_fallback() {
    let mut loader = RecordingPlayerLoader::new();
    let mut s = scrubber(&mut loader);
    loader.resolve(AssetMetadata::Ready { total_frames: 0.0 });
    s.poll_metadata();
    assert_eq!(s.frame_count(), FrameCount::Resolved(180));

    let mut loader = RecordingPlayerLoader::new();
    let mut s = scrubber(&mut loader);
    loader.resolve(AssetMetadata::Failed("404".to_owned()));
    s.on_progress(1.0, &mut RecordingSurface::new());
    assert_eq!(loader.log().seeks, vec![(179, true)]);
}

#[test]
fn late_true_count_does_not_rewrite_history() {
    let mut loader = RecordingPlayerLoader::new();
    let mut s = scrubber(&mut loader);
    loader.resolve(AssetMetadata::Ready { total_frames: 60.0 });
    s.on_progress(1.0, &mut RecordingSurface::new());
    loader.resolve(AssetMetadata::Ready {
        total_frames: 120.0,
    });
    s.on_progress(1.0, &mut RecordingSurface::new());
    // Count is resolved once; later metadata changes are ignored.
    assert_eq!(loader.log().seeks, vec![(59, true), (59, true)]);
}
