//! Headless demo: animates an in-memory map view and logs each step.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use viewanim::camera::{CameraState, LatLng, MemoryView, ViewAnimator, ViewTarget};
use viewanim::options::Options;
use viewanim::AnimatorError;

fn run(options: Options) -> Result<(), AnimatorError> {
    let view = Arc::new(MemoryView::new(CameraState::new(
        LatLng::new(50.0, 4.0),
        10.0,
        0.0,
    )));
    let mut animator = ViewAnimator::builder()
        .view(Arc::clone(&view))
        .options(options.animation)
        .build()?;

    animator.start(
        LatLng::new(50.1, 4.1),
        12.0,
        90.0,
        Duration::from_millis(500),
    )?;
    while animator.is_animating() {
        std::thread::sleep(animator.options().tick_interval());
    }
    if let Some(e) = animator.take_error() {
        return Err(e);
    }

    for (i, state) in view.history().iter().enumerate() {
        log::info!("step {}: {state:?}", i + 1);
    }
    log::info!("final camera: {:?}", view.camera_state());
    Ok(())
}

fn main() {
    env_logger::init();

    let options = match std::env::args().nth(1) {
        Some(path) => match Options::load(Path::new(&path)) {
            Ok(options) => options,
            Err(e) => {
                log::error!("Failed to load options '{path}': {e}");
                std::process::exit(1);
            }
        },
        None => Options::default(),
    };

    if let Err(e) = run(options) {
        log::error!("{e}");
        std::process::exit(1);
    }
}
