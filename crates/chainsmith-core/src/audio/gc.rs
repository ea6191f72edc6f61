//! Deferred deallocation for sample data owned by the audio thread
//!
//! A decoded sample can be tens of megabytes. When playback is interrupted
//! the audio callback drops its handle to the old sample; if that happened to
//! be the last reference, freeing it inside the callback would cause an
//! audible dropout.
//!
//! Sample data therefore crosses into the audio thread as
//! `basedrop::Shared<T>`. Dropping a `Shared` only enqueues the pointer; the
//! collector thread started here frees it later.
//!
//! ```ignore
//! use basedrop::Shared;
//! use chainsmith_core::audio::gc::gc_handle;
//!
//! let source = Shared::new(&gc_handle(), PlaybackSource::new(buffer.shared_samples(), 44100));
//! drop(source); // queued for the collector, not freed here
//! ```

use basedrop::{Collector, Handle};
use std::sync::mpsc;
use std::sync::OnceLock;
use std::thread;
use std::time::Duration;

/// Interval between collection passes
const COLLECT_INTERVAL: Duration = Duration::from_millis(100);

/// Handle to the process-wide collector (the `Collector` itself lives on its thread)
static GC_HANDLE: OnceLock<Handle> = OnceLock::new();

/// Spawn the collector thread and hand back a handle to it
fn init_gc() -> Handle {
    let (tx, rx) = mpsc::channel();

    thread::Builder::new()
        .name("playback-gc".to_string())
        .spawn(move || {
            // Collector is !Sync, so it is created on the thread that runs it
            let mut collector = Collector::new();
            tx.send(collector.handle())
                .expect("Failed to send GC handle");

            log::info!("Playback GC thread started");

            loop {
                collector.collect();
                thread::sleep(COLLECT_INTERVAL);
            }
        })
        .expect("Failed to spawn playback GC thread");

    rx.recv().expect("Failed to receive GC handle")
}

/// Handle for creating `Shared<T>` allocations
///
/// The collector thread is started on first use.
pub fn gc_handle() -> Handle {
    GC_HANDLE.get_or_init(init_gc).clone()
}
