//! Engine-to-engine bridging.
//!
//! A bridge composes normalized signal spaces: the value produced by the
//! source engine is handed to the destination engine's dispatch stage as is,
//! without id resolution or re-normalization. A `0.3` on one side is a `0.3`
//! on the other, whatever the two devices' id/offset/amplitude tables are.
//!
//! Bridge graphs are expected to be acyclic. A cycle is cut after
//! [`MAX_BRIDGE_DEPTH`] nested hops on the dispatching thread: the event is
//! dropped at that point with a warning.

use crate::engine::{Engine, InputMap};
use crate::error::Result;
use crate::event::EventRecord;
use log::warn;
use std::cell::Cell;
use std::sync::Arc;

/// Maximum number of bridges one dispatch may traverse on a thread.
pub const MAX_BRIDGE_DEPTH: u32 = 16;

thread_local! {
    static DEPTH: Cell<u32> = Cell::new(0);
}

struct DepthGuard;

impl DepthGuard {
    fn enter() -> Option<Self> {
        DEPTH.with(|depth| {
            let current = depth.get();
            if current >= MAX_BRIDGE_DEPTH {
                return None;
            }
            depth.set(current + 1);
            Some(DepthGuard)
        })
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

/// Re-emit every dispatch of `src_input` on `src` as `dst_input` on `dst`.
///
/// The binding holds only a weak reference to `dst`: once `dst` is dropped the
/// bridge does nothing. Fails with
/// [`EngineError::InvalidInput`](crate::EngineError::InvalidInput) if either
/// input is not declared by its engine; nothing is registered in that case.
///
/// Connecting an input back to itself, directly or through other bridges,
/// forms a cycle; see the module docs.
pub fn connect<A, B>(
    src: &Engine<A>,
    src_input: A::Input,
    dst: &Arc<Engine<B>>,
    dst_input: B::Input,
) -> Result<()>
where
    A: InputMap,
    B: InputMap,
{
    src.enforce_valid_input(&src_input)?;
    dst.enforce_valid_input(&dst_input)?;

    let target = Arc::downgrade(dst);
    src.bind(src_input, move |record: &EventRecord<A::Input>| {
        let Some(target) = target.upgrade() else {
            return;
        };
        let Some(_guard) = DepthGuard::enter() else {
            warn!("bridge chain deeper than {MAX_BRIDGE_DEPTH}, event dropped");
            return;
        };
        target.emit(&EventRecord::new(dst_input, record.value));
    })
}
