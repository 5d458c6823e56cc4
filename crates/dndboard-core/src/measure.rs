#![forbid(unsafe_code)]

//! Bounded layout measurement.
//!
//! Board entities never own their on-screen element. They hold an opaque
//! [`ElementHandle`] and ask a [`LayoutHost`] to measure it. The host answers
//! through a one-shot [`MeasureReply`], possibly on a later frame.
//!
//! # Failure Modes
//!
//! - No handle bound: resolves immediately to [`Measurement::Unknown`].
//! - Host drops the reply (element unmounted): resolves immediately to
//!   [`Measurement::Unknown`].
//! - Host never answers: resolves to [`Measurement::Unknown`] once the wait
//!   elapses (default [`DEFAULT_MEASURE_TIMEOUT`]).
//!
//! The wait uses `tokio::time`, so measurement must be polled inside a Tokio
//! runtime with the time driver enabled. Dropping the future cancels it.

use std::time::Duration;

use tokio::sync::oneshot;

use crate::geometry::Rect;

/// Default bound on how long a measurement may stay pending.
pub const DEFAULT_MEASURE_TIMEOUT: Duration = Duration::from_millis(300);

/// Non-owning reference to an element owned by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementHandle(u64);

impl ElementHandle {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Non-owning reference to a scroll container owned by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScrollHandle(u64);

impl ScrollHandle {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Scroll correction added to a measured frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollOffset {
    pub x: f32,
    pub y: f32,
}

impl ScrollOffset {
    /// Horizontal correction only.
    pub const fn horizontal(x: f32) -> Self {
        Self { x, y: 0.0 }
    }
}

/// Outcome of a bounded measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Measurement {
    Measured(Rect),
    /// Unbound, unmounted, or timed out. The previous layout is kept.
    Unknown,
}

impl Measurement {
    /// The measured rectangle, if any.
    #[must_use]
    pub fn rect(self) -> Option<Rect> {
        match self {
            Self::Measured(rect) => Some(rect),
            Self::Unknown => None,
        }
    }

    #[must_use]
    pub fn is_measured(self) -> bool {
        matches!(self, Self::Measured(_))
    }
}

/// Reply slot handed to a [`LayoutHost`] for one measurement request.
#[derive(Debug)]
pub struct MeasureReply {
    tx: oneshot::Sender<Rect>,
}

impl MeasureReply {
    /// Report the element's absolute frame.
    ///
    /// Late answers (after the requester gave up) are discarded.
    pub fn send(self, frame: Rect) {
        let _ = self.tx.send(frame);
    }
}

/// Measurement and scrolling capability provided by the presentation layer.
pub trait LayoutHost: Send + Sync {
    /// Ask for the absolute frame of `element`.
    ///
    /// Answer through `reply`, now or on a later frame. Dropping `reply`
    /// without answering signals that the element is unmounted.
    fn measure(&self, element: ElementHandle, reply: MeasureReply);

    /// Scroll a container to an absolute offset.
    fn scroll_to_offset(&self, scroll: ScrollHandle, offset: f32) {
        let _ = (scroll, offset);
    }
}

/// A host with no mounted elements. Every measurement is `Unknown`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetachedHost;

impl LayoutHost for DetachedHost {
    fn measure(&self, _element: ElementHandle, _reply: MeasureReply) {}
}

/// Measure `element` through `host`, waiting at most `wait`.
///
/// The offset is added to the reported frame.
pub async fn measure_element(
    host: &dyn LayoutHost,
    element: Option<ElementHandle>,
    offset: ScrollOffset,
    wait: Duration,
) -> Measurement {
    let Some(element) = element else {
        return Measurement::Unknown;
    };

    let (tx, rx) = oneshot::channel();
    host.measure(element, MeasureReply { tx });

    match tokio::time::timeout(wait, rx).await {
        Ok(Ok(frame)) => Measurement::Measured(frame.translate(offset.x, offset.y)),
        Ok(Err(_)) => {
            tracing::trace!(element = element.get(), "measure reply dropped (unmounted)");
            Measurement::Unknown
        }
        Err(_) => {
            tracing::debug!(
                element = element.get(),
                wait_ms = wait.as_millis() as u64,
                "measure timed out"
            );
            Measurement::Unknown
        }
    }
}
