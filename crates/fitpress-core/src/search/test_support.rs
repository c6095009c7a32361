//! Synthetic codec with a known size curve, shared by the search, compress
//! and batch tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};

use tokio::sync::Notify;

use crate::codec::Codec;
use crate::decode::{DecodeError, Dimensions, FilterType, PixelBuffer};
use crate::encode::{EncodeError, OutputFormat};

/// One recorded encode call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Probe {
    pub dimensions: Dimensions,
    pub format: OutputFormat,
    pub quality: f32,
}

/// Encoded size is `100 + floor(area * bytes_per_pixel * q)` for formats
/// that honor quality and `100 + floor(area * bytes_per_pixel)` otherwise.
///
/// A custom curve set with [`SyntheticCodec::with_curve`] replaces that formula.
///
/// Buffers it hands out carry no pixel data; only their dimensions matter.
pub(crate) struct SyntheticCodec {
    pub source: Dimensions,
    pub bytes_per_pixel: f64,
    /// Encode calls with a zero-based index at or beyond this fail.
    pub fail_from: Option<usize>,
    /// Holds every encode call until opened, to keep runs in flight in batch tests.
    pub gate: Option<Arc<EncodeGate>>,
    curve: Option<fn(Dimensions, f32) -> usize>,
    probes: Mutex<Vec<Probe>>,
    resamples: AtomicUsize,
}

impl SyntheticCodec {
    pub fn new(width: u32, height: u32, bytes_per_pixel: f64) -> Self {
        Self {
            source: Dimensions::new(width, height),
            bytes_per_pixel,
            fail_from: None,
            gate: None,
            curve: None,
            probes: Mutex::new(Vec::new()),
            resamples: AtomicUsize::new(0),
        }
    }

    pub fn failing_from(mut self, call: usize) -> Self {
        self.fail_from = Some(call);
        self
    }

    pub fn gated(mut self, gate: &Arc<EncodeGate>) -> Self {
        self.gate = Some(gate.clone());
        self
    }

    /// Encoded size as a function of working dimensions and quality.
    pub fn with_curve(mut self, curve: fn(Dimensions, f32) -> usize) -> Self {
        self.curve = Some(curve);
        self
    }

    /// A source buffer matching `source`.
    pub fn source_buffer(&self) -> PixelBuffer {
        blank(self.source)
    }

    pub fn size_at(&self, dimensions: Dimensions, format: OutputFormat, quality: f32) -> usize {
        if let Some(curve) = self.curve {
            return curve(dimensions, quality);
        }
        let scale = if format.honors_quality() {
            f64::from(quality)
        } else {
            1.0
        };
        100 + (dimensions.area() as f64 * self.bytes_per_pixel * scale).floor() as usize
    }

    pub fn probes(&self) -> Vec<Probe> {
        self.probes.lock().unwrap().clone()
    }

    pub fn encode_calls(&self) -> usize {
        self.probes.lock().unwrap().len()
    }

    pub fn resample_calls(&self) -> usize {
        self.resamples.load(Ordering::SeqCst)
    }
}

/// Blocks encode calls until [`open`](Self::open) is called.
///
/// Each blocked call also wakes one [`entered`](Self::entered) waiter.
#[derive(Default)]
pub(crate) struct EncodeGate {
    open: Mutex<bool>,
    opened: Condvar,
    entered: Notify,
}

impl EncodeGate {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Resolves once an encode call has reached the gate.
    pub async fn entered(&self) {
        self.entered.notified().await;
    }

    pub fn open(&self) {
        *self.open.lock().unwrap() = true;
        self.opened.notify_all();
    }

    fn pass(&self) {
        self.entered.notify_one();
        let mut open = self.open.lock().unwrap();
        while !*open {
            open = self.opened.wait(open).unwrap();
        }
    }
}

fn blank(dimensions: Dimensions) -> PixelBuffer {
    PixelBuffer {
        width: dimensions.width,
        height: dimensions.height,
        pixels: Vec::new(),
    }
}

impl Codec for SyntheticCodec {
    fn decode(&self, bytes: &[u8]) -> Result<PixelBuffer, DecodeError> {
        if bytes.is_empty() || bytes == b"corrupt" {
            return Err(DecodeError::InvalidFormat);
        }
        Ok(self.source_buffer())
    }

    fn resample(
        &self,
        _image: &PixelBuffer,
        size: Dimensions,
        _filter: FilterType,
    ) -> Result<PixelBuffer, DecodeError> {
        self.resamples.fetch_add(1, Ordering::SeqCst);
        Ok(blank(size))
    }

    fn encode(
        &self,
        image: &PixelBuffer,
        format: OutputFormat,
        quality: f32,
    ) -> Result<Vec<u8>, EncodeError> {
        let dimensions = image.dimensions();
        let call = {
            let mut probes = self.probes.lock().unwrap();
            probes.push(Probe {
                dimensions,
                format,
                quality,
            });
            probes.len() - 1
        };
        if let Some(gate) = &self.gate {
            gate.pass();
        }

        if self.fail_from.is_some_and(|from| call >= from) {
            return Err(EncodeError::EncodingFailed {
                format,
                reason: "synthetic failure".to_string(),
            });
        }

        Ok(vec![0u8; self.size_at(dimensions, format, quality)])
    }
}
