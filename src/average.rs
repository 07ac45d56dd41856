//! Averaging primitives: a time-weighted moving window and a per-frame running mean

use alloc::collections::VecDeque;
use nalgebra::Vector3;

use crate::math::ceil;

/// Time-weighted moving average over a trailing window
///
/// Each sample carries the time it represents. The window holds at most
/// `time_window` seconds of samples; when it overflows, the oldest sample is
/// trimmed, partially if needed, so the result stays a true time-weighted
/// mean at any sample rate.
///
/// The buffer is sized from `time_window * inputs_per_second`. Bursts faster
/// than that evict old samples early instead of growing the buffer.
///
/// # Example
/// ```
/// use gyro_controls::TimedMovingAverage;
///
/// let mut average = TimedMovingAverage::new(2.0, 10);
/// assert_eq!(average.add(1.0, 2.0), 2.0);
/// assert_eq!(average.add(1.0, 4.0), 3.0);
/// ```
#[derive(Debug, Clone)]
pub struct TimedMovingAverage {
    /// Window length in seconds
    time_window: f32,
    /// Rate used to size the buffer
    inputs_per_second: u32,
    /// Maximum number of buffered samples
    capacity: usize,
    /// `(delta_time, value)` pairs, oldest first
    samples: VecDeque<(f32, f32)>,
    /// Total time represented by `samples`
    duration: f32,
}

impl TimedMovingAverage {
    pub fn new(time_window: f32, inputs_per_second: u32) -> Self {
        let capacity = buffer_capacity(time_window, inputs_per_second);
        Self {
            time_window,
            inputs_per_second,
            capacity,
            samples: VecDeque::with_capacity(capacity),
            duration: 0.0,
        }
    }

    /// Adds a sample covering `delta_time` seconds and returns the average
    /// of the window. Returns `value` itself while the window holds no time.
    pub fn add(&mut self, delta_time: f32, value: f32) -> f32 {
        if self.samples.len() >= self.capacity {
            if let Some((oldest, _)) = self.samples.pop_front() {
                self.duration -= oldest;
            }
        }
        self.samples.push_back((delta_time, value));
        self.duration += delta_time;

        self.trim();

        let mut weighted = 0.0;
        let mut duration = 0.0;
        for &(dt, v) in &self.samples {
            weighted += v * dt;
            duration += dt;
        }
        // resync the running total to avoid drift from partial evictions
        self.duration = duration;

        if duration > 0.0 { weighted / duration } else { value }
    }

    /// Clears all samples
    pub fn reset(&mut self) {
        self.samples.clear();
        self.duration = 0.0;
    }

    pub fn time_window(&self) -> f32 {
        self.time_window
    }

    /// Changes the window length, resizing the buffer and trimming old samples
    pub fn set_time_window(&mut self, time_window: f32) {
        self.time_window = time_window;
        self.resize();
    }

    pub fn inputs_per_second(&self) -> u32 {
        self.inputs_per_second
    }

    pub fn set_inputs_per_second(&mut self, inputs_per_second: u32) {
        self.inputs_per_second = inputs_per_second;
        self.resize();
    }

    /// Total time currently represented by the window, in seconds
    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    fn resize(&mut self) {
        self.capacity = buffer_capacity(self.time_window, self.inputs_per_second);
        while self.samples.len() > self.capacity {
            if let Some((oldest, _)) = self.samples.pop_front() {
                self.duration -= oldest;
            }
        }
        self.trim();
    }

    /// Evicts from the old end until the window fits, cutting the last
    /// evicted sample short instead of dropping it when that is enough
    fn trim(&mut self) {
        while self.duration > self.time_window {
            let excess = self.duration - self.time_window;
            let Some(oldest) = self.samples.front_mut() else {
                self.duration = 0.0;
                break;
            };

            if oldest.0 <= excess {
                self.duration -= oldest.0;
                self.samples.pop_front();
            } else {
                oldest.0 -= excess;
                self.duration = self.time_window;
            }
        }
    }
}

fn buffer_capacity(time_window: f32, inputs_per_second: u32) -> usize {
    let samples = ceil(time_window * inputs_per_second as f32);
    if samples >= 1.0 { samples as usize } else { 1 }
}

/// Running mean of 3-axis samples
///
/// Folds the sensor samples received between two frames into one value
/// without keeping any history.
#[derive(Debug, Clone, Copy)]
pub struct SampleAverage {
    value: Vector3<f32>,
    count: u32,
}

impl SampleAverage {
    pub fn new() -> Self {
        Self {
            value: Vector3::zeros(),
            count: 0,
        }
    }

    /// Adds a sample and returns the mean of all samples since the last reset
    pub fn add(&mut self, sample: Vector3<f32>) -> Vector3<f32> {
        self.count += 1;

        if self.count == 1 {
            self.value = sample;
        } else {
            self.value += (sample - self.value) / self.count as f32;
        }

        self.value
    }

    pub fn reset(&mut self) {
        self.value = Vector3::zeros();
        self.count = 0;
    }

    pub fn value(&self) -> Vector3<f32> {
        self.value
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}

impl Default for SampleAverage {
    fn default() -> Self {
        Self::new()
    }
}
