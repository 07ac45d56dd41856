use criterion::{Criterion, black_box, criterion_group, criterion_main};
use gyro_controls::{
    FlickStick, GyroInput, GyroProcessor, PlayerLeanSpace, ProcessorSettings, SensorSample,
    SmoothingSettings, TieredSmoothing2D, TimedMovingAverage,
};
use nalgebra::{Vector2, Vector3};
use rand::prelude::*;
use rand_pcg::Pcg64;
use std::f32::consts::PI;

/// 250Hz sample period in nanoseconds
const SAMPLE_PERIOD: u64 = 4_000_000;

// Pre-generated sensor data to eliminate RNG overhead during benchmarks
struct PreGeneratedData {
    samples: Vec<SensorSample>,
    index: usize,
}

impl PreGeneratedData {
    fn new(count: usize, seed: u64) -> Self {
        let mut rng = Pcg64::seed_from_u64(seed);
        let mut samples = Vec::with_capacity(count);

        for i in 0..count {
            let time = i as f32 * 0.004;
            let motion_phase = time * 0.5 * 2.0 * PI;

            let gyro = Vector3::new(
                0.5 * motion_phase.sin() + rng.random_range(-0.01..0.01),
                1.5 * (motion_phase * 1.3).cos() + rng.random_range(-0.01..0.01),
                0.3 * (motion_phase * 0.7).sin() + rng.random_range(-0.01..0.01),
            );

            let accelerometer = Vector3::new(
                -0.5 * motion_phase.sin() + rng.random_range(-0.05..0.05),
                9.81 + rng.random_range(-0.05..0.05),
                0.5 * motion_phase.cos() + rng.random_range(-0.05..0.05),
            );

            samples.push(SensorSample {
                gyro,
                accelerometer,
                timestamp: i as u64 * SAMPLE_PERIOD,
            });
        }

        Self { samples, index: 0 }
    }

    fn next(&mut self) -> SensorSample {
        let sample = self.samples[self.index];
        self.index = (self.index + 1) % self.samples.len();
        sample
    }
}

fn smoothing_settings() -> SmoothingSettings {
    SmoothingSettings {
        time: 0.125,
        threshold_smooth: 0.1,
        threshold_direct: 0.2,
        inputs_per_second: 256,
    }
}

/// Benchmark one sensor sample through calibration and fusion
fn bench_input_sample(c: &mut Criterion) {
    let mut data = PreGeneratedData::new(1000, 42);
    let mut input = GyroInput::new();
    let mut timestamp = 0;

    c.bench_function("gyro_input_sample", |b| {
        b.iter(|| {
            // keep timestamps increasing across the wrap-around
            let mut sample = data.next();
            timestamp += SAMPLE_PERIOD;
            sample.timestamp = timestamp;
            input.input_sample(black_box(&sample))
        })
    });
}

/// Benchmark the windowed average at its full capacity
fn bench_moving_average(c: &mut Criterion) {
    let mut average = TimedMovingAverage::new(0.125, 256);
    for i in 0..64 {
        average.add(0.004, i as f32);
    }

    c.bench_function("timed_moving_average_add", |b| {
        b.iter(|| average.add(black_box(0.004), black_box(0.25)))
    });
}

/// Benchmark 2D tiered smoothing in the blended range
fn bench_tiered_smoothing(c: &mut Criterion) {
    let mut smoothing = TieredSmoothing2D::with_settings(smoothing_settings());

    c.bench_function("tiered_smoothing_2d", |b| {
        b.iter(|| smoothing.apply(black_box(Vector2::new(0.1, 0.05)), black_box(0.004)))
    });
}

/// Benchmark one frame of the processor with every stage enabled
fn bench_processor_update(c: &mut Criterion) {
    let mut data = PreGeneratedData::new(1000, 7);
    let mut input = GyroInput::new();
    for _ in 0..1000 {
        input.input_sample(&data.next());
    }
    let state = input.gyro_state();

    let settings = ProcessorSettings {
        tightening_threshold: 0.05,
        smoothing: smoothing_settings(),
        ..Default::default()
    };
    let mut processor = GyroProcessor::with_settings(PlayerLeanSpace::default(), settings);

    c.bench_function("gyro_processor_update", |b| {
        b.iter(|| processor.update(black_box(&state), black_box(0.016)))
    });
}

/// Benchmark a full frame: four samples fused then processed
fn bench_frame(c: &mut Criterion) {
    let mut data = PreGeneratedData::new(1000, 1234);
    let mut input = GyroInput::new();
    let mut processor = GyroProcessor::new();
    let mut timestamp = 0;

    c.bench_function("gyro_frame_4_samples", |b| {
        b.iter(|| {
            input.begin();
            for _ in 0..4 {
                let mut sample = data.next();
                timestamp += SAMPLE_PERIOD;
                sample.timestamp = timestamp;
                input.input_sample(&sample);
            }
            processor.update(black_box(&input.gyro_state()), black_box(0.016))
        })
    });
}

/// Benchmark the flick stick while rotating a held stick
fn bench_flick_stick(c: &mut Criterion) {
    let mut flick = FlickStick::new();
    let mut angle = 0.0f32;

    c.bench_function("flick_stick_update", |b| {
        b.iter(|| {
            angle += 0.01;
            let stick = Vector2::new(-angle.sin(), -angle.cos());
            flick.update(black_box(stick), black_box(0.016))
        })
    });
}

criterion_group!(
    benches,
    bench_input_sample,
    bench_moving_average,
    bench_tiered_smoothing,
    bench_processor_update,
    bench_frame,
    bench_flick_stick
);

criterion_main!(benches);
