//! Full pipeline demonstration
//!
//! Generates a synthetic controller session, runs it through calibration,
//! fusion, the gyro processor and the flick stick, then writes the results
//! to `trace.csv` and plots them to `trace_plots.png`.
//!
//! Session layout:
//! - 0s to 1s: controller still on a table with gyro drift, calibrating
//! - 1s to 6s: picked up and swept left and right, held tilted
//! - 3s and 4.5s: right stick flicks
//!
//! Run with: `RUST_LOG=debug cargo run --example trace`

use gyro_controls::{
    FlickSnapping, FlickStick, FlickStickSettings, GyroInput, GyroProcessor, PlayerTurnSpace,
    ProcessorSettings, SensorSample, SmoothingSettings,
};
use nalgebra::{Vector2, Vector3};
use plotters::prelude::*;
use plotters::coord::types::RangedCoordf32;
use serde::Serialize;
use std::error::Error;
use std::f32::consts::PI;

const SAMPLE_RATE: u64 = 250; // Hz
const SAMPLE_PERIOD: u64 = 1_000_000_000 / SAMPLE_RATE;
const SAMPLES_PER_FRAME: u64 = 4;
const FRAME_TIME: f32 = SAMPLES_PER_FRAME as f32 / SAMPLE_RATE as f32;
const DURATION: f32 = 6.0; // seconds
const CALIBRATION_TIME: f32 = 1.0;

#[derive(Debug, Serialize)]
struct FrameRecord {
    #[serde(rename = "Time (s)")]
    time: f32,
    #[serde(rename = "Gyro pitch (rad/s)")]
    gyro_pitch: f32,
    #[serde(rename = "Gyro yaw (rad/s)")]
    gyro_yaw: f32,
    #[serde(rename = "Gravity X")]
    gravity_x: f32,
    #[serde(rename = "Gravity Y")]
    gravity_y: f32,
    #[serde(rename = "Gravity Z")]
    gravity_z: f32,
    #[serde(rename = "Camera pitch (deg)")]
    camera_pitch: f32,
    #[serde(rename = "Camera yaw (deg)")]
    camera_yaw: f32,
    #[serde(rename = "Flicking")]
    flicking: bool,
}

/// Synthetic sensor reading at `time` seconds
fn synthesize(time: f32) -> SensorSample {
    let drift = Vector3::new(0.012, -0.008, 0.004);
    let timestamp = (time * 1e9) as u64;

    if time < CALIBRATION_TIME {
        return SensorSample {
            gyro: drift,
            accelerometer: Vector3::new(0.0, 9.81, 0.0),
            timestamp,
        };
    }

    // held at a 30 degree tilt toward the player
    let tilt = 30.0f32.to_radians();
    let accelerometer = Vector3::new(0.0, 9.81 * tilt.cos(), 9.81 * tilt.sin());

    // sweep around the gravity axis
    let phase = (time - CALIBRATION_TIME) * 0.8 * PI;
    let turn = 1.2 * phase.sin();
    let gyro = Vector3::new(
        0.2 * (phase * 2.0).sin(),
        turn * tilt.cos(),
        turn * tilt.sin(),
    ) + drift;

    SensorSample {
        gyro,
        accelerometer,
        timestamp,
    }
}

/// Right stick position at `time` seconds
fn stick(time: f32) -> Vector2<f32> {
    if (3.0..3.3).contains(&time) {
        Vector2::new(1.0, -0.2)
    } else if (4.5..4.8).contains(&time) {
        Vector2::new(-0.7, 0.7)
    } else {
        Vector2::zeros()
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    println!("Gyro controls trace - calibration, fusion, processing and flick stick");

    let mut input = GyroInput::new();
    let mut processor = GyroProcessor::with_settings(
        PlayerTurnSpace::default(),
        ProcessorSettings {
            tightening_threshold: 0.02,
            smoothing: SmoothingSettings {
                threshold_smooth: 0.05,
                threshold_direct: 0.1,
                ..Default::default()
            },
            ..Default::default()
        },
    );
    let mut flick = FlickStick::with_settings(FlickStickSettings {
        snapping: FlickSnapping::Eight,
        snapping_strength: 0.5,
        ..Default::default()
    });

    let frame_count = (DURATION / FRAME_TIME) as u64;
    let mut camera = Vector2::<f32>::zeros();
    let mut records = Vec::with_capacity(frame_count as usize);

    input.set_calibrating(true);
    for frame in 0..frame_count {
        let frame_start = frame * SAMPLES_PER_FRAME;
        let time = frame_start as f32 * SAMPLE_PERIOD as f32 / 1e9;

        if input.is_calibrating() && time >= CALIBRATION_TIME {
            input.set_calibrating(false);
            println!(
                "Calibrated bias: ({:.4}, {:.4}, {:.4}) rad/s",
                input.bias().x,
                input.bias().y,
                input.bias().z
            );
        }

        input.begin();
        for sample in frame_start..frame_start + SAMPLES_PER_FRAME {
            let sample_time = sample as f32 * SAMPLE_PERIOD as f32 / 1e9;
            input.input_sample(&synthesize(sample_time));
        }

        let state = input.gyro_state();
        camera += processor.update(&state, FRAME_TIME);
        camera.y += flick.update(stick(time), FRAME_TIME);

        records.push(FrameRecord {
            time,
            gyro_pitch: state.gyro.x,
            gyro_yaw: state.gyro.y,
            gravity_x: state.gravity.x,
            gravity_y: state.gravity.y,
            gravity_z: state.gravity.z,
            camera_pitch: camera.x.to_degrees(),
            camera_yaw: camera.y.to_degrees(),
            flicking: flick.is_flicking(),
        });
    }

    println!("Processed {} frames", records.len());

    let mut writer = csv::Writer::from_path("trace.csv")?;
    for record in &records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    println!("✓ Frame data saved to trace.csv");

    create_plots(&records)?;
    println!("✓ Plots saved to trace_plots.png");
    Ok(())
}

/// Three panels: gyro input, fused gravity, accumulated camera angles
fn create_plots(records: &[FrameRecord]) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new("trace_plots.png", (1000, 900)).into_drawing_area();
    root.fill(&WHITE)?;
    let panels = root.split_evenly((3, 1));

    let time_range = 0f32..DURATION;

    let mut gyro_chart = ChartBuilder::on(&panels[0])
        .caption("Gyro (fused, unbiased)", ("sans-serif", 20))
        .margin(5)
        .x_label_area_size(20)
        .y_label_area_size(50)
        .build_cartesian_2d(time_range.clone(), -2f32..2f32)?;
    gyro_chart.configure_mesh().y_desc("rad/s").draw()?;
    draw_line(&mut gyro_chart, records, |r| r.gyro_pitch, RED, "Pitch")?;
    draw_line(&mut gyro_chart, records, |r| r.gyro_yaw, BLUE, "Yaw")?;
    gyro_chart.configure_series_labels().draw()?;

    let mut gravity_chart = ChartBuilder::on(&panels[1])
        .caption("Gravity", ("sans-serif", 20))
        .margin(5)
        .x_label_area_size(20)
        .y_label_area_size(50)
        .build_cartesian_2d(time_range.clone(), -1.1f32..1.1f32)?;
    gravity_chart.configure_mesh().draw()?;
    draw_line(&mut gravity_chart, records, |r| r.gravity_x, RED, "X")?;
    draw_line(&mut gravity_chart, records, |r| r.gravity_y, GREEN, "Y")?;
    draw_line(&mut gravity_chart, records, |r| r.gravity_z, BLUE, "Z")?;
    gravity_chart.configure_series_labels().draw()?;

    let (min, max) = records
        .iter()
        .flat_map(|r| [r.camera_pitch, r.camera_yaw])
        .fold((-10f32, 10f32), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let mut camera_chart = ChartBuilder::on(&panels[2])
        .caption("Camera", ("sans-serif", 20))
        .margin(5)
        .x_label_area_size(30)
        .y_label_area_size(50)
        .build_cartesian_2d(time_range, min..max)?;
    camera_chart
        .configure_mesh()
        .x_desc("Time (s)")
        .y_desc("Degrees")
        .draw()?;
    draw_line(&mut camera_chart, records, |r| r.camera_pitch, RED, "Pitch")?;
    draw_line(&mut camera_chart, records, |r| r.camera_yaw, BLUE, "Yaw")?;
    camera_chart.configure_series_labels().draw()?;

    root.present()?;
    Ok(())
}

fn draw_line<DB: DrawingBackend>(
    chart: &mut ChartContext<'_, DB, Cartesian2d<RangedCoordf32, RangedCoordf32>>,
    records: &[FrameRecord],
    value: impl Fn(&FrameRecord) -> f32,
    color: RGBColor,
    label: &str,
) -> Result<(), Box<dyn Error>>
where
    DB::ErrorType: 'static,
{
    chart
        .draw_series(LineSeries::new(
            records.iter().map(|r| (r.time, value(r))),
            &color,
        ))?
        .label(label)
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 10, y)], color));
    Ok(())
}
