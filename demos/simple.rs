use gyro_controls::{GyroInput, GyroProcessor};
use nalgebra::Vector3;

const SAMPLE_PERIOD: u64 = 4_000_000; // 4 ms sample period
const FRAME_TIME: f32 = 0.016; // 16 ms frame
const SAMPLES_PER_FRAME: u64 = 4;

fn main() {
    let mut input = GyroInput::new();
    let mut processor = GyroProcessor::new();
    let mut timestamp = 0;

    for frame in 0..10 {
        // this block should run once per game frame
        input.begin();
        for _ in 0..SAMPLES_PER_FRAME {
            let gyro = Vector3::new(0.0, 0.5, 0.0); // replace this with actual gyro data in rad/s
            let accelerometer = Vector3::new(0.0, 9.81, 0.0); // replace this with actual accelerometer data in m/s²

            input.input_accelerometer(accelerometer, timestamp);
            input.input_gyro(gyro, timestamp);
            timestamp += SAMPLE_PERIOD;
        }

        let delta = processor.update(&input.gyro_state(), FRAME_TIME);

        println!(
            "Frame {}: Pitch: {:.3}, Yaw: {:.3}",
            frame,
            delta.x.to_degrees(),
            delta.y.to_degrees()
        );
    }
}
