//! Demonstrates enabling verbose logging for sigwin.
use sigwin::SignalBuffer;

fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Trace)
        .init();

    // odd capacity is rounded up (warn)
    let mut buf = SignalBuffer::<f32>::new(63, true).unwrap();
    // taps shorter than the window (debug)
    buf.setup_fir_filter(&[0.25; 4]).unwrap();

    for i in 0..200 {
        buf.push((i as f32 * 0.2).sin());
        if i % 50 == 0 {
            // one recomputation per changed window (trace)
            buf.fft_magnitudes().unwrap();
            buf.squared_power_spectrum().unwrap();
        }
    }
    println!("latest FIR output: {:.4}", buf.latest_fir_output().unwrap());
}
