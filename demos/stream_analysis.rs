//! Streaming analysis example for sigwin
//!
//! Feeds a noisy two-tone signal through a sliding window and prints the
//! statistics, spectral features and FIR output a wearable would compute
//! every few samples.

use sigwin::vector;
use sigwin::{BufferConfig, SignalBuffer};

const FS: f32 = 50.0;

fn sample(i: usize) -> f32 {
    let t = i as f32 / FS;
    let tone = (2.0 * std::f32::consts::PI * 2.0 * t).sin()
        + 0.3 * (2.0 * std::f32::consts::PI * 12.5 * t).sin();
    // deterministic pseudo-noise
    let noise = (((i * 7919) % 101) as f32 / 101.0 - 0.5) * 0.1;
    tone + noise
}

fn main() -> Result<(), sigwin::DspError> {
    println!("=== sigwin Stream Analysis Example ===\n");

    let mut buf = SignalBuffer::with_config(BufferConfig::new(64).fill(0.0f32))?;
    // 5-point moving average
    buf.setup_fir_filter(&[0.2; 5])?;

    for i in 0..256 {
        buf.push(sample(i));
        if i % 64 != 63 {
            continue;
        }
        println!("after {} samples", i + 1);
        println!("   mean {:.3}  std {:.3}  energy {:.2}", buf.mean(), buf.std(), buf.energy());
        println!("   min {:.3}  max {:.3}", buf.min(), buf.max());

        let freqs = buf.fft_frequencies(FS)?;
        let mags = buf.fft_magnitudes()?;
        let (peak, _) = mags
            .iter()
            .enumerate()
            .skip(1)
            .fold((0, 0.0f32), |best, (k, &m)| if m > best.1 { (k, m) } else { best });
        println!("   dominant frequency {:.2} Hz", freqs[peak]);

        let low = buf.average_band_power(0.0, 5.0, FS)?;
        let high = buf.average_band_power(10.0, 15.0, FS)?;
        println!("   band power 0-5 Hz {:.2}, 10-15 Hz {:.2}", low, high);
        println!("   FIR output {:.3}", buf.latest_fir_output()?);
        println!("   FFTs computed so far: {}", buf.fft_transform_count());
    }

    println!("\nCorrelation with the clean tone");
    let noisy = buf.data();
    let clean: Vec<f32> = (192..256)
        .map(|i| (2.0 * std::f32::consts::PI * 2.0 * i as f32 / FS).sin())
        .collect();
    println!("   r = {:.3}", vector::correlation_coefficient(&noisy, &clean)?);

    println!("\nLast window:\n{:.2}", buf);
    Ok(())
}
