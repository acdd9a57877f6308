//! Utility functions: logger setup and small statistics helpers.

use average::{Estimate, Max, Mean, Variance};
use std::env;
use std::io::Write;

/// Initializes `env_logger` with a timestamped format. `RUST_LOG` is used
/// when set.
pub fn init_logger() {
    let mut builder = env_logger::Builder::new();
    builder.format(|buf, record| {
        let t = chrono::Utc::now();
        writeln!(
            buf,
            "{} {:5} {}",
            t.format("%Y-%m-%d %H:%M:%S%.3f"),
            record.level(),
            record.args()
        )
    });
    if let Ok(filters) = env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.init();
}

/// Arithmetic mean, 0 for no samples.
pub fn mean<I: IntoIterator<Item = f64>>(samples: I) -> f64 {
    let m: Mean = samples.into_iter().collect();
    if m.is_empty() { 0.0 } else { m.mean() }
}

/// Largest sample, `None` for no samples.
pub fn max<I: IntoIterator<Item = f64>>(samples: I) -> Option<f64> {
    let mut m = Max::new();
    let mut any = false;
    for s in samples {
        m.add(s);
        any = true;
    }
    if any { Some(m.max()) } else { None }
}

/// Sample standard deviation; `None` with fewer than two samples.
pub fn sample_stddev<I: IntoIterator<Item = f64>>(samples: I) -> Option<f64> {
    let v: Variance = samples.into_iter().collect();
    if v.len() < 2 {
        None
    } else {
        Some(v.sample_variance().sqrt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_and_max() {
        assert_eq!(mean(vec![1.0, 2.0, 3.0]), 2.0);
        assert_eq!(mean(Vec::new()), 0.0);
        assert_eq!(max(vec![1.0, 7.5, 3.0]), Some(7.5));
        assert_eq!(max(Vec::new()), None);
    }

    #[test]
    fn test_sample_stddev() {
        let sd = sample_stddev(vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        // sample variance is 32 / 7
        assert!((sd - (32.0f64 / 7.0).sqrt()).abs() < 1e-9);
        assert_eq!(sample_stddev(vec![1.0]), None);
    }
}
