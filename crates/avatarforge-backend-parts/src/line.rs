//! Straight-line path sampling.

use glam::Vec3;

/// Samples `samples` evenly spaced points from `start` to `end`.
///
/// Point `i` sits at `t = i / (samples - 1)`; the first and last points are
/// exactly `start` and `end`. A single sample yields `[start]`, zero samples
/// an empty path.
///
/// ```
/// use avatarforge_backend_parts::line::create_line;
/// use glam::Vec3;
///
/// let path = create_line(Vec3::ZERO, Vec3::new(0.0, 10.0, 0.0), 3);
/// assert_eq!(path[1], Vec3::new(0.0, 5.0, 0.0));
/// ```
pub fn create_line(start: Vec3, end: Vec3, samples: usize) -> Vec<Vec3> {
    match samples {
        0 => Vec::new(),
        1 => vec![start],
        n => {
            let last = n - 1;
            (0..n)
                .map(|i| match i {
                    0 => start,
                    i if i == last => end,
                    i => start.lerp(end, i as f32 / last as f32),
                })
                .collect()
        }
    }
}

/// Normalized parameter of sample `index` along a path of `samples` points.
pub(crate) fn sample_t(index: usize, samples: usize) -> f32 {
    if samples < 2 {
        0.0
    } else {
        index as f32 / (samples - 1) as f32
    }
}
