use simba::scalar::SupersetOf;

/// Yields `num_steps` parameters evenly spaced over the half-open range
/// `[start, end)`. Useful for closed curves, where the parameter `end` would
/// repeat the point at `start`.
pub fn uniform_steps<S>(start: S, end: S, num_steps: usize) -> impl Iterator<Item = S> + Clone
where
    S: nalgebra::RealField + SupersetOf<usize> + Copy,
{
    let convert = nalgebra::convert::<usize, S>;
    (0..num_steps)
        .map(move |i| convert(i) / convert(num_steps))
        // u ranges from 0 to 1 (exclusive)
        .map(move |u| start + u * (end - start))
}
