/// Multipliers applied to every power of ten in the schedule.
const DECADE_STEPS: [u64; 3] = [1, 2, 5];

/// Number of whole decades below `stop`, i.e. `floor(log10(stop))`.
///
/// Computed in integer space so exact powers of ten land on the right decade.
fn decades(stop: u64) -> u32 {
    let mut exponent = 0;
    let mut power = 10u64;
    while power <= stop {
        exponent += 1;
        power = match power.checked_mul(10) {
            Some(next) => next,
            None => break,
        };
    }
    exponent
}

/// Step counts between consecutive measurement points.
///
/// Measurement points sit at 1, 2 and 5 times every power of ten below
/// `floor(log10(stop))`, and each entry is the distance from the previous
/// point. The cumulative total is not extended to reach `stop`.
pub fn measurement_schedule(stop: u64) -> Vec<u64> {
    let mut schedule = Vec::new();
    let mut total = 0u64;
    for exponent in 0..decades(stop) {
        let base = 10u64.pow(exponent);
        for multiplier in DECADE_STEPS {
            let target = multiplier * base;
            schedule.push(target - total);
            total = target;
        }
    }
    schedule
}

/// Cumulative measurement points, `0` excluded.
pub fn measurement_points(stop: u64) -> Vec<u64> {
    measurement_schedule(stop)
        .into_iter()
        .scan(0u64, |total, steps| {
            *total += steps;
            Some(*total)
        })
        .collect()
}
