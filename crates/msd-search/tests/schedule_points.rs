use msd_search::{measurement_points, measurement_schedule};

#[test]
fn hundred_yields_two_decades() {
    assert_eq!(measurement_schedule(100), vec![1, 1, 3, 5, 10, 30]);
    assert_eq!(measurement_points(100), vec![1, 2, 5, 10, 20, 50]);
}

#[test]
fn below_ten_is_empty() {
    for stop in [0, 1, 9] {
        assert!(measurement_schedule(stop).is_empty(), "stop = {stop}");
    }
}

#[test]
fn exact_powers_of_ten_start_a_new_decade() {
    assert_eq!(measurement_schedule(10), vec![1, 1, 3]);
    assert_eq!(measurement_schedule(99), vec![1, 1, 3]);
    assert_eq!(measurement_schedule(1000).len(), 9);
    assert_eq!(measurement_schedule(999).len(), 6);
}

#[test]
fn total_stops_short_of_the_requested_end() {
    let total: u64 = measurement_schedule(100_000).iter().sum();
    assert_eq!(total, 50_000);
}

#[test]
fn entries_are_positive_up_to_the_largest_stop() {
    let schedule = measurement_schedule(u64::MAX);
    assert_eq!(schedule.len(), 57);
    assert!(schedule.iter().all(|steps| *steps > 0));
    assert_eq!(measurement_points(u64::MAX).last(), Some(&5_000_000_000_000_000_000));
}
