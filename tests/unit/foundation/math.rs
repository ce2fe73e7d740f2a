use super::*;

#[test]
fn lerp_hits_both_endpoints_exactly() {
    assert_eq!(lerp(0.1, 2.9, 0.0), 0.1);
    assert_eq!(lerp(0.1, 2.9, 1.0), 2.9);
    assert_eq!(lerp(-1.0, 1.0, 0.5), 0.0);
    let (a, b) = (Point::new(0.7, -0.2), Point::new(-3.3, 2.9));
    assert_eq!(lerp_point(a, b, 1.0), b);
    assert_eq!(lerp_point(a, b, 0.0), a);
}

#[test]
fn softmax_sums_to_one_and_keeps_order() {
    let p = softmax(&[2.2, 1.6, 1.1, 0.7, 0.0]);
    assert_eq!(p.len(), 5);
    assert!((p.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    assert!(p.windows(2).all(|w| w[0] > w[1]));
    assert!((p[0] - 0.45).abs() < 0.01);
    assert!(softmax(&[]).is_empty());
}

#[test]
fn softmax_is_stable_for_large_scores() {
    let p = softmax(&[1000.0, 1000.0]);
    assert!((p[0] - 0.5).abs() < 1e-12);
}

#[test]
fn linspace_includes_both_ends() {
    assert_eq!(linspace(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    assert_eq!(linspace(2.0, 3.0, 1), vec![2.0]);
    assert!(linspace(0.0, 1.0, 0).is_empty());
}

#[test]
fn sine_ramp_matches_scaled_sine() {
    let r = sine_ramp(8, 0.3);
    assert_eq!(r.len(), 8);
    assert_eq!(r[0], 0.0);
    assert!((r[7] - 1f64.sin() * 0.3).abs() < 1e-12);
}

#[test]
fn centroid_of_points() {
    assert_eq!(centroid(&[]), None);
    let c = centroid(&[Point::new(0.0, 0.0), Point::new(2.0, 4.0)]).unwrap();
    assert_eq!(c, Point::new(1.0, 2.0));
}

#[test]
fn rng_is_deterministic_per_seed() {
    let mut a = Rng64::new(7);
    let mut b = Rng64::new(7);
    let mut c = Rng64::new(8);
    let xs: Vec<f64> = (0..16).map(|_| a.next_gaussian()).collect();
    let ys: Vec<f64> = (0..16).map(|_| b.next_gaussian()).collect();
    let zs: Vec<f64> = (0..16).map(|_| c.next_gaussian()).collect();
    assert_eq!(xs, ys);
    assert_ne!(xs, zs);
    assert!(xs.iter().all(|x| x.is_finite()));
}

#[test]
fn uniform_samples_stay_in_unit_interval() {
    let mut r = Rng64::new(42);
    for _ in 0..1000 {
        let u = r.next_f64_01();
        assert!((0.0..1.0).contains(&u));
    }
}
