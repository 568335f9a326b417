//! Reduce-then-fit pipeline over a synthetic measurement series.

use approx::assert_relative_eq;
use zeeman_rings_physics::{ZeemanAnalyzer, ZeemanMeasurement};

const WAVELENGTH: f64 = 643.8e-9;

/// Ring radii whose splitting grows linearly with field strength, the way a
/// real Zeeman series behaves to first order.
fn measurement(b: f64) -> ZeemanMeasurement {
    let split = 0.0004 * b; // m per tesla of splitting
    ZeemanMeasurement {
        r_center: Some(0.010),
        r_inner: Some(0.010 - split),
        r_outer: Some(0.010 + split),
        ..ZeemanMeasurement::new(b, WAVELENGTH)
    }
}

#[test]
fn reduced_series_fits_a_positive_magneton() {
    let analyzer = ZeemanAnalyzer::default();
    let series: Vec<ZeemanMeasurement> = [0.1, 0.2, 0.3, 0.4, 0.5]
        .iter()
        .map(|&b| analyzer.reduce(&measurement(b)))
        .collect();

    for m in &series {
        let d = m.derived.expect("complete records reduce");
        assert!(
            d.delta_lambda_inner * d.delta_lambda_outer < 0.0,
            "symmetric splitting has opposite-signed shifts"
        );
    }

    let out = analyzer.estimate_magneton(&series);
    assert!(out.magneton_inner.abs() > 0.0);
    assert!(out.magneton_outer.abs() > 0.0);
    assert_relative_eq!(
        out.magneton_avg,
        (out.magneton_inner.abs() + out.magneton_outer.abs()) / 2.0,
        max_relative = 1e-12
    );

    let h_bar = analyzer.constants().h_bar();
    assert_relative_eq!(
        out.charge_inner,
        2.0 * out.magneton_inner.abs() / h_bar,
        max_relative = 1e-12
    );
    assert_relative_eq!(
        out.charge_avg,
        2.0 * out.magneton_avg / h_bar,
        max_relative = 1e-12
    );
}

#[test]
fn shuffled_series_reproduces_the_fit_bit_for_bit() {
    let analyzer = ZeemanAnalyzer::default();
    let ordered: Vec<ZeemanMeasurement> = [0.1, 0.2, 0.3, 0.4, 0.5]
        .iter()
        .map(|&b| analyzer.reduce(&measurement(b)))
        .collect();
    let mut shuffled = ordered.clone();
    shuffled.swap(0, 4);
    shuffled.swap(1, 3);

    let a = analyzer.estimate_magneton(&ordered);
    let b = analyzer.estimate_magneton(&shuffled);
    assert_eq!(a.magneton_inner.to_bits(), b.magneton_inner.to_bits());
    assert_eq!(a.magneton_outer.to_bits(), b.magneton_outer.to_bits());
    assert_eq!(a.magneton_avg.to_bits(), b.magneton_avg.to_bits());
    assert_eq!(a.charge_avg.to_bits(), b.charge_avg.to_bits());
}

#[test]
fn partially_marked_records_do_not_poison_the_fit() {
    let analyzer = ZeemanAnalyzer::default();
    let mut series: Vec<ZeemanMeasurement> = [0.2, 0.3, 0.4]
        .iter()
        .map(|&b| analyzer.reduce(&measurement(b)))
        .collect();
    // An operator mid-measurement: radii incomplete, nothing derived.
    series.push(analyzer.reduce(&ZeemanMeasurement::new(0.5, WAVELENGTH)));

    let with_partial = analyzer.estimate_magneton(&series);
    let without = analyzer.estimate_magneton(&series[..3]);
    assert_eq!(
        with_partial.magneton_inner.to_bits(),
        without.magneton_inner.to_bits()
    );
}
