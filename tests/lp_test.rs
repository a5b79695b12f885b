//! 저압 본관 기밀시험 시간 계산 테스트.
use approx::assert_relative_eq;
use gas_mains_toolbox::lp_test::{
    compute_test_duration, NominalDiameter, PermittedLoss, Sdr, TestDurationError,
    TestDurationInput,
};

fn run(mm: u32, sdr: Sdr, length: f64) -> Result<f64, TestDurationError> {
    let input = TestDurationInput {
        diameter: NominalDiameter::new(mm).expect("selectable diameter"),
        sdr,
        pipe_length_m: length,
    };
    compute_test_duration(&input).map(|r| r.duration_minutes)
}

#[test]
fn short_small_main_needs_the_fifteen_minute_floor() {
    let input = TestDurationInput {
        diameter: NominalDiameter::new(63).unwrap(),
        sdr: Sdr::Sdr11,
        pipe_length_m: 100.0,
    };
    let res = compute_test_duration(&input).expect("test duration");
    assert_relative_eq!(res.duration_hours, 0.06, epsilon = 1e-12);
    assert_relative_eq!(res.duration_minutes, 3.6, epsilon = 1e-9);
    assert_eq!(res.permitted_loss, PermittedLoss::Zero);
    assert_eq!(res.cross_sectional_area_m2, Some(0.0021));
    assert!(res.message().contains("3.60 minutes"));
    assert!(res.message().ends_with("The permitted pressure loss is zero."));
}

#[test]
fn longer_main_allows_three_mbar() {
    let minutes = run(125, Sdr::Sdr17_6, 100.0).unwrap();
    assert_relative_eq!(minutes, 17.4, epsilon = 1e-9);
    assert_relative_eq!(run(355, Sdr::Sdr26, 500.0).unwrap(), 759.0, epsilon = 1e-9);
}

#[test]
fn minutes_are_rounded_up_before_the_threshold() {
    // 13.962분 -> 14분: 0, 14.04분 -> 15분: 3 mbar
    let below = run(90, Sdr::Sdr11, 179.0).unwrap();
    assert_eq!(PermittedLoss::for_minutes(below), PermittedLoss::Zero);
    let above = run(90, Sdr::Sdr11, 180.0).unwrap();
    assert_eq!(PermittedLoss::for_minutes(above), PermittedLoss::ThreeMbar);
    assert_eq!(PermittedLoss::ThreeMbar.mbar(), 3.0);
}

#[test]
fn missing_table_cells_are_unsupported_combinations() {
    for (mm, sdr) in [(90, Sdr::Sdr13_6), (63, Sdr::Sdr21), (125, Sdr::Sdr26)] {
        let err = run(mm, sdr, 100.0).unwrap_err();
        assert!(
            matches!(err, TestDurationError::UnsupportedCombination { .. }),
            "{mm} {sdr}"
        );
    }
}

#[test]
fn length_must_be_positive() {
    for bad in [0.0, -5.0, f64::NAN] {
        assert_eq!(
            run(63, Sdr::Sdr11, bad),
            Err(TestDurationError::InvalidLength)
        );
    }
}

#[test]
fn selections_parse_from_user_text() {
    assert_eq!("sdr 17.6".parse::<Sdr>(), Ok(Sdr::Sdr17_6));
    assert_eq!("26".parse::<Sdr>(), Ok(Sdr::Sdr26));
    assert!("SDR9".parse::<Sdr>().is_err());
    assert_eq!("125mm".parse::<NominalDiameter>().map(|d| d.mm()), Ok(125));
    assert!("110".parse::<NominalDiameter>().is_err());
}
