use chrono::NaiveDate;
use mortgage_core::amortization::rates::{annual_to_monthly, convert_rates, quoted_to_annual};
use mortgage_core::amortization::{
    analyze_amortization, calculate_amortization_schedule, generate_schedule,
    AmortizationScheduleEntry, AmortizationScheduleParameters, PaymentFrequency, ScheduleIter,
    ScheduleTerms,
};
use mortgage_core::MortgageError;
use pretty_assertions::assert_eq;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn params(
    principal: Decimal,
    rate: Decimal,
    years: u32,
    frequency: PaymentFrequency,
) -> AmortizationScheduleParameters {
    AmortizationScheduleParameters::new(principal, rate, years, frequency)
}

fn sample_loans() -> Vec<AmortizationScheduleParameters> {
    let mut loans = Vec::new();
    for frequency in PaymentFrequency::ALL {
        loans.push(params(dec!(300000), dec!(0.05), 25, frequency));
        loans.push(params(dec!(1000), Decimal::ZERO, 1, frequency));
        loans.push(params(dec!(487250.55), dec!(0.0725), 30, frequency));
        loans.push(params(dec!(25000), dec!(0.019), 5, frequency));
        loans.push(params(dec!(1), dec!(0.10), 1, frequency));
    }
    loans
}

fn schedule_for(p: &AmortizationScheduleParameters) -> Vec<AmortizationScheduleEntry> {
    calculate_amortization_schedule(p).unwrap()
}

// ===========================================================================
// Schedule invariants
// ===========================================================================

#[test]
fn test_principal_conservation() {
    for loan in sample_loans() {
        let schedule = schedule_for(&loan);
        let total: Decimal = schedule.iter().map(|e| e.principal_payment).sum();
        assert_eq!(total, loan.principal, "{loan:?}");
    }
}

#[test]
fn test_balance_strictly_decreasing_to_zero() {
    for loan in sample_loans() {
        let schedule = schedule_for(&loan);
        let mut previous = loan.principal;
        for entry in &schedule {
            assert!(entry.remaining_principal < previous, "{loan:?} at {}", entry.payment_number);
            assert!(entry.remaining_principal >= Decimal::ZERO);
            previous = entry.remaining_principal;
        }
        assert_eq!(schedule.last().unwrap().remaining_principal, Decimal::ZERO);
    }
}

#[test]
fn test_component_sum_and_numbering() {
    for loan in sample_loans() {
        for (idx, entry) in schedule_for(&loan).iter().enumerate() {
            assert_eq!(entry.payment_number as usize, idx + 1);
            assert_eq!(
                entry.periodic_payment,
                entry.interest_payment + entry.principal_payment
            );
        }
    }
}

#[test]
fn test_interest_accrues_on_carried_balance() {
    let loan = params(dec!(300000), dec!(0.05), 25, PaymentFrequency::Weekly);
    let rate = convert_rates(loan.quoted_interest_rate, loan.payment_frequency).periodic;
    let schedule = schedule_for(&loan);
    let mut carried = loan.principal;
    for entry in &schedule {
        let expected = (carried * rate)
            .round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero);
        assert_eq!(entry.interest_payment, expected);
        carried = entry.remaining_principal;
    }
}

#[test]
fn test_nominal_payment_stability() {
    for loan in sample_loans() {
        let out = analyze_amortization(&loan).unwrap().result;
        let (last, rest) = out.schedule.split_last().unwrap();
        for entry in rest {
            assert_eq!(entry.periodic_payment, out.periodic_payment, "{loan:?}");
        }
        assert_eq!(last.periodic_payment, out.summary.final_payment);
    }
}

#[test]
fn test_deterministic_output() {
    let loan = params(dec!(487250.55), dec!(0.0725), 30, PaymentFrequency::AcceleratedWeekly);
    let first = serde_json::to_string(&schedule_for(&loan)).unwrap();
    let second = serde_json::to_string(&schedule_for(&loan)).unwrap();
    assert_eq!(first, second);
}

// ===========================================================================
// Rates
// ===========================================================================

#[test]
fn test_rate_composition_matches_direct_compounding() {
    for quoted in [dec!(0.0125), dec!(0.05), dec!(0.0725), dec!(0.15)] {
        for frequency in PaymentFrequency::ALL {
            let composed = convert_rates(quoted, frequency).periodic;
            // Direct: (1 + q/2)^(2 / payments_per_year) - 1, in f64.
            let half = 1.0 + quoted.to_f64().unwrap() / 2.0;
            let direct = half.powf(2.0 / f64::from(frequency.payments_per_year())) - 1.0;
            let direct = Decimal::from_f64(direct).unwrap();
            assert!(
                (composed - direct).abs() < dec!(0.000000000001),
                "{frequency:?} @ {quoted}: {composed} vs {direct}"
            );
        }
    }
}

#[test]
fn test_scenario_a_monthly_rate() {
    let monthly = annual_to_monthly(quoted_to_annual(dec!(0.05)));
    assert!((monthly - dec!(0.0041239)).abs() < dec!(0.0000001));
}

// ===========================================================================
// End-to-end scenarios
// ===========================================================================

#[test]
fn test_scenario_a_monthly_300k() {
    let loan = params(dec!(300000), dec!(0.05), 25, PaymentFrequency::Monthly);
    let out = analyze_amortization(&loan).unwrap().result;

    let expected_nominal = out
        .monthly_payment
        .round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero);
    assert_eq!(out.periodic_payment, expected_nominal);
    assert!((out.periodic_payment - dec!(1744.78)).abs() < dec!(0.05));

    assert_eq!(out.schedule.len(), 300);
    assert_eq!(out.schedule[299].remaining_principal, Decimal::ZERO);
    assert_eq!(out.schedule[0].interest_payment, dec!(1237.17));
}

#[test]
fn test_scenario_b_zero_rate() {
    let loan = params(dec!(1000), Decimal::ZERO, 1, PaymentFrequency::Monthly);
    let out = analyze_amortization(&loan).unwrap().result;

    assert_eq!(out.monthly_payment, dec!(1000) / dec!(12));
    assert_eq!(out.schedule.len(), 12);
    for entry in &out.schedule[..11] {
        assert_eq!(entry.interest_payment, Decimal::ZERO);
        assert_eq!(entry.principal_payment, dec!(83.33));
    }
    assert_eq!(out.schedule[11].principal_payment, dec!(83.37));
    assert_eq!(out.summary.total_principal, dec!(1000));
}

#[test]
fn test_zero_rate_monthly_entry_count_matches_term() {
    for years in [1, 5, 25, 30] {
        let loan = params(dec!(123456.78), Decimal::ZERO, years, PaymentFrequency::Monthly);
        let schedule = schedule_for(&loan);
        assert_eq!(schedule.len() as u32, 12 * years);
        assert!(schedule.iter().all(|e| e.interest_payment.is_zero()));
    }
}

#[test]
fn test_zero_rate_upward_rounded_payment_ends_early() {
    // 100 / 360 = 0.2777... rounds up to 0.28.
    let loan = params(dec!(100), Decimal::ZERO, 30, PaymentFrequency::Monthly);
    let schedule = schedule_for(&loan);
    assert_eq!(schedule.len(), 358);
    assert_eq!(schedule[356].periodic_payment, dec!(0.28));
    assert_eq!(schedule[357].periodic_payment, dec!(0.04));
}

#[test]
fn test_zero_rate_weekly_final_payment_stays_small() {
    let cases = [
        (PaymentFrequency::Weekly, dec!(0.06), 1666, dec!(0.10)),
        (PaymentFrequency::AcceleratedWeekly, dec!(0.07), 1429, dec!(0.04)),
    ];
    for (frequency, nominal, entries, last) in cases {
        let out = analyze_amortization(&params(dec!(100), Decimal::ZERO, 30, frequency))
            .unwrap()
            .result;
        assert_eq!(out.periodic_payment, nominal, "{frequency}");
        assert_eq!(out.schedule.len(), entries, "{frequency}");
        assert_eq!(out.summary.final_payment, last, "{frequency}");
        assert!(out.summary.final_payment < nominal * dec!(2), "{frequency}");
        assert_eq!(out.summary.total_principal, dec!(100));
    }
}

#[test]
fn test_accelerated_pays_off_sooner() {
    let base = |f| params(dec!(300000), dec!(0.05), 25, f);
    let monthly = analyze_amortization(&base(PaymentFrequency::Monthly)).unwrap().result;
    let biweekly = analyze_amortization(&base(PaymentFrequency::BiWeekly)).unwrap().result;
    let acc_biweekly = analyze_amortization(&base(PaymentFrequency::AcceleratedBiWeekly))
        .unwrap()
        .result;
    let weekly = analyze_amortization(&base(PaymentFrequency::Weekly)).unwrap().result;
    let acc_weekly = analyze_amortization(&base(PaymentFrequency::AcceleratedWeekly))
        .unwrap()
        .result;

    assert!(acc_biweekly.schedule.len() < biweekly.schedule.len());
    assert!(acc_weekly.schedule.len() < weekly.schedule.len());
    assert!(acc_biweekly.summary.total_interest < biweekly.summary.total_interest);

    // Non-accelerated cadences track the monthly term in calendar time.
    assert!((biweekly.summary.payoff_years - monthly.summary.payoff_years).abs() < dec!(0.5));
    assert!((weekly.summary.payoff_years - monthly.summary.payoff_years).abs() < dec!(0.5));
}

// ===========================================================================
// Errors and extras
// ===========================================================================

#[test]
fn test_invalid_inputs_rejected_up_front() {
    let cases = [
        (params(Decimal::ZERO, dec!(0.05), 25, PaymentFrequency::Monthly), "principal"),
        (params(dec!(-5), dec!(0.05), 25, PaymentFrequency::Monthly), "principal"),
        (params(dec!(1000), dec!(-0.01), 25, PaymentFrequency::Monthly), "quoted_interest_rate"),
        (
            params(dec!(300000), dec!(1000000000000000), 25, PaymentFrequency::Monthly),
            "quoted_interest_rate",
        ),
        (params(dec!(1000), dec!(0.05), 0, PaymentFrequency::Monthly), "amortization_period"),
    ];
    for (loan, expected_field) in cases {
        match calculate_amortization_schedule(&loan) {
            Err(MortgageError::InvalidInput { field, .. }) => assert_eq!(field, expected_field),
            other => panic!("Expected InvalidInput for {expected_field}, got {other:?}"),
        }
    }
}

#[test]
fn test_underpaying_terms_are_non_convergent() {
    let terms = ScheduleTerms {
        principal: dec!(300000),
        periodic_rate: dec!(0.004),
        periodic_payment: dec!(1000),
        payment_frequency: PaymentFrequency::Monthly,
        amortization_period: 25,
        first_payment_date: None,
    };
    assert!(matches!(
        generate_schedule(terms),
        Err(MortgageError::NonConvergent { .. })
    ));
}

#[test]
fn test_payment_rounding_to_zero_is_non_convergent() {
    // 1 / 360 rounds to a 0.00 payment.
    let loan = params(dec!(1), Decimal::ZERO, 30, PaymentFrequency::Monthly);
    match calculate_amortization_schedule(&loan) {
        Err(MortgageError::NonConvergent { iterations, remaining }) => {
            assert_eq!(iterations, 1);
            assert_eq!(remaining, dec!(1));
        }
        other => panic!("Expected NonConvergent, got {other:?}"),
    }
}

#[test]
fn test_lazy_iterator_matches_eager_schedule() {
    let loan = params(dec!(250000), dec!(0.0525), 20, PaymentFrequency::BiWeekly);
    let eager = schedule_for(&loan);
    let lazy: Vec<_> = ScheduleIter::new(ScheduleTerms::from_parameters(&loan).unwrap())
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(eager, lazy);
}

#[test]
fn test_first_payment_date_propagates() {
    let loan = params(dec!(1000), Decimal::ZERO, 1, PaymentFrequency::AcceleratedWeekly)
        .with_first_payment_date(NaiveDate::from_ymd_opt(2025, 3, 3).unwrap());
    let schedule = schedule_for(&loan);
    assert_eq!(schedule[0].payment_date, NaiveDate::from_ymd_opt(2025, 3, 3));
    assert_eq!(schedule[4].payment_date, NaiveDate::from_ymd_opt(2025, 3, 31));

    let undated = schedule_for(&params(dec!(1000), Decimal::ZERO, 1, PaymentFrequency::Monthly));
    let json = serde_json::to_value(&undated[0]).unwrap();
    assert!(json.get("payment_date").is_none());
}
