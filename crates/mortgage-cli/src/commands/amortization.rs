use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::time::Instant;
use tracing::debug;

use mortgage_core::amortization::rates::convert_rates;
use mortgage_core::amortization::{
    self, AmortizationScheduleParameters, ComparisonInput, PaymentFrequency,
};
use mortgage_core::with_metadata;

use crate::input;

/// Loan terms shared by `schedule` and `payment`
#[derive(Args)]
pub struct LoanArgs {
    /// Loan principal (e.g. 300000)
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Quoted annual rate, compounded semi-annually (e.g. 0.05 for 5%)
    #[arg(long, alias = "quoted-rate")]
    pub rate: Option<Decimal>,

    /// Amortization period in years
    #[arg(long, default_value = "25")]
    pub years: u32,

    /// monthly, accelerated-bi-weekly, bi-weekly, accelerated-weekly or weekly
    #[arg(long, default_value = "monthly")]
    pub frequency: PaymentFrequency,

    /// Date of the first payment (YYYY-MM-DD); dates every entry
    #[arg(long)]
    pub first_payment_date: Option<NaiveDate>,

    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for rate conversion
#[derive(Args)]
pub struct RatesArgs {
    /// Quoted annual rate, compounded semi-annually
    #[arg(long, alias = "quoted-rate")]
    pub rate: Decimal,

    /// Payment frequency for the periodic rate
    #[arg(long, default_value = "monthly")]
    pub frequency: PaymentFrequency,
}

/// Arguments for frequency comparison
#[derive(Args)]
pub struct CompareArgs {
    /// Loan principal
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Quoted annual rate, compounded semi-annually
    #[arg(long, alias = "quoted-rate")]
    pub rate: Option<Decimal>,

    /// Amortization period in years
    #[arg(long, default_value = "25")]
    pub years: u32,

    /// Path to JSON or YAML input file with principal, rate and period
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_schedule(args: LoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let params = resolve_loan(args)?;
    let result = amortization::analyze_amortization(&params)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_payment(args: LoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let params = resolve_loan(args)?;
    let result = amortization::payment_quote(&params)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_rates(args: RatesArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    amortization::validate_quoted_rate(args.rate)?;
    let rates = convert_rates(args.rate, args.frequency);
    let assumptions = json!({
        "quoted_interest_rate": args.rate,
        "payment_frequency": args.frequency,
        "compounding": "semi-annual",
    });
    let elapsed = start.elapsed().as_micros() as u64;
    let result = with_metadata(
        "Quoted to effective rate conversion",
        &assumptions,
        Vec::new(),
        elapsed,
        rates,
    );
    Ok(serde_json::to_value(result)?)
}

pub fn run_compare(args: CompareArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let cmp_input: ComparisonInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        ComparisonInput {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            quoted_interest_rate: args
                .rate
                .ok_or("--rate is required (or provide --input)")?,
            amortization_period: args.years,
        }
    };
    let result = amortization::compare_frequencies(&cmp_input)?;
    Ok(serde_json::to_value(result)?)
}

fn resolve_loan(args: LoanArgs) -> Result<AmortizationScheduleParameters, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        debug!(path = %path, "reading loan terms from file");
        return input::file::read_input(path);
    }
    if let Some(data) = input::stdin::read_stdin()? {
        debug!("read loan terms from stdin");
        return Ok(data);
    }
    Ok(AmortizationScheduleParameters {
        principal: args
            .principal
            .ok_or("--principal is required (or provide --input)")?,
        quoted_interest_rate: args
            .rate
            .ok_or("--rate is required (or provide --input)")?,
        amortization_period: args.years,
        payment_frequency: args.frequency,
        first_payment_date: args.first_payment_date,
    })
}
