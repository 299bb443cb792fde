//! `debt_payoff` is a Rust library for simulating debt repayment plans.
//!
//! It provides tools to calculate and compare month-by-month payoff schedules
//! using the two most common repayment strategies:
//! - **Avalanche**: targets the debt with the highest interest rate first,
//!   minimizing the total interest paid over the life of the plan.
//! - **Snowball**: targets the debt with the lowest balance first, producing
//!   early payoffs that build momentum.
//!
//! Minimum payments are kept up on every open debt, and the moment a debt is
//! cleared its minimum payment rolls into the extra-payment pool for the
//! remaining debts.
//!
//! ## Usage
//!
//! Add `debt_payoff` to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! debt_payoff = "0.2.0"
//! chrono = "0.4"
//! rust_decimal = "1.39.0"
//! rust_decimal_macros = "1.39.0"
//! ```
//!
//! Then, use the `calculate_debt_payoff` function to get the results for both
//! strategies:
//!
//! ```rust
//! use debt_payoff::{calculate_debt_payoff, DebtPayoffInput, DebtRecord};
//! use chrono::NaiveDate;
//! use rust_decimal_macros::dec;
//!
//! fn main() {
//!     let input = DebtPayoffInput {
//!         debts: vec![
//!             DebtRecord {
//!                 id: "card-1".to_string(),
//!                 name: "Credit Card".to_string(),
//!                 category: "credit_card".to_string(),
//!                 current_balance: dec!(4500),
//!                 interest_rate: Some(dec!(19.9)),
//!                 minimum_payment: Some(dec!(90)),
//!             },
//!             DebtRecord {
//!                 id: "loan-1".to_string(),
//!                 name: "Car Loan".to_string(),
//!                 category: "loan".to_string(),
//!                 current_balance: dec!(12000),
//!                 interest_rate: Some(dec!(6.5)),
//!                 minimum_payment: Some(dec!(250)),
//!             },
//!         ],
//!         extra_monthly_payment: dec!(200),
//!         start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
//!     };
//!
//!     match calculate_debt_payoff(input) {
//!         Ok(result) => {
//!             if let Some(avalanche) = &result.avalanche_strategy {
//!                 println!("Avalanche months:   {}", avalanche.total_months);
//!                 println!("Avalanche interest: {:.2}", avalanche.total_interest_paid);
//!                 println!("Debt free on:       {}", avalanche.debt_free_date);
//!             }
//!             println!("Recommended: {:?}", result.recommended_strategy);
//!             println!("Potential savings: {:.2}", result.potential_savings);
//!         }
//!         Err(e) => {
//!             eprintln!("Error calculating payoff plan: {}", e);
//!         }
//!     }
//! }
//! ```

use serde::{Serialize, Deserialize};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use chrono::{Months, NaiveDate};

/// Hard stop for the simulation loop, in months (30 years).
const MONTH_CAP: u32 = 360;

/// Interest savings above which avalanche is recommended over snowball.
/// Below it, the momentum of clearing small balances first wins out.
const RECOMMENDATION_THRESHOLD: Decimal = dec!(100);

/// A raw debt record as stored by the hosting application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebtRecord {
    /// Opaque identifier, unique within the set.
    pub id: String,
    /// Display name, passed through unchanged.
    pub name: String,
    /// Display category, passed through unchanged.
    pub category: String,
    /// Current outstanding principal.
    pub current_balance: Decimal,
    /// Nominal annual percentage rate (e.g., 19.9 for 19.9%). `None` means
    /// interest-free.
    pub interest_rate: Option<Decimal>,
    /// Monthly minimum payment. When missing it is defaulted to
    /// `max(balance * 0.02, 25)`.
    pub minimum_payment: Option<Decimal>,
}

/// Input parameters for the payoff calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebtPayoffInput {
    /// The debts to simulate; order is irrelevant.
    pub debts: Vec<DebtRecord>,
    /// Amount paid every month on top of all minimum payments.
    pub extra_monthly_payment: Decimal,
    /// Calendar date the simulation starts from, injected by the caller so
    /// results stay reproducible.
    pub start_date: NaiveDate,
}

/// A debt repayment strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Highest interest rate first.
    Avalanche,
    /// Lowest balance first.
    Snowball,
}

impl Strategy {
    /// Returns the human-readable description of the strategy.
    pub fn description(&self) -> &'static str {
        match self {
            Strategy::Avalanche => {
                "Pay off debts with the highest interest rate first to minimize total interest paid."
            }
            Strategy::Snowball => {
                "Pay off debts with the lowest balance first to build momentum with early wins."
            }
        }
    }
}

/// The simulated payoff of a single debt under one strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebtPayoffItem {
    /// Identifier of the source debt record.
    pub id: String,
    /// Display name, passed through unchanged.
    pub name: String,
    /// Display category, passed through unchanged.
    pub category: String,
    /// Balance at the start of the simulation.
    pub original_balance: Decimal,
    /// Annual percentage rate used in the simulation.
    pub interest_rate: Decimal,
    /// Actual or defaulted monthly minimum payment.
    pub minimum_payment: Decimal,
    /// Months until the debt reached zero balance; 0 when the debt was never
    /// paid off within the simulation cap.
    pub months_to_payoff: u32,
    /// Interest accrued on this debt over the life of the simulation.
    pub total_interest_paid: Decimal,
    /// Calendar date of the payoff (`start_date` plus `months_to_payoff`).
    pub payoff_date: NaiveDate,
    /// Rank assigned by the strategy's sort. This is the allocation priority,
    /// not the order of actual completion.
    pub payoff_order: u32,
}

/// The complete simulation result for one strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyResult {
    /// Which strategy produced this result.
    pub strategy: Strategy,
    /// Human-readable description of the strategy.
    pub description: String,
    /// Months until every debt is cleared (or the cap, when not converged).
    pub total_months: u32,
    /// Interest accrued across all debts over the whole simulation.
    pub total_interest_paid: Decimal,
    /// Calendar date at which the last debt reaches zero balance.
    pub debt_free_date: NaiveDate,
    /// `false` when the simulation hit the 360-month cap with debts still
    /// open; such debts report `months_to_payoff` of 0.
    pub converged: bool,
    /// Per-debt payoff items, sorted by actual completion time.
    pub payoff_order: Vec<DebtPayoffItem>,
}

/// The combined payoff calculation result for a debt portfolio.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebtPayoffResult {
    /// Sum of all current balances.
    pub total_debt: Decimal,
    /// Sum of all actual-or-defaulted minimum payments.
    pub total_minimum_payments: Decimal,
    /// Arithmetic mean of the interest rates above zero; 0 when none.
    pub average_interest_rate: Decimal,
    /// Highest interest rate across all debts, zero-rate debts included.
    pub highest_interest_rate: Decimal,
    /// Lowest balance across all debts.
    pub lowest_balance: Decimal,
    /// Number of input debts.
    pub debts_count: usize,
    /// Avalanche simulation; `None` when the input set is empty.
    pub avalanche_strategy: Option<StrategyResult>,
    /// Snowball simulation; `None` when the input set is empty.
    pub snowball_strategy: Option<StrategyResult>,
    /// The strategy picked by the interest-savings rule.
    pub recommended_strategy: Strategy,
    /// Snowball total interest minus avalanche total interest. Negative when
    /// snowball happens to accrue less.
    pub potential_savings: Decimal,
}

/// Returns the minimum payment used for a debt that does not specify one.
///
/// The default is 2% of the balance with a floor of 25, so near-zero balances
/// still get a meaningful payment.
pub fn default_minimum_payment(balance: Decimal) -> Decimal {
    return (balance * dec!(0.02)).max(dec!(25));
}

/// Converts a nominal annual percentage rate to the monthly decimal rate.
///
/// This is the simple nominal division (e.g., 12% per year becomes exactly 1%
/// per month), not an effective compound-rate conversion.
pub fn monthly_rate(annual_rate: Decimal) -> Decimal {
    return annual_rate / dec!(100) / dec!(12);
}

/// Simulates the payoff of a debt portfolio under both strategies.
///
/// This is the main entry point of the library. It computes the portfolio
/// metrics, runs the avalanche and snowball simulations on independent
/// working copies of the debts, and picks a recommended strategy.
///
/// # Arguments
///
/// * `input` - A `DebtPayoffInput` with the debts, the extra monthly payment,
///   and the simulation start date.
///
/// # Errors
///
/// Returns an error if any balance or interest rate is negative, if a supplied
/// minimum payment is not positive, or if the extra payment is negative.
pub fn calculate_debt_payoff(input: DebtPayoffInput) -> Result<DebtPayoffResult, anyhow::Error> {
    validate_input(&input.debts, input.extra_monthly_payment)?;

    let totals = portfolio_totals(&input.debts);

    if input.debts.is_empty() {
        return Ok(DebtPayoffResult {
            total_debt: totals.total_debt,
            total_minimum_payments: totals.total_minimum_payments,
            average_interest_rate: totals.average_interest_rate,
            highest_interest_rate: totals.highest_interest_rate,
            lowest_balance: totals.lowest_balance,
            debts_count: 0,
            avalanche_strategy: None,
            snowball_strategy: None,
            recommended_strategy: Strategy::Avalanche,
            potential_savings: dec!(0),
        });
    }

    let avalanche = calculate_strategy(
        &input.debts,
        Strategy::Avalanche,
        input.extra_monthly_payment,
        input.start_date,
    )?;
    let snowball = calculate_strategy(
        &input.debts,
        Strategy::Snowball,
        input.extra_monthly_payment,
        input.start_date,
    )?;

    let potential_savings = snowball.total_interest_paid - avalanche.total_interest_paid;
    let recommended_strategy = recommend_strategy(&avalanche, &snowball);

    Ok(DebtPayoffResult {
        total_debt: totals.total_debt,
        total_minimum_payments: totals.total_minimum_payments.round_dp(2),
        average_interest_rate: totals.average_interest_rate,
        highest_interest_rate: totals.highest_interest_rate,
        lowest_balance: totals.lowest_balance,
        debts_count: input.debts.len(),
        avalanche_strategy: Some(avalanche),
        snowball_strategy: Some(snowball),
        recommended_strategy,
        potential_savings,
    })
}

/// Simulates the payoff of a debt portfolio under a single strategy.
///
/// # Arguments
///
/// * `debts` - The raw debt records; the slice is never mutated.
/// * `strategy` - The allocation strategy to simulate.
/// * `extra_monthly_payment` - Amount paid on top of all minimum payments.
/// * `start_date` - Calendar date the simulation starts from.
///
/// # Errors
///
/// Returns an error if any balance or interest rate is negative, if a supplied
/// minimum payment is not positive, or if the extra payment is negative.
pub fn calculate_strategy(
    debts: &[DebtRecord],
    strategy: Strategy,
    extra_monthly_payment: Decimal,
    start_date: NaiveDate,
) -> Result<StrategyResult, anyhow::Error> {
    validate_input(debts, extra_monthly_payment)?;

    let mut working = normalize_debts(debts);
    sort_for_strategy(&mut working, strategy);
    let outcome = run_simulation(working, extra_monthly_payment);

    Ok(build_strategy_result(strategy, outcome, start_date))
}

/// Picks a strategy from two completed simulations.
///
/// Avalanche is recommended when it saves more than 100 in interest over
/// snowball; otherwise snowball is recommended for the psychological momentum
/// of clearing small balances first.
pub fn recommend_strategy(avalanche: &StrategyResult, snowball: &StrategyResult) -> Strategy {
    let potential_savings = snowball.total_interest_paid - avalanche.total_interest_paid;

    if potential_savings > RECOMMENDATION_THRESHOLD {
        Strategy::Avalanche
    } else {
        Strategy::Snowball
    }
}

fn validate_input(debts: &[DebtRecord], extra_monthly_payment: Decimal) -> Result<(), anyhow::Error> {
    if extra_monthly_payment < dec!(0) {
        return Err(anyhow::anyhow!("Extra monthly payment cannot be negative."));
    }

    for debt in debts {
        if debt.current_balance < dec!(0) {
            return Err(anyhow::anyhow!("Balance of debt '{}' cannot be negative.", debt.id));
        }
        if let Some(interest_rate) = debt.interest_rate {
            if interest_rate < dec!(0) {
                return Err(anyhow::anyhow!(
                    "Interest rate of debt '{}' cannot be negative.",
                    debt.id
                ));
            }
        }
        if let Some(minimum_payment) = debt.minimum_payment {
            if minimum_payment <= dec!(0) {
                return Err(anyhow::anyhow!(
                    "Minimum payment of debt '{}' must be positive.",
                    debt.id
                ));
            }
        }
    }

    Ok(())
}

/// Mutable per-debt simulation state; one copy per input debt per run.
#[derive(Debug, Clone)]
struct WorkingDebt {
    id: String,
    name: String,
    category: String,
    balance: Decimal,
    original_balance: Decimal,
    interest_rate: Decimal,
    minimum_payment: Decimal,
    sort_rank: u32,
    paid_off: bool,
    payoff_month: u32,
    total_interest_paid: Decimal,
}

fn normalize_debts(debts: &[DebtRecord]) -> Vec<WorkingDebt> {
    debts
        .iter()
        .map(|debt| WorkingDebt {
            id: debt.id.clone(),
            name: debt.name.clone(),
            category: debt.category.clone(),
            balance: debt.current_balance,
            original_balance: debt.current_balance,
            interest_rate: debt.interest_rate.unwrap_or(dec!(0)),
            minimum_payment: debt
                .minimum_payment
                .unwrap_or_else(|| default_minimum_payment(debt.current_balance)),
            sort_rank: 0,
            // A zero balance is already paid off; its minimum payment never
            // enters any month's budget.
            paid_off: debt.current_balance <= dec!(0),
            payoff_month: 0,
            total_interest_paid: dec!(0),
        })
        .collect()
}

fn sort_for_strategy(debts: &mut [WorkingDebt], strategy: Strategy) {
    // Stable sorts, so ties retain input order.
    match strategy {
        Strategy::Avalanche => debts.sort_by(|a, b| b.interest_rate.cmp(&a.interest_rate)),
        Strategy::Snowball => debts.sort_by(|a, b| a.balance.cmp(&b.balance)),
    }

    for (position, debt) in debts.iter_mut().enumerate() {
        debt.sort_rank = position as u32 + 1;
    }
}

struct SimulationOutcome {
    debts: Vec<WorkingDebt>,
    total_months: u32,
    total_interest_paid: Decimal,
    converged: bool,
}

/// Runs the month-by-month payoff loop over one sorted list of working debts.
///
/// Each month, every open debt is charged interest and pays its minimum, then
/// the leftover budget goes to the first open debt in sort order - a single
/// target per month, never split. A cleared debt's minimum payment joins the
/// rolling extra pool starting the following month.
fn run_simulation(mut debts: Vec<WorkingDebt>, extra_payment: Decimal) -> SimulationOutcome {
    let mut month: u32 = 0;
    let mut total_interest_paid = dec!(0);
    let mut rolling_extra = extra_payment;

    while debts.iter().any(|debt| !debt.paid_off) && month < MONTH_CAP {
        month += 1;

        let minimums_due: Decimal = debts
            .iter()
            .filter(|debt| !debt.paid_off)
            .map(|debt| debt.minimum_payment)
            .sum();
        let mut available = minimums_due + rolling_extra;

        for debt in debts.iter_mut() {
            if debt.paid_off {
                continue;
            }

            let interest = debt.balance * monthly_rate(debt.interest_rate);
            debt.total_interest_paid += interest;
            total_interest_paid += interest;

            let payment = debt.minimum_payment.min(debt.balance);
            debt.balance -= payment;
            available -= payment;

            if debt.balance <= dec!(0) {
                debt.balance = dec!(0);
                debt.paid_off = true;
                debt.payoff_month = month;
                rolling_extra += debt.minimum_payment;
            } else {
                // Interest capitalizes only on debts that survive the month.
                debt.balance += interest;
            }
        }

        if available > dec!(0) {
            if let Some(target) = debts.iter_mut().find(|debt| !debt.paid_off) {
                let payment = available.min(target.balance);
                target.balance -= payment;

                if target.balance <= dec!(0) {
                    target.balance = dec!(0);
                    target.paid_off = true;
                    target.payoff_month = month;
                    rolling_extra += target.minimum_payment;
                }
            }
        }
    }

    let converged = debts.iter().all(|debt| debt.paid_off);

    SimulationOutcome {
        debts,
        total_months: month,
        total_interest_paid,
        converged,
    }
}

fn build_strategy_result(
    strategy: Strategy,
    outcome: SimulationOutcome,
    start_date: NaiveDate,
) -> StrategyResult {
    let mut payoff_order: Vec<DebtPayoffItem> = outcome
        .debts
        .iter()
        .map(|debt| DebtPayoffItem {
            id: debt.id.clone(),
            name: debt.name.clone(),
            category: debt.category.clone(),
            original_balance: debt.original_balance,
            interest_rate: debt.interest_rate,
            minimum_payment: debt.minimum_payment.round_dp(2),
            months_to_payoff: debt.payoff_month,
            total_interest_paid: debt.total_interest_paid.round_dp(2),
            payoff_date: start_date + Months::new(debt.payoff_month),
            payoff_order: debt.sort_rank,
        })
        .collect();

    // Display ordering by actual completion time, independent of the
    // strategy's allocation order. Stable, so ties keep sort-rank order.
    payoff_order.sort_by_key(|item| item.months_to_payoff);

    StrategyResult {
        strategy,
        description: strategy.description().to_string(),
        total_months: outcome.total_months,
        total_interest_paid: outcome.total_interest_paid.round_dp(2),
        debt_free_date: start_date + Months::new(outcome.total_months),
        converged: outcome.converged,
        payoff_order,
    }
}

struct PortfolioTotals {
    total_debt: Decimal,
    total_minimum_payments: Decimal,
    average_interest_rate: Decimal,
    highest_interest_rate: Decimal,
    lowest_balance: Decimal,
}

fn portfolio_totals(debts: &[DebtRecord]) -> PortfolioTotals {
    let total_debt: Decimal = debts.iter().map(|debt| debt.current_balance).sum();
    let total_minimum_payments: Decimal = debts
        .iter()
        .map(|debt| {
            debt.minimum_payment
                .unwrap_or_else(|| default_minimum_payment(debt.current_balance))
        })
        .sum();

    let positive_rates: Vec<Decimal> = debts
        .iter()
        .filter_map(|debt| debt.interest_rate)
        .filter(|rate| *rate > dec!(0))
        .collect();
    let average_interest_rate = if positive_rates.is_empty() {
        dec!(0)
    } else {
        let rate_sum: Decimal = positive_rates.iter().copied().sum();
        (rate_sum / Decimal::from(positive_rates.len() as u64)).round_dp(2)
    };

    let highest_interest_rate = debts
        .iter()
        .map(|debt| debt.interest_rate.unwrap_or(dec!(0)))
        .max()
        .unwrap_or(dec!(0));
    let lowest_balance = debts
        .iter()
        .map(|debt| debt.current_balance)
        .min()
        .unwrap_or(dec!(0));

    PortfolioTotals {
        total_debt,
        total_minimum_payments,
        average_interest_rate,
        highest_interest_rate,
        lowest_balance,
    }
}
