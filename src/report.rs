//! Presentation of trial statistics
//!
//! Pure string rendering; the binary decides where the text goes.

use crate::domain::{
    format_currency, Balance, CurrencyCode, Parameters, TrialCount, TrialStatistics, Workload,
};
use crate::Result;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};

/// Number of outcomes listed when nothing else is configured
pub const DEFAULT_TOP_OUTCOMES: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

/// How a summary is rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    pub currency: CurrencyCode,
    pub top_outcomes: usize,
    pub format: ReportFormat,
}

/// One ranked outcome in a machine-readable report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutcomeEntry {
    pub balance: i64,
    pub formatted: String,
    pub count: u64,
}

/// Machine-readable summary of one scenario
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioReport {
    pub scenario: String,
    pub trials: u64,
    pub violations: u64,
    pub violation_rate: f64,
    pub elapsed_ms: u64,
    pub top_outcomes: Vec<OutcomeEntry>,
}

impl ScenarioReport {
    pub fn from_statistics(label: &str, stats: &TrialStatistics, options: &ReportOptions) -> Self {
        Self {
            scenario: label.to_string(),
            trials: stats.trials(),
            violations: stats.violations(),
            violation_rate: stats.violation_rate(),
            elapsed_ms: stats.elapsed().as_millis() as u64,
            top_outcomes: stats
                .top_outcomes(options.top_outcomes)
                .into_iter()
                .map(|(balance, count)| OutcomeEntry {
                    balance: balance.into_inner(),
                    formatted: format_currency(balance, &options.currency),
                    count,
                })
                .collect(),
        }
    }
}

/// Run parameters printed once before any scenario
pub fn render_preamble(
    params: &Parameters,
    workload: &Workload,
    trials: TrialCount,
    currency: &CurrencyCode,
) -> String {
    let start = Balance::from(params.start_balance);
    let withdraw = Balance::new(params.withdraw_amount.into_inner());
    format!(
        "start={} ({}), withdraw={} ({})\ntrials={}, workers={}, withdrawals/worker={}\n",
        start,
        format_currency(start, currency),
        withdraw,
        format_currency(withdraw, currency),
        trials,
        workload.workers,
        workload.withdrawals_per_worker,
    )
}

/// Human-readable summary: totals, violation rate, top outcomes
pub fn render_text(stats: &TrialStatistics, options: &ReportOptions) -> String {
    let mut out = String::new();
    match write_text(&mut out, stats, options) {
        Ok(()) => out,
        Err(fmt::Error) => String::new(),
    }
}

fn write_text(out: &mut String, stats: &TrialStatistics, options: &ReportOptions) -> fmt::Result {
    writeln!(out, "Trials: {}", stats.trials())?;
    writeln!(out, "Invariant broken (final < 0): {}", stats.violations())?;
    writeln!(out, "Broken rate: {:.6}%", stats.violation_percent())?;
    writeln!(out, "Time: {:.3?}", stats.elapsed())?;
    writeln!(out, "Top outcomes:")?;
    for (balance, count) in stats.top_outcomes(options.top_outcomes) {
        writeln!(
            out,
            "  {} ({} minor): {}",
            format_currency(balance, &options.currency),
            balance,
            count
        )?;
    }
    Ok(())
}

/// Pretty-printed JSON array with one entry per scenario
pub fn render_json(reports: &[ScenarioReport]) -> Result<String> {
    Ok(serde_json::to_string_pretty(reports)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(format: ReportFormat) -> ReportOptions {
        ReportOptions {
            currency: CurrencyCode::try_new("PLN").expect("valid currency"),
            top_outcomes: DEFAULT_TOP_OUTCOMES,
            format,
        }
    }

    fn naive_like_stats() -> TrialStatistics {
        let mut stats = TrialStatistics::new();
        for _ in 0..3 {
            stats.record(Balance::new(30_000));
        }
        stats.record(Balance::new(-40_000));
        stats
    }

    #[test]
    fn test_text_report_lines() {
        let text = render_text(&naive_like_stats(), &options(ReportFormat::Text));
        assert!(text.contains("Trials: 4\n"));
        assert!(text.contains("Invariant broken (final < 0): 1\n"));
        assert!(text.contains("Broken rate: 25.000000%\n"));
        assert!(text.contains("Top outcomes:\n"));

        let first = text.find("300.00 PLN (30000 minor): 3").expect("top outcome listed");
        let second = text.find("-400.00 PLN (-40000 minor): 1").expect("violation listed");
        assert!(first < second);
    }

    #[test]
    fn test_text_writer_propagates_success() {
        let stats = naive_like_stats();
        let options = options(ReportFormat::Text);
        let mut out = String::new();
        write_text(&mut out, &stats, &options).expect("writing into a String succeeds");
        assert_eq!(out, render_text(&stats, &options));
        assert_eq!(out.lines().count(), 7);
    }

    #[test]
    fn test_text_report_for_empty_statistics() {
        let text = render_text(&TrialStatistics::new(), &options(ReportFormat::Text));
        assert!(text.contains("Trials: 0\n"));
        assert!(text.contains("Broken rate: 0.000000%\n"));
        assert!(text.ends_with("Top outcomes:\n"));
    }

    #[test]
    fn test_top_outcomes_are_limited() {
        let mut stats = TrialStatistics::new();
        for balance in 0..10 {
            stats.record(Balance::new(balance));
        }
        let text = render_text(&stats, &options(ReportFormat::Text));
        assert_eq!(text.matches(" minor): ").count(), DEFAULT_TOP_OUTCOMES);
    }

    #[test]
    fn test_json_report() {
        let options = options(ReportFormat::Json);
        let report = ScenarioReport::from_statistics("naive", &naive_like_stats(), &options);
        let json = render_json(&[report]).expect("serializable");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
        let naive = &value[0];
        assert_eq!(naive["scenario"], "naive");
        assert_eq!(naive["trials"], 4);
        assert_eq!(naive["violations"], 1);
        assert_eq!(naive["violation_rate"], 0.25);
        assert_eq!(naive["top_outcomes"][0]["balance"], 30_000);
        assert_eq!(naive["top_outcomes"][0]["formatted"], "300.00 PLN");
        assert_eq!(naive["top_outcomes"][1]["count"], 1);
    }

    #[test]
    fn test_preamble() {
        let preamble = render_preamble(
            &Parameters::default(),
            &Workload::default(),
            TrialCount::new(10_000),
            &CurrencyCode::try_new("PLN").expect("valid currency"),
        );
        assert!(preamble.contains("start=100000 (1000.00 PLN), withdraw=70000 (700.00 PLN)"));
        assert!(preamble.contains("trials=10000, workers=2, withdrawals/worker=1"));
    }
}
