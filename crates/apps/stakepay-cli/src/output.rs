//! Output formatting for CLI.

use colored::Colorize;
use num::Zero;
use serde::Serialize;
use stakepay_ops::DistributionStatus;
use stakepay_types::{
    serde_amount, Address, Amount, BlockNumber, Division, PlannedTransaction, TOKEN_DECIMALS,
};

/// Output format for CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Human => write!(f, "human"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Trait for renderable output.
pub trait Render {
    /// Render as human-readable string.
    fn render_human(&self) -> String;

    /// Render as JSON string.
    fn render_json(&self) -> String;

    /// Render in the specified format.
    fn render(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Human => self.render_human(),
            OutputFormat::Json => self.render_json(),
        }
    }
}

/// Format an amount of smallest units as whole tokens.
///
/// `1500000000000000000` becomes `1.5`; trailing zeros are dropped.
pub fn format_tokens(amount: &Amount) -> String {
    let unit = Amount::from(10u32).pow(TOKEN_DECIMALS);
    let whole = amount / &unit;
    let fraction = amount % &unit;
    if fraction.is_zero() {
        return whole.to_string();
    }
    let digits = format!(
        "{:0>width$}",
        fraction.to_string(),
        width = TOKEN_DECIMALS as usize
    );
    format!("{}.{}", whole, digits.trim_end_matches('0'))
}

fn format_window(window: (BlockNumber, BlockNumber)) -> String {
    format!("{}..={}", window.0, window.1)
}

// =============================================================================
// Output Types
// =============================================================================

/// Output for the division command.
#[derive(Debug, Serialize)]
pub struct DivisionOutput {
    pub delegate: Address,
    pub first_block: BlockNumber,
    pub last_block: BlockNumber,
    pub fraction_for_delegators: f64,
    #[serde(with = "serde_amount")]
    pub granularity: Amount,
    #[serde(with = "serde_amount")]
    pub total: Amount,
    pub division: Division,
}

impl Render for DivisionOutput {
    fn render_human(&self) -> String {
        let mut lines = vec![
            format!(
                "{} {}",
                "Division for blocks".bold(),
                format_window((self.first_block, self.last_block))
            ),
            format!(
                "{} {}",
                "Fraction for delegators:".bold(),
                self.fraction_for_delegators
            ),
            format!("{} {}", "Total:".bold(), format_tokens(&self.total)),
            format!(
                "{} {} {}",
                "Delegate:".bold(),
                self.delegate,
                format_tokens(&self.division.amount_for_delegate)
            ),
        ];
        if self.division.amounts_without_delegate.is_empty() {
            lines.push("No delegators".dimmed().to_string());
        } else {
            lines.push(format!(
                "{} ({})",
                "Delegators".bold(),
                self.division.amounts_without_delegate.len()
            ));
            for (delegator, amount) in &self.division.amounts_without_delegate {
                lines.push(format!("  {} {}", delegator, format_tokens(amount)));
            }
        }
        lines.join("\n")
    }

    fn render_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Output for the plan command.
#[derive(Debug, Serialize)]
pub struct PlanOutput {
    /// Window being paid, if any distribution is pending.
    pub window: Option<(BlockNumber, BlockNumber)>,
    /// Whether an incomplete distribution is resumed.
    pub resumed: bool,
    #[serde(with = "serde_amount")]
    pub total: Amount,
    pub transactions: Vec<PlannedTransaction>,
}

impl Render for PlanOutput {
    fn render_human(&self) -> String {
        let Some(window) = self.window else {
            return "Nothing to distribute".yellow().to_string();
        };
        let heading = if self.resumed {
            "Resuming distribution of blocks".yellow().bold()
        } else {
            "New distribution of blocks".green().bold()
        };

        let mut lines = vec![
            format!("{} {}", heading, format_window(window)),
            format!(
                "{} {} in {} transaction(s)",
                "Total:".bold(),
                format_tokens(&self.total),
                self.transactions.len()
            ),
        ];
        for tx in &self.transactions {
            lines.push(format!(
                "  #{} {} recipient(s), {}",
                tx.tx_index,
                tx.recipient_count(),
                format_tokens(&tx.total_amount)
            ));
        }
        lines.join("\n")
    }

    fn render_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Output for the status command.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct StatusOutput {
    pub status: DistributionStatus,
}

impl Render for StatusOutput {
    fn render_human(&self) -> String {
        let status = &self.status;
        let mut lines = vec![
            format!("{} {}", "Delegate:".bold(), status.delegate),
            format!(
                "{} {} (processed up to {}, current {})",
                "History from block:".bold(),
                status.starting_block,
                status.last_processed_block,
                status.current_block
            ),
        ];

        match &status.latest {
            None => lines.push("No distribution yet".dimmed().to_string()),
            Some(latest) => {
                let state = if latest.complete {
                    "complete".green()
                } else {
                    "in progress".yellow()
                };
                lines.push(format!(
                    "{} {} ({})",
                    "Latest window:".bold(),
                    format_window((latest.first_block, latest.last_block)),
                    state
                ));
                lines.push(format!(
                    "  Paid {} of {} recipient(s), {} of {} remaining",
                    latest.recipients_paid,
                    latest.recipients_paid + latest.recipients_remaining,
                    format_tokens(&latest.remaining_amount),
                    format_tokens(&latest.total_amount)
                ));
                lines.push(format!(
                    "  {} confirmed transaction(s), next index {}",
                    latest.confirmed_transactions, latest.next_tx_index
                ));
            }
        }

        match status.next_window {
            Some(window) => lines.push(format!(
                "{} {} (due at {})",
                "Next window:".bold(),
                format_window(window),
                status.next_due_time
            )),
            None => lines.push(format!("{} none", "Next window:".bold())),
        }
        lines.join("\n")
    }

    fn render_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn address(n: u8) -> Address {
        Address::parse(&format!("0x{:040x}", n)).unwrap()
    }

    #[test]
    fn test_format_tokens() {
        let token = Amount::from(10u32).pow(TOKEN_DECIMALS);
        assert_eq!(format_tokens(&Amount::zero()), "0");
        assert_eq!(format_tokens(&(token.clone() * 3u32)), "3");
        assert_eq!(
            format_tokens(&(token.clone() + token / 2u32)),
            "1.5"
        );
        assert_eq!(format_tokens(&Amount::from(1u32)), "0.000000000000000001");
    }

    #[test]
    fn test_division_output() {
        let mut amounts = BTreeMap::new();
        amounts.insert(address(1), Amount::from(300u32));
        let output = DivisionOutput {
            delegate: address(0xdd),
            first_block: 1,
            last_block: 10,
            fraction_for_delegators: 0.5,
            granularity: Amount::from(1u32),
            total: Amount::from(600u32),
            division: Division {
                amounts_without_delegate: amounts,
                amount_for_delegate: Amount::from(300u32),
            },
        };

        let human = output.render(OutputFormat::Human);
        assert!(human.contains("1..=10"));
        assert!(human.contains(address(1).as_str()));

        let json: serde_json::Value =
            serde_json::from_str(&output.render(OutputFormat::Json)).unwrap();
        assert_eq!(json["total"], "600");
        assert_eq!(json["division"]["amount_for_delegate"], "300");
    }

    #[test]
    fn test_empty_plan_output() {
        let output = PlanOutput {
            window: None,
            resumed: false,
            total: Amount::zero(),
            transactions: Vec::new(),
        };
        assert!(output
            .render(OutputFormat::Human)
            .contains("Nothing to distribute"));

        let json: serde_json::Value =
            serde_json::from_str(&output.render(OutputFormat::Json)).unwrap();
        assert!(json["window"].is_null());
    }
}
