//! Plain-text rendering of the view state

use crate::{types::Holding, view_state::ViewState};
use std::fmt;

/// Direction of the 24h change, used to pick a colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeDirection {
    Up,
    Down,
}

impl ChangeDirection {
    /// An absent change counts as up
    pub fn of(change_24h_percent: Option<f64>) -> Self {
        if change_24h_percent.unwrap_or(0.0) >= 0.0 {
            ChangeDirection::Up
        } else {
            ChangeDirection::Down
        }
    }

    /// ANSI colour escape for this direction
    pub fn ansi_color(&self) -> &'static str {
        match self {
            ChangeDirection::Up => "\x1b[32m",
            ChangeDirection::Down => "\x1b[31m",
        }
    }
}

const ANSI_RESET: &str = "\x1b[0m";

/// Formats a USD amount as `$1,234.56`
pub fn format_usd(amount: f64) -> String {
    if !amount.is_finite() {
        return format!("${}", amount);
    }

    let fixed = format!("{:.2}", amount.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && fixed.chars().any(|c| c != '0' && c != '.') {
        "-"
    } else {
        ""
    };
    format!("{}${}.{}", sign, grouped, frac_part)
}

/// Formats the 24h change as `+1.23%`, an absent change renders as `+0.00%`
pub fn format_change(change_24h_percent: Option<f64>) -> String {
    let change = change_24h_percent.unwrap_or(0.0);
    let sign = if change >= 0.0 { "+" } else { "" };
    format!("{}{:.2}%", sign, change)
}

/// Text view of the dashboard
///
/// With `color` set, the 24h change is wrapped in ANSI colour codes.
pub struct DashboardView<'a> {
    pub state: &'a ViewState,
    pub holding: &'a Holding,
    pub asset_label: &'a str,
    pub color: bool,
}

impl fmt::Display for DashboardView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = self.asset_label;
        writeln!(f, "{} Dashboard", label)?;
        writeln!(f, "Live {} price & your position", label)?;
        writeln!(f)?;

        if self.state.loading {
            writeln!(f, "Loading…")?;
        }

        if let Some(error) = &self.state.error {
            writeln!(f, "Error: {}", error)?;
        }

        let Some(quote) = self.state.quote.as_ref() else {
            return Ok(());
        };
        let Some(price) = quote.value_usd else {
            return Ok(());
        };

        let change = format_change(quote.change_24h_percent);
        let change = if self.color {
            let direction = ChangeDirection::of(quote.change_24h_percent);
            format!("{}{}{}", direction.ansi_color(), change, ANSI_RESET)
        } else {
            change
        };

        let position = self
            .state
            .position_value_usd(self.holding)
            .map(format_usd)
            .unwrap_or_else(|| "—".to_string());

        writeln!(f, "Current {} Price: {}", label, format_usd(price))?;
        writeln!(f, "24h: {}", change)?;
        writeln!(f, "{} owned: {}", label, self.holding.asset_amount)?;
        writeln!(f, "Value: {}", position)
    }
}

/// Renders the whole dashboard as text
pub fn render_text(state: &ViewState, holding: &Holding, asset_label: &str, color: bool) -> String {
    DashboardView {
        state,
        holding,
        asset_label,
        color,
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PriceQuote;

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(0.0), "$0.00");
        assert_eq!(format_usd(9000.0), "$9,000.00");
        assert_eq!(format_usd(1234567.891), "$1,234,567.89");
        assert_eq!(format_usd(999.999), "$1,000.00");
        assert_eq!(format_usd(-42.5), "-$42.50");
        assert_eq!(format_usd(-0.001), "$0.00");
    }

    #[test]
    fn test_format_change() {
        assert_eq!(format_change(Some(2.345)), "+2.35%");
        assert_eq!(format_change(Some(-1.5)), "-1.50%");
        assert_eq!(format_change(None), "+0.00%");
    }

    #[test]
    fn test_change_direction() {
        assert_eq!(ChangeDirection::of(Some(0.0)), ChangeDirection::Up);
        assert_eq!(ChangeDirection::of(None), ChangeDirection::Up);
        assert_eq!(ChangeDirection::of(Some(-0.1)), ChangeDirection::Down);
    }

    #[test]
    fn test_render_loading() {
        let text = render_text(&ViewState::new(), &Holding::new(4.5), "ETH", false);
        assert!(text.contains("Loading…"));
        assert!(!text.contains("Value:"));
    }

    #[test]
    fn test_render_quote_with_error_banner() {
        let mut state = ViewState::new();
        state.on_success(PriceQuote::new(Some(2000.0), Some(-3.2)));
        state.on_failure("Network error");

        let text = render_text(&state, &Holding::new(4.5), "ETH", false);
        assert!(!text.contains("Loading…"));
        assert!(text.contains("Error: Network error"));
        assert!(text.contains("Current ETH Price: $2,000.00"));
        assert!(text.contains("24h: -3.20%"));
        assert!(text.contains("ETH owned: 4.5"));
        assert!(text.contains("Value: $9,000.00"));
    }

    #[test]
    fn test_render_without_price_hides_position() {
        let mut state = ViewState::new();
        state.on_success(PriceQuote::new(None, None));
        let view = DashboardView {
            state: &state,
            holding: &Holding::new(4.5),
            asset_label: "ETH",
            color: false,
        };
        let text = view.to_string();
        assert!(text.starts_with("ETH Dashboard\n"));
        assert!(!text.contains("Loading…"));
        assert!(!text.contains("Value:"));
    }

    #[test]
    fn test_render_colored_change() {
        let mut state = ViewState::new();
        state.on_success(PriceQuote::new(Some(2000.0), Some(1.0)));
        let text = render_text(&state, &Holding::new(1.0), "ETH", true);
        assert!(text.contains("\x1b[32m+1.00%\x1b[0m"));
    }
}
