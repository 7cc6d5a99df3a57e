// =============================================================================
// Next Actions — conditional trigger / action suggestions
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::structure::MarketStructure;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::High => write!(f, "high"),
            Self::Medium => write!(f, "medium"),
            Self::Low => write!(f, "low"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NextAction {
    pub trigger: String,
    pub action: String,
    pub priority: Priority,
}

/// Everything the action planner looks at.
#[derive(Debug, Clone, Copy)]
pub struct ActionContext<'a> {
    pub price: f64,
    pub structure: MarketStructure,
    pub rsi: Option<f64>,
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,
    pub support: &'a [f64],
    pub resistance: &'a [f64],
    pub atr_stop: Option<f64>,
}

/// Build the ordered list of next actions.
///
/// Breakout and breakdown triggers escalate to `High` when they agree with
/// the detected structure; the protective stop is always `Low`.
pub fn plan_next_actions(ctx: &ActionContext<'_>) -> Vec<NextAction> {
    let mut actions = Vec::new();

    let nearest_resistance = ctx
        .resistance
        .iter()
        .copied()
        .filter(|&r| r > ctx.price)
        .min_by(f64::total_cmp);
    if let Some(level) = nearest_resistance {
        actions.push(NextAction {
            trigger: format!("Close above resistance {:.2}", level),
            action: "Breakout: consider entry, old resistance becomes support".to_string(),
            priority: aligned(ctx.structure == MarketStructure::Uptrend),
        });
    }

    let nearest_support = ctx
        .support
        .iter()
        .copied()
        .filter(|&s| s < ctx.price)
        .max_by(f64::total_cmp);
    if let Some(level) = nearest_support {
        actions.push(NextAction {
            trigger: format!("Close below support {:.2}", level),
            action: "Breakdown: reduce or exit the position".to_string(),
            priority: aligned(ctx.structure == MarketStructure::Downtrend),
        });
    }

    if let Some(rsi) = ctx.rsi {
        if rsi < ctx.rsi_oversold {
            actions.push(NextAction {
                trigger: format!("RSI recovers above {:.0}", ctx.rsi_oversold),
                action: "Mean-reversion entry on momentum turn".to_string(),
                priority: aligned(ctx.structure == MarketStructure::Uptrend),
            });
        } else if rsi > ctx.rsi_overbought {
            actions.push(NextAction {
                trigger: format!("RSI falls back below {:.0}", ctx.rsi_overbought),
                action: "Take partial profits".to_string(),
                priority: aligned(ctx.structure == MarketStructure::Downtrend),
            });
        }
    }

    if let Some(stop) = ctx.atr_stop {
        actions.push(NextAction {
            trigger: format!("Price trades below {:.2}", stop),
            action: "ATR stop hit: exit".to_string(),
            priority: Priority::Low,
        });
    }

    actions
}

fn aligned(with_structure: bool) -> Priority {
    if with_structure {
        Priority::High
    } else {
        Priority::Medium
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx<'a>(structure: MarketStructure, support: &'a [f64], resistance: &'a [f64]) -> ActionContext<'a> {
        ActionContext {
            price: 100.0,
            structure,
            rsi: Some(50.0),
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
            support,
            resistance,
            atr_stop: None,
        }
    }

    #[test]
    fn breakout_is_high_in_uptrend() {
        let actions = plan_next_actions(&ctx(MarketStructure::Uptrend, &[90.0], &[95.0, 104.0, 110.0]));
        assert_eq!(actions[0].trigger, "Close above resistance 104.00");
        assert_eq!(actions[0].priority, Priority::High);
        assert_eq!(actions[1].trigger, "Close below support 90.00");
        assert_eq!(actions[1].priority, Priority::Medium);
    }

    #[test]
    fn breakdown_is_high_in_downtrend() {
        let actions = plan_next_actions(&ctx(MarketStructure::Downtrend, &[92.0, 97.0], &[]));
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].trigger, "Close below support 97.00");
        assert_eq!(actions[0].priority, Priority::High);
    }

    #[test]
    fn levels_at_price_are_ignored() {
        let actions = plan_next_actions(&ctx(MarketStructure::RangeBound, &[100.0], &[100.0]));
        assert!(actions.is_empty());
    }

    #[test]
    fn rsi_extremes_and_stop() {
        let mut c = ctx(MarketStructure::RangeBound, &[], &[]);
        c.rsi = Some(85.0);
        c.atr_stop = Some(94.5);
        let actions = plan_next_actions(&c);
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0].action, "Take partial profits");
        assert_eq!(actions[1].trigger, "Price trades below 94.50");
        assert_eq!(actions[1].priority, Priority::Low);

        c.rsi = Some(20.0);
        let actions = plan_next_actions(&c);
        assert_eq!(actions[0].trigger, "RSI recovers above 30");
    }
}
