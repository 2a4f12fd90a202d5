use serde::Serialize;
use utoipa::ToSchema;

use crate::status::{BudgetTier, LeadAction, Timeline};

pub const PHONE_POINTS: i32 = 15;
pub const BOOK_CALL_POINTS: i32 = 20;
pub const HOT_THRESHOLD: i32 = 70;
pub const WARM_THRESHOLD: i32 = 40;

/// Fields of a captured lead that feed the score.
#[derive(Debug, Clone, Default)]
pub struct LeadSignals<'a> {
    pub phone: Option<&'a str>,
    pub budget: Option<BudgetTier>,
    pub timeline: Option<Timeline>,
    pub description: Option<&'a str>,
    pub action: Option<LeadAction>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LeadTemperature {
    Hot,
    Warm,
    Cold,
}

pub fn budget_points(tier: BudgetTier) -> i32 {
    match tier {
        BudgetTier::Under5k => 5,
        BudgetTier::From5kTo10k => 10,
        BudgetTier::From10kTo25k => 20,
        BudgetTier::From25kTo50k => 25,
        BudgetTier::Over50k => 30,
    }
}

pub fn timeline_points(timeline: Timeline) -> i32 {
    match timeline {
        Timeline::Asap => 20,
        Timeline::OneMonth => 15,
        Timeline::OneToThreeMonths => 10,
        Timeline::ThreeToSixMonths => 5,
        Timeline::Flexible => 0,
    }
}

fn description_points(description: &str) -> i32 {
    match description.trim().chars().count() {
        n if n > 100 => 10,
        n if n > 50 => 5,
        _ => 0,
    }
}

pub fn score(signals: &LeadSignals<'_>) -> i32 {
    let mut total = 0;
    if signals.phone.is_some_and(|p| !p.trim().is_empty()) {
        total += PHONE_POINTS;
    }
    total += signals.budget.map(budget_points).unwrap_or(0);
    total += signals.timeline.map(timeline_points).unwrap_or(0);
    total += signals.description.map(description_points).unwrap_or(0);
    if signals.action == Some(LeadAction::BookCall) {
        total += BOOK_CALL_POINTS;
    }
    total
}

pub fn temperature(score: i32) -> LeadTemperature {
    if score >= HOT_THRESHOLD {
        LeadTemperature::Hot
    } else if score >= WARM_THRESHOLD {
        LeadTemperature::Warm
    } else {
        LeadTemperature::Cold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_lead_scores_zero() {
        let signals = LeadSignals::default();
        assert_eq!(score(&signals), 0);
        assert_eq!(temperature(0), LeadTemperature::Cold);
    }

    #[test]
    fn best_case_lead_is_hot() {
        let description = "x".repeat(150);
        let signals = LeadSignals {
            phone: Some("+1 555 0100"),
            budget: Some(BudgetTier::Over50k),
            timeline: Some(Timeline::Asap),
            description: Some(&description),
            action: Some(LeadAction::BookCall),
        };
        assert_eq!(score(&signals), 95);
        assert_eq!(temperature(score(&signals)), LeadTemperature::Hot);
    }

    #[test]
    fn blank_phone_and_short_description_earn_nothing() {
        let signals = LeadSignals {
            phone: Some("   "),
            description: Some("need a site"),
            budget: Some(BudgetTier::From10kTo25k),
            timeline: Some(Timeline::OneToThreeMonths),
            action: Some(LeadAction::EmailInfo),
        };
        assert_eq!(score(&signals), 30);
        assert_eq!(temperature(40), LeadTemperature::Warm);
    }
}
