use serde::Serialize;

use crate::domain::Quest;

/// Paid/unpaid totals for a single quest.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuestSummary {
    pub income: f64,
    pub total_paid: f64,
    pub total_unpaid: f64,
    pub total_commitments: f64,
    /// Income minus every commitment, paid or not.
    pub remaining_after_all: f64,
    /// Income minus the commitments still to be paid.
    pub remaining_vs_unpaid: f64,
    /// Share of the committed total already paid, 0 when nothing is committed.
    pub percentage_paid: f64,
    pub commitment_count: usize,
    pub paid_count: usize,
}

impl QuestSummary {
    pub fn for_quest(quest: &Quest) -> Self {
        let (paid, unpaid): (Vec<_>, Vec<_>) = quest.commitments.iter().partition(|c| c.paid);
        let total_paid: f64 = paid.iter().map(|c| c.value).sum();
        let total_unpaid: f64 = unpaid.iter().map(|c| c.value).sum();
        let total_commitments = total_paid + total_unpaid;
        let percentage_paid = if total_commitments > 0.0 {
            total_paid / total_commitments * 100.0
        } else {
            0.0
        };
        Self {
            income: quest.income,
            total_paid,
            total_unpaid,
            total_commitments,
            remaining_after_all: quest.income - total_commitments,
            remaining_vs_unpaid: quest.income - total_unpaid,
            percentage_paid,
            commitment_count: quest.commitments.len(),
            paid_count: paid.len(),
        }
    }

    pub fn is_overcommitted(&self) -> bool {
        self.remaining_after_all < 0.0
    }
}

/// Totals across all active quests, plus collection counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct GlobalSummary {
    pub active_count: usize,
    pub archived_count: usize,
    pub total_income: f64,
    pub total_commitments: f64,
    pub total_paid: f64,
    pub total_unpaid: f64,
}

impl GlobalSummary {
    /// Entries of `active` whose id also appears in `archived` are not counted
    /// as active.
    pub fn from_collections(active: &[Quest], archived: &[Quest]) -> Self {
        let mut summary = GlobalSummary {
            archived_count: archived.len(),
            ..GlobalSummary::default()
        };
        for quest in active
            .iter()
            .filter(|quest| !archived.iter().any(|a| a.id == quest.id))
        {
            let totals = QuestSummary::for_quest(quest);
            summary.active_count += 1;
            summary.total_income += totals.income;
            summary.total_commitments += totals.total_commitments;
            summary.total_paid += totals.total_paid;
        }
        summary.total_unpaid = summary.total_commitments - summary.total_paid;
        summary
    }
}

pub struct SummaryService;

impl SummaryService {
    pub fn quest(quest: &Quest) -> QuestSummary {
        QuestSummary::for_quest(quest)
    }

    pub fn global(active: &[Quest], archived: &[Quest]) -> GlobalSummary {
        GlobalSummary::from_collections(active, archived)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Commitment;

    fn quest_with(id: &str, income: f64, commitments: &[(f64, bool)]) -> Quest {
        let mut quest = Quest::new(id, id, 0);
        quest.income = income;
        for (index, (value, paid)) in commitments.iter().enumerate() {
            let mut commitment = Commitment::new(format!("{id}-c{index}"), "Item", *value);
            commitment.paid = *paid;
            quest.commitments.push(commitment);
        }
        quest
    }

    #[test]
    fn quest_summary_splits_paid_and_unpaid() {
        let quest = quest_with("july", 2000.0, &[(1000.0, true), (250.0, false)]);
        let summary = SummaryService::quest(&quest);
        assert_eq!(summary.total_paid, 1000.0);
        assert_eq!(summary.total_unpaid, 250.0);
        assert_eq!(summary.total_commitments, 1250.0);
        assert_eq!(summary.remaining_after_all, 750.0);
        assert_eq!(summary.remaining_vs_unpaid, 1750.0);
        assert_eq!(summary.percentage_paid, 80.0);
        assert_eq!(summary.paid_count, 1);
        assert!(!summary.is_overcommitted());
    }

    #[test]
    fn empty_quest_has_zero_percentage() {
        let summary = QuestSummary::for_quest(&quest_with("empty", 0.0, &[]));
        assert_eq!(summary.percentage_paid, 0.0);
        assert_eq!(summary.commitment_count, 0);
    }

    #[test]
    fn global_summary_counts_only_active_quests() {
        let active = vec![
            quest_with("a", 100.0, &[(40.0, true), (10.0, false)]),
            quest_with("b", 50.0, &[(60.0, false)]),
        ];
        let archived = vec![quest_with("old", 999.0, &[(1.0, true)])];
        let summary = SummaryService::global(&active, &archived);
        assert_eq!(summary.active_count, 2);
        assert_eq!(summary.archived_count, 1);
        assert_eq!(summary.total_income, 150.0);
        assert_eq!(summary.total_commitments, 110.0);
        assert_eq!(summary.total_paid, 40.0);
        assert_eq!(summary.total_unpaid, 70.0);
    }

    #[test]
    fn global_summary_skips_overlapping_entries() {
        let shared = quest_with("shared", 500.0, &[]);
        let summary = GlobalSummary::from_collections(&[shared.clone()], &[shared]);
        assert_eq!(summary.active_count, 0);
        assert_eq!(summary.total_income, 0.0);
    }
}
