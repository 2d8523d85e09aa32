//! Aggregate counts over a set of checks.

use serde::Serialize;

use crate::model::{Category, Frequency, Role};
use crate::task::Task;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskStats {
    pub total: usize,
    pub completed_count: usize,
    pub approved_count: usize,
    pub completed_percent: f64,
    pub approved_percent: f64,
    pub by_role: Vec<RoleCount>,
    pub by_frequency: Vec<FrequencyCount>,
    pub by_category: Vec<CategoryCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleCount {
    pub role: Role,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrequencyCount {
    pub frequency: Frequency,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: Category,
    pub count: usize,
}

impl TaskStats {
    pub fn role_count(&self, role: Role) -> usize {
        self.by_role
            .iter()
            .find(|entry| entry.role == role)
            .map(|entry| entry.count)
            .unwrap_or(0)
    }

    pub fn frequency_count(&self, frequency: Frequency) -> usize {
        self.by_frequency
            .iter()
            .find(|entry| entry.frequency == frequency)
            .map(|entry| entry.count)
            .unwrap_or(0)
    }

    pub fn category_count(&self, category: Category) -> usize {
        self.by_category
            .iter()
            .find(|entry| entry.category == category)
            .map(|entry| entry.count)
            .unwrap_or(0)
    }
}

/// Every enum value is listed, zero counts included, in declaration order.
pub fn compute_stats(tasks: &[Task]) -> TaskStats {
    let total = tasks.len();
    let completed_count = tasks.iter().filter(|task| task.completed).count();
    let approved_count = tasks.iter().filter(|task| task.approved).count();

    let by_role = Role::ALL
        .into_iter()
        .map(|role| RoleCount {
            role,
            count: tasks.iter().filter(|task| task.owner_role == role).count(),
        })
        .collect();
    let by_frequency = Frequency::ALL
        .into_iter()
        .map(|frequency| FrequencyCount {
            frequency,
            count: tasks.iter().filter(|task| task.frequency == frequency).count(),
        })
        .collect();
    let by_category = Category::ALL
        .into_iter()
        .map(|category| CategoryCount {
            category,
            count: tasks.iter().filter(|task| task.category == category).count(),
        })
        .collect();

    TaskStats {
        total,
        completed_count,
        approved_count,
        completed_percent: percent(completed_count, total),
        approved_percent: percent(approved_count, total),
        by_role,
        by_frequency,
        by_category,
    }
}

fn percent(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (count as f64 / total as f64) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::visible_tasks;
    use crate::task::seed_tasks;

    #[test]
    fn seed_totals() {
        let stats = compute_stats(&seed_tasks());
        assert_eq!(stats.total, 7);
        assert_eq!(stats.completed_count, 3);
        assert_eq!(stats.approved_count, 1);
        assert_eq!(stats.role_count(Role::Employee), 3);
        assert_eq!(stats.role_count(Role::Supervisor), 3);
        assert_eq!(stats.role_count(Role::Manager), 1);
        assert_eq!(stats.frequency_count(Frequency::Once), 1);
        assert_eq!(stats.frequency_count(Frequency::Weekly), 3);
        assert_eq!(stats.category_count(Category::Hr), 2);
        assert_eq!(stats.category_count(Category::General), 0);
        assert_eq!(stats.by_category.len(), 6);
    }

    #[test]
    fn percentages_are_relative_to_total() {
        let visible = visible_tasks(&seed_tasks(), Role::Supervisor);
        let stats = compute_stats(&visible);
        assert_eq!(stats.total, 6);
        assert_eq!(stats.completed_count, 2);
        assert!((stats.completed_percent - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(stats.approved_percent, 0.0);
    }

    #[test]
    fn empty_set_reports_zero_percent() {
        let stats = compute_stats(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.completed_percent, 0.0);
        assert!(stats.by_role.iter().all(|entry| entry.count == 0));
    }
}
