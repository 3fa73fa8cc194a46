//! # Challenge Catalog
//!
//! Built-in seed challenges and the policy for merging them with persisted
//! records at load time.

use super::entities::{Challenge, ChallengeOrigin, ChallengeStatus, Difficulty};
use shared_types::ChallengeId;
use std::collections::HashMap;

// 2025-01-10T00:00:00Z and 2025-01-05T00:00:00Z.
const WASTE_WARRIOR_COMPLETED_AT: u64 = 1_736_467_200_000;
const WATER_HERO_COMPLETED_AT: u64 = 1_736_035_200_000;

#[allow(clippy::too_many_arguments)]
fn seed(
    id: &str,
    title: &str,
    description: &str,
    category: &str,
    difficulty: Difficulty,
    reward_coins: u32,
    reward_xp: u32,
    target_duration: &str,
    icon: &str,
    progress: u8,
    completed_at: Option<u64>,
) -> Challenge {
    Challenge {
        id: ChallengeId::new(id),
        title: title.to_string(),
        description: description.to_string(),
        category: category.to_string(),
        difficulty,
        reward_coins,
        reward_xp,
        target_duration: target_duration.to_string(),
        icon: icon.to_string(),
        progress,
        status: if completed_at.is_some() {
            ChallengeStatus::Completed
        } else {
            ChallengeStatus::Active
        },
        origin: ChallengeOrigin::Seed,
        accepted_at: None,
        completed_at,
    }
}

/// The default challenges every profile starts with.
pub fn seed_challenges() -> Vec<Challenge> {
    vec![
        seed(
            "default-1",
            "Morning Solar Boost",
            "Use solar power for morning routine for 5 days straight",
            "Energy",
            Difficulty::Easy,
            100,
            150,
            "5 days",
            "☀️",
            60,
            None,
        ),
        seed(
            "default-2",
            "Green Commute Master",
            "Take public transport or bike to work for 2 weeks",
            "Transport",
            Difficulty::Medium,
            200,
            300,
            "14 days",
            "🚴‍♀️",
            85,
            None,
        ),
        seed(
            "default-3",
            "Waste Warrior",
            "Achieve zero food waste for a week",
            "Waste",
            Difficulty::Hard,
            150,
            250,
            "7 days",
            "♻️",
            100,
            Some(WASTE_WARRIOR_COMPLETED_AT),
        ),
        seed(
            "default-4",
            "Water Conservation Hero",
            "Reduce water usage by 30% for a month",
            "Water",
            Difficulty::Hard,
            250,
            400,
            "30 days",
            "💧",
            100,
            Some(WATER_HERO_COMPLETED_AT),
        ),
    ]
}

/// Whether `incoming` may overwrite `existing` during a merge.
///
/// A completed record is never replaced by a non-completed one.
pub fn should_replace(existing: &Challenge, incoming: &Challenge) -> bool {
    !(existing.is_completed() && !incoming.is_completed())
}

/// Merge seed defaults with persisted records.
///
/// Seed positions come first, then persisted-only records in persisted order.
/// On an id conflict the persisted record wins unless that would undo a
/// completion. Duplicate ids inside either input collapse to the first
/// occurrence (subject to the same completion guard).
pub fn merge_catalog(seed: Vec<Challenge>, persisted: Vec<Challenge>) -> Vec<Challenge> {
    let mut merged: Vec<Challenge> = Vec::with_capacity(seed.len() + persisted.len());
    let mut index: HashMap<ChallengeId, usize> = HashMap::new();

    for challenge in seed.into_iter().chain(persisted) {
        let challenge = challenge.normalized();
        match index.get(&challenge.id) {
            Some(&pos) => {
                if should_replace(&merged[pos], &challenge) {
                    merged[pos] = challenge;
                }
            }
            None => {
                index.insert(challenge.id.clone(), merged.len());
                merged.push(challenge);
            }
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(list: &[Challenge]) -> Vec<&str> {
        list.iter().map(|c| c.id.as_str()).collect()
    }

    fn user(id: &str) -> Challenge {
        let mut c = seed_challenges().remove(0);
        c.id = ChallengeId::new(id);
        c.origin = ChallengeOrigin::User;
        c.progress = 10;
        c
    }

    #[test]
    fn test_seed_catalog_shape() {
        let seeds = seed_challenges();
        assert_eq!(ids(&seeds), ["default-1", "default-2", "default-3", "default-4"]);
        assert_eq!(seeds.iter().filter(|c| c.is_completed()).count(), 2);
        assert!(seeds.iter().all(|c| c.origin == ChallengeOrigin::Seed));
        assert_eq!(seeds[1].reward_coins, 200);
        assert_eq!(seeds[3].reward_xp, 400);
    }

    #[test]
    fn test_merge_orders_seed_first() {
        let merged = merge_catalog(seed_challenges(), vec![user("u-2"), user("u-1")]);
        assert_eq!(
            ids(&merged),
            ["default-1", "default-2", "default-3", "default-4", "u-2", "u-1"]
        );
    }

    #[test]
    fn test_persisted_wins_on_conflict() {
        let mut saved = seed_challenges().remove(0);
        saved.progress = 90;
        let merged = merge_catalog(seed_challenges(), vec![saved]);
        assert_eq!(merged.len(), 4);
        assert_eq!(merged[0].progress, 90);
    }

    #[test]
    fn test_completed_seed_not_resurrected() {
        let mut stale = seed_challenges().remove(2);
        stale.status = ChallengeStatus::Active;
        stale.progress = 20;
        let merged = merge_catalog(seed_challenges(), vec![stale]);
        assert!(merged[2].is_completed());
        assert_eq!(merged[2].progress, 100);
    }

    #[test]
    fn test_persisted_completion_overrides_active_seed() {
        let mut done = seed_challenges().remove(0);
        done.status = ChallengeStatus::Completed;
        done.progress = 60;
        let merged = merge_catalog(seed_challenges(), vec![done]);
        assert!(merged[0].is_completed());
        assert_eq!(merged[0].progress, 100);
    }

    #[test]
    fn test_duplicate_persisted_ids_collapse() {
        let merged = merge_catalog(Vec::new(), vec![user("u-1"), user("u-1")]);
        assert_eq!(merged.len(), 1);
    }
}
