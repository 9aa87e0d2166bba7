use mealshare_core::BADGE_COMMUNITY_LEADER;
use mealshare_core::BADGE_FIRST_TIMER;
use mealshare_core::BADGE_HELPING_HAND;
use mealshare_core::BADGE_SERVING_ROLE;
use mealshare_core::Count;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Badge {
    pub name: &'static str,
    pub description: &'static str,
}

impl Badge {
    const FIRST_TIMER: Self = Self {
        name: "First Timer",
        description: "Completed your first volunteer task",
    };
    const HELPING_HAND: Self = Self {
        name: "Helping Hand",
        description: "Completed 5 volunteer tasks",
    };
    const COMMUNITY_LEADER: Self = Self {
        name: "Community Leader",
        description: "Completed 10 volunteer tasks",
    };
    const FOOD_SERVER: Self = Self {
        name: "Food Server",
        description: "Served food at a completed event",
    };

    /// Badges earned by `tasks` completed tasks over the given completed roles.
    pub fn earned<'a, I>(tasks: Count, roles: I) -> Vec<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut badges = [
            (BADGE_FIRST_TIMER, Self::FIRST_TIMER),
            (BADGE_HELPING_HAND, Self::HELPING_HAND),
            (BADGE_COMMUNITY_LEADER, Self::COMMUNITY_LEADER),
        ]
        .into_iter()
        .filter(|(threshold, _)| tasks >= *threshold)
        .map(|(_, badge)| badge)
        .collect::<Vec<_>>();
        if roles.into_iter().any(|role| role == BADGE_SERVING_ROLE) {
            badges.push(Self::FOOD_SERVER);
        }
        badges
    }
}
