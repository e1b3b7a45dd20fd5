use redflag_types::{Aggregate, Percentages, Verdict, VoteCategory, Votes};

/// Derive totals, shares and the community verdict from raw tallies.
///
/// With no votes every share is 0 and the verdict is neutral at 0%. The
/// verdict is the first category, in red, green, neutral order, whose share
/// equals the maximum, so `10/10/0` reads as a red flag.
pub fn aggregate(votes: &Votes) -> Aggregate {
    let total = votes.total();

    if total == 0 {
        return Aggregate {
            total,
            percentages: Percentages::default(),
            majority: Verdict {
                category: VoteCategory::Neutral,
                percentage: 0.0,
            },
        };
    }

    let share = |count: u64| count as f64 / total as f64 * 100.0;
    let percentages = Percentages {
        red_flag: share(votes.red_flag),
        green_flag: share(votes.green_flag),
        neutral: share(votes.neutral),
    };

    let max = VoteCategory::ALL
        .iter()
        .map(|c| percentages.get(*c))
        .fold(f64::MIN, f64::max);

    let category = VoteCategory::ALL
        .into_iter()
        .find(|c| percentages.get(*c) == max)
        .unwrap_or(VoteCategory::Neutral);

    Aggregate {
        total,
        percentages,
        majority: Verdict {
            category,
            percentage: max,
        },
    }
}
