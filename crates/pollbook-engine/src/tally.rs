use pollbook_types::Poll;
use serde::Serialize;

/// One line of a poll's result breakdown.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TallyRow {
    pub text: String,
    pub votes: u64,
    /// Share of all votes, in percent, rounded to one decimal place.
    pub percent: f64,
}

/// Per-option results in option order.
///
/// With no votes cast every percentage is `0.0`.
pub fn tally(poll: &Poll) -> Vec<TallyRow> {
    let total = poll.total_votes();
    poll.options()
        .iter()
        .map(|option| TallyRow {
            text: option.text().to_string(),
            votes: option.votes(),
            percent: percent_of(option.votes(), total),
        })
        .collect()
}

fn percent_of(votes: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = votes as f64 / total as f64 * 100.0;
    (raw * 10.0).round() / 10.0
}
