//! Community leaderboard ranking.
//!
//! Points are the likes an author has received on their live posts and
//! comments. Ranking uses standard competition order: equal points share a
//! rank and the following rank is skipped (1, 2, 2, 4).

use serde::Serialize;

use crate::types::DbId;

pub const DEFAULT_LEADERBOARD_LIMIT: i64 = 20;
pub const MAX_LEADERBOARD_LIMIT: i64 = 100;

/// Aggregated points for one author, as returned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthorPoints {
    pub user_id: DbId,
    pub points: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub user_id: DbId,
    pub points: i64,
}

/// Sort authors by points (ties by user id) and assign ranks, keeping the
/// first `limit` entries. Authors with zero points are omitted.
pub fn rank_authors(mut authors: Vec<AuthorPoints>, limit: usize) -> Vec<LeaderboardEntry> {
    authors.retain(|a| a.points > 0);
    authors.sort_by(|a, b| b.points.cmp(&a.points).then(a.user_id.cmp(&b.user_id)));

    let mut entries = Vec::with_capacity(authors.len().min(limit));
    let mut rank = 0u32;
    let mut prev_points = None;
    for (position, author) in authors.into_iter().take(limit).enumerate() {
        if prev_points != Some(author.points) {
            rank = position as u32 + 1;
            prev_points = Some(author.points);
        }
        entries.push(LeaderboardEntry {
            rank,
            user_id: author.user_id,
            points: author.points,
        });
    }
    entries
}
