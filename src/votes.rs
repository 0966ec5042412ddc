//! Vote tallying
//!
//! Each device holds at most one vote per app. The app's `votes` column is a
//! running counter adjusted by the delta of every vote mutation, so the
//! decision here must be applied exactly once per request (see
//! [`crate::store::cast_vote`]).

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Direction of a vote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteDirection {
    Upvote,
    Downvote,
}

impl VoteDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteDirection::Upvote => "upvote",
            VoteDirection::Downvote => "downvote",
        }
    }

    /// Contribution of a single vote in this direction to the counter
    pub fn weight(&self) -> i64 {
        match self {
            VoteDirection::Upvote => 1,
            VoteDirection::Downvote => -1,
        }
    }
}

impl fmt::Display for VoteDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejected vote direction literal
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid vote type '{0}'. Must be 'upvote' or 'downvote'")]
pub struct InvalidVoteDirection(pub String);

impl FromStr for VoteDirection {
    type Err = InvalidVoteDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upvote" => Ok(VoteDirection::Upvote),
            "downvote" => Ok(VoteDirection::Downvote),
            other => Err(InvalidVoteDirection(other.to_string())),
        }
    }
}

/// What a vote request does to the stored vote and the app counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOutcome {
    /// First vote from this device: insert a vote row
    Cast { delta: i64 },
    /// Same direction as the existing vote
    Unchanged,
    /// Existing vote flipped to the other direction
    Switched { delta: i64 },
}

impl VoteOutcome {
    /// Amount to add to the app's counter
    pub fn delta(&self) -> i64 {
        match self {
            VoteOutcome::Cast { delta } | VoteOutcome::Switched { delta } => *delta,
            VoteOutcome::Unchanged => 0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VoteOutcome::Cast { .. } => "cast",
            VoteOutcome::Unchanged => "unchanged",
            VoteOutcome::Switched { .. } => "switched",
        }
    }
}

/// Decide how a requested vote interacts with the device's prior vote.
///
/// A switch removes the old vote's weight and applies the new one in one
/// step, giving ±2.
pub fn decide(prior: Option<VoteDirection>, requested: VoteDirection) -> VoteOutcome {
    match prior {
        None => VoteOutcome::Cast {
            delta: requested.weight(),
        },
        Some(previous) if previous == requested => VoteOutcome::Unchanged,
        Some(previous) => VoteOutcome::Switched {
            delta: requested.weight() - previous.weight(),
        },
    }
}
