//! Swap requests and their lifecycle.
//!
//! A swap moves through a closed set of states. Permitted edges and the role
//! allowed to take each one live in a single table, [`required_role`], and
//! [`validate_transition`] is the only place that table is interpreted.
//!
//! ```text
//! pending ──receiver──▶ accepted ──participant──▶ completed
//!    │ └──receiver──▶ rejected
//!    └────requester──▶ cancelled
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Profile, SkillId, SkillSummary, SwapId, UserId, UserSummary};

/// Maximum length of the optional note sent with a swap request.
pub const SWAP_MESSAGE_MAX: usize = 500;

/// Lifecycle state of a swap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwapStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
    Cancelled,
    Completed,
}

impl SwapStatus {
    /// Every state, in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Accepted,
        Self::Rejected,
        Self::Cancelled,
        Self::Completed,
    ];

    /// Storage and wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }

    /// Whether no further transition can leave this state.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Rejected | Self::Cancelled | Self::Completed)
    }
}

impl fmt::Display for SwapStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when text does not name a [`SwapStatus`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown swap status: {0}")]
pub struct UnknownSwapStatus(pub String);

impl FromStr for SwapStatus {
    type Err = UnknownSwapStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownSwapStatus(s.to_owned()))
    }
}

/// Target states a caller may ask for. `pending` is never a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestedStatus {
    Accepted,
    Rejected,
    Cancelled,
    Completed,
}

impl RequestedStatus {
    /// Every requestable state.
    pub const ALL: [Self; 4] = [
        Self::Accepted,
        Self::Rejected,
        Self::Cancelled,
        Self::Completed,
    ];

    /// Parse the raw `status` field of an update request.
    ///
    /// # Examples
    /// ```
    /// use skillswap::domain::{RequestedStatus, SwapTransitionError};
    ///
    /// assert_eq!(RequestedStatus::parse(Some("accepted")), Ok(RequestedStatus::Accepted));
    /// assert_eq!(RequestedStatus::parse(Some("pending")), Err(SwapTransitionError::InvalidStatus));
    /// assert_eq!(RequestedStatus::parse(None), Err(SwapTransitionError::InvalidStatus));
    /// ```
    pub fn parse(raw: Option<&str>) -> Result<Self, SwapTransitionError> {
        match raw {
            Some("accepted") => Ok(Self::Accepted),
            Some("rejected") => Ok(Self::Rejected),
            Some("cancelled") => Ok(Self::Cancelled),
            Some("completed") => Ok(Self::Completed),
            _ => Err(SwapTransitionError::InvalidStatus),
        }
    }

    /// The state persisted when this request succeeds.
    pub const fn target(self) -> SwapStatus {
        match self {
            Self::Accepted => SwapStatus::Accepted,
            Self::Rejected => SwapStatus::Rejected,
            Self::Cancelled => SwapStatus::Cancelled,
            Self::Completed => SwapStatus::Completed,
        }
    }
}

impl fmt::Display for RequestedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.target().as_str())
    }
}

/// Who may take a given edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequiredRole {
    Receiver,
    Requester,
    /// Either the requester or the receiver.
    Participant,
}

impl RequiredRole {
    /// Whether `actor` satisfies this role.
    pub const fn permits(self, actor: ActorRole) -> bool {
        matches!(
            (self, actor),
            (Self::Receiver, ActorRole::Receiver)
                | (Self::Requester, ActorRole::Requester)
                | (
                    Self::Participant,
                    ActorRole::Requester | ActorRole::Receiver
                )
        )
    }

    const fn denial(self) -> SwapTransitionError {
        match self {
            Self::Receiver => SwapTransitionError::ReceiverOnly,
            Self::Requester => SwapTransitionError::RequesterOnly,
            Self::Participant => SwapTransitionError::ParticipantsOnly,
        }
    }
}

/// How the acting user relates to a swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActorRole {
    Requester,
    Receiver,
    Outsider,
}

impl ActorRole {
    /// Every relationship.
    pub const ALL: [Self; 3] = [Self::Requester, Self::Receiver, Self::Outsider];

    /// Classify `actor` against the participants of a swap.
    pub fn of(actor: &UserId, requester: &UserId, receiver: &UserId) -> Self {
        if actor == requester {
            Self::Requester
        } else if actor == receiver {
            Self::Receiver
        } else {
            Self::Outsider
        }
    }

    /// Whether the actor is one of the two participants.
    pub const fn is_participant(self) -> bool {
        !matches!(self, Self::Outsider)
    }
}

/// Role required to move from `from` to `to`, or `None` when no such edge
/// exists.
pub const fn required_role(from: SwapStatus, to: RequestedStatus) -> Option<RequiredRole> {
    match (from, to) {
        (SwapStatus::Pending, RequestedStatus::Accepted | RequestedStatus::Rejected) => {
            Some(RequiredRole::Receiver)
        }
        (SwapStatus::Pending, RequestedStatus::Cancelled) => Some(RequiredRole::Requester),
        (SwapStatus::Accepted, RequestedStatus::Completed) => Some(RequiredRole::Participant),
        _ => None,
    }
}

/// Reasons a status change is refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SwapTransitionError {
    #[error("Please provide a valid status")]
    InvalidStatus,
    #[error("Cannot change status to \"{to}\" from \"{from}\"")]
    NotPermitted {
        from: SwapStatus,
        to: RequestedStatus,
    },
    #[error("Only the receiver can accept or reject a swap request")]
    ReceiverOnly,
    #[error("Only the requester can cancel their own swap request")]
    RequesterOnly,
    #[error("Only participants can complete the swap.")]
    ParticipantsOnly,
}

impl SwapTransitionError {
    /// Whether the refusal is about who is asking rather than what is asked.
    pub const fn is_authorisation_failure(&self) -> bool {
        matches!(
            self,
            Self::ReceiverOnly | Self::RequesterOnly | Self::ParticipantsOnly
        )
    }
}

/// Decide whether `actor` may move a swap from `current` to `requested`.
///
/// The edge is looked up before the actor is checked, so asking for an edge
/// that does not exist is always reported as such regardless of who asks.
///
/// # Examples
/// ```
/// use skillswap::domain::{
///     validate_transition, ActorRole, RequestedStatus, SwapStatus, SwapTransitionError,
/// };
///
/// assert_eq!(
///     validate_transition(SwapStatus::Pending, RequestedStatus::Accepted, ActorRole::Receiver),
///     Ok(SwapStatus::Accepted),
/// );
/// assert_eq!(
///     validate_transition(SwapStatus::Pending, RequestedStatus::Accepted, ActorRole::Requester),
///     Err(SwapTransitionError::ReceiverOnly),
/// );
/// ```
pub fn validate_transition(
    current: SwapStatus,
    requested: RequestedStatus,
    actor: ActorRole,
) -> Result<SwapStatus, SwapTransitionError> {
    let role = required_role(current, requested).ok_or(SwapTransitionError::NotPermitted {
        from: current,
        to: requested,
    })?;
    if role.permits(actor) {
        Ok(requested.target())
    } else {
        Err(role.denial())
    }
}

/// Optional note attached to a swap request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SwapMessage(String);

impl SwapMessage {
    /// Validate a message. Blank input yields `None`.
    pub fn parse(raw: Option<&str>) -> Result<Option<Self>, SwapCreationError> {
        let Some(text) = raw.map(str::trim).filter(|text| !text.is_empty()) else {
            return Ok(None);
        };
        if text.chars().count() > SWAP_MESSAGE_MAX {
            return Err(SwapCreationError::MessageTooLong {
                max: SWAP_MESSAGE_MAX,
            });
        }
        Ok(Some(Self(text.to_owned())))
    }
}

impl AsRef<str> for SwapMessage {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Persisted swap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Swap {
    pub id: SwapId,
    pub requester: UserId,
    pub receiver: UserId,
    pub skill_offered: SkillId,
    pub skill_wanted: SkillId,
    pub status: SwapStatus,
    pub message: Option<SwapMessage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Swap {
    /// Relationship of `actor` to this swap.
    pub fn actor_role(&self, actor: &UserId) -> ActorRole {
        ActorRole::of(actor, &self.requester, &self.receiver)
    }

    /// The participant on the other side from `actor`, if `actor` takes part.
    pub fn counterpart_of(&self, actor: &UserId) -> Option<&UserId> {
        match self.actor_role(actor) {
            ActorRole::Requester => Some(&self.receiver),
            ActorRole::Receiver => Some(&self.requester),
            ActorRole::Outsider => None,
        }
    }
}

/// Swap proposal as submitted by the requester.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapProposal {
    pub receiver: UserId,
    pub skill_offered: SkillId,
    pub skill_wanted: SkillId,
    pub message: Option<String>,
}

/// Reasons a swap proposal is refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SwapCreationError {
    #[error("You cannot send a swap request to yourself")]
    SelfSwap,
    #[error("You do not offer the selected skill.")]
    RequesterLacksSkill,
    #[error("No user found with id: {id}")]
    ReceiverNotFound { id: UserId },
    #[error("The other user does not offer the selected skill.")]
    ReceiverLacksSkill,
    #[error("message must be at most {max} characters")]
    MessageTooLong { max: usize },
}

/// Check a proposal against both profiles, in the order the checks are
/// reported to the caller. Returns the validated message.
pub fn check_swap_preconditions(
    requester: &UserId,
    proposal: &SwapProposal,
    requester_profile: Option<&Profile>,
    receiver_profile: Option<&Profile>,
) -> Result<Option<SwapMessage>, SwapCreationError> {
    if *requester == proposal.receiver {
        return Err(SwapCreationError::SelfSwap);
    }
    if !requester_profile.is_some_and(|profile| profile.offers(&proposal.skill_offered)) {
        return Err(SwapCreationError::RequesterLacksSkill);
    }
    let receiver_profile = receiver_profile.ok_or_else(|| SwapCreationError::ReceiverNotFound {
        id: proposal.receiver.clone(),
    })?;
    if !receiver_profile.offers(&proposal.skill_wanted) {
        return Err(SwapCreationError::ReceiverLacksSkill);
    }
    SwapMessage::parse(proposal.message.as_deref())
}

/// Swap with participants and skills resolved for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapView {
    pub id: SwapId,
    pub requester: UserSummary,
    pub receiver: UserSummary,
    pub skill_offered: SkillSummary,
    pub skill_wanted: SkillSummary,
    pub status: SwapStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<SwapMessage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SwapView {
    /// Resolve a swap against loaded users and skills.
    ///
    /// Returns `None` when any reference is missing.
    pub fn assemble(swap: Swap, users: &[UserSummary], skills: &[SkillSummary]) -> Option<Self> {
        let user = |id: &UserId| users.iter().find(|user| user.id == *id).cloned();
        let skill = |id: &SkillId| skills.iter().find(|skill| skill.id == *id).cloned();
        Some(Self {
            requester: user(&swap.requester)?,
            receiver: user(&swap.receiver)?,
            skill_offered: skill(&swap.skill_offered)?,
            skill_wanted: skill(&swap.skill_wanted)?,
            id: swap.id,
            status: swap.status,
            message: swap.message,
            created_at: swap.created_at,
            updated_at: swap.updated_at,
        })
    }
}
