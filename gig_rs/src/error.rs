use crate::{BandId, DateKey, EventId, MemberId};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no availability data for member `{member_id}`")]
    MissingAvailabilityData { member_id: MemberId },

    #[error("invalid date key `{0}`, expected yyyy-MM-dd")]
    InvalidDateKey(String),

    #[error("band `{0}` not found")]
    BandNotFound(BandId),

    #[error("member `{0}` not found")]
    MemberNotFound(MemberId),

    #[error("member `{0}` is not on the band roster")]
    NotOnRoster(MemberId),

    #[error("invalid band: {0}")]
    InvalidBand(String),

    #[error("invalid member: {0}")]
    InvalidMember(String),

    #[error("invalid event: {0}")]
    InvalidEvent(String),

    #[error("date {0} is not bookable")]
    DateNotBookable(DateKey),

    #[error("event `{0}` not found")]
    EventNotFound(EventId),

    #[error("invalid email address")]
    InvalidEmail,

    #[error("password must be at least 6 characters")]
    WeakPassword,

    #[error("email address is already in use")]
    EmailAlreadyInUse,

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("not signed in")]
    NotSignedIn,

    #[error("store unavailable: {0}")]
    Store(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Url(#[from] url::ParseError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
