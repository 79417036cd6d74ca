use std::{
    convert::Infallible,
    fmt::{self, Display, Formatter},
    str::FromStr,
};

/// Deployment and request status values the notifier reacts to.
pub mod status {
    pub const APPROVAL_PENDING: &str = "APPROVAL_PENDING";
    pub const LEASE_EXPIRED: &str = "LEASE_EXPIRED";
    pub const CREATE_FAILED: &str = "CREATE_FAILED";
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum EventType {
    CreateDeployment,
    UpdateDeployment,
    DestroyDeployment,
    ExpireNotification,
    Other(String),
}

impl EventType {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::CreateDeployment => "CREATE_DEPLOYMENT",
            Self::UpdateDeployment => "UPDATE_DEPLOYMENT",
            Self::DestroyDeployment => "DESTROY_DEPLOYMENT",
            Self::ExpireNotification => "EXPIRE_NOTIFICATION",
            Self::Other(other) => other,
        }
    }
}

impl FromStr for EventType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "CREATE_DEPLOYMENT" => Self::CreateDeployment,
            "UPDATE_DEPLOYMENT" => Self::UpdateDeployment,
            "DESTROY_DEPLOYMENT" => Self::DestroyDeployment,
            "EXPIRE_NOTIFICATION" => Self::ExpireNotification,
            other => Self::Other(other.to_string()),
        })
    }
}

impl Display for EventType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Hook point at which the action was subscribed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum EventTopic {
    RequestPre,
    RequestPost,
    ActionPre,
    Other(String),
}

impl EventTopic {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::RequestPre => "deployment.request.pre",
            Self::RequestPost => "deployment.request.post",
            Self::ActionPre => "deployment.action.pre",
            Self::Other(other) => other,
        }
    }
}

impl FromStr for EventTopic {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "deployment.request.pre" => Self::RequestPre,
            "deployment.request.post" => Self::RequestPost,
            "deployment.action.pre" => Self::ActionPre,
            other => Self::Other(other.to_string()),
        })
    }
}

impl Display for EventTopic {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// The lifecycle moments a notification is sent for.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EventKind {
    /// A create request was submitted; it may be waiting for approval.
    RequestReceived,
    /// A create or update request finished, successfully or not.
    RequestFinished,
    DeploymentDeleted,
    DeploymentExpired,
}

impl EventKind {
    /// Maps an (event type, topic) pair onto a notification moment.
    /// Unsupported pairs yield `None`.
    #[must_use]
    pub const fn classify(event_type: &EventType, topic: &EventTopic) -> Option<Self> {
        match (event_type, topic) {
            (EventType::CreateDeployment, EventTopic::RequestPre) => Some(Self::RequestReceived),
            (
                EventType::CreateDeployment | EventType::UpdateDeployment,
                EventTopic::RequestPost,
            ) => Some(Self::RequestFinished),
            (EventType::DestroyDeployment, EventTopic::RequestPost) => {
                Some(Self::DeploymentDeleted)
            }
            (EventType::ExpireNotification, EventTopic::ActionPre) => {
                Some(Self::DeploymentExpired)
            }
            _ => None,
        }
    }
}
