/// Represents the API version to target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiVersion {
    /// Discord HTTP API v10 (current)
    V10,
}

impl ApiVersion {
    const fn as_str(self) -> &'static str {
        match self {
            Self::V10 => "v10",
        }
    }
}

/// The only API version this crate targets. Every endpoint path is built
/// against it; the unversioned `/api/...` prefix is never used.
pub const API_VERSION: ApiVersion = ApiVersion::V10;

// --- URL Construction ---
/// Default host for all requests.
pub const DEFAULT_BASE_URL: &str = "https://discord.com";

/// Alias the platform resolves to the message created by the initial callback.
const ORIGINAL_MESSAGE: &str = "@original";

/// Represents the endpoints used to respond to an interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint<'a> {
    /// `POST /interactions/{id}/{token}/callback`
    InteractionCallback { id: &'a str, token: &'a str },
    /// `GET|PATCH|DELETE /webhooks/{application_id}/{token}/messages/@original`
    OriginalResponse {
        application_id: &'a str,
        token: &'a str,
    },
    /// `POST /webhooks/{application_id}/{token}`
    Followup {
        application_id: &'a str,
        token: &'a str,
    },
    /// `GET|PATCH|DELETE /webhooks/{application_id}/{token}/messages/{message_id}`
    FollowupMessage {
        application_id: &'a str,
        token: &'a str,
        message_id: &'a str,
    },
}

impl Endpoint<'_> {
    /// Constructs the URL path for this endpoint.
    ///
    /// Every caller-supplied segment is percent-encoded so a stray `/` or `?`
    /// in a token cannot change which resource is addressed.
    fn to_path(&self, version: ApiVersion) -> String {
        let v = version.as_str();
        match self {
            Self::InteractionCallback { id, token } => format!(
                "/api/{v}/interactions/{}/{}/callback",
                urlencoding::encode(id),
                urlencoding::encode(token)
            ),
            Self::OriginalResponse {
                application_id,
                token,
            } => format!(
                "/api/{v}/webhooks/{}/{}/messages/{ORIGINAL_MESSAGE}",
                urlencoding::encode(application_id),
                urlencoding::encode(token)
            ),
            Self::Followup {
                application_id,
                token,
            } => format!(
                "/api/{v}/webhooks/{}/{}",
                urlencoding::encode(application_id),
                urlencoding::encode(token)
            ),
            Self::FollowupMessage {
                application_id,
                token,
                message_id,
            } => format!(
                "/api/{v}/webhooks/{}/{}/messages/{}",
                urlencoding::encode(application_id),
                urlencoding::encode(token),
                urlencoding::encode(message_id)
            ),
        }
    }

    /// Short, token-free name used in log lines.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InteractionCallback { .. } => "interaction_callback",
            Self::OriginalResponse { .. } => "original_response",
            Self::Followup { .. } => "followup",
            Self::FollowupMessage { .. } => "followup_message",
        }
    }
}

/// Constructs the path (including the versioned `/api/v10` prefix) for an endpoint.
#[must_use]
pub fn construct_endpoint_path(endpoint: &Endpoint) -> String {
    endpoint.to_path(API_VERSION)
}
