use {marketwatch_marketplace::PluginVersionInfo, serde::Serialize};

/// Outbound envelope, shaped like a serverless HTTP response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResponse {
    pub status_code: u16,
    pub body: ResponseBody,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Success(SuccessBody),
    Failure { message: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct SuccessBody {
    pub message: String,
    pub plugin_data: Vec<PluginVersionInfo>,
    pub discord_sent: bool,
    pub slack_sent: bool,
    pub test_discord: bool,
    pub test_slack: bool,
}

impl InvocationResponse {
    pub fn success(body: SuccessBody) -> Self {
        Self {
            status_code: 200,
            body: ResponseBody::Success(body),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status_code: 500,
            body: ResponseBody::Failure {
                message: message.into(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }

    /// The success body, if this is one.
    pub fn success_body(&self) -> Option<&SuccessBody> {
        match &self.body {
            ResponseBody::Success(body) => Some(body),
            ResponseBody::Failure { .. } => None,
        }
    }

    pub fn message(&self) -> &str {
        match &self.body {
            ResponseBody::Success(body) => &body.message,
            ResponseBody::Failure { message } => message,
        }
    }
}
