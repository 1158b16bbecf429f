//! Builder for token requests used across test suites

use nativetoken_core::TokenRequest;

/// Fluent [`TokenRequest`] construction
///
/// Starts from a valid `system_core` request with no capabilities.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    request: TokenRequest,
}

impl RequestBuilder {
    /// Start a request for `process_name`
    pub fn new(process_name: impl Into<String>) -> Self {
        Self {
            request: TokenRequest {
                process_name: process_name.into(),
                apl: Some("system_core".to_string()),
                ..TokenRequest::default()
            },
        }
    }

    /// Typical service request: two dcaps, two permissions and one ACL
    pub fn standard(process_name: impl Into<String>) -> Self {
        Self::new(process_name)
            .dcaps(["AT_CAP", "ST_CAP"])
            .perms(["ohos.permission.test1", "ohos.permission.test2"])
            .acls(["ohos.permission.test1"])
    }

    /// Replace the dcaps
    pub fn dcaps<I, S>(mut self, dcaps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.request.dcaps = dcaps.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the permissions
    pub fn perms<I, S>(mut self, perms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.request.perms = perms.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the ACLs
    pub fn acls<I, S>(mut self, acls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.request.acls = acls.into_iter().map(Into::into).collect();
        self
    }

    /// Set the APL string
    pub fn apl(mut self, apl: impl Into<String>) -> Self {
        self.request.apl = Some(apl.into());
        self
    }

    /// Drop the APL string
    pub fn no_apl(mut self) -> Self {
        self.request.apl = None;
        self
    }

    /// Finish the request
    pub fn build(self) -> TokenRequest {
        self.request
    }
}
