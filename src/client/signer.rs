use std::time::SystemTime;

use aws_credential_types::Credentials;
use aws_sigv4::http_request::{sign, SignableBody, SignableRequest, SigningSettings};
use aws_sigv4::sign::v4;
use aws_smithy_runtime_api::client::identity::Identity;
use log::debug;

use crate::client::CredentialBundle;
use crate::CredentialsError;

/// Signs requests to one AWS service with temporary credentials, using AWS Signature
/// Version 4.
///
/// Building a signer makes no request; it packages the credentials with the host,
/// region and service the requests are for. The signed headers it produces can be
/// applied to a request by any HTTP client.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    credentials: CredentialBundle,
    region: String,
    hostname: String,
    service_name: String,
}

impl RequestSigner {
    #[must_use]
    pub fn new(
        credentials: CredentialBundle,
        region: &str,
        hostname: &str,
        service_name: &str,
    ) -> Self {
        Self {
            credentials,
            region: region.into(),
            hostname: hostname.into(),
            service_name: service_name.into(),
        }
    }

    #[must_use]
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    #[must_use]
    pub fn region(&self) -> &str {
        &self.region
    }

    #[must_use]
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// The URL a request for `path_and_query` is sent to.
    #[must_use]
    pub fn url(&self, path_and_query: &str) -> String {
        if path_and_query.starts_with('/') {
            format!("https://{}{}", self.hostname, path_and_query)
        } else {
            format!("https://{}/{}", self.hostname, path_and_query)
        }
    }

    /// Sign a request with the current time.
    ///
    /// ## Errors
    ///
    /// See [RequestSigner::sign_at].
    pub fn sign(
        &self,
        method: &str,
        path_and_query: &str,
        headers: &[(&str, &str)],
        body: &[u8],
    ) -> Result<Vec<(String, String)>, CredentialsError> {
        self.sign_at(method, path_and_query, headers, body, SystemTime::now())
    }

    /// Sign a request as if it were sent at `time`.
    ///
    /// Returns the headers to add to the request: `authorization`, `x-amz-date` and
    /// `x-amz-security-token`.
    ///
    /// ## Errors
    ///
    /// Returns [CredentialsError::Signing] if the request cannot be signed, for example
    /// when the path is not a valid URI.
    pub fn sign_at(
        &self,
        method: &str,
        path_and_query: &str,
        headers: &[(&str, &str)],
        body: &[u8],
        time: SystemTime,
    ) -> Result<Vec<(String, String)>, CredentialsError> {
        let url = self.url(path_and_query);

        let identity: Identity = Credentials::from(&self.credentials).into();

        let params = v4::SigningParams::builder()
            .identity(&identity)
            .region(&self.region)
            .name(&self.service_name)
            .time(time)
            .settings(SigningSettings::default())
            .build()
            .map_err(|err| CredentialsError::Signing(err.to_string()))?
            .into();

        let request = SignableRequest::new(
            method,
            url.as_str(),
            headers.iter().copied(),
            SignableBody::Bytes(body),
        )
        .map_err(|err| CredentialsError::Signing(err.to_string()))?;

        let (instructions, _signature) = sign(request, &params)
            .map_err(|err| CredentialsError::Signing(err.to_string()))?
            .into_parts();

        debug!(method = method, url = url.as_str(), service = self.service_name.as_str(); "Signed request");

        Ok(instructions
            .headers()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect())
    }
}
