//! AWS Signature Version 4 request signing.

use hmac::{Hmac, Mac};
use jiff::Timestamp;
use sha2::{Digest, Sha256};
use url::Url;

use crate::credentials::AwsCredentials;
use crate::request::SnapshotRequest;
use crate::{Error, Result};

type HmacSha256 = Hmac<Sha256>;

/// Service name the Elasticsearch domain verifies signatures for.
pub const SERVICE_NAME: &str = "es";

const ALGORITHM: &str = "AWS4-HMAC-SHA256";
const AMZ_DATE_FORMAT: &str = "%Y%m%dT%H%M%SZ";
const DATE_FORMAT: &str = "%Y%m%d";

const HEADER_AUTHORIZATION: &str = "authorization";
const HEADER_HOST: &str = "host";
const HEADER_AMZ_DATE: &str = "x-amz-date";
const HEADER_SECURITY_TOKEN: &str = "x-amz-security-token";

/// Signs requests with AWS Signature Version 4.
///
/// A signer is bound to one set of credentials, a region and a service
/// (`es` by default). It holds no other state, so signing the same request
/// at the same timestamp always produces the same `authorization` header.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    credentials: AwsCredentials,
    region: String,
    service: String,
}

impl RequestSigner {
    /// Creates a signer for the Elasticsearch service in `region`.
    pub fn new(credentials: AwsCredentials, region: impl Into<String>) -> Self {
        Self {
            credentials,
            region: region.into(),
            service: SERVICE_NAME.to_owned(),
        }
    }

    /// Overrides the service name bound into the signature.
    #[must_use]
    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = service.into();
        self
    }

    /// Returns the signing region.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Returns the signing service.
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Signs `request` in place as of `time`.
    ///
    /// Sets the `host`, `x-amz-date` and (for temporary credentials)
    /// `x-amz-security-token` headers, then computes the signature over the
    /// method, URL, every header of the request and the body, and stores it
    /// in the `authorization` header. Any previous `authorization` header is
    /// replaced.
    ///
    /// # Errors
    ///
    /// Returns an [`InvalidInput`](crate::ErrorKind::InvalidInput) error if
    /// the request URL has no host.
    pub fn sign(&self, request: &mut SnapshotRequest, time: Timestamp) -> Result<()> {
        let amz_date = time.strftime(AMZ_DATE_FORMAT).to_string();
        let date = time.strftime(DATE_FORMAT).to_string();

        request.headers.remove(HEADER_AUTHORIZATION);
        request.insert_header(HEADER_HOST, host_header(&request.url)?);
        request.insert_header(HEADER_AMZ_DATE, &amz_date);
        if let Some(token) = &self.credentials.session_token {
            request.insert_header(HEADER_SECURITY_TOKEN, token);
        }

        let (canonical_request, signed_headers) = canonical_request(request);
        let scope = format!("{date}/{}/{}/aws4_request", self.region, self.service);
        let string_to_sign = format!(
            "{ALGORITHM}\n{amz_date}\n{scope}\n{}",
            hex::encode(Sha256::digest(canonical_request.as_bytes()))
        );

        let signing_key = self.signing_key(&date);
        let signature = hex::encode(hmac_sha256(&signing_key, string_to_sign.as_bytes()));

        request.insert_header(
            HEADER_AUTHORIZATION,
            format!(
                "{ALGORITHM} Credential={}/{scope}, SignedHeaders={signed_headers}, Signature={signature}",
                self.credentials.access_key_id
            ),
        );

        Ok(())
    }

    /// Derives the signing key for `date` (`YYYYMMDD`).
    fn signing_key(&self, date: &str) -> Vec<u8> {
        let secret = format!("AWS4{}", self.credentials.secret_access_key);
        let k_date = hmac_sha256(secret.as_bytes(), date.as_bytes());
        let k_region = hmac_sha256(&k_date, self.region.as_bytes());
        let k_service = hmac_sha256(&k_region, self.service.as_bytes());
        hmac_sha256(&k_service, b"aws4_request")
    }
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

/// Returns the `host` header value, with the port only when it is not the
/// scheme default.
fn host_header(url: &Url) -> Result<String> {
    let host = url.host_str().ok_or_else(|| {
        Error::invalid_input().with_message(format!("Request URL '{url}' has no host"))
    })?;

    Ok(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_owned(),
    })
}

/// Builds the canonical request and the signed header list.
fn canonical_request(request: &SnapshotRequest) -> (String, String) {
    let path = match request.url.path() {
        "" => "/",
        path => path,
    };

    let mut query: Vec<(String, String)> = request
        .url
        .query_pairs()
        .map(|(key, value)| (uri_encode(&key, true), uri_encode(&value, true)))
        .collect();
    query.sort();
    let query = query
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut canonical_headers = String::new();
    let mut signed_headers = Vec::with_capacity(request.headers.len());
    for (name, value) in &request.headers {
        if name == HEADER_AUTHORIZATION {
            continue;
        }
        let value = value.split_whitespace().collect::<Vec<_>>().join(" ");
        canonical_headers.push_str(&format!("{name}:{value}\n"));
        signed_headers.push(name.as_str());
    }
    let signed_headers = signed_headers.join(";");

    let canonical = format!(
        "{}\n{}\n{query}\n{canonical_headers}\n{signed_headers}\n{}",
        request.method,
        uri_encode(path, false),
        hex::encode(Sha256::digest(&request.body)),
    );

    (canonical, signed_headers)
}

/// Percent-encodes everything except unreserved characters (and `/` unless
/// `encode_slash` is set).
///
/// The URL path is already percent-encoded, so encoding it again here
/// yields the double encoding non-S3 services expect.
fn uri_encode(input: &str, encode_slash: bool) -> String {
    let mut encoded = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char)
            }
            b'/' if !encode_slash => encoded.push('/'),
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACCESS_KEY: &str = "AKIDEXAMPLE";
    const SECRET_KEY: &str = "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY";

    fn example_time() -> Timestamp {
        "2015-08-30T12:36:00Z".parse().unwrap()
    }

    fn example_signer() -> RequestSigner {
        RequestSigner::new(AwsCredentials::new(ACCESS_KEY, SECRET_KEY), "us-east-1")
            .with_service("service")
    }

    /// A bare request, without the default content type.
    fn bare_request(url: &str) -> SnapshotRequest {
        let mut request = SnapshotRequest::get(url).unwrap();
        request.headers.clear();
        request
    }

    #[test]
    fn test_signing_key_matches_aws_example() {
        let signer = RequestSigner::new(AwsCredentials::new(ACCESS_KEY, SECRET_KEY), "us-east-1")
            .with_service("iam");

        assert_eq!(
            hex::encode(signer.signing_key("20150830")),
            "c4afb1cc5771d871763a393e44b703571b55cc28424d1a5e86da6ed3c154a4b9"
        );
    }

    #[test]
    fn test_get_vanilla() {
        let mut request = bare_request("https://example.amazonaws.com/");
        example_signer().sign(&mut request, example_time()).unwrap();

        assert_eq!(request.header("host"), Some("example.amazonaws.com"));
        assert_eq!(request.header("x-amz-date"), Some("20150830T123600Z"));
        assert_eq!(
            request.header("authorization"),
            Some(
                "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20150830/us-east-1/service/aws4_request, \
                 SignedHeaders=host;x-amz-date, \
                 Signature=5fa00fa31553b73ebf1942676e86291e8372ff2a2260956d9b8aae1d763fbf31"
            )
        );
    }

    #[test]
    fn test_get_vanilla_query_order() {
        let mut request =
            bare_request("https://example.amazonaws.com/?Param2=value2&Param1=value1");
        example_signer().sign(&mut request, example_time()).unwrap();

        let authorization = request.header("authorization").unwrap();
        assert!(authorization.ends_with(
            "Signature=b97d918cfa904a5beff61c982a1b6f458b799221646efd99d3219ec94cdf2500"
        ));
    }

    #[test]
    fn test_canonical_request_for_status_url() {
        let mut request =
            SnapshotRequest::get("https://es.example.com/_snapshot/backups/_all?pretty").unwrap();
        request.insert_header("host", "es.example.com");
        request.insert_header("x-amz-date", "20240101T000000Z");

        let (canonical, signed_headers) = canonical_request(&request);

        assert_eq!(signed_headers, "content-type;host;x-amz-date");
        assert_eq!(
            canonical,
            "GET\n\
             /_snapshot/backups/_all\n\
             pretty=\n\
             content-type:application/json\n\
             host:es.example.com\n\
             x-amz-date:20240101T000000Z\n\
             \n\
             content-type;host;x-amz-date\n\
             e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_sign_is_deterministic() {
        let signer = RequestSigner::new(AwsCredentials::new(ACCESS_KEY, SECRET_KEY), "eu-west-1");
        let request = SnapshotRequest::put("https://es.example.com/_snapshot/backups")
            .unwrap()
            .with_body(r#"{"type":"s3"}"#);

        let mut first = request.clone();
        let mut second = request.clone();
        signer.sign(&mut first, example_time()).unwrap();
        signer.sign(&mut second, example_time()).unwrap();

        assert_eq!(
            first.header("authorization"),
            second.header("authorization")
        );
    }

    #[test]
    fn test_any_input_changes_signature() {
        let credentials = AwsCredentials::new(ACCESS_KEY, SECRET_KEY);
        let signer = RequestSigner::new(credentials.clone(), "eu-west-1");
        let request = SnapshotRequest::put("https://es.example.com/_snapshot/backups")
            .unwrap()
            .with_body("a");

        let sign = |signer: &RequestSigner, mut request: SnapshotRequest, time: Timestamp| {
            signer.sign(&mut request, time).unwrap();
            request.header("authorization").unwrap().to_owned()
        };

        let baseline = sign(&signer, request.clone(), example_time());
        let variants = [
            sign(&signer, request.clone().with_body("b"), example_time()),
            sign(
                &signer,
                SnapshotRequest::get("https://es.example.com/_snapshot/backups")
                    .unwrap()
                    .with_body("a"),
                example_time(),
            ),
            sign(
                &signer,
                SnapshotRequest::put("https://es.example.com/_snapshot/other")
                    .unwrap()
                    .with_body("a"),
                example_time(),
            ),
            sign(
                &signer,
                request.clone().with_header("content-type", "text/plain"),
                example_time(),
            ),
            sign(
                &signer,
                request.clone(),
                "2015-08-30T12:36:01Z".parse().unwrap(),
            ),
            sign(
                &RequestSigner::new(credentials.clone(), "us-east-1"),
                request.clone(),
                example_time(),
            ),
            sign(
                &RequestSigner::new(AwsCredentials::new(ACCESS_KEY, "other"), "eu-west-1"),
                request.clone(),
                example_time(),
            ),
        ];

        for variant in variants {
            assert_ne!(variant, baseline);
        }
    }

    #[test]
    fn test_resigning_replaces_authorization() {
        let signer = example_signer();
        let mut request = bare_request("https://example.amazonaws.com/");

        signer.sign(&mut request, example_time()).unwrap();
        let first = request.header("authorization").unwrap().to_owned();
        signer.sign(&mut request, example_time()).unwrap();

        assert_eq!(request.header("authorization"), Some(first.as_str()));
    }

    #[test]
    fn test_session_token_is_signed() {
        let credentials = AwsCredentials::new(ACCESS_KEY, SECRET_KEY).with_session_token("token");
        let signer = RequestSigner::new(credentials, "us-east-1");
        let mut request = bare_request("https://example.amazonaws.com/");

        signer.sign(&mut request, example_time()).unwrap();

        assert_eq!(request.header("x-amz-security-token"), Some("token"));
        assert!(
            request
                .header("authorization")
                .unwrap()
                .contains("SignedHeaders=host;x-amz-date;x-amz-security-token,")
        );
    }

    #[test]
    fn test_host_header_includes_non_default_port() {
        let url = Url::parse("http://localhost:9200/_snapshot/r").unwrap();
        assert_eq!(host_header(&url).unwrap(), "localhost:9200");

        let url = Url::parse("https://es.example.com:443/").unwrap();
        assert_eq!(host_header(&url).unwrap(), "es.example.com");
    }

    #[test]
    fn test_uri_encode() {
        assert_eq!(uri_encode("/_snapshot/a b", false), "/_snapshot/a%20b");
        assert_eq!(uri_encode("/_snapshot/a%20b", false), "/_snapshot/a%2520b");
        assert_eq!(uri_encode("a/b", true), "a%2Fb");
        assert_eq!(uri_encode("daily-2024.01_01~x", true), "daily-2024.01_01~x");
    }

    #[test]
    fn test_default_service_is_es() {
        let signer = RequestSigner::new(AwsCredentials::default(), "eu-west-1");
        assert_eq!(signer.service(), SERVICE_NAME);
        assert_eq!(signer.region(), "eu-west-1");
    }
}
