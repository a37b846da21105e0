// REST resource HTTP client
//
// Wraps `reqwest::Client` with resource URL construction, per-request
// bearer injection, and response/error decoding. The login call lives in
// `rest/auth.rs` as another inherent method.

use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::auth::BearerToken;
use crate::error::{Error, preview};
use crate::rest::envelope::{ListPage, decode_list};
use crate::rest::query::ListQuery;
use crate::transport::TransportConfig;

// ── Error response shape ─────────────────────────────────────────────

#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<String>,
}

// ── Custom request ───────────────────────────────────────────────────

/// An arbitrary request outside the CRUD shape.
///
/// `url` may be absolute or relative to the client's base URL. `query`
/// pairs are URL-encoded and appended to whatever query the URL already has.
#[derive(Debug, Clone)]
pub struct CustomRequest {
    pub url: String,
    pub method: Method,
    pub payload: Option<Value>,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
}

impl CustomRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method,
            payload: None,
            query: Vec::new(),
            headers: Vec::new(),
        }
    }

    pub fn payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for a resource-oriented REST backend.
///
/// Resources live at `{base}/{resource}` and `{base}/{resource}/{id}`.
/// The client holds no credentials: each method takes an optional
/// [`BearerToken`] and attaches it to that request only.
#[derive(Debug, Clone)]
pub struct RestClient {
    http: reqwest::Client,
    base_url: Url,
}

impl RestClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from a base URL and transport config.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The API base URL (e.g. `http://localhost:8080/api`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The underlying HTTP client.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Append path segments to the base URL, percent-encoding each one.
    ///
    /// A resource name like `admin/users` contributes two segments. Ids
    /// that `url` would collapse into the collection path are rejected.
    pub(crate) fn endpoint(&self, resource: &str, id: Option<&str>) -> Result<Url, Error> {
        if let Some(id @ ("" | "." | "..")) = id {
            return Err(Error::InvalidId { id: id.to_owned() });
        }
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?;
            segments.pop_if_empty();
            segments.extend(
                resource
                    .split('/')
                    .filter(|s| !matches!(*s, "" | "." | "..")),
            );
            if let Some(id) = id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    /// Resolve a custom-request URL: absolute URLs are used as-is,
    /// anything else hangs off the base URL.
    fn resolve(&self, raw: &str) -> Result<Url, Error> {
        match Url::parse(raw) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                let base = self.base_url.as_str().trim_end_matches('/');
                let path = raw.trim_start_matches('/');
                Ok(Url::parse(&format!("{base}/{path}"))?)
            }
            Err(e) => Err(Error::InvalidUrl(e)),
        }
    }

    // ── Request helpers ──────────────────────────────────────────────

    fn request(
        &self,
        method: Method,
        url: Url,
        auth: Option<&BearerToken>,
    ) -> reqwest::RequestBuilder {
        let builder = self.http.request(method, url);
        match auth {
            Some(token) => builder.bearer_auth(token.expose()),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(builder: reqwest::RequestBuilder) -> Result<T, Error> {
        let resp = builder.send().await?;
        let body = Self::read_body(resp).await?;
        decode_body(&body)
    }

    /// Read a response body, turning non-2xx statuses into [`Error::Http`].
    pub(crate) async fn read_body(resp: reqwest::Response) -> Result<String, Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(resp.text().await?)
        } else {
            Err(parse_error(status, resp).await)
        }
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// `GET /{resource}?page=..&size=..` with filters and sorting, normalized
    /// into a [`ListPage`].
    pub async fn list<T: DeserializeOwned>(
        &self,
        resource: &str,
        query: &ListQuery,
        auth: Option<&BearerToken>,
    ) -> Result<ListPage<T>, Error> {
        let url = self.endpoint(resource, None)?;
        let params = query.to_params();
        debug!("GET {url} params={params:?}");

        let resp = self
            .request(Method::GET, url, auth)
            .query(&params)
            .send()
            .await?;
        let body = Self::read_body(resp).await?;
        let (shape, page) = decode_list(&body)?;
        trace!(?shape, total = page.total, "decoded list page");
        Ok(page)
    }

    /// `GET /{resource}/{id}`
    pub async fn get_one<T: DeserializeOwned>(
        &self,
        resource: &str,
        id: &str,
        auth: Option<&BearerToken>,
    ) -> Result<T, Error> {
        let url = self.endpoint(resource, Some(id))?;
        debug!("GET {url}");
        Self::send(self.request(Method::GET, url, auth)).await
    }

    /// `POST /{resource}` with a JSON body.
    pub async fn create<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        resource: &str,
        body: &B,
        auth: Option<&BearerToken>,
    ) -> Result<T, Error> {
        let url = self.endpoint(resource, None)?;
        debug!("POST {url}");
        Self::send(self.request(Method::POST, url, auth).json(body))
            .await
    }

    /// `PUT /{resource}/{id}` with a JSON body.
    pub async fn update<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        resource: &str,
        id: &str,
        body: &B,
        auth: Option<&BearerToken>,
    ) -> Result<T, Error> {
        let url = self.endpoint(resource, Some(id))?;
        debug!("PUT {url}");
        Self::send(self.request(Method::PUT, url, auth).json(body))
            .await
    }

    /// `DELETE /{resource}/{id}`. An empty response body decodes as `null`.
    pub async fn delete_one<T: DeserializeOwned>(
        &self,
        resource: &str,
        id: &str,
        auth: Option<&BearerToken>,
    ) -> Result<T, Error> {
        let url = self.endpoint(resource, Some(id))?;
        debug!("DELETE {url}");
        Self::send(self.request(Method::DELETE, url, auth)).await
    }

    /// Send an arbitrary request and return the decoded JSON body.
    pub async fn custom(
        &self,
        req: &CustomRequest,
        auth: Option<&BearerToken>,
    ) -> Result<Value, Error> {
        let mut url = self.resolve(&req.url)?;
        if !req.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&req.query);
        }
        // The session token only travels to the backend it was issued by.
        let auth = auth.filter(|_| url.origin() == self.base_url.origin());
        debug!("{} {url}", req.method);

        let mut builder = self
            .request(req.method.clone(), url, auth)
            .headers(header_map(&req.headers)?);
        if let Some(ref payload) = req.payload {
            builder = builder.json(payload);
        }
        Self::send(builder).await
    }
}

// ── Response handling ────────────────────────────────────────────────

fn decode_body<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
    let text = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(text).map_err(|e| Error::Deserialization {
        message: format!("{e} (body preview: {:?})", preview(body)),
        body: body.to_owned(),
    })
}

async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
    let raw = resp.text().await.unwrap_or_default();

    let backend = serde_json::from_str::<ErrorResponse>(&raw)
        .ok()
        .and_then(|e| e.message)
        .filter(|m| !m.is_empty());

    let (message, from_backend) = match backend {
        Some(m) => (m, true),
        None if raw.trim().is_empty() => (status.to_string(), false),
        None => (preview(&raw), false),
    };

    Error::Http {
        status: status.as_u16(),
        message,
        from_backend,
        body: raw,
    }
}

fn header_map(headers: &[(String, String)]) -> Result<HeaderMap, Error> {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| Error::InvalidHeader {
                name: name.clone(),
                reason: e.to_string(),
            })?;
        let header_value = HeaderValue::from_str(value).map_err(|e| Error::InvalidHeader {
            name: name.clone(),
            reason: e.to_string(),
        })?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> RestClient {
        RestClient::with_client(reqwest::Client::new(), Url::parse(base).unwrap())
    }

    #[test]
    fn endpoint_keeps_base_path() {
        let c = client("http://localhost:8080/api");
        assert_eq!(
            c.endpoint("orders", Some("17")).unwrap().as_str(),
            "http://localhost:8080/api/orders/17"
        );
        let c = client("http://localhost:8081/api/v1/");
        assert_eq!(
            c.endpoint("categories", None).unwrap().as_str(),
            "http://localhost:8081/api/v1/categories"
        );
    }

    #[test]
    fn endpoint_encodes_ids_and_splits_nested_resources() {
        let c = client("http://localhost/api");
        assert_eq!(
            c.endpoint("admin/users", Some("a b/c")).unwrap().as_str(),
            "http://localhost/api/admin/users/a%20b%2Fc"
        );
    }

    #[test]
    fn dot_ids_do_not_reach_the_collection() {
        let c = client("http://localhost/api");
        for id in ["..", ".", ""] {
            let err = c.endpoint("orders", Some(id)).unwrap_err();
            assert!(matches!(err, Error::InvalidId { .. }), "{id:?}: {err:?}");
        }
        assert_eq!(
            c.endpoint("orders", Some("..7")).unwrap().as_str(),
            "http://localhost/api/orders/..7"
        );
    }

    #[test]
    fn resolve_relative_and_absolute() {
        let c = client("http://localhost/api");
        assert_eq!(
            c.resolve("/reports/sales").unwrap().as_str(),
            "http://localhost/api/reports/sales"
        );
        assert_eq!(
            c.resolve("https://other.example/x").unwrap().as_str(),
            "https://other.example/x"
        );
    }

    #[test]
    fn empty_body_decodes_as_null() {
        let v: Value = decode_body("").unwrap();
        assert!(v.is_null());
    }

    #[test]
    fn bad_header_is_rejected() {
        let err = header_map(&[("bad header".into(), "x".into())]).unwrap_err();
        assert!(matches!(err, Error::InvalidHeader { .. }));
    }
}
