//! `request`: arbitrary calls outside the resource CRUD shape.

use shopdesk_core::{CustomRequest, Method};

use crate::cli::{GlobalOpts, HttpMethod, RequestArgs};
use crate::error::CliError;
use crate::output;

use super::Console;
use super::util::{self, Spinner};

fn method(m: HttpMethod) -> Method {
    match m {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
        HttpMethod::Head => Method::HEAD,
        HttpMethod::Options => Method::OPTIONS,
    }
}

/// Build the request from flags. Query pairs keep their order.
fn build_request(args: &RequestArgs) -> Result<CustomRequest, CliError> {
    let mut request = CustomRequest::new(method(args.method), args.url.clone());
    if let Some(raw) = &args.data {
        request = request.payload(util::parse_json_arg("data", raw)?);
    }
    for raw in &args.query {
        let (key, value) = util::split_pair("query", raw, '=')?;
        request = request.query(key, value);
    }
    for raw in &args.header {
        let (name, value) = util::split_pair("header", raw, ':')?;
        request = request.header(name, value);
    }
    Ok(request)
}

pub async fn handle(console: &Console, args: RequestArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let request = build_request(&args)?;
    console.require_session()?;

    let response = {
        let _spin = Spinner::start(&format!("{} {}", request.method, request.url), global.quiet);
        console
            .data
            .custom(&request)
            .await
            .map_err(|e| console.fail(e))?
    };

    if !response.data.is_null() {
        output::print_output(&output::render_record(global.output, &response.data), global.quiet);
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn flags_map_onto_request() {
        let args = RequestArgs {
            method: HttpMethod::Patch,
            url: "orders/7/status".into(),
            data: Some(r#"{"status":"PAID"}"#.into()),
            query: vec!["notify=true".into()],
            header: vec!["X-Request-Source: cli".into()],
        };
        let req = build_request(&args).unwrap();
        assert_eq!(req.method, Method::PATCH);
        assert_eq!(req.payload, Some(json!({"status": "PAID"})));
        assert_eq!(req.query, vec![("notify".to_owned(), "true".to_owned())]);
        assert_eq!(
            req.headers,
            vec![("X-Request-Source".to_owned(), "cli".to_owned())]
        );
    }

    #[test]
    fn bad_json_body_is_rejected() {
        let args = RequestArgs {
            method: HttpMethod::Post,
            url: "carts".into(),
            data: Some("{nope".into()),
            query: Vec::new(),
            header: Vec::new(),
        };
        assert!(matches!(
            build_request(&args),
            Err(CliError::Validation { .. })
        ));
    }
}
