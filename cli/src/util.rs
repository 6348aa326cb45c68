use serde_json::{Value, json};

pub fn client() -> reqwest::Client {
    reqwest::Client::new()
}

pub fn exit_error(message: &str, docs_hint: Option<&str>) -> ! {
    let mut err = json!({
        "error": "cli_error",
        "message": message
    });
    if let Some(hint) = docs_hint {
        err["docs_hint"] = json!(hint);
    }
    eprintln!("{}", serde_json::to_string_pretty(&err).unwrap());
    std::process::exit(1);
}

/// Send a request to the relay and print the envelope.
///
/// Exit codes: 0 = 2xx, 1 = 4xx, 2 = 5xx, 3 = connection failure, 4 = bad URL.
/// A 2xx reply whose envelope says `ok: false` exits 1.
pub async fn api_request(
    api_url: &str,
    method: reqwest::Method,
    path: &str,
    body: Option<Value>,
) -> i32 {
    let url = match reqwest::Url::parse(&format!("{api_url}{path}")) {
        Ok(u) => u,
        Err(e) => {
            let err = json!({
                "error": "cli_error",
                "message": format!("Invalid URL: {api_url}{path}: {e}")
            });
            eprintln!("{}", serde_json::to_string_pretty(&err).unwrap());
            return 4;
        }
    };

    let mut req = client().request(method, url);
    if let Some(b) = body {
        req = req.json(&b);
    }

    let resp = match req.send().await {
        Ok(r) => r,
        Err(e) => {
            let err = json!({
                "error": "connection_error",
                "message": format!("{e}"),
                "docs_hint": "Is the relay running? Check PUNCH_API_URL."
            });
            eprintln!("{}", serde_json::to_string_pretty(&err).unwrap());
            return 3;
        }
    };

    let status = resp.status().as_u16();
    let resp_body: Value = match resp.json().await {
        Ok(v) => v,
        Err(e) => json!({"raw_error": format!("Failed to parse response as JSON: {e}")}),
    };

    let exit_code = match status {
        200..=299 if resp_body.get("ok") == Some(&Value::Bool(false)) => 1,
        200..=299 => 0,
        400..=499 => 1,
        _ => 2,
    };

    let formatted = serde_json::to_string_pretty(&resp_body).unwrap();
    if exit_code == 0 {
        println!("{formatted}");
    } else {
        eprintln!("{formatted}");
    }

    exit_code
}

pub fn read_json_from_file(path: &str) -> Result<Value, String> {
    let raw = if path == "-" {
        std::io::read_to_string(std::io::stdin())
            .map_err(|e| format!("Failed to read stdin: {e}"))?
    } else {
        std::fs::read_to_string(path).map_err(|e| format!("Failed to read file '{path}': {e}"))?
    };
    serde_json::from_str(&raw).map_err(|e| format!("Invalid JSON in '{path}': {e}"))
}

/// Parse inline JSON or a file (`-` for stdin) into an object, exiting on failure.
pub fn json_object_arg(
    inline: Option<&str>,
    file: Option<&str>,
    what: &str,
) -> serde_json::Map<String, Value> {
    let value: Value = match (inline, file) {
        (Some(raw), _) => serde_json::from_str(raw)
            .unwrap_or_else(|e| exit_error(&format!("Invalid JSON for {what}: {e}"), None)),
        (None, Some(path)) => read_json_from_file(path).unwrap_or_else(|e| exit_error(&e, None)),
        (None, None) => return serde_json::Map::new(),
    };
    match value {
        Value::Object(map) => map,
        _ => exit_error(&format!("{what} must be a JSON object"), None),
    }
}
