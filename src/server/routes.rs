use crate::server::api;

pub struct HttpResponse {
    pub status_code: u16,
    pub status_text: &'static str,
    pub content_type: &'static str,
    pub body: String,
}

impl HttpResponse {
    pub fn to_http_string(&self) -> String {
        format!(
            "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            self.status_code,
            self.status_text,
            self.content_type,
            self.body.len(),
            self.body
        )
    }
}

pub fn route_request(method: &str, path: &str, body: &str) -> HttpResponse {
    match (method, path) {
        ("GET", "/") => HttpResponse {
            status_code: 200,
            status_text: "OK",
            content_type: "text/html; charset=utf-8",
            body: index_html(),
        },
        ("GET", "/api/health") => match api::health_payload() {
            Ok(payload) => json_ok(payload),
            Err(err) => error_response(500, "Internal Server Error", &err.to_string()),
        },
        ("GET", "/api/libraries") => match api::libraries_payload() {
            Ok(payload) => json_ok(payload),
            Err(err) => error_response(500, "Internal Server Error", &err.to_string()),
        },
        ("GET", "/api/status") => match api::status_payload() {
            Ok(payload) => json_ok(payload),
            Err(err) => error_response(500, "Internal Server Error", &err.to_string()),
        },
        ("POST", "/api/import") => match api::import_payload(body) {
            Ok(payload) => json_ok(payload),
            Err(api::ImportPayloadError::Parse(err)) => {
                error_response(400, "Bad Request", &format!("Invalid request body: {err}"))
            }
            Err(api::ImportPayloadError::Shape(message)) => {
                error_response(400, "Bad Request", message)
            }
            Err(err) => error_response(500, "Internal Server Error", &err.to_string()),
        },
        _ => error_response(404, "Not Found", "No such endpoint"),
    }
}

fn json_ok(body: String) -> HttpResponse {
    HttpResponse {
        status_code: 200,
        status_text: "OK",
        content_type: "application/json",
        body,
    }
}

fn error_response(status_code: u16, status_text: &'static str, message: &str) -> HttpResponse {
    let body = serde_json::json!({
        "status": "error",
        "message": message,
    });
    let body = serde_json::to_string_pretty(&body)
        .unwrap_or_else(|_| r#"{"status":"error"}"#.to_string());
    HttpResponse {
        status_code,
        status_text,
        content_type: "application/json",
        body,
    }
}

fn index_html() -> String {
    format!(
        "<!doctype html><html><head><title>konoha</title></head><body>\
         <h1>konoha import service</h1>\
         <p>POST a narutogen NPC array to <code>/api/import</code>.</p>\
         <p>version {}</p>\
         </body></html>",
        env!("CARGO_PKG_VERSION")
    )
}

#[cfg(test)]
mod tests {
    use super::route_request;

    #[test]
    fn health_route_returns_ok_payload() {
        let response = route_request("GET", "/api/health", "");
        assert_eq!(response.status_code, 200);
        assert!(response.body.contains("\"status\": \"ok\""));
    }

    #[test]
    fn unknown_route_returns_404_json() {
        let response = route_request("GET", "/api/missing", "");
        assert_eq!(response.status_code, 404);
        assert!(response.body.contains("error"));
    }

    #[test]
    fn import_with_non_array_body_returns_400() {
        let response = route_request("POST", "/api/import", "{}");
        assert_eq!(response.status_code, 400);
        assert!(response.body.contains("array"));
    }

    #[test]
    fn http_string_carries_content_length() {
        let response = route_request("GET", "/api/health", "");
        let raw = response.to_http_string();
        assert!(raw.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(raw.contains(&format!("Content-Length: {}", response.body.len())));
    }
}
