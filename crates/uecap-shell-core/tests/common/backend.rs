//! Stand-in for the capability parser backend: a few fixed routes on a
//! tiny_http server.

use std::thread;

use uecap_shell_core::server::{Request, Response};

pub const CSV_BODY: &[u8] = b"lte,nr\n1,0\n";

fn route(req: &Request) -> Response {
    let path = req.target.split('?').next().unwrap_or("");
    match path {
        "/status" => Response::text(200, "ok"),
        "/version" => Response::text(200, &format!("query={}", req.target)),
        "/store/combos.csv" => Response {
            status: 200,
            headers: vec![("Content-Type".to_string(), "text/csv".to_string())],
            body: CSV_BODY.to_vec(),
        },
        "/csv/export" => Response {
            status: 302,
            headers: vec![
                ("Location".to_string(), "/store/combos.csv".to_string()),
                (
                    "Content-Disposition".to_string(),
                    "attachment; filename=\"combos.csv\"".to_string(),
                ),
                ("Set-Cookie".to_string(), "session=1; Path=/".to_string()),
            ],
            body: Vec::new(),
        },
        "/parse/echo" => {
            let body = format!(
                "{} {} {}",
                req.method,
                req.header("content-type").unwrap_or("-"),
                String::from_utf8_lossy(&req.body)
            );
            Response::text(200, &body)
        }
        _ => Response::text(404, "missing"),
    }
}

/// Starts the stub and returns its base URL (e.g. "http://127.0.0.1:12345").
pub fn start() -> String {
    let server = tiny_http::Server::http("127.0.0.1:0").expect("bind");
    let port = server.server_addr().to_ip().expect("tcp listener").port();
    thread::spawn(move || {
        for mut http_request in server.incoming_requests() {
            let Ok(req) = Request::from_http(&mut http_request) else {
                continue;
            };
            let _ = http_request.respond(route(&req).into_http());
        }
    });
    format!("http://127.0.0.1:{}", port)
}
