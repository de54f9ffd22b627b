use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use polymap::config::Config;
use polymap::model::{CreateForm, DrawnFeature, RenameEntry};
use polymap::store::{FetchError, HttpPolygonStore, PolygonStore};
use serde_json::{Value, json};

/// Zapytanie odebrane przez serwer testowy.
struct Captured {
    method: String,
    path: String,
    content_type: Option<String>,
    body: String,
}

/// Serwer HTTP obsługujący dokładnie jedno zapytanie stałą odpowiedzią.
fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<Captured>) {
    serve_after(Duration::ZERO, status, body)
}

/// Jak `serve_once`, ale odpowiada dopiero po `delay`.
fn serve_after(delay: Duration, status: &'static str, body: &'static str) -> (String, JoinHandle<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}/api", listener.local_addr().unwrap());

    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());

        let mut request_line = String::new();
        reader.read_line(&mut request_line).unwrap();
        let mut parts = request_line.split_whitespace();
        let method = parts.next().unwrap_or_default().to_string();
        let path = parts.next().unwrap_or_default().to_string();

        let mut content_length = 0;
        let mut content_type = None;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            if let Some((name, value)) = line.split_once(':') {
                match name.to_ascii_lowercase().as_str() {
                    "content-length" => content_length = value.trim().parse().unwrap(),
                    "content-type" => content_type = Some(value.trim().to_string()),
                    _ => {}
                }
            }
        }
        let mut buf = vec![0; content_length];
        reader.read_exact(&mut buf).unwrap();

        thread::sleep(delay);
        let mut stream = stream;
        write!(
            stream,
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
        .unwrap();
        stream.flush().unwrap();

        Captured { method, path, content_type, body: String::from_utf8(buf).unwrap() }
    });

    (base, handle)
}

fn store_for(base: &str) -> HttpPolygonStore {
    let base = base.to_string();
    HttpPolygonStore::new(&Config::from_lookup(move |key| (key == "POLYMAP_API_URL").then(|| base.clone()))).unwrap()
}

#[test]
fn list_reads_data_field() {
    let (base, server) = serve_once(
        "200 OK",
        r#"{"data":[{"_id":"1","polygonName":"Park","polygonCoordinates":[{"type":"Feature","geometry":{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1],[0,0]]]}}]}]}"#,
    );
    let records = store_for(&base).list().unwrap();
    let request = server.join().unwrap();

    assert_eq!(request.method, "GET");
    assert_eq!(request.path, "/api/polygons");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].polygon_name, "Park");
    assert_eq!(records[0].geometry_type(), "Polygon");
}

#[test]
fn list_with_non_list_data_is_empty() {
    for body in [r#"{"data":null}"#, r#"{"data":{"x":1}}"#, r#"{}"#] {
        let (base, server) = serve_once("200 OK", body);
        assert!(store_for(&base).list().unwrap().is_empty(), "body {body}");
        server.join().unwrap();
    }
}

#[test]
fn list_with_invalid_json_fails() {
    let (base, server) = serve_once("200 OK", "not json");
    assert!(matches!(store_for(&base).list(), Err(FetchError::Body { .. })));
    server.join().unwrap();
}

#[test]
fn non_success_status_is_a_fetch_error() {
    let (base, server) = serve_once("500 Internal Server Error", r#"{"error":"boom"}"#);
    assert!(matches!(store_for(&base).list(), Err(FetchError::Status { status: 500, .. })));
    server.join().unwrap();

    let (base, server) = serve_once("404 Not Found", "{}");
    let result = store_for(&base).rename(&[RenameEntry("a".into(), "b".into())]);
    assert!(matches!(result, Err(FetchError::Status { status: 404, .. })));
    server.join().unwrap();
}

#[test]
fn create_posts_the_staged_form() {
    let (base, server) = serve_once("201 Created", r#"{"ok":true}"#);
    let form = CreateForm {
        polygon_name: "N".into(),
        polygon_coordinates: vec![DrawnFeature::polygon("f1", &[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]])],
    };
    store_for(&base).create(&form).unwrap();
    let request = server.join().unwrap();

    assert_eq!(request.method, "POST");
    assert_eq!(request.path, "/api/polygons");
    assert_eq!(request.content_type.as_deref(), Some("application/json"));
    let body: Value = serde_json::from_str(&request.body).unwrap();
    assert_eq!(body["polygonName"], "N");
    assert_eq!(body["polygonCoordinates"][0]["id"], "f1");
    assert_eq!(body["polygonCoordinates"][0]["geometry"]["type"], "Polygon");
}

#[test]
fn rename_posts_id_name_pairs() {
    let (base, server) = serve_once("200 OK", "{}");
    store_for(&base)
        .rename(&[RenameEntry("a".into(), "Alpha".into()), RenameEntry("b".into(), "Beta".into())])
        .unwrap();
    let request = server.join().unwrap();

    assert_eq!(request.method, "POST");
    assert_eq!(request.path, "/api/polygons/name");
    let body: Value = serde_json::from_str(&request.body).unwrap();
    assert_eq!(body, json!([["a", "Alpha"], ["b", "Beta"]]));
}

#[test]
fn unreachable_server_is_a_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}/api", listener.local_addr().unwrap());
    drop(listener);
    assert!(matches!(store_for(&base).list(), Err(FetchError::Network { .. })));
}

#[test]
fn slow_server_is_still_awaited() {
    // dłużej niż domyślny limit klienta blocking (30 s)
    let (base, server) = serve_after(
        Duration::from_secs(31),
        "200 OK",
        r#"{"data":[{"_id":"1","polygonName":"Late"}]}"#,
    );
    let records = store_for(&base).list().unwrap();
    server.join().unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].polygon_name, "Late");
}
