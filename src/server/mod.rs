use std::io::{self, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::panic::{self, UnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::data::{DataPaths, DataRegistry, LoadError};

pub mod api;
pub mod routes;
pub mod state;

pub use state::SharedState;

/// Header block larger than this is rejected.
const MAX_HEADER_BYTES: usize = 16 * 1024;
/// Request bodies are small JSON objects; anything beyond this is rejected.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Bind, start loading both tables in the background, and serve requests.
/// Requests that need data before the load finishes get a "not loaded yet" response.
pub fn run_server(bind_addr: &str, paths: DataPaths) -> io::Result<()> {
    let listener = TcpListener::bind(bind_addr)?;
    let state = SharedState::loading();
    load_in_background(&state, move || DataRegistry::load(&paths))?;

    println!("ultradrop server listening on http://{bind_addr}");
    log::info!("listening on {bind_addr}");
    serve(listener, &state)
}

/// Run `load` on a loader thread and publish its outcome into `state`.
/// A panicking load is recorded as a failed load instead of leaving the state at loading.
pub fn load_in_background<F>(state: &SharedState, load: F) -> io::Result<JoinHandle<()>>
where
    F: FnOnce() -> Result<Arc<DataRegistry>, LoadError> + Send + UnwindSafe + 'static,
{
    let loader_state = state.clone();
    thread::Builder::new()
        .name("table-loader".to_string())
        .spawn(move || match panic::catch_unwind(load) {
            Ok(result) => loader_state.finish_load(result),
            Err(payload) => {
                let reason = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                log::error!("table loader panicked: {reason}");
                loader_state.fail(format!("failed to load game data: loader panicked: {reason}"));
            }
        })
}

/// Accept loop over an already-bound listener.
pub fn serve(listener: TcpListener, state: &SharedState) -> io::Result<()> {
    for stream in listener.incoming() {
        match stream {
            Ok(mut stream) => {
                if let Err(err) = handle_connection(&mut stream, state) {
                    log::warn!("request error: {err}");
                }
            }
            Err(err) => log::error!("connection failed: {err}"),
        }
    }

    Ok(())
}

fn handle_connection(stream: &mut TcpStream, state: &SharedState) -> io::Result<()> {
    let Some(request) = read_request(stream)? else {
        return Ok(());
    };

    let response = match request {
        Ok(request) => {
            let response =
                routes::route_request(state, &request.method, &request.path, &request.body);
            log::debug!("{} {} -> {}", request.method, request.path, response.status_code);
            response
        }
        Err(rejection) => {
            log::warn!("rejected request: {}", rejection.status_code);
            rejection
        }
    };
    stream.write_all(response.to_http_string().as_bytes())?;
    stream.flush()?;
    Ok(())
}

struct Request {
    method: String,
    path: String,
    body: String,
}

/// Read the header block up to the blank line, then exactly `Content-Length` body bytes.
/// `Ok(None)` when the peer closed without sending anything.
fn read_request(stream: &mut TcpStream) -> io::Result<Option<Result<Request, routes::HttpResponse>>> {
    let mut buffer = Vec::with_capacity(4096);
    let mut chunk = [0_u8; 4096];

    let header_end = loop {
        if let Some(end) = find_header_end(&buffer) {
            break end;
        }
        if buffer.len() > MAX_HEADER_BYTES {
            return Ok(Some(Err(routes::reject(431, "Request Header Fields Too Large"))));
        }
        let read = stream.read(&mut chunk)?;
        if read == 0 {
            if buffer.is_empty() {
                return Ok(None);
            }
            // Peer finished without a blank line; treat what arrived as the whole header block.
            break buffer.len();
        }
        buffer.extend_from_slice(&chunk[..read]);
    };

    let head = String::from_utf8_lossy(&buffer[..header_end]).into_owned();
    let mut lines = head.lines();
    let request_line = lines.next().unwrap_or_default();
    let mut request_parts = request_line.split_whitespace();
    let method = request_parts.next().unwrap_or("GET").to_string();
    let path = request_parts.next().unwrap_or("/").to_string();

    let content_length = lines
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);
    if content_length > MAX_BODY_BYTES {
        return Ok(Some(Err(routes::reject(413, "Payload Too Large"))));
    }

    let body_start = (header_end + separator_len(&buffer, header_end)).min(buffer.len());
    let mut body = buffer[body_start..].to_vec();
    while body.len() < content_length {
        let read = stream.read(&mut chunk)?;
        if read == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..read]);
    }
    body.truncate(content_length);

    Ok(Some(Ok(Request {
        method,
        path,
        body: String::from_utf8_lossy(&body).into_owned(),
    })))
}

/// Offset of the blank line ending the header block (`\r\n\r\n`, or bare `\n\n`).
fn find_header_end(buffer: &[u8]) -> Option<usize> {
    let crlf = buffer.windows(4).position(|window| window == b"\r\n\r\n");
    let lf = buffer.windows(2).position(|window| window == b"\n\n");
    match (crlf, lf) {
        (Some(crlf), Some(lf)) => Some(crlf.min(lf)),
        (crlf, lf) => crlf.or(lf),
    }
}

fn separator_len(buffer: &[u8], header_end: usize) -> usize {
    if buffer[header_end..].starts_with(b"\r\n\r\n") {
        4
    } else if buffer[header_end..].starts_with(b"\n\n") {
        2
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_end_prefers_first_blank_line() {
        assert_eq!(find_header_end(b"GET / HTTP/1.1\r\nHost: x\r\n\r\nbody"), Some(23));
        assert_eq!(find_header_end(b"GET / HTTP/1.1\nHost: x\n\nbody"), Some(22));
        assert_eq!(find_header_end(b"GET / HTTP/1.1\r\nHost: x\r\n"), None);
    }
}
