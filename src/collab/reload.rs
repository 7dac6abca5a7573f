use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};
use std::thread::JoinHandle;

use tungstenite::WebSocket;

use crate::collab::LiveReloadServer;

type Clients = Arc<Mutex<Vec<WebSocket<TcpStream>>>>;

/// Most connections kept open; older ones are closed first.
const MAX_CLIENTS: usize = 10;

/// Broadcasts `"reload"` to browsers connected over a websocket.
pub struct WebSocketReloadServer {
    port: u16,
    clients: Clients,
    started: OnceLock<u16>,
}

impl WebSocketReloadServer {
    /// The server binds `port` on start, or any free port if it is taken.
    pub fn new(port: u16) -> Self {
        Self { port, clients: Arc::default(), started: OnceLock::new() }
    }

    pub fn client_count(&self) -> usize {
        lock(&self.clients).len()
    }
}

fn lock(clients: &Clients) -> MutexGuard<'_, Vec<WebSocket<TcpStream>>> {
    match clients.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

fn reserve_port(port: u16) -> std::io::Result<(TcpListener, u16)> {
    let listener = match TcpListener::bind(("127.0.0.1", port)) {
        Ok(sock) => sock,
        Err(_) => TcpListener::bind("127.0.0.1:0")?,
    };
    let port = listener.local_addr()?.port();
    Ok((listener, port))
}

fn accept_clients(server: TcpListener, clients: Clients) -> JoinHandle<()> {
    std::thread::spawn(move || {
        for stream in server.incoming() {
            let stream = match stream {
                Ok(stream) => stream,
                Err(e) => {
                    log::warn!("Reload connection failed: {e}");
                    continue;
                }
            };
            match tungstenite::accept(stream) {
                Ok(socket) => lock(&clients).push(socket),
                Err(e) => log::warn!("Reload handshake failed: {e}"),
            }
        }
    })
}

impl LiveReloadServer for WebSocketReloadServer {
    fn start(&self) -> anyhow::Result<u16> {
        if let Some(port) = self.started.get() {
            return Ok(*port);
        }
        let (listener, port) = reserve_port(self.port)?;
        let _thread = accept_clients(listener, self.clients.clone());
        log::info!("Live reload listening on ws://127.0.0.1:{port}");
        Ok(*self.started.get_or_init(|| port))
    }

    fn reload(&self) {
        let mut clients = lock(&self.clients);
        let mut broken = vec![];

        for (i, socket) in clients.iter_mut().enumerate() {
            match socket.send("reload".into()) {
                Ok(_) => {}
                Err(tungstenite::Error::Io(e)) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                    broken.push(i);
                }
                Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed) => {
                    broken.push(i);
                }
                Err(e) => log::error!("Reload broadcast failed: {e}"),
            }
        }

        for i in broken.into_iter().rev() {
            clients.remove(i);
        }

        let len = clients.len();
        if len > MAX_CLIENTS {
            for mut socket in clients.drain(0..len - MAX_CLIENTS) {
                socket.close(None).ok();
            }
        }
        log::debug!("Reload sent to {} client(s)", clients.len());
    }
}

/// Script that reloads the page when the server broadcasts `"reload"`.
pub fn reload_snippet(port: u16) -> String {
    format!(
        "<script>new WebSocket(\"ws://\" + location.hostname + \":{port}\").onmessage = \
         function (e) {{ if (e.data === \"reload\") location.reload(); }};</script>"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn connected_client_receives_reload() {
        let server = WebSocketReloadServer::new(0);
        let port = server.start().unwrap();
        assert_eq!(server.start().unwrap(), port);

        let (mut socket, _) = tungstenite::connect(format!("ws://127.0.0.1:{port}")).unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        while server.client_count() == 0 && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(10));
        }
        server.reload();

        let message = socket.read().unwrap();
        assert_eq!(message.into_text().unwrap().as_str(), "reload");
    }

    #[test]
    fn reload_without_clients_is_a_no_op() {
        let server = WebSocketReloadServer::new(0);
        server.reload();
        assert_eq!(server.client_count(), 0);
    }

    #[test]
    fn snippet_targets_port() {
        assert!(reload_snippet(35729).contains(":35729"));
    }
}
