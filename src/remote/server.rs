use axum::extract::rejection::FormRejection;
use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::mpsc;
use std::thread;
use tokio::sync::{broadcast, oneshot};

use crate::remote::RemoteCommand;

const CONTROL_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Music Player</title></head>
<body>
<h1>Music Player</h1>
<form method="post" action="/">
  <button type="submit" name="action" value="Play">Play</button>
  <button type="submit" name="action" value="Pause">Pause</button>
  <button type="submit" name="action" value="Stop">Stop</button>
</form>
</body>
</html>
"#;

#[derive(Debug, Deserialize)]
pub struct ControlForm {
    action: Option<String>,
}

pub fn router(commands: broadcast::Sender<RemoteCommand>) -> Router {
    Router::new()
        .route("/", get(control_page).post(control_action))
        .with_state(commands)
}

async fn control_page() -> Html<&'static str> {
    Html(CONTROL_PAGE)
}

async fn control_action(
    State(commands): State<broadcast::Sender<RemoteCommand>>,
    form: Result<Form<ControlForm>, FormRejection>,
) -> Response {
    let action = match form {
        Ok(Form(ControlForm { action: Some(action) })) => action,
        Ok(Form(ControlForm { action: None })) => {
            log::warn!("Rejected remote request without an action");
            return (StatusCode::BAD_REQUEST, "Missing action").into_response();
        }
        Err(e) => {
            log::warn!("Rejected malformed remote request: {}", e);
            return (StatusCode::BAD_REQUEST, e.body_text()).into_response();
        }
    };

    let command = match action.parse::<RemoteCommand>() {
        Ok(command) => command,
        Err(e) => {
            log::warn!("Rejected remote request: {}", e);
            return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
        }
    };

    log::info!("Remote requested {}", command.as_str());
    if let Err(e) = commands.send(command) {
        log::error!("No listener for remote command {:?}: {}", command, e);
    }

    Redirect::to("/").into_response()
}

/// HTTP listener on its own thread. Dropping it shuts the server down.
pub struct RemoteServer {
    local_addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    thread: Option<thread::JoinHandle<()>>,
}

impl RemoteServer {
    pub fn start(bind_address: &str) -> anyhow::Result<(Self, broadcast::Receiver<RemoteCommand>)> {
        let addr: SocketAddr = bind_address.parse()
            .map_err(|e| anyhow::anyhow!("Invalid remote bind address '{}': {}", bind_address, e))?;

        let (event_sender, event_receiver) = broadcast::channel(32);
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let (ready_tx, ready_rx) = mpsc::channel::<anyhow::Result<SocketAddr>>();

        let app = router(event_sender);
        let thread = thread::Builder::new()
            .name("remote-http".to_string())
            .spawn(move || {
                let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
                    Ok(runtime) => runtime,
                    Err(e) => {
                        let _ = ready_tx.send(Err(anyhow::anyhow!("Failed to build tokio runtime: {}", e)));
                        return;
                    }
                };

                runtime.block_on(async move {
                    let listener = match tokio::net::TcpListener::bind(addr).await {
                        Ok(listener) => listener,
                        Err(e) => {
                            let _ = ready_tx.send(Err(anyhow::anyhow!("Failed to bind {}: {}", addr, e)));
                            return;
                        }
                    };

                    let local_addr = match listener.local_addr() {
                        Ok(local_addr) => local_addr,
                        Err(e) => {
                            let _ = ready_tx.send(Err(anyhow::anyhow!("Failed to read bound address: {}", e)));
                            return;
                        }
                    };
                    let _ = ready_tx.send(Ok(local_addr));

                    let served = axum::serve(listener, app)
                        .with_graceful_shutdown(async move {
                            let _ = shutdown_rx.await;
                        })
                        .await;
                    if let Err(e) = served {
                        log::error!("Remote control server failed: {}", e);
                    }
                });
                log::debug!("Remote control server thread exiting");
            })
            .map_err(|e| anyhow::anyhow!("Failed to spawn remote server thread: {}", e))?;

        let local_addr = ready_rx.recv()
            .map_err(|_| anyhow::anyhow!("Remote server thread exited before binding"))??;

        log::info!("Remote control listening on http://{}", local_addr);
        Ok((
            RemoteServer {
                local_addr,
                shutdown: Some(shutdown_tx),
                thread: Some(thread),
            },
            event_receiver,
        ))
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}

impl Drop for RemoteServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(thread) = self.thread.take() {
            if let Err(e) = thread.join() {
                log::warn!("Remote server thread didn't join cleanly: {:?}", e);
            }
        }
    }
}
