use crate::events::HostEvent;
use async_channel::Sender;
use scale_control::protocol::{HostCommand, SOCKET_PATH};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::UnixListener;

/// Reply for a command the host queued.
pub const REPLY_OK: &str = "ok";
/// Prefix of the reply for a line that did not parse.
pub const REPLY_ERROR: &str = "error";

pub async fn run_server(tx: Sender<HostEvent>) {
    if std::fs::metadata(SOCKET_PATH).is_ok() {
        let _ = std::fs::remove_file(SOCKET_PATH);
    }

    let listener = match UnixListener::bind(SOCKET_PATH) {
        Ok(l) => l,
        Err(e) => {
            log::error!("Failed to bind unix socket: {}", e);
            return;
        }
    };
    log::info!("Listening on {}", SOCKET_PATH);

    let mut next_client = 0u64;
    loop {
        match listener.accept().await {
            Ok((stream, _)) => {
                next_client += 1;
                let client = next_client;
                let tx = tx.clone();
                tokio::spawn(async move {
                    log::debug!("client {client} connected");
                    let queued = serve_client(stream, &tx).await;
                    log::debug!("client {client} left after {queued} commands");
                });
            }
            Err(e) => {
                log::error!("Failed to accept connection: {}", e);
            }
        }
    }
}

/// Reads commands line by line, queues each one and answers `ok` or
/// `error <reason>`. Returns how many commands were queued.
pub async fn serve_client<S>(stream: S, tx: &Sender<HostEvent>) -> usize
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let (reader, mut writer) = tokio::io::split(stream);
    let mut lines = BufReader::new(reader).lines();
    let mut queued = 0;

    while let Ok(Some(line)) = lines.next_line().await {
        if line.trim().is_empty() {
            continue;
        }
        let reply = match line.parse::<HostCommand>() {
            Ok(command) => {
                if tx.send(HostEvent::Command(command)).await.is_err() {
                    break;
                }
                queued += 1;
                REPLY_OK.to_string()
            }
            Err(e) => {
                log::warn!("Ignoring command: {}", e);
                format!("{REPLY_ERROR} {e}")
            }
        };
        if writer.write_all(format!("{reply}\n").as_bytes()).await.is_err() {
            break;
        }
    }
    queued
}
