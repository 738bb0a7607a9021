use crate::app::SharedSnapshot;
use crate::events::{AppEvent, Command};
use async_channel::Sender;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixListener;

pub const SOCKET_PATH: &str = "/tmp/tabdeck.sock";

/// Reply to one control line. `status` is answered from the snapshot, every
/// other command is forwarded to the app.
pub async fn respond(line: &str, tx: &Sender<AppEvent>, snapshot: &SharedSnapshot) -> String {
    match line.parse::<Command>() {
        Ok(Command::Status) => {
            let status = serde_json::to_string(&*snapshot.read());
            status.unwrap_or_else(|e| format!("error: {}", e))
        }
        Ok(command) => match tx.send(AppEvent::Command(command)).await {
            Ok(()) => "ok".to_string(),
            Err(e) => format!("error: {}", e),
        },
        Err(e) => {
            log::warn!("Rejected command '{}': {}", line, e);
            format!("error: {}", e)
        }
    }
}

pub async fn run_server(tx: Sender<AppEvent>, snapshot: SharedSnapshot) {
    // Cleanup old socket if it exists
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

    loop {
        match listener.accept().await {
            Ok((stream, _)) => {
                let tx = tx.clone();
                let snapshot = snapshot.clone();
                tokio::spawn(async move {
                    let (reader, mut writer) = stream.into_split();
                    let mut lines = BufReader::new(reader).lines();

                    while let Ok(Some(line)) = lines.next_line().await {
                        if line.trim().is_empty() {
                            continue;
                        }
                        let reply = respond(&line, &tx, &snapshot).await;
                        if writer.write_all(format!("{}\n", reply).as_bytes()).await.is_err() {
                            break;
                        }
                    }
                });
            }
            Err(e) => {
                log::error!("Failed to accept connection: {}", e);
            }
        }
    }
}
