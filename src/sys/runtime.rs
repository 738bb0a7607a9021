use crate::app::SharedSnapshot;
use crate::events::AppEvent;
use crate::{config, store};
use async_channel::Sender;
use std::thread;
use tokio::runtime::Runtime;

pub fn start_background_services(tx: Sender<AppEvent>, snapshot: SharedSnapshot) {
    thread::spawn(move || {
        let rt = match Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                log::error!("Failed to create Tokio runtime: {}", e);
                return;
            }
        };

        rt.block_on(async {
            {
                let tx = tx.clone();
                tokio::spawn(async move {
                    crate::sys::server::run_server(tx, snapshot).await;
                });
            }

            match config::get_config_path() {
                Ok(path) => {
                    let tx = tx.clone();
                    tokio::spawn(config::run_async_watcher(path, AppEvent::ConfigReload, tx));
                }
                Err(e) => log::error!("Config watcher error: {}", e),
            }

            match store::get_store_path() {
                Ok(path) => {
                    let tx = tx.clone();
                    tokio::spawn(config::run_async_watcher(path, AppEvent::StoreReload, tx));
                }
                Err(e) => log::error!("Store watcher error: {}", e),
            }

            std::future::pending::<()>().await;
        });
    });
}
