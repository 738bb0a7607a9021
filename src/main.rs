use tabdeck::app::{App, SharedSnapshot};
use tabdeck::sys::runtime;
use tabdeck::{config, store};

fn main() {
    env_logger::init();

    let config = config::load_or_default();
    let store = store::load_or_builtin();
    let snapshot = SharedSnapshot::default();

    let (tx, rx) = async_channel::bounded(32);

    // Start Background Services
    runtime::start_background_services(tx, snapshot.clone());

    App::new(config, store, snapshot).run(rx);
}
