use scale_host::config;
use scale_host::host::HostModel;
use scale_host::sys::runtime;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    match config::write_default_config() {
        Ok(path) => log::debug!("Config file: {}", path.display()),
        Err(e) => log::warn!("Could not seed default config: {}", e),
    }

    let config = config::load_or_default();
    let mut model = HostModel::new(&config)?;

    let (tx, rx) = async_channel::bounded(32);

    // Start Background Services
    runtime::start_background_services(tx);

    model.render();
    while let Ok(event) = rx.recv_blocking() {
        model.update(event);
    }
    Ok(())
}
