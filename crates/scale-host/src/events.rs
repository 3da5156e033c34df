use scale_control::protocol::HostCommand;

#[derive(Debug, Clone)]
pub enum HostEvent {
    Command(HostCommand),
    ConfigReload,
}
