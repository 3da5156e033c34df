use crate::config::{self, Config};
use crate::events::HostEvent;
use crate::host::LogAdapter;
use scale_control::protocol::HostCommand;
use scale_control::{
    Description, GestureOutcome, RangeError, RenderAdapter, ScaleControl, ViewMetrics,
};

/// The control plus the view it renders into. Lives on the thread that drains
/// the event channel; nothing else touches the control.
pub struct HostModel<A: RenderAdapter = LogAdapter> {
    control: ScaleControl,
    adapter: A,
}

impl HostModel<LogAdapter> {
    pub fn new(config: &Config) -> Result<Self, RangeError> {
        Self::with_adapter(config, LogAdapter)
    }
}

impl<A: RenderAdapter> HostModel<A> {
    pub fn with_adapter(config: &Config, adapter: A) -> Result<Self, RangeError> {
        Ok(Self {
            control: config.build_control()?,
            adapter,
        })
    }

    pub fn control(&self) -> &ScaleControl {
        &self.control
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn render(&mut self) {
        self.control.render(&mut self.adapter);
    }

    pub fn update(&mut self, event: HostEvent) {
        match event {
            HostEvent::Command(command) => self.apply(command),
            HostEvent::ConfigReload => match config::load_config() {
                Ok(new_config) => self.reload(&new_config),
                Err(e) => log::error!("Failed to reload config: {}", e),
            },
        }
    }

    pub fn reload(&mut self, config: &Config) {
        match config.apply(&mut self.control) {
            Ok(()) => {
                self.relayout();
                log::info!("Configuration reloaded");
            }
            Err(e) => log::error!("Rejected config: {}", e),
        }
    }

    fn relayout(&mut self) {
        self.control.update();
        self.render();
    }

    fn gesture(&mut self, outcome: GestureOutcome) {
        self.control.dispatch(outcome, &mut self.adapter);
    }

    pub fn apply(&mut self, command: HostCommand) {
        log::debug!("command: {}", command);
        match command {
            HostCommand::Tap(p) => {
                let outcome = self.control.tap(p);
                self.gesture(outcome);
            }
            HostCommand::DragBegin(p) => {
                let outcome = self.control.drag_began(p);
                self.gesture(outcome);
            }
            HostCommand::DragMove(p) => {
                let outcome = self.control.drag_moved(p);
                self.gesture(outcome);
            }
            HostCommand::DragEnd(p) => {
                let outcome = self.control.drag_ended(p);
                self.gesture(outcome);
            }
            HostCommand::DragCancel => {
                let outcome = self.control.drag_cancelled();
                self.gesture(outcome);
            }
            HostCommand::Resize(size) => {
                self.control.set_metrics(ViewMetrics {
                    available: size,
                    ..self.control.metrics()
                });
                self.relayout();
            }
            HostCommand::Minimum(v) => {
                self.control.set_minimum_value(v);
                self.relayout();
            }
            HostCommand::Maximum(v) => {
                self.control.set_maximum_value(v);
                self.relayout();
            }
            HostCommand::Select(v) => {
                self.control.set_selected_value(v, true);
                self.render();
            }
            HostCommand::DescribeMinimum(text) => {
                self.control.set_minimum_description(text.map(Description::new));
                self.relayout();
            }
            HostCommand::DescribeMaximum(text) => {
                self.control.set_maximum_description(text.map(Description::new));
                self.relayout();
            }
            HostCommand::Mode(mode) => {
                self.control.set_mode_override(mode);
                self.relayout();
            }
            HostCommand::Dump => {
                log::info!(
                    "range {}..={}, selected {:?}, mode {}",
                    self.control.minimum_value(),
                    self.control.maximum_value(),
                    self.control.selected_value(),
                    self.control.display_mode()
                );
                self.render();
            }
        }
    }
}
