use scale_control::{RenderAdapter, ScaleLayout, SelectionFrame, TrackPath};

/// Rendering adapter for a headless host: every layout and selection change
/// goes to the log instead of the screen.
#[derive(Debug, Default)]
pub struct LogAdapter;

impl RenderAdapter for LogAdapter {
    fn apply_layout(&mut self, layout: &ScaleLayout) {
        log::info!(
            "layout {} {:.1}x{:.1}, {} labels, unit {:.1}",
            layout.mode,
            layout.content_size.width,
            layout.content_size.height,
            layout.labels.len(),
            layout.unit_size
        );
        match layout.track {
            TrackPath::Line { start, end } => log::debug!(
                "track ({:.1}, {:.1}) -> ({:.1}, {:.1})",
                start.x,
                start.y,
                end.x,
                end.y
            ),
            TrackPath::Arc { center, radius, .. } => log::debug!(
                "track arc around ({:.1}, {:.1}) r {:.1}",
                center.x,
                center.y,
                radius
            ),
        }
        for label in &layout.labels {
            let center = label.frame.center();
            log::debug!("label {} at ({:.1}, {:.1})", label.text, center.x, center.y);
        }
        if let Some(text) = &layout.minimum_description {
            log::debug!("minimum description '{}'", text);
        }
        if let Some(text) = &layout.maximum_description {
            log::debug!("maximum description '{}'", text);
        }
    }

    fn apply_selection(&mut self, frame: Option<&SelectionFrame>, animated: bool) {
        match frame {
            Some(frame) => {
                let center = frame.rect.center();
                log::debug!(
                    "selection at ({:.1}, {:.1}){}",
                    center.x,
                    center.y,
                    if animated { " (animated)" } else { "" }
                );
            }
            None => log::debug!("selection hidden"),
        }
    }

    fn value_changed(&mut self, value: Option<i64>) {
        match value {
            Some(v) => log::info!("value changed: {}", v),
            None => log::info!("value changed: none"),
        }
    }

    fn reject_gesture(&mut self) {
        log::info!("drag rejected");
    }
}
