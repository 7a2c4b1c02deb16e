//! Terminal report rendering
//!
//! Renders a [`TrackingView`] as three text sections: status panel, timeline
//! and route map. Colors follow the active theme and are only emitted when
//! enabled.

use crate::state::Theme;
use chrono::{DateTime, Local};
use parcel_tracker::{EpochMillis, LatLng, StatusPill, TrackingView};
use std::fmt::Write;

const RULE: &str = "───────────────────────────────────────────────";
const BANNER: &str = "═══════════════════════════════════════════════";
const RESET: &str = "\x1b[0m";

/// Local display time for an epoch timestamp
pub fn format_timestamp(millis: EpochMillis) -> String {
    DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn format_lat_lng(point: &LatLng) -> String {
    format!("({:.3}, {:.3})", point.lat, point.lng)
}

/// ANSI color set for one theme
struct Palette {
    current: &'static str,
    delivered: &'static str,
    out_for_delivery: &'static str,
    in_transit: &'static str,
    info: &'static str,
}

impl Palette {
    fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Palette {
                current: "\x1b[1;32m",
                delivered: "\x1b[32m",
                out_for_delivery: "\x1b[33m",
                in_transit: "\x1b[34m",
                info: "\x1b[90m",
            },
            Theme::Dark => Palette {
                current: "\x1b[1;92m",
                delivered: "\x1b[92m",
                out_for_delivery: "\x1b[93m",
                in_transit: "\x1b[96m",
                info: "\x1b[37m",
            },
        }
    }

    fn pill(&self, pill: StatusPill) -> &'static str {
        match pill {
            StatusPill::Delivered => self.delivered,
            StatusPill::OutForDelivery => self.out_for_delivery,
            StatusPill::InTransit => self.in_transit,
            StatusPill::Info => self.info,
        }
    }
}

/// Text renderer for tracking views
pub struct Renderer {
    palette: Palette,
    color: bool,
}

impl Renderer {
    pub fn new(theme: Theme, color: bool) -> Self {
        Self {
            palette: Palette::for_theme(theme),
            color,
        }
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.color {
            format!("{}{}{}", code, text, RESET)
        } else {
            text.to_string()
        }
    }

    /// Render the full report. `share_link` is shown under the status panel.
    pub fn render(&self, view: &TrackingView, share_link: &str) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail
        let _ = self.write_status(&mut out, view, share_link);
        let _ = self.write_timeline(&mut out, view);
        let _ = self.write_map(&mut out, view);
        out
    }

    fn write_status(&self, out: &mut String, view: &TrackingView, share_link: &str) -> std::fmt::Result {
        let status = &view.status;
        writeln!(out, "{}", BANNER)?;
        writeln!(out, "  {}", self.paint(self.palette.current, &status.status_text))?;
        writeln!(out, "{}", BANNER)?;
        writeln!(out, "Carrier: {}", status.carrier)?;
        writeln!(out, "Tracking: {}", status.tracking_number)?;
        writeln!(out, "Last update: {}", format_timestamp(status.last_update))?;
        writeln!(out, "ETA: {}", status.countdown)?;
        writeln!(out, "Estimated delivery: {}", format_timestamp(status.eta))?;
        writeln!(out, "Share: {}", share_link)?;
        writeln!(out)
    }

    fn write_timeline(&self, out: &mut String, view: &TrackingView) -> std::fmt::Result {
        writeln!(out, "Timeline")?;
        writeln!(out, "{}", RULE)?;

        let current = view.map.current_index;
        for (i, entry) in view.timeline.iter().enumerate() {
            let marker = if entry.is_current {
                "▶"
            } else if i < current {
                "✓"
            } else {
                "○"
            };
            let title = if entry.is_current {
                self.paint(self.palette.current, &entry.title)
            } else {
                entry.title.clone()
            };
            let pill = self.paint(self.palette.pill(entry.pill), &format!("[{}]", entry.pill));

            writeln!(out, " {} {} {}", marker, title, pill)?;
            writeln!(
                out,
                "     {} · {} · {}",
                format_timestamp(entry.timestamp),
                entry.location,
                format_lat_lng(&LatLng {
                    lat: entry.latitude,
                    lng: entry.longitude
                })
            )?;
        }
        writeln!(out)
    }

    fn write_map(&self, out: &mut String, view: &TrackingView) -> std::fmt::Result {
        let map = &view.map;
        writeln!(out, "Route map")?;
        writeln!(out, "{}", RULE)?;

        for (i, point) in map.path.iter().enumerate() {
            let location = view
                .timeline
                .get(i)
                .map(|entry| entry.location.as_str())
                .unwrap_or("");
            if i == map.current_index {
                let line = format!("  [{}] {} {}  ◀ parcel", i, format_lat_lng(point), location);
                writeln!(out, "{}", self.paint(self.palette.current, &line))?;
            } else {
                writeln!(out, "  [{}] {} {}", i, format_lat_lng(point), location)?;
            }
        }
        writeln!(
            out,
            "Bounds: SW {} NE {}",
            format_lat_lng(&map.bounds.south_west),
            format_lat_lng(&map.bounds.north_east)
        )
    }
}
