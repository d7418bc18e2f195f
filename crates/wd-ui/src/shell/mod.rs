use std::collections::VecDeque;
use std::time::{Duration, Instant};
use egui::{Context, RichText, TopBottomPanel};

use crate::theme;

/// Menu commands handled by the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellAction {
    OpenDataFolder,
    ReloadData,
    ResetViews,
    ResetLayout,
    Quit,
}

/// Severity of a status message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// Message shown in the status bar
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub level: StatusLevel,
    pub text: String,
    pub timestamp: Instant,
}

/// Recent status messages, oldest first
#[derive(Debug)]
pub struct StatusLog {
    messages: VecDeque<StatusMessage>,
    capacity: usize,
    retention: Duration,
}

impl Default for StatusLog {
    fn default() -> Self {
        Self::new(8, Duration::from_secs(10))
    }
}

impl StatusLog {
    /// A capacity of zero is raised to one
    pub fn new(capacity: usize, retention: Duration) -> Self {
        let capacity = capacity.max(1);
        Self {
            messages: VecDeque::with_capacity(capacity),
            capacity,
            retention,
        }
    }

    pub fn push(&mut self, level: StatusLevel, text: impl Into<String>) {
        self.push_at(level, text, Instant::now());
    }

    fn push_at(&mut self, level: StatusLevel, text: impl Into<String>, timestamp: Instant) {
        while self.messages.len() >= self.capacity {
            self.messages.pop_front();
        }
        self.messages.push_back(StatusMessage {
            level,
            text: text.into(),
            timestamp,
        });
    }

    /// Drop messages older than the retention period
    pub fn prune(&mut self, now: Instant) {
        let retention = self.retention;
        self.messages
            .retain(|msg| now.saturating_duration_since(msg.timestamp) < retention);
    }

    pub fn latest(&self) -> Option<&StatusMessage> {
        self.messages.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusMessage> {
        self.messages.iter()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

/// Render the main menu bar and report the chosen command
pub fn menu_bar(ctx: &Context, data_dir: &str) -> Option<ShellAction> {
    let mut action = None;

    TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("Open Data Folder...").clicked() {
                    action = Some(ShellAction::OpenDataFolder);
                    ui.close_menu();
                }

                if ui.button("Reload Data").clicked() {
                    action = Some(ShellAction::ReloadData);
                    ui.close_menu();
                }

                ui.separator();

                if ui.button("Quit").clicked() {
                    action = Some(ShellAction::Quit);
                    ui.close_menu();
                }
            });

            ui.menu_button("View", |ui| {
                if ui.button("Reset Views").clicked() {
                    action = Some(ShellAction::ResetViews);
                    ui.close_menu();
                }

                if ui.button("Reset Layout").clicked() {
                    action = Some(ShellAction::ResetLayout);
                    ui.close_menu();
                }
            });

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(RichText::new(data_dir).weak());
            });
        });
    });

    action
}

/// Render the bottom status bar with the most recent message
pub fn status_bar(ctx: &Context, log: &StatusLog, summary: &str) {
    TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.label(summary);

            if let Some(msg) = log.latest() {
                ui.separator();
                let color = match msg.level {
                    StatusLevel::Info => ui.visuals().text_color(),
                    StatusLevel::Warning => theme::warning_color(),
                    StatusLevel::Error => theme::error_color(),
                };
                let icon = match msg.level {
                    StatusLevel::Info => "ℹ",
                    StatusLevel::Warning | StatusLevel::Error => "⚠",
                };
                ui.label(RichText::new(format!("{} {}", icon, msg.text)).color(color));
            }
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_log_capacity() {
        let mut log = StatusLog::new(2, Duration::from_secs(10));
        log.push(StatusLevel::Info, "one");
        log.push(StatusLevel::Warning, "two");
        log.push(StatusLevel::Error, "three");

        let texts: Vec<&str> = log.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["two", "three"]);
        assert_eq!(log.latest().map(|m| m.level), Some(StatusLevel::Error));
    }

    #[test]
    fn test_status_log_zero_capacity_keeps_latest() {
        let mut log = StatusLog::new(0, Duration::from_secs(10));
        for text in ["one", "two", "three"] {
            log.push(StatusLevel::Info, text);
        }
        assert_eq!(log.iter().count(), 1);
        assert_eq!(log.latest().map(|m| m.text.as_str()), Some("three"));
    }

    #[test]
    fn test_status_log_prune() {
        let mut log = StatusLog::new(4, Duration::from_secs(10));
        let start = Instant::now();
        log.push_at(StatusLevel::Info, "old", start);
        log.push_at(StatusLevel::Info, "new", start + Duration::from_secs(8));

        log.prune(start + Duration::from_secs(12));
        let texts: Vec<&str> = log.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["new"]);

        log.clear();
        assert!(log.latest().is_none());
    }
}
