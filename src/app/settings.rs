//! Local-only settings pages
//!
//! Toggles and sliders here live only as long as their page is open. None
//! of it is sent to the server or persisted.

/// Sub-pages reachable from the settings index
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SettingsPage {
    #[default]
    Index,
    Notifications,
    Statistics,
    Thresholds,
    Sounds,
    Triggers,
    Device,
    About,
}

impl SettingsPage {
    pub fn title(&self) -> &'static str {
        match self {
            SettingsPage::Index => "Settings",
            SettingsPage::Notifications => "Notifications",
            SettingsPage::Statistics => "Statistics",
            SettingsPage::Thresholds => "Alert Thresholds",
            SettingsPage::Sounds => "Sound Preferences",
            SettingsPage::Triggers => "Sound Triggers",
            SettingsPage::Device => "Device Settings",
            SettingsPage::About => "About",
        }
    }
}

pub struct SettingsGroup {
    pub title: &'static str,
    pub items: &'static [SettingsPage],
}

/// Index layout, in display order
pub const SETTINGS_GROUPS: &[SettingsGroup] = &[
    SettingsGroup {
        title: "Monitoring",
        items: &[
            SettingsPage::Notifications,
            SettingsPage::Statistics,
            SettingsPage::Thresholds,
        ],
    },
    SettingsGroup {
        title: "Sound Settings",
        items: &[SettingsPage::Sounds, SettingsPage::Triggers],
    },
    SettingsGroup {
        title: "Device",
        items: &[SettingsPage::Device, SettingsPage::About],
    },
];

/// Index entries flattened across groups
pub fn index_entries() -> Vec<SettingsPage> {
    SETTINGS_GROUPS
        .iter()
        .flat_map(|g| g.items.iter().copied())
        .collect()
}

/// An on/off row with a description
#[derive(Clone, Debug, PartialEq)]
pub struct ToggleSetting {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub enabled: bool,
}

impl ToggleSetting {
    const fn new(
        id: &'static str,
        title: &'static str,
        description: &'static str,
        enabled: bool,
    ) -> Self {
        ToggleSetting {
            id,
            title,
            description,
            enabled,
        }
    }
}

pub fn default_notifications() -> Vec<ToggleSetting> {
    vec![
        ToggleSetting::new("crying", "Crying Alerts", "Get notified when baby is crying", true),
        ToggleSetting::new(
            "movement",
            "Movement Detection",
            "Alert when unusual movement is detected",
            true,
        ),
        ToggleSetting::new("sleep", "Sleep Updates", "Receive updates about sleep patterns", false),
        ToggleSetting::new("sound", "Loud Sounds", "Alert for unexpected loud noises", true),
    ]
}

/// A bounded slider value
#[derive(Clone, Debug, PartialEq)]
pub struct Slider {
    pub id: &'static str,
    pub name: &'static str,
    pub value: f64,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub unit: &'static str,
}

impl Slider {
    pub fn adjust(&mut self, steps: i32) {
        let value = self.value + self.step * steps as f64;
        self.value = value.clamp(self.min, self.max);
    }

    /// Position within the range, 0.0..=1.0
    pub fn ratio(&self) -> f64 {
        if self.max > self.min {
            (self.value - self.min) / (self.max - self.min)
        } else {
            0.0
        }
    }

    /// Threshold style: `70%`, `30s`
    pub fn percent_label(&self) -> String {
        format!("{}{}", (self.value * 100.0).round() as i64, self.unit)
    }
}

pub fn default_thresholds() -> Vec<Slider> {
    let threshold = |id, name, value, unit| Slider {
        id,
        name,
        value,
        min: 0.0,
        max: 1.0,
        step: 0.05,
        unit,
    };
    vec![
        threshold("cry_sensitivity", "Crying Detection Sensitivity", 0.7, "%"),
        threshold("motion_sensitivity", "Motion Detection Sensitivity", 0.6, "%"),
        threshold("noise_threshold", "Background Noise Threshold", 0.4, "%"),
        threshold("alert_delay", "Alert Delay", 0.3, "s"),
    ]
}

#[derive(Clone, Debug, PartialEq)]
pub struct SoundPreferences {
    pub toggles: Vec<ToggleSetting>,
    pub default_volume: Slider,
    pub fade_time: Slider,
}

impl Default for SoundPreferences {
    fn default() -> Self {
        SoundPreferences {
            toggles: vec![
                ToggleSetting::new(
                    "auto_play",
                    "Auto-play on crying",
                    "Automatically play soothing sounds when crying is detected",
                    true,
                ),
                ToggleSetting::new(
                    "fade",
                    "Fade In/Out",
                    "Gradually change volume when starting or stopping",
                    true,
                ),
                ToggleSetting::new(
                    "loop",
                    "Loop Sounds",
                    "Continuously play sounds until manually stopped",
                    true,
                ),
            ],
            default_volume: Slider {
                id: "default_volume",
                name: "Default Volume",
                value: 0.7,
                min: 0.0,
                max: 1.0,
                step: 0.05,
                unit: "%",
            },
            fade_time: Slider {
                id: "fade_time",
                name: "Fade Duration",
                value: 0.5,
                min: 0.0,
                max: 2.0,
                step: 0.1,
                unit: "s",
            },
        }
    }
}

impl SoundPreferences {
    /// Rows: toggles first, then the two sliders
    pub fn row_count(&self) -> usize {
        self.toggles.len() + 2
    }

    pub fn slider_mut(&mut self, row: usize) -> Option<&mut Slider> {
        match row.checked_sub(self.toggles.len()) {
            Some(0) => Some(&mut self.default_volume),
            Some(1) => Some(&mut self.fade_time),
            _ => None,
        }
    }

    pub fn volume_label(&self) -> String {
        format!("{}%", (self.default_volume.value * 100.0).round() as i64)
    }

    pub fn fade_label(&self) -> String {
        format!("{:.1}s", self.fade_time.value)
    }
}

/// Static summary cards on the statistics page
pub const STATISTICS_SUMMARY: &[(&str, &str)] = &[
    ("Avg. Sleep", "6.5 hrs"),
    ("Crying/Day", "3 times"),
    ("Deep Sleep", "4.2 hrs"),
    ("Activity", "Normal"),
];

/// State of whichever settings page is open
#[derive(Clone, Debug, PartialEq)]
pub struct SettingsState {
    pub page: SettingsPage,
    pub index_selected: usize,
    pub selected: usize,
    pub notifications: Vec<ToggleSetting>,
    pub sounds: SoundPreferences,
    pub thresholds: Vec<Slider>,
}

impl Default for SettingsState {
    fn default() -> Self {
        SettingsState {
            page: SettingsPage::Index,
            index_selected: 0,
            selected: 0,
            notifications: default_notifications(),
            sounds: SoundPreferences::default(),
            thresholds: default_thresholds(),
        }
    }
}

impl SettingsState {
    fn row_count(&self) -> usize {
        match self.page {
            SettingsPage::Index => index_entries().len(),
            SettingsPage::Notifications => self.notifications.len(),
            SettingsPage::Sounds => self.sounds.row_count(),
            SettingsPage::Thresholds => self.thresholds.len(),
            _ => 0,
        }
    }

    fn cursor_mut(&mut self) -> &mut usize {
        if self.page == SettingsPage::Index {
            &mut self.index_selected
        } else {
            &mut self.selected
        }
    }

    pub fn select_next(&mut self) {
        let count = self.row_count();
        if count > 0 {
            let cursor = self.cursor_mut();
            *cursor = (*cursor + 1) % count;
        }
    }

    pub fn select_prev(&mut self) {
        let count = self.row_count();
        if count > 0 {
            let cursor = self.cursor_mut();
            *cursor = cursor.checked_sub(1).unwrap_or(count - 1);
        }
    }

    /// Enter on the index opens a page; inside a page it toggles
    pub fn activate(&mut self) {
        if self.page == SettingsPage::Index {
            if let Some(page) = index_entries().get(self.index_selected).copied() {
                self.open(page);
            }
        } else {
            self.toggle();
        }
    }

    pub fn open(&mut self, page: SettingsPage) {
        tracing::debug!(page = page.title(), "Opening settings page");
        self.page = page;
        self.selected = 0;
    }

    /// Leave the current page; its local edits are discarded
    pub fn back(&mut self) {
        let index_selected = self.index_selected;
        *self = SettingsState {
            index_selected,
            ..SettingsState::default()
        };
    }

    pub fn toggle(&mut self) {
        let row = self.selected;
        let setting = match self.page {
            SettingsPage::Notifications => self.notifications.get_mut(row),
            SettingsPage::Sounds => self.sounds.toggles.get_mut(row),
            _ => None,
        };
        if let Some(setting) = setting {
            setting.enabled = !setting.enabled;
        }
    }

    pub fn adjust(&mut self, steps: i32) {
        let row = self.selected;
        let slider = match self.page {
            SettingsPage::Thresholds => self.thresholds.get_mut(row),
            SettingsPage::Sounds => self.sounds.slider_mut(row),
            _ => None,
        };
        if let Some(slider) = slider {
            slider.adjust(steps);
        }
    }
}
