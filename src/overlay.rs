//! Scanner overlay model: instruction text, which controls render and where
//! the scanning frame sits. Drawing is left to the host view.

use crate::config::{IconConfig, UiConfig};
use crate::device::TorchMode;
use crate::geometry::Rect;
use serde::{Deserialize, Serialize};

const FRAME_SIZE: f64 = 200.0;
const BOTTOM_SPACE: f64 = 80.0;

/// Language of the fixed overlay strings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Ru,
    Tj,
}

impl Locale {
    pub fn code(&self) -> &'static str {
        match self {
            Locale::Ru => "ru",
            Locale::Tj => "tj",
        }
    }

    pub fn strings(&self) -> &'static OverlayStrings {
        match self {
            Locale::Ru => &RU_STRINGS,
            Locale::Tj => &TJ_STRINGS,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct OverlayStrings {
    pub instruction: &'static str,
    pub cancel: &'static str,
    pub gallery: &'static str,
    /// Title of the text torch button
    pub torch: &'static str,
}

static RU_STRINGS: OverlayStrings = OverlayStrings {
    instruction: "Поместите QR-код в рамку для сканирования",
    cancel: "Отмена",
    gallery: "Загрузить",
    torch: "Фонарик",
};

static TJ_STRINGS: OverlayStrings = OverlayStrings {
    instruction: "Рамзи QR-ро дар чорчӯбаи скан ҷойгир кунед",
    cancel: "Бе кор кардан",
    gallery: "Боргирии QR аз галерея",
    torch: "Чароғак",
};

/// How the cancel button is drawn
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CancelButton {
    Icon(String),
    Title(&'static str),
}

/// Controls the overlay shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlSet {
    pub cancel: CancelButton,
    pub gallery_title: &'static str,
    /// Text torch button, always shown
    pub torch_title: &'static str,
    /// Only present when a torch-off icon is configured
    pub torch: Option<String>,
    /// Only present when a camera icon is configured
    pub camera_switch: Option<String>,
}

impl ControlSet {
    fn from_icons(icons: &IconConfig, strings: &'static OverlayStrings) -> Self {
        Self {
            cancel: match &icons.cancel {
                Some(icon) => CancelButton::Icon(icon.clone()),
                None => CancelButton::Title(strings.cancel),
            },
            gallery_title: strings.gallery,
            torch_title: strings.torch,
            torch: icons.torch_off.clone(),
            camera_switch: icons.camera.clone(),
        }
    }

    pub fn has_torch_button(&self) -> bool {
        self.torch.is_some()
    }

    pub fn has_camera_switch_button(&self) -> bool {
        self.camera_switch.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverlayModel {
    pub locale: Locale,
    pub controls: ControlSet,
    pub scanning_frame: Rect,
    icons: IconConfig,
}

impl OverlayModel {
    pub fn new(ui: &UiConfig) -> Self {
        let strings = ui.locale.strings();
        let (width, height) = ui.view_size;
        Self {
            locale: ui.locale,
            controls: ControlSet::from_icons(&ui.icons, strings),
            scanning_frame: scanning_frame(&Rect::new(0.0, 0.0, width, height)),
            icons: ui.icons.clone(),
        }
    }

    pub fn instruction(&self) -> &'static str {
        self.locale.strings().instruction
    }

    /// Icon for the torch button in `mode`, if one is configured and the
    /// torch button is shown at all
    pub fn torch_icon(&self, mode: TorchMode) -> Option<&str> {
        if !self.controls.has_torch_button() {
            return None;
        }
        match mode {
            TorchMode::On => self.icons.torch_on.as_deref(),
            TorchMode::Off => self.icons.torch_off.as_deref(),
        }
    }
}

/// Square scanning frame centred above the bottom bar
pub fn scanning_frame(view: &Rect) -> Rect {
    Rect::new(
        view.mid_x() - FRAME_SIZE / 2.0,
        view.mid_y() - (FRAME_SIZE + BOTTOM_SPACE) / 2.0,
        FRAME_SIZE,
        FRAME_SIZE,
    )
}
