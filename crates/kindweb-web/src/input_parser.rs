#![forbid(unsafe_code)]

//! JSON input parser for converting host-encoded DOM events into
//! [`PageInput`] values.
//!
//! Every payload is an object with a `kind` string plus the fields that kind
//! needs, e.g. `{"kind":"wheel","dx":30,"dy":5,"mods":1}`. Unknown kinds
//! return `Ok(None)` so older runtimes tolerate newer hosts.
//!
//! # Kinds
//!
//! | kind | fields |
//! |------|--------|
//! | `pointer_down`, `pointer_move` | `x` |
//! | `pointer_up`, `pointer_leave` | |
//! | `touch_start`, `touch_move`, `touch_end` | `x`, `y` |
//! | `touch_cancel` | |
//! | `wheel` | `dx`, `dy`, `mods` |
//! | `carousel_key` | `key` |
//! | `carousel_scroll` | `left` |
//! | `carousel_scroll_end`, `carousel_focus`, `carousel_blur`, `carousel_enter`, `carousel_leave` | |
//! | `carousel_button` | `button` (`prev`/`next`) |
//! | `card_activate` | `index`, `from_donate_overlay` |
//! | `card_key` | `index`, `key` (Enter/Space activate) |
//! | `card_hover` | `index`, `entered` |
//! | `hamburger_click` | |
//! | `document_click` | `inside_drawer`, `on_hamburger` |
//! | `key` | `key` |
//! | `nav_touch_start`, `nav_touch_end` | `x`, `y` |
//! | `nav_link` | `href` |
//! | `nav_donate` | |
//! | `resize` | `width`, `layout` |
//! | `form_focus` | `field` |
//! | `form_blur` | `field`, `value`, `required`, `is_email` |
//! | `form_submit` | `data` |
//! | `notification_close`, `notification_transition_end` | `id` |
//! | `stat_visible` | `index`, `text` |
//! | `window_scroll` | `page_y`, `scroll_height`, `inner_height`, `hero_height` |
//! | `scroll_to_section` | `target_top`, `header_height` |
//! | `scroll_top_click`, `page_loaded` | |
//! | `image_visible`, `section_visible` | `index` |
//! | `loading_tick` | `amount` |
//! | `donate_click` | `cause` |
//! | `social_click` | `platform` |
//! | `contact_option_click` | `option` |

use std::collections::BTreeMap;

use kindweb_core::carousel::TrackLayout;
use kindweb_core::effects::{EffectsInput, ScrollSnapshot};
use kindweb_core::form::FormInput;
use kindweb_core::input::{CarouselButton, CarouselInput, Key, Modifiers};
use kindweb_core::nav::NavInput;
use kindweb_core::notify::NotificationId;
use serde::Deserialize;
use thiserror::Error;

use crate::runtime::PageInput;

/// Errors from parsing encoded input JSON.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputParseError {
    /// Malformed JSON.
    #[error("JSON parse error: {0}")]
    Json(String),
    /// Missing required field.
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    /// A field holds a value outside its domain.
    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: String },
}

/// Internal deserialization target covering every input kind.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawInput {
    kind: String,
    x: Option<f64>,
    y: Option<f64>,
    dx: Option<f64>,
    dy: Option<f64>,
    mods: Option<i64>,
    key: Option<String>,
    left: Option<f64>,
    button: Option<String>,
    index: Option<usize>,
    from_donate_overlay: Option<bool>,
    entered: Option<bool>,
    inside_drawer: Option<bool>,
    on_hamburger: Option<bool>,
    href: Option<String>,
    width: Option<f64>,
    layout: Option<TrackLayout>,
    field: Option<String>,
    value: Option<String>,
    required: Option<bool>,
    is_email: Option<bool>,
    data: Option<BTreeMap<String, String>>,
    id: Option<u64>,
    text: Option<String>,
    page_y: Option<f64>,
    scroll_height: Option<f64>,
    inner_height: Option<f64>,
    hero_height: Option<f64>,
    target_top: Option<f64>,
    header_height: Option<f64>,
    amount: Option<f64>,
    cause: Option<String>,
    platform: Option<String>,
    option: Option<String>,
}

fn require<T>(value: Option<T>, field: &'static str) -> Result<T, InputParseError> {
    value.ok_or(InputParseError::MissingField(field))
}

fn parse_modifiers(mods: Option<i64>) -> Modifiers {
    let bits = mods.unwrap_or(0).clamp(0, i64::from(u8::MAX)) as u8;
    Modifiers::from_bits_truncate(bits)
}

fn parse_key(raw: &RawInput) -> Result<Key, InputParseError> {
    let key = raw
        .key
        .as_deref()
        .filter(|k| !k.is_empty())
        .ok_or(InputParseError::MissingField("key"))?;
    Ok(Key::from_dom(key))
}

fn parse_button(raw: &RawInput) -> Result<CarouselButton, InputParseError> {
    match require(raw.button.as_deref(), "button")? {
        "prev" => Ok(CarouselButton::Prev),
        "next" => Ok(CarouselButton::Next),
        other => Err(InputParseError::InvalidValue {
            field: "button",
            value: other.to_string(),
        }),
    }
}

fn point(raw: &RawInput) -> Result<(f64, f64), InputParseError> {
    Ok((require(raw.x, "x")?, require(raw.y, "y")?))
}

/// Parse one JSON-encoded host input.
///
/// Returns `Ok(None)` for kinds this runtime does not handle, and `Err` for
/// malformed JSON or missing required fields.
pub fn parse_encoded_input(json: &str) -> Result<Option<PageInput>, InputParseError> {
    let raw: RawInput =
        serde_json::from_str(json).map_err(|e| InputParseError::Json(e.to_string()))?;
    if let Some(carousel) = parse_carousel_input(&raw)? {
        return Ok(Some(PageInput::Carousel(carousel)));
    }
    if let Some(nav) = parse_nav_input(&raw)? {
        return Ok(Some(PageInput::Nav(nav)));
    }
    if let Some(effects) = parse_effects_input(&raw)? {
        return Ok(Some(PageInput::Effects(effects)));
    }
    parse_page_input(raw)
}

fn parse_carousel_input(raw: &RawInput) -> Result<Option<CarouselInput>, InputParseError> {
    let input = match raw.kind.as_str() {
        "pointer_down" => CarouselInput::PointerDown {
            x: require(raw.x, "x")?,
        },
        "pointer_move" => CarouselInput::PointerMove {
            x: require(raw.x, "x")?,
        },
        "pointer_up" => CarouselInput::PointerUp,
        "pointer_leave" => CarouselInput::PointerLeave,
        "touch_start" => {
            let (x, y) = point(raw)?;
            CarouselInput::TouchStart { x, y }
        }
        "touch_move" => {
            let (x, y) = point(raw)?;
            CarouselInput::TouchMove { x, y }
        }
        "touch_end" => {
            let (x, y) = point(raw)?;
            CarouselInput::TouchEnd { x, y }
        }
        "touch_cancel" => CarouselInput::TouchCancel,
        "wheel" => CarouselInput::Wheel {
            dx: raw.dx.unwrap_or(0.0),
            dy: raw.dy.unwrap_or(0.0),
            mods: parse_modifiers(raw.mods),
        },
        "carousel_key" => CarouselInput::KeyDown {
            key: parse_key(raw)?,
        },
        "carousel_scroll" => CarouselInput::Scroll {
            left: require(raw.left, "left")?,
        },
        "carousel_scroll_end" => CarouselInput::ScrollEnd,
        "carousel_focus" => CarouselInput::Focus,
        "carousel_blur" => CarouselInput::Blur,
        "carousel_enter" => CarouselInput::ContainerEnter,
        "carousel_leave" => CarouselInput::ContainerLeave,
        "carousel_button" => CarouselInput::Button(parse_button(raw)?),
        "card_activate" => CarouselInput::CardActivate {
            index: require(raw.index, "index")?,
            from_donate_overlay: raw.from_donate_overlay.unwrap_or(false),
        },
        "card_key" => {
            let index = require(raw.index, "index")?;
            if !parse_key(raw)?.is_activation() {
                return Ok(None);
            }
            CarouselInput::CardActivate {
                index,
                from_donate_overlay: false,
            }
        }
        "card_hover" => CarouselInput::CardHover {
            index: require(raw.index, "index")?,
            entered: require(raw.entered, "entered")?,
        },
        _ => return Ok(None),
    };
    Ok(Some(input))
}

fn parse_nav_input(raw: &RawInput) -> Result<Option<NavInput>, InputParseError> {
    let input = match raw.kind.as_str() {
        "hamburger_click" => NavInput::HamburgerClick,
        "document_click" => NavInput::DocumentClick {
            inside_drawer: raw.inside_drawer.unwrap_or(false),
            on_hamburger: raw.on_hamburger.unwrap_or(false),
        },
        "key" => NavInput::KeyDown {
            key: parse_key(raw)?,
        },
        "nav_touch_start" => {
            let (x, y) = point(raw)?;
            NavInput::TouchStart { x, y }
        }
        "nav_touch_end" => {
            let (x, y) = point(raw)?;
            NavInput::TouchEnd { x, y }
        }
        "nav_link" => NavInput::LinkActivate {
            href: require(raw.href.clone(), "href")?,
        },
        "nav_donate" => NavInput::DonateActivate,
        _ => return Ok(None),
    };
    Ok(Some(input))
}

fn parse_effects_input(raw: &RawInput) -> Result<Option<EffectsInput>, InputParseError> {
    let input = match raw.kind.as_str() {
        "window_scroll" => EffectsInput::WindowScroll(ScrollSnapshot {
            page_y: require(raw.page_y, "page_y")?,
            scroll_height: raw.scroll_height.unwrap_or(0.0),
            inner_height: raw.inner_height.unwrap_or(0.0),
            hero_height: raw.hero_height,
        }),
        "scroll_to_section" => EffectsInput::ScrollToSection {
            target_top: require(raw.target_top, "target_top")?,
            header_height: raw.header_height,
        },
        "scroll_top_click" => EffectsInput::ScrollTopClick,
        "image_visible" => EffectsInput::ImageIntersect {
            index: require(raw.index, "index")?,
        },
        "section_visible" => EffectsInput::SectionIntersect {
            index: require(raw.index, "index")?,
        },
        "loading_tick" => EffectsInput::LoadingTick {
            amount: require(raw.amount, "amount")?,
        },
        "page_loaded" => EffectsInput::PageLoaded,
        _ => return Ok(None),
    };
    Ok(Some(input))
}

fn parse_page_input(raw: RawInput) -> Result<Option<PageInput>, InputParseError> {
    let input = match raw.kind.as_str() {
        "resize" => PageInput::Resize {
            width: require(raw.width, "width")?,
            layout: raw.layout,
        },
        "form_focus" => PageInput::Form(FormInput::Focus {
            field: require(raw.field, "field")?,
        }),
        "form_blur" => PageInput::Form(FormInput::Blur {
            field: require(raw.field, "field")?,
            value: raw.value.unwrap_or_default(),
            required: raw.required.unwrap_or(false),
            is_email: raw.is_email.unwrap_or(false),
        }),
        "form_submit" => PageInput::Form(FormInput::Submit {
            data: raw.data.unwrap_or_default(),
        }),
        "notification_close" => PageInput::NotificationClose {
            id: NotificationId(require(raw.id, "id")?),
        },
        "notification_transition_end" => PageInput::NotificationTransitionEnd {
            id: NotificationId(require(raw.id, "id")?),
        },
        "stat_visible" => PageInput::StatVisible {
            index: require(raw.index, "index")?,
            text: require(raw.text, "text")?,
        },
        "donate_click" => PageInput::DonateClick { cause: raw.cause },
        "social_click" => PageInput::SocialClick {
            platform: require(raw.platform, "platform")?,
        },
        "contact_option_click" => PageInput::ContactOptionClick {
            option: require(raw.option, "option")?,
        },
        _ => return Ok(None),
    };
    Ok(Some(input))
}
