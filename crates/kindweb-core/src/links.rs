#![forbid(unsafe_code)]

//! Navigation targets and the fixed outbound links of the site.

use serde::Serialize;
use tracing::warn;

use crate::store::{KeyValueStore, SELECTED_CAUSE_KEY};

pub const DONATE_PAGE: &str = "donate.html";
pub const CAUSES_PAGE: &str = "causes.html";

const FACEBOOK_URL: &str = "https://facebook.com/srivinayakafoundation";
const INSTAGRAM_URL: &str = "https://instagram.com/srivinayakafoundation";
const TWITTER_URL: &str = "https://twitter.com/srivinayakafoundation";
const LINKEDIN_URL: &str = "https://linkedin.com/company/srivinayakafoundation";
const WHATSAPP_URL: &str = "https://wa.me/919876543210";
const PHONE_NUMBER: &str = "+919876543210";
const OFFICE_EMAIL: &str = "office@vinayaka.foundation";
const OFFICE_MAP_URL: &str =
    "https://maps.google.com/?q=No.6,+Dhanammal+Street,Spurtank+Road,Chetpet,Chennai+600-031";

/// Where an interaction sends the browser. Opaque to the page logic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "Navigation")]
pub enum NavTarget {
    Donate,
    Causes,
    /// Opened in a new tab.
    External(String),
    Dial(String),
    Mail(String),
}

impl NavTarget {
    #[must_use]
    pub fn href(&self) -> String {
        match self {
            Self::Donate => DONATE_PAGE.to_owned(),
            Self::Causes => CAUSES_PAGE.to_owned(),
            Self::External(url) => url.clone(),
            Self::Dial(number) => format!("tel:{number}"),
            Self::Mail(address) => format!("mailto:{address}"),
        }
    }

    #[must_use]
    pub const fn new_tab(&self) -> bool {
        matches!(self, Self::External(_))
    }
}

/// Wire form of a [`NavTarget`]: what the host assigns to `location.href`
/// or passes to `window.open`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Navigation {
    pub href: String,
    pub new_tab: bool,
}

impl From<NavTarget> for Navigation {
    fn from(target: NavTarget) -> Self {
        Self {
            href: target.href(),
            new_tab: target.new_tab(),
        }
    }
}

/// Footer social icons, keyed by their `data-platform` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SocialPlatform {
    Facebook,
    Instagram,
    Twitter,
    Linkedin,
}

impl SocialPlatform {
    #[must_use]
    pub fn from_attr(value: &str) -> Option<Self> {
        match value {
            "facebook" => Some(Self::Facebook),
            "instagram" => Some(Self::Instagram),
            "twitter" => Some(Self::Twitter),
            "linkedin" => Some(Self::Linkedin),
            _ => None,
        }
    }

    #[must_use]
    pub fn target(self) -> NavTarget {
        let url = match self {
            Self::Facebook => FACEBOOK_URL,
            Self::Instagram => INSTAGRAM_URL,
            Self::Twitter => TWITTER_URL,
            Self::Linkedin => LINKEDIN_URL,
        };
        NavTarget::External(url.to_owned())
    }
}

/// Contact section options, keyed by their modifier class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactOption {
    Whatsapp,
    Instagram,
    Phone,
    Email,
    Address,
}

impl ContactOption {
    #[must_use]
    pub fn from_class(value: &str) -> Option<Self> {
        match value {
            "whatsapp" => Some(Self::Whatsapp),
            "instagram" => Some(Self::Instagram),
            "phone" => Some(Self::Phone),
            "email" => Some(Self::Email),
            "address" => Some(Self::Address),
            _ => None,
        }
    }

    #[must_use]
    pub fn target(self) -> NavTarget {
        match self {
            Self::Whatsapp => NavTarget::External(WHATSAPP_URL.to_owned()),
            Self::Instagram => NavTarget::External(INSTAGRAM_URL.to_owned()),
            Self::Phone => NavTarget::Dial(PHONE_NUMBER.to_owned()),
            Self::Email => NavTarget::Mail(OFFICE_EMAIL.to_owned()),
            Self::Address => NavTarget::External(OFFICE_MAP_URL.to_owned()),
        }
    }
}

/// Record the cause a donate button was pressed for, then head to the
/// donate page.
///
/// A button without a cause clears any earlier selection. Storage failures
/// are logged and do not block navigation.
pub fn select_cause_and_donate(store: &mut impl KeyValueStore, cause: Option<&str>) -> NavTarget {
    let result = match cause.filter(|c| !c.is_empty()) {
        Some(cause) => store.set(SELECTED_CAUSE_KEY, cause),
        None => store.remove(SELECTED_CAUSE_KEY),
    };
    if let Err(err) = result {
        warn!(target: "kindweb::links", error = %err, "could not persist selected cause");
    }
    NavTarget::Donate
}
