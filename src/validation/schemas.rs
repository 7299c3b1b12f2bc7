//! Per-step rule tables and platform URL patterns.

use std::sync::LazyLock;

use regex::Regex;

use super::rules::{FieldRules, Rule};
use crate::draft::Platform;

macro_rules! pattern {
    ($name:ident, $re:literal) => {
        static $name: LazyLock<Regex> =
            LazyLock::new(|| Regex::new($re).expect(concat!("invalid pattern ", $re)));
    };
}

pattern!(PHONE, r"^[\d\s+()-]+$");
pattern!(FACEBOOK, r"(?i)facebook\.com");
pattern!(LINKEDIN, r"(?i)linkedin\.com");
pattern!(TWITTER, r"(?i)(twitter\.com|x\.com)");
pattern!(INSTAGRAM, r"(?i)instagram\.com");
pattern!(GITHUB, r"(?i)github\.com");
pattern!(YOUTUBE, r"(?i)youtube\.com");
pattern!(TIKTOK, r"(?i)tiktok\.com");
pattern!(EMAIL, r"^[^\s@]+@[^\s@]+\.[^\s@]+$");
pattern!(WEBSITE, r"^https?://.+");

pub const INVALID_PLATFORM_FORMAT: &str = "Invalid format for selected platform";
pub const PLATFORM_REQUIRED: &str = "Platform is required";
pub const URL_REQUIRED: &str = "URL/Contact is required";
pub const END_DATE_REQUIRED: &str = "End date is required";

pub static FULL_NAME: FieldRules = FieldRules {
    field: "fullName",
    rules: &[
        Rule::Required("Full name is required"),
        Rule::MinChars(2, "Name must be at least 2 characters"),
        Rule::MaxChars(100, "Name must not exceed 100 characters"),
    ],
};

pub static TITLE: FieldRules = FieldRules {
    field: "title",
    rules: &[
        Rule::Required("Title/Position is required"),
        Rule::MinChars(2, "Title must be at least 2 characters"),
        Rule::MaxChars(100, "Title must not exceed 100 characters"),
    ],
};

pub static EMAIL_FIELD: FieldRules = FieldRules {
    field: "email",
    rules: &[
        Rule::Required("Email is required"),
        Rule::Email("Please enter a valid email address"),
    ],
};

pub static PHONE_FIELD: FieldRules = FieldRules {
    field: "phone",
    rules: &[
        Rule::Required("Phone number is required"),
        Rule::Pattern(&PHONE, "Please enter a valid phone number"),
        Rule::MinChars(10, "Phone number must be at least 10 digits"),
    ],
};

pub static ADDRESS: FieldRules = FieldRules {
    field: "address",
    rules: &[Rule::MaxChars(200, "Address must not exceed 200 characters")],
};

pub static COMPANY: FieldRules = FieldRules {
    field: "company",
    rules: &[
        Rule::Required("Company name is required"),
        Rule::MinChars(2, "Company name must be at least 2 characters"),
        Rule::MaxChars(100, "Company name must not exceed 100 characters"),
    ],
};

pub static POSITION: FieldRules = FieldRules {
    field: "position",
    rules: &[
        Rule::Required("Position is required"),
        Rule::MinChars(2, "Position must be at least 2 characters"),
        Rule::MaxChars(100, "Position must not exceed 100 characters"),
    ],
};

pub static START_DATE: FieldRules = FieldRules {
    field: "startDate",
    rules: &[Rule::Required("Start date is required")],
};

/// Applies only while the job has ended and a start date is set.
pub static END_DATE: FieldRules = FieldRules {
    field: "endDate",
    rules: &[Rule::Required(END_DATE_REQUIRED)],
};

pub static DESCRIPTION: FieldRules = FieldRules {
    field: "description",
    rules: &[Rule::MaxChars(500, "Description must not exceed 500 characters")],
};

pub static URL: FieldRules = FieldRules {
    field: "url",
    rules: &[Rule::Required(URL_REQUIRED)],
};

/// Format pattern a platform's URL/contact must match. Zalo and Telegram
/// accept any value.
pub fn platform_pattern(platform: Platform) -> Option<&'static Regex> {
    let pattern: &'static LazyLock<Regex> = match platform {
        Platform::Facebook => &FACEBOOK,
        Platform::Linkedin => &LINKEDIN,
        Platform::Twitter => &TWITTER,
        Platform::Instagram => &INSTAGRAM,
        Platform::Github => &GITHUB,
        Platform::Youtube => &YOUTUBE,
        Platform::Tiktok => &TIKTOK,
        Platform::Email => &EMAIL,
        Platform::Phone => &PHONE,
        Platform::Website => &WEBSITE,
        Platform::Zalo | Platform::Telegram => return None,
    };
    Some(LazyLock::force(pattern))
}

/// Whether `url` is acceptable for `platform`.
pub fn platform_url_matches(platform: Platform, url: &str) -> bool {
    platform_pattern(platform).is_none_or(|re| re.is_match(url))
}
