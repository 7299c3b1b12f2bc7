//! Per-step form validation.
//!
//! [`validate`] is a pure function from step input to a [`ValidationReport`].
//! Reports never surface as `Err`; they gate progression instead.

pub mod rules;
pub mod schemas;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::draft::{Experience, PersonalInfo, Platform};
pub use rules::{FieldRules, Rule};
pub use schemas::{platform_pattern, platform_url_matches};

/// Form values for one step, borrowed from the caller's editing buffer.
#[derive(Debug, Clone, Copy)]
pub enum StepInput<'a> {
    PersonalInfo(&'a PersonalInfo),
    WorkExperience(&'a Experience),
    SocialLink {
        platform: Option<Platform>,
        url: &'a str,
    },
}

/// Field name → first failing rule's message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub errors: BTreeMap<&'static str, &'static str>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error(&self, field: &str) -> Option<&'static str> {
        self.errors.get(field).copied()
    }

    fn check(&mut self, rules: &FieldRules, value: &str) {
        if let Some(message) = rules::first_failure(rules.rules, value) {
            self.errors.insert(rules.field, message);
        }
    }
}

/// Validate one step's input against its rule table.
pub fn validate(input: StepInput<'_>) -> ValidationReport {
    let mut report = ValidationReport::default();
    match input {
        StepInput::PersonalInfo(info) => {
            report.check(&schemas::FULL_NAME, &info.full_name);
            report.check(&schemas::TITLE, &info.title);
            report.check(&schemas::EMAIL_FIELD, &info.email);
            report.check(&schemas::PHONE_FIELD, &info.phone);
            report.check(&schemas::ADDRESS, &info.address);
        }
        StepInput::WorkExperience(exp) => {
            report.check(&schemas::COMPANY, &exp.company);
            report.check(&schemas::POSITION, &exp.position);
            report.check(&schemas::START_DATE, &exp.start_date);
            if !exp.is_current && !exp.start_date.is_empty() {
                report.check(&schemas::END_DATE, exp.end_date.as_deref().unwrap_or(""));
            }
            report.check(&schemas::DESCRIPTION, &exp.description);
        }
        StepInput::SocialLink { platform, url } => {
            report.check(&schemas::URL, url);
            match platform {
                None => {
                    report.errors.insert("platform", schemas::PLATFORM_REQUIRED);
                }
                Some(platform) if !url.is_empty() && !platform_url_matches(platform, url) => {
                    report.errors.insert("url", schemas::INVALID_PLATFORM_FORMAT);
                }
                Some(_) => {}
            }
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_info() -> PersonalInfo {
        PersonalInfo {
            full_name: "Jane Doe".into(),
            title: "Engineer".into(),
            email: "jane@example.com".into(),
            phone: "+84 123 456 789".into(),
            address: String::new(),
        }
    }

    #[test]
    fn valid_personal_info_passes() {
        assert!(validate(StepInput::PersonalInfo(&valid_info())).is_valid());
    }

    #[test]
    fn bad_email_reported() {
        let info = PersonalInfo {
            email: "not-an-email".into(),
            ..valid_info()
        };
        let report = validate(StepInput::PersonalInfo(&info));
        assert!(!report.is_valid());
        assert_eq!(
            report.error("email"),
            Some("Please enter a valid email address")
        );
        assert_eq!(report.errors.len(), 1);
    }

    #[test]
    fn empty_personal_info_reports_required_fields() {
        let report = validate(StepInput::PersonalInfo(&PersonalInfo::default()));
        assert_eq!(report.error("fullName"), Some("Full name is required"));
        assert_eq!(report.error("title"), Some("Title/Position is required"));
        assert_eq!(report.error("email"), Some("Email is required"));
        assert_eq!(report.error("phone"), Some("Phone number is required"));
        assert_eq!(report.error("address"), None);
    }

    #[test]
    fn phone_rules_in_order() {
        let letters = PersonalInfo {
            phone: "phone".into(),
            ..valid_info()
        };
        assert_eq!(
            validate(StepInput::PersonalInfo(&letters)).error("phone"),
            Some("Please enter a valid phone number")
        );
        let short = PersonalInfo {
            phone: "12345".into(),
            ..valid_info()
        };
        assert_eq!(
            validate(StepInput::PersonalInfo(&short)).error("phone"),
            Some("Phone number must be at least 10 digits")
        );
    }

    #[test]
    fn end_date_required_only_for_past_jobs() {
        let mut exp = Experience {
            company: "Acme".into(),
            position: "Engineer".into(),
            start_date: "2020-01".into(),
            ..Default::default()
        };
        assert_eq!(
            validate(StepInput::WorkExperience(&exp)).error("endDate"),
            Some("End date is required")
        );

        exp.is_current = true;
        assert!(validate(StepInput::WorkExperience(&exp)).is_valid());

        // No start date yet: only the start date is flagged
        exp.is_current = false;
        exp.start_date.clear();
        let report = validate(StepInput::WorkExperience(&exp));
        assert_eq!(report.error("startDate"), Some("Start date is required"));
        assert_eq!(report.error("endDate"), None);
    }

    #[test]
    fn description_limit() {
        let exp = Experience {
            company: "Acme".into(),
            position: "Engineer".into(),
            start_date: "2020-01".into(),
            is_current: true,
            description: "x".repeat(501),
            ..Default::default()
        };
        assert_eq!(
            validate(StepInput::WorkExperience(&exp)).error("description"),
            Some("Description must not exceed 500 characters")
        );
    }

    #[test]
    fn social_link_platform_patterns() {
        let linkedin = validate(StepInput::SocialLink {
            platform: Some(Platform::Linkedin),
            url: "https://example.com",
        });
        assert_eq!(
            linkedin.error("url"),
            Some("Invalid format for selected platform")
        );

        let zalo = validate(StepInput::SocialLink {
            platform: Some(Platform::Zalo),
            url: "https://example.com",
        });
        assert!(zalo.is_valid());
    }

    #[test]
    fn social_link_required_fields() {
        let report = validate(StepInput::SocialLink {
            platform: None,
            url: "",
        });
        assert_eq!(report.error("platform"), Some("Platform is required"));
        assert_eq!(report.error("url"), Some("URL/Contact is required"));
    }
}
