use serde_json::Value;

use super::{Error, SubscriberEmail, SubscriberName};
use crate::record_store::{Fields, Record};

#[derive(Clone, Debug, serde::Serialize)]
pub(crate) struct ScheduleItem {
    pub(crate) id: String,
    pub(crate) time: String,
    pub(crate) title: String,
    pub(crate) description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) speaker: Option<String>,
}

impl ScheduleItem {
    /// Rows without a title are placeholders in the schedule sheet and are skipped.
    pub(crate) fn from_record(record: &Record) -> Option<Self> {
        Some(Self {
            id: record.id.clone(),
            title: record.text("Title")?.to_string(),
            time: record.text("Time").unwrap_or("TBD").to_string(),
            description: record.text("Description").unwrap_or_default().to_string(),
            speaker: record.text("Speaker").map(str::to_string),
        })
    }
}

pub(crate) struct NewRegistration {
    pub(crate) name: SubscriberName,
    pub(crate) email: SubscriberEmail,
    pub(crate) phone: Option<String>,
    pub(crate) job_title: Option<String>,
}

impl NewRegistration {
    pub(crate) fn fields(&self, registered_at: &str) -> Fields {
        let mut fields = Fields::new();
        fields.insert("Name".to_string(), Value::from(self.name.as_ref()));
        fields.insert("Email".to_string(), Value::from(self.email.as_ref()));
        if let Some(phone) = &self.phone {
            fields.insert("Phone".to_string(), Value::from(phone.as_str()));
        }
        if let Some(job_title) = &self.job_title {
            fields.insert("Job Title".to_string(), Value::from(job_title.as_str()));
        }
        fields.insert("Registration Date".to_string(), Value::from(registered_at));
        fields
    }
}

/// Free-text optional form fields: trimmed, blank means absent, length-capped.
pub(crate) fn optional_text(
    field: &str,
    value: Option<String>,
    max_len: usize,
) -> Result<Option<String>, Error> {
    match value.map(|value| value.trim().to_string()) {
        Some(value) if value.is_empty() => Ok(None),
        Some(value) if value.chars().count() > max_len => Err(Error(format!(
            "{} is limited to {} characters",
            field, max_len
        ))),
        value => Ok(value),
    }
}

#[derive(Debug, serde::Serialize)]
pub(crate) struct SponsorTier {
    pub(crate) name: &'static str,
    pub(crate) price: &'static str,
    pub(crate) benefits: &'static [&'static str],
}

pub(crate) static SPONSOR_TIERS: [SponsorTier; 4] = [
    SponsorTier {
        name: "Bronze",
        price: "$100",
        benefits: &["Logo on website", "Social media mention", "Recognition at event"],
    },
    SponsorTier {
        name: "Silver",
        price: "$300",
        benefits: &[
            "All Bronze benefits",
            "Logo on conference materials",
            "Booth space",
            "Logo placement on signage",
        ],
    },
    SponsorTier {
        name: "Gold",
        price: "$500",
        benefits: &[
            "All Silver benefits",
            "Speaking opportunity (10 min)",
            "Premium booth location",
            "Logo on stage backdrop",
            "Featured in press releases",
        ],
    },
    SponsorTier {
        name: "Platinum",
        price: "$1,000",
        benefits: &[
            "All Gold benefits",
            "Keynote speaking opportunity",
            "Custom sponsorship package",
            "Exclusive branding opportunities",
            "VIP networking event access",
        ],
    },
];

impl SponsorTier {
    /// Case-insensitive lookup by tier name.
    pub(crate) fn find(name: &str) -> Option<&'static SponsorTier> {
        let name = name.trim();
        SPONSOR_TIERS
            .iter()
            .find(|tier| tier.name.eq_ignore_ascii_case(name))
    }
}

#[derive(Debug)]
pub(crate) struct SponsorInquiry {
    pub(crate) email: SubscriberEmail,
    pub(crate) tier: Option<&'static SponsorTier>,
}

impl SponsorInquiry {
    pub(crate) fn parse(email: &str, tier: Option<&str>) -> Result<Self, Error> {
        let email = SubscriberEmail::parse(email)?;
        let tier = match tier.map(str::trim).filter(|tier| !tier.is_empty()) {
            Some(tier) => Some(
                SponsorTier::find(tier)
                    .ok_or_else(|| Error(format!("{} is not a sponsorship tier", tier)))?,
            ),
            None => None,
        };
        Ok(Self { email, tier })
    }

    pub(crate) fn fields(&self, submitted_at: &str) -> Fields {
        let mut fields = Fields::new();
        fields.insert("Email".to_string(), Value::from(self.email.as_ref()));
        if let Some(tier) = self.tier {
            fields.insert("Tier".to_string(), Value::from(tier.name));
        }
        fields.insert("Submitted".to_string(), Value::from(submitted_at));
        fields
    }
}
