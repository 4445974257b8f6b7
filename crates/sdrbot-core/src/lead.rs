use serde::{Deserialize, Serialize};

use crate::SdrbotResult;

/// Sentinel stored in place of any lead field the visitor left blank.
pub const NOT_PROVIDED: &str = "Not Provided";

/// One elicited question/answer pair, recorded per field in the API flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    /// The question the bot asked.
    pub question: String,
    /// The visitor's answer, as typed.
    pub answer: String,
}

/// Raw field values collected from a visitor, before sentinel substitution.
///
/// All fields are free text; nothing is validated (email format, non-empty
/// company, etc. are accepted as-is).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LeadFields {
    /// Full name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Company name.
    pub company: String,
    /// Role in the company.
    pub role: String,
    /// Challenges / pain points.
    pub pain_points: String,
    /// Interested product / solution.
    pub interested_product: String,
}

/// The structured lead object emitted at the end of an intake flow.
///
/// Created once per completed intake; never mutated after summarization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LeadRecord {
    /// Full name, or [`NOT_PROVIDED`].
    pub name: String,
    /// Email address, or [`NOT_PROVIDED`].
    pub email: String,
    /// Company name, or [`NOT_PROVIDED`].
    pub company: String,
    /// Role in the company, or [`NOT_PROVIDED`].
    pub role: String,
    /// Challenges / pain points, or [`NOT_PROVIDED`].
    pub pain_points: String,
    /// Interested product / solution, or [`NOT_PROVIDED`].
    pub interested_product: String,
    /// LLM-generated summary; absent until a summarization call succeeds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_summary: Option<String>,
}

fn or_sentinel(value: String) -> String {
    if value.trim().is_empty() {
        NOT_PROVIDED.to_string()
    } else {
        value
    }
}

/// Strips a surrounding markdown code fence, if present.
///
/// Models asked for "a JSON object" routinely wrap it in ```` ```json ````
/// fences; the payload between the fences is the candidate document.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json", "JSON", ...) on the opening fence line.
    let rest = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Loose shape for model-emitted lead JSON: every field optional, unknown
/// keys ignored.
#[derive(Deserialize)]
struct ModelLead {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    company: Option<String>,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    pain_points: Option<String>,
    #[serde(default)]
    interested_product: Option<String>,
    #[serde(default)]
    conversation_summary: Option<String>,
}

impl LeadRecord {
    /// Builds a record from collected field values, substituting
    /// [`NOT_PROVIDED`] for every empty or whitespace-only field.
    pub fn from_fields(fields: LeadFields) -> Self {
        Self {
            name: or_sentinel(fields.name),
            email: or_sentinel(fields.email),
            company: or_sentinel(fields.company),
            role: or_sentinel(fields.role),
            pain_points: or_sentinel(fields.pain_points),
            interested_product: or_sentinel(fields.interested_product),
            conversation_summary: None,
        }
    }

    /// Sets the generated summary, consuming and returning the record.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.conversation_summary = Some(summary.into());
        self
    }

    /// Parses a lead record out of model output.
    ///
    /// Model output is never trusted to be valid or complete JSON: a
    /// surrounding code fence is stripped, the remainder must parse as a JSON
    /// object, and any missing or blank field is filled with
    /// [`NOT_PROVIDED`]. A parse failure is returned to the caller, which
    /// decides the fallback (see [`LeadRecord::fallback_from_raw`]).
    pub fn from_model_json(text: &str) -> SdrbotResult<Self> {
        let candidate = strip_code_fence(text);
        let parsed: ModelLead = serde_json::from_str(candidate)?;
        Ok(Self {
            name: or_sentinel(parsed.name.unwrap_or_default()),
            email: or_sentinel(parsed.email.unwrap_or_default()),
            company: or_sentinel(parsed.company.unwrap_or_default()),
            role: or_sentinel(parsed.role.unwrap_or_default()),
            pain_points: or_sentinel(parsed.pain_points.unwrap_or_default()),
            interested_product: or_sentinel(parsed.interested_product.unwrap_or_default()),
            conversation_summary: parsed
                .conversation_summary
                .filter(|s| !s.trim().is_empty()),
        })
    }

    /// Fallback record used when model output failed to parse as JSON: all
    /// fields carry the sentinel and the raw model text is preserved as the
    /// summary, so nothing is forwarded disguised as validated structure.
    pub fn fallback_from_raw(raw: impl Into<String>) -> Self {
        Self::from_fields(LeadFields::default()).with_summary(raw)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn sample_fields() -> LeadFields {
        LeadFields {
            name: "Ada".into(),
            email: "a@x.com".into(),
            company: "Acme".into(),
            role: "Eng".into(),
            pain_points: "Scaling".into(),
            interested_product: "Widget".into(),
        }
    }

    #[test]
    fn test_all_empty_fields_become_sentinel() {
        let record = LeadRecord::from_fields(LeadFields::default());
        assert_eq!(record.name, NOT_PROVIDED);
        assert_eq!(record.email, NOT_PROVIDED);
        assert_eq!(record.company, NOT_PROVIDED);
        assert_eq!(record.role, NOT_PROVIDED);
        assert_eq!(record.pain_points, NOT_PROVIDED);
        assert_eq!(record.interested_product, NOT_PROVIDED);
        assert_eq!(record.conversation_summary, None);
    }

    #[test]
    fn test_non_empty_fields_pass_through_unchanged() {
        let record = LeadRecord::from_fields(sample_fields());
        assert_eq!(record.name, "Ada");
        assert_eq!(record.email, "a@x.com");
        assert_eq!(record.company, "Acme");
        assert_eq!(record.role, "Eng");
        assert_eq!(record.pain_points, "Scaling");
        assert_eq!(record.interested_product, "Widget");
    }

    #[test]
    fn test_whitespace_only_field_becomes_sentinel() {
        let fields = LeadFields {
            email: "   ".into(),
            ..sample_fields()
        };
        let record = LeadRecord::from_fields(fields);
        assert_eq!(record.email, NOT_PROVIDED);
        assert_eq!(record.name, "Ada");
    }

    #[test]
    fn test_summary_is_omitted_from_json_until_set() {
        let record = LeadRecord::from_fields(sample_fields());
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("conversation_summary").is_none());

        let json = serde_json::to_value(record.with_summary("sounds promising")).unwrap();
        assert_eq!(json["conversation_summary"], "sounds promising");
    }

    #[test]
    fn test_from_model_json_plain_object() {
        let record = LeadRecord::from_model_json(
            r#"{"name": "Ada", "email": "a@x.com", "company": "Acme",
                "role": "Eng", "pain_points": "Scaling",
                "interested_product": "Widget",
                "conversation_summary": "Ada from Acme wants Widget."}"#,
        )
        .unwrap();
        assert_eq!(record.name, "Ada");
        assert_eq!(
            record.conversation_summary.as_deref(),
            Some("Ada from Acme wants Widget.")
        );
    }

    #[test]
    fn test_from_model_json_strips_code_fence() {
        let fenced = "```json\n{\"name\": \"Ada\"}\n```";
        let record = LeadRecord::from_model_json(fenced).unwrap();
        assert_eq!(record.name, "Ada");
        assert_eq!(record.email, NOT_PROVIDED);
    }

    #[test]
    fn test_from_model_json_fills_missing_fields_with_sentinel() {
        let record = LeadRecord::from_model_json(r#"{"name": "Ada", "email": ""}"#).unwrap();
        assert_eq!(record.name, "Ada");
        assert_eq!(record.email, NOT_PROVIDED);
        assert_eq!(record.company, NOT_PROVIDED);
        assert_eq!(record.conversation_summary, None);
    }

    #[test]
    fn test_from_model_json_rejects_non_json() {
        let err = LeadRecord::from_model_json("Sure! Here is the lead you asked for.");
        assert!(err.is_err());
    }

    #[test]
    fn test_fallback_preserves_raw_text_as_summary() {
        let record = LeadRecord::fallback_from_raw("not json at all");
        assert_eq!(record.name, NOT_PROVIDED);
        assert_eq!(record.conversation_summary.as_deref(), Some("not json at all"));
    }
}
