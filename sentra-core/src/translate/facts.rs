use sentra_model::RawFinding;

/// Case-normalized view of the fields the classification rules inspect.
/// Computed once per finding so every rule table works off the same facts.
#[derive(Debug, Clone)]
pub(crate) struct FindingFacts {
    name: String,
    tags: Vec<String>,
    severity: String,
}

impl FindingFacts {
    pub(crate) fn from_finding(finding: &RawFinding) -> Self {
        Self {
            name: finding.info.name.to_lowercase(),
            tags: finding
                .info
                .tags
                .as_deref()
                .unwrap_or_default()
                .iter()
                .map(|tag| tag.to_lowercase())
                .collect(),
            severity: finding.info.severity.to_lowercase(),
        }
    }

    pub(crate) fn name_contains(&self, needle: &str) -> bool {
        self.name.contains(needle)
    }

    pub(crate) fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub(crate) fn has_any_tag(&self, tags: &[&str]) -> bool {
        tags.iter().any(|tag| self.has_tag(tag))
    }

    pub(crate) fn severity_is(&self, severity: &str) -> bool {
        self.severity == severity
    }

    /// Critical and high severities escalate impact statements and generic
    /// narratives.
    pub(crate) fn severity_elevated(&self) -> bool {
        self.severity_is("critical") || self.severity_is("high")
    }
}
